use std::env;

use anyhow::{anyhow, Context};
use endowment_harness::airdrop::{verify, Airdrop};
use serde_json::json;

/// `airdrop-root <claims.json>`: prints the merkle root of a claim list and
/// the proof of every entry as json.
fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let file = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: airdrop-root <claims.json>"))?;
    let airdrop = Airdrop::from_file(&file).with_context(|| format!("reading {}", file))?;
    let root = airdrop.root();

    let mut claims = vec![];
    for entry in airdrop.entries() {
        let proof = airdrop
            .proof(&entry.address, entry.amount)
            .ok_or_else(|| anyhow!("no proof for {}", entry.address))?;
        if !verify(&proof, &root, &entry.address, entry.amount)? {
            return Err(anyhow!("proof of {} does not verify", entry.address));
        }
        claims.push(json!({
            "address": entry.address,
            "amount": entry.amount,
            "proof": proof,
        }));
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "merkle_root": root, "claims": claims }))?
    );
    Ok(())
}
