use std::env;
use std::time::Duration;

use endowment_harness::config::cfg::Config;
use endowment_harness::config::network::Network;
use endowment_harness::config::wallets::Wallets;
use endowment_harness::orchestrator::orc::Orchestrator;
use endowment_harness::processes::setup::setup_core;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let network: Network = env::args().nth(1).as_deref().unwrap_or("local").parse()?;
    let cfg = Config::for_network("config", network)?;
    let wallets = Wallets::from_config(&cfg)?;
    let mut orc = Orchestrator::new(&cfg, true)?;

    if network.is_local() {
        // a freshly started devnet rejects txs until its first block
        orc.poll_for_n_blocks(1, Duration::from_secs(30), true).await?;
    }

    let core = setup_core(&mut orc, &cfg, &wallets).await?;
    info!("core protocol deployed on {}:\n{}", network, serde_json::to_string_pretty(&core)?);

    if let Some(report) = orc.gas_profiler_report() {
        info!("gas report:\n{}", serde_json::to_string_pretty(report)?);
    }

    Ok(())
}
