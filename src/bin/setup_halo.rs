use std::env;

use endowment_harness::config::cfg::Config;
use endowment_harness::config::network::Network;
use endowment_harness::config::wallets::Wallets;
use endowment_harness::orchestrator::orc::Orchestrator;
use endowment_harness::processes::halo::setup_halo;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let network: Network = env::args().nth(1).as_deref().unwrap_or("local").parse()?;
    let cfg = Config::for_network("config", network)?;
    let wallets = Wallets::from_config(&cfg)?;
    let mut orc = Orchestrator::new(&cfg, true)?;

    let halo = setup_halo(&mut orc, &cfg, &wallets).await?;
    info!("HALO deployed on {}:\n{}", network, serde_json::to_string_pretty(&halo)?);

    if let Some(report) = orc.gas_profiler_report() {
        info!("gas report:\n{}", serde_json::to_string_pretty(report)?);
    }

    Ok(())
}
