use std::env;

use endowment_harness::config::cfg::Config;
use endowment_harness::config::network::Network;
use endowment_harness::config::wallets::Wallets;
use endowment_harness::orchestrator::orc::Orchestrator;
use endowment_harness::processes::migrate::migrate_core;
use endowment_harness::processes::setup::CoreContracts;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let network: Network = env::args().nth(1).as_deref().unwrap_or("local").parse()?;
    let cfg = Config::for_network("config", network)?;
    let wallets = Wallets::from_config(&cfg)?;
    let mut orc = Orchestrator::new(&cfg, true)?;

    // the deployment comes from the state file or `contract_deploy_info`
    let core = CoreContracts::from_orchestrator(&orc)?;
    migrate_core(&mut orc, &cfg, &wallets, &core).await?;
    info!("core protocol on {} migrated", network);

    if let Some(report) = orc.gas_profiler_report() {
        info!("gas report:\n{}", serde_json::to_string_pretty(report)?);
    }

    Ok(())
}
