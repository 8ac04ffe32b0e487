use std::env;

use anyhow::{anyhow, bail};
use endowment_harness::config::cfg::Config;
use endowment_harness::config::network::Network;
use endowment_harness::config::wallets::Wallets;
use endowment_harness::orchestrator::orc::Orchestrator;
use endowment_harness::scenarios::suite::Suite;
use endowment_harness::scenarios::TestContext;
use log::info;

/// `run-tests [network] [core|halo|all]`
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let network: Network = args.get(1).map(String::as_str).unwrap_or("local").parse()?;
    let suite_name = args.get(2).map(String::as_str).unwrap_or("all");
    let suite = Suite::by_name(suite_name)
        .ok_or_else(|| anyhow!("unknown suite {:?}, expected core, halo or all", suite_name))?;

    let cfg = Config::for_network("config", network)?;
    let wallets = Wallets::from_config(&cfg)?;
    let orc = Orchestrator::new(&cfg, true)?;
    let mut ctx = TestContext::new(orc, cfg, wallets);

    info!("running {} scenarios on {}", suite.name, network);
    let report = suite.run(&mut ctx).await;
    info!("{}", report);

    if let Some(report) = ctx.orc.gas_profiler_report() {
        info!("gas report:\n{}", serde_json::to_string_pretty(report)?);
    }

    if !report.is_success() {
        bail!("{} of {} scenarios failed", report.failed.len(), suite.scenarios.len());
    }
    Ok(())
}
