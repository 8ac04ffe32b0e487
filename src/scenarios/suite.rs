use log::{error, info};
use std::fmt;

use super::error::ScenarioError;
use super::{core_protocol, halo, TestContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    AddApTeamMember,
    UpdateRegistrarConfig,
    RejectUnapprovedDonation,
    DonorDepositToIndexFund,
    TcaDepositToIndexFund,
    CharityUpdatesStrategies,
    BeneficiaryWithdrawsLiquid,
    CreateAndRemoveIndexFund,
    UpdateFundMembers,
    QueryRegistrar,
    QueryIndexFund,
    QueryAccounts,
    QueryMultisig,
    QueryVaults,
    AirdropClaim,
    GovStake,
    StakingBond,
    CollectorSweep,
    HaloQueries,
}

impl Scenario {
    pub const CORE: [Scenario; 14] = [
        Scenario::AddApTeamMember,
        Scenario::UpdateRegistrarConfig,
        Scenario::RejectUnapprovedDonation,
        Scenario::DonorDepositToIndexFund,
        Scenario::TcaDepositToIndexFund,
        Scenario::CharityUpdatesStrategies,
        Scenario::BeneficiaryWithdrawsLiquid,
        Scenario::CreateAndRemoveIndexFund,
        Scenario::UpdateFundMembers,
        Scenario::QueryRegistrar,
        Scenario::QueryIndexFund,
        Scenario::QueryAccounts,
        Scenario::QueryMultisig,
        Scenario::QueryVaults,
    ];

    // staking and bonding spend HALO from the claim, so the claim goes first
    pub const HALO: [Scenario; 5] = [
        Scenario::AirdropClaim,
        Scenario::GovStake,
        Scenario::StakingBond,
        Scenario::CollectorSweep,
        Scenario::HaloQueries,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::AddApTeamMember => "add AP team member",
            Scenario::UpdateRegistrarConfig => "update registrar config",
            Scenario::RejectUnapprovedDonation => "reject donation to unapproved endowment",
            Scenario::DonorDepositToIndexFund => "donor deposit to index fund",
            Scenario::TcaDepositToIndexFund => "TCA deposit to index fund",
            Scenario::CharityUpdatesStrategies => "charity updates strategies",
            Scenario::BeneficiaryWithdrawsLiquid => "beneficiary withdraws liquid",
            Scenario::CreateAndRemoveIndexFund => "create and remove index fund",
            Scenario::UpdateFundMembers => "update fund members",
            Scenario::QueryRegistrar => "query registrar",
            Scenario::QueryIndexFund => "query index fund",
            Scenario::QueryAccounts => "query accounts",
            Scenario::QueryMultisig => "query multisig",
            Scenario::QueryVaults => "query vaults",
            Scenario::AirdropClaim => "HALO airdrop claim",
            Scenario::GovStake => "HALO gov stake",
            Scenario::StakingBond => "HALO staking bond",
            Scenario::CollectorSweep => "HALO collector sweep",
            Scenario::HaloQueries => "HALO queries",
        }
    }

    pub async fn run(self, ctx: &mut TestContext) -> Result<(), ScenarioError> {
        match self {
            Scenario::AddApTeamMember => core_protocol::add_ap_team_member(ctx).await,
            Scenario::UpdateRegistrarConfig => core_protocol::update_registrar_config(ctx).await,
            Scenario::RejectUnapprovedDonation => {
                core_protocol::reject_unapproved_donation(ctx).await
            }
            Scenario::DonorDepositToIndexFund => {
                core_protocol::donor_deposit_to_index_fund(ctx).await
            }
            Scenario::TcaDepositToIndexFund => core_protocol::tca_deposit_to_index_fund(ctx).await,
            Scenario::CharityUpdatesStrategies => {
                core_protocol::charity_updates_strategies(ctx).await
            }
            Scenario::BeneficiaryWithdrawsLiquid => {
                core_protocol::beneficiary_withdraws_liquid(ctx).await
            }
            Scenario::CreateAndRemoveIndexFund => {
                core_protocol::create_and_remove_index_fund(ctx).await
            }
            Scenario::UpdateFundMembers => core_protocol::update_fund_members(ctx).await,
            Scenario::QueryRegistrar => core_protocol::query_registrar(ctx).await,
            Scenario::QueryIndexFund => core_protocol::query_index_fund(ctx).await,
            Scenario::QueryAccounts => core_protocol::query_accounts(ctx).await,
            Scenario::QueryMultisig => core_protocol::query_multisig(ctx).await,
            Scenario::QueryVaults => core_protocol::query_vaults(ctx).await,
            Scenario::AirdropClaim => halo::airdrop_claim(ctx).await,
            Scenario::GovStake => halo::gov_stake(ctx).await,
            Scenario::StakingBond => halo::staking_bond(ctx).await,
            Scenario::CollectorSweep => halo::collector_sweep(ctx).await,
            Scenario::HaloQueries => halo::halo_queries(ctx).await,
        }
    }
}

/// An ordered list of scenarios.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suite {
    pub name: String,
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new<S: Into<String>>(name: S, scenarios: Vec<Scenario>) -> Self {
        Self {
            name: name.into(),
            scenarios,
        }
    }

    pub fn core() -> Self {
        Self::new("core", Scenario::CORE.to_vec())
    }

    pub fn halo() -> Self {
        Self::new("halo", Scenario::HALO.to_vec())
    }

    pub fn all() -> Self {
        let mut scenarios = Scenario::CORE.to_vec();
        scenarios.extend(Scenario::HALO);
        Self::new("all", scenarios)
    }

    /// `core`, `halo` or `all`.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "core" => Some(Self::core()),
            "halo" => Some(Self::halo()),
            "all" => Some(Self::all()),
            _ => None,
        }
    }

    /// Runs every scenario in order. A failing scenario is logged and
    /// recorded; the ones after it still run.
    pub async fn run(&self, ctx: &mut TestContext) -> SuiteReport {
        let mut report = SuiteReport::default();

        for scenario in &self.scenarios {
            let name = scenario.name();
            info!("running scenario: {}", name);

            match scenario.run(ctx).await {
                Ok(()) => {
                    info!("scenario passed: {}", name);
                    report.passed.push(name.to_string());
                }
                Err(e) => {
                    error!("scenario failed: {}: {}", name, e);
                    report.failed.push((name.to_string(), e.to_string()));
                }
            }
        }

        report
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: Vec<String>,
    // scenario name, error
    pub failed: Vec<(String, String)>,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} passed, {} failed",
            self.passed.len(),
            self.failed.len()
        )?;
        for (name, err) in &self.failed {
            writeln!(f, "  FAILED {}: {}", name, err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::ChainResponse;
    use crate::client::cosmwasm::CosmWasmClient;
    use crate::client::error::ClientError;
    use crate::config::cfg::{ChainCfg, Config};
    use crate::config::wallets::Wallets;
    use crate::orchestrator::deploy::ContractMap;
    use crate::orchestrator::orc::Orchestrator;
    use crate::protocol::{
        ACCOUNTS, CW3_AP_TEAM, CW4_AP_TEAM, INDEX_FUND, REGISTRAR, VAULT_1,
    };
    use serde_json::{json, Value};

    const MNEMONIC: &str = "clip hire initial neck maid actor venue client foam budget lock catalog sweet steak waste crater broccoli pipe steak sister coyote moment obvious choose";

    fn chain_cfg() -> ChainCfg {
        ChainCfg {
            denom: "ujunox".to_string(),
            prefix: "juno".to_string(),
            chain_id: "testing".to_string(),
            rpc_endpoint: "http://localhost:26657".to_string(),
            grpc_endpoint: "http://localhost:9090".to_string(),
            gas_prices: 0.1,
            gas_adjustment: 1.5,
        }
    }

    fn config() -> Config {
        let accounts: serde_json::Map<String, Value> = [
            "ap_team", "ap_team_2", "ap_team_3", "ap_treasury", "charity_1", "charity_2",
            "charity_3", "pleb", "tca",
        ]
        .iter()
        .map(|a| (a.to_string(), json!(MNEMONIC)))
        .collect();

        serde_json::from_value(json!({
            "network": "local",
            "chain_cfg": chain_cfg(),
            "accounts": accounts,
        }))
        .unwrap()
    }

    fn rejected() -> ClientError {
        ClientError::CosmosSdk {
            res: ChainResponse {
                log: "out of gas".to_string(),
                ..Default::default()
            },
        }
    }

    fn failing_chain() -> CosmWasmClient {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.chain_cfg).then(|_| chain_cfg());
        faux::when!(client.query).then(|_| Err(rejected()));
        faux::when!(client.balance).then(|_| Err(rejected()));
        unsafe {
            faux::when!(client.execute).then_unchecked(|_| Err(rejected()));
            faux::when!(client.execute_batch).then_unchecked(|_| Err(rejected()));
            faux::when!(client.send).then_unchecked(|_| Err(rejected()));
        }
        client
    }

    fn deployed() -> ContractMap {
        let mut map = ContractMap::default();
        map.register_contract(ACCOUNTS, 3);
        for (name, addr) in [
            (REGISTRAR, "juno1registrar"),
            (INDEX_FUND, "juno1fund"),
            (VAULT_1, "juno1vault1"),
            (CW3_AP_TEAM, "juno1cw3"),
            (CW4_AP_TEAM, "juno1cw4"),
            ("endowment_charity_1", "juno1endow1"),
        ] {
            map.add_address(name, addr);
        }
        map
    }

    fn context() -> TestContext {
        let cfg = config();
        let wallets = Wallets::from_config(&cfg).unwrap();
        let orc = Orchestrator::mock(failing_chain(), deployed());
        TestContext::new(orc, cfg, wallets)
    }

    #[test]
    fn suites_by_name() {
        assert_eq!(Suite::by_name("core"), Some(Suite::core()));
        assert_eq!(Suite::by_name("halo").unwrap().scenarios, Scenario::HALO.to_vec());
        assert_eq!(
            Suite::by_name("all").unwrap().scenarios.len(),
            Scenario::CORE.len() + Scenario::HALO.len()
        );
        assert_eq!(Suite::by_name("gas"), None);
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_suite() {
        let mut ctx = context();
        assert!(ctx.core.is_some());
        assert!(ctx.halo.is_none());

        let suite = Suite::all();
        let report = suite.run(&mut ctx).await;

        assert!(!report.is_success());
        assert!(report.passed.is_empty());
        let failed: Vec<&str> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
        let expected: Vec<&str> = suite.scenarios.iter().map(|s| s.name()).collect();
        assert_eq!(failed, expected);
    }

    #[tokio::test]
    async fn missing_halo_deployment_is_reported() {
        let mut ctx = context();
        let report = Suite::new("gov", vec![Scenario::GovStake]).run(&mut ctx).await;

        assert_eq!(
            report.failed,
            vec![(
                "HALO gov stake".to_string(),
                "missing HALO deployment".to_string()
            )]
        );
        assert_eq!(report.to_string(), "0 passed, 1 failed\n  FAILED HALO gov stake: missing HALO deployment\n");
    }
}
