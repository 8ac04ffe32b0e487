//! Integration test scenarios run against a deployed protocol.
//!
//! A scenario drives the contracts through the [Orchestrator] as the signers
//! of [Wallets] and checks the resulting chain state. Scenarios are grouped
//! into a [Suite](suite::Suite) which keeps going after a failure and reports
//! every outcome at the end.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::chain_res::ExecResponse;
use crate::config::cfg::{Coin, Config};
use crate::config::wallets::Wallets;
use crate::orchestrator::orc::Orchestrator;
use crate::processes::error::DeployError;
use crate::processes::halo::HaloContracts;
use crate::processes::multisig::send_via_multisig;
use crate::processes::setup::CoreContracts;

use self::error::ScenarioError;

pub mod assert;

pub mod core_protocol;

pub mod error;

pub mod halo;

pub mod suite;

/// Everything a scenario needs: the orchestrator holding the deployment, the
/// loaded config and the signers.
#[derive(Debug)]
pub struct TestContext {
    pub orc: Orchestrator,
    pub cfg: Config,
    pub wallets: Wallets,
    pub prefix: String,
    pub denom: String,
    pub core: Option<CoreContracts>,
    pub halo: Option<HaloContracts>,
}

impl TestContext {
    /// Reads the core and HALO deployments from the orchestrator's contract
    /// map. Either may be missing; scenarios that need it then fail.
    pub fn new(orc: Orchestrator, cfg: Config, wallets: Wallets) -> Self {
        let chain = orc.chain_cfg();
        let core = CoreContracts::from_orchestrator(&orc).ok();
        let halo = HaloContracts::from_orchestrator(&orc).ok();
        Self {
            orc,
            cfg,
            wallets,
            prefix: chain.prefix,
            denom: chain.denom,
            core,
            halo,
        }
    }

    pub fn core(&self) -> Result<&CoreContracts, ScenarioError> {
        self.core
            .as_ref()
            .ok_or_else(|| ScenarioError::missing("core protocol deployment"))
    }

    pub fn halo(&self) -> Result<&HaloContracts, ScenarioError> {
        self.halo
            .as_ref()
            .ok_or_else(|| ScenarioError::missing("HALO deployment"))
    }

    /// Address of the signer named `name`.
    pub fn address(&self, name: &str) -> Result<String, ScenarioError> {
        Ok(self.wallets.require(name)?.address(&self.prefix)?)
    }

    /// `amount` of the chain's native denom.
    pub fn coins(&self, amount: u64) -> Vec<Coin> {
        vec![Coin::new(amount, &self.denom)]
    }

    pub async fn query<R, M>(&self, contract_name: &str, msg: &M) -> Result<R, ScenarioError>
    where
        R: DeserializeOwned,
        M: Serialize,
    {
        let res = self.orc.query(contract_name, msg).await?;
        Ok(res.data()?)
    }

    /// Executes `msg` on `target` through the AP team multisig with every
    /// configured AP team member voting.
    pub async fn via_multisig<T: Serialize>(
        &mut self,
        target: &str,
        title: &str,
        msg: &T,
    ) -> Result<ExecResponse, DeployError> {
        let voters = self.wallets.ap_team_members();
        send_via_multisig(
            &mut self.orc,
            &self.wallets.ap_team,
            &voters,
            target,
            title,
            msg,
            vec![],
        )
        .await
    }
}
