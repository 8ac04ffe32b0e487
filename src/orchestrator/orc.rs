use serde::Serialize;
use std::fmt::{self, Debug};
use std::future::Future;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::chain_res::{
    ExecResponse, InstantiateResponse, MigrateResponse, QueryResponse, StoreCodeResponse,
};
use crate::client::cosmwasm::CosmWasmClient;
use crate::client::error::ClientError;
use crate::config::cfg::{ChainCfg, Coin};
use crate::config::key::SigningKey;
use crate::orchestrator::batch::Batch;
use crate::orchestrator::deploy::ContractMap;
use crate::orchestrator::error::{
    ContractMapError, InitError, PollBlockError, ProcessError, StateError, StoreError,
};
use crate::orchestrator::gas_profiler::{CallLoc, GasProfiler, Report};
use crate::orchestrator::internal_api;

#[cfg(not(test))]
use crate::config::cfg::Config;

/// Stores the endowment contracts and executes their messages against the configured chain.
///
/// Contracts are referred to by name. Code ids are recorded under the wasm
/// file name (`registrar`, `accounts`, ...), addresses under the instance
/// name, which is the same as the code name unless set through
/// [Self::instantiate_as()].
pub struct Orchestrator {
    pub contract_map: ContractMap,
    client: CosmWasmClient,
    gas_profiler: Option<GasProfiler>,
    label_prefix: String,
    state_file: Option<PathBuf>,
}

impl Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.contract_map)
    }
}

impl Orchestrator {
    /// Creates an Orchestrator from the supplied Config,
    /// optionally using a gas profiler.
    ///
    /// Deploy info from the state file, if one exists, takes precedence over
    /// `contract_deploy_info` in the config.
    #[cfg(not(test))]
    pub fn new(cfg: &Config, use_gas_profiler: bool) -> Result<Self, InitError> {
        let mut contract_map = ContractMap::new(cfg.contract_deploy_info.clone());
        let state_file = cfg.state_file.as_ref().map(PathBuf::from);
        if let Some(path) = &state_file {
            contract_map.merge(ContractMap::load(path)?);
        }

        Ok(Self {
            contract_map,
            client: CosmWasmClient::new(cfg.chain_cfg.clone())?,
            gas_profiler: use_gas_profiler.then(GasProfiler::new),
            label_prefix: cfg.protocol.label_prefix.clone(),
            state_file,
        })
    }

    #[cfg(test)]
    pub(crate) fn mock(client: CosmWasmClient, contract_map: ContractMap) -> Self {
        Self {
            contract_map,
            client,
            gas_profiler: Some(GasProfiler::new()),
            label_prefix: "test".to_string(),
            state_file: None,
        }
    }

    pub fn chain_cfg(&self) -> ChainCfg {
        self.client.chain_cfg()
    }

    /// Uploads every `*.wasm` in `wasm_dir` to the configured chain
    /// saving the resulting code ids in `contract_map`.
    ///
    /// NOTE: The wasm file name (without an `-<arch>` suffix) becomes the
    /// contract name used by `instantiate()`, `query()` and `execute()`.
    #[track_caller]
    pub fn store_contracts<'a>(
        &'a mut self,
        wasm_dir: &'a str,
        key: &'a SigningKey,
    ) -> impl Future<Output = Result<Vec<StoreCodeResponse>, StoreError>> + 'a {
        let caller: CallLoc = Location::caller().into();
        async move {
            internal_api::store_contracts(
                &mut self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                wasm_dir,
                key,
                &caller,
            )
            .await
        }
    }

    /// Uploads a single wasm file under `contract_name`.
    #[track_caller]
    pub fn store_contract<'a, P: AsRef<Path>>(
        &'a mut self,
        contract_name: &'a str,
        wasm_path: P,
        key: &'a SigningKey,
    ) -> impl Future<Output = Result<StoreCodeResponse, StoreError>> + 'a {
        let caller: CallLoc = Location::caller().into();
        let wasm_path = wasm_path.as_ref().to_path_buf();
        async move {
            internal_api::store_contract(
                &mut self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                contract_name,
                &wasm_path,
                key,
                &caller,
            )
            .await
        }
    }

    /// Initializes a smart contract against the configured chain.
    ///
    /// # Arguments
    /// * `contract_name` - Stored smart contract name for the corresponding `msg`.
    /// * `op_name` - Human readable operation name for profiling bookkeeping usage.
    /// * `msg` - InstantiateMsg that `contract_name` supports.
    /// * `key` - SigningKey used to sign the tx.
    /// * `admin` - Optional admin address for contract migration.
    /// * `funds` - Optional tokens transferred to the contract after instantiation.
    ///
    /// # Errors
    /// * If `contract_name` has not been configured or stored through
    ///   [Self::store_contracts()] `ContractMapError::NotStored` is returned.
    #[track_caller]
    pub fn instantiate<'a, S, T>(
        &'a mut self,
        contract_name: S,
        op_name: S,
        msg: &'a T,
        key: &'a SigningKey,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> impl Future<Output = Result<InstantiateResponse, ProcessError>> + 'a
    where
        S: Into<String>,
        T: Serialize,
    {
        let contract_name: String = contract_name.into();
        self.instantiate_as(
            contract_name.clone(),
            contract_name,
            op_name.into(),
            msg,
            key,
            admin,
            funds,
        )
    }

    /// Like [Self::instantiate()], but records the new address under
    /// `instance_name` so one stored code can back several instances.
    #[track_caller]
    #[allow(clippy::too_many_arguments)]
    pub fn instantiate_as<'a, S, T>(
        &'a mut self,
        code_name: S,
        instance_name: S,
        op_name: S,
        msg: &'a T,
        key: &'a SigningKey,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> impl Future<Output = Result<InstantiateResponse, ProcessError>> + 'a
    where
        S: Into<String>,
        T: Serialize,
    {
        let caller: CallLoc = Location::caller().into();
        let (code_name, instance_name, op_name) =
            (code_name.into(), instance_name.into(), op_name.into());
        let label = format!("{} {}", self.label_prefix, instance_name);
        async move {
            internal_api::instantiate(
                &mut self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                code_name,
                instance_name,
                op_name,
                label,
                msg,
                key,
                admin,
                funds,
                &caller,
            )
            .await
        }
    }

    /// Executes a smart contract operation against the configured chain.
    ///
    /// # Errors
    /// * If `contract_name` has no known address
    ///   `ContractMapError::NotDeployed` is returned.
    #[track_caller]
    pub fn execute<'a, S, T>(
        &'a mut self,
        contract_name: S,
        op_name: S,
        msg: &'a T,
        key: &'a SigningKey,
        funds: Vec<Coin>,
    ) -> impl Future<Output = Result<ExecResponse, ProcessError>> + 'a
    where
        S: Into<String>,
        T: Serialize,
    {
        let caller: CallLoc = Location::caller().into();
        let (contract_name, op_name) = (contract_name.into(), op_name.into());
        async move {
            internal_api::execute(
                &self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                contract_name,
                op_name,
                msg,
                key,
                funds,
                &caller,
            )
            .await
        }
    }

    /// Executes every message of `batch` in one tx.
    #[track_caller]
    pub fn execute_batch<'a>(
        &'a mut self,
        batch: Batch,
        key: &'a SigningKey,
    ) -> impl Future<Output = Result<ExecResponse, ProcessError>> + 'a {
        let caller: CallLoc = Location::caller().into();
        async move {
            internal_api::execute_batch(
                &self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                batch,
                key,
                &caller,
            )
            .await
        }
    }

    /// Queries a smart contract against the configured chain.
    pub async fn query<S, T>(&self, contract_name: S, msg: &T) -> Result<QueryResponse, ProcessError>
    where
        S: Into<String>,
        T: Serialize,
    {
        internal_api::query(&self.contract_map, &self.client, contract_name.into(), msg).await
    }

    /// Migrates a smart contract deployed at `contract_name` to `new_code_id`
    #[track_caller]
    pub fn migrate<'a, S, T>(
        &'a mut self,
        contract_name: S,
        new_code_id: u64,
        op_name: S,
        msg: &'a T,
        key: &'a SigningKey,
    ) -> impl Future<Output = Result<MigrateResponse, ProcessError>> + 'a
    where
        S: Into<String>,
        T: Serialize,
    {
        let caller: CallLoc = Location::caller().into();
        let (contract_name, op_name) = (contract_name.into(), op_name.into());
        async move {
            internal_api::migrate(
                &mut self.contract_map,
                &self.client,
                &mut self.gas_profiler,
                contract_name,
                new_code_id,
                op_name,
                msg,
                key,
                &caller,
            )
            .await
        }
    }

    /// Sends native tokens from `key` to `to`.
    pub async fn send(
        &self,
        to: &str,
        amount: Vec<Coin>,
        key: &SigningKey,
    ) -> Result<ExecResponse, ClientError> {
        self.client.send(to.to_string(), amount, key).await
    }

    /// Native token balance of an address.
    pub async fn balance(&self, address: &str, denom: &str) -> Result<u128, ClientError> {
        self.client
            .balance(address.to_string(), denom.to_string())
            .await
    }

    /// Blocks until `n` blocks have been processed.
    /// # Arguments
    /// * `n` - Wait for this number of blocks to process
    /// * `timeout` - Returns `PollBlockError` once `timeout` has elapsed.
    /// * `is_first_block` - Set to true if waiting for the first block to process for new test nodes.
    pub async fn poll_for_n_blocks<T: Into<Duration> + Send>(
        &self,
        n: u64,
        timeout: T,
        is_first_block: bool,
    ) -> Result<(), PollBlockError> {
        internal_api::poll_for_n_blocks(&self.client, n, timeout, is_first_block).await
    }

    /// Records an address learned from a tx log, e.g. an endowment the
    /// registrar instantiated.
    pub fn register_address<S: Into<String>>(&mut self, name: &str, address: S) {
        self.contract_map.add_address(name, address);
    }

    pub fn address(&self, name: &str) -> Result<String, ContractMapError> {
        self.contract_map.address(name)
    }

    pub fn code_id(&self, name: &str) -> Result<u64, ContractMapError> {
        self.contract_map.code_id(name)
    }

    /// Writes the contract map to the configured state file, if any.
    pub fn save_state(&self) -> Result<(), StateError> {
        match &self.state_file {
            Some(path) => self.contract_map.save(path),
            None => Ok(()),
        }
    }

    /// Get gas usage report
    pub fn gas_profiler_report(&self) -> Option<&Report> {
        self.gas_profiler.as_ref().map(|p| p.report())
    }
}
