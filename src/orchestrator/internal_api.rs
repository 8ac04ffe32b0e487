use log::{debug, info, warn};
use serde::Serialize;
use std::env::consts::ARCH;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout as _timeout;

use super::batch::Batch;
use super::error::{PollBlockError, ProcessError, StoreError};
use super::gas_profiler::{CallLoc, CommandType, GasProfiler};
use crate::client::chain_res::{
    ExecResponse, InstantiateResponse, MigrateResponse, QueryResponse, StoreCodeResponse,
};
use crate::client::cosmwasm::CosmWasmClient;
use crate::config::cfg::Coin;
use crate::config::key::SigningKey;
use crate::orchestrator::deploy::ContractMap;

// Internal implementation details behind the public Orchestrator API

/// Contract name for a wasm artifact: the file stem, minus the
/// `-<arch>` suffix non-x86 optimizer builds append.
pub(crate) fn contract_name(wasm_path: &Path) -> Result<String, StoreError> {
    let contract = wasm_path
        .file_stem()
        .ok_or(StoreError::InvalidWasmFileName)?
        .to_str()
        .ok_or(StoreError::InvalidWasmFileName)?;

    let arch_suffix = format!("-{}", ARCH);
    Ok(contract.trim_end_matches(&arch_suffix).to_string())
}

/// Every `*.wasm` file in `wasm_dir`, sorted so uploads happen in a stable order.
pub(crate) fn wasm_files(wasm_dir: &str) -> Result<Vec<std::path::PathBuf>, StoreError> {
    let mut paths = vec![];
    for entry in fs::read_dir(Path::new(wasm_dir)).map_err(StoreError::wasmdir)? {
        let path = entry?.path();
        if path.extension() == Some(OsStr::new("wasm")) {
            paths.push(path);
        } else {
            debug!("skipping non wasm file {:?}", path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub(crate) async fn store_contracts(
    contract_map: &mut ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    wasm_dir: &str,
    key: &SigningKey,
    caller_loc: &CallLoc,
) -> Result<Vec<StoreCodeResponse>, StoreError> {
    let wasm_paths = wasm_files(wasm_dir)?;
    if wasm_paths.is_empty() {
        warn!("no wasm files found in {}", wasm_dir);
    }

    let mut responses = vec![];
    for wasm_path in wasm_paths {
        let contract = contract_name(&wasm_path)?;
        let res = store_contract(
            contract_map,
            client,
            gas_profiler,
            &contract,
            &wasm_path,
            key,
            caller_loc,
        )
        .await?;
        responses.push(res);
    }
    Ok(responses)
}

pub(crate) async fn store_contract(
    contract_map: &mut ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    contract_name: &str,
    wasm_path: &Path,
    key: &SigningKey,
    caller_loc: &CallLoc,
) -> Result<StoreCodeResponse, StoreError> {
    info!("Storing {:?} as {}", wasm_path, contract_name);

    let wasm = fs::read(wasm_path).map_err(StoreError::wasmfile)?;

    let res = client.store(wasm, key).await?;

    contract_map.register_contract(contract_name, res.code_id);

    if let Some(p) = gas_profiler {
        p.instrument(
            contract_name.to_string(),
            "Store".to_string(),
            CommandType::Store,
            &res.res,
            caller_loc,
        );
    }

    info!("{} stored with code id {}", contract_name, res.code_id);

    Ok(res)
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn instantiate<T: Serialize>(
    contract_map: &mut ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    code_name: String,
    instance_name: String,
    op_name: String,
    label: String,
    msg: &T,
    key: &SigningKey,
    admin: Option<String>,
    funds: Vec<Coin>,
    caller_loc: &CallLoc,
) -> Result<InstantiateResponse, ProcessError> {
    let code_id = contract_map.code_id(&code_name)?;

    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client
        .instantiate(code_id, payload, key, label, admin, funds)
        .await?;

    contract_map.add_address(&instance_name, res.address.clone());

    if let Some(p) = gas_profiler {
        p.instrument(
            instance_name.clone(),
            op_name,
            CommandType::Instantiate,
            &res.res,
            caller_loc,
        );
    }

    info!("{} instantiated at {}", instance_name, res.address);
    debug!("{:?}", res.res);

    Ok(res)
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn execute<T: Serialize>(
    contract_map: &ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    contract_name: String,
    op_name: String,
    msg: &T,
    key: &SigningKey,
    funds: Vec<Coin>,
    caller_loc: &CallLoc,
) -> Result<ExecResponse, ProcessError> {
    let addr = contract_map.address(&contract_name)?;

    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client.execute(addr, payload, key, funds).await?;

    if let Some(p) = gas_profiler {
        p.instrument(
            contract_name,
            op_name,
            CommandType::Execute,
            &res.res,
            caller_loc,
        );
    }

    debug!("{:?}", res.res);

    Ok(res)
}

pub(crate) async fn execute_batch(
    contract_map: &ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    batch: Batch,
    key: &SigningKey,
    caller_loc: &CallLoc,
) -> Result<ExecResponse, ProcessError> {
    let op_name = batch.op_name();
    let contract_name = batch.first_contract().unwrap_or_default().to_string();

    let msgs = batch.resolve(contract_map)?;

    let res = client.execute_batch(msgs, key).await?;

    if let Some(p) = gas_profiler {
        p.instrument(
            contract_name,
            op_name,
            CommandType::Execute,
            &res.res,
            caller_loc,
        );
    }

    debug!("{:?}", res.res);

    Ok(res)
}

pub(crate) async fn query<T: Serialize>(
    contract_map: &ContractMap,
    client: &CosmWasmClient,
    contract_name: String,
    msg: &T,
) -> Result<QueryResponse, ProcessError> {
    let addr = contract_map.address(&contract_name)?;

    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client.query(addr, payload).await?;

    debug!("{:?}", res.res);

    Ok(res)
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn migrate<T: Serialize>(
    contract_map: &mut ContractMap,
    client: &CosmWasmClient,
    gas_profiler: &mut Option<GasProfiler>,
    contract_name: String,
    new_code_id: u64,
    op_name: String,
    msg: &T,
    key: &SigningKey,
    caller_loc: &CallLoc,
) -> Result<MigrateResponse, ProcessError> {
    let addr = contract_map.address(&contract_name)?;

    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client.migrate(addr, new_code_id, payload, key).await?;

    contract_map.register_contract(&contract_name, new_code_id);

    if let Some(p) = gas_profiler {
        p.instrument(
            contract_name,
            op_name,
            CommandType::Migrate,
            &res.res,
            caller_loc,
        );
    }

    debug!("{:?}", res.res);

    Ok(res)
}

pub(crate) async fn poll_for_n_blocks<T: Into<Duration> + Send>(
    client: &CosmWasmClient,
    n: u64,
    timeout: T,
    is_first_block: bool,
) -> Result<(), PollBlockError> {
    _timeout(timeout.into(), client.poll_for_n_blocks(n, is_first_block)).await??;

    Ok(())
}
