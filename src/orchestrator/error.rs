use thiserror::Error;

use crate::client::error::ClientError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("error reading wasm_dir")]
    WasmDirRead { source: std::io::Error },

    #[error("error reading wasm file")]
    WasmFileRead { source: std::io::Error },

    #[error("wasm contract file name was not valid utf8 or malformed")]
    InvalidWasmFileName,

    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl StoreError {
    pub fn wasmdir(e: std::io::Error) -> StoreError {
        StoreError::WasmDirRead { source: e }
    }

    pub fn wasmfile(e: std::io::Error) -> StoreError {
        StoreError::WasmFileRead { source: e }
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },

    #[error(transparent)]
    ContractMapError(#[from] ContractMapError),

    #[error(transparent)]
    ClientError(#[from] ClientError),
}

impl ProcessError {
    pub fn json(e: serde_json::Error) -> ProcessError {
        ProcessError::JsonSerialize { source: e }
    }

    /// True when the chain rejected the message, see [ClientError::is_chain_rejection()].
    pub fn is_chain_rejection(&self) -> bool {
        matches!(self, ProcessError::ClientError(e) if e.is_chain_rejection())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContractMapError {
    #[error("smart contract not stored on chain: {name:?}")]
    NotStored { name: String },

    #[error("smart contract with addr not initialized on chain: {name:?}")]
    NotDeployed { name: String },
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error("error reading or writing state file")]
    Io { source: std::io::Error },

    #[error("malformed state file")]
    Json { source: serde_json::Error },
}

impl StateError {
    pub fn io(e: std::io::Error) -> StateError {
        StateError::Io { source: e }
    }

    pub fn json(e: serde_json::Error) -> StateError {
        StateError::Json { source: e }
    }
}

#[derive(Error, Debug)]
pub enum PollBlockError {
    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error("timed out waiting for blocks")]
    Timeout(#[from] tokio::time::error::Elapsed),
}

#[derive(Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error(transparent)]
    StateError(#[from] StateError),
}
