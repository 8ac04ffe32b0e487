use thiserror::Error;

use crate::airdrop::AirdropError;
use crate::client::error::{ClientError, DeserializeError};
use crate::config::error::ConfigError;
use crate::orchestrator::error::{ContractMapError, ProcessError, StateError, StoreError};
use crate::orchestrator::sequence::StepError;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    ProcessError(#[from] ProcessError),

    #[error(transparent)]
    ContractMapError(#[from] ContractMapError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    AirdropError(#[from] AirdropError),

    #[error(transparent)]
    StepError(#[from] StepError),

    #[error(transparent)]
    DeserializeError(#[from] DeserializeError),

    #[error("no {key:?} attribute in {event:?} event")]
    MissingAttribute { event: String, key: String },

    #[error("malformed {key:?} attribute: {value:?}")]
    MalformedAttribute { key: String, value: String },

    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },
}

impl DeployError {
    pub fn missing_attribute(event: &str, key: &str) -> DeployError {
        DeployError::MissingAttribute {
            event: event.to_string(),
            key: key.to_string(),
        }
    }

    pub fn json(e: serde_json::Error) -> DeployError {
        DeployError::JsonSerialize { source: e }
    }

    /// True when the chain rejected a tx somewhere below this error.
    pub fn is_chain_rejection(&self) -> bool {
        match self {
            DeployError::ClientError(e) => e.is_chain_rejection(),
            DeployError::ProcessError(e) => e.is_chain_rejection(),
            DeployError::StepError(e) => {
                let source = &e.source;
                if let Some(e) = source.downcast_ref::<DeployError>() {
                    e.is_chain_rejection()
                } else if let Some(e) = source.downcast_ref::<ProcessError>() {
                    e.is_chain_rejection()
                } else if let Some(e) = source.downcast_ref::<ClientError>() {
                    e.is_chain_rejection()
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}
