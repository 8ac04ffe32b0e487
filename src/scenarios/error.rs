use thiserror::Error;

use crate::client::error::{ClientError, DeserializeError};
use crate::config::error::ConfigError;
use crate::orchestrator::error::{ContractMapError, ProcessError};
use crate::processes::error::DeployError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssertionError {
    #[error("{what}: expected {expected}, got {actual}")]
    NotEqual {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("{what}: condition does not hold")]
    Failed { what: String },

    #[error("{what}: expected the chain to reject the tx but it was accepted")]
    NotRejected { what: String },
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    AssertionError(#[from] AssertionError),

    #[error("missing {what}")]
    Missing { what: String },

    #[error(transparent)]
    DeployError(#[from] DeployError),

    #[error(transparent)]
    ProcessError(#[from] ProcessError),

    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error(transparent)]
    ContractMapError(#[from] ContractMapError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    DeserializeError(#[from] DeserializeError),

    #[error("serde json serialization error")]
    JsonSerialize(#[from] serde_json::Error),
}

impl ScenarioError {
    pub fn missing<S: Into<String>>(what: S) -> ScenarioError {
        ScenarioError::Missing { what: what.into() }
    }
}
