//! Multi step deployments built on the [Orchestrator](crate::orchestrator::orc::Orchestrator).

use log::debug;

use crate::client::chain_res::ExecResponse;
use crate::config::key::SigningKey;
use crate::orchestrator::batch::Batch;
use crate::orchestrator::error::ProcessError;
use crate::orchestrator::orc::Orchestrator;

pub mod error;

pub mod halo;

pub mod migrate;

pub mod multisig;

pub mod setup;

/// Sends `batch` unless it is empty; a tx without messages is invalid.
pub(crate) async fn execute_batch(
    orc: &mut Orchestrator,
    batch: Batch,
    key: &SigningKey,
) -> Result<Option<ExecResponse>, ProcessError> {
    if batch.is_empty() {
        debug!("skipping empty batch");
        return Ok(None);
    }
    orc.execute_batch(batch, key).await.map(Some)
}
