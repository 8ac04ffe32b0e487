use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::Location;

use crate::client::chain_res::ChainResponse;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CommandType {
    Store,
    Instantiate,
    Execute,
    Migrate,
}

/// Source location of the harness code that sent a tx.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallLoc {
    pub file: String,
    pub line: u32,
}

impl From<&Location<'_>> for CallLoc {
    fn from(loc: &Location<'_>) -> CallLoc {
        CallLoc {
            file: loc.file().to_string(),
            line: loc.line(),
        }
    }
}

/// Records the gas each deployment or test step spent, per contract.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GasProfiler {
    report: Report,
}

pub type Report = BTreeMap<String, BTreeMap<String, GasReport>>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GasReport {
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub file_name: String,
    pub line_number: u32,
}

impl GasProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instrument(
        &mut self,
        contract: String,
        op_name: String,
        op_type: CommandType,
        response: &ChainResponse,
        caller_loc: &CallLoc,
    ) {
        let op_key = format!("{op_type:?}__{op_name}");

        let m = self.report.entry(contract).or_default();
        m.insert(
            op_key,
            GasReport {
                gas_used: response.gas_used,
                gas_wanted: response.gas_wanted,
                file_name: caller_loc.file.clone(),
                line_number: caller_loc.line,
            },
        );
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Total gas used across every recorded operation.
    pub fn total_gas_used(&self) -> u64 {
        self.report
            .values()
            .flat_map(|ops| ops.values())
            .map(|r| r.gas_used)
            .sum()
    }
}
