use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::error::{ContractMapError, StateError};

pub type ContractName = String;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContractMap {
    map: HashMap<ContractName, DeployInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployInfo {
    pub code_id: Option<u64>,
    pub address: Option<String>,
}

impl ContractMap {
    /// Creates a new ContractMap from an existing configured ContractMap
    pub fn new(contract_deploys: HashMap<ContractName, DeployInfo>) -> Self {
        Self {
            map: contract_deploys,
        }
    }

    /// Loads a ContractMap saved with [Self::save()].
    /// A missing file is an empty map.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read(path).map_err(StateError::io)?;
        let map: HashMap<ContractName, DeployInfo> =
            serde_json::from_slice(&raw).map_err(StateError::json)?;

        Ok(Self::new(map))
    }

    /// Writes the map as pretty json, sorted by contract name so that
    /// committed state files diff cleanly.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(StateError::io)?;
        }

        let sorted: BTreeMap<&ContractName, &DeployInfo> = self.map.iter().collect();
        let json = serde_json::to_vec_pretty(&sorted).map_err(StateError::json)?;
        fs::write(path, json).map_err(StateError::io)?;

        Ok(())
    }

    /// Overlays `other` onto this map. Values present in `other` win.
    pub fn merge(&mut self, other: ContractMap) {
        for (name, info) in other.map {
            let entry = self.map.entry(name).or_default();
            if info.code_id.is_some() {
                entry.code_id = info.code_id;
            }
            if info.address.is_some() {
                entry.address = info.address;
            }
        }
    }

    /// Registers a new code id and contract name with the contract map
    pub fn register_contract<S: Into<String>>(&mut self, name: S, code_id: u64) {
        self.map.entry(name.into()).or_default().code_id = Some(code_id);
    }

    /// Returns the stored code id for a given contract name
    pub fn code_id(&self, name: &str) -> Result<u64, ContractMapError> {
        self.map
            .get(name)
            .and_then(|info| info.code_id)
            .ok_or(ContractMapError::NotStored { name: name.into() })
    }

    /// Returns the stored contract address for a given contract name
    pub fn address(&self, name: &str) -> Result<String, ContractMapError> {
        self.map
            .get(name)
            .ok_or(ContractMapError::NotStored { name: name.into() })?
            .address
            .clone()
            .ok_or(ContractMapError::NotDeployed { name: name.into() })
    }

    /// Registers a contract address with an already stored contract
    pub fn add_address<S: Into<String>>(&mut self, name: &str, address: S) {
        self.map.entry(name.into()).or_default().address = Some(address.into());
    }

    /// Returns current deploy info
    pub fn deploy_info(&self) -> &HashMap<String, DeployInfo> {
        &self.map
    }
}
