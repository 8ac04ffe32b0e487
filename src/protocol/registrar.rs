use cosmwasm_std::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SplitDetails {
    pub max: Decimal,
    pub min: Decimal,
    pub default: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub accounts_code_id: Option<u64>,
    pub treasury: String,
    pub tax_rate: Decimal,
    pub default_vault: Option<String>,
    pub split_to_liquid: Option<SplitDetails>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    CreateEndowment(CreateEndowmentMsg),
    UpdateEndowmentStatus(UpdateEndowmentStatusMsg),
    VaultAdd(VaultAddMsg),
    VaultUpdateStatus { vault_addr: String, approved: bool },
    UpdateConfig(UpdateConfigMsg),
    UpdateOwner { new_owner: String },
    /// Migrates every endowment to the registrar's current `accounts_code_id`.
    MigrateAccounts {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreateEndowmentMsg {
    pub owner: String,
    pub beneficiary: String,
    pub name: String,
    pub description: String,
    pub withdraw_before_maturity: bool,
    pub maturity_time: Option<u64>,
    pub maturity_height: Option<u64>,
    pub split_max: Decimal,
    pub split_min: Decimal,
    pub split_default: Decimal,
}

/// Endowment status codes understood by `update_endowment_status`.
pub mod status {
    pub const APPROVED: u8 = 1;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateEndowmentStatusMsg {
    pub endowment_addr: String,
    pub status: u8,
    pub beneficiary: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaultAddMsg {
    pub vault_addr: String,
    pub input_denom: String,
    pub yield_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UpdateConfigMsg {
    pub accounts_code_id: Option<u64>,
    pub index_fund_contract: Option<String>,
    pub treasury: Option<String>,
    pub tax_rate: Option<Decimal>,
    pub default_vault: Option<String>,
    pub cw3_code: Option<u64>,
    pub cw4_code: Option<u64>,
    pub split_max: Option<Decimal>,
    pub split_min: Option<Decimal>,
    pub split_default: Option<Decimal>,
    pub halo_token: Option<String>,
    pub gov_contract: Option<String>,
    pub collector_addr: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MigrateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Config {},
    EndowmentList {
        name: Option<String>,
        owner: Option<String>,
        status: Option<String>,
    },
    ApprovedVaultList {
        start_after: Option<String>,
        limit: Option<u64>,
    },
}

impl QueryMsg {
    pub fn all_endowments() -> Self {
        QueryMsg::EndowmentList {
            name: None,
            owner: None,
            status: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigResponse {
    pub owner: String,
    pub accounts_code_id: u64,
    pub treasury: String,
    pub tax_rate: Decimal,
    #[serde(default)]
    pub index_fund: Option<String>,
    #[serde(default)]
    pub default_vault: Option<String>,
    #[serde(default)]
    pub cw3_code: Option<u64>,
    #[serde(default)]
    pub cw4_code: Option<u64>,
    #[serde(default)]
    pub halo_token: Option<String>,
    #[serde(default)]
    pub gov_contract: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EndowmentEntry {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    pub status: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EndowmentListResponse {
    pub endowments: Vec<EndowmentEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaultDetail {
    pub address: String,
    pub input_denom: String,
    pub yield_token: String,
    pub approved: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaultListResponse {
    pub vaults: Vec<VaultDetail>,
}
