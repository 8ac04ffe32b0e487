use cosmwasm_std::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub registrar_contract: String,
    pub input_denom: String,
    pub moneymarket: Option<String>,
    pub tax_per_block: Decimal,
    pub harvest_to_liquid: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    VaultConfig {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MigrateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VaultConfigResponse {
    pub registrar_contract: String,
    pub input_denom: String,
    pub yield_token: String,
    #[serde(default)]
    pub moneymarket: Option<String>,
    #[serde(default)]
    pub tax_per_block: Option<Decimal>,
    #[serde(default)]
    pub harvest_to_liquid: Option<Decimal>,
}
