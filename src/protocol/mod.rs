//! JSON message shapes of the external contracts.
//!
//! Only the messages and responses the harness sends or reads are modelled.
//! Response structs ignore fields they do not name.

use cosmwasm_std::{Binary, CosmosMsg, WasmMsg};
use serde::Serialize;

pub mod accounts;

pub mod halo;

pub mod index_fund;

pub mod multisig;

pub mod registrar;

pub mod vault;

// Stored code names, i.e. the wasm file stems in `wasm_dir`.
pub const REGISTRAR: &str = "registrar";
pub const INDEX_FUND: &str = "index_fund";
pub const ACCOUNTS: &str = "accounts";
pub const VAULT: &str = "vault";
pub const CW4_GROUP: &str = "cw4_group";
pub const CW3_MULTISIG: &str = "cw3_multisig";

pub const HALO_TOKEN: &str = "halo_token";
pub const HALO_AIRDROP: &str = "halo_airdrop";
pub const HALO_GOV: &str = "halo_gov";
pub const HALO_STAKING: &str = "halo_staking";
pub const HALO_COMMUNITY: &str = "halo_community";
pub const HALO_COLLECTOR: &str = "halo_collector";
pub const HALO_DISTRIBUTOR: &str = "halo_distributor";
pub const HALO_VESTING: &str = "halo_vesting";

pub const CORE_CODES: [&str; 6] = [REGISTRAR, INDEX_FUND, ACCOUNTS, VAULT, CW4_GROUP, CW3_MULTISIG];

pub const HALO_CODES: [&str; 8] = [
    HALO_TOKEN,
    HALO_AIRDROP,
    HALO_GOV,
    HALO_STAKING,
    HALO_COMMUNITY,
    HALO_COLLECTOR,
    HALO_DISTRIBUTOR,
    HALO_VESTING,
];

// Instance names for code that backs more than one contract.
pub const VAULT_1: &str = "vault_1";
pub const VAULT_2: &str = "vault_2";
pub const CW4_AP_TEAM: &str = "cw4_ap_team";
pub const CW3_AP_TEAM: &str = "cw3_ap_team";

/// Contract map name of the endowment owned by the charity signer `charity`.
pub fn endowment_name(charity: &str) -> String {
    format!("endowment_{}", charity)
}

/// A wasm execute message, as carried inside multisig proposals or
/// cw20 `send` hooks.
pub fn wasm_execute<T: Serialize>(
    contract_addr: &str,
    msg: &T,
    funds: Vec<cosmwasm_std::Coin>,
) -> Result<CosmosMsg, serde_json::Error> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: contract_addr.to_string(),
        msg: to_json_binary(msg)?,
        funds,
    }))
}

pub fn to_json_binary<T: Serialize>(msg: &T) -> Result<Binary, serde_json::Error> {
    Ok(Binary::from(serde_json::to_vec(msg)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wasm_execute_embeds_base64_json() {
        let msg = wasm_execute("juno1registrar", &json!({"update_owner": {"new_owner": "x"}}), vec![])
            .unwrap();
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["wasm"]["execute"]["contract_addr"], "juno1registrar");
        let inner = base64_json(value["wasm"]["execute"]["msg"].as_str().unwrap());
        assert_eq!(inner, json!({"update_owner": {"new_owner": "x"}}));
    }

    fn base64_json(encoded: &str) -> serde_json::Value {
        let bin = Binary::from_base64(encoded).unwrap();
        serde_json::from_slice(bin.as_slice()).unwrap()
    }

    #[test]
    fn endowment_names_follow_charity_role() {
        assert_eq!(endowment_name("charity_2"), "endowment_charity_2");
    }
}
