use cosmwasm_std::{Decimal, Uint128};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub registrar_contract: String,
    pub fund_rotation: Option<u64>,
    pub fund_member_limit: Option<u32>,
    pub funding_goal: Option<Uint128>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IndexFund {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    #[serde(default)]
    pub rotating_fund: Option<bool>,
    #[serde(default)]
    pub split_to_liquid: Option<Decimal>,
    #[serde(default)]
    pub expiry_time: Option<u64>,
    #[serde(default)]
    pub expiry_height: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AllianceMember {
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AllianceAction {
    Add,
    Remove,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepositMsg {
    pub fund_id: Option<u64>,
    pub split: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    CreateFund {
        fund: IndexFund,
    },
    RemoveFund {
        fund_id: u64,
    },
    UpdateMembers {
        fund_id: u64,
        add: Vec<String>,
        remove: Vec<String>,
    },
    UpdateAllianceMemberList {
        address: String,
        member: AllianceMember,
        action: AllianceAction,
    },
    Deposit(DepositMsg),
    UpdateOwner {
        new_owner: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MigrateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Config {},
    State {},
    FundsList {
        start_after: Option<u64>,
        limit: Option<u64>,
    },
    FundDetails {
        fund_id: u64,
    },
    ActiveFundDetails {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigResponse {
    pub owner: String,
    pub registrar_contract: String,
    #[serde(default)]
    pub fund_rotation: Option<u64>,
    #[serde(default)]
    pub fund_member_limit: Option<u32>,
    #[serde(default)]
    pub funding_goal: Option<Uint128>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StateResponse {
    pub total_funds: u64,
    pub active_fund: u64,
    #[serde(default)]
    pub terra_alliance: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FundListResponse {
    pub funds: Vec<IndexFund>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FundDetailsResponse {
    pub fund: Option<IndexFund>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deposit_is_a_newtype_variant() {
        let msg = ExecuteMsg::Deposit(DepositMsg {
            fund_id: None,
            split: Some(Decimal::percent(30)),
        });

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"deposit": {"fund_id": null, "split": "0.3"}})
        );
    }

    #[test]
    fn fund_details_tolerate_missing_optionals() {
        let res: FundDetailsResponse = serde_json::from_value(json!({
            "fund": {"id": 1, "name": "Ocean", "description": "", "members": ["juno1a"]}
        }))
        .unwrap();

        let fund = res.fund.unwrap();
        assert_eq!(fund.members, vec!["juno1a"]);
        assert_eq!(fund.split_to_liquid, None);
    }
}
