//! cw4 group and cw3 flex multisig messages used by the AP team.
//!
//! The execute and query interfaces are the cw-plus ones. Only the
//! instantiate messages belong to the contracts themselves.

use serde::{Deserialize, Serialize};

pub use cw3::{
    Cw3ExecuteMsg, Cw3QueryMsg, ProposalResponse, Status, Vote, VoterDetail, VoterListResponse,
};
pub use cw4::{Cw4ExecuteMsg, Cw4QueryMsg, Member, MemberListResponse};
pub use cw_utils::{Duration, Threshold};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Cw4InstantiateMsg {
    pub admin: Option<String>,
    pub members: Vec<Member>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Cw3InstantiateMsg {
    pub group_addr: String,
    pub threshold: Threshold,
    pub max_voting_period: Duration,
}

pub fn member<S: Into<String>>(addr: S, weight: u64) -> Member {
    Member {
        addr: addr.into(),
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::Decimal;
    use serde_json::json;

    #[test]
    fn cw3_instantiate_shape() {
        let msg = Cw3InstantiateMsg {
            group_addr: "juno1group".to_string(),
            threshold: Threshold::AbsolutePercentage {
                percentage: Decimal::percent(50),
            },
            max_voting_period: Duration::Height(1000),
        };

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "group_addr": "juno1group",
                "threshold": {"absolute_percentage": {"percentage": "0.5"}},
                "max_voting_period": {"height": 1000},
            })
        );
    }

    #[test]
    fn cw4_instantiate_shape() {
        let msg = Cw4InstantiateMsg {
            admin: Some("juno1ap".to_string()),
            members: vec![member("juno1ap", 1)],
        };

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "admin": "juno1ap",
                "members": [{"addr": "juno1ap", "weight": 1}],
            })
        );
    }
}
