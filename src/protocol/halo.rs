//! HALO token family: cw20 token, merkle airdrop, gov, LP staking,
//! community pool, collector, distributor and vesting.

use cosmwasm_std::{Decimal, Uint128};
use cw20::{Cw20Coin, MinterResponse};
use serde::{Deserialize, Serialize};

pub use cw20::{
    BalanceResponse as TokenBalanceResponse, Cw20ExecuteMsg as TokenExecuteMsg,
    Cw20QueryMsg as TokenQueryMsg, TokenInfoResponse,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenInstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
    pub mint: Option<MinterResponse>,
}

pub mod airdrop {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub owner: Option<String>,
        pub halo_token: String,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum ExecuteMsg {
        RegisterMerkleRoot {
            merkle_root: String,
        },
        Claim {
            stage: u8,
            amount: Uint128,
            proof: Vec<String>,
        },
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum QueryMsg {
        Config {},
        MerkleRoot { stage: u8 },
        LatestStage {},
        IsClaimed { stage: u8, address: String },
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct ConfigResponse {
        pub owner: String,
        pub halo_token: String,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct MerkleRootResponse {
        pub stage: u8,
        pub merkle_root: String,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct LatestStageResponse {
        pub latest_stage: u8,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct IsClaimedResponse {
        pub is_claimed: bool,
    }
}

pub mod gov {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub quorum: Decimal,
        pub threshold: Decimal,
        pub voting_period: u64,
        pub timelock_period: u64,
        pub proposal_deposit: Uint128,
        pub snapshot_period: u64,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum ExecuteMsg {
        RegisterContracts { halo_token: String },
    }

    /// Sent to gov inside a cw20 `send`.
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum Cw20HookMsg {
        StakeVotingTokens {},
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum QueryMsg {
        Config {},
        State {},
        Staker { address: String },
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct ConfigResponse {
        pub owner: String,
        pub halo_token: String,
        pub quorum: Decimal,
        pub threshold: Decimal,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct StateResponse {
        pub poll_count: u64,
        pub total_share: Uint128,
        pub total_deposit: Uint128,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct StakerResponse {
        pub balance: Uint128,
        pub share: Uint128,
    }
}

pub mod staking {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub halo_token: String,
        pub staking_token: String,
        /// `(start_block, end_block, amount)`
        pub distribution_schedule: Vec<(u64, u64, Uint128)>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum Cw20HookMsg {
        Bond {},
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum QueryMsg {
        StakerInfo {
            staker: String,
            block_height: Option<u64>,
        },
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct StakerInfoResponse {
        pub staker: String,
        pub bond_amount: Uint128,
        pub pending_reward: Uint128,
    }
}

pub mod community {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub gov_contract: String,
        pub halo_token: String,
        pub spend_limit: Uint128,
    }
}

pub mod collector {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub gov_contract: String,
        pub halo_token: String,
        pub distributor_contract: String,
        pub reward_factor: Decimal,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum ExecuteMsg {
        Sweep { denom: String },
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum QueryMsg {
        Config {},
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct ConfigResponse {
        pub gov_contract: String,
        pub halo_token: String,
        pub distributor_contract: String,
        pub reward_factor: Decimal,
    }
}

pub mod distributor {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub gov_contract: String,
        pub halo_token: String,
        pub whitelist: Vec<String>,
        pub spend_limit: Uint128,
    }
}

pub mod vesting {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct InstantiateMsg {
        pub owner: String,
        pub halo_token: String,
        pub genesis_time: u64,
    }
}
