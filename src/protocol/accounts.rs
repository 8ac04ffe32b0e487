use cosmwasm_std::{Coin, Decimal, Uint128};
use cw20::Cw20CoinVerified;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Strategy {
    pub vault: String,
    pub percentage: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepositMsg {
    pub locked_percentage: Decimal,
    pub liquid_percentage: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    Deposit(DepositMsg),
    WithdrawLiquid {
        liquid_amount: Uint128,
        beneficiary: String,
    },
    UpdateStrategies {
        strategies: Vec<Strategy>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Balance {},
    Config {},
    Endowment {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MigrateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BalanceResponse {
    #[serde(default)]
    pub locked_native: Vec<Coin>,
    #[serde(default)]
    pub liquid_native: Vec<Coin>,
    #[serde(default)]
    pub locked_cw20: Vec<Cw20CoinVerified>,
    #[serde(default)]
    pub liquid_cw20: Vec<Cw20CoinVerified>,
}

impl BalanceResponse {
    pub fn liquid(&self, denom: &str) -> Uint128 {
        sum_denom(&self.liquid_native, denom)
    }

    pub fn locked(&self, denom: &str) -> Uint128 {
        sum_denom(&self.locked_native, denom)
    }
}

fn sum_denom(coins: &[Coin], denom: &str) -> Uint128 {
    coins
        .iter()
        .filter(|c| c.denom == denom)
        .fold(Uint128::zero(), |acc, c| acc + c.amount)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigResponse {
    pub owner: String,
    pub registrar_contract: String,
    #[serde(default)]
    pub deposit_approved: Option<bool>,
    #[serde(default)]
    pub withdraw_approved: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EndowmentDetailsResponse {
    pub owner: String,
    pub beneficiary: String,
    pub withdraw_before_maturity: bool,
    #[serde(default)]
    pub maturity_time: Option<u64>,
    #[serde(default)]
    pub maturity_height: Option<u64>,
    #[serde(default)]
    pub strategies: Vec<Strategy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_sums_by_denom() {
        let res: BalanceResponse = serde_json::from_value(json!({
            "locked_native": [{"denom": "ujuno", "amount": "40"}],
            "liquid_native": [
                {"denom": "ujuno", "amount": "60"},
                {"denom": "ujuno", "amount": "5"},
                {"denom": "uatom", "amount": "7"}
            ],
        }))
        .unwrap();

        assert_eq!(res.locked("ujuno"), Uint128::new(40));
        assert_eq!(res.liquid("ujuno"), Uint128::new(65));
        assert_eq!(res.liquid("uusd"), Uint128::zero());
        assert!(res.liquid_cw20.is_empty());
    }

    #[test]
    fn update_strategies_shape() {
        let msg = ExecuteMsg::UpdateStrategies {
            strategies: vec![Strategy {
                vault: "juno1vault".to_string(),
                percentage: Decimal::one(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"update_strategies": {"strategies": [{"vault": "juno1vault", "percentage": "1"}]}})
        );
    }
}
