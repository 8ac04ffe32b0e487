use config::Config as _Config;
use cosmwasm_std::{Decimal, Uint128};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tendermint_rpc::Url;

use super::error::ConfigError;
use super::network::Network;
use crate::client::error::ClientError;
use crate::orchestrator::deploy::DeployInfo;

/// Prefix of environment variables that override yaml keys,
/// e.g. `HARNESS_ACCOUNTS__AP_TEAM="..."` sets `accounts.ap_team`.
pub const ENV_PREFIX: &str = "HARNESS";

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    pub chain_cfg: ChainCfg,
    // account role name -> mnemonic
    #[serde(default)]
    pub accounts: HashMap<String, String>,
    #[serde(default = "default_wasm_dir")]
    pub wasm_dir: String,
    // where the code ids and addresses of a deployment are recorded
    #[serde(default)]
    pub state_file: Option<String>,
    #[serde(default)]
    pub protocol: ProtocolCfg,
    // used to configure already stored contract code_id and deployed addresses
    #[serde(default)]
    pub contract_deploy_info: HashMap<String, DeployInfo>,
}

fn default_wasm_dir() -> String {
    "artifacts".to_string()
}

// mnemonics must never end up in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut accounts: Vec<&String> = self.accounts.keys().collect();
        accounts.sort();

        f.debug_struct("Config")
            .field("network", &self.network)
            .field("chain_cfg", &self.chain_cfg)
            .field("accounts", &accounts)
            .field("wasm_dir", &self.wasm_dir)
            .field("state_file", &self.state_file)
            .field("protocol", &self.protocol)
            .field("contract_deploy_info", &self.contract_deploy_info)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChainCfg {
    pub denom: String,
    pub prefix: String,
    pub chain_id: String,
    pub rpc_endpoint: String,
    pub grpc_endpoint: String,
    pub gas_prices: f64,
    pub gas_adjustment: f64,
}

/// Deployment constants for the endowment protocol contracts.
///
/// Decimal and Uint128 values are strings in yaml, e.g. `tax_rate: "0.2"`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProtocolCfg {
    pub label_prefix: String,
    pub tax_rate: Decimal,
    // falls back to the `ap_treasury` wallet
    pub treasury: Option<String>,
    pub split_max: Decimal,
    pub split_min: Decimal,
    pub split_default: Decimal,
    pub fund_rotation: Option<u64>,
    pub fund_member_limit: Option<u32>,
    pub funding_goal: Option<Uint128>,
    pub threshold_percentage: Decimal,
    pub max_voting_period_height: u64,
    // yield source the vaults deposit into, none on a local devnet
    pub moneymarket: Option<String>,
    pub vault_tax_per_block: Decimal,
    pub vault_harvest_to_liquid: Decimal,
    pub halo: HaloCfg,
}

impl Default for ProtocolCfg {
    fn default() -> Self {
        Self {
            label_prefix: "endowment-harness".to_string(),
            tax_rate: Decimal::percent(20),
            treasury: None,
            split_max: Decimal::one(),
            split_min: Decimal::zero(),
            split_default: Decimal::percent(50),
            fund_rotation: Some(10),
            fund_member_limit: Some(10),
            funding_goal: Some(Uint128::new(50_000_000)),
            threshold_percentage: Decimal::percent(50),
            max_voting_period_height: 1000,
            moneymarket: None,
            vault_tax_per_block: Decimal::percent(70),
            vault_harvest_to_liquid: Decimal::percent(75),
            halo: HaloCfg::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HaloCfg {
    pub token_name: String,
    pub token_symbol: String,
    pub decimals: u8,
    pub total_supply: Uint128,
    // json list of `{ "address": ..., "amount": ... }` claims
    pub airdrop_file: Option<String>,
    pub quorum: Decimal,
    pub threshold: Decimal,
    pub voting_period: u64,
    pub timelock_period: u64,
    pub proposal_deposit: Uint128,
    pub snapshot_period: u64,
    pub distributor_spend_limit: Uint128,
    pub collector_reward_factor: Decimal,
}

impl Default for HaloCfg {
    fn default() -> Self {
        Self {
            token_name: "Halo Token".to_string(),
            token_symbol: "HALO".to_string(),
            decimals: 6,
            total_supply: Uint128::new(1_000_000_000_000_000),
            airdrop_file: None,
            quorum: Decimal::percent(10),
            threshold: Decimal::percent(50),
            voting_period: 100,
            timelock_period: 10,
            proposal_deposit: Uint128::new(10_000_000),
            snapshot_period: 10,
            distributor_spend_limit: Uint128::new(1_000_000_000_000),
            collector_reward_factor: Decimal::percent(90),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new<S: Into<String>>(amount: u64, denom: S) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl TryFrom<Coin> for cosmrs::Coin {
    type Error = ClientError;

    fn try_from(coin: Coin) -> Result<cosmrs::Coin, ClientError> {
        Ok(cosmrs::Coin {
            denom: coin
                .denom
                .parse()
                .map_err(|_| ClientError::Denom { name: coin.denom })?,
            amount: coin.amount.into(),
        })
    }
}

impl From<Coin> for cosmwasm_std::Coin {
    fn from(coin: Coin) -> cosmwasm_std::Coin {
        cosmwasm_std::Coin {
            denom: coin.denom,
            amount: Uint128::from(coin.amount),
        }
    }
}

impl Config {
    pub fn from_yaml(file: &str) -> Result<Config, ConfigError> {
        let settings = _Config::builder()
            .add_source(config::File::with_name(file))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut cfg = settings.try_deserialize::<Config>()?;

        // parse and optionally fix scheme for configured api endpoints:
        cfg.chain_cfg.rpc_endpoint = parse_url(&cfg.chain_cfg.rpc_endpoint)?;
        cfg.chain_cfg.grpc_endpoint = parse_url(&cfg.chain_cfg.grpc_endpoint)?;

        Ok(cfg)
    }

    /// Loads `<config_dir>/<network>.yaml`.
    pub fn for_network(config_dir: &str, network: Network) -> Result<Config, ConfigError> {
        let path = Path::new(config_dir).join(network.config_name());
        let mut cfg = Self::from_yaml(&path.to_string_lossy())?;
        cfg.network = network;
        Ok(cfg)
    }

    pub fn mnemonic(&self, account: &str) -> Option<&str> {
        self.accounts
            .get(account)
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
    }
}

// Attempt to parse the configured url to ensure that it is valid.
// If url is missing the Scheme then default to https.
pub(crate) fn parse_url(url: &str) -> Result<String, ConfigError> {
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };

    Url::from_str(&url)?;
    Ok(url)
}
