use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// The environments the harness can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Local,
    Testnet,
    Mainnet,
}

impl Network {
    /// Name of the yaml file (without extension) holding this network's config.
    pub fn config_name(&self) -> &'static str {
        match self {
            Network::Local => "local",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    /// Local devnets have every test account funded and give the deployer
    /// full control over contract ownership.
    pub fn is_local(&self) -> bool {
        matches!(self, Network::Local)
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Local
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_name())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "localjuno" | "localnet" | "devnet" => Ok(Network::Local),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(ConfigError::UnknownNetwork {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Network;
    use crate::config::error::ConfigError;
    use assert_matches::assert_matches;

    #[test]
    fn parses_network_aliases() {
        assert_eq!("local".parse::<Network>().unwrap(), Network::Local);
        assert_eq!("LocalJuno".parse::<Network>().unwrap(), Network::Local);
        assert_eq!(" testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
    }

    #[test]
    fn rejects_unknown_network() {
        assert_matches!(
            "juno-1".parse::<Network>(),
            Err(ConfigError::UnknownNetwork { name }) if name == "juno-1"
        );
    }

    #[test]
    fn display_matches_config_name() {
        for n in [Network::Local, Network::Testnet, Network::Mainnet] {
            assert_eq!(n.to_string(), n.config_name());
        }
    }
}
