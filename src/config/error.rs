use config::ConfigError as _ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown network: {name:?} (expected local, testnet or mainnet)")]
    UnknownNetwork { name: String },

    #[error("no mnemonic configured for account: {name:?}")]
    MissingAccount { name: String },

    #[error("invalid mnemonic for account: {name:?}")]
    InvalidMnemonic { name: String },

    #[error("error parsing url")]
    UrlParse(#[from] tendermint_rpc::Error),

    #[error(transparent)]
    Config(#[from] _ConfigError),
}
