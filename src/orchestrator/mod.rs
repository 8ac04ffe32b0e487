pub mod batch;

pub mod deploy;

pub mod error;

pub mod gas_profiler;

pub(crate) mod internal_api;

pub mod orc;

pub mod sequence;

pub use crate::client::chain_res::{
    ChainResponse, ExecResponse, InstantiateResponse, MigrateResponse, QueryResponse,
    StoreCodeResponse,
};
pub use crate::config::cfg::Coin;
pub use crate::config::key::{Key, SigningKey};
