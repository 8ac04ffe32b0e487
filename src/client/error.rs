use cosmrs::ErrorReport;
use prost::{DecodeError, EncodeError};
use thiserror::Error;

use super::chain_res::ChainResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid account ID: {id:?}")]
    AccountId { id: String },

    #[error("invalid contract address: {addr:?}")]
    ContractAddress { addr: String },

    #[error("invalid admin address: {addr:?}")]
    AdminAddress { addr: String },

    #[error("cryptographic error")]
    Crypto { source: ErrorReport },

    #[error("invalid denomination: {name:?}")]
    Denom { name: String },

    #[error("invalid coin amount: {amount:?}")]
    InvalidAmount { amount: String },

    #[error("invalid chainId: {chain_id:?}")]
    ChainId { chain_id: String },

    #[error("invalid mnemonic")]
    Mnemonic,

    #[error("invalid derivation path")]
    DerivationPath,

    #[error("invalid abci query path: {path:?}")]
    AbciPath { path: String },

    #[error("proto encoding error")]
    ProtoEncoding { source: ErrorReport },

    #[error("proto decoding error")]
    ProtoDecoding { source: ErrorReport },

    #[error("tx succeeded but is missing the {key:?} attribute in its {event:?} event")]
    MissingAttribute { event: String, key: String },

    #[error("chain did not return gas info for simulated tx")]
    MissingGasInfo,

    #[error("CosmosSDK error: {}", .res.log)]
    CosmosSdk { res: ChainResponse },

    #[error(transparent)]
    RPC(#[from] tendermint_rpc::Error),

    #[error(transparent)]
    GRPCTransport(#[from] tonic::transport::Error),
}

impl ClientError {
    pub fn crypto(e: ErrorReport) -> ClientError {
        ClientError::Crypto { source: e }
    }

    pub fn proto_encoding(e: ErrorReport) -> ClientError {
        ClientError::ProtoEncoding { source: e }
    }

    pub fn prost_proto_en(e: EncodeError) -> ClientError {
        ClientError::ProtoEncoding { source: e.into() }
    }

    pub fn prost_proto_de(e: DecodeError) -> ClientError {
        ClientError::ProtoDecoding { source: e.into() }
    }

    pub fn missing_attribute(event: &str, key: &str) -> ClientError {
        ClientError::MissingAttribute {
            event: event.to_string(),
            key: key.to_string(),
        }
    }

    /// True when the chain itself rejected the tx or query, as opposed to a
    /// transport or local signing failure.
    pub fn is_chain_rejection(&self) -> bool {
        matches!(self, ClientError::CosmosSdk { .. })
    }
}

#[derive(Error, Debug)]
pub enum DeserializeError {
    #[error("Raw chain response is empty")]
    EmptyResponse,

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
