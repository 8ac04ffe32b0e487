use cosmos_sdk_proto::cosmwasm::wasm::v1::QuerySmartContractStateResponse;
use cosmrs::rpc::endpoint::broadcast::tx_commit::{Response, TxResult};
use cosmrs::tendermint::abci::Code;
use serde::Deserialize;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

use super::error::DeserializeError;
use super::events::{self, TxEvent};

#[derive(Clone, Debug)]
pub struct StoreCodeResponse {
    pub code_id: u64,
    pub res: ChainResponse,
}

#[derive(Clone, Debug)]
pub struct InstantiateResponse {
    pub address: String,
    pub res: ChainResponse,
}

#[derive(Clone, Debug)]
pub struct ExecResponse {
    pub res: ChainResponse,
}

impl ExecResponse {
    /// Attribute the executed contract emitted, e.g. `proposal_id`.
    pub fn wasm_attribute(&self, key: &str) -> Option<&str> {
        events::wasm_attribute(&self.res.events, key)
    }
}

#[derive(Clone, Debug)]
pub struct QueryResponse {
    pub res: ChainResponse,
}

impl QueryResponse {
    pub fn data<'a, T: Deserialize<'a>>(&'a self) -> Result<T, DeserializeError> {
        self.res.data()
    }
}

#[derive(Clone, Debug)]
pub struct MigrateResponse {
    pub res: ChainResponse,
}

#[derive(Clone, Debug, Default)]
pub struct ChainResponse {
    pub code: Code,
    pub data: Option<Vec<u8>>,
    pub log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub tx_hash: String,
    pub height: u64,
    pub events: Vec<TxEvent>,
}

impl From<TxResult> for ChainResponse {
    fn from(res: TxResult) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: res.data.map(|d| d.into()),
            log: res.log.to_string(),
            gas_wanted: res.gas_wanted.into(),
            gas_used: res.gas_used.into(),
            events: res.events.iter().map(TxEvent::from).collect(),
            ..Default::default()
        }
    }
}

impl From<Response> for ChainResponse {
    fn from(res: Response) -> ChainResponse {
        let tx_hash = res.hash.to_string();
        let height = res.height.value();

        ChainResponse {
            tx_hash,
            height,
            ..ChainResponse::from(res.deliver_tx)
        }
    }
}

impl From<AbciQuery> for ChainResponse {
    fn from(res: AbciQuery) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: Some(res.value),
            log: res.log.to_string(),
            height: res.height.value(),
            ..Default::default()
        }
    }
}

impl From<QuerySmartContractStateResponse> for ChainResponse {
    fn from(res: QuerySmartContractStateResponse) -> ChainResponse {
        ChainResponse {
            code: Code::Ok,
            data: Some(res.data),
            ..Default::default()
        }
    }
}

impl ChainResponse {
    pub fn data<'a, T: Deserialize<'a>>(&'a self) -> Result<T, DeserializeError> {
        let r: T = serde_json::from_slice(
            self.data
                .as_ref()
                .ok_or(DeserializeError::EmptyResponse)?
                .as_slice(),
        )?;
        Ok(r)
    }
}
