use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    QuerySmartContractStateRequest, QuerySmartContractStateResponse,
};
use cosmrs::bank::MsgSend;
use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract};
use cosmrs::crypto::secp256k1;
use cosmrs::rpc::Client;
use cosmrs::tx::Msg;
use cosmrs::{cosmwasm::MsgStoreCode, rpc::HttpClient};
use cosmrs::{AccountId, Any};
use prost::Message;
use std::time::Duration;
use tokio::time;

use super::chain_res::{
    ChainResponse, ExecResponse, InstantiateResponse, MigrateResponse, QueryResponse,
    StoreCodeResponse,
};
use super::cosmos::{abci_query, balance, send_tx};
use super::error::ClientError;
use super::events;
use crate::config::cfg::{ChainCfg, Coin};
use crate::config::key::SigningKey;

/// One contract execution inside a multi-message tx.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteMsg {
    pub contract: String,
    pub payload: Vec<u8>,
    pub funds: Vec<Coin>,
}

#[cfg_attr(test, faux::create)]
#[derive(Clone, Debug)]
pub struct CosmWasmClient {
    // http tendermint RPC client
    rpc_client: HttpClient,
    cfg: ChainCfg,
}

#[cfg_attr(test, faux::methods)]
impl CosmWasmClient {
    // HACK: faux doesn't support mocking a struct wrapped in a Result
    // so we are just ignoring the constructor for this crate's tests
    #[cfg(not(test))]
    pub fn new(cfg: ChainCfg) -> Result<Self, ClientError> {
        Ok(Self {
            rpc_client: HttpClient::new(cfg.rpc_endpoint.as_str())?,
            cfg,
        })
    }

    pub fn chain_cfg(&self) -> ChainCfg {
        self.cfg.clone()
    }

    pub async fn store(
        &self,
        payload: Vec<u8>,
        key: &SigningKey,
    ) -> Result<StoreCodeResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        let msg = MsgStoreCode {
            sender: account_id.clone(),
            wasm_byte_code: payload,
            instantiate_permission: None,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let res: ChainResponse =
            send_tx(&self.rpc_client, vec![msg], &signing_key, account_id, &self.cfg)
                .await?
                .into();

        let code_id = events::code_id(&res.events)
            .ok_or_else(|| ClientError::missing_attribute("store_code", events::CODE_ID))?;

        Ok(StoreCodeResponse { code_id, res })
    }

    pub async fn instantiate(
        &self,
        code_id: u64,
        payload: Vec<u8>,
        key: &SigningKey,
        label: String,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> Result<InstantiateResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        let msg = MsgInstantiateContract {
            sender: account_id.clone(),
            admin: admin
                .map(|s| s.parse().map_err(|_| ClientError::AdminAddress { addr: s }))
                .transpose()?,
            code_id,
            label: Some(label),
            msg: payload,
            funds: to_cosm_funds(funds)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let res: ChainResponse =
            send_tx(&self.rpc_client, vec![msg], &signing_key, account_id, &self.cfg)
                .await?
                .into();

        // the contract we instantiated is the one built from `code_id`,
        // anything else in the log was spawned by it
        let address = events::contract_address_for_code(&res.events, code_id)
            .or_else(|| events::contract_address(&res.events))
            .ok_or_else(|| {
                ClientError::missing_attribute("instantiate", events::CONTRACT_ADDRESS)
            })?
            .to_string();

        Ok(InstantiateResponse { address, res })
    }

    pub async fn execute(
        &self,
        address: String,
        payload: Vec<u8>,
        key: &SigningKey,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ClientError> {
        self.execute_batch(
            vec![ExecuteMsg {
                contract: address,
                payload,
                funds,
            }],
            key,
        )
        .await
    }

    /// Executes every msg in a single tx, in order. Either all of them
    /// are committed or none are.
    pub async fn execute_batch(
        &self,
        msgs: Vec<ExecuteMsg>,
        key: &SigningKey,
    ) -> Result<ExecResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        let mut anys: Vec<Any> = Vec::with_capacity(msgs.len());
        for m in msgs {
            anys.push(
                MsgExecuteContract {
                    sender: account_id.clone(),
                    contract: parse_contract(&m.contract)?,
                    msg: m.payload,
                    funds: to_cosm_funds(m.funds)?,
                }
                .to_any()
                .map_err(ClientError::proto_encoding)?,
            );
        }

        let tx_res = send_tx(&self.rpc_client, anys, &signing_key, account_id, &self.cfg).await?;

        Ok(ExecResponse {
            res: tx_res.into(),
        })
    }

    pub async fn query(
        &self,
        address: String,
        payload: Vec<u8>,
    ) -> Result<QueryResponse, ClientError> {
        let res = abci_query(
            &self.rpc_client,
            QuerySmartContractStateRequest {
                address,
                query_data: payload,
            },
            "/cosmwasm.wasm.v1.Query/SmartContractState",
        )
        .await?;

        let res = QuerySmartContractStateResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?;

        Ok(QueryResponse { res: res.into() })
    }

    pub async fn migrate(
        &self,
        address: String,
        new_code_id: u64,
        payload: Vec<u8>,
        key: &SigningKey,
    ) -> Result<MigrateResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        let msg = MsgMigrateContract {
            sender: account_id.clone(),
            contract: parse_contract(&address)?,
            code_id: new_code_id,
            msg: payload,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res =
            send_tx(&self.rpc_client, vec![msg], &signing_key, account_id, &self.cfg).await?;

        Ok(MigrateResponse {
            res: tx_res.into(),
        })
    }

    /// Bank transfer of native tokens.
    pub async fn send(
        &self,
        to: String,
        amount: Vec<Coin>,
        key: &SigningKey,
    ) -> Result<ExecResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        let msg = MsgSend {
            from_address: account_id.clone(),
            to_address: to
                .parse()
                .map_err(|_| ClientError::AccountId { id: to.clone() })?,
            amount: to_cosm_funds(amount)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res =
            send_tx(&self.rpc_client, vec![msg], &signing_key, account_id, &self.cfg).await?;

        Ok(ExecResponse {
            res: tx_res.into(),
        })
    }

    pub async fn balance(&self, address: String, denom: String) -> Result<u128, ClientError> {
        balance(&self.rpc_client, &address, &denom).await
    }

    pub async fn poll_for_n_blocks(&self, n: u64, is_first_block: bool) -> Result<(), ClientError> {
        if is_first_block {
            self.rpc_client
                .wait_until_healthy(Duration::from_secs(5))
                .await?;

            while let Err(e) = self.rpc_client.latest_block().await {
                if !matches!(e.detail(), cosmrs::rpc::error::ErrorDetail::Serde(_)) {
                    return Err(e.into());
                }
                time::sleep(Duration::from_millis(500)).await;
            }
        }

        let mut curr_height: u64 = self
            .rpc_client
            .latest_block()
            .await?
            .block
            .header
            .height
            .into();
        let target_height: u64 = curr_height + n;

        while curr_height < target_height {
            time::sleep(Duration::from_millis(500)).await;

            curr_height = self
                .rpc_client
                .latest_block()
                .await?
                .block
                .header
                .height
                .into();
        }

        Ok(())
    }
}

fn parse_contract(addr: &str) -> Result<AccountId, ClientError> {
    addr.parse().map_err(|_| ClientError::ContractAddress {
        addr: addr.to_string(),
    })
}

fn to_cosm_funds(funds: Vec<Coin>) -> Result<Vec<cosmrs::Coin>, ClientError> {
    funds.into_iter().map(|c| c.try_into()).collect()
}
