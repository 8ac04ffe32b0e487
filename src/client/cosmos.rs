use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, QueryAccountResponse,
};
use cosmos_sdk_proto::cosmos::bank::v1beta1::{QueryBalanceRequest, QueryBalanceResponse};
use cosmos_sdk_proto::cosmos::tx::v1beta1::service_client::ServiceClient;
use cosmos_sdk_proto::cosmos::tx::v1beta1::SimulateRequest;
use cosmrs::crypto::secp256k1;
use cosmrs::rpc::endpoint::broadcast::tx_commit::Response;
use cosmrs::rpc::Client;
use cosmrs::tendermint::abci::Code;
use cosmrs::tx::{Fee, SignDoc, SignerInfo};
use cosmrs::{
    rpc::HttpClient,
    tx::{self},
};
use cosmrs::{AccountId, Any, Coin, Denom};
use log::debug;
use prost::Message;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

use super::chain_res::ChainResponse;
use super::error::ClientError;
use crate::config::cfg::ChainCfg;

const MEMO: &str = "endowment-harness";

pub async fn send_tx(
    client: &HttpClient,
    msgs: Vec<Any>,
    key: &secp256k1::SigningKey,
    account_id: AccountId,
    cfg: &ChainCfg,
) -> Result<Response, ClientError> {
    let timeout_height = 0u16;
    let account = account(client, account_id).await?;

    let tx_body = tx::Body::new(msgs, MEMO, timeout_height);

    let fee = simulate_gas_fee(&tx_body, &account, key, cfg).await?;

    // NOTE: if we are making requests in parallel with the same key, we need to serialize `account.sequence` to avoid errors
    let auth_info =
        SignerInfo::single_direct(Some(key.public_key()), account.sequence).auth_info(fee);

    let sign_doc = SignDoc::new(
        &tx_body,
        &auth_info,
        &cfg.chain_id.parse().map_err(|_| ClientError::ChainId {
            chain_id: cfg.chain_id.to_string(),
        })?,
        account.account_number,
    )
    .map_err(ClientError::proto_encoding)?;

    let tx_raw = sign_doc.sign(key).map_err(ClientError::crypto)?;

    let tx_commit_response = tx_raw
        .broadcast_commit(client)
        .await
        .map_err(ClientError::proto_encoding)?;

    if tx_commit_response.check_tx.code.is_err() {
        return Err(ClientError::CosmosSdk {
            res: tx_commit_response.check_tx.into(),
        });
    }
    if tx_commit_response.deliver_tx.code.is_err() {
        return Err(ClientError::CosmosSdk {
            res: tx_commit_response.into(),
        });
    }

    debug!(
        "tx {} committed at height {}",
        tx_commit_response.hash, tx_commit_response.height
    );

    Ok(tx_commit_response)
}

pub async fn abci_query<T: Message>(
    client: &HttpClient,
    req: T,
    path: &str,
) -> Result<AbciQuery, ClientError> {
    let mut buf = Vec::with_capacity(req.encoded_len());
    req.encode(&mut buf).map_err(ClientError::prost_proto_en)?;

    let abci_path = path.parse().map_err(|_| ClientError::AbciPath {
        path: path.to_string(),
    })?;

    let res = client.abci_query(Some(abci_path), buf, None, false).await?;

    if res.code != Code::Ok {
        return Err(ClientError::CosmosSdk { res: res.into() });
    }

    Ok(res)
}

async fn account(client: &HttpClient, account_id: AccountId) -> Result<BaseAccount, ClientError> {
    let res = abci_query(
        client,
        QueryAccountRequest {
            address: account_id.as_ref().into(),
        },
        "/cosmos.auth.v1beta1.Query/Account",
    )
    .await?;

    let res = QueryAccountResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .account
        .ok_or(ClientError::AccountId {
            id: account_id.to_string(),
        })?;

    let base_account =
        BaseAccount::decode(res.value.as_slice()).map_err(ClientError::prost_proto_de)?;

    Ok(base_account)
}

/// Bank balance of `address` in `denom`. Accounts the chain has never seen
/// have a zero balance.
pub async fn balance(client: &HttpClient, address: &str, denom: &str) -> Result<u128, ClientError> {
    let res = abci_query(
        client,
        QueryBalanceRequest {
            address: address.to_string(),
            denom: denom.to_string(),
        },
        "/cosmos.bank.v1beta1.Query/Balance",
    )
    .await?;

    let amount = QueryBalanceResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .balance
        .map(|c| c.amount)
        .unwrap_or_default();

    if amount.is_empty() {
        return Ok(0);
    }

    amount
        .parse::<u128>()
        .map_err(|_| ClientError::InvalidAmount { amount })
}

#[allow(deprecated)]
async fn simulate_gas_fee(
    tx: &tx::Body,
    account: &BaseAccount,
    key: &secp256k1::SigningKey,
    cfg: &ChainCfg,
) -> Result<Fee, ClientError> {
    let denom: Denom = cfg.denom.parse().map_err(|_| ClientError::Denom {
        name: cfg.denom.clone(),
    })?;

    let signer_info = SignerInfo::single_direct(Some(key.public_key()), account.sequence);
    let auth_info = signer_info.auth_info(Fee::from_amount_and_gas(
        Coin {
            denom: denom.clone(),
            amount: 0u64.into(),
        },
        0u64,
    ));

    let sign_doc = SignDoc::new(
        tx,
        &auth_info,
        &cfg.chain_id.parse().map_err(|_| ClientError::ChainId {
            chain_id: cfg.chain_id.to_string(),
        })?,
        account.account_number,
    )
    .map_err(ClientError::proto_encoding)?;

    let tx_raw = sign_doc.sign(key).map_err(ClientError::crypto)?;

    let mut client = ServiceClient::connect(cfg.grpc_endpoint.clone()).await?;

    let gas_info = client
        .simulate(SimulateRequest {
            tx: None,
            tx_bytes: tx_raw.to_bytes().map_err(ClientError::proto_encoding)?,
        })
        .await
        .map_err(|e| ClientError::CosmosSdk {
            res: ChainResponse {
                code: Code::Err(e.code() as u32),
                log: e.message().to_string(),
                ..Default::default()
            },
        })?
        .into_inner()
        .gas_info
        .ok_or(ClientError::MissingGasInfo)?;

    let (gas_limit, amount) = fee_for_gas(gas_info.gas_used, cfg);

    Ok(Fee::from_amount_and_gas(
        Coin {
            denom,
            amount: amount.into(),
        },
        gas_limit,
    ))
}

/// Gas limit and fee amount for a simulated `gas_used`.
pub(crate) fn fee_for_gas(gas_used: u64, cfg: &ChainCfg) -> (u64, u64) {
    let gas_limit = (gas_used as f64 * cfg.gas_adjustment).ceil();
    let amount = (gas_limit * cfg.gas_prices).ceil();
    (gas_limit as u64, amount as u64)
}
