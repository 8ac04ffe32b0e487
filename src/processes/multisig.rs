use cosmwasm_std::{CosmosMsg, Empty};
use log::info;
use serde::Serialize;

use super::error::DeployError;
use crate::client::chain_res::ExecResponse;
use crate::config::cfg::Coin;
use crate::config::key::SigningKey;
use crate::orchestrator::orc::Orchestrator;
use crate::orchestrator::sequence::Sequence;
use crate::protocol::multisig::{Cw3ExecuteMsg, Cw3QueryMsg, ProposalResponse, Status, Vote};
use crate::protocol::{wasm_execute, CW3_AP_TEAM};

pub const PROPOSAL_ID: &str = "proposal_id";

/// Executes `msg` on the deployed contract `target` through the AP team
/// multisig: `proposer` proposes, the other `voters` vote yes until the
/// proposal passes, then `proposer` executes it.
#[allow(clippy::too_many_arguments)]
pub async fn send_via_multisig<T: Serialize>(
    orc: &mut Orchestrator,
    proposer: &SigningKey,
    voters: &[&SigningKey],
    target: &str,
    title: &str,
    msg: &T,
    funds: Vec<Coin>,
) -> Result<ExecResponse, DeployError> {
    let msg = wasm_execute(
        &orc.address(target)?,
        msg,
        funds.into_iter().map(Into::into).collect(),
    )
    .map_err(DeployError::json)?;

    propose_and_execute(orc, proposer, voters, title, vec![msg]).await
}

/// Runs a multisig proposal carrying several messages from propose to execute.
pub async fn propose_and_execute(
    orc: &mut Orchestrator,
    proposer: &SigningKey,
    voters: &[&SigningKey],
    title: &str,
    msgs: Vec<CosmosMsg>,
) -> Result<ExecResponse, DeployError> {
    let mut seq = Sequence::new(format!("multisig proposal {:?}", title));

    let res = seq
        .step(
            "propose",
            orc.execute(
                CW3_AP_TEAM,
                "propose",
                &Cw3ExecuteMsg::Propose {
                    title: title.to_string(),
                    description: title.to_string(),
                    msgs,
                    earliest: None,
                    latest: None,
                },
                proposer,
                vec![],
            ),
        )
        .await?;

    let proposal_id = proposal_id(&res)?;
    info!("{:?} is proposal {}", title, proposal_id);

    for voter in voters.iter().filter(|v| v.name != proposer.name) {
        if proposal_status(orc, proposal_id).await? == Status::Passed {
            break;
        }
        seq.step(
            &format!("vote yes as {}", voter.name),
            orc.execute(
                CW3_AP_TEAM,
                "vote",
                &Cw3ExecuteMsg::<Empty>::Vote {
                    proposal_id,
                    vote: Vote::Yes,
                },
                voter,
                vec![],
            ),
        )
        .await?;
    }

    let res = seq
        .step(
            "execute",
            orc.execute(
                CW3_AP_TEAM,
                "execute",
                &Cw3ExecuteMsg::<Empty>::Execute { proposal_id },
                proposer,
                vec![],
            ),
        )
        .await?;

    Ok(res)
}

pub(crate) fn proposal_id(res: &ExecResponse) -> Result<u64, DeployError> {
    let raw = res
        .wasm_attribute(PROPOSAL_ID)
        .ok_or_else(|| DeployError::missing_attribute("wasm", PROPOSAL_ID))?;

    raw.parse().map_err(|_| DeployError::MalformedAttribute {
        key: PROPOSAL_ID.to_string(),
        value: raw.to_string(),
    })
}

async fn proposal_status(orc: &Orchestrator, proposal_id: u64) -> Result<Status, DeployError> {
    let res = orc
        .query(CW3_AP_TEAM, &Cw3QueryMsg::Proposal { proposal_id })
        .await?;
    let proposal: ProposalResponse = res.data()?;
    Ok(proposal.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{ChainResponse, QueryResponse};
    use crate::client::cosmwasm::CosmWasmClient;
    use crate::client::events::TxEvent;
    use crate::orchestrator::deploy::ContractMap;
    use assert_matches::assert_matches;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn member(name: &str) -> SigningKey {
        SigningKey::from_mnemonic(name, "unused in mocked client")
    }

    fn contracts() -> ContractMap {
        let mut map = ContractMap::default();
        map.add_address(CW3_AP_TEAM, "juno1cw3");
        map.add_address("registrar", "juno1registrar");
        map
    }

    fn proposal(status: &str) -> QueryResponse {
        QueryResponse {
            res: ChainResponse {
                data: Some(
                    serde_json::to_vec(&json!({
                        "id": 7,
                        "title": "t",
                        "description": "t",
                        "msgs": [],
                        "status": status,
                        "expires": {"at_height": 1000},
                        "threshold": {
                            "absolute_percentage": {"percentage": "0.5", "total_weight": 3}
                        },
                    }))
                    .unwrap(),
                ),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn proposes_votes_until_passed_then_executes() {
        let calls = Arc::new(Mutex::new(vec![]));
        let mut client = CosmWasmClient::faux();

        let log = calls.clone();
        unsafe {
            faux::when!(client.execute).then_unchecked(move |(addr, payload, key, _)| {
                assert_eq!(addr, "juno1cw3");
                let msg: Value = serde_json::from_slice(&payload).unwrap();
                let action = msg.as_object().unwrap().keys().next().unwrap().clone();
                log.lock().unwrap().push(format!("{}:{}", action, key.name));

                let mut res = ChainResponse::default();
                if action == "propose" {
                    let inner = &msg["propose"]["msgs"][0]["wasm"]["execute"];
                    assert_eq!(inner["contract_addr"], "juno1registrar");
                    res.events = vec![TxEvent::new(
                        "wasm",
                        &[("_contract_address", "juno1cw3"), ("proposal_id", "7")],
                    )];
                } else {
                    assert_eq!(msg[&action]["proposal_id"], 7);
                }
                Ok(ExecResponse { res })
            });
        }

        // open before the first vote, passed after it
        let queries = Arc::new(AtomicUsize::new(0));
        let seen = queries.clone();
        faux::when!(client.query).then(move |_| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            Ok(proposal(if n == 0 { "open" } else { "passed" }))
        });

        let mut orc = Orchestrator::mock(client, contracts());
        let (ap_team, ap_team_2, ap_team_3) = (member("ap_team"), member("ap_team_2"), member("ap_team_3"));

        send_via_multisig(
            &mut orc,
            &ap_team,
            &[&ap_team, &ap_team_2, &ap_team_3],
            "registrar",
            "update owner",
            &json!({"update_owner": {"new_owner": "juno1new"}}),
            vec![],
        )
        .await
        .unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["propose:ap_team", "vote:ap_team_2", "execute:ap_team"]
        );
        assert_eq!(queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_proposal_id_stops_before_voting() {
        let mut client = CosmWasmClient::faux();
        unsafe {
            faux::when!(client.execute).then_unchecked(|_| {
                Ok(ExecResponse {
                    res: ChainResponse::default(),
                })
            });
        }

        let mut orc = Orchestrator::mock(client, contracts());
        let ap_team = member("ap_team");

        let err = propose_and_execute(&mut orc, &ap_team, &[&ap_team], "noop", vec![])
            .await
            .unwrap_err();

        assert_matches!(err, DeployError::MissingAttribute { key, .. } if key == PROPOSAL_ID);
    }

    #[test]
    fn malformed_proposal_id() {
        let res = ExecResponse {
            res: ChainResponse {
                events: vec![TxEvent::new("wasm", &[("proposal_id", "seven")])],
                ..Default::default()
            },
        };
        assert_matches!(
            proposal_id(&res),
            Err(DeployError::MalformedAttribute { value, .. }) if value == "seven"
        );
    }
}
