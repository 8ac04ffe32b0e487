use log::{info, warn};

use super::error::DeployError;
use super::multisig::propose_and_execute;
use super::setup::CoreContracts;
use crate::config::cfg::Config;
use crate::config::wallets::Wallets;
use crate::orchestrator::orc::Orchestrator;
use crate::orchestrator::sequence::Sequence;
use crate::protocol::registrar::{self, UpdateConfigMsg};
use crate::protocol::{
    accounts, endowment_name, index_fund, vault, wasm_execute, ACCOUNTS, INDEX_FUND, REGISTRAR,
    VAULT, VAULT_1, VAULT_2,
};

/// Stores the current wasm files and migrates a core deployment to them.
///
/// The registrar, index fund and vaults keep `ap_team` as their wasm admin
/// and are migrated by it. Endowments are instantiated by the registrar: on a
/// local devnet `ap_team` migrates them one by one, elsewhere the AP team
/// multisig points the registrar at the new accounts code and has it migrate
/// every endowment.
pub async fn migrate_core(
    orc: &mut Orchestrator,
    cfg: &Config,
    wallets: &Wallets,
    contracts: &CoreContracts,
) -> Result<(), DeployError> {
    let ap_team = &wallets.ap_team;
    let mut seq = Sequence::new("migrate core");

    seq.step(
        "store contracts",
        orc.store_contracts(&cfg.wasm_dir, ap_team),
    )
    .await?;

    let registrar_code_id = orc.code_id(REGISTRAR)?;
    seq.step(
        "migrate registrar",
        orc.migrate(
            REGISTRAR,
            registrar_code_id,
            "migrate",
            &registrar::MigrateMsg {},
            ap_team,
        ),
    )
    .await?;

    let index_fund_code_id = orc.code_id(INDEX_FUND)?;
    seq.step(
        "migrate index fund",
        orc.migrate(
            INDEX_FUND,
            index_fund_code_id,
            "migrate",
            &index_fund::MigrateMsg {},
            ap_team,
        ),
    )
    .await?;

    let vault_code_id = orc.code_id(VAULT)?;
    for v in [VAULT_1, VAULT_2] {
        if orc.address(v).is_err() {
            warn!("{} not deployed, skipping", v);
            continue;
        }
        seq.step(
            &format!("migrate {}", v),
            orc.migrate(v, vault_code_id, "migrate", &vault::MigrateMsg {}, ap_team),
        )
        .await?;
    }

    let accounts_code_id = orc.code_id(ACCOUNTS)?;
    if cfg.network.is_local() {
        for e in &contracts.endowments {
            seq.step(
                &format!("migrate endowment of {}", e.charity),
                orc.migrate(
                    endowment_name(&e.charity),
                    accounts_code_id,
                    "migrate".to_string(),
                    &accounts::MigrateMsg {},
                    ap_team,
                ),
            )
            .await?;
        }
    } else {
        let msgs = vec![
            wasm_execute(
                &contracts.registrar,
                &registrar::ExecuteMsg::UpdateConfig(UpdateConfigMsg {
                    accounts_code_id: Some(accounts_code_id),
                    ..Default::default()
                }),
                vec![],
            ),
            wasm_execute(
                &contracts.registrar,
                &registrar::ExecuteMsg::MigrateAccounts {},
                vec![],
            ),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(DeployError::json)?;

        seq.step(
            "migrate endowments through registrar",
            propose_and_execute(
                orc,
                ap_team,
                &wallets.ap_team_members(),
                "Migrate endowments",
                msgs,
            ),
        )
        .await?;
    }

    seq.step("save state", async { orc.save_state() }).await?;

    info!("core contracts migrated: {:?}", seq.completed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{
        ChainResponse, ExecResponse, MigrateResponse, StoreCodeResponse,
    };
    use crate::client::cosmwasm::CosmWasmClient;
    use crate::client::events::TxEvent;
    use crate::config::cfg::ChainCfg;
    use crate::config::network::Network;
    use crate::orchestrator::deploy::ContractMap;
    use crate::processes::setup::Endowment;
    use crate::protocol::{CORE_CODES, CW3_AP_TEAM};
    use serde_json::{json, Value};
    use std::fs;
    use std::sync::{Arc, Mutex};

    const MNEMONIC: &str = "clip hire initial neck maid actor venue client foam budget lock catalog sweet steak waste crater broccoli pipe steak sister coyote moment obvious choose";

    fn config(network: Network, wasm_dir: &str) -> Config {
        let chain_cfg = ChainCfg {
            denom: "ujunox".to_string(),
            prefix: "juno".to_string(),
            chain_id: "testing".to_string(),
            rpc_endpoint: "http://localhost:26657".to_string(),
            grpc_endpoint: "http://localhost:9090".to_string(),
            gas_prices: 0.1,
            gas_adjustment: 1.5,
        };
        let accounts: serde_json::Map<String, Value> = [
            "ap_team", "ap_team_2", "ap_team_3", "ap_treasury", "charity_1", "charity_2",
            "charity_3", "pleb", "tca",
        ]
        .iter()
        .map(|a| (a.to_string(), json!(MNEMONIC)))
        .collect();

        serde_json::from_value(json!({
            "network": network,
            "chain_cfg": chain_cfg,
            "accounts": accounts,
            "wasm_dir": wasm_dir,
        }))
        .unwrap()
    }

    fn deployed() -> (ContractMap, CoreContracts) {
        let mut map = ContractMap::default();
        for (name, addr) in [
            (REGISTRAR, "juno1registrar"),
            (INDEX_FUND, "juno1fund"),
            (VAULT_1, "juno1vault1"),
            (CW3_AP_TEAM, "juno1cw3"),
            ("cw4_ap_team", "juno1cw4"),
            ("endowment_charity_1", "juno1endow1"),
            ("endowment_charity_2", "juno1endow2"),
        ] {
            map.add_address(name, addr);
        }

        let core = CoreContracts {
            cw4_group: "juno1cw4".to_string(),
            cw3_multisig: "juno1cw3".to_string(),
            registrar: "juno1registrar".to_string(),
            index_fund: "juno1fund".to_string(),
            vaults: vec!["juno1vault1".to_string()],
            endowments: vec![
                Endowment {
                    charity: "charity_1".to_string(),
                    address: "juno1endow1".to_string(),
                },
                Endowment {
                    charity: "charity_2".to_string(),
                    address: "juno1endow2".to_string(),
                },
            ],
        };
        (map, core)
    }

    fn mock_chain(calls: Arc<Mutex<Vec<String>>>) -> CosmWasmClient {
        let mut client = CosmWasmClient::faux();

        // new code ids start after the ones of the first deployment
        unsafe {
            faux::when!(client.store).then_unchecked(|(payload, _)| {
                let name = String::from_utf8(payload).unwrap();
                let idx = CORE_CODES.iter().position(|c| *c == name).unwrap();
                Ok(StoreCodeResponse {
                    code_id: 10 + idx as u64,
                    res: ChainResponse::default(),
                })
            });
        }

        let log = calls.clone();
        unsafe {
            faux::when!(client.migrate).then_unchecked(move |(addr, code_id, _, _)| {
                log.lock().unwrap().push(format!("migrate {} to {}", addr, code_id));
                Ok(MigrateResponse {
                    res: ChainResponse::default(),
                })
            });
        }

        let log = calls;
        unsafe {
            faux::when!(client.execute).then_unchecked(move |(addr, payload, _, _)| {
                let msg: Value = serde_json::from_slice(&payload).unwrap();
                let action = msg.as_object().unwrap().keys().next().unwrap().clone();
                log.lock().unwrap().push(format!("{} {}", addr, action));

                let mut res = ChainResponse::default();
                if action == "propose" {
                    assert_eq!(msg["propose"]["msgs"].as_array().unwrap().len(), 2);
                    res.events = vec![TxEvent::new("wasm", &[("proposal_id", "1")])];
                }
                Ok(ExecResponse { res })
            });
        }

        client
    }

    fn wasm_dir(test: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "endowment-harness-{}-{}",
            test,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        for name in CORE_CODES {
            fs::write(dir.join(format!("{}.wasm", name)), name).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn local_migrates_endowments_directly() {
        let dir = wasm_dir("migrate-local");
        let cfg = config(Network::Local, dir.to_str().unwrap());
        let wallets = Wallets::from_config(&cfg).unwrap();
        let (map, core) = deployed();

        let calls = Arc::new(Mutex::new(vec![]));
        let mut orc = Orchestrator::mock(mock_chain(calls.clone()), map);

        migrate_core(&mut orc, &cfg, &wallets, &core).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "migrate juno1registrar to 10",
                "migrate juno1fund to 11",
                "migrate juno1vault1 to 13",
                "migrate juno1endow1 to 12",
                "migrate juno1endow2 to 12",
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn testnet_migrates_endowments_through_multisig() {
        let dir = wasm_dir("migrate-testnet");
        let mut cfg = config(Network::Testnet, dir.to_str().unwrap());
        cfg.accounts.retain(|name, _| name == "ap_team");
        let wallets = Wallets::from_config(&cfg).unwrap();
        let (map, core) = deployed();

        let calls = Arc::new(Mutex::new(vec![]));
        let mut orc = Orchestrator::mock(mock_chain(calls.clone()), map);

        migrate_core(&mut orc, &cfg, &wallets, &core).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "migrate juno1registrar to 10",
                "migrate juno1fund to 11",
                "migrate juno1vault1 to 13",
                "juno1cw3 propose",
                "juno1cw3 execute",
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
