use log::info;
use serde::Serialize;

use super::error::DeployError;
use super::execute_batch;
use crate::client::error::ClientError;
use crate::client::events::{self, TxEvent, CODE_ID, CONTRACT_ADDRESS};
use crate::config::cfg::Config;
use crate::config::wallets::{Wallets, AP_TREASURY, CHARITY_1, CHARITY_2, CHARITY_3};
use crate::orchestrator::batch::Batch;
use crate::orchestrator::error::ContractMapError;
use crate::orchestrator::orc::Orchestrator;
use crate::orchestrator::sequence::Sequence;
use crate::protocol::index_fund::{self, AllianceAction, AllianceMember, IndexFund};
use crate::protocol::multisig::{
    member, Cw3InstantiateMsg, Cw4ExecuteMsg, Cw4InstantiateMsg, Duration, Threshold,
};
use crate::protocol::registrar::{
    self, status, CreateEndowmentMsg, SplitDetails, UpdateConfigMsg, UpdateEndowmentStatusMsg,
    VaultAddMsg,
};
use crate::protocol::{
    endowment_name, vault, ACCOUNTS, CW3_AP_TEAM, CW3_MULTISIG, CW4_AP_TEAM, CW4_GROUP,
    INDEX_FUND, REGISTRAR, VAULT, VAULT_1, VAULT_2,
};

/// Addresses of a core protocol deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoreContracts {
    pub cw4_group: String,
    pub cw3_multisig: String,
    pub registrar: String,
    pub index_fund: String,
    pub vaults: Vec<String>,
    pub endowments: Vec<Endowment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Endowment {
    /// Signer that owns the endowment, e.g. `charity_1`.
    pub charity: String,
    pub address: String,
}

impl CoreContracts {
    /// Reads an earlier deployment back from the orchestrator's contract map.
    pub fn from_orchestrator(orc: &Orchestrator) -> Result<Self, ContractMapError> {
        let vaults = [VAULT_1, VAULT_2]
            .iter()
            .filter_map(|v| orc.address(v).ok())
            .collect();

        let endowments = [CHARITY_1, CHARITY_2, CHARITY_3]
            .iter()
            .filter_map(|c| {
                orc.address(&endowment_name(c)).ok().map(|address| Endowment {
                    charity: c.to_string(),
                    address,
                })
            })
            .collect();

        Ok(Self {
            cw4_group: orc.address(CW4_AP_TEAM)?,
            cw3_multisig: orc.address(CW3_AP_TEAM)?,
            registrar: orc.address(REGISTRAR)?,
            index_fund: orc.address(INDEX_FUND)?,
            vaults,
            endowments,
        })
    }

    pub fn endowment(&self, charity: &str) -> Option<&str> {
        self.endowments
            .iter()
            .find(|e| e.charity == charity)
            .map(|e| e.address.as_str())
    }

    pub fn endowment_addresses(&self) -> Vec<String> {
        self.endowments.iter().map(|e| e.address.clone()).collect()
    }
}

/// The endowment a `create_endowment` tx instantiated.
///
/// The registrar instantiates the endowment and the endowment may in turn
/// instantiate its own multisig, so the log can name several contracts. The
/// one running the accounts code is the endowment. Logs without code ids
/// name the endowment first.
pub(crate) fn endowment_address(
    events: &[TxEvent],
    accounts_code_id: u64,
) -> Result<String, DeployError> {
    let address = if events.iter().any(|e| e.attribute(CODE_ID).is_some()) {
        events::contract_address_for_code(events, accounts_code_id)
    } else {
        events::contract_address(events)
    };

    address
        .map(str::to_string)
        .ok_or_else(|| DeployError::missing_attribute("instantiate", CONTRACT_ADDRESS))
}

/// Deploys the core protocol and hands its ownership to the AP team multisig.
///
/// Every step depends on addresses or code ids produced by the steps before
/// it, so steps run strictly in order and the first failure stops the
/// deployment. The contract map is written to the state file at the end.
pub async fn setup_core(
    orc: &mut Orchestrator,
    cfg: &Config,
    wallets: &Wallets,
) -> Result<CoreContracts, DeployError> {
    let chain = orc.chain_cfg();
    let p = &cfg.protocol;
    let ap_team = &wallets.ap_team;
    let ap_team_addr = ap_team.address(&chain.prefix)?;
    let treasury = match &p.treasury {
        Some(t) => t.clone(),
        None => wallets.address(AP_TREASURY, &chain.prefix)?,
    };

    let mut seq = Sequence::new("setup core");

    seq.step(
        "store contracts",
        orc.store_contracts(&cfg.wasm_dir, ap_team),
    )
    .await?;
    let accounts_code_id = orc.code_id(ACCOUNTS)?;
    let cw3_code_id = orc.code_id(CW3_MULTISIG)?;
    let cw4_code_id = orc.code_id(CW4_GROUP)?;

    let members = wallets
        .ap_team_members()
        .iter()
        .map(|k| k.address(&chain.prefix).map(|addr| member(addr, 1)))
        .collect::<Result<Vec<_>, ClientError>>()?;

    let cw4_group = seq
        .step(
            "instantiate AP team cw4 group",
            orc.instantiate_as(
                CW4_GROUP,
                CW4_AP_TEAM,
                "instantiate",
                &Cw4InstantiateMsg {
                    admin: Some(ap_team_addr.clone()),
                    members,
                },
                ap_team,
                Some(ap_team_addr.clone()),
                vec![],
            ),
        )
        .await?
        .address;

    let cw3_multisig = seq
        .step(
            "instantiate AP team cw3 multisig",
            orc.instantiate_as(
                CW3_MULTISIG,
                CW3_AP_TEAM,
                "instantiate",
                &Cw3InstantiateMsg {
                    group_addr: cw4_group.clone(),
                    threshold: Threshold::AbsolutePercentage {
                        percentage: p.threshold_percentage,
                    },
                    max_voting_period: Duration::Height(p.max_voting_period_height),
                },
                ap_team,
                Some(ap_team_addr.clone()),
                vec![],
            ),
        )
        .await?
        .address;

    let registrar = seq
        .step(
            "instantiate registrar",
            orc.instantiate(
                REGISTRAR,
                "instantiate",
                &registrar::InstantiateMsg {
                    accounts_code_id: Some(accounts_code_id),
                    treasury,
                    tax_rate: p.tax_rate,
                    default_vault: None,
                    split_to_liquid: Some(SplitDetails {
                        max: p.split_max,
                        min: p.split_min,
                        default: p.split_default,
                    }),
                },
                ap_team,
                Some(ap_team_addr.clone()),
                vec![],
            ),
        )
        .await?
        .address;

    let index_fund = seq
        .step(
            "instantiate index fund",
            orc.instantiate(
                INDEX_FUND,
                "instantiate",
                &index_fund::InstantiateMsg {
                    registrar_contract: registrar.clone(),
                    fund_rotation: p.fund_rotation,
                    fund_member_limit: p.fund_member_limit,
                    funding_goal: p.funding_goal,
                },
                ap_team,
                Some(ap_team_addr.clone()),
                vec![],
            ),
        )
        .await?
        .address;

    let vaults = seq
        .step("instantiate and approve vaults", async {
            let mut vaults = vec![];
            for (i, name) in [VAULT_1, VAULT_2].into_iter().enumerate() {
                let res = orc
                    .instantiate_as(
                        VAULT,
                        name,
                        "instantiate",
                        &vault::InstantiateMsg {
                            name: format!("AP DP Token {}", i + 1),
                            symbol: format!("apDP{}", i + 1),
                            decimals: 6,
                            registrar_contract: registrar.clone(),
                            input_denom: chain.denom.clone(),
                            moneymarket: p.moneymarket.clone(),
                            tax_per_block: p.vault_tax_per_block,
                            harvest_to_liquid: p.vault_harvest_to_liquid,
                        },
                        ap_team,
                        Some(ap_team_addr.clone()),
                        vec![],
                    )
                    .await?;
                vaults.push(res.address);
            }

            let mut batch = Batch::new();
            for v in &vaults {
                batch = batch
                    .add(
                        REGISTRAR,
                        "vault_add",
                        &registrar::ExecuteMsg::VaultAdd(VaultAddMsg {
                            vault_addr: v.clone(),
                            input_denom: chain.denom.clone(),
                            yield_token: v.clone(),
                        }),
                        vec![],
                    )?
                    .add(
                        REGISTRAR,
                        "vault_update_status",
                        &registrar::ExecuteMsg::VaultUpdateStatus {
                            vault_addr: v.clone(),
                            approved: true,
                        },
                        vec![],
                    )?;
            }
            execute_batch(orc, batch, ap_team).await?;

            Ok::<_, DeployError>(vaults)
        })
        .await?;

    seq.step(
        "update registrar config",
        orc.execute(
            REGISTRAR,
            "update_config",
            &registrar::ExecuteMsg::UpdateConfig(UpdateConfigMsg {
                index_fund_contract: Some(index_fund.clone()),
                default_vault: vaults.first().cloned(),
                cw3_code: Some(cw3_code_id),
                cw4_code: Some(cw4_code_id),
                ..Default::default()
            }),
            ap_team,
            vec![],
        ),
    )
    .await?;

    let endowments = seq
        .step("create endowments", async {
            let mut endowments = vec![];
            for charity in wallets.charities() {
                let owner = charity.address(&chain.prefix)?;
                let res = orc
                    .execute(
                        REGISTRAR,
                        "create_endowment",
                        &registrar::ExecuteMsg::CreateEndowment(CreateEndowmentMsg {
                            owner: owner.clone(),
                            beneficiary: owner,
                            name: format!("Test Endowment {}", charity.name),
                            description: format!("Endowment owned by {}", charity.name),
                            withdraw_before_maturity: false,
                            maturity_time: None,
                            maturity_height: None,
                            split_max: p.split_max,
                            split_min: p.split_min,
                            split_default: p.split_default,
                        }),
                        ap_team,
                        vec![],
                    )
                    .await?;

                let address = endowment_address(&res.res.events, accounts_code_id)?;
                info!("{} endowment created at {}", charity.name, address);

                orc.register_address(&endowment_name(&charity.name), address.clone());
                endowments.push(Endowment {
                    charity: charity.name.clone(),
                    address,
                });
            }
            Ok::<_, DeployError>(endowments)
        })
        .await?;

    seq.step("approve endowments", async {
        let mut batch = Batch::new();
        for e in &endowments {
            batch = batch.add(
                REGISTRAR,
                "update_endowment_status",
                &registrar::ExecuteMsg::UpdateEndowmentStatus(UpdateEndowmentStatusMsg {
                    endowment_addr: e.address.clone(),
                    status: status::APPROVED,
                    beneficiary: None,
                }),
                vec![],
            )?;
        }
        execute_batch(orc, batch, ap_team).await
    })
    .await?;

    seq.step("create index funds", async {
        let addresses: Vec<String> = endowments.iter().map(|e| e.address.clone()).collect();
        let mut batch = Batch::new();
        for (id, members) in index_fund_members(&addresses) {
            batch = batch.add(
                INDEX_FUND,
                "create_fund",
                &index_fund::ExecuteMsg::CreateFund {
                    fund: IndexFund {
                        id,
                        name: format!("Test Index Fund {}", id),
                        description: format!("Index fund {} of the test deployment", id),
                        members,
                        rotating_fund: Some(true),
                        split_to_liquid: None,
                        expiry_time: None,
                        expiry_height: None,
                    },
                },
                vec![],
            )?;
        }
        if let Some(tca) = &wallets.tca {
            batch = batch.add(
                INDEX_FUND,
                "update_alliance_member_list",
                &index_fund::ExecuteMsg::UpdateAllianceMemberList {
                    address: tca.address(&chain.prefix)?,
                    member: AllianceMember {
                        name: "Test TCA Member".to_string(),
                        logo: None,
                        website: None,
                    },
                    action: AllianceAction::Add,
                },
                vec![],
            )?;
        }
        execute_batch(orc, batch, ap_team).await
    })
    .await?;

    seq.step("transfer ownership to AP team multisig", async {
        let batch = Batch::new()
            .add(
                REGISTRAR,
                "update_owner",
                &registrar::ExecuteMsg::UpdateOwner {
                    new_owner: cw3_multisig.clone(),
                },
                vec![],
            )?
            .add(
                INDEX_FUND,
                "update_owner",
                &index_fund::ExecuteMsg::UpdateOwner {
                    new_owner: cw3_multisig.clone(),
                },
                vec![],
            )?
            .add(
                CW4_AP_TEAM,
                "update_admin",
                &Cw4ExecuteMsg::UpdateAdmin {
                    admin: Some(cw3_multisig.clone()),
                },
                vec![],
            )?;
        execute_batch(orc, batch, ap_team).await
    })
    .await?;

    seq.step("save state", async { orc.save_state() }).await?;

    info!("core contracts deployed: {:?}", seq.completed());

    Ok(CoreContracts {
        cw4_group,
        cw3_multisig,
        registrar,
        index_fund,
        vaults,
        endowments,
    })
}

/// Two index funds: the first holds every endowment but the last, the
/// second every endowment but the first. With a single endowment both
/// funds hold it.
fn index_fund_members(endowments: &[String]) -> Vec<(u64, Vec<String>)> {
    if endowments.is_empty() {
        return vec![];
    }
    let n = endowments.len();
    let first = endowments[..n.saturating_sub(1).max(1)].to_vec();
    let second = endowments[(n - 1).min(1)..].to_vec();
    vec![(1, first), (2, second)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{ChainResponse, ExecResponse, InstantiateResponse, StoreCodeResponse};
    use crate::client::cosmwasm::CosmWasmClient;
    use crate::config::cfg::ChainCfg;
    use crate::orchestrator::deploy::ContractMap;
    use crate::protocol::CORE_CODES;
    use assert_matches::assert_matches;
    use serde_json::{json, Value};
    use std::fs;
    use std::sync::{Arc, Mutex};

    const MNEMONIC: &str = "clip hire initial neck maid actor venue client foam budget lock catalog sweet steak waste crater broccoli pipe steak sister coyote moment obvious choose";

    fn chain_cfg() -> ChainCfg {
        ChainCfg {
            denom: "ujunox".to_string(),
            prefix: "juno".to_string(),
            chain_id: "testing".to_string(),
            rpc_endpoint: "http://localhost:26657".to_string(),
            grpc_endpoint: "http://localhost:9090".to_string(),
            gas_prices: 0.1,
            gas_adjustment: 1.5,
        }
    }

    fn config(wasm_dir: &str) -> Config {
        let accounts: serde_json::Map<String, Value> = [
            "ap_team", "ap_team_2", "ap_team_3", "ap_treasury", "charity_1", "charity_2",
            "charity_3", "pleb", "tca",
        ]
        .iter()
        .map(|a| (a.to_string(), json!(MNEMONIC)))
        .collect();

        serde_json::from_value(json!({
            "chain_cfg": chain_cfg(),
            "accounts": accounts,
            "wasm_dir": wasm_dir,
        }))
        .unwrap()
    }

    fn code_id(name: &str) -> u64 {
        CORE_CODES.iter().position(|c| *c == name).unwrap() as u64 + 1
    }

    fn action(payload: &[u8]) -> String {
        let msg: Value = serde_json::from_slice(payload).unwrap();
        msg.as_object().unwrap().keys().next().unwrap().clone()
    }

    fn mock_chain(calls: Arc<Mutex<Vec<String>>>) -> CosmWasmClient {
        let mut client = CosmWasmClient::faux();

        faux::when!(client.chain_cfg).then(|_| chain_cfg());

        // wasm files hold their contract name
        unsafe {
            faux::when!(client.store).then_unchecked(|(payload, _)| {
                let name = String::from_utf8(payload).unwrap();
                Ok(StoreCodeResponse {
                    code_id: code_id(&name),
                    res: ChainResponse::default(),
                })
            });
        }

        let log = calls.clone();
        unsafe {
            faux::when!(client.instantiate).then_unchecked(move |(_, _, _, label, admin, _)| {
                assert!(admin.is_some());
                let instance = label.rsplit(' ').next().unwrap().to_string();
                log.lock().unwrap().push(format!("instantiate {}", instance));
                Ok(InstantiateResponse {
                    address: format!("juno1{}", instance),
                    res: ChainResponse::default(),
                })
            });
        }

        let log = calls.clone();
        let endowments = Arc::new(Mutex::new(0));
        unsafe {
            faux::when!(client.execute).then_unchecked(move |(addr, payload, _, _)| {
                let action = action(&payload);
                log.lock().unwrap().push(format!("{} {}", addr, action));

                let mut res = ChainResponse::default();
                if action == "create_endowment" {
                    let mut n = endowments.lock().unwrap();
                    *n += 1;
                    let endowment = format!("juno1endowment{}", *n);
                    // the endowment's own multisig is logged first
                    res.events = vec![
                        TxEvent::new(
                            "instantiate",
                            &[("_contract_address", "juno1subdao"), ("code_id", "6")],
                        ),
                        TxEvent::new(
                            "instantiate",
                            &[("_contract_address", endowment.as_str()), ("code_id", "3")],
                        ),
                    ];
                }
                Ok(ExecResponse { res })
            });
        }

        let log = calls;
        unsafe {
            faux::when!(client.execute_batch).then_unchecked(move |(msgs, _)| {
                let actions: Vec<String> = msgs.iter().map(|m| action(&m.payload)).collect();
                log.lock()
                    .unwrap()
                    .push(format!("batch {}", actions.join(",")));
                Ok(ExecResponse {
                    res: ChainResponse::default(),
                })
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
    async fn deploys_core_in_dependency_order() {
        let dir = wasm_dir("setup-core");
        let cfg = config(dir.to_str().unwrap());
        let wallets = Wallets::from_config(&cfg).unwrap();

        let calls = Arc::new(Mutex::new(vec![]));
        let mut orc = Orchestrator::mock(mock_chain(calls.clone()), ContractMap::default());

        let core = setup_core(&mut orc, &cfg, &wallets).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "instantiate cw4_ap_team",
                "instantiate cw3_ap_team",
                "instantiate registrar",
                "instantiate index_fund",
                "instantiate vault_1",
                "instantiate vault_2",
                "batch vault_add,vault_update_status,vault_add,vault_update_status",
                "juno1registrar update_config",
                "juno1registrar create_endowment",
                "juno1registrar create_endowment",
                "juno1registrar create_endowment",
                "batch update_endowment_status,update_endowment_status,update_endowment_status",
                "batch create_fund,create_fund,update_alliance_member_list",
                "batch update_owner,update_owner,update_admin",
            ]
        );

        assert_eq!(core.cw3_multisig, "juno1cw3_ap_team");
        assert_eq!(core.vaults, vec!["juno1vault_1", "juno1vault_2"]);
        assert_eq!(core.endowment(CHARITY_2), Some("juno1endowment2"));
        assert_eq!(
            orc.address(&endowment_name(CHARITY_3)).unwrap(),
            "juno1endowment3"
        );
        assert_eq!(CoreContracts::from_orchestrator(&orc).unwrap(), core);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_accounts_code_stops_before_instantiating() {
        let dir = wasm_dir("setup-core-missing");
        fs::remove_file(dir.join("accounts.wasm")).unwrap();
        let cfg = config(dir.to_str().unwrap());
        let wallets = Wallets::from_config(&cfg).unwrap();

        let calls = Arc::new(Mutex::new(vec![]));
        let mut orc = Orchestrator::mock(mock_chain(calls.clone()), ContractMap::default());

        let err = setup_core(&mut orc, &cfg, &wallets).await.unwrap_err();

        assert_matches!(
            err,
            DeployError::ContractMapError(ContractMapError::NotStored { name }) if name == ACCOUNTS
        );
        assert!(calls.lock().unwrap().is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn endowment_is_selected_by_code_id() {
        let events = vec![
            TxEvent::new("instantiate", &[("_contract_address", "juno1sub"), ("code_id", "9")]),
            TxEvent::new("instantiate", &[("_contract_address", "juno1endow"), ("code_id", "3")]),
        ];
        assert_eq!(endowment_address(&events, 3).unwrap(), "juno1endow");
        assert_matches!(
            endowment_address(&events, 4),
            Err(DeployError::MissingAttribute { .. })
        );
        assert_matches!(
            endowment_address(&[], 3),
            Err(DeployError::MissingAttribute { .. })
        );
    }

    #[test]
    fn logs_without_code_ids_name_the_endowment_first() {
        let events = vec![
            TxEvent::new("instantiate", &[("_contract_address", "juno1endow")]),
            TxEvent::new("instantiate", &[("_contract_address", "juno1sub")]),
        ];
        assert_eq!(endowment_address(&events, 3).unwrap(), "juno1endow");
    }

    #[test]
    fn index_funds_overlap_but_differ() {
        let s = |v: &[&str]| v.iter().map(|e| e.to_string()).collect::<Vec<_>>();

        assert!(index_fund_members(&[]).is_empty());
        assert_eq!(
            index_fund_members(&s(&["e1"])),
            vec![(1, s(&["e1"])), (2, s(&["e1"]))]
        );
        assert_eq!(
            index_fund_members(&s(&["e1", "e2"])),
            vec![(1, s(&["e1"])), (2, s(&["e2"]))]
        );
        assert_eq!(
            index_fund_members(&s(&["e1", "e2", "e3"])),
            vec![(1, s(&["e1", "e2"])), (2, s(&["e2", "e3"]))]
        );
    }
}
