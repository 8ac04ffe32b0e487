use cosmwasm_std::Uint128;
use cw20::{Cw20Coin, MinterResponse};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::DeployError;
use super::multisig::send_via_multisig;
use crate::airdrop::{Airdrop, AirdropEntry};
use crate::client::error::ClientError;
use crate::config::cfg::Config;
use crate::config::wallets::Wallets;
use crate::orchestrator::batch::Batch;
use crate::orchestrator::error::ContractMapError;
use crate::orchestrator::orc::Orchestrator;
use crate::orchestrator::sequence::Sequence;
use crate::protocol::halo::{
    airdrop, collector, community, distributor, gov, staking, vesting, TokenExecuteMsg,
    TokenInstantiateMsg,
};
use crate::protocol::registrar::{self, UpdateConfigMsg};
use crate::protocol::{
    HALO_AIRDROP, HALO_CODES, HALO_COLLECTOR, HALO_COMMUNITY, HALO_DISTRIBUTOR, HALO_GOV,
    HALO_STAKING, HALO_TOKEN, HALO_VESTING, REGISTRAR,
};

/// Airdrop allotment per signer when no claim list file is configured.
pub const DEFAULT_AIRDROP_AMOUNT: u128 = 1_000_000;

pub const AIRDROP_STAGE: u8 = 1;

/// Addresses of a HALO deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HaloContracts {
    pub token: String,
    pub gov: String,
    pub airdrop: String,
    pub staking: String,
    pub community: String,
    pub distributor: String,
    pub collector: String,
    pub vesting: String,
}

impl HaloContracts {
    pub fn from_orchestrator(orc: &Orchestrator) -> Result<Self, ContractMapError> {
        Ok(Self {
            token: orc.address(HALO_TOKEN)?,
            gov: orc.address(HALO_GOV)?,
            airdrop: orc.address(HALO_AIRDROP)?,
            staking: orc.address(HALO_STAKING)?,
            community: orc.address(HALO_COMMUNITY)?,
            distributor: orc.address(HALO_DISTRIBUTOR)?,
            collector: orc.address(HALO_COLLECTOR)?,
            vesting: orc.address(HALO_VESTING)?,
        })
    }
}

/// The airdrop claim list: the configured claim file, or every signer but
/// `ap_team` with [DEFAULT_AIRDROP_AMOUNT].
pub fn airdrop_claims(
    cfg: &Config,
    wallets: &Wallets,
    prefix: &str,
) -> Result<Airdrop, DeployError> {
    if let Some(file) = &cfg.protocol.halo.airdrop_file {
        return Ok(Airdrop::from_file(file)?);
    }

    let entries = wallets
        .all()
        .into_iter()
        .filter(|k| k.name != wallets.ap_team.name)
        .map(|k| {
            k.address(prefix)
                .map(|addr| AirdropEntry::new(addr, DEFAULT_AIRDROP_AMOUNT))
        })
        .collect::<Result<Vec<_>, ClientError>>()?;

    Ok(Airdrop::new(entries)?)
}

/// Deploys the HALO token family and funds the airdrop.
///
/// Codes already in the contract map are reused; the rest are stored from
/// `<wasm_dir>/<name>.wasm`. When the core protocol is deployed too, its
/// registrar is pointed at the HALO token and gov through the AP team
/// multisig.
pub async fn setup_halo(
    orc: &mut Orchestrator,
    cfg: &Config,
    wallets: &Wallets,
) -> Result<HaloContracts, DeployError> {
    let chain = orc.chain_cfg();
    let h = &cfg.protocol.halo;
    let ap_team = &wallets.ap_team;
    let ap_team_addr = ap_team.address(&chain.prefix)?;
    let admin = Some(ap_team_addr.clone());

    let claims = airdrop_claims(cfg, wallets, &chain.prefix)?;
    let airdrop_total = claims
        .entries()
        .iter()
        .fold(Uint128::zero(), |acc, e| acc + e.amount);
    let merkle_root = claims.root();

    let mut seq = Sequence::new("setup halo");

    for code in HALO_CODES {
        if orc.code_id(code).is_ok() {
            continue;
        }
        let path = Path::new(&cfg.wasm_dir).join(format!("{}.wasm", code));
        seq.step(
            &format!("store {}", code),
            orc.store_contract(code, &path, ap_team),
        )
        .await?;
    }

    let gov = seq
        .step(
            "instantiate gov",
            orc.instantiate(
                HALO_GOV,
                "instantiate",
                &gov::InstantiateMsg {
                    quorum: h.quorum,
                    threshold: h.threshold,
                    voting_period: h.voting_period,
                    timelock_period: h.timelock_period,
                    proposal_deposit: h.proposal_deposit,
                    snapshot_period: h.snapshot_period,
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    let token = seq
        .step(
            "instantiate token",
            orc.instantiate(
                HALO_TOKEN,
                "instantiate",
                &TokenInstantiateMsg {
                    name: h.token_name.clone(),
                    symbol: h.token_symbol.clone(),
                    decimals: h.decimals,
                    initial_balances: vec![Cw20Coin {
                        address: ap_team_addr.clone(),
                        amount: h.total_supply,
                    }],
                    mint: Some(MinterResponse {
                        minter: gov.clone(),
                        cap: Some(h.total_supply),
                    }),
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    seq.step(
        "register token with gov",
        orc.execute(
            HALO_GOV,
            "register_contracts",
            &gov::ExecuteMsg::RegisterContracts {
                halo_token: token.clone(),
            },
            ap_team,
            vec![],
        ),
    )
    .await?;

    let airdrop = seq
        .step(
            "instantiate airdrop",
            orc.instantiate(
                HALO_AIRDROP,
                "instantiate",
                &airdrop::InstantiateMsg {
                    owner: Some(ap_team_addr.clone()),
                    halo_token: token.clone(),
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    seq.step("fund airdrop and register merkle root", async {
        let batch = Batch::new()
            .add(
                HALO_TOKEN,
                "transfer",
                &TokenExecuteMsg::Transfer {
                    recipient: airdrop.clone(),
                    amount: airdrop_total,
                },
                vec![],
            )?
            .add(
                HALO_AIRDROP,
                "register_merkle_root",
                &airdrop::ExecuteMsg::RegisterMerkleRoot {
                    merkle_root: merkle_root.clone(),
                },
                vec![],
            )?;
        orc.execute_batch(batch, ap_team).await
    })
    .await?;
    info!(
        "airdrop of {} to {} claimers, merkle root {}",
        airdrop_total,
        claims.entries().len(),
        merkle_root
    );

    let staking = seq
        .step(
            "instantiate staking",
            orc.instantiate(
                HALO_STAKING,
                "instantiate",
                &staking::InstantiateMsg {
                    halo_token: token.clone(),
                    staking_token: token.clone(),
                    distribution_schedule: vec![(0, 1_000_000, Uint128::new(1_000_000_000))],
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    let community = seq
        .step(
            "instantiate community",
            orc.instantiate(
                HALO_COMMUNITY,
                "instantiate",
                &community::InstantiateMsg {
                    gov_contract: gov.clone(),
                    halo_token: token.clone(),
                    spend_limit: h.distributor_spend_limit,
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    let distributor = seq
        .step(
            "instantiate distributor",
            orc.instantiate(
                HALO_DISTRIBUTOR,
                "instantiate",
                &distributor::InstantiateMsg {
                    gov_contract: gov.clone(),
                    halo_token: token.clone(),
                    whitelist: vec![],
                    spend_limit: h.distributor_spend_limit,
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    let collector = seq
        .step(
            "instantiate collector",
            orc.instantiate(
                HALO_COLLECTOR,
                "instantiate",
                &collector::InstantiateMsg {
                    gov_contract: gov.clone(),
                    halo_token: token.clone(),
                    distributor_contract: distributor.clone(),
                    reward_factor: h.collector_reward_factor,
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    let vesting = seq
        .step(
            "instantiate vesting",
            orc.instantiate(
                HALO_VESTING,
                "instantiate",
                &vesting::InstantiateMsg {
                    owner: ap_team_addr.clone(),
                    halo_token: token.clone(),
                    genesis_time: unix_now(),
                },
                ap_team,
                admin.clone(),
                vec![],
            ),
        )
        .await?
        .address;

    if orc.address(REGISTRAR).is_ok() {
        let update = registrar::ExecuteMsg::UpdateConfig(UpdateConfigMsg {
            halo_token: Some(token.clone()),
            gov_contract: Some(gov.clone()),
            collector_addr: Some(collector.clone()),
            ..Default::default()
        });
        seq.step(
            "register HALO with registrar",
            send_via_multisig(
                orc,
                ap_team,
                &wallets.ap_team_members(),
                REGISTRAR,
                "Register HALO contracts",
                &update,
                vec![],
            ),
        )
        .await?;
    } else {
        warn!("registrar not deployed, HALO contracts are not registered with it");
    }

    seq.step("save state", async { orc.save_state() }).await?;

    Ok(HaloContracts {
        token,
        gov,
        airdrop,
        staking,
        community,
        distributor,
        collector,
        vesting,
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
