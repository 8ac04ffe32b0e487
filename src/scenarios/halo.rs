use cosmwasm_std::Uint128;

use super::assert::{ensure, ensure_eq};
use super::error::ScenarioError;
use super::TestContext;
use crate::config::wallets::PLEB;
use crate::processes::halo::{airdrop_claims, AIRDROP_STAGE};
use crate::protocol::halo::{
    airdrop, collector, gov, staking, TokenBalanceResponse, TokenExecuteMsg, TokenInfoResponse,
    TokenQueryMsg,
};
use crate::protocol::{to_json_binary, HALO_AIRDROP, HALO_COLLECTOR, HALO_GOV, HALO_STAKING, HALO_TOKEN};

/// HALO staked in gov and bonded in staking; both come out of the airdrop.
pub const STAKE: u128 = 100_000;

/// `pleb` claims its airdrop allotment with a proof from the claim list.
pub(super) async fn airdrop_claim(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let pleb = ctx.address(PLEB)?;
    let claims = airdrop_claims(&ctx.cfg, &ctx.wallets, &ctx.prefix)?;
    let amount = claims
        .entries()
        .iter()
        .find(|e| e.address == pleb)
        .map(|e| e.amount)
        .ok_or_else(|| ScenarioError::missing(format!("airdrop claim of {}", pleb)))?;
    let proof = claims
        .proof(&pleb, amount)
        .ok_or_else(|| ScenarioError::missing(format!("airdrop proof of {}", pleb)))?;

    let before = token_balance(ctx, &pleb).await?;

    let key = ctx.wallets.require(PLEB)?;
    ctx.orc
        .execute(
            HALO_AIRDROP,
            "claim",
            &airdrop::ExecuteMsg::Claim {
                stage: AIRDROP_STAGE,
                amount,
                proof,
            },
            key,
            vec![],
        )
        .await?;

    let claimed: airdrop::IsClaimedResponse = ctx
        .query(
            HALO_AIRDROP,
            &airdrop::QueryMsg::IsClaimed {
                stage: AIRDROP_STAGE,
                address: pleb.clone(),
            },
        )
        .await?;
    ensure("airdrop marked as claimed", claimed.is_claimed)?;
    ensure_eq("HALO balance after claim", token_balance(ctx, &pleb).await?, before + amount)?;

    Ok(())
}

pub(super) async fn gov_stake(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let pleb = ctx.address(PLEB)?;
    let gov = ctx.halo()?.gov.clone();

    send_tokens(ctx, gov, to_json_binary(&gov::Cw20HookMsg::StakeVotingTokens {})?).await?;

    let staker: gov::StakerResponse = ctx
        .query(HALO_GOV, &gov::QueryMsg::Staker { address: pleb })
        .await?;
    ensure("gov holds the staked HALO", staker.balance >= Uint128::new(STAKE))?;

    Ok(())
}

pub(super) async fn staking_bond(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let pleb = ctx.address(PLEB)?;
    let staking = ctx.halo()?.staking.clone();

    send_tokens(ctx, staking, to_json_binary(&staking::Cw20HookMsg::Bond {})?).await?;

    let info: staking::StakerInfoResponse = ctx
        .query(
            HALO_STAKING,
            &staking::QueryMsg::StakerInfo {
                staker: pleb,
                block_height: None,
            },
        )
        .await?;
    ensure("HALO bonded in staking", info.bond_amount >= Uint128::new(STAKE))?;

    Ok(())
}

/// Sends native fees to the collector and sweeps them.
pub(super) async fn collector_sweep(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let collector = ctx.halo()?.collector.clone();
    let funds = ctx.coins(super::core_protocol::DONATION);

    ctx.orc.send(&collector, funds, &ctx.wallets.ap_team).await?;
    ctx.orc
        .execute(
            HALO_COLLECTOR,
            "sweep",
            &collector::ExecuteMsg::Sweep {
                denom: ctx.denom.clone(),
            },
            &ctx.wallets.ap_team,
            vec![],
        )
        .await?;

    Ok(())
}

pub(super) async fn halo_queries(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let halo = ctx.halo()?.clone();
    let h = ctx.cfg.protocol.halo.clone();

    let info: TokenInfoResponse = ctx.query(HALO_TOKEN, &TokenQueryMsg::TokenInfo {}).await?;
    ensure_eq("token symbol", info.symbol, h.token_symbol)?;
    ensure_eq("token decimals", info.decimals, h.decimals)?;

    let config: gov::ConfigResponse = ctx.query(HALO_GOV, &gov::QueryMsg::Config {}).await?;
    ensure_eq("gov token", config.halo_token.as_str(), halo.token.as_str())?;
    let _: gov::StateResponse = ctx.query(HALO_GOV, &gov::QueryMsg::State {}).await?;

    let config: airdrop::ConfigResponse = ctx.query(HALO_AIRDROP, &airdrop::QueryMsg::Config {}).await?;
    ensure_eq("airdrop token", config.halo_token.as_str(), halo.token.as_str())?;

    let latest: airdrop::LatestStageResponse = ctx
        .query(HALO_AIRDROP, &airdrop::QueryMsg::LatestStage {})
        .await?;
    ensure("airdrop stage registered", latest.latest_stage >= AIRDROP_STAGE)?;

    let claims = airdrop_claims(&ctx.cfg, &ctx.wallets, &ctx.prefix)?;
    let root: airdrop::MerkleRootResponse = ctx
        .query(
            HALO_AIRDROP,
            &airdrop::QueryMsg::MerkleRoot {
                stage: AIRDROP_STAGE,
            },
        )
        .await?;
    ensure_eq("airdrop merkle root", root.merkle_root, claims.root())?;

    let config: collector::ConfigResponse = ctx.query(HALO_COLLECTOR, &collector::QueryMsg::Config {}).await?;
    ensure_eq(
        "collector distributor",
        config.distributor_contract.as_str(),
        halo.distributor.as_str(),
    )?;

    Ok(())
}

async fn token_balance(ctx: &TestContext, address: &str) -> Result<Uint128, ScenarioError> {
    let res: TokenBalanceResponse = ctx
        .query(
            HALO_TOKEN,
            &TokenQueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .await?;
    Ok(res.balance)
}

/// `pleb` sends [STAKE] HALO to `contract` with a cw20 receive hook.
async fn send_tokens(
    ctx: &mut TestContext,
    contract: String,
    msg: cosmwasm_std::Binary,
) -> Result<(), ScenarioError> {
    let key = ctx.wallets.require(PLEB)?;
    ctx.orc
        .execute(
            HALO_TOKEN,
            "send",
            &TokenExecuteMsg::Send {
                contract,
                amount: Uint128::new(STAKE),
                msg,
            },
            key,
            vec![],
        )
        .await?;
    Ok(())
}
