use cosmwasm_std::Decimal;
use log::info;

use super::assert::{ensure, ensure_eq, expect_rejected};
use super::error::ScenarioError;
use super::TestContext;
use crate::config::wallets::{CHARITY_1, PLEB, TCA};
use crate::processes::setup::endowment_address;
use crate::protocol::accounts::{self, BalanceResponse, EndowmentDetailsResponse, Strategy};
use crate::protocol::index_fund::{self, FundDetailsResponse, FundListResponse, IndexFund};
use crate::protocol::multisig::{
    member, Cw3QueryMsg, Cw4ExecuteMsg, Cw4QueryMsg, MemberListResponse, VoterListResponse,
};
use crate::protocol::registrar::{
    self, CreateEndowmentMsg, EndowmentListResponse, UpdateConfigMsg, VaultListResponse,
};
use crate::protocol::vault::{self, VaultConfigResponse};
use crate::protocol::{
    endowment_name, ACCOUNTS, CW3_AP_TEAM, CW4_AP_TEAM, INDEX_FUND, REGISTRAR, VAULT_1, VAULT_2,
};

/// Native amount used for donations.
pub const DONATION: u64 = 1_000_000;

/// Contract map name of the endowment that is never approved.
pub const UNAPPROVED_ENDOWMENT: &str = "endowment_unapproved";

const ACTIVE_FUND: u64 = 1;

pub(super) async fn add_ap_team_member(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let pleb = ctx.address(PLEB)?;

    ctx.via_multisig(
        CW4_AP_TEAM,
        "Add AP team member",
        &Cw4ExecuteMsg::UpdateMembers {
            remove: vec![],
            add: vec![member(pleb.clone(), 1)],
        },
    )
    .await?;
    ensure("new member in AP team group", is_member(ctx, &pleb).await?)?;

    ctx.via_multisig(
        CW4_AP_TEAM,
        "Remove AP team member",
        &Cw4ExecuteMsg::UpdateMembers {
            remove: vec![pleb.clone()],
            add: vec![],
        },
    )
    .await?;
    ensure("member removed from AP team group", !is_member(ctx, &pleb).await?)?;

    Ok(())
}

async fn is_member(ctx: &TestContext, addr: &str) -> Result<bool, ScenarioError> {
    let res: MemberListResponse = ctx
        .query(
            CW4_AP_TEAM,
            &Cw4QueryMsg::ListMembers {
                start_after: None,
                limit: None,
            },
        )
        .await?;
    Ok(res.members.iter().any(|m| m.addr == addr))
}

pub(super) async fn update_registrar_config(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let before: registrar::ConfigResponse = ctx.query(REGISTRAR, &registrar::QueryMsg::Config {}).await?;
    let new_tax_rate = before.tax_rate + Decimal::percent(1);

    ctx.via_multisig(
        REGISTRAR,
        "Raise registrar tax rate",
        &registrar::ExecuteMsg::UpdateConfig(UpdateConfigMsg {
            tax_rate: Some(new_tax_rate),
            ..Default::default()
        }),
    )
    .await?;
    let updated: registrar::ConfigResponse = ctx.query(REGISTRAR, &registrar::QueryMsg::Config {}).await?;
    ensure_eq("registrar tax rate", updated.tax_rate, new_tax_rate)?;

    ctx.via_multisig(
        REGISTRAR,
        "Restore registrar tax rate",
        &registrar::ExecuteMsg::UpdateConfig(UpdateConfigMsg {
            tax_rate: Some(before.tax_rate),
            ..Default::default()
        }),
    )
    .await?;
    let restored: registrar::ConfigResponse = ctx.query(REGISTRAR, &registrar::QueryMsg::Config {}).await?;
    ensure_eq("restored registrar tax rate", restored.tax_rate, before.tax_rate)?;

    Ok(())
}

/// Donations to an endowment the AP team never approved must bounce.
pub(super) async fn reject_unapproved_donation(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let accounts_code_id = ctx.orc.code_id(ACCOUNTS)?;
    let owner = ctx.address(CHARITY_1)?;
    let p = ctx.cfg.protocol.clone();

    let res = ctx
        .orc
        .execute(
            REGISTRAR,
            "create_endowment",
            &registrar::ExecuteMsg::CreateEndowment(CreateEndowmentMsg {
                owner: owner.clone(),
                beneficiary: owner,
                name: "Unapproved Endowment".to_string(),
                description: "Never approved by the AP team".to_string(),
                withdraw_before_maturity: false,
                maturity_time: None,
                maturity_height: None,
                split_max: p.split_max,
                split_min: p.split_min,
                split_default: p.split_default,
            }),
            &ctx.wallets.ap_team,
            vec![],
        )
        .await?;
    let address = endowment_address(&res.res.events, accounts_code_id)?;
    info!("created unapproved endowment {}", address);
    ctx.orc.register_address(UNAPPROVED_ENDOWMENT, address);

    let funds = ctx.coins(DONATION);
    let pleb = ctx.wallets.require(PLEB)?;
    let res = ctx
        .orc
        .execute(
            UNAPPROVED_ENDOWMENT,
            "deposit",
            &accounts::ExecuteMsg::Deposit(even_split()),
            pleb,
            funds,
        )
        .await;

    expect_rejected("donation to unapproved endowment", res)
}

pub(super) async fn donor_deposit_to_index_fund(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    deposit_to_index_fund(ctx, PLEB, None, None).await
}

/// A TCA member donates straight to the active fund and picks a liquid split.
pub(super) async fn tca_deposit_to_index_fund(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    deposit_to_index_fund(ctx, TCA, Some(ACTIVE_FUND), Some(Decimal::percent(50))).await
}

async fn deposit_to_index_fund(
    ctx: &mut TestContext,
    donor: &str,
    fund_id: Option<u64>,
    split: Option<Decimal>,
) -> Result<(), ScenarioError> {
    let donor_addr = ctx.address(donor)?;
    let before = ctx.orc.balance(&donor_addr, &ctx.denom).await?;

    let funds = ctx.coins(DONATION);
    let key = ctx.wallets.require(donor)?;
    ctx.orc
        .execute(
            INDEX_FUND,
            "deposit",
            &index_fund::ExecuteMsg::Deposit(index_fund::DepositMsg { fund_id, split }),
            key,
            funds,
        )
        .await?;

    let after = ctx.orc.balance(&donor_addr, &ctx.denom).await?;
    // fees come on top of the donation
    ensure(
        &format!("{} balance dropped by at least the donation", donor),
        before.saturating_sub(after) >= u128::from(DONATION),
    )?;

    Ok(())
}

/// `charity_1` splits its endowment evenly across the deployed vaults.
pub(super) async fn charity_updates_strategies(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let vaults = ctx.core()?.vaults.clone();
    if vaults.is_empty() {
        return Err(ScenarioError::missing("vaults"));
    }
    let strategies = even_strategies(vaults);

    let endowment = endowment_name(CHARITY_1);
    let charity = ctx.wallets.require(CHARITY_1)?;
    ctx.orc
        .execute(
            endowment.as_str(),
            "update_strategies",
            &accounts::ExecuteMsg::UpdateStrategies {
                strategies: strategies.clone(),
            },
            charity,
            vec![],
        )
        .await?;

    let details: EndowmentDetailsResponse = ctx.query(&endowment, &accounts::QueryMsg::Endowment {}).await?;
    ensure_eq("endowment strategies", details.strategies, strategies)?;

    Ok(())
}

/// `charity_1` donates to its own endowment, then withdraws half of the
/// liquid part to itself as beneficiary.
pub(super) async fn beneficiary_withdraws_liquid(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let endowment = endowment_name(CHARITY_1);
    let beneficiary = ctx.address(CHARITY_1)?;

    let funds = ctx.coins(DONATION);
    let charity = ctx.wallets.require(CHARITY_1)?;
    ctx.orc
        .execute(
            endowment.as_str(),
            "deposit",
            &accounts::ExecuteMsg::Deposit(even_split()),
            charity,
            funds,
        )
        .await?;

    let before: BalanceResponse = ctx.query(&endowment, &accounts::QueryMsg::Balance {}).await?;
    let liquid = before.liquid(&ctx.denom);
    ensure("endowment holds liquid funds", !liquid.is_zero())?;
    let amount = liquid.multiply_ratio(1u128, 2u128);

    let charity = ctx.wallets.require(CHARITY_1)?;
    ctx.orc
        .execute(
            endowment.as_str(),
            "withdraw_liquid",
            &accounts::ExecuteMsg::WithdrawLiquid {
                liquid_amount: amount,
                beneficiary,
            },
            charity,
            vec![],
        )
        .await?;

    let after: BalanceResponse = ctx.query(&endowment, &accounts::QueryMsg::Balance {}).await?;
    ensure_eq("liquid balance after withdrawal", after.liquid(&ctx.denom), liquid - amount)?;

    Ok(())
}

pub(super) async fn create_and_remove_index_fund(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let members: Vec<String> = ctx.core()?.endowment_addresses().into_iter().take(1).collect();
    let id = fund_ids(ctx).await?.into_iter().max().unwrap_or_default() + 1;

    ctx.via_multisig(
        INDEX_FUND,
        "Create index fund",
        &index_fund::ExecuteMsg::CreateFund {
            fund: IndexFund {
                id,
                name: "Scenario Fund".to_string(),
                description: "Created and removed by the test suite".to_string(),
                members,
                rotating_fund: Some(false),
                split_to_liquid: None,
                expiry_time: None,
                expiry_height: None,
            },
        },
    )
    .await?;
    ensure(&format!("fund {} listed", id), fund_ids(ctx).await?.contains(&id))?;

    ctx.via_multisig(
        INDEX_FUND,
        "Remove index fund",
        &index_fund::ExecuteMsg::RemoveFund { fund_id: id },
    )
    .await?;
    ensure(&format!("fund {} removed", id), !fund_ids(ctx).await?.contains(&id))?;

    Ok(())
}

async fn fund_ids(ctx: &TestContext) -> Result<Vec<u64>, ScenarioError> {
    let res: FundListResponse = ctx
        .query(
            INDEX_FUND,
            &index_fund::QueryMsg::FundsList {
                start_after: None,
                limit: None,
            },
        )
        .await?;
    Ok(res.funds.into_iter().map(|f| f.id).collect())
}

/// Adds an endowment to the active fund through the multisig and takes it
/// out again.
pub(super) async fn update_fund_members(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let members = fund_members(ctx, ACTIVE_FUND).await?;
    let outsider = ctx
        .core()?
        .endowment_addresses()
        .into_iter()
        .find(|e| !members.contains(e))
        .ok_or_else(|| {
            ScenarioError::missing(format!("endowment outside of fund {}", ACTIVE_FUND))
        })?;

    ctx.via_multisig(
        INDEX_FUND,
        "Add fund member",
        &index_fund::ExecuteMsg::UpdateMembers {
            fund_id: ACTIVE_FUND,
            add: vec![outsider.clone()],
            remove: vec![],
        },
    )
    .await?;
    ensure(
        "endowment added to fund",
        fund_members(ctx, ACTIVE_FUND).await?.contains(&outsider),
    )?;

    ctx.via_multisig(
        INDEX_FUND,
        "Remove fund member",
        &index_fund::ExecuteMsg::UpdateMembers {
            fund_id: ACTIVE_FUND,
            add: vec![],
            remove: vec![outsider.clone()],
        },
    )
    .await?;
    ensure(
        "endowment removed from fund",
        !fund_members(ctx, ACTIVE_FUND).await?.contains(&outsider),
    )?;

    Ok(())
}

async fn fund_members(ctx: &TestContext, fund_id: u64) -> Result<Vec<String>, ScenarioError> {
    let res: FundDetailsResponse = ctx
        .query(INDEX_FUND, &index_fund::QueryMsg::FundDetails { fund_id })
        .await?;
    res.fund
        .map(|f| f.members)
        .ok_or_else(|| ScenarioError::missing(format!("index fund {}", fund_id)))
}

pub(super) async fn query_registrar(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let core = ctx.core()?.clone();

    let config: registrar::ConfigResponse = ctx.query(REGISTRAR, &registrar::QueryMsg::Config {}).await?;
    ensure_eq("registrar owner", config.owner.as_str(), core.cw3_multisig.as_str())?;
    ensure_eq("registrar index fund", config.index_fund, Some(core.index_fund.clone()))?;

    let list: EndowmentListResponse = ctx.query(REGISTRAR, &registrar::QueryMsg::all_endowments()).await?;
    for e in &core.endowments {
        ensure(
            &format!("endowment of {} registered", e.charity),
            list.endowments.iter().any(|l| l.address == e.address),
        )?;
    }

    let vaults: VaultListResponse = ctx
        .query(
            REGISTRAR,
            &registrar::QueryMsg::ApprovedVaultList {
                start_after: None,
                limit: None,
            },
        )
        .await?;
    for v in &core.vaults {
        ensure(
            &format!("vault {} approved", v),
            vaults.vaults.iter().any(|d| &d.address == v && d.approved),
        )?;
    }

    Ok(())
}

pub(super) async fn query_index_fund(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let core = ctx.core()?.clone();

    let config: index_fund::ConfigResponse = ctx.query(INDEX_FUND, &index_fund::QueryMsg::Config {}).await?;
    ensure_eq("index fund owner", config.owner.as_str(), core.cw3_multisig.as_str())?;
    ensure_eq(
        "index fund registrar",
        config.registrar_contract.as_str(),
        core.registrar.as_str(),
    )?;

    let state: index_fund::StateResponse = ctx.query(INDEX_FUND, &index_fund::QueryMsg::State {}).await?;
    ensure("index fund has funds", state.total_funds > 0)?;
    ensure_eq(
        "listed funds",
        fund_ids(ctx).await?.len() as u64,
        state.total_funds,
    )?;

    let active: FundDetailsResponse = ctx
        .query(INDEX_FUND, &index_fund::QueryMsg::ActiveFundDetails {})
        .await?;
    ensure("an index fund is active", active.fund.is_some())?;

    Ok(())
}

pub(super) async fn query_accounts(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let core = ctx.core()?.clone();

    for e in &core.endowments {
        let name = endowment_name(&e.charity);
        let owner = ctx.address(&e.charity)?;

        let config: accounts::ConfigResponse = ctx.query(&name, &accounts::QueryMsg::Config {}).await?;
        ensure_eq(
            &format!("{} registrar", name),
            config.registrar_contract.as_str(),
            core.registrar.as_str(),
        )?;

        let details: EndowmentDetailsResponse = ctx.query(&name, &accounts::QueryMsg::Endowment {}).await?;
        ensure_eq(&format!("{} owner", name), details.owner, owner)?;

        let balance: BalanceResponse = ctx.query(&name, &accounts::QueryMsg::Balance {}).await?;
        info!(
            "{}: locked {} liquid {}",
            name,
            balance.locked(&ctx.denom),
            balance.liquid(&ctx.denom)
        );
    }

    Ok(())
}

pub(super) async fn query_multisig(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let members = ctx
        .wallets
        .ap_team_members()
        .iter()
        .map(|k| k.address(&ctx.prefix))
        .collect::<Result<Vec<_>, _>>()?;

    let voters: VoterListResponse = ctx
        .query(
            CW3_AP_TEAM,
            &Cw3QueryMsg::ListVoters {
                start_after: None,
                limit: None,
            },
        )
        .await?;
    let group: MemberListResponse = ctx
        .query(
            CW4_AP_TEAM,
            &Cw4QueryMsg::ListMembers {
                start_after: None,
                limit: None,
            },
        )
        .await?;

    for m in &members {
        ensure(
            &format!("{} votes on the multisig", m),
            voters.voters.iter().any(|v| &v.addr == m),
        )?;
        ensure(
            &format!("{} in the AP team group", m),
            group.members.iter().any(|g| &g.addr == m),
        )?;
    }

    Ok(())
}

pub(super) async fn query_vaults(ctx: &mut TestContext) -> Result<(), ScenarioError> {
    let registrar = ctx.core()?.registrar.clone();

    for v in [VAULT_1, VAULT_2] {
        if ctx.orc.address(v).is_err() {
            continue;
        }
        let config: VaultConfigResponse = ctx.query(v, &vault::QueryMsg::VaultConfig {}).await?;
        ensure_eq(
            &format!("{} registrar", v),
            config.registrar_contract.as_str(),
            registrar.as_str(),
        )?;
        ensure_eq(
            &format!("{} input denom", v),
            config.input_denom.as_str(),
            ctx.denom.as_str(),
        )?;
    }

    Ok(())
}

/// Spreads an endowment over `vaults` in whole percents. The last vault
/// takes what the even split leaves over.
fn even_strategies(vaults: Vec<String>) -> Vec<Strategy> {
    let n = vaults.len() as u64;
    if n == 0 {
        return vec![];
    }
    let share = 100 / n;
    let last = 100 - share * (n - 1);

    vaults
        .into_iter()
        .enumerate()
        .map(|(i, vault)| Strategy {
            vault,
            percentage: Decimal::percent(if i as u64 == n - 1 { last } else { share }),
        })
        .collect()
}

fn even_split() -> accounts::DepositMsg {
    accounts::DepositMsg {
        locked_percentage: Decimal::percent(50),
        liquid_percentage: Decimal::percent(50),
    }
}

#[cfg(test)]
mod tests {
    use super::even_strategies;
    use cosmwasm_std::Decimal;

    fn vaults(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("juno1vault{}", i)).collect()
    }

    #[test]
    fn strategies_allocate_the_whole_endowment() {
        for n in 1..=7 {
            let total = even_strategies(vaults(n))
                .iter()
                .fold(Decimal::zero(), |acc, s| acc + s.percentage);
            assert_eq!(total, Decimal::one(), "{} vaults", n);
        }
    }

    #[test]
    fn last_vault_takes_the_remainder() {
        let percentages: Vec<Decimal> = even_strategies(vaults(3))
            .into_iter()
            .map(|s| s.percentage)
            .collect();
        assert_eq!(
            percentages,
            vec![Decimal::percent(33), Decimal::percent(33), Decimal::percent(34)]
        );
        assert!(even_strategies(vec![]).is_empty());
    }
}
