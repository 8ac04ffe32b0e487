use log::warn;

use super::cfg::Config;
use super::error::ConfigError;
use super::key::SigningKey;
use crate::client::error::ClientError;

pub const AP_TEAM: &str = "ap_team";
pub const AP_TEAM_2: &str = "ap_team_2";
pub const AP_TEAM_3: &str = "ap_team_3";
pub const AP_TREASURY: &str = "ap_treasury";
pub const CHARITY_1: &str = "charity_1";
pub const CHARITY_2: &str = "charity_2";
pub const CHARITY_3: &str = "charity_3";
pub const PLEB: &str = "pleb";
pub const TCA: &str = "tca";

/// The signers the protocol deployment and the test scenarios act as.
///
/// `ap_team` deploys and owns everything; the other AP team members vote on
/// multisig proposals; charities own endowments; `pleb` is an arbitrary
/// donor and `tca` a member of the donor alliance.
#[derive(Clone, Debug)]
pub struct Wallets {
    pub ap_team: SigningKey,
    pub ap_team_2: Option<SigningKey>,
    pub ap_team_3: Option<SigningKey>,
    pub ap_treasury: Option<SigningKey>,
    pub charity_1: Option<SigningKey>,
    pub charity_2: Option<SigningKey>,
    pub charity_3: Option<SigningKey>,
    pub pleb: Option<SigningKey>,
    pub tca: Option<SigningKey>,
}

impl Wallets {
    /// Builds wallets from the configured mnemonics.
    ///
    /// A local devnet is fully under our control, so every account is
    /// required there. Elsewhere only `ap_team` is.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let strict = cfg.network.is_local();

        let optional = |name: &str| -> Result<Option<SigningKey>, ConfigError> {
            match cfg.mnemonic(name) {
                Some(m) => Ok(Some(SigningKey::from_mnemonic(name, m))),
                None if strict => Err(ConfigError::MissingAccount {
                    name: name.to_string(),
                }),
                None => {
                    warn!("no mnemonic configured for {}, skipping", name);
                    Ok(None)
                }
            }
        };

        let ap_team = cfg
            .mnemonic(AP_TEAM)
            .map(|m| SigningKey::from_mnemonic(AP_TEAM, m))
            .ok_or_else(|| ConfigError::MissingAccount {
                name: AP_TEAM.to_string(),
            })?;

        let wallets = Self {
            ap_team,
            ap_team_2: optional(AP_TEAM_2)?,
            ap_team_3: optional(AP_TEAM_3)?,
            ap_treasury: optional(AP_TREASURY)?,
            charity_1: optional(CHARITY_1)?,
            charity_2: optional(CHARITY_2)?,
            charity_3: optional(CHARITY_3)?,
            pleb: optional(PLEB)?,
            tca: optional(TCA)?,
        };

        // surface bad mnemonics at startup instead of at the first tx
        for key in wallets.all() {
            key.to_account(&cfg.chain_cfg.prefix).map_err(|_| {
                ConfigError::InvalidMnemonic {
                    name: key.name.clone(),
                }
            })?;
        }

        Ok(wallets)
    }

    /// Every configured signer, `ap_team` first.
    pub fn all(&self) -> Vec<&SigningKey> {
        let mut keys = vec![&self.ap_team];
        keys.extend(
            [
                &self.ap_team_2,
                &self.ap_team_3,
                &self.ap_treasury,
                &self.charity_1,
                &self.charity_2,
                &self.charity_3,
                &self.pleb,
                &self.tca,
            ]
            .into_iter()
            .flatten(),
        );
        keys
    }

    /// AP team members that vote on multisig proposals, `ap_team` first.
    pub fn ap_team_members(&self) -> Vec<&SigningKey> {
        let mut keys = vec![&self.ap_team];
        keys.extend([&self.ap_team_2, &self.ap_team_3].into_iter().flatten());
        keys
    }

    pub fn charities(&self) -> Vec<&SigningKey> {
        [&self.charity_1, &self.charity_2, &self.charity_3]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Looks up a signer by its account role name.
    pub fn get(&self, name: &str) -> Option<&SigningKey> {
        self.all().into_iter().find(|k| k.name == name)
    }

    /// Like [Self::get()] but a missing signer is an error.
    pub fn require(&self, name: &str) -> Result<&SigningKey, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::MissingAccount {
            name: name.to_string(),
        })
    }

    pub fn address(&self, name: &str, prefix: &str) -> Result<String, ClientError> {
        self.get(name)
            .ok_or_else(|| ClientError::AccountId {
                id: name.to_string(),
            })?
            .address(prefix)
    }
}
