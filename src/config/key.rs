use cosmrs::bip32;
use cosmrs::crypto::secp256k1;
use cosmrs::AccountId;
use std::fmt;

use crate::client::error::ClientError;

// https://github.com/confio/cosmos-hd-key-derivation-spec#the-cosmos-hub-path
const DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

#[derive(Clone)]
pub struct SigningKey {
    /// human readable key name
    pub name: String,
    /// private key associated with `name`
    pub key: Key,
}

#[derive(Clone)]
pub enum Key {
    /// Mnemonic allows you to pass the private key mnemonic words
    /// to the harness for configuring a transaction signing key.
    /// Mainnet mnemonics belong in the environment, never in a config file.
    Mnemonic(String),
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn from_mnemonic<S: Into<String>, M: Into<String>>(name: S, mnemonic: M) -> Self {
        Self {
            name: name.into(),
            key: Key::Mnemonic(mnemonic.into()),
        }
    }

    pub fn to_account(&self, prefix: &str) -> Result<AccountId, ClientError> {
        let key: secp256k1::SigningKey = self.try_into()?;
        key.public_key()
            .account_id(prefix)
            .map_err(|_| ClientError::AccountId {
                id: self.name.clone(),
            })
    }

    /// Bech32 address of this key for the given chain prefix.
    pub fn address(&self, prefix: &str) -> Result<String, ClientError> {
        Ok(self.to_account(prefix)?.to_string())
    }
}

impl TryFrom<&SigningKey> for secp256k1::SigningKey {
    type Error = ClientError;

    fn try_from(signer: &SigningKey) -> Result<secp256k1::SigningKey, ClientError> {
        match &signer.key {
            Key::Mnemonic(phrase) => {
                let seed = bip32::Mnemonic::new(phrase.trim(), bip32::Language::English)
                    .map_err(|_| ClientError::Mnemonic)?
                    .to_seed("");

                let path = DERIVATION_PATH
                    .parse::<bip32::DerivationPath>()
                    .map_err(|_| ClientError::DerivationPath)?;

                Ok(bip32::XPrv::derive_from_path(seed, &path)
                    .map_err(|_| ClientError::DerivationPath)?
                    .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SigningKey;
    use crate::client::error::ClientError;
    use assert_matches::assert_matches;

    // well known localjuno test mnemonic
    const TEST_MNEMONIC: &str = "clip hire initial neck maid actor venue client foam budget lock catalog sweet steak waste crater broccoli pipe steak sister coyote moment obvious choose";

    #[test]
    fn derives_bech32_address_with_prefix() {
        let key = SigningKey::from_mnemonic("validator", TEST_MNEMONIC);

        let juno = key.address("juno").unwrap();
        let terra = key.address("terra").unwrap();

        assert!(juno.starts_with("juno1"));
        assert!(terra.starts_with("terra1"));
        // same key, same derivation
        assert_eq!(juno, key.address("juno").unwrap());
    }

    #[test]
    fn invalid_mnemonic_is_rejected() {
        let key = SigningKey::from_mnemonic("bad", "not a real mnemonic");
        assert_matches!(key.to_account("juno"), Err(ClientError::Mnemonic));
    }

    #[test]
    fn debug_hides_key_material() {
        let key = SigningKey::from_mnemonic("ap_team", TEST_MNEMONIC);
        let out = format!("{:?}", key);
        assert!(out.contains("ap_team"));
        assert!(!out.contains("clip"));
    }
}
