//! Lookups over the events a transaction emitted.
//!
//! Instantiating one contract can instantiate several others (an endowment
//! brings its own cw3/cw4 pair), and wasmd has renamed event types and
//! attribute keys over time, so every lookup here tolerates a mix of both.

use cosmrs::tendermint::abci::Event;
use serde::{Deserialize, Serialize};

pub const CONTRACT_ADDRESS: &str = "_contract_address";
pub const LEGACY_CONTRACT_ADDRESS: &str = "contract_address";
pub const CODE_ID: &str = "code_id";

const INSTANTIATE_EVENTS: [&str; 2] = ["instantiate", "instantiate_contract"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

impl TxEvent {
    pub fn new<S: Into<String>>(kind: S, attributes: &[(&str, &str)]) -> Self {
        Self {
            kind: kind.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| EventAttribute {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

impl From<&Event> for TxEvent {
    fn from(event: &Event) -> TxEvent {
        TxEvent {
            kind: event.type_str.clone(),
            attributes: event
                .attributes
                .iter()
                .map(|tag| EventAttribute {
                    key: tag.key.to_string(),
                    value: tag.value.to_string(),
                })
                .collect(),
        }
    }
}

/// First event of type `kind`.
pub fn find_event<'a>(events: &'a [TxEvent], kind: &str) -> Option<&'a TxEvent> {
    events.iter().find(|e| e.kind == kind)
}

/// First attribute `key` inside an event of type `kind`.
pub fn find_attribute<'a>(events: &'a [TxEvent], kind: &str, key: &str) -> Option<&'a str> {
    events
        .iter()
        .filter(|e| e.kind == kind)
        .find_map(|e| e.attribute(key))
}

/// First attribute `key` in any event.
pub fn find_any_attribute<'a>(events: &'a [TxEvent], key: &str) -> Option<&'a str> {
    events.iter().find_map(|e| e.attribute(key))
}

/// Attribute emitted by a contract through its response (`wasm` event).
pub fn wasm_attribute<'a>(events: &'a [TxEvent], key: &str) -> Option<&'a str> {
    find_attribute(events, "wasm", key)
}

/// Code id reported by a `store_code` tx.
pub fn code_id(events: &[TxEvent]) -> Option<u64> {
    find_attribute(events, "store_code", CODE_ID).and_then(|v| v.parse().ok())
}

fn instance_address(event: &TxEvent) -> Option<&str> {
    event
        .attribute(CONTRACT_ADDRESS)
        .or_else(|| event.attribute(LEGACY_CONTRACT_ADDRESS))
}

/// Address of the first contract instantiated in the tx.
///
/// `instantiate` events are preferred. Older chains only report the address
/// inside the `wasm` event, which is used as a fallback.
pub fn contract_address(events: &[TxEvent]) -> Option<&str> {
    events
        .iter()
        .filter(|e| INSTANTIATE_EVENTS.contains(&e.kind.as_str()))
        .find_map(instance_address)
        .or_else(|| {
            events
                .iter()
                .filter(|e| e.kind == "wasm")
                .find_map(instance_address)
        })
}

/// Address of the contract instantiated from `code_id`.
///
/// Each instantiate event carries the code id it was created from, which is
/// how a parent contract is told apart from the sub-contracts it spawns.
pub fn contract_address_for_code(events: &[TxEvent], code_id: u64) -> Option<&str> {
    let code_id = code_id.to_string();
    events
        .iter()
        .filter(|e| INSTANTIATE_EVENTS.contains(&e.kind.as_str()))
        .filter(|e| e.attribute(CODE_ID) == Some(code_id.as_str()))
        .find_map(instance_address)
}

/// Every instantiated contract address in log order, without duplicates.
pub fn contract_addresses(events: &[TxEvent]) -> Vec<&str> {
    let mut addrs: Vec<&str> = vec![];
    for addr in events
        .iter()
        .filter(|e| INSTANTIATE_EVENTS.contains(&e.kind.as_str()))
        .filter_map(instance_address)
    {
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }
    addrs
}

#[cfg(test)]
mod tests {
    use super::*;

    // an endowment creation: registrar -> accounts -> cw4 + cw3
    fn create_endowment_events() -> Vec<TxEvent> {
        vec![
            TxEvent::new("message", &[("action", "/cosmwasm.wasm.v1.MsgExecuteContract")]),
            TxEvent::new("execute", &[(CONTRACT_ADDRESS, "juno1registrar")]),
            TxEvent::new(
                "wasm",
                &[
                    (CONTRACT_ADDRESS, "juno1registrar"),
                    ("action", "create_endowment"),
                ],
            ),
            TxEvent::new(
                "instantiate",
                &[(CONTRACT_ADDRESS, "juno1accounts"), (CODE_ID, "3")],
            ),
            TxEvent::new(
                "instantiate",
                &[(CONTRACT_ADDRESS, "juno1group"), (CODE_ID, "4")],
            ),
            TxEvent::new(
                "instantiate",
                &[(CONTRACT_ADDRESS, "juno1multisig"), (CODE_ID, "5")],
            ),
            TxEvent::new(
                "instantiate",
                &[(CONTRACT_ADDRESS, "juno1group"), (CODE_ID, "4")],
            ),
            TxEvent::new(
                "wasm",
                &[
                    (CONTRACT_ADDRESS, "juno1accounts"),
                    ("endow_addr", "juno1accounts"),
                ],
            ),
        ]
    }

    #[test]
    fn finds_first_instantiated_address() {
        let events = create_endowment_events();
        assert_eq!(contract_address(&events), Some("juno1accounts"));
    }

    #[test]
    fn selects_instance_by_code_id() {
        let events = create_endowment_events();
        assert_eq!(contract_address_for_code(&events, 5), Some("juno1multisig"));
        assert_eq!(contract_address_for_code(&events, 4), Some("juno1group"));
        assert_eq!(contract_address_for_code(&events, 99), None);
    }

    #[test]
    fn lists_unique_addresses_in_log_order() {
        let events = create_endowment_events();
        assert_eq!(
            contract_addresses(&events),
            vec!["juno1accounts", "juno1group", "juno1multisig"]
        );
    }

    #[test]
    fn falls_back_to_legacy_layouts() {
        let terra_style = vec![
            TxEvent::new("message", &[("sender", "terra1ap")]),
            TxEvent::new(
                "instantiate_contract",
                &[("creator", "terra1ap"), (LEGACY_CONTRACT_ADDRESS, "terra1reg")],
            ),
        ];
        assert_eq!(contract_address(&terra_style), Some("terra1reg"));

        let wasm_only = vec![TxEvent::new("wasm", &[(CONTRACT_ADDRESS, "juno1only")])];
        assert_eq!(contract_address(&wasm_only), Some("juno1only"));
    }

    #[test]
    fn reads_store_code_id_and_wasm_attributes() {
        let events = vec![
            TxEvent::new("message", &[("module", "wasm")]),
            TxEvent::new("store_code", &[(CODE_ID, "17")]),
            TxEvent::new("wasm", &[("proposal_id", "8")]),
        ];
        assert_eq!(code_id(&events), Some(17));
        assert_eq!(wasm_attribute(&events, "proposal_id"), Some("8"));
        assert_eq!(find_any_attribute(&events, "module"), Some("wasm"));
        assert_eq!(find_attribute(&events, "message", "proposal_id"), None);
    }

    #[test]
    fn missing_or_malformed_values_are_none() {
        let events = vec![TxEvent::new("store_code", &[(CODE_ID, "abc")])];
        assert_eq!(code_id(&events), None);
        assert_eq!(contract_address(&events), None);
        assert!(find_event(&events, "wasm").is_none());
        assert!(contract_addresses(&[]).is_empty());
    }
}
