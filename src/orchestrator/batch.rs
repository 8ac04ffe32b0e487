use serde::Serialize;

use super::deploy::ContractMap;
use super::error::ProcessError;
use crate::client::cosmwasm::ExecuteMsg;
use crate::config::cfg::Coin;

/// Several contract executions signed and broadcast as one tx.
///
/// Messages run in the order they were added and the chain applies them
/// atomically, so later messages can rely on the effects of earlier ones.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BatchOp {
    pub contract_name: String,
    pub op_name: String,
    pub payload: Vec<u8>,
    pub funds: Vec<Coin>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an execute msg for the deployed contract `contract_name`.
    pub fn add<S, T>(
        mut self,
        contract_name: S,
        op_name: S,
        msg: &T,
        funds: Vec<Coin>,
    ) -> Result<Self, ProcessError>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.ops.push(BatchOp {
            contract_name: contract_name.into(),
            op_name: op_name.into(),
            payload: serde_json::to_vec(msg).map_err(ProcessError::json)?,
            funds,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Name used for the whole batch in gas reports, e.g. `approve+deposit`.
    pub fn op_name(&self) -> String {
        self.ops
            .iter()
            .map(|o| o.op_name.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }

    pub(crate) fn first_contract(&self) -> Option<&str> {
        self.ops.first().map(|o| o.contract_name.as_str())
    }

    /// Resolves every contract name to its deployed address.
    pub(crate) fn resolve(self, contract_map: &ContractMap) -> Result<Vec<ExecuteMsg>, ProcessError> {
        self.ops
            .into_iter()
            .map(|op| -> Result<ExecuteMsg, ProcessError> {
                Ok(ExecuteMsg {
                    contract: contract_map.address(&op.contract_name)?,
                    payload: op.payload,
                    funds: op.funds,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Batch;
    use crate::config::cfg::Coin;
    use crate::orchestrator::deploy::ContractMap;
    use crate::orchestrator::error::{ContractMapError, ProcessError};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn resolves_names_in_insertion_order() {
        let mut map = ContractMap::default();
        map.add_address("halo_token", "juno1token");
        map.add_address("halo_gov", "juno1gov");

        let batch = Batch::new()
            .add(
                "halo_token",
                "increase_allowance",
                &json!({"increase_allowance": {"spender": "juno1gov", "amount": "10"}}),
                vec![],
            )
            .unwrap()
            .add(
                "halo_gov",
                "stake",
                &json!({"stake_voting_tokens": {}}),
                vec![Coin::new(5, "ujunox")],
            )
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.op_name(), "increase_allowance+stake");
        assert_eq!(batch.first_contract(), Some("halo_token"));

        let msgs = batch.resolve(&map).unwrap();
        assert_eq!(msgs[0].contract, "juno1token");
        assert_eq!(msgs[1].contract, "juno1gov");
        assert_eq!(msgs[1].funds, vec![Coin::new(5, "ujunox")]);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&msgs[1].payload).unwrap(),
            json!({"stake_voting_tokens": {}})
        );
    }

    #[test]
    fn unknown_contract_fails_resolution() {
        let batch = Batch::new()
            .add("registrar", "update_config", &json!({}), vec![])
            .unwrap();

        assert_matches!(
            batch.resolve(&ContractMap::default()),
            Err(ProcessError::ContractMapError(ContractMapError::NotStored { name })) if name == "registrar"
        );
    }
}
