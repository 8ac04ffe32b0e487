use log::info;
use std::fmt::Debug;

use super::error::{AssertionError, ScenarioError};
use crate::orchestrator::error::ProcessError;

pub fn ensure_eq<T: PartialEq + Debug>(
    what: &str,
    actual: T,
    expected: T,
) -> Result<(), AssertionError> {
    if actual == expected {
        return Ok(());
    }
    Err(AssertionError::NotEqual {
        what: what.to_string(),
        expected: format!("{:?}", expected),
        actual: format!("{:?}", actual),
    })
}

pub fn ensure(what: &str, condition: bool) -> Result<(), AssertionError> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::Failed {
            what: what.to_string(),
        })
    }
}

/// Passes only when the chain itself rejected the tx. Failures before the
/// tx reached the chain, e.g. an unknown contract name, are returned as is.
pub fn expect_rejected<T>(what: &str, res: Result<T, ProcessError>) -> Result<(), ScenarioError> {
    match res {
        Ok(_) => Err(AssertionError::NotRejected {
            what: what.to_string(),
        }
        .into()),
        Err(e) if e.is_chain_rejection() => {
            info!("{} rejected as expected: {}", what, e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::ChainResponse;
    use crate::client::error::ClientError;
    use crate::orchestrator::error::ContractMapError;
    use assert_matches::assert_matches;

    #[test]
    fn ensure_eq_reports_both_sides() {
        assert_eq!(ensure_eq("fund count", 2, 2), Ok(()));
        assert_eq!(
            ensure_eq("fund count", 1, 2),
            Err(AssertionError::NotEqual {
                what: "fund count".to_string(),
                expected: "2".to_string(),
                actual: "1".to_string(),
            })
        );
    }

    #[test]
    fn ensure_names_the_condition() {
        assert!(ensure("member added", true).is_ok());
        assert_eq!(
            ensure("member added", false).unwrap_err().to_string(),
            "member added: condition does not hold"
        );
    }

    #[test]
    fn only_chain_rejections_pass() {
        let rejected: Result<(), ProcessError> = Err(ProcessError::ClientError(ClientError::CosmosSdk {
            res: ChainResponse {
                log: "endowment is not approved".to_string(),
                ..Default::default()
            },
        }));
        assert!(expect_rejected("deposit", rejected).is_ok());

        assert_matches!(
            expect_rejected("deposit", Ok::<_, ProcessError>(())),
            Err(ScenarioError::AssertionError(AssertionError::NotRejected { .. }))
        );

        let not_sent: Result<(), ProcessError> = Err(ContractMapError::NotDeployed {
            name: "endowment".to_string(),
        }
        .into());
        assert_matches!(
            expect_rejected("deposit", not_sent),
            Err(ScenarioError::ProcessError(ProcessError::ContractMapError(_)))
        );
    }
}
