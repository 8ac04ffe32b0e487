use log::{error, info};
use std::error::Error;
use std::future::Future;
use thiserror::Error;

/// Runs dependent on-chain steps strictly one after another.
///
/// Each step is awaited to completion before the next one is built, so a
/// step can use addresses and ids produced by the steps before it. The
/// first failure ends the sequence; the error names the failing step and
/// lists the steps already committed to the chain.
#[derive(Debug)]
pub struct Sequence {
    name: String,
    completed: Vec<String>,
}

#[derive(Error, Debug)]
#[error("{sequence}: step {step:?} failed after {} completed step(s)", .completed.len())]
pub struct StepError {
    pub sequence: String,
    pub step: String,
    pub completed: Vec<String>,
    pub source: Box<dyn Error + Send + Sync>,
}

impl Sequence {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            completed: vec![],
        }
    }

    pub async fn step<T, E, F>(&mut self, step: &str, fut: F) -> Result<T, StepError>
    where
        F: Future<Output = Result<T, E>>,
        E: Error + Send + Sync + 'static,
    {
        info!("[{}] {}", self.name, step);

        match fut.await {
            Ok(out) => {
                self.completed.push(step.to_string());
                Ok(out)
            }
            Err(e) => {
                error!("[{}] {} failed: {}", self.name, step, e);
                Err(StepError {
                    sequence: self.name.clone(),
                    step: step.to_string(),
                    completed: self.completed.clone(),
                    source: Box::new(e),
                })
            }
        }
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::Sequence;
    use std::cell::RefCell;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("boom")]
    struct Boom;

    #[tokio::test]
    async fn steps_run_in_order_and_feed_each_other() {
        let log = RefCell::new(vec![]);
        let mut seq = Sequence::new("setup");

        let code_id = seq
            .step("store", async {
                log.borrow_mut().push("store");
                Ok::<_, Boom>(7u64)
            })
            .await
            .unwrap();

        let addr = seq
            .step("instantiate", async {
                log.borrow_mut().push("instantiate");
                Ok::<_, Boom>(format!("juno1contract{}", code_id))
            })
            .await
            .unwrap();

        assert_eq!(addr, "juno1contract7");
        assert_eq!(*log.borrow(), vec!["store", "instantiate"]);
        assert_eq!(seq.completed(), &["store", "instantiate"]);
    }

    #[tokio::test]
    async fn failure_reports_step_and_progress() {
        let mut seq = Sequence::new("setup");

        seq.step("store", async { Ok::<_, Boom>(()) }).await.unwrap();
        let err = seq
            .step("instantiate", async { Err::<(), _>(Boom) })
            .await
            .unwrap_err();

        assert_eq!(err.sequence, "setup");
        assert_eq!(err.step, "instantiate");
        assert_eq!(err.completed, vec!["store".to_string()]);
        assert_eq!(err.source.to_string(), "boom");
        assert_eq!(seq.completed().len(), 1);
    }
}
