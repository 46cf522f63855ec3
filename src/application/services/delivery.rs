//! Best-effort message delivery over ordered fallback steps.

use std::fmt::{Debug, Display};
use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

/// Every configured step failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no delivery steps configured")]
    NoSteps,
    #[error("all {} delivery steps failed, last: {last}", .failures.len())]
    Exhausted {
        /// `(step, error)` for every attempt, in order.
        failures: Vec<(String, String)>,
        last: String,
    },
}

/// Tries `steps` in order until one succeeds and returns that step.
///
/// Failures are logged and collected; nothing is retried.
///
/// # Errors
/// Returns [`DeliveryError`] when `steps` is empty or every step fails.
pub async fn deliver<S, F, Fut, E>(steps: &[S], mut attempt: F) -> Result<S, DeliveryError>
where
    S: Copy + Debug,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut failures = Vec::new();

    for &step in steps {
        match attempt(step).await {
            Ok(()) => {
                debug!(?step, failed_before = failures.len(), "Delivered");
                return Ok(step);
            }
            Err(e) => {
                warn!(?step, error = %e, "Delivery step failed");
                failures.push((format!("{step:?}"), e.to_string()));
            }
        }
    }

    match failures.last() {
        None => Err(DeliveryError::NoSteps),
        Some((_, last)) => {
            let last = last.clone();
            Err(DeliveryError::Exhausted { failures, last })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        Edit,
        FollowUp,
        Channel,
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let tried = RefCell::new(Vec::new());
        let result = deliver(&[Step::Edit, Step::FollowUp, Step::Channel], |s| {
            tried.borrow_mut().push(s);
            async move {
                if s == Step::FollowUp {
                    Ok(())
                } else {
                    Err("unknown interaction")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), Step::FollowUp);
        assert_eq!(*tried.borrow(), vec![Step::Edit, Step::FollowUp]);
    }

    #[tokio::test]
    async fn test_all_failed_collects_errors() {
        let result = deliver(&[Step::Edit, Step::Channel], |s| async move {
            Err::<(), _>(format!("{s:?} refused"))
        })
        .await;

        match result {
            Err(DeliveryError::Exhausted { failures, last }) => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].0, "Edit");
                assert_eq!(last, "Channel refused");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_steps() {
        let result = deliver::<Step, _, _, &str>(&[], |_| async { Ok(()) }).await;
        assert!(matches!(result, Err(DeliveryError::NoSteps)));
    }
}
