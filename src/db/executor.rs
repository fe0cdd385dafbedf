//! Serializable unit-of-work runner.
//!
//! Every statement the service issues goes through [`QueryExecutor::run`]:
//! one transaction at `SERIALIZABLE`, committed before returning. Transient
//! failures (serialization conflicts, deadlocks, dropped connections) rerun
//! the whole unit with exponential backoff.

use std::{future::Future, time::Duration};

use futures_util::future::BoxFuture;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};

use super::error::{is_transient, DatabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, where `attempt` is 1-based.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[derive(Clone)]
pub struct QueryExecutor {
    pool: PgPool,
    policy: RetryPolicy,
}

impl QueryExecutor {
    pub fn new(pool: PgPool, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }

    /// Runs `op` inside a serializable read-write transaction and commits.
    ///
    /// `op` may be invoked more than once, so it must own (or clone) what it
    /// binds into the statement.
    pub async fn run<T, F>(&self, op: F) -> Result<T, DatabaseError>
    where
        T: Send,
        F: for<'c> Fn(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>> + Send + Sync,
    {
        with_retries(&self.policy, || self.run_once(&op)).await
    }

    async fn run_once<T, F>(&self, op: &F) -> Result<T, DatabaseError>
    where
        T: Send,
        F: for<'c> Fn(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>> + Send + Sync,
    {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE READ WRITE")
            .execute(&mut *tx)
            .await?;

        // Dropping `tx` on error rolls it back.
        let value = op(&mut *tx).await?;

        // Once COMMIT is on the wire the unit may have been applied, so a
        // failure here is never rerun.
        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionError(format!("commit failed: {e}")))?;
        debug!("Transaction committed");
        Ok(value)
    }
}

/// Calls `attempt_fn` until it succeeds, fails with a non-transient error, or
/// `policy.max_attempts` calls have been made.
async fn with_retries<T, A, Fut>(policy: &RetryPolicy, mut attempt_fn: A) -> Result<T, DatabaseError>
where
    A: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let mut attempt = 1;
    loop {
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(DatabaseError::Sqlx(err)) if is_transient(&err) => {
                if attempt >= policy.max_attempts {
                    return Err(DatabaseError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                let delay = policy.backoff(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "Transient database error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(100),
        };

        assert_eq!(policy.backoff(1), Duration::from_millis(20));
        assert_eq!(policy.backoff(2), Duration::from_millis(40));
        assert_eq!(policy.backoff(3), Duration::from_millis(80));
        assert_eq!(policy.backoff(4), Duration::from_millis(100));
        assert_eq!(policy.backoff(40), Duration::from_millis(100));
    }

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn transient_errors_rerun_the_unit_until_it_succeeds() {
        let mut calls = 0;
        let result = with_retries(&instant_policy(5), || {
            calls += 1;
            let call = calls;
            async move {
                if call < 3 {
                    Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
                } else {
                    Ok(call)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(&instant_policy(4), || {
            calls += 1;
            async { Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)) }
        })
        .await;

        match result {
            Err(DatabaseError::RetriesExhausted { attempts, source }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(source, sqlx::Error::PoolTimedOut));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn single_attempt_policy_never_retries() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(&instant_policy(1), || {
            calls += 1;
            async { Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)) }
        })
        .await;

        assert!(matches!(
            result,
            Err(DatabaseError::RetriesExhausted { attempts: 1, .. })
        ));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn permanent_errors_pass_through_on_first_attempt() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(&instant_policy(5), || {
            calls += 1;
            async { Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)) }
        })
        .await;

        assert!(matches!(
            result,
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
        ));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn failed_commit_is_not_rerun() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(&instant_policy(5), || {
            calls += 1;
            async {
                Err(DatabaseError::TransactionError(
                    "commit failed: connection reset".to_string(),
                ))
            }
        })
        .await;

        assert!(matches!(result, Err(DatabaseError::TransactionError(_))));
        assert_eq!(calls, 1);
    }
}
