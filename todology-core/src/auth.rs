//! Bounded retry around logging in to the task backend.

use std::future::Future;

use crate::error::{TodologyError, TodologyResult};

/// Retries after the first failed attempt, so 11 attempts in total.
pub const MAX_LOGIN_RETRIES: u32 = 10;

/// Run `login` until it succeeds, retrying only on
/// [`TodologyError::TransientAuth`].
///
/// Any other error is returned immediately. After `max_retries` transient
/// failures in a row the result is [`TodologyError::LoginExhausted`].
pub async fn login_with_retry<T, F, Fut>(max_retries: u32, mut login: F) -> TodologyResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TodologyResult<T>>,
{
    let mut retries = 0;
    loop {
        match login().await {
            Ok(session) => return Ok(session),
            Err(TodologyError::TransientAuth(reason)) if retries < max_retries => {
                retries += 1;
                log::debug!("Login attempt {retries} failed ({reason}), retrying");
            }
            Err(TodologyError::TransientAuth(_)) => {
                return Err(TodologyError::LoginExhausted(retries + 1));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_retries_transient_faults_until_success() {
        let attempts = Cell::new(0);
        let result = login_with_retry(MAX_LOGIN_RETRIES, || {
            attempts.set(attempts.get() + 1);
            let n = attempts.get();
            async move {
                if n < 4 {
                    Err(TodologyError::TransientAuth("bad gateway".into()))
                } else {
                    Ok("session")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "session");
        assert_eq!(attempts.get(), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_ten_retries() {
        let attempts = Cell::new(0);
        let result: TodologyResult<()> = login_with_retry(MAX_LOGIN_RETRIES, || {
            attempts.set(attempts.get() + 1);
            async { Err(TodologyError::TransientAuth("bad gateway".into())) }
        })
        .await;

        assert!(matches!(result, Err(TodologyError::LoginExhausted(11))));
        assert_eq!(attempts.get(), 11);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let attempts = Cell::new(0);
        let result: TodologyResult<()> = login_with_retry(MAX_LOGIN_RETRIES, || {
            attempts.set(attempts.get() + 1);
            async { Err(TodologyError::Unauthorized("bad token".into())) }
        })
        .await;

        assert!(matches!(result, Err(TodologyError::Unauthorized(_))));
        assert_eq!(attempts.get(), 1);
    }
}
