use crate::application_port::AuthError;
use crate::logger::*;
use std::future::Future;
use std::time::Duration;

/// Run a store call under a deadline. An elapsed deadline fails closed as
/// `StoreUnavailable`.
pub(crate) async fn bounded<T, F>(timeout: Duration, op: &'static str, call: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(op, error = %e, "store call failed");
            Err(match e {
                AuthError::StoreUnavailable(_) => e,
                other => AuthError::StoreUnavailable(other.to_string()),
            })
        }
        Err(_) => {
            error!(op, ?timeout, "store call timed out");
            Err(AuthError::StoreUnavailable(format!("{} timed out", op)))
        }
    }
}
