use claimdesk_core::{ClaimdeskError, UserId};
use claimdesk_state::idempotency::{Begin, IdempotencyStore};

/// Execute a side-effecting operation at most once per (caller, key).
///
/// With no key the operation runs unconditionally. With a key, the first
/// request reserves the slot and executes; concurrent requests with the same
/// key wait for the reserved execution and receive its response; later
/// retries replay the stored response without re-running the side effect.
/// A failed execution releases the slot so the next retry can run.
pub async fn run_idempotent<F, Fut>(
    store: &dyn IdempotencyStore,
    owner: &UserId,
    key: Option<&str>,
    operation: F,
) -> Result<serde_json::Value, ClaimdeskError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<serde_json::Value, ClaimdeskError>>,
{
    let Some(key) = key else {
        // Idempotency is opt-in per request.
        return operation().await;
    };

    loop {
        match store.begin(owner, key).await.map_err(ClaimdeskError::from)? {
            Begin::Execute => {
                match operation().await {
                    Ok(value) => {
                        store
                            .complete(owner, key, value.clone())
                            .await
                            .map_err(ClaimdeskError::from)?;
                        return Ok(value);
                    }
                    Err(err) => {
                        // Release the slot so a retry can run the side effect.
                        store
                            .abandon(owner, key)
                            .await
                            .map_err(ClaimdeskError::from)?;
                        return Err(err);
                    }
                }
            }
            Begin::Replay(value) => return Ok(value),
            Begin::Wait(mut rx) => {
                if rx.changed().await.is_err() {
                    // The executor abandoned; race for the slot again.
                    continue;
                }
                let published = rx.borrow().clone();
                match published {
                    Some(value) => return Ok(value),
                    None => continue,
                }
            }
        }
    }
}
