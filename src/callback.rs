//! Completion-callback adapter.
//!
//! Every store operation is a future. Callers written around completion
//! handlers can wrap any of them with [`with_callback`]; the handler and the
//! awaiting caller observe the same outcome, once.

use std::future::Future;

/// Await `operation`, hand its outcome to `callback`, then return it.
///
/// The callback runs exactly once, after the operation settles, with either
/// the result or the error.
///
/// ```
/// use typed_kv::callback::with_callback;
///
/// # async fn demo() {
/// let outcome = with_callback(async { Ok::<_, std::io::Error>(7) }, |result| {
///     if let Ok(value) = result {
///         println!("finished with {value}");
///     }
/// })
/// .await;
/// assert_eq!(outcome.ok(), Some(7));
/// # }
/// ```
pub async fn with_callback<T, E, F>(
    operation: impl Future<Output = Result<T, E>>,
    callback: F,
) -> Result<T, E>
where
    F: FnOnce(Result<&T, &E>),
{
    let outcome = operation.await;
    callback(outcome.as_ref());
    outcome
}
