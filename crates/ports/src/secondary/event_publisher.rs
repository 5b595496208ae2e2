use std::future::Future;
use std::pin::Pin;

use domain::event::error::PublishError;

/// Secondary port for publishing canonical event payloads to the broker.
///
/// One publish attempt per call; the caller decides what a failure means
/// (at-most-one attempt per event, no automatic retry). Publishing is
/// independent of the alert store: the two sinks may diverge transiently.
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the trait
/// is dyn-compatible and can be used as `Arc<dyn EventPublisher>`.
pub trait EventPublisher: Send + Sync {
    /// Publish an already-serialized payload with persistent delivery.
    fn publish<'a>(
        &'a self,
        payload: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;
}
