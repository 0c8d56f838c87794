//! Error types returned by the channel facade.
use std::fmt;

/// Returned by [`crate::channel::Sender::send`] when the channel has
/// been closed. Carries the value back so the caller can decide what to
/// do with it instead of losing it silently.
#[derive(thiserror::Error)]
#[error("send on a closed channel")]
pub struct SendError<T>(pub T);

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendError").finish_non_exhaustive()
    }
}
