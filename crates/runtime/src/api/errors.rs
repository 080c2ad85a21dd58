//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and command providers so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a battle before building")]
    MissingBattle,

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("command provider failed: {reason}")]
    Provider { reason: String },

    #[error("battle did not end within {ticks} ticks")]
    Stalled { ticks: u64 },

    #[error("battle was shut down before it ended")]
    Interrupted,
}
