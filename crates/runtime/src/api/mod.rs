//! Public runtime API: errors, the client handle and command providers.
mod errors;
mod handle;
mod providers;

pub use errors::{Result, RuntimeError};
pub use handle::{BattleSnapshot, RuntimeHandle};
pub use providers::{AutoConfirmProvider, CommandProvider, InputView, ScriptedCommandProvider};
