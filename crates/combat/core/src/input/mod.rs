//! Operator input: the command menu and the targeting state machine.
//!
//! Both consume logical [`InputCommand`]s only. Physical input polling lives
//! outside the engine.
mod menu;
mod targeting;

pub use menu::{CommandMenu, MenuEntry, MenuOutcome, MenuPage};
pub use targeting::{TargetingMachine, TargetingOutcome};

/// Logical command produced by whatever input device the host polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputCommand {
    Confirm,
    Cancel,
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    /// Picks a menu entry directly by index.
    SelectMenuEntry(usize),
}
