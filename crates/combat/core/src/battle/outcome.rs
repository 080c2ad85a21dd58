use crate::action::RejectReason;
use crate::state::{Combatant, CombatantId, ItemPool, Side};

/// Where the battle stands after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    /// Gauges are filling; nobody is acting.
    Running,
    /// An ally's turn; waiting for operator commands.
    AwaitingInput(CombatantId),
    /// An action has been announced and is resolving.
    Resolving(CombatantId),
    Ended { won: bool },
}

impl BattlePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }
}

/// Result of [`Battle::handle_command`](super::Battle::handle_command).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Ignored,
    MenuUpdated,
    /// Target selection started or moved.
    Targeting,
    /// The action was announced and will resolve on later ticks.
    ActionStarted,
    /// Nothing was spent; the menu is back at its root page.
    Rejected(RejectReason),
}

/// Vitals of one combatant when the battle ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalVitals {
    pub name: String,
    pub side: Side,
    pub health: u32,
    pub sanity: Option<u32>,
}

impl From<&Combatant> for FinalVitals {
    fn from(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name.clone(),
            side: combatant.side,
            health: combatant.health().current,
            sanity: combatant.sanity().map(|s| s.current),
        }
    }
}

/// What the caller persists once combat is over.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub won: bool,
    /// Party inventory after consumption.
    pub items: ItemPool,
    pub final_vitals: Vec<FinalVitals>,
}

impl CombatOutcome {
    pub fn survivors(&self, side: Side) -> impl Iterator<Item = &FinalVitals> {
        self.final_vitals
            .iter()
            .filter(move |v| v.side == side && v.health > 0 && v.sanity != Some(0))
    }
}
