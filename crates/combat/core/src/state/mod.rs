//! Combatant data and the shared party inventory.
//!
//! - [`Combatant`]: vitals, gauge, multipliers, guard links, skills
//! - [`Roster`]: every combatant of one battle, allies first
//! - [`ItemPool`]: the party's shared, amount-counted items

mod combatant;
mod common;
mod error;
mod item;
mod roster;
mod skill;

pub use combatant::{Combatant, CombatantTemplate, SpeedBoost};
pub use common::{ActionGauge, CombatantId, ResourceMeter, Side};
pub use error::StateError;
pub use item::{Item, ItemCategory, ItemPool};
pub use roster::Roster;
pub use skill::Skill;
