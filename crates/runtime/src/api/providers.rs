//! Command provider abstraction used by the runtime to obtain operator input.
//!
//! The battle worker asks its provider for at most one [`InputCommand`] per
//! tick while an ally is awaiting input. Providers see an owned
//! [`InputView`] rather than the battle itself, so they can be backed by
//! anything from a fixed script to a network socket.
use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use combat_core::{Battle, CombatantId, InputCommand, MenuPage};

use super::errors::Result;

/// What the operator can see while an ally waits for a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputView {
    pub actor: CombatantId,
    pub actor_name: String,
    pub page: MenuPage,
    pub cursor: usize,
    /// Labels of the current menu page, in display order.
    pub entries: Vec<String>,
    /// Target selection is open instead of the menu.
    pub selecting: bool,
    pub highlighted: Vec<CombatantId>,
}

impl InputView {
    pub fn capture(battle: &Battle, actor: CombatantId) -> Self {
        let menu = battle.menu();
        let targeting = battle.targeting();
        Self {
            actor,
            actor_name: battle
                .combatant(actor)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            page: menu.page(),
            cursor: menu.cursor(),
            entries: menu.entries().iter().map(|e| e.label.clone()).collect(),
            selecting: targeting.is_selecting(),
            highlighted: targeting.highlighted().to_vec(),
        }
    }
}

#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Returns the next command for the waiting ally, or `None` to leave the
    /// turn pending until a later tick.
    async fn next_command(&self, view: &InputView) -> Result<Option<InputCommand>>;
}

/// Confirms whatever is under the cursor: a basic attack on the first
/// candidate from the root menu.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoConfirmProvider;

#[async_trait]
impl CommandProvider for AutoConfirmProvider {
    async fn next_command(&self, _view: &InputView) -> Result<Option<InputCommand>> {
        Ok(Some(InputCommand::Confirm))
    }
}

/// Replays a fixed list of commands, then goes quiet.
#[derive(Debug, Default)]
pub struct ScriptedCommandProvider {
    commands: Mutex<VecDeque<InputCommand>>,
}

impl ScriptedCommandProvider {
    pub fn new(commands: impl IntoIterator<Item = InputCommand>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl CommandProvider for ScriptedCommandProvider {
    async fn next_command(&self, view: &InputView) -> Result<Option<InputCommand>> {
        let next = self.commands.lock().await.pop_front();
        if let Some(command) = next {
            tracing::debug!(
                target: "runtime::provider",
                actor = %view.actor_name,
                ?command,
                "scripted command"
            );
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> InputView {
        InputView {
            actor: CombatantId(0),
            actor_name: "Hero".into(),
            page: MenuPage::Root,
            cursor: 0,
            entries: vec!["Attack".into()],
            selecting: false,
            highlighted: Vec::new(),
        }
    }

    #[tokio::test]
    async fn scripted_provider_replays_in_order_then_goes_quiet() {
        let provider = ScriptedCommandProvider::new([
            InputCommand::NavigateDown,
            InputCommand::Confirm,
        ]);

        assert_eq!(
            provider.next_command(&view()).await.unwrap(),
            Some(InputCommand::NavigateDown)
        );
        assert_eq!(provider.remaining().await, 1);
        assert_eq!(
            provider.next_command(&view()).await.unwrap(),
            Some(InputCommand::Confirm)
        );
        assert_eq!(provider.next_command(&view()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn auto_confirm_always_confirms() {
        let provider = AutoConfirmProvider;
        for _ in 0..3 {
            assert_eq!(
                provider.next_command(&view()).await.unwrap(),
                Some(InputCommand::Confirm)
            );
        }
    }
}
