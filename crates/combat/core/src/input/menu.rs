//! Modal command menu: Root → Skills / Items.

use tracing::debug;

use crate::action::ActionKind;
use crate::event::{CombatEvent, EventSink};
use crate::input::InputCommand;
use crate::state::{Combatant, CombatantId, ItemPool};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MenuPage {
    #[default]
    Root,
    Skills,
    Items,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum MenuChoice {
    Act(ActionKind),
    Open(MenuPage),
}

/// One line of the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    /// Presentation hint: unaffordable skills and empty submenus.
    pub enabled: bool,
    choice: MenuChoice,
}

impl MenuEntry {
    fn new(label: impl Into<String>, enabled: bool, choice: MenuChoice) -> Self {
        Self {
            label: label.into(),
            enabled,
            choice,
        }
    }

    /// Action picked by this entry, if it is not a submenu.
    pub fn action(&self) -> Option<&ActionKind> {
        match &self.choice {
            MenuChoice::Act(kind) => Some(kind),
            MenuChoice::Open(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Cursor or page changed.
    Navigated,
    Chose(ActionKind),
    Ignored,
}

/// Command menu of the ally whose turn it is.
#[derive(Clone, Debug, Default)]
pub struct CommandMenu {
    actor: Option<CombatantId>,
    page: MenuPage,
    cursor: usize,
    entries: Vec<MenuEntry>,
}

impl CommandMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.actor.is_some()
    }

    pub fn actor(&self) -> Option<CombatantId> {
        self.actor
    }

    pub fn page(&self) -> MenuPage {
        self.page
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Shows the root page for `actor`.
    pub fn open(&mut self, actor: &Combatant, items: &ItemPool, sink: &mut dyn EventSink) {
        self.actor = Some(actor.id);
        self.show(MenuPage::Root, 0, actor, items, sink);
    }

    pub fn close(&mut self) {
        self.actor = None;
        self.page = MenuPage::Root;
        self.cursor = 0;
        self.entries.clear();
    }

    pub fn handle(
        &mut self,
        command: InputCommand,
        actor: &Combatant,
        items: &ItemPool,
        sink: &mut dyn EventSink,
    ) -> MenuOutcome {
        if self.actor != Some(actor.id) || self.entries.is_empty() {
            return MenuOutcome::Ignored;
        }

        let len = self.entries.len();
        match command {
            InputCommand::NavigateDown => {
                self.cursor = (self.cursor + 1) % len;
                self.announce(sink);
                MenuOutcome::Navigated
            }
            InputCommand::NavigateUp => {
                self.cursor = (self.cursor + len - 1) % len;
                self.announce(sink);
                MenuOutcome::Navigated
            }
            InputCommand::Confirm => self.select(self.cursor, actor, items, sink),
            InputCommand::SelectMenuEntry(index) if index < len => {
                self.select(index, actor, items, sink)
            }
            InputCommand::Cancel if self.page != MenuPage::Root => {
                let cursor = Self::root_index(self.page);
                self.show(MenuPage::Root, cursor, actor, items, sink);
                MenuOutcome::Navigated
            }
            _ => MenuOutcome::Ignored,
        }
    }

    /// Returns to the root page after a cancelled target selection or a
    /// rejected action.
    pub fn reset(&mut self, actor: &Combatant, items: &ItemPool, sink: &mut dyn EventSink) {
        if self.actor == Some(actor.id) {
            self.show(MenuPage::Root, 0, actor, items, sink);
        }
    }

    fn select(
        &mut self,
        index: usize,
        actor: &Combatant,
        items: &ItemPool,
        sink: &mut dyn EventSink,
    ) -> MenuOutcome {
        let Some(entry) = self.entries.get(index) else {
            return MenuOutcome::Ignored;
        };
        match entry.choice.clone() {
            MenuChoice::Act(kind) => {
                self.cursor = index;
                debug!(target: "combat::menu", actor = %actor.name, ?kind, "menu choice");
                MenuOutcome::Chose(kind)
            }
            MenuChoice::Open(_) if !entry.enabled => MenuOutcome::Ignored,
            MenuChoice::Open(page) => {
                self.show(page, 0, actor, items, sink);
                MenuOutcome::Navigated
            }
        }
    }

    fn show(
        &mut self,
        page: MenuPage,
        cursor: usize,
        actor: &Combatant,
        items: &ItemPool,
        sink: &mut dyn EventSink,
    ) {
        self.page = page;
        self.entries = Self::build(page, actor, items);
        self.cursor = cursor.min(self.entries.len().saturating_sub(1));
        self.announce(sink);
    }

    fn announce(&self, sink: &mut dyn EventSink) {
        sink.emit(CombatEvent::MenuChanged {
            page: self.page,
            cursor: self.cursor,
        });
    }

    fn root_index(page: MenuPage) -> usize {
        match page {
            MenuPage::Root => 0,
            MenuPage::Skills => 1,
            MenuPage::Items => 2,
        }
    }

    fn build(page: MenuPage, actor: &Combatant, items: &ItemPool) -> Vec<MenuEntry> {
        match page {
            MenuPage::Root => vec![
                MenuEntry::new("Attack", true, MenuChoice::Act(ActionKind::Attack)),
                MenuEntry::new(
                    "Skills",
                    !actor.skills().is_empty(),
                    MenuChoice::Open(MenuPage::Skills),
                ),
                MenuEntry::new(
                    "Items",
                    items.combat_items().next().is_some(),
                    MenuChoice::Open(MenuPage::Items),
                ),
                MenuEntry::new("Guard", true, MenuChoice::Act(ActionKind::Guard)),
            ],
            MenuPage::Skills => actor
                .skills()
                .iter()
                .enumerate()
                .map(|(index, skill)| {
                    MenuEntry::new(
                        format!("{} ({})", skill.name, skill.sanity_cost),
                        actor.can_afford(skill.sanity_cost),
                        MenuChoice::Act(ActionKind::Skill(index)),
                    )
                })
                .collect(),
            MenuPage::Items => items
                .combat_items()
                .map(|item| {
                    MenuEntry::new(
                        format!("{} x{}", item.name, item.amount),
                        true,
                        MenuChoice::Act(ActionKind::UseItem(item.name.clone())),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Effect, TargetPolicy};
    use crate::event::NullSink;
    use crate::state::{CombatantTemplate, Item, Skill};

    fn hero() -> Combatant {
        let template = CombatantTemplate::ally("Hero", 50, 5)
            .with_skill(
                Skill::new("Spark", "", 3, TargetPolicy::SingleEnemy)
                    .with_effect(Effect::damage(5)),
            )
            .with_skill(
                Skill::new("Nova", "", 9, TargetPolicy::AllEnemies).with_effect(Effect::damage(9)),
            );
        Combatant::from_template(CombatantId(0), template, 100.0).unwrap()
    }

    fn items() -> ItemPool {
        ItemPool::from_items(vec![
            Item::key_item("Map", ""),
            Item::consumable("Tonic", "", 2, TargetPolicy::single_ally()),
        ])
    }

    #[test]
    fn root_cursor_wraps_both_ways() {
        let hero = hero();
        let items = items();
        let mut menu = CommandMenu::new();
        menu.open(&hero, &items, &mut NullSink);

        menu.handle(InputCommand::NavigateUp, &hero, &items, &mut NullSink);
        assert_eq!(menu.cursor(), 3);
        menu.handle(InputCommand::NavigateDown, &hero, &items, &mut NullSink);
        assert_eq!(menu.cursor(), 0);
    }

    #[test]
    fn submenus_list_skills_and_combat_items() {
        let hero = hero();
        let items = items();
        let mut menu = CommandMenu::new();
        let mut events = Vec::new();
        menu.open(&hero, &items, &mut events);

        assert_eq!(
            menu.handle(InputCommand::SelectMenuEntry(1), &hero, &items, &mut events),
            MenuOutcome::Navigated
        );
        assert_eq!(menu.page(), MenuPage::Skills);
        assert_eq!(menu.entries().len(), 2);
        assert!(menu.entries()[0].enabled);
        assert!(!menu.entries()[1].enabled);

        menu.handle(InputCommand::Cancel, &hero, &items, &mut events);
        assert_eq!(menu.page(), MenuPage::Root);
        assert_eq!(menu.cursor(), 1);

        menu.handle(InputCommand::SelectMenuEntry(2), &hero, &items, &mut events);
        assert_eq!(menu.page(), MenuPage::Items);
        assert_eq!(menu.entries().len(), 1);
        assert_eq!(
            menu.handle(InputCommand::Confirm, &hero, &items, &mut events),
            MenuOutcome::Chose(ActionKind::UseItem("Tonic".into()))
        );
        assert_eq!(
            events.last(),
            Some(&CombatEvent::MenuChanged {
                page: MenuPage::Items,
                cursor: 0
            })
        );
    }

    #[test]
    fn cancel_at_root_and_closed_menu_are_ignored() {
        let hero = hero();
        let items = items();
        let mut menu = CommandMenu::new();

        assert_eq!(
            menu.handle(InputCommand::Confirm, &hero, &items, &mut NullSink),
            MenuOutcome::Ignored
        );
        menu.open(&hero, &items, &mut NullSink);
        assert_eq!(
            menu.handle(InputCommand::Cancel, &hero, &items, &mut NullSink),
            MenuOutcome::Ignored
        );
        assert_eq!(
            menu.handle(InputCommand::NavigateLeft, &hero, &items, &mut NullSink),
            MenuOutcome::Ignored
        );
    }

    #[test]
    fn empty_item_submenu_cannot_be_opened() {
        let hero = hero();
        let items = ItemPool::new();
        let mut menu = CommandMenu::new();
        menu.open(&hero, &items, &mut NullSink);

        assert_eq!(
            menu.handle(InputCommand::SelectMenuEntry(2), &hero, &items, &mut NullSink),
            MenuOutcome::Ignored
        );
        assert_eq!(menu.page(), MenuPage::Root);
    }
}
