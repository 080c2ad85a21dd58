//! End-to-end battle scenarios driven through `Battle`.

use std::collections::VecDeque;

use combat_core::{
    ActionKind, AtbMode, Battle, BattlePhase, CombatConfig, CombatEvent, CombatantId,
    CombatantTemplate, CommandOutcome, Combatant, Effect, EnemyIntent, EnemyPolicy, EventSink,
    HitCount, InputCommand, Item, ItemPool, MenuPage, RejectReason, Skill, StatusKind,
    TargetPolicy, TargetSelection,
};

/// Replays a fixed list of enemy decisions.
struct Scripted(VecDeque<EnemyIntent>);

impl Scripted {
    fn new(intents: impl IntoIterator<Item = EnemyIntent>) -> Self {
        Self(intents.into_iter().collect())
    }
}

impl EnemyPolicy for Scripted {
    fn decide(
        &mut self,
        _actor: &Combatant,
        _party: &[&Combatant],
        _sink: &mut dyn EventSink,
    ) -> Option<EnemyIntent> {
        self.0.pop_front()
    }
}

fn intent(action: ActionKind, target: u32) -> EnemyIntent {
    EnemyIntent {
        action,
        target: TargetSelection::Single(CombatantId(target)),
    }
}

fn still(template: CombatantTemplate) -> CombatantTemplate {
    template.with_speed(0.0)
}

fn health(battle: &Battle, id: u32) -> u32 {
    battle.combatant(CombatantId(id)).unwrap().health().current
}

fn resolve(battle: &mut Battle, events: &mut Vec<CombatEvent>) {
    assert!(matches!(battle.phase(), BattlePhase::Resolving(_)));
    battle.tick(1.0, events);
}

fn command(
    battle: &mut Battle,
    cmd: InputCommand,
    events: &mut Vec<CombatEvent>,
) -> CommandOutcome {
    battle.handle_command(cmd, events)
}

#[test]
fn twelve_damage_on_vulnerable_target_leaves_82() {
    // 0: Hero | 1: Hexer, 2: Brute
    let hex = Skill::new("Hex", "", 0, TargetPolicy::SingleEnemy).with_effect(Effect::ApplyStatus {
        kind: StatusKind::Vulnerable,
        duration: 2,
    });
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .enemy(still(CombatantTemplate::enemy("Hexer", 40).with_skill(hex)))
        .enemy(still(CombatantTemplate::enemy("Brute", 40).with_attack_power(12)))
        .enemy_policy(Scripted::new([
            intent(ActionKind::Skill(0), 0),
            intent(ActionKind::Attack, 0),
        ]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(1), &mut events).unwrap();
    resolve(&mut battle, &mut events);
    assert!(battle.combatant(CombatantId(0)).unwrap().statuses().has(StatusKind::Vulnerable));

    battle.force_turn(CombatantId(2), &mut events).unwrap();
    resolve(&mut battle, &mut events);

    assert_eq!(health(&battle, 0), 82);
}

#[test]
fn damage_lands_before_the_same_skill_makes_the_target_vulnerable() {
    // Declared status-first; the hit still uses the unmodified defence.
    let expose = Skill::new("Expose", "", 0, TargetPolicy::SingleEnemy)
        .with_effect(Effect::ApplyStatus {
            kind: StatusKind::Vulnerable,
            duration: 2,
        })
        .with_effect(Effect::damage(12));
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .enemy(still(CombatantTemplate::enemy("Hexer", 40).with_skill(expose)))
        .enemy_policy(Scripted::new([intent(ActionKind::Skill(0), 0)]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(1), &mut events).unwrap();
    resolve(&mut battle, &mut events);

    assert_eq!(health(&battle, 0), 88);
    let hero = battle.combatant(CombatantId(0)).unwrap();
    assert!(hero.statuses().has(StatusKind::Vulnerable));
}

#[test]
fn group_skill_covers_the_whole_side_whatever_the_chosen_target() {
    // 0: Hero, 1: Mage | 2: Bone Knight
    let aura = Skill::new("Dread Aura", "", 0, TargetPolicy::AllEnemies).with_effect(
        Effect::ApplyStatus {
            kind: StatusKind::Slowed,
            duration: 2,
        },
    );
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .ally(still(CombatantTemplate::ally("Mage", 60, 20)))
        .enemy(still(CombatantTemplate::enemy("Bone Knight", 80).with_skill(aura)))
        .enemy_policy(Scripted::new([intent(ActionKind::Skill(0), 0)]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(2), &mut events).unwrap();
    resolve(&mut battle, &mut events);

    for id in [0, 1] {
        let ally = battle.combatant(CombatantId(id)).unwrap();
        assert!(ally.statuses().has(StatusKind::Slowed), "{} not slowed", ally.name);
    }
}

#[test]
fn single_target_action_rejects_a_group_selection() {
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .ally(still(CombatantTemplate::ally("Mage", 60, 20)))
        .enemy(still(CombatantTemplate::enemy("Brute", 50).with_attack_power(10)))
        .enemy_policy(Scripted::new([EnemyIntent {
            action: ActionKind::Attack,
            target: TargetSelection::Group(vec![CombatantId(0), CombatantId(1)]),
        }]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(2), &mut events).unwrap();

    assert!(events.contains(&CombatEvent::ActionRejected {
        actor: CombatantId(2),
        reason: RejectReason::NoValidTarget
    }));
    assert!(!events.iter().any(|e| matches!(e, CombatEvent::EntityDamaged { .. })));
    assert_eq!(health(&battle, 0), 100);
    assert_eq!(health(&battle, 1), 60);
    assert_eq!(battle.phase(), BattlePhase::Running);
}

#[test]
fn three_hit_skill_emits_three_damage_events_before_turn_advance() {
    let triple = Skill::new("Triple Cut", "", 3, TargetPolicy::SingleEnemy)
        .with_effect(Effect::multi_hit(10, HitCount::Fixed(3)));
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30).with_skill(triple)))
        .enemy(still(CombatantTemplate::enemy("Golem", 100)))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(0), &mut events).unwrap();
    assert_eq!(battle.phase(), BattlePhase::AwaitingInput(CombatantId(0)));
    assert_eq!(
        command(&mut battle, InputCommand::SelectMenuEntry(1), &mut events),
        CommandOutcome::MenuUpdated
    );
    assert_eq!(command(&mut battle, InputCommand::Confirm, &mut events), CommandOutcome::Targeting);
    assert_eq!(
        command(&mut battle, InputCommand::Confirm, &mut events),
        CommandOutcome::ActionStarted
    );
    events.clear();
    resolve(&mut battle, &mut events);

    assert_eq!(health(&battle, 1), 70);
    let advanced = events
        .iter()
        .position(|e| *e == CombatEvent::TurnAdvanced { entity: CombatantId(0) })
        .expect("turn advanced");
    let hits_before = events[..advanced]
        .iter()
        .filter(|e| matches!(e, CombatEvent::EntityDamaged { entity: CombatantId(1), amount: 10 }))
        .count();
    assert_eq!(hits_before, 3);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, CombatEvent::EntityDamaged { .. }))
            .count(),
        3
    );
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().sanity().unwrap().current, 27);
}

#[test]
fn target_cursor_wraps_around() {
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .enemies((0..3).map(|i| still(CombatantTemplate::enemy(format!("Imp {i}"), 10))))
        .build()
        .unwrap();
    let mut events = Vec::new();
    battle.force_turn(CombatantId(0), &mut events).unwrap();
    command(&mut battle, InputCommand::Confirm, &mut events);
    assert_eq!(battle.targeting().current(), Some(CombatantId(1)));

    for _ in 0..3 {
        command(&mut battle, InputCommand::NavigateRight, &mut events);
    }
    assert_eq!(battle.targeting().current(), Some(CombatantId(1)));

    command(&mut battle, InputCommand::NavigateLeft, &mut events);
    assert_eq!(battle.targeting().current(), Some(CombatantId(3)));
}

#[test]
fn cancelled_targeting_leaves_battle_state_untouched() {
    let items = ItemPool::from_items(vec![
        Item::consumable("Tonic", "", 2, TargetPolicy::single_ally())
            .with_effect(Effect::Heal { amount: 20 }),
    ]);
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30).with_current_health(50)))
        .enemy(still(CombatantTemplate::enemy("Imp", 10)))
        .items(items)
        .build()
        .unwrap();
    let mut events = Vec::new();
    battle.force_turn(CombatantId(0), &mut events).unwrap();
    let roster_before = battle.roster().clone();
    let items_before = battle.items().clone();

    command(&mut battle, InputCommand::SelectMenuEntry(2), &mut events);
    command(&mut battle, InputCommand::Confirm, &mut events);
    assert!(battle.targeting().is_selecting());
    assert_eq!(
        command(&mut battle, InputCommand::Cancel, &mut events),
        CommandOutcome::MenuUpdated
    );

    assert_eq!(battle.roster(), &roster_before);
    assert_eq!(battle.items(), &items_before);
    assert!(battle.targeting().highlighted().is_empty());
    assert_eq!(battle.menu().page(), MenuPage::Root);
    assert_eq!(battle.phase(), BattlePhase::AwaitingInput(CombatantId(0)));
}

#[test]
fn guardian_takes_hits_until_it_dies() {
    // 0: Knight, 1: Mage | 2: Brute, 3: Giant
    let cover = Skill::new("Cover", "", 0, TargetPolicy::other_ally()).with_effect(Effect::Protect);
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Knight", 30, 20).with_skill(cover)))
        .ally(still(CombatantTemplate::ally("Mage", 60, 20)))
        .enemy(still(CombatantTemplate::enemy("Brute", 50).with_attack_power(10)))
        .enemy(still(CombatantTemplate::enemy("Giant", 50).with_attack_power(100)))
        .enemy_policy(Scripted::new([
            intent(ActionKind::Attack, 1),
            intent(ActionKind::Attack, 0),
            intent(ActionKind::Attack, 1),
        ]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(0), &mut events).unwrap();
    command(&mut battle, InputCommand::SelectMenuEntry(1), &mut events);
    command(&mut battle, InputCommand::SelectMenuEntry(0), &mut events);
    assert_eq!(battle.targeting().current(), Some(CombatantId(1)));
    command(&mut battle, InputCommand::Confirm, &mut events);
    resolve(&mut battle, &mut events);
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().guarding(), Some(CombatantId(1)));

    // Redirected to the knight.
    battle.force_turn(CombatantId(2), &mut events).unwrap();
    resolve(&mut battle, &mut events);
    assert_eq!(health(&battle, 0), 20);
    assert_eq!(health(&battle, 1), 60);

    // The giant kills the knight; protection ends with it.
    battle.force_turn(CombatantId(3), &mut events).unwrap();
    resolve(&mut battle, &mut events);
    assert!(events.contains(&CombatEvent::CombatantDied { entity: CombatantId(0) }));
    assert!(!battle.combatant(CombatantId(1)).unwrap().statuses().has(StatusKind::Guarded));

    battle.force_turn(CombatantId(2), &mut events).unwrap();
    resolve(&mut battle, &mut events);
    assert_eq!(health(&battle, 1), 50);
}

#[test]
fn statuses_expire_after_their_owner_turns() {
    let focus =
        Skill::new("Focus", "", 0, TargetPolicy::SelfOnly).with_effect(Effect::ApplySelfStatus {
            kind: StatusKind::Strength,
            duration: 2,
        });
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30).with_skill(focus)))
        .enemy(still(CombatantTemplate::enemy("Imp", 500)))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(0), &mut events).unwrap();
    command(&mut battle, InputCommand::SelectMenuEntry(1), &mut events);
    assert_eq!(
        command(&mut battle, InputCommand::SelectMenuEntry(0), &mut events),
        CommandOutcome::ActionStarted
    );
    resolve(&mut battle, &mut events);
    let hero = battle.combatant(CombatantId(0)).unwrap();
    assert_eq!(hero.statuses().remaining(StatusKind::Strength), Some(1));
    assert_eq!(hero.attack_multiplier(), 1.5);

    // Guard is self-only: picking it starts the action directly.
    battle.force_turn(CombatantId(0), &mut events).unwrap();
    assert_eq!(
        command(&mut battle, InputCommand::SelectMenuEntry(3), &mut events),
        CommandOutcome::ActionStarted
    );
    resolve(&mut battle, &mut events);

    let hero = battle.combatant(CombatantId(0)).unwrap();
    assert!(!hero.statuses().has(StatusKind::Strength));
    assert_eq!(hero.attack_multiplier(), 1.0);
    assert!(events.contains(&CombatEvent::StatusRemoved {
        entity: CombatantId(0),
        kind: StatusKind::Strength
    }));
}

#[test]
fn opposing_status_cancels_to_neutral() {
    let rally =
        Skill::new("Rally", "", 0, TargetPolicy::SelfOnly).with_effect(Effect::ApplySelfStatus {
            kind: StatusKind::Strength,
            duration: 3,
        });
    let sap = Skill::new("Sap", "", 0, TargetPolicy::SingleEnemy).with_effect(Effect::ApplyStatus {
        kind: StatusKind::Weakness,
        duration: 3,
    });
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30).with_skill(rally)))
        .enemy(still(CombatantTemplate::enemy("Wisp", 50).with_skill(sap)))
        .enemy_policy(Scripted::new([intent(ActionKind::Skill(0), 0)]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(0), &mut events).unwrap();
    command(&mut battle, InputCommand::SelectMenuEntry(1), &mut events);
    command(&mut battle, InputCommand::SelectMenuEntry(0), &mut events);
    resolve(&mut battle, &mut events);
    battle.force_turn(CombatantId(1), &mut events).unwrap();
    resolve(&mut battle, &mut events);

    let hero = battle.combatant(CombatantId(0)).unwrap();
    assert!(!hero.statuses().has(StatusKind::Strength));
    assert!(!hero.statuses().has(StatusKind::Weakness));
    assert_eq!(hero.attack_multiplier(), 1.0);
}

#[test]
fn unaffordable_skill_is_rejected_and_turn_kept() {
    let nova = Skill::new("Nova", "", 10, TargetPolicy::AllEnemies).with_effect(Effect::damage(50));
    let mut battle = Battle::builder()
        .ally(still(
            CombatantTemplate::ally("Hero", 100, 30)
                .with_current_sanity(4)
                .with_skill(nova),
        ))
        .enemy(still(CombatantTemplate::enemy("Imp", 20)))
        .build()
        .unwrap();
    let mut events = Vec::new();
    battle.force_turn(CombatantId(0), &mut events).unwrap();

    command(&mut battle, InputCommand::SelectMenuEntry(1), &mut events);
    assert_eq!(
        command(&mut battle, InputCommand::SelectMenuEntry(0), &mut events),
        CommandOutcome::Targeting
    );
    assert_eq!(
        command(&mut battle, InputCommand::Confirm, &mut events),
        CommandOutcome::Rejected(RejectReason::InsufficientSanity)
    );

    assert_eq!(battle.phase(), BattlePhase::AwaitingInput(CombatantId(0)));
    assert_eq!(battle.menu().page(), MenuPage::Root);
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().sanity().unwrap().current, 4);
    assert_eq!(health(&battle, 1), 20);
    assert!(events.contains(&CombatEvent::ActionRejected {
        actor: CombatantId(0),
        reason: RejectReason::InsufficientSanity
    }));
}

#[test]
fn rejected_enemy_action_passes_the_turn() {
    let mut battle = Battle::builder()
        .ally(still(CombatantTemplate::ally("Hero", 100, 30)))
        .enemy(still(CombatantTemplate::enemy("Imp", 20)))
        .enemy_policy(Scripted::new([intent(ActionKind::Skill(4), 0)]))
        .build()
        .unwrap();
    let mut events = Vec::new();

    battle.force_turn(CombatantId(1), &mut events).unwrap();

    assert_eq!(battle.phase(), BattlePhase::Running);
    assert_eq!(battle.active(), None);
    assert!(events.contains(&CombatEvent::TurnAdvanced { entity: CombatantId(1) }));
}

#[test]
fn gauges_only_drop_when_their_owner_starts_a_turn() {
    let mut battle = Battle::builder()
        .config(CombatConfig::default().with_atb_mode(AtbMode::Active).with_announce_delay(0.2))
        .ally(CombatantTemplate::ally("Hero", 500, 30).with_speed(35.0))
        .ally(CombatantTemplate::ally("Rogue", 500, 30).with_speed(55.0))
        .enemy(CombatantTemplate::enemy("Wolf", 500).with_speed(45.0))
        .build()
        .unwrap();

    let mut previous: Vec<f32> = battle.roster().iter().map(|c| c.action.current).collect();
    for _ in 0..200 {
        let mut events = Vec::new();
        if let BattlePhase::AwaitingInput(_) = battle.phase() {
            battle.handle_command(InputCommand::SelectMenuEntry(3), &mut events);
        }
        battle.tick(0.1, &mut events);

        let now: Vec<f32> = battle.roster().iter().map(|c| c.action.current).collect();
        for (index, (before, after)) in previous.iter().zip(&now).enumerate() {
            let started = events.contains(&CombatEvent::TurnStarted {
                entity: CombatantId(index as u32),
                needs_input: index < 2,
            });
            assert!(after >= before || started, "gauge {index} dropped without a turn");
        }
        previous = now;
    }
}

#[test]
fn full_battle_runs_to_victory() {
    let mut battle = Battle::builder()
        .config(CombatConfig::default().with_announce_delay(0.1))
        .ally(CombatantTemplate::ally("Hero", 200, 30).with_speed(40.0).with_attack_power(25))
        .enemy(CombatantTemplate::enemy("Slime", 40).with_speed(20.0).with_attack_power(5))
        .enemy(CombatantTemplate::enemy("Bat", 30).with_speed(30.0).with_attack_power(4))
        .seed(11)
        .build()
        .unwrap();
    let mut events = Vec::new();

    for _ in 0..10_000 {
        if battle.is_over() {
            break;
        }
        if let BattlePhase::AwaitingInput(_) = battle.phase() {
            // Attack the first highlighted enemy.
            battle.handle_command(InputCommand::Confirm, &mut events);
            battle.handle_command(InputCommand::Confirm, &mut events);
        }
        battle.tick(0.05, &mut events);
    }

    assert_eq!(battle.phase(), BattlePhase::Ended { won: true });
    let ended: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::CombatEnded { .. }))
        .collect();
    assert_eq!(ended, vec![&CombatEvent::CombatEnded { won: true }]);

    let outcome = battle.outcome().unwrap();
    assert!(outcome.won);
    assert_eq!(outcome.final_vitals.len(), 3);
    assert!(outcome.final_vitals[0].health > 0);
    assert_eq!(battle.tick(1.0, &mut events), BattlePhase::Ended { won: true });
}
