//! Property-based invariant tests for the tab workspace.
//!
//! Command sequences respect the caller contract: only closable tabs are
//! closed. Under that contract:
//!
//! 1. No two open tabs share an id.
//! 2. The active id always names an open tab.
//! 3. The project tab is always present and first.
//! 4. Opening the same tab twice equals opening it once.
//! 5. Close-then-reopen appends the tab at the end.

use proptest::prelude::*;
use synesis_core::{EntityKind, TabCommand, TabId, TabManager};

// ── Helpers ─────────────────────────────────────────────────────────────

const IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

fn entity_id_strategy() -> impl Strategy<Value = TabId> {
    prop::sample::select(IDS.to_vec()).prop_map(TabId::entity)
}

fn any_id_strategy() -> impl Strategy<Value = TabId> {
    prop_oneof![
        1 => Just(TabId::Project),
        5 => entity_id_strategy(),
    ]
}

fn kind_strategy() -> impl Strategy<Value = EntityKind> {
    prop::sample::select(EntityKind::ALL.to_vec())
}

fn command_strategy() -> impl Strategy<Value = TabCommand> {
    prop_oneof![
        4 => (entity_id_strategy(), kind_strategy())
            .prop_map(|(id, kind)| TabCommand::Open { id, kind, closable: true }),
        1 => Just(TabCommand::Open {
            id: TabId::Project,
            kind: EntityKind::Project,
            closable: false,
        }),
        3 => entity_id_strategy().prop_map(|id| TabCommand::Close { id }),
        2 => any_id_strategy().prop_map(|id| TabCommand::Select { id }),
        1 => Just(TabCommand::CloseToProject),
    ]
}

fn assert_invariants(manager: &TabManager) -> Result<(), TestCaseError> {
    let tabs = manager.open_tabs();
    for (index, tab) in tabs.iter().enumerate() {
        prop_assert!(
            tabs[index + 1..].iter().all(|other| other.id != tab.id),
            "duplicate tab {:?} in {:?}",
            tab.id,
            tabs
        );
    }
    prop_assert!(
        manager.contains(manager.active_tab_id()),
        "active {:?} not among {:?}",
        manager.active_tab_id(),
        tabs
    );
    prop_assert_eq!(&tabs[0].id, &TabId::Project);
    prop_assert!(!tabs[0].closable);
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Uniqueness, active validity, project tab presence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_command(
        commands in prop::collection::vec(command_strategy(), 0..64)
    ) {
        let mut manager = TabManager::new();
        assert_invariants(&manager)?;
        for command in &commands {
            manager.apply(command);
            assert_invariants(&manager)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Idempotent open
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn open_is_idempotent(
        prefix in prop::collection::vec(command_strategy(), 0..32),
        id in entity_id_strategy(),
        kind in kind_strategy(),
    ) {
        let mut once = TabManager::replay(&prefix);
        once.open_tab(id.clone(), kind, true);

        let mut twice = once.clone();
        twice.open_tab(id.clone(), kind, true);

        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.active_tab_id(), &id);
        prop_assert_eq!(twice.active_tab_id(), &id);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Close-then-reopen
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reopen_after_close_appends(
        prefix in prop::collection::vec(command_strategy(), 0..32),
        id in entity_id_strategy(),
        kind in kind_strategy(),
    ) {
        let mut manager = TabManager::replay(&prefix);
        manager.open_tab(id.clone(), kind, true);
        manager.close_tab(&id);
        manager.open_tab(id.clone(), kind, true);

        let matching = manager.open_tabs().iter().filter(|tab| tab.id == id).count();
        prop_assert_eq!(matching, 1);
        prop_assert_eq!(manager.position(&id), Some(manager.len() - 1));
    }
}
