//! Lifecycle operations through the `TabTree` facade over a shared `MemoryStore`.

mod common;

use common::{loaded_view, shared_views, snapshot, visible_ids};
use tabtree::{
    Attachment, Config, MemoryStore, Snapshot, StorageGateway, TabEvent, TabRecord, TabTree,
    TabTreeError,
};
use tabtree_keybindings::{KeyAction, KeyInput, KeybindingRegistry, Modifiers, NamedKey};

// ---------------------------------------------------------------------------
// Opening tabs
// ---------------------------------------------------------------------------

#[test]
fn test_open_root_tab_writes_intent_and_waits_for_echo() {
    let store = MemoryStore::new();
    let mut tree = loaded_view(&store);

    let id = tree.open_root_tab().unwrap();

    assert_eq!(id, 0);
    assert_eq!(store.snapshot().get(0).and_then(|r| r.parent), None);
    assert!(tree.registry().is_empty());

    tree.pump().unwrap();
    let node = tree.get(0).unwrap();
    assert_eq!(node.borrow().attachment(), Attachment::Root);
    assert_eq!(node.borrow().label(), "New Tab: 0");
}

#[test]
fn test_open_new_tab_without_selection_opens_at_root() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None)]));
    let mut tree = loaded_view(&store);

    assert_eq!(tree.open_new_tab(), Some(1));
    assert_eq!(store.snapshot().get(1).and_then(|r| r.parent), None);
}

#[test]
fn test_open_new_tab_nests_under_selected_tab_zero() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None)]));
    let mut tree = loaded_view(&store);
    tree.select(0).unwrap();

    let id = tree.open_new_tab().unwrap();
    tree.pump().unwrap();

    assert_eq!(tree.get(id).unwrap().borrow().attachment(), Attachment::Under(0));
    assert!(tree.get(0).unwrap().borrow().has_children());
}

#[test]
fn test_allocation_fills_gaps() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None), (1, None), (3, None)]));
    let mut tree = loaded_view(&store);
    assert_eq!(tree.open_root_tab(), Some(2));
    assert_eq!(tree.open_root_tab(), Some(4));
}

#[test]
fn test_sequential_opens_from_two_views_get_distinct_ids() {
    // Allocation reads the store's current snapshot, so a write that already
    // landed is seen by the next view even before that view has pumped it.
    let (store, mut first, mut second) = shared_views(Snapshot::new());
    let a = first.open_root_tab().unwrap();
    let b = second.open_root_tab().unwrap();
    assert_ne!(a, b);
    assert_eq!(store.snapshot().len(), 2);
}

// ---------------------------------------------------------------------------
// Two views sharing storage
// ---------------------------------------------------------------------------

#[test]
fn test_changes_from_one_view_reach_the_other() {
    let (_store, mut first, mut second) = shared_views(Snapshot::new());

    first.open_root_tab();
    second.pump().unwrap();
    first.pump().unwrap();

    assert_eq!(visible_ids(&first), vec![0]);
    assert_eq!(visible_ids(&second), vec![0]);
}

#[test]
fn test_selection_is_per_view() {
    let (_store, mut first, second) = shared_views(snapshot(&[(0, None), (1, None)]));
    first.select(1).unwrap();
    assert_eq!(first.current(), Some(1));
    assert_eq!(second.current(), None);
}

#[test]
fn test_closing_in_one_view_clears_selection_in_the_other() {
    let (_store, mut first, mut second) = shared_views(snapshot(&[(0, None), (1, None)]));
    first.select(1).unwrap();
    second.select(1).unwrap();

    assert_eq!(first.close_current_tab(), Some(1));
    first.pump().unwrap();
    second.pump().unwrap();

    assert_eq!(first.current(), None);
    assert_eq!(second.current(), None);
    assert!(second.get(1).is_none());
}

#[test]
fn test_snapshots_are_processed_in_order() {
    let (store, _first, mut second) = shared_views(Snapshot::new());
    store.write_tab_record(0, TabRecord::root()).unwrap();
    store.write_tab_record(1, TabRecord::child_of(0)).unwrap();
    store.remove_tab_record(0).unwrap();

    assert_eq!(second.pump().unwrap(), 3);
    assert!(second.get(0).is_none());
    assert_eq!(second.detached(), vec![1]);
    assert_eq!(
        second.drain_events(),
        vec![
            TabEvent::Created(0),
            TabEvent::Created(1),
            TabEvent::Updated(0),
            TabEvent::Removed(0),
            TabEvent::Updated(1),
        ]
    );
}

// ---------------------------------------------------------------------------
// Closing and clearing
// ---------------------------------------------------------------------------

#[test]
fn test_close_leaves_children_detached() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None), (1, Some(0)), (2, Some(1))]));
    let mut tree = loaded_view(&store);
    tree.select(0).unwrap();

    tree.close_current_tab();
    tree.pump().unwrap();

    assert_eq!(tree.detached(), vec![1]);
    assert!(visible_ids(&tree).is_empty());
    // Grandchild stays mounted under its detached parent
    assert_eq!(tree.get(2).unwrap().borrow().attachment(), Attachment::Under(1));
}

#[test]
fn test_detached_children_recover_when_moved_to_root() {
    let store = MemoryStore::with_snapshot(snapshot(&[(1, Some(0))]));
    let mut tree = loaded_view(&store);
    assert_eq!(tree.detached(), vec![1]);

    tree.move_tab(1, None).unwrap();
    tree.pump().unwrap();

    assert!(tree.detached().is_empty());
    assert_eq!(visible_ids(&tree), vec![1]);
}

#[test]
fn test_clear_all_empties_every_view() {
    let (store, mut first, mut second) = shared_views(snapshot(&[(0, None), (1, Some(0))]));
    first.clear_all();
    first.pump().unwrap();
    second.pump().unwrap();

    assert!(store.snapshot().is_empty());
    assert!(first.registry().is_empty());
    assert!(second.registry().is_empty());
}

// ---------------------------------------------------------------------------
// Moving
// ---------------------------------------------------------------------------

#[test]
fn test_move_applies_only_after_echo() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None), (1, None)]));
    let mut tree = loaded_view(&store);

    tree.move_tab(1, Some(0)).unwrap();
    assert_eq!(tree.get(1).unwrap().borrow().parent(), None);

    tree.pump().unwrap();
    assert_eq!(tree.get(1).unwrap().borrow().attachment(), Attachment::Under(0));
}

#[test]
fn test_move_under_descendant_is_refused() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None), (1, Some(0)), (2, Some(1))]));
    let mut tree = loaded_view(&store);

    assert!(matches!(
        tree.move_tab(0, Some(2)),
        Err(TabTreeError::WouldCycle { id: 0, parent: 2 })
    ));
    assert!(matches!(
        tree.move_tab(1, Some(1)),
        Err(TabTreeError::WouldCycle { .. })
    ));
    assert_eq!(store.snapshot(), snapshot(&[(0, None), (1, Some(0)), (2, Some(1))]));
}

#[test]
fn test_move_with_unknown_ids_is_refused() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None)]));
    let mut tree = loaded_view(&store);
    assert!(matches!(
        tree.move_tab(7, None),
        Err(TabTreeError::UnknownTab(7))
    ));
    assert!(matches!(
        tree.move_tab(0, Some(8)),
        Err(TabTreeError::UnknownTab(8))
    ));
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_is_optimistic_and_persisted() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None), (1, Some(0))]));
    let mut tree = loaded_view(&store);

    assert!(!tree.toggle_expanded(0).unwrap());
    assert!(!tree.get(0).unwrap().borrow().expanded());
    assert_eq!(visible_ids(&tree), vec![0]);
    assert_eq!(store.snapshot().get(0).and_then(|r| r.expanded), Some(false));

    tree.pump().unwrap();
    assert!(!tree.get(0).unwrap().borrow().expanded());
}

#[test]
fn test_optimistic_toggle_yields_to_storage() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None)]));
    let mut tree = loaded_view(&store);

    tree.toggle_expanded(0).unwrap();
    // Another writer sets it back before this view catches up
    store.write_tab_record(0, TabRecord::root().with_expanded(true)).unwrap();
    tree.pump().unwrap();

    assert!(tree.get(0).unwrap().borrow().expanded());
}

#[test]
fn test_toggle_unknown_tab_fails() {
    let store = MemoryStore::new();
    let mut tree = loaded_view(&store);
    assert!(matches!(
        tree.toggle_expanded(3),
        Err(TabTreeError::UnknownTab(3))
    ));
}

// ---------------------------------------------------------------------------
// Selection navigation
// ---------------------------------------------------------------------------

#[test]
fn test_select_next_skips_collapsed_children() {
    let initial = Snapshot::new()
        .with_tab(0, TabRecord::root().with_expanded(false))
        .with_tab(1, TabRecord::child_of(0))
        .with_tab(2, TabRecord::root());
    let store = MemoryStore::with_snapshot(initial);
    let mut tree = loaded_view(&store);

    assert_eq!(tree.select_next(), Some(0));
    assert_eq!(tree.select_next(), Some(2));
    assert_eq!(tree.select_next(), Some(0));
}

#[test]
fn test_select_new_tabs_config_selects_echoed_tab() {
    let store = MemoryStore::new();
    let config = Config {
        select_new_tabs: true,
        ..Config::default()
    };
    let mut tree = TabTree::with_config(Box::new(store.clone()), &config);
    tree.load().unwrap();

    let id = tree.open_root_tab().unwrap();
    tree.pump().unwrap();
    assert_eq!(tree.current(), Some(id));
}

// ---------------------------------------------------------------------------
// Keyboard dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_keyboard_session() {
    let store = MemoryStore::new();
    let mut tree = loaded_view(&store);
    let bindings = KeybindingRegistry::from_config(&Config::default().keybindings);
    let ctrl = |c| KeyInput::character(Modifiers::ctrl(), c);

    // Ctrl+T twice with nothing selected: two root tabs
    assert!(tree.handle_key(&bindings, &ctrl('t')));
    tree.pump().unwrap();
    assert!(tree.handle_key(&bindings, &ctrl('t')));
    tree.pump().unwrap();
    assert_eq!(visible_ids(&tree), vec![0, 1]);

    // Down selects the first tab, Ctrl+T nests under it
    assert!(tree.handle_key(
        &bindings,
        &KeyInput::named(Modifiers::default(), NamedKey::ArrowDown)
    ));
    assert_eq!(tree.current(), Some(0));
    tree.handle_key(&bindings, &ctrl('t'));
    tree.pump().unwrap();
    assert_eq!(visible_ids(&tree), vec![0, 2, 1]);

    // Space collapses the selected tab
    tree.handle_key(&bindings, &KeyInput::character(Modifiers::default(), ' '));
    tree.pump().unwrap();
    assert_eq!(visible_ids(&tree), vec![0, 1]);

    // Ctrl+W closes it; its child is left detached
    tree.handle_key(&bindings, &ctrl('w'));
    tree.pump().unwrap();
    assert_eq!(visible_ids(&tree), vec![1]);
    assert_eq!(tree.detached(), vec![2]);
    assert_eq!(tree.current(), None);

    // Ctrl+L is accepted and changes nothing
    assert!(tree.handle_key(&bindings, &ctrl('l')));
    assert_eq!(tree.pump().unwrap(), 0);

    // Ctrl+Q clears the store
    tree.handle_key(&bindings, &ctrl('q'));
    tree.pump().unwrap();
    assert!(tree.registry().is_empty());
}

#[test]
fn test_every_action_is_dispatchable() {
    let store = MemoryStore::with_snapshot(snapshot(&[(0, None)]));
    let mut tree = loaded_view(&store);
    tree.select(0).unwrap();
    for action in KeyAction::ALL {
        tree.execute_key_action(action);
        tree.pump().unwrap();
    }
    assert!(tree.registry().is_empty());
}
