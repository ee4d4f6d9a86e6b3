use taskboard_core::{
    Board, BoardEffect, BoardError, BoardIntent, BoardStore, FixedClock, Item, ItemDraft,
    ItemPatch, ItemValidationError, Lane, MemorySnapshotRepository, MoveOutcome, Priority,
};
use uuid::Uuid;

const ACCOUNT: &str = "account-1";
const NOW: i64 = 1_700_000_000_000;

fn store(repo: &MemorySnapshotRepository) -> BoardStore<&MemorySnapshotRepository> {
    BoardStore::open(ACCOUNT, repo).with_clock(FixedClock(NOW))
}

fn draft(title: &str, lane: Lane) -> ItemDraft {
    ItemDraft::new(title, "an", Priority::Medium, lane)
}

fn lane_titles(store: &BoardStore<&MemorySnapshotRepository>, lane: Lane) -> Vec<String> {
    store
        .lane(lane)
        .into_iter()
        .map(|item| format!("{}@{}", item.title, item.order))
        .collect()
}

fn assert_dense(board: &Board) {
    for lane in Lane::ALL {
        let mut orders = board
            .items()
            .iter()
            .filter(|item| item.lane == lane)
            .map(|item| item.order)
            .collect::<Vec<_>>();
        orders.sort_unstable();
        let expected = (0..orders.len() as u32).collect::<Vec<_>>();
        assert_eq!(orders, expected, "lane {lane} is not dense");
    }
}

#[test]
fn create_appends_to_end_of_target_lane() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);

    let first = store.create(draft("A", Lane::Todo)).unwrap();
    let second = store.create(draft("B", Lane::Todo)).unwrap();
    let other = store.create(draft("X", Lane::Doing)).unwrap();

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_eq!(other.order, 0);
    assert_eq!(first.created_at, NOW);
    assert_eq!(first.completed_at, None);
    assert_eq!(repo.save_count(), 3);
}

#[test]
fn create_rejects_missing_fields_without_writing() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);

    let err = store.create(draft("  ", Lane::Todo)).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(ItemValidationError::EmptyTitle)
    ));

    let no_assignee = ItemDraft::new("title", "", Priority::Low, Lane::Todo);
    let err = store.create(no_assignee).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(ItemValidationError::EmptyAssignee)
    ));

    assert!(store.list().is_empty());
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn create_into_done_is_stamped() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);

    let item = store.create(draft("shipped", Lane::Done)).unwrap();
    assert_eq!(item.completed_at, Some(NOW));
}

#[test]
fn reorder_then_transfer_scenario() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    let b = store.create(draft("B", Lane::Todo)).unwrap();
    store.create(draft("C", Lane::Todo)).unwrap();

    store.move_item(b.id, Lane::Todo, 0).unwrap();
    assert_eq!(lane_titles(&store, Lane::Todo), vec!["B@0", "A@1", "C@2"]);

    let outcome = store.move_item(a.id, Lane::Done, 0).unwrap();
    let MoveOutcome::Moved(moved) = outcome else {
        panic!("expected a move");
    };
    assert_eq!(moved.lane, Lane::Done);
    assert_eq!(moved.completed_at, Some(NOW));
    assert_eq!(lane_titles(&store, Lane::Todo), vec!["B@0", "C@1"]);
    assert_eq!(lane_titles(&store, Lane::Done), vec!["A@0"]);
    assert_eq!(repo.save_count(), 5);
}

#[test]
fn move_onto_own_slot_is_a_silent_noop() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    store.create(draft("A", Lane::Doing)).unwrap();
    let b = store.create(draft("B", Lane::Doing)).unwrap();
    let before = store.board().clone();
    let saves = repo.save_count();

    assert_eq!(
        store.move_item(b.id, Lane::Doing, 1).unwrap(),
        MoveOutcome::Unchanged
    );
    assert_eq!(
        store.move_item(b.id, Lane::Doing, 99).unwrap(),
        MoveOutcome::Unchanged
    );
    assert_eq!(store.board(), &before);
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn move_of_unknown_item_reports_not_found_without_writing() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    store.create(draft("A", Lane::Todo)).unwrap();
    let saves = repo.save_count();

    let missing = Uuid::new_v4();
    let err = store.move_item(missing, Lane::Done, 0).unwrap_err();
    assert!(matches!(err, BoardError::NotFound(id) if id == missing));
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn moving_out_of_done_clears_completion_and_between_open_lanes_keeps_it() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let item = store.create(draft("A", Lane::Todo)).unwrap();

    store.move_item(item.id, Lane::Doing, 0).unwrap();
    assert_eq!(store.get(item.id).unwrap().completed_at, None);

    store.move_item(item.id, Lane::Done, 0).unwrap();
    assert_eq!(store.get(item.id).unwrap().completed_at, Some(NOW));

    store.move_item(item.id, Lane::Todo, 0).unwrap();
    assert_eq!(store.get(item.id).unwrap().completed_at, None);
}

#[test]
fn transfer_shifts_later_source_items_down() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let ids = ["A", "B", "C", "D"]
        .into_iter()
        .map(|title| store.create(draft(title, Lane::Todo)).unwrap().id)
        .collect::<Vec<_>>();

    store.move_item(ids[1], Lane::Doing, 0).unwrap();

    assert_eq!(lane_titles(&store, Lane::Todo), vec!["A@0", "C@1", "D@2"]);
    assert_eq!(lane_titles(&store, Lane::Doing), vec!["B@0"]);
    assert_dense(store.board());
}

#[test]
fn delete_closes_gap_and_absent_delete_is_noop() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    store.create(draft("B", Lane::Todo)).unwrap();
    let c = store.create(draft("C", Lane::Todo)).unwrap();

    assert!(store.delete(c.id).unwrap());
    assert_eq!(lane_titles(&store, Lane::Todo), vec!["A@0", "B@1"]);

    assert!(store.delete(a.id).unwrap());
    assert_eq!(lane_titles(&store, Lane::Todo), vec!["B@0"]);
    assert_dense(store.board());

    let saves = repo.save_count();
    assert!(!store.delete(Uuid::new_v4()).unwrap());
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn update_edits_fields_in_place() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    store.create(draft("A", Lane::Todo)).unwrap();
    let b = store.create(draft("B", Lane::Todo)).unwrap();

    let patch = ItemPatch {
        title: Some("B2".to_string()),
        priority: Some(Priority::High),
        description: Some(Some("notes".to_string())),
        lane: Some(Lane::Todo),
        ..ItemPatch::default()
    };
    let updated = store.update(b.id, patch).unwrap();

    assert_eq!(updated.title, "B2");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.description.as_deref(), Some("notes"));
    assert_eq!(updated.order, 1);
    assert_eq!(updated.created_at, b.created_at);
}

#[test]
fn update_with_lane_change_goes_through_move_path() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    store.create(draft("B", Lane::Todo)).unwrap();
    store.create(draft("X", Lane::Done)).unwrap();

    let patch = ItemPatch {
        lane: Some(Lane::Done),
        ..ItemPatch::default()
    };
    let updated = store.update(a.id, patch).unwrap();

    assert_eq!(updated.lane, Lane::Done);
    assert_eq!(updated.order, 1);
    assert_eq!(updated.completed_at, Some(NOW));
    assert_eq!(lane_titles(&store, Lane::Todo), vec!["B@0"]);
    assert_eq!(lane_titles(&store, Lane::Done), vec!["X@0", "A@1"]);
}

#[test]
fn empty_patch_returns_item_without_writing() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    let saves = repo.save_count();

    let unchanged = store.update(a.id, ItemPatch::default()).unwrap();

    assert_eq!(unchanged, a);
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn update_failures_write_nothing() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    let before = store.board().clone();
    let saves = repo.save_count();

    let blank = ItemPatch {
        title: Some("ok".to_string()),
        assignee: Some(" ".to_string()),
        lane: Some(Lane::Done),
        ..ItemPatch::default()
    };
    assert!(matches!(
        store.update(a.id, blank).unwrap_err(),
        BoardError::Validation(ItemValidationError::EmptyAssignee)
    ));

    let missing = Uuid::new_v4();
    assert!(matches!(
        store.update(missing, ItemPatch::default()).unwrap_err(),
        BoardError::NotFound(id) if id == missing
    ));

    assert_eq!(store.board(), &before);
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn persistence_failure_is_reported_but_not_rolled_back() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    let a = store.create(draft("A", Lane::Todo)).unwrap();
    repo.set_fail_saves(true);

    let err = store.move_item(a.id, Lane::Doing, 0).unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(store.get(a.id).unwrap().lane, Lane::Doing);

    let err = store.create(draft("B", Lane::Todo)).unwrap_err();
    assert!(matches!(err, BoardError::Persistence(_)));
    assert_eq!(store.list().len(), 2);

    repo.set_fail_saves(false);
    store.create(draft("C", Lane::Todo)).unwrap();
    let reloaded = BoardStore::open(ACCOUNT, &repo);
    assert_eq!(reloaded.list().len(), 3);
}

#[test]
fn apply_dispatches_tagged_intents() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);

    let BoardEffect::Created(item) = store
        .apply(BoardIntent::Create(draft("A", Lane::Todo)))
        .unwrap()
    else {
        panic!("expected created effect");
    };

    let effect = store
        .apply(BoardIntent::Move {
            id: item.id,
            lane: Lane::Todo,
            index: 0,
        })
        .unwrap();
    assert_eq!(effect, BoardEffect::Unchanged);

    let effect = store
        .apply(BoardIntent::Move {
            id: item.id,
            lane: Lane::Done,
            index: 0,
        })
        .unwrap();
    assert!(matches!(effect, BoardEffect::Moved(ref moved) if moved.lane == Lane::Done));

    let effect = store
        .apply(BoardIntent::Edit {
            id: item.id,
            patch: ItemPatch {
                assignee: Some("binh".to_string()),
                ..ItemPatch::default()
            },
        })
        .unwrap();
    assert!(matches!(effect, BoardEffect::Updated(ref updated) if updated.assignee == "binh"));

    assert_eq!(
        store.apply(BoardIntent::Delete { id: item.id }).unwrap(),
        BoardEffect::Deleted(item.id)
    );
    assert_eq!(
        store.apply(BoardIntent::Delete { id: item.id }).unwrap(),
        BoardEffect::Unchanged
    );
}

#[test]
fn stats_filter_and_assignees_reflect_board() {
    let repo = MemorySnapshotRepository::new();
    let mut store = store(&repo);
    store.create(draft("Write report", Lane::Todo)).unwrap();
    store
        .create(ItemDraft::new("Review report", "binh", Priority::Low, Lane::Doing))
        .unwrap();
    store.create(draft("Deploy", Lane::Done)).unwrap();

    let stats = store.stats();
    assert_eq!((stats.total, stats.todo, stats.doing, stats.done), (3, 1, 1, 1));
    assert_eq!(store.assignees(), vec!["an".to_string(), "binh".to_string()]);

    let views = store.filter(&taskboard_core::ItemFilter::text("REPORT").with_assignee("binh"));
    let matched = views
        .iter()
        .flat_map(|view| view.items.iter())
        .collect::<Vec<&Item>>();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].lane, Lane::Doing);
}
