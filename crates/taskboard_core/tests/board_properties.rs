use proptest::prelude::*;
use proptest::test_runner::Config;
use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    load_or_empty, Board, BoardStore, FixedClock, Item, ItemDraft, ItemId, ItemPatch, Lane,
    MemorySnapshotRepository, Priority, SnapshotRepository, SqliteSnapshotRepository,
};
use uuid::Uuid;

const ACCOUNT: &str = "account-prop";
const NOW: i64 = 1_700_000_000_000;

#[derive(Debug, Clone)]
enum Op {
    Create { lane: Lane },
    Move { pick: usize, lane: Lane, index: usize },
    Relane { pick: usize, lane: Lane },
    Delete { pick: usize },
}

fn lane_strategy() -> impl Strategy<Value = Lane> {
    prop_oneof![Just(Lane::Todo), Just(Lane::Doing), Just(Lane::Done)]
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => lane_strategy().prop_map(|lane| Op::Create { lane }),
        2 => (any::<usize>(), lane_strategy(), 0_usize..8)
            .prop_map(|(pick, lane, index)| Op::Move { pick, lane, index }),
        1 => (any::<usize>(), lane_strategy()).prop_map(|(pick, lane)| Op::Relane { pick, lane }),
        1 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
    ]
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (
        "[A-Za-z][A-Za-z0-9 ]{0,15}",
        proptest::option::of("[a-z ]{0,24}"),
        lane_strategy(),
        priority_strategy(),
        "[a-z]{1,8}",
        0_i64..4_000_000_000_000,
        0_i64..1_000_000,
        0_u32..16,
    )
        .prop_map(
            |(title, description, lane, priority, assignee, created_at, done_after, order)| Item {
                id: Uuid::nil(),
                title,
                description,
                lane,
                priority,
                assignee,
                created_at,
                completed_at: (lane == Lane::Done).then_some(created_at + done_after),
                order,
            },
        )
}

fn board_strategy() -> impl Strategy<Value = Board> {
    (any::<u64>(), proptest::collection::vec(item_strategy(), 0..24)).prop_map(|(salt, items)| {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, mut item)| {
                item.id = Uuid::from_u128((u128::from(salt) << 64) | (index as u128 + 1));
                item
            })
            .collect();
        Board::from_items(items)
    })
}

fn pick_id(ids: &[ItemId], pick: usize) -> Option<ItemId> {
    (!ids.is_empty()).then(|| ids[pick % ids.len()])
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn lanes_stay_dense_and_completion_tracks_done_lane(
        ops in proptest::collection::vec(op_strategy(), 0..200)
    ) {
        let repo = MemorySnapshotRepository::new();
        let mut store = BoardStore::open(ACCOUNT, &repo).with_clock(FixedClock(NOW));
        let mut ids: Vec<ItemId> = Vec::new();

        for (step, op) in ops.into_iter().enumerate() {
            match op {
                Op::Create { lane } => {
                    let draft = ItemDraft::new(format!("item {step}"), "an", Priority::Medium, lane);
                    ids.push(store.create(draft).unwrap().id);
                }
                Op::Move { pick: slot, lane, index } => {
                    if let Some(id) = pick_id(&ids, slot) {
                        store.move_item(id, lane, index).unwrap();
                    }
                }
                Op::Relane { pick: slot, lane } => {
                    if let Some(id) = pick_id(&ids, slot) {
                        let patch = ItemPatch { lane: Some(lane), ..ItemPatch::default() };
                        store.update(id, patch).unwrap();
                    }
                }
                Op::Delete { pick: slot } => {
                    if let Some(id) = pick_id(&ids, slot) {
                        ids.retain(|candidate| *candidate != id);
                        prop_assert!(store.delete(id).unwrap());
                    }
                }
            }

            prop_assert!(store.board().is_dense());
            prop_assert_eq!(store.board().len(), ids.len());
            for item in store.board().items() {
                prop_assert_eq!(item.completed_at.is_some(), item.is_done());
            }
        }

        prop_assert_eq!(&load_or_empty(&repo, ACCOUNT), store.board());
    }

    #[test]
    fn sqlite_snapshot_round_trips_generated_boards(board in board_strategy()) {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

        repo.save(ACCOUNT, &board).unwrap();
        let loaded = repo.load(ACCOUNT).unwrap();

        prop_assert_eq!(loaded, Some(board));
    }
}
