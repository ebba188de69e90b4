//! Integration tests for UserDataStore: transitions, subscriptions and
//! best-effort persistence.


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use arcade_atlas::{
    Action, FixedEnvironment, GameSnap, InMemoryStorage, KeyValueStorage, ListType, Review,
    ReviewDraft, StoreConfig, UserDataState, UserDataStore, WriteMode, DEFAULT_STORAGE_KEY,
};
use serde_json::json;
use storage::{FlakyStorage, PanickingStorage, UnreadableStorage};

fn hollow_knight() -> GameSnap {
    GameSnap {
        id: 42,
        title: "Hollow Knight".into(),
        img_url: Some("//img/x.jpg".into()),
        genre: Some("Metroidvania".into()),
        release_year: Some(2017),
    }
}

fn open(storage: Arc<dyn KeyValueStorage>, mode: WriteMode) -> (UserDataStore, Arc<FixedEnvironment>) {
    let env = Arc::new(FixedEnvironment::new(1_700_000_000_000));
    let store = UserDataStore::open_with_environment(
        storage,
        StoreConfig::default().with_write_mode(mode),
        env.clone(),
    );
    (store, env)
}

#[test]
fn favorites_scenario() {
    let (store, _env) = open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate);

    assert!(store.dispatch_value(&json!({
        "type": "ADD_TO_LIST",
        "list": "favorites",
        "snap": {
            "id": 42,
            "title": "Hollow Knight",
            "imgURL": "//img/x.jpg",
            "genre": "Metroidvania",
            "releaseYear": 2017
        }
    })));

    let state = store.state();
    assert_eq!(state.collection(ListType::Favorites)[&42].title, "Hollow Knight");
    assert_eq!(state.catalog()[&42].title, "Hollow Knight");
    assert_eq!(state.collection(ListType::Favorites)[&42], state.catalog()[&42]);

    assert!(store.dispatch_value(&json!({
        "type": "REMOVE_FROM_LIST",
        "list": "favorites",
        "gameId": 42
    })));

    let state = store.state();
    assert!(!state.collection(ListType::Favorites).contains_key(&42));
    assert!(state.catalog().contains_key(&42));
}

#[test]
fn achievement_scenario() {
    let (store, env) = open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate);

    store.dispatch(Action::AddAchievement {
        game_id: 42,
        title: "Beat the final boss".into(),
    });
    let id = store.state().achievements_for(42)[0].id.clone();
    let toggle = Action::ToggleAchievement { game_id: 42, id };

    env.advance(60_000);
    store.dispatch(toggle.clone());
    let unlocked = store.state().achievements_for(42)[0].clone();
    assert!(unlocked.unlocked);
    assert_eq!(unlocked.date_unlocked, Some(1_700_000_060_000));

    store.dispatch(toggle);
    let relocked = store.state().achievements_for(42)[0].clone();
    assert!(!relocked.unlocked);
    assert_eq!(relocked.date_unlocked, None);
}

#[test]
fn reviews_accumulate_newest_first() {
    let (store, _env) = open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate);

    for (rating, created_at) in [(6, 10), (9, 20), (7, 30)] {
        let action =
            Action::add_review_checked(ReviewDraft::new(42, rating, ""), created_at).unwrap();
        store.dispatch(action);
    }

    let state = store.state();
    let order: Vec<i64> = state.reviews_for(42).iter().map(|r| r.created_at).collect();
    assert_eq!(order, vec![30, 20, 10]);
    assert_eq!(state.average_rating(42), Some(7.3));
}

#[test]
fn unknown_transition_tags_are_ignored() {
    let storage = Arc::new(FlakyStorage::new());
    let (store, _env) = open(storage.clone(), WriteMode::Immediate);
    let writes_after_open = storage.attempts();
    let before = store.state();

    assert!(!store.dispatch_value(&json!({ "type": "RESET_EVERYTHING" })));
    assert!(!store.dispatch_value(&json!({ "type": "ADD_TO_LIST", "list": "favorites" })));

    assert!(Arc::ptr_eq(&before, &store.state()));
    assert_eq!(storage.attempts(), writes_after_open);
}

#[test]
fn snapshots_held_by_readers_never_change() {
    let (store, _env) = open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate);
    store.dispatch(Action::AddToList {
        list: ListType::Playing,
        snap: hollow_knight(),
    });
    let held = store.state();

    store.dispatch(Action::RemoveFromList {
        list: ListType::Playing,
        game_id: 42,
    });
    store.dispatch(Action::AddReview {
        review: Review {
            game_id: 42,
            rating: 10,
            text: None,
            created_at: 1,
        },
    });

    assert!(held.in_list(ListType::Playing, 42));
    assert!(held.reviews_for(42).is_empty());
    assert!(!store.state().in_list(ListType::Playing, 42));
}

#[test]
fn every_change_is_persisted_immediately() {
    let storage = InMemoryStorage::new();
    let (store, _env) = open(Arc::new(storage.clone()), WriteMode::Immediate);

    store.dispatch(Action::AddToList {
        list: ListType::Completed,
        snap: hollow_knight(),
    });
    let blob = storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["lists"]["completed"]["42"]["title"], "Hollow Knight");
    assert_eq!(value["catalog"]["42"]["releaseYear"], 2017);
}

#[test]
fn write_failures_are_swallowed_and_retried_by_the_next_change() {
    let storage = Arc::new(FlakyStorage::new());
    let (store, _env) = open(storage.clone(), WriteMode::Immediate);

    storage.fail_writes(true);
    assert!(store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(1, "Inside"),
    }));
    assert!(store.state().catalog().contains_key(&1));
    let persisted: UserDataState =
        serde_json::from_str(&storage.inner.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap())
            .unwrap();
    assert!(persisted.catalog().is_empty());

    storage.fail_writes(false);
    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(2, "Limbo"),
    });
    let persisted: UserDataState =
        serde_json::from_str(&storage.inner.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap())
            .unwrap();
    assert_eq!(persisted.catalog().len(), 2);
}

#[test]
fn unreadable_storage_starts_empty() {
    let (store, _env) = open(Arc::new(UnreadableStorage), WriteMode::Immediate);
    assert_eq!(*store.state(), UserDataState::default());
    assert!(store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(1, "Inside"),
    }));
}

#[test]
fn corrupt_blob_starts_empty() {
    let storage = InMemoryStorage::new();
    storage.set_item(DEFAULT_STORAGE_KEY, "{{{ not json").unwrap();
    let (store, _env) = open(Arc::new(storage), WriteMode::Immediate);
    assert_eq!(*store.state(), UserDataState::default());
}

#[test]
fn background_writes_land_after_flush() {
    let storage = InMemoryStorage::new();
    let (store, _env) = open(Arc::new(storage.clone()), WriteMode::Background);

    for id in 1..=50 {
        store.dispatch(Action::CatalogAdd {
            snap: GameSnap::new(id, format!("Game {}", id)),
        });
    }
    store.flush();

    let persisted: UserDataState =
        serde_json::from_str(&storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, *store.state());
}

#[test]
fn panicking_storage_does_not_hang_flush() {
    let storage = Arc::new(PanickingStorage::default());
    let (store, _env) = open(storage.clone(), WriteMode::Background);
    let store = Arc::new(store);

    assert!(store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(1, "Inside"),
    }));

    let (done_tx, done_rx) = mpsc::channel();
    let flusher = Arc::clone(&store);
    std::thread::spawn(move || {
        flusher.flush();
        let _ = done_tx.send(());
    });
    assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());

    // The writer is still alive and keeps attempting later changes.
    let before = storage.writes();
    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(2, "Limbo"),
    });
    store.flush();
    assert!(storage.writes() > before);
    assert_eq!(store.state().catalog().len(), 2);
}

#[test]
fn dropping_the_store_flushes() {
    let storage = InMemoryStorage::new();
    {
        let (store, _env) = open(Arc::new(storage.clone()), WriteMode::Background);
        store.dispatch(Action::AddToList {
            list: ListType::Backlog,
            snap: hollow_knight(),
        });
    }
    let (reopened, _env) = open(Arc::new(storage), WriteMode::Immediate);
    assert!(reopened.state().in_list(ListType::Backlog, 42));
}

#[test]
fn subscribers_observe_changes_in_order() {
    let (store, _env) = open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate);
    let titles = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&titles);
    store.subscribe(move |state| {
        let mut titles = sink.lock().unwrap();
        titles.push(state.catalog().values().map(|s| s.title.clone()).collect::<Vec<_>>());
    });

    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(1, "A"),
    });
    store.dispatch(Action::RemoveFromList {
        list: ListType::Favorites,
        game_id: 1,
    });
    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(2, "B"),
    });

    let titles = titles.lock().unwrap();
    assert_eq!(
        *titles,
        vec![vec!["A".to_string()], vec!["A".to_string(), "B".to_string()]]
    );
}

#[test]
fn listeners_may_dispatch() {
    let store = Arc::new(open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate).0);
    let weak = Arc::downgrade(&store);
    let seen = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&seen);

    store.subscribe(move |state| {
        counter.fetch_add(1, Ordering::SeqCst);
        // Mirror every catalog addition into the backlog exactly once.
        let Some(store) = weak.upgrade() else {
            return;
        };
        for snap in state.catalog().values() {
            if !state.in_list(ListType::Backlog, snap.id) {
                store.dispatch(Action::AddToList {
                    list: ListType::Backlog,
                    snap: snap.clone(),
                });
            }
        }
    });

    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(5, "Hades"),
    });
    assert!(store.state().in_list(ListType::Backlog, 5));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn later_listeners_skip_a_state_overtaken_by_a_nested_dispatch() {
    let store = Arc::new(open(Arc::new(InMemoryStorage::new()), WriteMode::Immediate).0);
    let weak = Arc::downgrade(&store);
    store.subscribe(move |state| {
        if state.catalog().len() == 1 {
            if let Some(store) = weak.upgrade() {
                store.dispatch(Action::CatalogAdd {
                    snap: GameSnap::new(2, "Follow-up"),
                });
            }
        }
    });
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    store.subscribe(move |state| sink.lock().unwrap().push(state.catalog().len()));

    store.dispatch(Action::CatalogAdd {
        snap: GameSnap::new(1, "First"),
    });

    assert_eq!(*sizes.lock().unwrap(), vec![2]);
}

#[test]
fn concurrent_dispatches_notify_in_revision_order() {
    let store = Arc::new(open(Arc::new(InMemoryStorage::new()), WriteMode::Background).0);
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    store.subscribe(move |state| sink.lock().unwrap().push(state.catalog().len()));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..25u64 {
                    store.dispatch(Action::CatalogAdd {
                        snap: GameSnap::new(t * 100 + i, "Game"),
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let sizes = sizes.lock().unwrap();
    assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(sizes.last(), Some(&100));
}

#[test]
fn shared_across_threads() {
    let store = Arc::new(open(Arc::new(InMemoryStorage::new()), WriteMode::Background).0);
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..25u64 {
                    store.dispatch(Action::IndexCompany {
                        company: "Shared Studio".into(),
                        game_id: t * 100 + i,
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.state().games_for_company("Shared Studio").len(), 100);
    assert_eq!(store.revision(), 100);
}
