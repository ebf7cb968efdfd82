use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use reelbox_core::models::collection::{name_key, CollectionId};
use reelbox_core::models::movie::Movie;
use reelbox_core::notify::NullSink;
use reelbox_library::Repository;
use reelbox_store::{CollectionStore, KvStore, MemoryKvStore};

const NAMES: &[&str] = &["Favorites", "favorites", "Watchlist", " Noir ", "NOIR", "Sci-Fi", ""];
const MOVIES: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Create(usize),
    Add(usize, usize),
    Remove(usize, usize),
    Delete(usize),
    MoveToNew(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len()).prop_map(Op::Create),
        (0..8usize, 0..MOVIES).prop_map(|(c, m)| Op::Add(c, m)),
        (0..8usize, 0..MOVIES).prop_map(|(c, m)| Op::Remove(c, m)),
        (0..8usize).prop_map(Op::Delete),
        (0..MOVIES, 0..NAMES.len()).prop_map(|(m, n)| Op::MoveToNew(m, n)),
    ]
}

fn movie(index: usize) -> Movie {
    let mut m = Movie::new(format!("tt{index:07}"), format!("Title {index}"));
    m.director = Some(format!("Director {index}"));
    m.insert_field("Awards", serde_json::json!(format!("{index} wins")))
        .unwrap();
    m
}

/// Pick an existing collection id, or a missing one when `pick` is past the end.
fn collection_id(repo: &Repository, pick: usize) -> CollectionId {
    repo.list_collections()
        .get(pick)
        .map(|c| c.id.clone())
        .unwrap_or_else(|| CollectionId::from("missing"))
}

fn apply(repo: &mut Repository, op: &Op) {
    match *op {
        Op::Create(n) => {
            let _ = repo.create_collection(NAMES[n], Vec::new());
        }
        Op::Add(c, m) => {
            let id = collection_id(repo, c);
            let _ = repo.add_to_collection(&id, movie(m));
        }
        Op::Remove(c, m) => {
            let id = collection_id(repo, c);
            let _ = repo.remove_from_collection(&id, &movie(m).imdb_id);
        }
        Op::Delete(c) => {
            let id = collection_id(repo, c);
            let _ = repo.delete_collection(&id);
        }
        Op::MoveToNew(m, n) => {
            let _ = repo.move_to_new_collection(movie(m), NAMES[n]);
        }
    }
}

fn open() -> (Repository, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    let repo = Repository::open(CollectionStore::new(Box::new(kv.clone())))
        .with_sink(Box::new(NullSink));
    (repo, kv)
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let (mut repo, _kv) = open();

        for op in &ops {
            apply(&mut repo, op);

            let collections = repo.list_collections();

            let mut seen_names = HashSet::new();
            for c in collections {
                prop_assert!(!c.name.trim().is_empty());
                prop_assert!(seen_names.insert(name_key(&c.name)), "duplicate name {:?}", c.name);
            }

            let mut seen_movies = HashSet::new();
            for c in collections {
                for m in &c.movies {
                    prop_assert!(seen_movies.insert(m.imdb_id.clone()), "{} held twice", m.imdb_id);
                }
            }

            prop_assert!(repo.is_in_sync().unwrap());
        }
    }

    #[test]
    fn reopen_reproduces_state(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let (mut repo, kv) = open();
        for op in &ops {
            apply(&mut repo, op);
        }
        let snapshot = repo.list_collections().to_vec();

        let reopened = Repository::open(CollectionStore::new(Box::new(kv.clone())));
        prop_assert_eq!(reopened.list_collections(), snapshot.as_slice());
    }

    #[test]
    fn delete_twice_equals_delete_once(ops in proptest::collection::vec(op_strategy(), 0..30), pick in 0..8usize) {
        let (mut repo, kv) = open();
        for op in &ops {
            apply(&mut repo, op);
        }
        let id = collection_id(&repo, pick);

        repo.delete_collection(&id).unwrap();
        let once = (repo.list_collections().to_vec(), kv.get("movieCollections").unwrap());
        prop_assert!(repo.delete_collection(&id).unwrap().is_none());
        let twice = (repo.list_collections().to_vec(), kv.get("movieCollections").unwrap());
        prop_assert_eq!(once, twice);
    }
}
