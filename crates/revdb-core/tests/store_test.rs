//! Integration tests for the versioned store under sequential and concurrent use.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use revdb_core::{Application, FilterField, ListFilter, VersionedStore};

fn resource_versions(history: &[Application]) -> Vec<u64> {
    history
        .iter()
        .map(|a| a.resource_version.parse().unwrap())
        .collect()
}

fn assert_strictly_increasing(versions: &[u64]) {
    assert!(!versions.is_empty());
    for pair in versions.windows(2) {
        assert!(pair[0] < pair[1], "versions not increasing: {:?}", versions);
    }
}

/// Create, update, delete walk-through with the exact resource versions.
#[test]
fn test_lifecycle_walkthrough() {
    let store = VersionedStore::new();

    store.create(&Application::new("X", "1")).unwrap();
    let got = store.get("X").unwrap();
    assert_eq!(got.resource_version, "0");
    assert!(got.delete_time_stamp.is_none());

    store.update(&Application::new("X", "2")).unwrap();
    assert_eq!(store.get("X").unwrap().resource_version, "1");

    let deleted = store.delete("X").unwrap();
    assert_eq!(deleted.resource_version, "2");
    assert!(deleted.delete_time_stamp.is_some());

    assert!(store.get("X").unwrap_err().is_not_found());
    let history = store.dump_key("X").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(resource_versions(&history), vec![0, 1, 2]);

    // earlier revisions are untouched by later ones
    assert_eq!(history[0].version, "1");
    assert!(history[0].delete_time_stamp.is_none());
    assert!(history[1].delete_time_stamp.is_none());
}

/// Delete/create cycles keep numbering and never reset to zero.
#[test]
fn test_delete_create_cycles() {
    let store = VersionedStore::new();
    let app = Application::new("cycle", "1");

    for _ in 0..3 {
        store.create(&app).unwrap();
        store.delete("cycle").unwrap();
    }
    let recreated = store.create(&app).unwrap();

    assert_eq!(recreated.resource_version, "6");
    let history = store.dump_key("cycle").unwrap();
    assert_eq!(history.len(), 7);
    assert_strictly_increasing(&resource_versions(&history));
}

/// Compaction bounds history without touching the current revision.
#[test]
fn test_compaction_keeps_tail() {
    let store = VersionedStore::new();
    store.create(&Application::new("short", "1")).unwrap();
    store.create(&Application::new("long", "0")).unwrap();
    for v in 1..10 {
        store
            .update(&Application::new("long", v.to_string()))
            .unwrap();
    }
    store.delete("long").unwrap();

    store.compact(2);

    let short = store.dump_key("short").unwrap();
    assert_eq!(short.len(), 1);

    let long = store.dump_key("long").unwrap();
    assert_eq!(long.len(), 2);
    assert_eq!(resource_versions(&long), vec![9, 10]);
    assert!(long[1].delete_time_stamp.is_some());

    // numbering continues past the compacted gap
    let recreated = store.create(&Application::new("long", "11")).unwrap();
    assert_eq!(recreated.resource_version, "11");
}

#[test]
fn test_list_source_filter() {
    let store = VersionedStore::new();
    store
        .create(&Application::new("a", "1").with_source("acme"))
        .unwrap();
    store
        .create(&Application::new("b", "1").with_source("other"))
        .unwrap();
    store
        .create(&Application::new("c", "1").with_source("acme"))
        .unwrap();
    store.delete("c").unwrap();

    let filter = ListFilter::new().with(FilterField::Source, "acme");
    let listed = store.list(&filter);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "a");

    assert_eq!(store.list(&ListFilter::new()).len(), 2);
}

/// Racing creates for one title: exactly one wins.
#[test]
fn test_concurrent_create_single_winner() {
    const THREADS: usize = 16;
    let store = Arc::new(VersionedStore::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                store.create(&Application::new("contended", i.to_string()))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_conflict()))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(conflicts, THREADS - 1);
    assert_eq!(store.dump_key("contended").unwrap().len(), 1);
}

/// Concurrent updates, deletes and compaction never produce duplicate versions.
#[test]
fn test_concurrent_mutations_with_compaction() {
    const WRITERS: usize = 8;
    const ROUNDS: usize = 50;
    let store = Arc::new(VersionedStore::new());
    store.create(&Application::new("shared", "init")).unwrap();

    let mut handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = store.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                for r in 0..ROUNDS {
                    let app = Application::new("shared", format!("{}-{}", w, r));
                    let result = match r % 5 {
                        3 => store.delete("shared"),
                        4 => store.create(&app),
                        _ => store.update(&app),
                    };
                    if let Ok(stored) = result {
                        seen.push(stored.resource_version.parse::<u64>().unwrap());
                    }
                }
                seen
            })
        })
        .collect();

    let compactor = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                store.compact(2);
                thread::yield_now();
            }
            Vec::new()
        })
    };
    handles.push(compactor);

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.join().unwrap());
    }
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len(), "duplicate resource versions issued");

    let history = store.dump_key("shared").unwrap();
    assert_strictly_increasing(&resource_versions(&history));
    let newest = *resource_versions(&history).last().unwrap();
    assert_eq!(newest as usize, all.len());
}
