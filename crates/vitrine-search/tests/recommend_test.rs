//! End-to-end tests: CSV catalog on disk -> index -> recommendations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use vitrine_core::{Catalog, ItemId};
use vitrine_search::{build_index, recommend, Recommender, Snapshot};

const HEADER: &str = "Name,Tags,ReviewCount,Brand,ImageURL,Rating";

fn write_catalog(dir: &Path, file: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(file);
    let mut out = std::fs::File::create(&path).unwrap();
    writeln!(out, "{HEADER}").unwrap();
    for row in rows {
        writeln!(out, "{row}").unwrap();
    }
    path
}

fn beauty_rows() -> Vec<&'static str> {
    vec![
        "Matte Lipstick,lipstick matte red long lasting makeup,120,Maybelline,https://img/1.jpg,4.3",
        "Gloss Lipstick,lipstick gloss nude makeup,45,Revlon,https://img/2.jpg,4.0",
        "Red Nail Polish,nail polish red,10,Essie,https://img/3.jpg,3.8",
        "Hair Shampoo,shampoo hair care,300,Pantene,https://img/4.jpg,4.6",
        "Hair Conditioner,conditioner hair care,280,Pantene,https://img/5.jpg,4.5",
        "Mystery Box,,0,,,",
        "Matte Foundation,foundation matte long wear makeup,90,Maybelline,https://img/7.jpg,4.1",
    ]
}

#[test]
fn test_end_to_end_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "catalog.csv", &beauty_rows());

    let catalog = Catalog::load(&path).unwrap();
    let index = build_index(&catalog);

    let recs = recommend(&catalog, &index, "Hair Shampoo", 3).unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].name, "Hair Conditioner");
    assert_eq!(recs[0].brand, "Pantene");
    assert_eq!(recs[0].review_count, 280);
    assert!(recs.iter().all(|r| r.name != "Hair Shampoo"));
}

#[test]
fn test_spec_example_ranking() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        dir.path(),
        "shoes.csv",
        &[
            "Red Shoe,red shoe leather,1,A,u1,1",
            "Blue Shoe,blue shoe leather,1,A,u2,1",
            "Red Hat,red hat wool,1,B,u3,1",
        ],
    );
    let snapshot = Snapshot::load(&path).unwrap();

    let results = snapshot.index().top_similar(ItemId::new(0), 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, ItemId::new(1));
    assert_eq!(results[1].id, ItemId::new(2));
}

#[test]
fn test_properties_hold_for_every_item() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "catalog.csv", &beauty_rows());
    let catalog = Catalog::load(&path).unwrap();
    let index = build_index(&catalog);
    let degenerate = catalog.find_by_name("Mystery Box").unwrap().id;

    for n in [0, 1, 3, 6, 50] {
        for item in catalog.items() {
            let results = index.top_similar(item.id, n).unwrap();

            assert!(results.len() <= n.min(catalog.len() - 1));
            assert!(results.iter().all(|r| r.id != item.id));
            assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
            for r in &results {
                if r.id == degenerate || item.id == degenerate {
                    assert!(r.score.abs() < f64::EPSILON);
                }
            }
            for pair in results.windows(2) {
                assert!(pair[0].score >= pair[1].score);
                if pair[0].score.total_cmp(&pair[1].score).is_eq() {
                    assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }
}

#[test]
fn test_determinism_and_idempotent_build() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "catalog.csv", &beauty_rows());
    let catalog = Catalog::load(&path).unwrap();

    let first = build_index(&catalog);
    let second = build_index(&catalog);

    for item in catalog.items() {
        let a = first.top_similar(item.id, 5).unwrap();
        assert_eq!(a, first.top_similar(item.id, 5).unwrap());
        assert_eq!(a, second.top_similar(item.id, 5).unwrap());
    }
}

#[test]
fn test_unknown_name_has_no_partial_output() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "catalog.csv", &beauty_rows());
    let snapshot = Snapshot::load(&path).unwrap();

    let err = snapshot.recommend("Nonexistent Item", 5).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_single_item_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "one.csv", &["Solo,red shoe,1,A,u,1"]);
    let snapshot = Snapshot::load(&path).unwrap();

    assert!(snapshot.recommend("Solo", 10).unwrap().is_empty());
}

#[test]
fn test_missing_column_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "Name,Tags\nA,b\n").unwrap();

    let err = Snapshot::load(&path).unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("ReviewCount"));
}

#[test]
fn test_missing_file_fails_load() {
    let dir = TempDir::new().unwrap();
    assert!(Recommender::load(dir.path().join("absent.csv")).is_err());
}

#[test]
fn test_reload_swaps_and_failed_reload_keeps_previous() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "catalog.csv", &beauty_rows());
    let recommender = Recommender::load(&path).unwrap();
    assert_eq!(recommender.snapshot().catalog().len(), 7);

    write_catalog(
        dir.path(),
        "catalog.csv",
        &["Wool Hat,wool hat,1,A,u,1", "Wool Scarf,wool scarf,1,A,u,1"],
    );
    let reloaded = recommender.reload().unwrap();
    assert_eq!(reloaded.catalog().len(), 2);
    assert_eq!(recommender.recommend("Wool Hat", 5).unwrap()[0].name, "Wool Scarf");

    std::fs::write(&path, "Name\nbroken\n").unwrap();
    assert!(recommender.reload().is_err());
    assert_eq!(recommender.snapshot().catalog().len(), 2);
    assert!(recommender.recommend("Wool Hat", 5).is_ok());
}

#[test]
fn test_concurrent_readers_during_reload() {
    let dir = TempDir::new().unwrap();
    let first = write_catalog(dir.path(), "first.csv", &beauty_rows());
    let second = write_catalog(
        dir.path(),
        "second.csv",
        &[
            "Hair Shampoo,shampoo hair,1,A,u,1",
            "Hair Mask,hair mask,1,A,u,1",
        ],
    );
    let recommender = Arc::new(Recommender::load(&first).unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let recommender = Arc::clone(&recommender);
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = recommender.snapshot();
                    // Whichever snapshot a reader sees, it is complete.
                    assert_eq!(snapshot.index().len(), snapshot.catalog().len());
                    let recs = snapshot.recommend("Hair Shampoo", 3).unwrap();
                    assert!(!recs.is_empty());
                    assert!(recs.iter().all(|r| r.name != "Hair Shampoo"));
                }
            })
        })
        .collect();

    recommender.reload_from(&second).unwrap();

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(recommender.snapshot().catalog().len(), 2);
}
