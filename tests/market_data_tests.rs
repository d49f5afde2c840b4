//! Snapshot persistence: directory layout, cache keying and staleness.

use chrono::{Duration, TimeZone, Utc};
use filter_spirit::lang::market::{
    load_from_cache, save_to_cache, CacheIndex, DataSource, ElementaryItem, Gem, ItemPriceReport,
    CACHE_INDEX_FILENAME, DATA_FILENAME, METADATA_FILENAME,
};

fn sample_report() -> ItemPriceReport {
    let mut report = ItemPriceReport::default();
    report.metadata.league_name = "Hardcore Ritual".to_string();
    report.metadata.data_source = DataSource::Ninja;
    report.metadata.download_date = Utc.with_ymd_and_hms(2021, 1, 20, 12, 0, 0).unwrap();
    report.data.currency.push(ElementaryItem::new("Chaos Orb", 1.0));
    report.data.gems.push(Gem {
        item: ElementaryItem::new("Empower Support", 150.0),
        level: 4,
        quality: 0,
        is_corrupted: true,
    });
    report
}

#[test]
fn snapshot_directory_holds_metadata_and_data() {
    let root = tempfile::tempdir().unwrap();
    let directory = save_to_cache(&sample_report(), root.path()).unwrap();

    assert!(directory.join(METADATA_FILENAME).exists());
    assert!(directory.join(DATA_FILENAME).exists());
    assert!(root.path().join(CACHE_INDEX_FILENAME).exists());
}

#[test]
fn cache_directory_is_keyed_by_source_and_normalized_league() {
    let root = tempfile::tempdir().unwrap();
    let directory = save_to_cache(&sample_report(), root.path()).unwrap();
    let name = directory.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, "ninja_hardcore_ritual");
}

#[test]
fn loaded_snapshot_equals_saved_snapshot() {
    let root = tempfile::tempdir().unwrap();
    let report = sample_report();
    save_to_cache(&report, root.path()).unwrap();

    let loaded = load_from_cache(root.path(), DataSource::Ninja, "Hardcore Ritual").unwrap();
    assert_eq!(loaded, report);
    assert_eq!(loaded.data.gems[0].level, 4);
    assert!(loaded.data.gems[0].is_corrupted);
}

#[test]
fn index_tracks_every_cached_snapshot() {
    let root = tempfile::tempdir().unwrap();
    save_to_cache(&sample_report(), root.path()).unwrap();

    let mut other = sample_report();
    other.metadata.league_name = "Standard".to_string();
    other.metadata.data_source = DataSource::Watch;
    save_to_cache(&other, root.path()).unwrap();

    let index = CacheIndex::load(root.path()).unwrap();
    assert_eq!(index.snapshots.len(), 2);
    assert!(index
        .snapshots
        .iter()
        .all(|entry| entry.program_version == filter_spirit::VERSION));
}

#[test]
fn snapshot_age_is_measured_in_hours() {
    let report = sample_report();
    let now = report.metadata.download_date + Duration::hours(30);
    assert_eq!(report.metadata.age_hours(now), 30);
    assert_eq!(report.metadata.age_hours(report.metadata.download_date), 0);
}

#[test]
fn missing_snapshot_is_an_error_not_a_panic() {
    let root = tempfile::tempdir().unwrap();
    let result = load_from_cache(root.path(), DataSource::Ninja, "Nonexistent");
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("snapshot"));
}
