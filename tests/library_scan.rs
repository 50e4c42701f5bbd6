//! End-to-end scans over temporary library folders.

use ayumi::library::{LibraryScanner, METADATA_FILENAME};
use ayumi::scan_library;
use chrono::{Local, TimeZone};
use std::path::Path;
use tempfile::TempDir;

fn write_series(root: &Path, folder: &str, content: &str) {
    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(METADATA_FILENAME), content).unwrap();
}

#[test]
fn missing_library_scans_empty() {
    let dir = TempDir::new().unwrap();
    assert!(scan_library(dir.path().join("Manga")).is_empty());
}

#[test]
fn counts_owned_and_missing_volumes() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "Sexy Cosplay Doll",
        r#"{
            "titles": { "main": "My Dress-Up Darling" },
            "volumes": {
                "a": { "number": 1, "status": "OUT" },
                "b": { "number": 2, "status": "OUT" }
            },
            "collection": { "owned": [1] }
        }"#,
    );

    let series = scan_library(dir.path());
    assert_eq!(series.len(), 1);
    let s = &series[0];
    assert_eq!(s.title, "My Dress-Up Darling");
    assert_eq!(s.out_count, 2);
    assert_eq!(s.owned_count, 1);
    assert_eq!(s.missing_count, 1);
    assert_eq!(s.progress_label, "1/2");
}

#[test]
fn day_first_release_date_normalized() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "Rising Shield",
        r#"{ "soonOut": { "title": "Tome 25", "date": "15/03/2026" } }"#,
    );

    let series = scan_library(dir.path());
    let soon = series[0].soon_out.as_ref().unwrap();
    assert_eq!(soon.date_raw, "15/03/2026");
    assert_eq!(soon.date_iso.as_deref(), Some("2026-03-15"));
    assert_eq!(
        soon.ts,
        Local.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).earliest()
    );
}

#[test]
fn unparseable_release_date_kept_raw() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "Demon Slave",
        r#"{ "soonOut": { "title": "Tome 9", "date": "not-a-date" } }"#,
    );

    let series = scan_library(dir.path());
    let soon = series[0].soon_out.as_ref().unwrap();
    assert_eq!(soon.date_raw, "not-a-date");
    assert!(soon.date_iso.is_none());
    assert!(soon.ts.is_none());
}

#[test]
fn invalid_json_excluded_without_error() {
    let dir = TempDir::new().unwrap();
    write_series(dir.path(), "Broken", "{\"titles\": {\"main\": ");
    write_series(dir.path(), "Noble Adventure", "{}");

    let report = LibraryScanner::new(dir.path()).scan();
    let titles: Vec<&str> = report.series.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Noble Adventure"]);
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn dated_series_sorts_first() {
    let dir = TempDir::new().unwrap();
    // "A" enumerates first but has no upcoming release
    write_series(dir.path(), "A Chilling", r#"{ "titles": { "main": "Chilling" } }"#);
    write_series(
        dir.path(),
        "B Dungeon",
        r#"{ "titles": { "main": "Dungeon" }, "soonOut": { "title": "Vol. 4", "date": "2026-09-01" } }"#,
    );

    let titles: Vec<String> = scan_library(dir.path())
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Dungeon", "Chilling"]);
}

#[test]
fn missing_count_never_negative_on_odd_input() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "Odd",
        r#"{
            "volumes": {
                "x": { "number": 1, "status": "OUT" },
                "y": { "number": 1.0, "status": "OUT" },
                "z": { "number": 5, "status": "ANNOUNCED" }
            },
            "collection": { "owned": [1, "1", 1, 5, 7] }
        }"#,
    );

    let s = &scan_library(dir.path())[0];
    assert_eq!(s.out_count, 1);
    assert_eq!(s.owned_count, 1);
    assert_eq!(s.missing_count, 0);
    assert_eq!(s.missing_count, s.out_count.saturating_sub(s.owned_count));
}

#[test]
fn extra_fields_ignored() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "Kuma",
        r#"{
            "link": "https://www.nautiljon.com/mangas/kuma.html",
            "id": "6c8e",
            "version": 3,
            "titles": { "main": "Kuma Kuma Kuma Bear", "alt": "KKKB" },
            "lastOut": { "title": "Tome 18", "date": "01/01/2026" },
            "collection": { "owned": [], "wishlist": [19] },
            "lastScrapedAt": "2026-02-01T08:00:00Z"
        }"#,
    );

    let s = &scan_library(dir.path())[0];
    assert_eq!(s.title, "Kuma Kuma Kuma Bear");
    assert!(s.soon_out.is_none());
    assert_eq!(s.last_scraped_at.as_deref(), Some("2026-02-01T08:00:00Z"));
}

#[test]
fn malformed_fields_keep_the_series() {
    let dir = TempDir::new().unwrap();
    write_series(
        dir.path(),
        "A Null Titles",
        r#"{ "titles": null, "volumes": { "v1": { "number": 1, "status": "OUT" } } }"#,
    );
    write_series(
        dir.path(),
        "B Numeric Status",
        r#"{
            "titles": { "main": "Numeric Status" },
            "volumes": {
                "v1": { "number": 1, "status": 3 },
                "v2": { "number": 2, "status": "OUT" }
            }
        }"#,
    );
    write_series(
        dir.path(),
        "C Null Volume",
        r#"{
            "titles": { "main": "Null Volume" },
            "volumes": { "v1": null, "v2": { "number": 2, "status": "OUT" } },
            "collection": { "owned": [2] }
        }"#,
    );
    write_series(
        dir.path(),
        "D Null Date",
        r#"{ "titles": { "main": "Null Date" }, "soonOut": { "title": "Tome 4", "date": null } }"#,
    );
    write_series(
        dir.path(),
        "E Null Collection",
        r#"{
            "titles": { "main": "Null Collection" },
            "volumes": { "v1": { "number": 1, "status": "OUT" } },
            "collection": null
        }"#,
    );

    let report = LibraryScanner::new(dir.path()).scan();
    assert!(report.skipped.is_empty());
    assert_eq!(report.series.len(), 5);

    let by_title = |title: &str| {
        report
            .series
            .iter()
            .find(|s| s.title == title)
            .unwrap_or_else(|| panic!("{title} missing from scan"))
    };

    // Falls back to the folder name
    let null_titles = by_title("A Null Titles");
    assert_eq!(null_titles.out_count, 1);
    assert_eq!(null_titles.missing_count, 1);

    let numeric_status = by_title("Numeric Status");
    assert_eq!(numeric_status.out_count, 1);
    assert_eq!(numeric_status.progress_label, "0/1");

    let null_volume = by_title("Null Volume");
    assert_eq!(null_volume.out_count, 1);
    assert_eq!(null_volume.owned_count, 1);
    assert_eq!(null_volume.missing_count, 0);

    let null_date = by_title("Null Date");
    let soon = null_date.soon_out.as_ref().unwrap();
    assert_eq!(soon.title, "Tome 4");
    assert_eq!(soon.date_raw, "");
    assert!(soon.date_iso.is_none());
    assert!(soon.ts.is_none());

    let null_collection = by_title("Null Collection");
    assert_eq!(null_collection.owned_count, 0);
    assert_eq!(null_collection.missing_count, 1);
}

#[cfg(unix)]
#[test]
fn symlinked_series_folder_is_scanned() {
    let library = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    write_series(
        elsewhere.path(),
        "Frieren",
        r#"{ "titles": { "main": "Frieren" } }"#,
    );
    std::os::unix::fs::symlink(
        elsewhere.path().join("Frieren"),
        library.path().join("Frieren"),
    )
    .unwrap();

    let series = scan_library(library.path());
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].title, "Frieren");
    assert_eq!(series[0].folder_path, library.path().join("Frieren"));
}
