//! Batch Search Tests for sheetscout
//!
//! 実ファイルを含むフォルダーに対する一括検索と、タイムアウト・キャンセル時の通知を検証する。

use rust_xlsxwriter::*;
use sheetscout::{
    list_files, CancellationToken, FileOutcome, FileSearcher, KeywordSet, MatchMode,
    ScannerBuilder, SearchCoordinator, SearchEvent, SheetScoutError,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn write_sheet(dir: &Path, name: &str, cells: &[&str]) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (row, text) in cells.iter().enumerate() {
        worksheet.write_string(row as u32, 0, *text).unwrap();
    }
    let path = dir.join(name);
    workbook.save(&path).unwrap();
    path
}

/// 5ファイル（xlsx 3、csv 1、txt 1）とロックファイル1つを持つフォルダー
fn sample_folder() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), "a_quote.xlsx", &["Product :", "Total", "E. & O.E.", "GST"]);
    write_sheet(dir.path(), "b_invoice.xlsx", &["Invoice", "GST 9%"]);
    write_sheet(dir.path(), "c_empty.xlsx", &[]);
    fs::write(dir.path().join("d_items.csv"), "Item,Qty\nScale,2\nTotal,2\n").unwrap();
    fs::write(dir.path().join("e_notes.txt"), "nothing to see here").unwrap();
    fs::write(dir.path().join("~$a_quote.xlsx"), "lock").unwrap();
    dir
}

fn collect_events(scanner: &sheetscout::Scanner, folder: &Path) -> Vec<SearchEvent> {
    let mut events = Vec::new();
    scanner
        .search_folder(folder, |event| events.push(event))
        .unwrap();
    events
}

fn matches_by_file(events: &[SearchEvent]) -> HashMap<String, String> {
    events
        .iter()
        .filter_map(|event| match event {
            SearchEvent::MatchFound {
                file_name,
                matched_text,
                ..
            } => Some((file_name.clone(), matched_text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_list_files_skips_lock_files() {
    let dir = sample_folder();
    let files = list_files(dir.path()).unwrap();
    assert_eq!(files.len(), 5);
    assert!(files[0].ends_with("a_quote.xlsx"));
}

#[test]
fn test_search_folder_substring() {
    let dir = sample_folder();
    let scanner = ScannerBuilder::new()
        .with_keywords(KeywordSet::parse("total;gst"))
        .with_match_mode(MatchMode::Substring)
        .build()
        .unwrap();

    let events = collect_events(&scanner, dir.path());

    let processed = events
        .iter()
        .filter(|event| matches!(event, SearchEvent::FileProcessed { .. }))
        .count();
    assert_eq!(processed, 5);

    let matches = matches_by_file(&events);
    assert_eq!(matches.len(), 3);
    // 境界マーカーより後の"GST"は対象外
    assert_eq!(matches["a_quote.xlsx"], "Total");
    assert_eq!(matches["b_invoice.xlsx"], "GST 9%");
    // テキストファイルではキーワード自体を記録する
    assert_eq!(matches["d_items.csv"], "total");

    assert_eq!(
        events.iter().rev().nth(1),
        Some(&SearchEvent::Progress { current: 5, total: 5 })
    );
    assert_eq!(events.last(), Some(&SearchEvent::BatchFinished));
}

#[test]
fn test_search_folder_exact() {
    let dir = sample_folder();
    let scanner = ScannerBuilder::new()
        .with_keywords(KeywordSet::parse("gst;scale"))
        .with_match_mode(MatchMode::ExactToken)
        .build()
        .unwrap();

    let matches = matches_by_file(&collect_events(&scanner, dir.path()));
    // "GST 9%"はセル全体としては一致しない
    assert!(!matches.contains_key("b_invoice.xlsx"));
    assert_eq!(matches["d_items.csv"], "Scale");
}

/// "slow"で始まるファイルだけ、キャンセルされるまで待ち続ける検索器
struct SlowSearcher;

impl FileSearcher for SlowSearcher {
    fn search(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SheetScoutError> {
        let name = path.file_name().unwrap().to_string_lossy();
        if name.starts_with("slow") {
            while !cancel.is_cancelled() {
                thread::sleep(Duration::from_millis(10));
            }
            return Err(SheetScoutError::Cancelled);
        }
        Ok(vec![name.to_string()])
    }
}

#[test]
fn test_timeout_does_not_block_batch() {
    let files: Vec<PathBuf> = ["one.xlsx", "slow.xlsx", "two.xlsx", "three.csv", "four.txt"]
        .iter()
        .map(PathBuf::from)
        .collect();
    let coordinator = SearchCoordinator::new(Arc::new(SlowSearcher))
        .with_workers(4)
        .with_file_timeout(Duration::from_millis(300));

    let mut events = Vec::new();
    coordinator.run(&files, |event| events.push(event)).unwrap();
    coordinator.token().cancel();

    let outcomes: Vec<(String, FileOutcome)> = events
        .iter()
        .filter_map(|event| match event {
            SearchEvent::FileProcessed {
                file_name, outcome, ..
            } => Some((file_name.clone(), outcome.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes[1], ("slow.xlsx".to_string(), FileOutcome::TimedOut));
    assert_eq!(
        outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == FileOutcome::Completed)
            .count(),
        4
    );

    let finished = events
        .iter()
        .filter(|event| matches!(event, SearchEvent::BatchFinished))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn test_spawned_search_reports_every_file() {
    let dir = sample_folder();
    let scanner = ScannerBuilder::new()
        .with_keywords(KeywordSet::parse("total"))
        .with_workers(2)
        .build()
        .unwrap();

    let handle = scanner.spawn_search(list_files(dir.path()).unwrap()).unwrap();
    let events: Vec<SearchEvent> = handle.events().iter().collect();
    handle.join().unwrap();

    let processed = events
        .iter()
        .filter(|event| matches!(event, SearchEvent::FileProcessed { .. }))
        .count();
    assert_eq!(processed, 5);
    assert_eq!(events.last(), Some(&SearchEvent::BatchFinished));
}

#[test]
fn test_cancelled_search_still_finishes() {
    let files: Vec<PathBuf> = (0..8).map(|i| PathBuf::from(format!("slow{}.xlsx", i))).collect();
    let coordinator = SearchCoordinator::new(Arc::new(SlowSearcher)).with_workers(2);

    let handle = coordinator.spawn(files);
    thread::sleep(Duration::from_millis(50));
    handle.cancel();

    let events: Vec<SearchEvent> = handle.events().iter().collect();
    handle.join().unwrap();

    let abandoned = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                SearchEvent::FileProcessed {
                    outcome: FileOutcome::Abandoned,
                    ..
                }
            )
        })
        .count();
    assert_eq!(abandoned, 8);
    assert!(!events
        .iter()
        .any(|event| matches!(event, SearchEvent::MatchFound { .. })));
    assert_eq!(events.last(), Some(&SearchEvent::BatchFinished));
}
