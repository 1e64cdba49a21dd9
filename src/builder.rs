//! Builder Module
//!
//! Fluent Builder APIを提供し、`Scanner`インスタンスを段階的に構築する。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{FileKind, MatchMode};
use crate::boundary::{find_end_row, BoundaryConfig};
use crate::config::SearchSettings;
use crate::discovery::list_files;
use crate::error::SheetScoutError;
use crate::extractor::{
    extract, extract_delimited, DocumentContent, ExtractedDocument, FileInfo, StructuredContent,
};
use crate::keywords::KeywordSet;
use crate::output::{PreviewFormatter, PREVIEW_MAX_ROWS};
use crate::parser::{self, read_text_chars, TEXT_PREFIX_CHARS};
use crate::scanner::{scan, MatchResult};
use crate::search::{
    KeywordFileSearcher, SearchCoordinator, SearchEvent, SearchHandle, DEFAULT_FILE_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};
use crate::types::{ScanRange, Sheet};

/// スキャン処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ScannerConfig {
    /// 検索キーワード
    pub keywords: KeywordSet,

    /// 照合方式
    pub match_mode: MatchMode,

    /// 走査範囲（Option: Noneの場合は境界設定から求めた範囲）
    pub range: Option<ScanRange>,

    /// 境界設定
    pub boundary: BoundaryConfig,

    /// 一括検索のワーカー数
    pub workers: usize,

    /// 一括検索のファイルごとのタイムアウト
    pub file_timeout: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::default(),
            match_mode: MatchMode::default(),
            range: None,
            boundary: BoundaryConfig::default(),
            workers: DEFAULT_WORKERS,
            file_timeout: Duration::from_secs(DEFAULT_FILE_TIMEOUT_SECS),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Scanner`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use sheetscout::{KeywordSet, MatchMode, ScannerBuilder};
///
/// # fn main() -> Result<(), sheetscout::SheetScoutError> {
/// let scanner = ScannerBuilder::new()
///     .with_keywords(KeywordSet::parse("Total;GST"))
///     .with_match_mode(MatchMode::ExactToken)
///     .with_end_column("H")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScannerBuilder {
    /// 内部設定（構築中）
    config: ScannerConfig,
}

impl ScannerBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - キーワード: なし（スキャン・検索の前に設定が必要）
    /// - 照合方式: 部分一致
    /// - 走査範囲: 境界設定から求める
    /// - 境界マーカー: `E. & O.E.`, `SUB-TOTAL`
    /// - 終端列: `N`
    /// - 最大行数: 1000
    /// - ワーカー数: 4
    /// - ファイルごとのタイムアウト: 30秒
    pub fn new() -> Self {
        Self::default()
    }

    /// 検索キーワードを指定する
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.config.keywords = keywords;
        self
    }

    /// 照合方式を指定する
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.config.match_mode = mode;
        self
    }

    /// 走査範囲を明示的に指定する
    ///
    /// 指定した場合、シート単位のスキャンは境界検出を行わずにこの範囲を走査します。
    ///
    /// # 制約
    ///
    /// * 開始が終了を超える場合、`build()`時に`SheetScoutError::Config`を返す
    pub fn with_range(mut self, range: ScanRange) -> Self {
        self.config.range = Some(range);
        self
    }

    /// 境界マーカーを指定する（空の集合で境界検出を無効化）
    pub fn with_boundary_markers(mut self, markers: KeywordSet) -> Self {
        self.config.boundary.markers = markers;
        self
    }

    /// 終端列の列文字を指定する（例: `"N"`なら列A〜N）
    pub fn with_end_column(mut self, letters: &str) -> Self {
        self.config.boundary.end_column = letters.trim().to_ascii_uppercase();
        self
    }

    /// 走査する最大行数を指定する
    pub fn with_row_cap(mut self, rows: usize) -> Self {
        self.config.boundary.row_cap = rows;
        self
    }

    /// 一括検索のワーカー数を指定する
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// 一括検索のファイルごとのタイムアウトを指定する
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.config.file_timeout = timeout;
        self
    }

    /// 永続化された設定（照合方式と境界設定）を適用する
    pub fn with_settings(mut self, settings: &SearchSettings) -> Self {
        self.config.match_mode = settings.match_mode();
        self.config.boundary = settings.boundary();
        self
    }

    /// 設定を検証し、`Scanner`インスタンスを生成する
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::Config(String)`: 設定の検証に失敗した場合
    ///   * 走査範囲の開始が終了を超えている
    ///   * 終端列が列文字でない
    ///   * 最大行数・ワーカー数が0
    ///   * タイムアウトが0
    pub fn build(self) -> Result<Scanner, SheetScoutError> {
        // 1. 走査範囲の検証
        if let Some(range) = &self.config.range {
            range
                .validate()
                .map_err(|e| SheetScoutError::Config(e.to_string()))?;
        }

        // 2. 境界設定の検証
        let column_count = self.config.boundary.column_count().map_err(|_| {
            SheetScoutError::Config(format!(
                "Invalid end column letters: '{}'",
                self.config.boundary.end_column
            ))
        })?;
        if self.config.boundary.row_cap == 0 {
            return Err(SheetScoutError::Config(
                "Row cap must be greater than 0".to_string(),
            ));
        }

        // 3. 一括検索の設定の検証
        if self.config.workers == 0 {
            return Err(SheetScoutError::Config(
                "Worker count must be greater than 0".to_string(),
            ));
        }
        if self.config.file_timeout.is_zero() {
            return Err(SheetScoutError::Config(
                "File timeout must be greater than 0".to_string(),
            ));
        }

        Ok(Scanner::new(self.config, column_count))
    }
}

/// スキャン処理のファサード
///
/// シート単位・ファイル単位のスキャンと抽出、プレビュー、複数ファイルの一括検索を提供します。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetscout::{KeywordSet, ScannerBuilder};
/// use std::path::Path;
///
/// # fn main() -> Result<(), sheetscout::SheetScoutError> {
/// let scanner = ScannerBuilder::new()
///     .with_keywords(KeywordSet::parse("Product :;Brand :"))
///     .build()?;
///
/// let result = scanner.scan_file(Path::new("quote.xlsx"))?;
/// for (address, matches) in result.iter() {
///     println!("{}: {:?}", address, matches);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    /// スキャン設定
    config: ScannerConfig,

    /// 終端列までの列数
    column_count: usize,
}

impl Scanner {
    pub(crate) fn new(config: ScannerConfig, column_count: usize) -> Self {
        Self {
            config,
            column_count,
        }
    }

    /// 検索キーワード
    pub fn keywords(&self) -> &KeywordSet {
        &self.config.keywords
    }

    /// 照合方式
    pub fn match_mode(&self) -> MatchMode {
        self.config.match_mode
    }

    /// 境界設定
    pub fn boundary(&self) -> &BoundaryConfig {
        &self.config.boundary
    }

    /// シートをスキャンする
    ///
    /// 走査範囲が指定されていればその範囲を、なければ境界検出で求めた
    /// `[0, 終端行) × [A, 終端列]`を走査します。
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidInput`: キーワードが設定されていない場合
    pub fn scan_sheet(&self, sheet: &Sheet) -> Result<MatchResult, SheetScoutError> {
        self.config.keywords.require_non_empty()?;
        match self.scan_range(sheet) {
            Some(range) => scan(sheet, &self.config.keywords, &range, self.config.match_mode),
            None => Ok(MatchResult::default()),
        }
    }

    /// ファイルを読み込んでスキャンする
    ///
    /// 走査範囲が指定されていない場合、最大行数までしか読み込みません。
    pub fn scan_file(&self, path: &Path) -> Result<MatchResult, SheetScoutError> {
        self.config.keywords.require_non_empty()?;
        let max_rows = match self.config.range {
            Some(_) => None,
            None => Some(self.config.boundary.row_cap),
        };
        let sheet = parser::load_sheet(path, max_rows)?;
        tracing::debug!(
            "Scanning {} ({} rows)",
            path.display(),
            sheet.row_count()
        );
        self.scan_sheet(&sheet)
    }

    /// シートから構造化セクションを抽出する
    pub fn extract_sheet(&self, sheet: &Sheet) -> Result<StructuredContent, SheetScoutError> {
        let boundary = &self.config.boundary;
        extract(sheet, &boundary.markers, &boundary.end_column, boundary.row_cap)
    }

    /// ファイルから文書を抽出する
    ///
    /// * スプレッドシート: ヘッダー・表・集計・生データの4セクション
    /// * 区切りテキスト: 見出し行と、行数上限までのデータ行
    /// * プレーンテキスト: 先頭5000文字
    ///
    /// 抽出日時はこの呼び出しの時刻になります。
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedDocument, SheetScoutError> {
        let content = match parser::file_kind(path)? {
            FileKind::Spreadsheet => {
                let sheet = parser::load_sheet(path, Some(self.config.boundary.row_cap))?;
                DocumentContent::Structured(self.extract_sheet(&sheet)?)
            }
            FileKind::Delimited => {
                // 見出し行 + 行数上限までのデータ行
                let max_rows = self.config.boundary.row_cap.saturating_add(1);
                extract_delimited(&parser::load_sheet(path, Some(max_rows))?)
            }
            FileKind::PlainText => {
                let (raw_text, _) = read_text_chars(path, TEXT_PREFIX_CHARS)?;
                DocumentContent::PlainText { raw_text }
            }
        };
        tracing::debug!("Extracted {}", path.display());
        Ok(ExtractedDocument::new(FileInfo::for_path(path), content))
    }

    /// ファイルのプレビューを生成する
    ///
    /// スプレッドシートは先頭50行を表として、テキストファイルは先頭5000文字をそのまま表示します。
    pub fn preview_file(&self, path: &Path) -> Result<String, SheetScoutError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match parser::file_kind(path)? {
            FileKind::Spreadsheet => {
                let sheet = parser::load_sheet(path, Some(PREVIEW_MAX_ROWS))?;
                Ok(PreviewFormatter.render_sheet(&name, &sheet))
            }
            FileKind::Delimited | FileKind::PlainText => {
                let (text, _) = read_text_chars(path, TEXT_PREFIX_CHARS)?;
                Ok(PreviewFormatter.render_text(&name, &text))
            }
        }
    }

    /// 一括検索のコーディネーターを生成する
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidInput`: キーワードが設定されていない場合
    pub fn coordinator(&self) -> Result<SearchCoordinator, SheetScoutError> {
        let searcher = KeywordFileSearcher::new(
            self.config.keywords.clone(),
            self.config.match_mode,
            self.config.boundary.clone(),
        )?;
        Ok(SearchCoordinator::new(Arc::new(searcher))
            .with_workers(self.config.workers)
            .with_file_timeout(self.config.file_timeout))
    }

    /// 複数ファイルを呼び出し元のスレッドで一括検索する
    pub fn search<F>(&self, files: &[PathBuf], on_event: F) -> Result<(), SheetScoutError>
    where
        F: FnMut(SearchEvent),
    {
        self.coordinator()?.run(files, on_event)
    }

    /// フォルダー直下のサポート対象ファイルを一括検索する
    pub fn search_folder<F>(&self, folder: &Path, on_event: F) -> Result<(), SheetScoutError>
    where
        F: FnMut(SearchEvent),
    {
        let files = list_files(folder)?;
        self.search(&files, on_event)
    }

    /// 複数ファイルの一括検索を専用スレッドで開始する
    pub fn spawn_search(&self, files: Vec<PathBuf>) -> Result<SearchHandle, SheetScoutError> {
        Ok(self.coordinator()?.spawn(files))
    }

    /// シート単位のスキャンで走査する範囲（空の場合は`None`）
    fn scan_range(&self, sheet: &Sheet) -> Option<ScanRange> {
        if let Some(range) = self.config.range {
            return Some(range);
        }
        let boundary = &self.config.boundary;
        let end_row = find_end_row(sheet, &boundary.markers, boundary.row_cap);
        let columns = self.column_count.min(sheet.column_count());
        if end_row == 0 || columns == 0 {
            return None;
        }
        Some(ScanRange::from_bounds(
            0,
            columns as u32 - 1,
            0,
            end_row as u32 - 1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation() -> Sheet {
        Sheet::from_rows(vec![
            vec!["Product : Widget", ""],
            vec!["Brand :", "Acme"],
            vec!["Total", "150"],
            vec!["E. & O.E.", ""],
            vec!["Total after marker", ""],
        ])
    }

    #[test]
    fn test_builder_default() {
        let scanner = ScannerBuilder::new().build().unwrap();
        assert!(scanner.keywords().is_empty());
        assert_eq!(scanner.match_mode(), MatchMode::Substring);
        assert_eq!(scanner.boundary(), &BoundaryConfig::default());
    }

    #[test]
    fn test_builder_invalid_range() {
        let result = ScannerBuilder::new()
            .with_range(ScanRange::from_bounds(3, 1, 0, 0))
            .build();
        match result {
            Err(SheetScoutError::Config(msg)) => assert!(msg.contains("Invalid range")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_invalid_values() {
        assert!(matches!(
            ScannerBuilder::new().with_end_column("1").build(),
            Err(SheetScoutError::Config(_))
        ));
        assert!(matches!(
            ScannerBuilder::new().with_row_cap(0).build(),
            Err(SheetScoutError::Config(_))
        ));
        assert!(matches!(
            ScannerBuilder::new().with_workers(0).build(),
            Err(SheetScoutError::Config(_))
        ));
        assert!(matches!(
            ScannerBuilder::new().with_file_timeout(Duration::ZERO).build(),
            Err(SheetScoutError::Config(_))
        ));
    }

    #[test]
    fn test_with_settings() {
        let settings = SearchSettings {
            exact_match: true,
            row_end: "b".to_string(),
            max_rows: 10,
            ..SearchSettings::default()
        };
        let scanner = ScannerBuilder::new().with_settings(&settings).build().unwrap();
        assert_eq!(scanner.match_mode(), MatchMode::ExactToken);
        assert_eq!(scanner.boundary().end_column, "B");
        assert_eq!(scanner.boundary().row_cap, 10);
    }

    #[test]
    fn test_scan_sheet_stops_at_boundary() {
        let scanner = ScannerBuilder::new()
            .with_keywords(KeywordSet::parse("total"))
            .build()
            .unwrap();
        let result = scanner.scan_sheet(&quotation()).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.get_a1("A3").is_some());
    }

    #[test]
    fn test_scan_sheet_with_explicit_range() {
        let scanner = ScannerBuilder::new()
            .with_keywords(KeywordSet::parse("total"))
            .with_range(ScanRange::parse("A1", "A5").unwrap())
            .build()
            .unwrap();
        let result = scanner.scan_sheet(&quotation()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.get_a1("A5").is_some());
    }

    #[test]
    fn test_scan_sheet_requires_keywords() {
        let scanner = ScannerBuilder::new().build().unwrap();
        assert!(matches!(
            scanner.scan_sheet(&quotation()),
            Err(SheetScoutError::InvalidInput(_))
        ));
        assert!(matches!(
            scanner.coordinator(),
            Err(SheetScoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_scan_sheet_end_column() {
        let scanner = ScannerBuilder::new()
            .with_keywords(KeywordSet::parse("acme"))
            .with_end_column("A")
            .build()
            .unwrap();
        assert!(scanner.scan_sheet(&quotation()).unwrap().is_empty());
    }

    #[test]
    fn test_extract_sheet() {
        let scanner = ScannerBuilder::new().build().unwrap();
        let content = scanner.extract_sheet(&quotation()).unwrap();
        assert_eq!(content.header_info["Product"], "Widget");
        assert_eq!(content.raw_data.len(), 3);
    }
}
