//! File Searcher
//!
//! 1ファイル分の検索処理。スプレッドシートは境界付きスキャナーで、
//! テキストファイルは先頭部分の全文照合で検索します。

use std::path::Path;

use regex::RegexBuilder;

use crate::api::{FileKind, MatchMode};
use crate::boundary::{find_end_row_with_cancel, BoundaryConfig};
use crate::error::SheetScoutError;
use crate::keywords::KeywordSet;
use crate::parser::{self, read_text_prefix, SEARCH_PREFIX_BYTES};
use crate::scanner::scan_with_cancel;
use crate::search::CancellationToken;
use crate::types::ScanRange;

/// 1ファイルあたりに記録する一致文字列の最大数
pub const MAX_FRAGMENTS: usize = 10;

/// 1ファイルを検索するトレイト
///
/// コーディネーターはワーカースレッドからこのトレイトを呼び出します。
/// 実装はキャンセル要求を定期的に確認し、要求されたら
/// `SheetScoutError::Cancelled`を返すことが期待されます。
pub trait FileSearcher: Send + Sync {
    /// ファイルを検索し、一致した文字列（重複なし、最大`MAX_FRAGMENTS`件）を返す
    fn search(&self, path: &Path, cancel: &CancellationToken)
        -> Result<Vec<String>, SheetScoutError>;
}

/// キーワードによるファイル検索
#[derive(Debug, Clone)]
pub struct KeywordFileSearcher {
    keywords: KeywordSet,
    mode: MatchMode,
    boundary: BoundaryConfig,
    column_count: usize,
}

impl KeywordFileSearcher {
    /// 新しい検索器を生成
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidInput`: キーワード集合が空の場合
    /// * `SheetScoutError::InvalidCellReference`: 終端列の列文字が不正な場合
    pub fn new(
        keywords: KeywordSet,
        mode: MatchMode,
        boundary: BoundaryConfig,
    ) -> Result<Self, SheetScoutError> {
        keywords.require_non_empty()?;
        let column_count = boundary.column_count()?;
        Ok(Self {
            keywords,
            mode,
            boundary,
            column_count,
        })
    }

    fn search_spreadsheet(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SheetScoutError> {
        let row_cap = self.boundary.row_cap;
        let sheet = parser::load_sheet(path, Some(row_cap))?;
        let end_row = find_end_row_with_cancel(&sheet, &self.boundary.markers, row_cap, cancel)?;
        let columns = self.column_count.min(sheet.column_count());
        if end_row == 0 || columns == 0 {
            return Ok(Vec::new());
        }

        let range = ScanRange::from_bounds(0, columns as u32 - 1, 0, end_row as u32 - 1);
        let result = scan_with_cancel(&sheet, &self.keywords, &range, self.mode, cancel)?;
        Ok(result
            .matched_texts()
            .into_iter()
            .take(MAX_FRAGMENTS)
            .map(str::to_string)
            .collect())
    }

    fn search_text(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SheetScoutError> {
        let content = read_text_prefix(path, SEARCH_PREFIX_BYTES)?;
        if cancel.is_cancelled() {
            return Err(SheetScoutError::Cancelled);
        }
        match self.mode {
            MatchMode::Substring => Ok(self.substring_fragments(&content)),
            MatchMode::ExactToken => self.word_fragments(&content),
        }
    }

    /// 部分一致: 含まれているキーワード自体を記録する
    fn substring_fragments(&self, content: &str) -> Vec<String> {
        let folded = content.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| folded.contains(&keyword.to_lowercase()))
            .take(MAX_FRAGMENTS)
            .map(str::to_string)
            .collect()
    }

    /// 完全一致: 単語境界で区切られた出現を、ファイル中の表記のまま記録する
    fn word_fragments(&self, content: &str) -> Result<Vec<String>, SheetScoutError> {
        let mut fragments: Vec<String> = Vec::new();
        for keyword in self.keywords.iter() {
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
                .case_insensitive(true)
                .build()
                .map_err(|e| SheetScoutError::InvalidInput(e.to_string()))?;

            for found in pattern.find_iter(content) {
                if fragments.len() >= MAX_FRAGMENTS {
                    return Ok(fragments);
                }
                if !fragments.iter().any(|f| f == found.as_str()) {
                    fragments.push(found.as_str().to_string());
                }
            }
        }
        Ok(fragments)
    }
}

impl FileSearcher for KeywordFileSearcher {
    fn search(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SheetScoutError> {
        match parser::file_kind(path)? {
            FileKind::Spreadsheet => self.search_spreadsheet(path, cancel),
            FileKind::Delimited | FileKind::PlainText => self.search_text(path, cancel),
        }
    }
}
