//! Parser Module
//!
//! 入力ファイルをシート（行 × 列のセル値）として読み込むモジュール。
//! スプレッドシートはcalamine、区切りテキストはcsvクレートで解析します。

mod text;
mod workbook;

use std::path::Path;

use crate::api::FileKind;
use crate::error::SheetScoutError;
use crate::security::SecurityConfig;
use crate::types::Sheet;

pub(crate) use text::{parse_delimited, read_text_chars, read_text_prefix};
pub(crate) use workbook::WorkbookParser;

/// 一括検索でテキストファイルを読み込む最大バイト数（1MB）
pub const SEARCH_PREFIX_BYTES: usize = 1024 * 1024;

/// 抽出・プレビューでテキストファイルから読み込む最大文字数
pub const TEXT_PREFIX_CHARS: usize = 5000;

/// ファイルをシートとして読み込む
///
/// ファイルの種類は拡張子で判定します。
///
/// * スプレッドシート: 最初のワークシート
/// * 区切りテキスト: 各レコードが1行
/// * プレーンテキスト: 各行が1セルだけの行
///
/// # 引数
///
/// * `path` - 入力ファイル
/// * `max_rows` - 読み込む最大行数（`None`の場合は全行）
///
/// # エラー
///
/// * `SheetScoutError::InvalidInput`: ファイルが存在しない、またはサポート外の拡張子
/// * `SheetScoutError::FileAccess`: 読み込みに失敗した場合
/// * `SheetScoutError::Parse` / `SheetScoutError::Csv`: 解析に失敗した場合
/// * `SheetScoutError::SecurityViolation`: サイズ制限を超えた場合
pub fn load_sheet(path: &Path, max_rows: Option<usize>) -> Result<Sheet, SheetScoutError> {
    match file_kind(path)? {
        FileKind::Spreadsheet => WorkbookParser::open(path)?.first_sheet(max_rows),
        FileKind::Delimited => {
            let content = String::from_utf8_lossy(&read_file(path)?).into_owned();
            parse_delimited(&content, max_rows)
        }
        FileKind::PlainText => {
            let content = String::from_utf8_lossy(&read_file(path)?).into_owned();
            let lines = content.lines().take(max_rows.unwrap_or(usize::MAX));
            Ok(Sheet::from_rows(lines.map(|line| [line])))
        }
    }
}

/// ファイルの種類を判定（サポート外はエラー）
pub(crate) fn file_kind(path: &Path) -> Result<FileKind, SheetScoutError> {
    FileKind::from_path(path).ok_or_else(|| {
        SheetScoutError::InvalidInput(format!("unsupported file type: {}", path.display()))
    })
}

/// ファイル全体を読み込む（存在確認とサイズ制限を適用）
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, SheetScoutError> {
    ensure_file_exists(path)?;
    let size = std::fs::metadata(path)?.len();
    SecurityConfig::default().check_file_size(size)?;
    Ok(std::fs::read(path)?)
}

pub(crate) fn ensure_file_exists(path: &Path) -> Result<(), SheetScoutError> {
    if !path.is_file() {
        return Err(SheetScoutError::InvalidInput(format!(
            "file not found: {}",
            path.display()
        )));
    }
    Ok(())
}
