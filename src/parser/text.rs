//! Text Parser
//!
//! 区切りテキスト（CSV）とプレーンテキストの読み込み。
//! 不正なUTF-8は置換文字に変換して読み込みます。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::SheetScoutError;
use crate::types::{CellValue, Sheet};

/// CSV文字列をシートとして解析する
///
/// ヘッダー行は扱わず、すべてのレコードをデータ行として読み込みます。
/// レコードごとのフィールド数は異なってもかまいません。
pub(crate) fn parse_delimited(
    content: &str,
    max_rows: Option<usize>,
) -> Result<Sheet, SheetScoutError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let limit = max_rows.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    for record in reader.records().take(limit) {
        let record = record?;
        rows.push(record.iter().map(CellValue::from).collect());
    }

    Ok(Sheet::new(rows))
}

/// ファイル先頭の最大`max_bytes`バイトを文字列として読み込む
pub(crate) fn read_text_prefix(path: &Path, max_bytes: usize) -> Result<String, SheetScoutError> {
    super::ensure_file_exists(path)?;
    let mut buffer = Vec::new();
    File::open(path)?
        .take(max_bytes as u64)
        .read_to_end(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// ファイル先頭の最大`max_chars`文字を読み込む
///
/// 戻り値の2番目は、文字数の上限で切り詰めたかどうかです。
pub(crate) fn read_text_chars(
    path: &Path,
    max_chars: usize,
) -> Result<(String, bool), SheetScoutError> {
    // UTF-8の1文字は最大4バイト。1バイト余分に読んで切り詰めを検出する
    let text = read_text_prefix(path, max_chars.saturating_mul(4).saturating_add(1))?;
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => Ok((text[..cut].to_string(), true)),
        None => Ok((text, false)),
    }
}
