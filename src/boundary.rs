//! Boundary Detection Module
//!
//! 境界マーカー（例: `E. & O.E.`）によって、シートの意味のある内容の終端行を検出する。
//! 検出された終端行は排他的で、`[0, end_row)`が内容として扱われます。

use crate::error::SheetScoutError;
use crate::keywords::KeywordSet;
use crate::search::CancellationToken;
use crate::types::{column_number, Sheet};

/// デフォルトの境界マーカー
pub const DEFAULT_BOUNDARY_MARKERS: &str = "E. & O.E.;SUB-TOTAL";

/// デフォルトの終端列（この列までを含む）
pub const DEFAULT_END_COLUMN: &str = "N";

/// デフォルトの最大行数
pub const DEFAULT_ROW_CAP: usize = 1000;

/// 境界設定
///
/// シートの意味のある内容を`[0, 終端行) × [A, end_column]`に限定するための設定です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// 境界マーカー（空の場合は`row_cap`まで）
    pub markers: KeywordSet,
    /// 終端列の列文字（この列を含む）
    pub end_column: String,
    /// 走査する最大行数
    pub row_cap: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            markers: KeywordSet::parse(DEFAULT_BOUNDARY_MARKERS),
            end_column: DEFAULT_END_COLUMN.to_string(),
            row_cap: DEFAULT_ROW_CAP,
        }
    }
}

impl BoundaryConfig {
    /// 終端列までの列数（`"N"` → 14）
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidCellReference`: 列文字が不正な場合
    pub fn column_count(&self) -> Result<usize, SheetScoutError> {
        Ok(column_number(&self.end_column)? as usize)
    }
}

/// 終端行を検出する
///
/// 行0から`row_cap`（排他的）まで走査し、いずれかのセルのトリム済み文字列に
/// 境界マーカーのいずれかが部分文字列として（大文字・小文字を区別せず）含まれる
/// 最初の行を返します。
///
/// # 戻り値
///
/// * マーカーを含む最初の行のインデックス
/// * マーカーが空、または見つからない場合は`min(row_cap, シートの行数)`
///
/// # 使用例
///
/// ```rust
/// use sheetscout::{find_end_row, KeywordSet, Sheet};
///
/// let sheet = Sheet::from_rows(vec![vec!["Item"], vec!["E. & O.E."], vec!["Footer"]]);
/// assert_eq!(find_end_row(&sheet, &KeywordSet::parse("E. & O.E."), 1000), 1);
/// assert_eq!(find_end_row(&sheet, &KeywordSet::default(), 1000), 3);
/// ```
pub fn find_end_row(sheet: &Sheet, markers: &KeywordSet, row_cap: usize) -> usize {
    let limit = row_cap.min(sheet.row_count());
    if markers.is_empty() {
        return limit;
    }

    sheet
        .rows()
        .iter()
        .take(limit)
        .position(|row| row.iter().any(|cell| markers.contains_any(&cell.as_text())))
        .unwrap_or(limit)
}

/// キャンセル可能な終端行の検出（行ごとにキャンセル要求を確認する）
pub fn find_end_row_with_cancel(
    sheet: &Sheet,
    markers: &KeywordSet,
    row_cap: usize,
    cancel: &CancellationToken,
) -> Result<usize, SheetScoutError> {
    let limit = row_cap.min(sheet.row_count());
    if markers.is_empty() {
        return Ok(limit);
    }

    for (row_idx, row) in sheet.rows().iter().take(limit).enumerate() {
        if cancel.is_cancelled() {
            return Err(SheetScoutError::Cancelled);
        }
        if row.iter().any(|cell| markers.contains_any(&cell.as_text())) {
            return Ok(row_idx);
        }
    }
    Ok(limit)
}

/// 開始キーワードと終了キーワードで囲まれた内容ブロック
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBlock {
    /// 開始キーワードをすべて含む最初の行（0始まり）
    pub start_row: usize,
    /// 終了キーワードをすべて含む最初の行（0始まり）
    pub end_row: usize,
}

/// 内容ブロックを検出する
///
/// 各行の空でないセル文字列をトリムして空白で連結し、その中に
/// キーワードが（大文字・小文字を区別せず）すべて含まれる最初の行を探します。
/// 終了行が見つかった時点で走査を打ち切るため、開始行は常に終了行以前になります。
///
/// # エラー
///
/// * `SheetScoutError::InvalidInput`: キーワード集合が空の場合、または
///   終了行までに開始キーワードが見つからない場合、終了キーワードが見つからない場合
pub fn find_content_block(
    sheet: &Sheet,
    start_keywords: &KeywordSet,
    end_keywords: &KeywordSet,
) -> Result<ContentBlock, SheetScoutError> {
    start_keywords.require_non_empty()?;
    end_keywords.require_non_empty()?;

    let mut start_row = None;
    let mut end_row = None;

    for (row_idx, row) in sheet.rows().iter().enumerate() {
        let row_text = row
            .iter()
            .map(|cell| cell.as_text().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if start_row.is_none() && start_keywords.contains_all(&row_text) {
            start_row = Some(row_idx);
        }
        if end_keywords.contains_all(&row_text) {
            end_row = Some(row_idx);
            break;
        }
    }

    let start_row = start_row.ok_or_else(|| {
        SheetScoutError::InvalidInput(format!(
            "start keywords [{}] not found",
            start_keywords.join(", ")
        ))
    })?;
    let end_row = end_row.ok_or_else(|| {
        SheetScoutError::InvalidInput(format!(
            "end keywords [{}] not found",
            end_keywords.join(", ")
        ))
    })?;

    Ok(ContentBlock { start_row, end_row })
}
