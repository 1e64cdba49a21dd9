//! Workbook Parser
//!
//! calamineを使用したスプレッドシート解析。
//! 最初のワークシートを、シート左上（A1）を原点とするグリッドに展開します。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use std::io::Cursor;
use std::path::Path;

use crate::error::SheetScoutError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Sheet};

/// 日時セルの表示形式
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// 形式（xlsx, xlsm, xlsb, xls, ods）はファイル内容から自動判定されます。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
    security: SecurityConfig,
}

impl WorkbookParser {
    /// ファイルパスからワークブックを開く
    pub fn open(path: &Path) -> Result<Self, SheetScoutError> {
        let buffer = super::read_file(path)?;
        Self::from_buffer(buffer)
    }

    fn from_buffer(buffer: Vec<u8>) -> Result<Self, SheetScoutError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self {
            workbook,
            security: SecurityConfig::default(),
        })
    }

    /// 最初のワークシートをグリッドとして読み込む
    ///
    /// # 引数
    ///
    /// * `max_rows` - 読み込む最大行数（`None`の場合は全行）
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidInput`: ワークシートが存在しない場合
    /// * `SheetScoutError::Parse`: シートの解析に失敗した場合
    /// * `SheetScoutError::SecurityViolation`: 展開後のグリッドが大きすぎる場合
    pub fn first_sheet(&mut self, max_rows: Option<usize>) -> Result<Sheet, SheetScoutError> {
        let range = self.workbook.worksheet_range_at(0).ok_or_else(|| {
            SheetScoutError::InvalidInput("workbook contains no worksheets".to_string())
        })??;
        range_to_sheet(&range, max_rows, &self.security)
    }
}

/// calamineの範囲をA1原点のグリッドに変換する
///
/// calamineの範囲は最初の使用セルから始まるため、開始位置の分だけ
/// 空セルで埋めて、行・列インデックスがシート上の位置と一致するようにします。
fn range_to_sheet(
    range: &Range<Data>,
    max_rows: Option<usize>,
    security: &SecurityConfig,
) -> Result<Sheet, SheetScoutError> {
    if range.is_empty() {
        return Ok(Sheet::default());
    }

    let (start_row, start_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut row_count = start_row + range.height();
    if let Some(max_rows) = max_rows {
        row_count = row_count.min(max_rows);
    }
    let col_count = start_col + range.width();
    security.check_grid_size(row_count, col_count)?;

    let mut rows = vec![vec![CellValue::Empty; col_count]; row_count];
    for (row_offset, col_offset, data) in range.used_cells() {
        let row = start_row + row_offset;
        if row >= row_count {
            continue;
        }
        rows[row][start_col + col_offset] = convert_cell(data);
    }

    Ok(Sheet::new(rows))
}

/// calamineのセル値を変換
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => serial_to_text(dt.as_f64())
            .map(CellValue::String)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// Excelのシリアル値を日時文字列に変換（1899-12-30起点）
fn serial_to_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(datetime.format(DATETIME_FORMAT).to_string())
}
