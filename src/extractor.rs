//! Extractor Module
//!
//! シートをヘッダー・表・集計・生データの各セクションに分割し、
//! JSONにシリアライズ可能な文書構造へ変換するモジュール。

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::boundary::find_end_row;
use crate::error::SheetScoutError;
use crate::keywords::KeywordSet;
use crate::types::{column_number, Sheet};

/// ヘッダー情報を探す先頭行数
pub const HEADER_SCAN_ROWS: usize = 10;

/// 表の開始行とみなすための、空でないセルの最小数
pub const TABLE_MIN_FILLED_CELLS: usize = 3;

/// 表として取り出す最大行数（開始行を含む）
pub const TABLE_MAX_ROWS: usize = 20;

/// 集計情報を探す、終端行直前の行数
pub const SUMMARY_SCAN_ROWS: usize = 5;

/// 集計セルとみなす語（小文字で部分一致）
const SUMMARY_MARKERS: [&str; 5] = ["total", "subtotal", "amount", "gst", "tax"];

/// 抽出日時の書式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 列インデックスをキーとする1行分のレコード
///
/// シリアライズ時は列の順序を保ったまま、`{"col_0": ..., "col_1": ...}`
/// （表データ）または`{"0": ..., "1": ...}`（生データ）の形式になります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    key_prefix: &'static str,
    cells: Vec<String>,
}

impl RowRecord {
    /// 表データ用のレコード（キーは`col_<n>`）
    pub fn table(cells: Vec<String>) -> Self {
        Self {
            key_prefix: "col_",
            cells,
        }
    }

    /// 生データ用のレコード（キーは列インデックス）
    pub fn raw(cells: Vec<String>) -> Self {
        Self {
            key_prefix: "",
            cells,
        }
    }

    /// 列インデックスに対応するキー
    pub fn key(&self, col: usize) -> String {
        format!("{}{}", self.key_prefix, col)
    }

    /// 指定された列の値
    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }

    /// すべての列の値
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (col, value) in self.cells.iter().enumerate() {
            map.serialize_entry(&self.key(col), value)?;
        }
        map.end()
    }
}

/// スプレッドシートから抽出した構造化セクション
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct StructuredContent {
    /// `キー: 値`形式のヘッダー情報（重複キーは後勝ち）
    pub header_info: BTreeMap<String, String>,

    /// 表データ（最大`TABLE_MAX_ROWS`行、空行は除く）
    pub table_data: Vec<RowRecord>,

    /// 集計情報（キーは`row_<i>_col_<j>`）
    pub summary_info: BTreeMap<String, String>,

    /// 制限範囲全体の生データ
    pub raw_data: Vec<RowRecord>,
}

/// 文書の内容
///
/// ファイルの種類によって構造が異なります。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum DocumentContent {
    /// スプレッドシート: 4つのセクション
    Structured(StructuredContent),

    /// 区切りテキスト: 行レコードのみ
    Delimited {
        /// 各行のレコード
        raw_data: Vec<RowRecord>,
    },

    /// プレーンテキスト: 先頭部分の文字列のみ
    PlainText {
        /// 先頭部分のテキスト
        raw_text: String,
    },
}

/// 抽出元ファイルの情報
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileInfo {
    /// ファイル名（拡張子を含む）
    pub filename: String,

    /// ファイルパス
    pub path: String,

    /// 抽出日時（`YYYY-MM-DD HH:MM:SS`）
    pub extracted_timestamp: String,
}

impl FileInfo {
    /// ファイルパスと現在時刻から生成
    pub fn for_path(path: &Path) -> Self {
        Self {
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.display().to_string(),
            extracted_timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 抽出結果の文書
///
/// ```json
/// {
///   "file_info": {"filename": "...", "path": "...", "extracted_timestamp": "2025-01-01 09:30:00"},
///   "content": {"header_info": {}, "table_data": [], "summary_info": {}, "raw_data": []}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExtractedDocument {
    pub file_info: FileInfo,
    pub content: DocumentContent,
}

impl ExtractedDocument {
    pub fn new(file_info: FileInfo, content: DocumentContent) -> Self {
        Self { file_info, content }
    }
}

/// シートから構造化セクションを抽出する
///
/// # 引数
///
/// * `sheet` - 抽出対象のシート
/// * `markers` - 境界マーカー（空の場合は境界なし）
/// * `max_column_letter` - 最終列の列文字（例: `"N"`なら列A〜N）
/// * `row_cap` - 境界検出で走査する最大行数
///
/// # 処理フロー
///
/// 1. 境界検出で終端行を求める
/// 2. `行 [0, 終端行) × 列 [0, 列文字の番号)`に制限する
/// 3. ヘッダー・表・集計・生データの各セクションを抽出する
///
/// # エラー
///
/// * `SheetScoutError::InvalidCellReference`: 列文字が解釈できない場合
pub fn extract(
    sheet: &Sheet,
    markers: &KeywordSet,
    max_column_letter: &str,
    row_cap: usize,
) -> Result<StructuredContent, SheetScoutError> {
    let end_row = find_end_row(sheet, markers, row_cap);
    let max_col = column_number(max_column_letter)? as usize;
    let cols = max_col.min(sheet.column_count());

    let rectangle: Vec<Vec<String>> = (0..end_row)
        .map(|row| (0..cols).map(|col| sheet.text(row, col)).collect())
        .collect();

    Ok(StructuredContent {
        header_info: extract_header(&rectangle),
        table_data: extract_table(&rectangle),
        summary_info: extract_summary(&rectangle),
        raw_data: rectangle.iter().cloned().map(RowRecord::raw).collect(),
    })
}

/// 区切りテキストのシートを行レコードに変換する
pub fn extract_delimited(sheet: &Sheet) -> DocumentContent {
    let cols = sheet.column_count();
    let raw_data = (0..sheet.row_count())
        .map(|row| RowRecord::raw((0..cols).map(|col| sheet.text(row, col)).collect()))
        .collect();
    DocumentContent::Delimited { raw_data }
}

fn extract_header(rectangle: &[Vec<String>]) -> BTreeMap<String, String> {
    let mut header_info = BTreeMap::new();
    for row in rectangle.iter().take(HEADER_SCAN_ROWS) {
        for value in row {
            if value.trim().is_empty() {
                continue;
            }
            if let Some((key, val)) = value.split_once(':') {
                let (key, val) = (key.trim(), val.trim());
                if !key.is_empty() && !val.is_empty() {
                    header_info.insert(key.to_string(), val.to_string());
                }
            }
        }
    }
    header_info
}

fn filled_cells(row: &[String]) -> usize {
    row.iter().filter(|cell| !cell.trim().is_empty()).count()
}

fn extract_table(rectangle: &[Vec<String>]) -> Vec<RowRecord> {
    let Some(table_start) = rectangle
        .iter()
        .position(|row| filled_cells(row) >= TABLE_MIN_FILLED_CELLS)
    else {
        return Vec::new();
    };

    rectangle
        .iter()
        .skip(table_start)
        .take(TABLE_MAX_ROWS)
        .filter(|row| filled_cells(row) > 0)
        .map(|row| RowRecord::table(row.iter().map(|cell| cell.trim().to_string()).collect()))
        .collect()
}

fn extract_summary(rectangle: &[Vec<String>]) -> BTreeMap<String, String> {
    let mut summary_info = BTreeMap::new();
    let summary_start = rectangle.len().saturating_sub(SUMMARY_SCAN_ROWS);

    for (row_idx, row) in rectangle.iter().enumerate().skip(summary_start) {
        for (col_idx, value) in row.iter().enumerate() {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            let folded = trimmed.to_lowercase();
            if SUMMARY_MARKERS.iter().any(|marker| folded.contains(marker)) {
                summary_info.insert(format!("row_{}_col_{}", row_idx, col_idx), trimmed.to_string());
            }
        }
    }
    summary_info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation() -> Sheet {
        Sheet::from_rows(vec![
            vec!["Quotation No : Q-2025-001", "", "Date: 2025-03-01"],
            vec!["Customer : Acme", "", ""],
            vec!["", "", ""],
            vec!["Item", "Description", "Qty", "Price"],
            vec!["1", " Scale ", "2", "150"],
            vec!["", "", "", ""],
            vec!["2", "Printer", "1", "300"],
            vec!["", "", "Sub Total", "600"],
            vec!["", "", "GST 9%", "54"],
            vec!["E. & O.E.", "", "", ""],
            vec!["Footer total", "", "", ""],
        ])
    }

    fn markers() -> KeywordSet {
        KeywordSet::parse("E. & O.E.")
    }

    #[test]
    fn test_extract_header_info() {
        let content = extract(&quotation(), &markers(), "N", 1000).unwrap();
        assert_eq!(content.header_info["Quotation No"], "Q-2025-001");
        assert_eq!(content.header_info["Customer"], "Acme");
        // 最初のコロンで分割する
        assert_eq!(content.header_info["Date"], "2025-03-01");
        assert_eq!(content.header_info.len(), 3);
    }

    #[test]
    fn test_header_duplicate_keys_last_wins() {
        let sheet = Sheet::from_rows(vec![vec!["Ref: A"], vec!["Ref: B"], vec!["Empty:  "]]);
        let content = extract(&sheet, &KeywordSet::default(), "C", 1000).unwrap();
        assert_eq!(content.header_info.len(), 1);
        assert_eq!(content.header_info["Ref"], "B");
    }

    #[test]
    fn test_header_only_first_ten_rows() {
        let mut rows = vec![vec![""]; 10];
        rows.push(vec!["Late: value"]);
        let sheet = Sheet::from_rows(rows);
        let content = extract(&sheet, &KeywordSet::default(), "A", 1000).unwrap();
        assert!(content.header_info.is_empty());
    }

    #[test]
    fn test_extract_table_data() {
        let content = extract(&quotation(), &markers(), "N", 1000).unwrap();
        // 表は行3から開始、空行（行5）は除外、終端行（行9）まで
        assert_eq!(content.table_data.len(), 5);
        let first = &content.table_data[0];
        assert_eq!(first.get(0), Some("Item"));
        assert_eq!(first.get(3), Some("Price"));
        assert_eq!(content.table_data[1].get(1), Some("Scale"));

        let json = serde_json::to_value(first).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"col_0": "Item", "col_1": "Description", "col_2": "Qty", "col_3": "Price"})
        );
    }

    #[test]
    fn test_table_limited_to_twenty_rows() {
        let rows: Vec<Vec<String>> = (0..30)
            .map(|i| vec![format!("a{}", i), format!("b{}", i), format!("c{}", i)])
            .collect();
        let sheet = Sheet::from_rows(rows);
        let content = extract(&sheet, &KeywordSet::default(), "C", 1000).unwrap();
        assert_eq!(content.table_data.len(), TABLE_MAX_ROWS);
        assert_eq!(content.table_data[19].get(0), Some("a19"));
    }

    #[test]
    fn test_no_table_when_rows_are_sparse() {
        let sheet = Sheet::from_rows(vec![vec!["a", "b"], vec!["", "c", "d"], vec!["e"]]);
        let content = extract(&sheet, &KeywordSet::default(), "Z", 1000).unwrap();
        assert!(content.table_data.is_empty());
    }

    #[test]
    fn test_extract_summary_info() {
        let content = extract(&quotation(), &markers(), "N", 1000).unwrap();
        assert_eq!(content.summary_info["row_7_col_2"], "Sub Total");
        assert_eq!(content.summary_info["row_8_col_2"], "GST 9%");
        // 終端行以降（"Footer total"）は含まれない
        assert_eq!(content.summary_info.len(), 2);
    }

    #[test]
    fn test_raw_data_covers_rectangle() {
        let content = extract(&quotation(), &markers(), "B", 1000).unwrap();
        assert_eq!(content.raw_data.len(), 9);
        // 列はA〜Bの2列に制限される
        assert!(content.raw_data.iter().all(|r| r.cells().len() == 2));
        // 生データはトリムしない
        assert_eq!(content.raw_data[4].get(1), Some(" Scale "));

        let json = serde_json::to_value(&content.raw_data[0]).unwrap();
        assert_eq!(json, serde_json::json!({"0": "Quotation No : Q-2025-001", "1": ""}));
    }

    #[test]
    fn test_column_limit_narrows_sections() {
        let content = extract(&quotation(), &markers(), "B", 1000).unwrap();
        // 列A〜Bだけでは3セル以上の行がない
        assert!(content.table_data.is_empty());
        assert!(!content.header_info.contains_key("Date"));
    }

    #[test]
    fn test_row_cap_limits_rectangle() {
        let content = extract(&quotation(), &KeywordSet::default(), "N", 4).unwrap();
        assert_eq!(content.raw_data.len(), 4);
        assert_eq!(content.table_data.len(), 1);
    }

    #[test]
    fn test_invalid_column_letter() {
        assert!(matches!(
            extract(&quotation(), &markers(), "1", 1000),
            Err(SheetScoutError::InvalidCellReference(_))
        ));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let first = serde_json::to_string(&extract(&quotation(), &markers(), "N", 1000).unwrap()).unwrap();
        let second = serde_json::to_string(&extract(&quotation(), &markers(), "N", 1000).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_delimited() {
        let sheet = Sheet::from_rows(vec![vec!["a", "b"], vec!["c"]]);
        let content = extract_delimited(&sheet);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"raw_data": [{"0": "a", "1": "b"}, {"0": "c", "1": ""}]})
        );
    }

    #[test]
    fn test_document_serialization() {
        let document = ExtractedDocument::new(
            FileInfo::for_path(Path::new("/tmp/notes.txt")),
            DocumentContent::PlainText {
                raw_text: "hello".to_string(),
            },
        );
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["file_info"]["filename"], "notes.txt");
        assert_eq!(json["content"]["raw_text"], "hello");

        let timestamp = json["file_info"]["extracted_timestamp"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
    }
}
