//! Scanner Module
//!
//! 矩形範囲内のセルをキーワードで走査する境界付きスキャナー。
//! 走査は範囲内のセルを行優先で1回ずつ訪れ、途中で打ち切りません。

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::api::MatchMode;
use crate::error::SheetScoutError;
use crate::keywords::KeywordSet;
use crate::search::CancellationToken;
use crate::types::{CellAddress, ScanRange, Sheet};

/// スキャン結果
///
/// セル座標から「一致したキーワード → トリム済みセル文字列」への対応です。
/// 1つのセルが複数のキーワードに一致した場合、各キーワードに同じセル文字列が対応します。
/// 空のキーワード対応を持つ座標は含まれません。
///
/// JSONにシリアライズすると、キーはA1形式のセル参照になります。
///
/// ```json
/// { "A1": { "Product :": "Product :" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matches: BTreeMap<CellAddress, BTreeMap<String, String>>,
}

impl MatchResult {
    /// 一致したセル数
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// 一致がないかどうか
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// 指定されたセルの一致内容
    pub fn get(&self, address: &CellAddress) -> Option<&BTreeMap<String, String>> {
        self.matches.get(address)
    }

    /// A1形式のセル参照で一致内容を取得
    pub fn get_a1(&self, reference: &str) -> Option<&BTreeMap<String, String>> {
        CellAddress::parse(reference)
            .ok()
            .and_then(|address| self.matches.get(&address))
    }

    /// 行優先の順で一致内容を走査
    pub fn iter(&self) -> impl Iterator<Item = (&CellAddress, &BTreeMap<String, String>)> {
        self.matches.iter()
    }

    /// 一致したセル文字列を重複なしで、行優先の順に返す
    pub fn matched_texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = Vec::new();
        for keywords in self.matches.values() {
            for text in keywords.values() {
                if !texts.contains(&text.as_str()) {
                    texts.push(text);
                }
            }
        }
        texts
    }

    fn insert(&mut self, address: CellAddress, keywords: Vec<&str>, text: &str) {
        if keywords.is_empty() {
            return;
        }
        let entry = self.matches.entry(address).or_default();
        for keyword in keywords {
            entry.insert(keyword.to_string(), text.to_string());
        }
    }
}

impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.matches.len()))?;
        for (address, keywords) in &self.matches {
            map.serialize_entry(&address.to_a1_notation(), keywords)?;
        }
        map.end()
    }
}

/// 指定範囲内のセルをキーワードで走査する
///
/// # 引数
///
/// * `sheet` - 走査対象のシート
/// * `keywords` - キーワード集合（空は不可）
/// * `range` - 走査範囲（行・列とも両端を含む）
/// * `mode` - 照合方式
///
/// # 戻り値
///
/// * `Ok(MatchResult)` - 走査結果（一致なしの場合は空）
/// * `Err(SheetScoutError::InvalidInput)` - キーワード集合が空の場合
/// * `Err(SheetScoutError::InvalidRange)` - 範囲の開始が終了を超えている場合
///
/// # 使用例
///
/// ```rust
/// use sheetscout::{scan, KeywordSet, MatchMode, ScanRange, Sheet};
///
/// # fn main() -> Result<(), sheetscout::SheetScoutError> {
/// let sheet = Sheet::from_rows(vec![vec!["Product :", "Widget"], vec!["Brand :", "Acme"]]);
/// let keywords = KeywordSet::parse("Product :");
/// let range = ScanRange::parse("A1", "B2")?;
///
/// let result = scan(&sheet, &keywords, &range, MatchMode::Substring)?;
/// assert_eq!(result.get_a1("A1").unwrap()["Product :"], "Product :");
/// # Ok(())
/// # }
/// ```
pub fn scan(
    sheet: &Sheet,
    keywords: &KeywordSet,
    range: &ScanRange,
    mode: MatchMode,
) -> Result<MatchResult, SheetScoutError> {
    scan_inner(sheet, keywords, range, mode, None)
}

/// キャンセル可能な走査（行ごとにキャンセル要求を確認する）
///
/// キャンセルされた場合は`SheetScoutError::Cancelled`を返します。
pub fn scan_with_cancel(
    sheet: &Sheet,
    keywords: &KeywordSet,
    range: &ScanRange,
    mode: MatchMode,
    cancel: &CancellationToken,
) -> Result<MatchResult, SheetScoutError> {
    scan_inner(sheet, keywords, range, mode, Some(cancel))
}

fn scan_inner(
    sheet: &Sheet,
    keywords: &KeywordSet,
    range: &ScanRange,
    mode: MatchMode,
    cancel: Option<&CancellationToken>,
) -> Result<MatchResult, SheetScoutError> {
    keywords.require_non_empty()?;
    range.validate()?;

    let mut result = MatchResult::default();

    let first_row = range.start.row as usize;
    let last_row = range.end.row as usize;
    let first_col = range.start.col as usize;
    let last_col = range.end.col as usize;

    for (row_idx, row) in sheet
        .rows()
        .iter()
        .enumerate()
        .take(last_row.saturating_add(1))
        .skip(first_row)
    {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(SheetScoutError::Cancelled);
        }

        for (col_idx, cell) in row
            .iter()
            .enumerate()
            .take(last_col.saturating_add(1))
            .skip(first_col)
        {
            let rendered = cell.as_text();
            let text = rendered.trim();
            if text.is_empty() {
                continue;
            }

            let matched = keywords.matching(text, mode);
            let address = CellAddress::new(col_idx as u32, row_idx as u32);
            result.insert(address, matched, text);
        }
    }

    Ok(result)
}
