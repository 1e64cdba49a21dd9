//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! シート（行 × 列のセル値）、セル座標、スキャン範囲、列文字の変換を提供します。

use std::fmt;
use std::str::FromStr;

use crate::error::SheetScoutError;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値を表示用の文字列として取得（トリムなし）
    ///
    /// 整数値の数値は小数点なしで表現します（例: `150.0` → `"150"`）。
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// シート（行の順序付きシーケンス）
///
/// 各行はセル値の順序付きシーケンスで、行ごとに長さが異なってもかまいません。
/// 存在しないセルは空セルとして扱われます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// セル値の行から新しいシートを生成
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// 文字列の行からシートを生成（空文字列は空セルになる）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetscout::Sheet;
    ///
    /// let sheet = Sheet::from_rows(vec![vec!["Product :", "Widget"], vec!["Brand :", "Acme"]]);
    /// assert_eq!(sheet.row_count(), 2);
    /// assert_eq!(sheet.text(1, 1), "Acme");
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| CellValue::from(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// 行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 最も長い行の列数
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// すべての行
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// 指定された行（0始まり）
    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// 指定されたセル（0始まり）
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// セルの表示文字列（存在しないセルは空文字列）
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(CellValue::as_text).unwrap_or_default()
    }

    /// 先頭`max_rows`行だけを残す
    pub fn truncate_rows(&mut self, max_rows: usize) {
        self.rows.truncate(max_rows);
    }
}

/// 列番号（1始まり）を列文字に変換（1 -> "A", 26 -> "Z", 27 -> "AA"）
///
/// 0は列として存在しないため、空文字列を返します。
pub fn column_letters(mut number: u32) -> String {
    let mut result = String::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        number = (number - 1) / 26;
    }
    result
}

/// 列文字を列番号（1始まり）に変換（"A" -> 1, "N" -> 14, "AA" -> 27）
///
/// 大文字・小文字は区別しません。
///
/// # エラー
///
/// * `SheetScoutError::InvalidCellReference`: 空文字列、英字以外の文字、桁あふれ
pub fn column_number(letters: &str) -> Result<u32, SheetScoutError> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(SheetScoutError::InvalidCellReference(letters.to_string()));
    }

    let mut result: u32 = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(SheetScoutError::InvalidCellReference(letters.to_string()));
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(value))
            .ok_or_else(|| SheetScoutError::InvalidCellReference(letters.to_string()))?;
    }
    Ok(result)
}

/// セル座標（0始まり）
///
/// 順序は行優先（行 → 列）です。A1形式の文字列と相互変換できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    /// 列インデックスと行インデックス（どちらも0始まり）から座標を生成
    pub fn new(col: u32, row: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_a1_notation(&self) -> String {
        format!("{}{}", column_letters(self.col + 1), self.row + 1)
    }

    /// A1形式の文字列を解析（例: "T58" -> 列19, 行57）
    ///
    /// 前後の空白は無視し、列文字の大文字・小文字は区別しません。
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidCellReference`: 英字の並びと数字の並びに分解できない場合、
    ///   または行番号が0の場合
    pub fn parse(reference: &str) -> Result<Self, SheetScoutError> {
        let invalid = || SheetScoutError::InvalidCellReference(reference.to_string());
        let trimmed = reference.trim();

        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);

        if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let col = column_number(letters).map_err(|_| invalid())?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self::new(col - 1, row - 1))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_notation())
    }
}

impl FromStr for CellAddress {
    type Err = SheetScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// スキャン範囲（開始・終了ともに行・列の両方を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl ScanRange {
    /// 新しい範囲を生成（検証は`validate()`で行う）
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// 列・行の境界から範囲を生成
    pub fn from_bounds(start_col: u32, end_col: u32, start_row: u32, end_row: u32) -> Self {
        Self::new(
            CellAddress::new(start_col, start_row),
            CellAddress::new(end_col, end_row),
        )
    }

    /// A1形式の開始・終了セルから範囲を生成（例: "A1", "T58"）
    pub fn parse(start: &str, end: &str) -> Result<Self, SheetScoutError> {
        Ok(Self::new(CellAddress::parse(start)?, CellAddress::parse(end)?))
    }

    /// 開始が終了を超えていないことを検証
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidRange`: いずれかの軸で開始 > 終了の場合
    pub fn validate(&self) -> Result<(), SheetScoutError> {
        if self.start.row > self.end.row {
            return Err(SheetScoutError::InvalidRange {
                axis: "row",
                start: self.start.row,
                end: self.end.row,
            });
        }
        if self.start.col > self.end.col {
            return Err(SheetScoutError::InvalidRange {
                axis: "col",
                start: self.start.col,
                end: self.end.col,
            });
        }
        Ok(())
    }

    /// 指定された座標が範囲内にあるかを判定
    pub fn contains(&self, address: CellAddress) -> bool {
        address.row >= self.start.row
            && address.row <= self.end.row
            && address.col >= self.start.col
            && address.col <= self.end.col
    }

    /// 範囲のサイズ（行数 × 列数）
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidRange`: 開始 > 終了の場合
    pub fn size(&self) -> Result<(u32, u32), SheetScoutError> {
        self.validate()?;
        let rows = (self.end.row - self.start.row).saturating_add(1);
        let cols = (self.end.col - self.start.col).saturating_add(1);
        Ok((rows, cols))
    }
}
