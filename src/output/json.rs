//! JSON Formatter
//!
//! serdeでシリアライズ可能な結果（`MatchResult`, `ExtractedDocument`など）をJSONとして出力します。

use serde::Serialize;
use std::io::Write;

use crate::error::SheetScoutError;

/// JSONの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// インデント付き（デフォルト）
    #[default]
    Pretty,

    /// 1行
    Compact,
}

/// JSON形式のフォーマッター
///
/// # 使用例
///
/// ```rust
/// use sheetscout::{scan, JsonFormatter, JsonStyle, KeywordSet, MatchMode, ScanRange, Sheet};
///
/// # fn main() -> Result<(), sheetscout::SheetScoutError> {
/// let sheet = Sheet::from_rows(vec![vec!["Product :", "Widget"]]);
/// let result = scan(&sheet, &KeywordSet::parse("Product :"), &ScanRange::parse("A1", "B1")?, MatchMode::Substring)?;
///
/// let json = JsonFormatter::new(JsonStyle::Compact).to_string(&result)?;
/// assert_eq!(json, r#"{"A1":{"Product :":"Product :"}}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
}

impl JsonFormatter {
    pub fn new(style: JsonStyle) -> Self {
        Self { style }
    }

    /// 値をJSONとして書き込む（末尾に改行を付ける）
    pub fn render<T, W>(&self, value: &T, writer: &mut W) -> Result<(), SheetScoutError>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        match self.style {
            JsonStyle::Pretty => serde_json::to_writer_pretty(&mut *writer, value)?,
            JsonStyle::Compact => serde_json::to_writer(&mut *writer, value)?,
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// 値をJSON文字列に変換する（末尾の改行なし）
    pub fn to_string<T>(&self, value: &T) -> Result<String, SheetScoutError>
    where
        T: Serialize + ?Sized,
    {
        let json = match self.style {
            JsonStyle::Pretty => serde_json::to_string_pretty(value)?,
            JsonStyle::Compact => serde_json::to_string(value)?,
        };
        Ok(json)
    }
}
