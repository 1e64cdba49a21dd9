//! Preview Formatter
//!
//! ファイル内容を確認用のプレーンテキストとして整形します。
//! 表の列幅は全角文字を考慮した表示幅で揃えます。

use unicode_width::UnicodeWidthStr;

use crate::types::Sheet;

/// プレビューに表示する最大行数
pub const PREVIEW_MAX_ROWS: usize = 50;

/// 見出しの下に引く罫線の幅
pub const PREVIEW_RULE_WIDTH: usize = 50;

/// 列の区切り
const COLUMN_SEPARATOR: &str = "  ";

/// プレビューのフォーマッター
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewFormatter;

impl PreviewFormatter {
    /// 見出し（`Preview: <name>`と罫線）
    pub fn header(&self, name: &str) -> String {
        format!("Preview: {}\n{}\n", name, "=".repeat(PREVIEW_RULE_WIDTH))
    }

    /// シートの先頭`PREVIEW_MAX_ROWS`行を、列を揃えた表として整形する
    ///
    /// 各行の末尾の空白は取り除かれます。
    ///
    /// ```rust
    /// use sheetscout::{PreviewFormatter, Sheet};
    ///
    /// let sheet = Sheet::from_rows(vec![vec!["品名", "Qty"], vec!["Scale", "2"]]);
    /// let table = PreviewFormatter.render_table(&sheet);
    /// assert_eq!(table, "品名   Qty\nScale  2\n");
    /// ```
    pub fn render_table(&self, sheet: &Sheet) -> String {
        let rows: Vec<Vec<String>> = sheet
            .rows()
            .iter()
            .take(PREVIEW_MAX_ROWS)
            .map(|row| row.iter().map(|cell| cell.as_text()).collect())
            .collect();

        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; column_count];
        for row in &rows {
            for (col, text) in row.iter().enumerate() {
                widths[col] = widths[col].max(text.width());
            }
        }

        let mut output = String::new();
        for row in &rows {
            let mut line = String::new();
            for (col, width) in widths.iter().enumerate() {
                if col > 0 {
                    line.push_str(COLUMN_SEPARATOR);
                }
                let text = row.get(col).map(String::as_str).unwrap_or("");
                line.push_str(text);
                line.push_str(&" ".repeat(width.saturating_sub(text.width())));
            }
            output.push_str(line.trim_end());
            output.push('\n');
        }
        output
    }

    /// 見出し付きのシートのプレビュー
    pub fn render_sheet(&self, name: &str, sheet: &Sheet) -> String {
        let mut output = self.header(name);
        output.push_str(&self.render_table(sheet));
        output
    }

    /// 見出し付きのテキストのプレビュー
    pub fn render_text(&self, name: &str, text: &str) -> String {
        let mut output = self.header(name);
        output.push_str(text);
        output
    }
}
