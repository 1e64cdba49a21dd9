//! Output Module
//!
//! スキャン結果・抽出結果のJSON出力と、ファイルのプレビュー表示を提供するモジュール。

mod json;
mod preview;

pub use json::{JsonFormatter, JsonStyle};
pub use preview::{PreviewFormatter, PREVIEW_MAX_ROWS, PREVIEW_RULE_WIDTH};
