//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

/// キーワードの照合方式
///
/// スキャンごとに選択します。どちらの方式も大文字・小文字を区別しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum MatchMode {
    /// 部分一致（デフォルト）
    ///
    /// キーワードがセル文字列のどこかに含まれていれば一致とみなします。
    /// 例: キーワード `"Total"` は `"Grand Total"` に一致
    #[default]
    Substring,

    /// 完全一致
    ///
    /// スプレッドシートのセルでは、トリム後のセル文字列全体がキーワードと等しい場合に一致します。
    /// テキストファイルでは、単語境界で区切られたキーワードの出現を一致とみなします。
    ExactToken,
}

impl MatchMode {
    /// `exact_match`フラグから照合方式を選択
    pub fn from_exact(exact: bool) -> Self {
        if exact {
            MatchMode::ExactToken
        } else {
            MatchMode::Substring
        }
    }
}

/// 入力ファイルの種類
///
/// 拡張子（大文字・小文字を区別しない）で判定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FileKind {
    /// スプレッドシート（xlsx, xlsm, xlsb, xls, ods）
    Spreadsheet,

    /// 区切りテキスト（csv）
    Delimited,

    /// プレーンテキスト（txt）
    PlainText,
}

impl FileKind {
    /// ファイルパスの拡張子から種類を判定
    ///
    /// # 戻り値
    ///
    /// * `Some(FileKind)` - サポートされている拡張子の場合
    /// * `None` - 拡張子がない、またはサポート外の場合
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetscout::FileKind;
    /// use std::path::Path;
    ///
    /// assert_eq!(FileKind::from_path(Path::new("quote.XLSX")), Some(FileKind::Spreadsheet));
    /// assert_eq!(FileKind::from_path(Path::new("notes.txt")), Some(FileKind::PlainText));
    /// assert_eq!(FileKind::from_path(Path::new("image.png")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(FileKind::Spreadsheet),
            "csv" => Some(FileKind::Delimited),
            "txt" => Some(FileKind::PlainText),
            _ => None,
        }
    }
}
