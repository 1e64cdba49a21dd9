//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetscoutクレート全体で使用するエラー型
///
/// スキャン・抽出・一括検索の各処理で発生するすべてのエラーを
/// 統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `InvalidInput`: 空のキーワードセット、存在しないファイルなど
/// - `InvalidRange`: 範囲指定の開始が終了より大きい
/// - `InvalidCellReference`: A1形式として解釈できないセル参照
/// - `FileAccess`: 単一ファイルのI/O失敗（権限、ロックなど）
/// - `ParseTimeout`: 単一ファイルの処理時間超過
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetscout::SheetScoutError;
/// use std::fs::File;
///
/// fn open_file(path: &str) -> Result<(), SheetScoutError> {
///     let _file = File::open(path)?;  // FileAccessエラーに自動変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetScoutError {
    /// 入力が不正な場合のエラー
    ///
    /// 空のキーワードセットでスキャンを要求した場合や、
    /// 指定されたファイルが存在しない場合に使用されます。
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 範囲指定の開始座標が終了座標より大きい場合のエラー
    ///
    /// `axis`には`"row"`または`"col"`が入ります。
    #[error("Invalid range: start {axis} ({start}) > end {axis} ({end})")]
    InvalidRange {
        /// 違反した軸
        axis: &'static str,
        /// 開始インデックス（0始まり）
        start: u32,
        /// 終了インデックス（0始まり）
        end: u32,
    },

    /// セル参照（例: `"A1"`）や列文字（例: `"N"`）が解釈できない場合のエラー
    #[error("Invalid cell reference: '{0}'")]
    InvalidCellReference(String),

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("File access error: {0}")]
    FileAccess(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// 区切りテキスト（CSV）の解析中に発生したエラー
    #[error("Failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// JSONのシリアライズ・デシリアライズ中に発生したエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 単一ファイルの処理が制限時間を超えた場合のエラー
    #[error("Processing '{path}' exceeded {seconds}s")]
    ParseTimeout {
        /// 対象ファイルのパス
        path: String,
        /// 制限時間（秒）
        seconds: u64,
    },

    /// キャンセル要求により処理が中断された
    #[error("Operation cancelled")]
    Cancelled,

    /// 設定の検証に失敗したエラー
    ///
    /// `ScannerBuilder::build()`や`SearchSettings::validate()`で
    /// 無効な設定が検出された場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use sheetscout::{ScannerBuilder, SheetScoutError};
    ///
    /// let result = ScannerBuilder::new().with_row_cap(0).build();
    ///
    /// match result {
    ///     Err(SheetScoutError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限（ファイルサイズ、グリッドサイズ）に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// ワーカープールの構築に失敗したエラー
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// 検索スレッドがパニックで終了したエラー
    #[error("Worker thread panicked during {0}")]
    WorkerPanicked(String),
}
