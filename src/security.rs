//! Security Module
//!
//! ファイル読み込み時の制限を定義するモジュール。
//! 巨大なファイルや、疎なシートから生じる巨大なグリッドの展開を防ぎます。

use crate::error::SheetScoutError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
    /// 展開するグリッドの最大セル数（行数 × 列数）
    /// デフォルト: 50,000,000
    pub max_grid_cells: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
            max_grid_cells: 50_000_000,
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルサイズの検証
    pub fn check_file_size(&self, size: u64) -> Result<(), SheetScoutError> {
        if size > self.max_input_file_size {
            return Err(SheetScoutError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// 展開するグリッドサイズの検証
    pub fn check_grid_size(&self, rows: usize, cols: usize) -> Result<(), SheetScoutError> {
        let cells = (rows as u64).saturating_mul(cols as u64);
        if cells > self.max_grid_cells {
            return Err(SheetScoutError::SecurityViolation(format!(
                "Grid of {} x {} cells exceeds maximum of {} cells",
                rows, cols, self.max_grid_cells
            )));
        }
        Ok(())
    }
}
