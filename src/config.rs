//! Config Module
//!
//! 検索設定の永続化（JSONファイル）。
//! ファイルに存在しないキーはデフォルト値になります。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::MatchMode;
use crate::boundary::{BoundaryConfig, DEFAULT_BOUNDARY_MARKERS, DEFAULT_END_COLUMN, DEFAULT_ROW_CAP};
use crate::error::SheetScoutError;
use crate::keywords::KeywordSet;
use crate::types::column_number;

/// 永続化される検索設定
///
/// ```json
/// {
///   "last_folder": "/home/user/quotes",
///   "exact_match": true,
///   "col_end_keywords": "E. & O.E.;SUB-TOTAL",
///   "row_end": "N",
///   "max_rows": 1000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// 最後に開いたフォルダー
    pub last_folder: Option<String>,

    /// 完全一致で照合するか
    pub exact_match: bool,

    /// 境界マーカー（`;`区切り）
    pub col_end_keywords: String,

    /// 終端列の列文字
    pub row_end: String,

    /// 走査する最大行数
    pub max_rows: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            last_folder: None,
            exact_match: true,
            col_end_keywords: DEFAULT_BOUNDARY_MARKERS.to_string(),
            row_end: DEFAULT_END_COLUMN.to_string(),
            max_rows: DEFAULT_ROW_CAP,
        }
    }
}

impl SearchSettings {
    /// JSONファイルから設定を読み込む
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::FileAccess`: ファイルを読み込めない場合
    /// * `SheetScoutError::Json`: JSONとして解釈できない場合
    /// * `SheetScoutError::Config`: 値が不正な場合
    pub fn load(path: &Path) -> Result<Self, SheetScoutError> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// JSONファイルから設定を読み込む（ファイルがない場合はデフォルト）
    pub fn load_or_default(path: &Path) -> Result<Self, SheetScoutError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// JSONファイルに設定を保存する
    pub fn save(&self, path: &Path) -> Result<(), SheetScoutError> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// 設定値を検証する
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::Config`: `max_rows`が0、または`row_end`が列文字でない場合
    pub fn validate(&self) -> Result<(), SheetScoutError> {
        if self.max_rows == 0 {
            return Err(SheetScoutError::Config(
                "max_rows must be greater than 0".to_string(),
            ));
        }
        column_number(&self.row_end).map_err(|_| {
            SheetScoutError::Config(format!("Invalid row_end column letters: '{}'", self.row_end))
        })?;
        Ok(())
    }

    /// 照合方式
    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_exact(self.exact_match)
    }

    /// 境界マーカー
    pub fn markers(&self) -> KeywordSet {
        KeywordSet::parse(&self.col_end_keywords)
    }

    /// 境界設定
    pub fn boundary(&self) -> BoundaryConfig {
        BoundaryConfig {
            markers: self.markers(),
            end_column: self.row_end.trim().to_ascii_uppercase(),
            row_cap: self.max_rows,
        }
    }
}
