//! Search Module
//!
//! 複数ファイルを並列に検索するコーディネーター。
//!
//! 各ファイルは固定数のワーカーを持つスレッドプールで処理され、
//! 結果はイベント（[`SearchEvent`]）として通知されます。
//! 1ファイルの失敗やタイムアウトはバッチ全体を中断しません。

mod coordinator;
mod searcher;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use coordinator::{SearchCoordinator, SearchHandle};
pub use searcher::{FileSearcher, KeywordFileSearcher, MAX_FRAGMENTS};

/// デフォルトのワーカー数
pub const DEFAULT_WORKERS: usize = 4;

/// デフォルトのファイルごとのタイムアウト（秒）
pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 30;

/// 協調的キャンセルのためのトークン
///
/// クローンは同じフラグを共有します。キャンセル要求は取り消せません。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセルを要求
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// キャンセルが要求されたかどうか
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// ファイルごとの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 検索が完了した（一致の有無は問わない）
    Completed,

    /// 読み込みや解析に失敗した
    Failed(String),

    /// タイムアウトした
    TimedOut,

    /// キャンセルにより処理されなかった
    Abandoned,
}

/// 検索イベント
///
/// 1ファイルにつき、`FileProcessed`が必ず1回、一致があれば続けて`MatchFound`が1回、
/// その後`Progress`が通知されます。すべてのファイルの通知後に`BatchFinished`が1回通知されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// ファイルの処理が終わった
    FileProcessed {
        path: PathBuf,
        file_name: String,
        outcome: FileOutcome,
    },

    /// ファイル内でキーワードが見つかった
    MatchFound {
        path: PathBuf,
        file_name: String,
        /// 一致した文字列（重複なし、最大`MAX_FRAGMENTS`件）
        fragments: Vec<String>,
        /// `fragments`を`", "`で連結した文字列
        matched_text: String,
    },

    /// 進捗（処理済みファイル数 / 全ファイル数）
    Progress { current: usize, total: usize },

    /// バッチの処理がすべて終わった
    BatchFinished,
}
