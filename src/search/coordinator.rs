//! Search Coordinator
//!
//! ファイルごとの検索タスクをrayonのスレッドプールに投入し、
//! 投入順に結果を回収してイベントとして通知します。

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SheetScoutError;
use crate::search::{
    CancellationToken, FileOutcome, FileSearcher, SearchEvent, DEFAULT_FILE_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};

type TaskResult = Result<Vec<String>, SheetScoutError>;

/// 結果待ちの間にキャンセルを確認する間隔
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 複数ファイル検索のコーディネーター
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use sheetscout::{
///     BoundaryConfig, KeywordFileSearcher, KeywordSet, MatchMode, SearchCoordinator,
///     SearchEvent,
/// };
///
/// # fn main() -> Result<(), sheetscout::SheetScoutError> {
/// let searcher = KeywordFileSearcher::new(
///     KeywordSet::parse("Total;GST"),
///     MatchMode::Substring,
///     BoundaryConfig::default(),
/// )?;
/// let coordinator = SearchCoordinator::new(Arc::new(searcher));
///
/// let files = vec![PathBuf::from("quote.xlsx"), PathBuf::from("notes.txt")];
/// coordinator.run(&files, |event| {
///     if let SearchEvent::MatchFound { file_name, matched_text, .. } = event {
///         println!("{}: {}", file_name, matched_text);
///     }
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchCoordinator {
    searcher: Arc<dyn FileSearcher>,
    workers: usize,
    file_timeout: Duration,
    token: CancellationToken,
}

impl SearchCoordinator {
    /// デフォルト設定（4ワーカー、30秒タイムアウト）でコーディネーターを生成
    pub fn new(searcher: Arc<dyn FileSearcher>) -> Self {
        Self {
            searcher,
            workers: DEFAULT_WORKERS,
            file_timeout: Duration::from_secs(DEFAULT_FILE_TIMEOUT_SECS),
            token: CancellationToken::new(),
        }
    }

    /// ワーカー数を設定（0は1として扱う）
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// ファイルごとのタイムアウトを設定
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.file_timeout = timeout;
        self
    }

    /// 外部のキャンセルトークンを使用
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// このコーディネーターのキャンセルトークン
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// バッチ検索を呼び出し元のスレッドで実行する
    ///
    /// イベントは`on_event`に順に渡されます。各ファイルの失敗・タイムアウト・
    /// キャンセルは`FileProcessed`の`outcome`として通知され、エラーにはなりません。
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::ThreadPool`: スレッドプールを生成できなかった場合
    pub fn run<F>(&self, files: &[PathBuf], mut on_event: F) -> Result<(), SheetScoutError>
    where
        F: FnMut(SearchEvent),
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|index| format!("sheetscout-worker-{}", index))
            // 送信側が破棄されるため、該当ファイルは結果なしの失敗として回収される
            .panic_handler(|_| tracing::warn!("Search task panicked"))
            .build()?;

        let total = files.len();
        tracing::debug!(
            "Starting batch search: {} files, {} workers",
            total,
            self.workers
        );

        // 投入: キャンセルされたら以降のファイルは投入しない
        let mut pending: Vec<Option<Receiver<TaskResult>>> = Vec::with_capacity(total);
        for path in files {
            if self.token.is_cancelled() {
                pending.push(None);
                continue;
            }
            let (sender, receiver) = mpsc::channel();
            let searcher = Arc::clone(&self.searcher);
            let token = self.token.clone();
            let path = path.clone();
            pool.spawn(move || {
                let result = if token.is_cancelled() {
                    Err(SheetScoutError::Cancelled)
                } else {
                    searcher.search(&path, &token)
                };
                // 受信側がタイムアウトで破棄されている場合は送信に失敗するが問題ない
                let _ = sender.send(result);
            });
            pending.push(Some(receiver));
        }

        // 回収: 投入順に1ファイルずつ待つ
        for (index, (path, receiver)) in files.iter().zip(pending).enumerate() {
            let (outcome, fragments) = match receiver {
                None => (FileOutcome::Abandoned, Vec::new()),
                Some(receiver) => self.wait_for_result(path, &receiver),
            };

            let file_name = file_name_of(path);
            on_event(SearchEvent::FileProcessed {
                path: path.clone(),
                file_name: file_name.clone(),
                outcome,
            });
            if !fragments.is_empty() {
                let matched_text = fragments.join(", ");
                on_event(SearchEvent::MatchFound {
                    path: path.clone(),
                    file_name,
                    fragments,
                    matched_text,
                });
            }
            on_event(SearchEvent::Progress {
                current: index + 1,
                total,
            });
        }

        on_event(SearchEvent::BatchFinished);
        tracing::debug!("Batch search finished");
        Ok(())
    }

    /// バッチ検索を専用スレッドで開始する
    ///
    /// 戻り値の[`SearchHandle`]からイベントを受信し、キャンセルを要求できます。
    pub fn spawn(&self, files: Vec<PathBuf>) -> SearchHandle {
        let (sender, events) = mpsc::channel();
        let coordinator = self.clone();
        let token = self.token.clone();
        let join = thread::spawn(move || {
            coordinator.run(&files, |event| {
                // 受信側が破棄されても検索は最後まで続ける
                let _ = sender.send(event);
            })
        });
        SearchHandle {
            events,
            token,
            join,
        }
    }

    /// 制限時間まで短い間隔で結果を待つ
    ///
    /// キャンセルされた時点で待機をやめます。届いている結果だけを採用し、
    /// 未完了なら`None`を返します。
    fn poll_result(
        &self,
        receiver: &Receiver<TaskResult>,
    ) -> Option<Result<TaskResult, RecvTimeoutError>> {
        let deadline = Instant::now() + self.file_timeout;
        loop {
            if self.token.is_cancelled() {
                return match receiver.try_recv() {
                    Ok(result) => Some(Ok(result)),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => Some(Err(RecvTimeoutError::Disconnected)),
                };
            }
            let now = Instant::now();
            if now >= deadline {
                return Some(Err(RecvTimeoutError::Timeout));
            }
            match receiver.recv_timeout(CANCEL_POLL_INTERVAL.min(deadline - now)) {
                Err(RecvTimeoutError::Timeout) => continue,
                received => return Some(received),
            }
        }
    }

    /// 1ファイル分の結果を待つ
    fn wait_for_result(
        &self,
        path: &Path,
        receiver: &Receiver<TaskResult>,
    ) -> (FileOutcome, Vec<String>) {
        let received = match self.poll_result(receiver) {
            Some(received) => received,
            None => return (FileOutcome::Abandoned, Vec::new()),
        };

        match received {
            Ok(Ok(fragments)) => {
                tracing::debug!("Processed {}: {} matches", path.display(), fragments.len());
                (FileOutcome::Completed, fragments)
            }
            Ok(Err(SheetScoutError::Cancelled)) => (FileOutcome::Abandoned, Vec::new()),
            Ok(Err(e)) => {
                tracing::warn!("Failed to search {}: {}", path.display(), e);
                (FileOutcome::Failed(e.to_string()), Vec::new())
            }
            Err(RecvTimeoutError::Timeout) => {
                let error = SheetScoutError::ParseTimeout {
                    path: path.display().to_string(),
                    seconds: self.file_timeout.as_secs(),
                };
                tracing::warn!("{}", error);
                (FileOutcome::TimedOut, Vec::new())
            }
            Err(RecvTimeoutError::Disconnected) => {
                let message = "search task terminated without a result".to_string();
                tracing::warn!("Failed to search {}: {}", path.display(), message);
                (FileOutcome::Failed(message), Vec::new())
            }
        }
    }
}

/// 専用スレッドで実行中のバッチ検索
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    token: CancellationToken,
    join: JoinHandle<Result<(), SheetScoutError>>,
}

impl SearchHandle {
    /// イベントの受信側
    ///
    /// `BatchFinished`の後、送信側が閉じられます。
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// キャンセルを要求
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 検索スレッドの終了を待つ
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::ThreadPool`: スレッドプールを生成できなかった場合
    /// * `SheetScoutError::WorkerPanicked`: 検索スレッドがパニックした場合
    pub fn join(self) -> Result<(), SheetScoutError> {
        self.join
            .join()
            .map_err(|_| SheetScoutError::WorkerPanicked("batch search".to_string()))?
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
