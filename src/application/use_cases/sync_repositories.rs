use crate::application::services::RepositoryMirror;
use crate::domain::entities::{
    MirrorError, OutcomeStatus, RepositoryDescriptor, SyncMode, SyncOutcome,
};
use crate::infrastructure::scm::ScmOperations;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info};

/// キャンセル要求を発行する側
#[derive(Debug)]
pub struct CancellationHandle {
    sender: watch::Sender<bool>,
}

impl CancellationHandle {
    /// 実行中のワーカーにキャンセルを通知（協調的、キューの取り出し時点でのみ有効）
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// ワーカーが参照するキャンセル状態
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// 対になるハンドルと共に作成
    pub fn new() -> (CancellationHandle, CancellationSignal) {
        let (sender, receiver) = watch::channel(false);
        (CancellationHandle { sender }, CancellationSignal { receiver })
    }

    /// キャンセルされることのないシグナル
    pub fn never() -> Self {
        Self::new().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// 同期結果の集計
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    pub cloned: usize,
    pub already_present: usize,
    pub updated: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,

    /// 失敗した操作の結果
    pub failures: Vec<SyncOutcome>,
}

impl SyncSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a SyncOutcome>) -> Self {
        let mut summary = Self::new();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome.status() {
            OutcomeStatus::Cloned => self.cloned += 1,
            OutcomeStatus::AlreadyPresent => self.already_present += 1,
            OutcomeStatus::Updated => self.updated += 1,
            OutcomeStatus::UpToDate => self.up_to_date += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Failed => {
                self.failed += 1;
                self.failures.push(outcome.clone());
            }
        }
    }

    pub fn total(&self) -> usize {
        self.cloned
            + self.already_present
            + self.updated
            + self.up_to_date
            + self.skipped
            + self.failed
    }

    /// 終了コードを非0にすべきか（スキップと既存は失敗に数えない）
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// リポジトリ同期エンジン（固定数ワーカーのプール）
///
/// 全ディスクリプタを共有キューに投入し、W個のワーカーがそれを取り出して処理する。
/// 出力チャネルは全ワーカーの終了後にのみ閉じられるため、キャンセルがなければ
/// 受信側は入力1件につきちょうど1件の結果を受け取る。順序は保証しない。
pub struct SyncEngine<S: ScmOperations + 'static> {
    /// リポジトリ単位のアダプタ（全ワーカーで共有）
    mirror: Arc<RepositoryMirror<S>>,

    /// ワーカー数（1以上）
    workers: usize,
}

impl<S: ScmOperations + 'static> SyncEngine<S> {
    /// 新しいSyncEngineインスタンスを作成
    pub fn new(mirror: RepositoryMirror<S>, workers: usize) -> Self {
        Self {
            mirror: Arc::new(mirror),
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn mirror(&self) -> &RepositoryMirror<S> {
        &self.mirror
    }

    /// 同期を開始し、結果のストリームを返す
    ///
    /// Tokioランタイム内から呼び出すこと。各ディスクリプタは一度だけキューに入るため、
    /// 同じリポジトリへの操作が並行することはない。
    pub fn run(
        &self,
        repositories: Vec<RepositoryDescriptor>,
        mode: SyncMode,
        cancel: CancellationSignal,
    ) -> mpsc::Receiver<SyncOutcome> {
        let capacity = repositories.len().max(1);
        let (work_tx, work_rx) = mpsc::channel::<RepositoryDescriptor>(capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel::<SyncOutcome>(capacity);

        info!(
            "{} of {} repositories with {} workers",
            mode,
            repositories.len(),
            self.workers
        );

        // プロデューサー: 全件を最初に投入
        tokio::spawn(async move {
            for repo in repositories {
                if work_tx.send(repo).await.is_err() {
                    break;
                }
            }
        });

        let queue = Arc::new(Mutex::new(work_rx));
        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    Arc::clone(&self.mirror),
                    Arc::clone(&queue),
                    outcome_tx.clone(),
                    mode,
                    cancel.clone(),
                ))
            })
            .collect();

        // クローザー: 全ワーカーの終了を待ってから出力を閉じる
        tokio::spawn(async move {
            for (id, result) in join_all(handles).await.into_iter().enumerate() {
                if let Err(e) = result {
                    error!("sync worker {} terminated abnormally: {}", id, e);
                }
            }
            drop(outcome_tx);
            debug!("all sync workers finished");
        });

        outcome_rx
    }
}

async fn worker<S: ScmOperations>(
    id: usize,
    mirror: Arc<RepositoryMirror<S>>,
    queue: Arc<Mutex<mpsc::Receiver<RepositoryDescriptor>>>,
    outcomes: mpsc::Sender<SyncOutcome>,
    mode: SyncMode,
    cancel: CancellationSignal,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(repo) = next else {
            break;
        };

        // 取り出し後にキャンセルを検知した場合は結果を出さずに破棄
        if cancel.is_cancelled() {
            debug!("worker {} abandoning {} after cancellation", id, repo);
            break;
        }

        debug!("worker {} processing {}", id, repo);
        let outcome = process(&mirror, repo, mode).await;

        if outcomes.send(outcome).await.is_err() {
            // 受信側が破棄された
            break;
        }
    }
}

async fn process<S: ScmOperations>(
    mirror: &RepositoryMirror<S>,
    repo: RepositoryDescriptor,
    mode: SyncMode,
) -> SyncOutcome {
    match mode {
        SyncMode::Clone if mirror.exists(&repo) => {
            // 既存のツリーには触れない（権限も変更しない）
            let path = repo.local_path(mirror.root());
            SyncOutcome::failed(
                repo,
                SyncMode::Clone,
                MirrorError::AlreadyExists { path },
                Duration::ZERO,
            )
        }
        SyncMode::Clone => mirror.clone_repository(&repo).await,
        SyncMode::Update if !mirror.exists(&repo) => SyncOutcome::skipped(repo),
        SyncMode::Update => mirror.update_repository(&repo).await,
    }
}
