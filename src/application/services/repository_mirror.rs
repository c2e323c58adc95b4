use crate::domain::entities::{MirrorError, RepositoryDescriptor, SyncMode, SyncOutcome};
use crate::domain::value_objects::{CloneProtocol, SealState};
use crate::infrastructure::filesystem::{seal_tree, SealGuard};
use crate::infrastructure::scm::ScmOperations;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// 1リポジトリ単位でローカルミラーを操作するアダプタ
///
/// ミラーツリーは操作中を除いて常に読み取り専用に保たれる。
/// 同じリポジトリに対する操作を並行して呼び出してはならない。
pub struct RepositoryMirror<S: ScmOperations> {
    /// ミラーのルートディレクトリ
    root: PathBuf,

    /// バージョン管理ツール
    scm: S,

    /// クローン時に使うアドレスの種類
    protocol: CloneProtocol,
}

impl<S: ScmOperations> RepositoryMirror<S> {
    /// 新しいRepositoryMirrorインスタンスを作成
    pub fn new(root: impl Into<PathBuf>, scm: S) -> Self {
        Self {
            root: root.into(),
            scm,
            protocol: CloneProtocol::default(),
        }
    }

    pub fn with_protocol(mut self, protocol: CloneProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ローカルパスが存在するか（stat失敗も「存在しない」扱い）
    pub fn exists(&self, repo: &RepositoryDescriptor) -> bool {
        repo.local_path(&self.root).try_exists().unwrap_or(false)
    }

    /// リポジトリをクローンし、ツリーを読み取り専用にする
    pub async fn clone_repository(&self, repo: &RepositoryDescriptor) -> SyncOutcome {
        let start = Instant::now();
        let path = repo.local_path(&self.root);

        if self.exists(repo) {
            debug!("{} already exists at {}", repo, path.display());
            return SyncOutcome::failed(
                repo.clone(),
                SyncMode::Clone,
                MirrorError::AlreadyExists { path },
                start.elapsed(),
            );
        }

        match self.clone_and_seal(repo, &path).await {
            Ok(()) => {
                debug!("cloned {} into {}", repo, path.display());
                SyncOutcome::succeeded(repo.clone(), SyncMode::Clone, start.elapsed())
            }
            Err(error) => {
                debug!("clone of {} failed: {}", repo, error);
                // クローン済みで封印だけ失敗した場合、ツリーは書き込み可能なまま残る
                let seal = matches!(error, MirrorError::PermissionRestoreFailed { .. })
                    .then_some(SealState::Unsealed);
                SyncOutcome::failed(repo.clone(), SyncMode::Clone, error, start.elapsed())
                    .with_seal(seal)
            }
        }
    }

    async fn clone_and_seal(
        &self,
        repo: &RepositoryDescriptor,
        path: &Path,
    ) -> Result<(), MirrorError> {
        // 親ディレクトリ（オーナー単位）を作成
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MirrorError::clone_failed(
                    &repo.full_name,
                    format!("failed to create {}: {}", parent.display(), e),
                )
            })?;
        }

        let address = repo.clone_address(self.protocol);
        debug!("cloning {} from {}", repo, address);

        if let Err(e) = self.scm.clone_repository(address, path).await {
            // 途中まで作られたツリーは次回の再試行のために削除する
            discard_partial_clone(path);
            return Err(MirrorError::clone_failed(&repo.full_name, e.diagnostic()));
        }

        seal_tree(path).map_err(|e| MirrorError::permission_restore_failed(path, e.to_string()))
    }

    /// 既存ミラーをリモートに追従させる
    ///
    /// 書き込み可能にする → 旧HEAD取得 → fetch → 新HEAD取得 → 読み取り専用に戻す、の順に
    /// 厳密に逐次実行する。HEADが変わった場合のみ `updated` が立つ。
    pub async fn update_repository(&self, repo: &RepositoryDescriptor) -> SyncOutcome {
        let start = Instant::now();
        let path = repo.local_path(&self.root);

        if !self.exists(repo) {
            return SyncOutcome::failed(
                repo.clone(),
                SyncMode::Update,
                MirrorError::NotFound { path },
                start.elapsed(),
            );
        }

        let guard = match SealGuard::unseal(&path) {
            Ok(guard) => guard,
            Err(e) => {
                let error = MirrorError::update_failed(
                    &repo.full_name,
                    format!("could not make {} writable: {}", path.display(), e),
                );
                return SyncOutcome::failed(repo.clone(), SyncMode::Update, error, start.elapsed());
            }
        };

        match self.fetch_unsealed(repo, &path).await {
            Ok(updated) => match guard.seal() {
                Ok(()) => {
                    debug!("updated {} (changed: {})", repo, updated);
                    SyncOutcome::succeeded(repo.clone(), SyncMode::Update, start.elapsed())
                        .with_updated(updated)
                }
                Err(e) => SyncOutcome::failed(
                    repo.clone(),
                    SyncMode::Update,
                    MirrorError::permission_restore_failed(&path, e.to_string()),
                    start.elapsed(),
                )
                .with_seal(Some(SealState::Unsealed)),
            },
            Err(error) => {
                // 主エラーはfetch側。再封印の失敗はログのみ
                let seal = reseal_best_effort(guard);
                SyncOutcome::failed(repo.clone(), SyncMode::Update, error, start.elapsed())
                    .with_seal(Some(seal))
            }
        }
    }

    async fn fetch_unsealed(
        &self,
        repo: &RepositoryDescriptor,
        path: &Path,
    ) -> Result<bool, MirrorError> {
        let old_head = self.current_revision(repo, path).await?;

        self.scm
            .sync_repository(path)
            .await
            .map_err(|e| MirrorError::update_failed(&repo.full_name, e.diagnostic()))?;

        let new_head = self.current_revision(repo, path).await?;
        debug!("{}: {:?} -> {:?}", repo, old_head, new_head);

        Ok(old_head != new_head)
    }

    async fn current_revision(
        &self,
        repo: &RepositoryDescriptor,
        path: &Path,
    ) -> Result<Option<String>, MirrorError> {
        self.scm.get_current_revision(path).await.map_err(|e| {
            MirrorError::update_failed(
                &repo.full_name,
                format!("failed to read HEAD: {}", e.diagnostic()),
            )
        })
    }
}

fn reseal_best_effort(guard: SealGuard) -> SealState {
    let path = guard.path().to_path_buf();
    match guard.seal() {
        Ok(()) => SealState::Sealed,
        Err(e) => {
            warn!("failed to restore read-only permissions for {}: {}", path.display(), e);
            SealState::Unsealed
        }
    }
}

fn discard_partial_clone(path: &Path) {
    if !path.exists() {
        return;
    }

    if let Err(e) = fs::remove_dir_all(path) {
        warn!("failed to remove partial clone at {}: {}", path.display(), e);
    }
}
