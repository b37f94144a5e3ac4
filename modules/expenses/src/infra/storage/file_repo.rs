//! JSON-file-backed repository.
//!
//! All expenses of all owners live in one in-memory `Vec` that mirrors a JSON
//! array on disk. Mutations run under the write lock as
//! clone → mutate → write temp file → fsync → rename → swap, so a failed write
//! leaves both memory and disk at the previous state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::contract::model::Expense;
use crate::domain::changes::ExpenseChanges;
use crate::domain::repo::{CategoryPolicy, ExpensesRepository, StorageKind};
use crate::infra::storage::record::ExpenseRecord;

const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";

pub struct FileExpensesRepository {
    path: PathBuf,
    records: RwLock<Vec<Expense>>,
}

impl FileExpensesRepository {
    /// Load the data file. A missing or unreadable file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path).await;
        Self {
            path,
            records: RwLock::new(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the collection and persist it. The copy becomes
    /// the live collection only after the file has been replaced. When `f`
    /// returns `None` nothing is written.
    async fn mutate<T, F>(&self, f: F) -> anyhow::Result<Option<T>>
    where
        F: FnOnce(&mut Vec<Expense>) -> Option<T>,
    {
        let mut live = self.records.write().await;
        let mut next = live.clone();
        let Some(out) = f(&mut next) else {
            return Ok(None);
        };
        persist(&self.path, &next).await?;
        *live = next;
        Ok(Some(out))
    }
}

#[async_trait::async_trait]
impl ExpensesRepository for FileExpensesRepository {
    fn kind(&self) -> StorageKind {
        StorageKind::File
    }

    fn category_policy(&self) -> CategoryPolicy {
        CategoryPolicy::FreeForm
    }

    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Expense>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|e| e.owner == owner).cloned().collect())
    }

    async fn find(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|e| e.owner == owner && e.id == id)
            .cloned())
    }

    async fn insert(&self, expense: Expense) -> anyhow::Result<()> {
        self.mutate(|all| {
            all.push(expense);
            Some(())
        })
        .await
        .context("insert failed")?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> anyhow::Result<Option<Expense>> {
        self.mutate(|all| {
            let current = all.iter_mut().find(|e| e.owner == owner && e.id == id)?;
            changes.apply_to(current);
            Some(current.clone())
        })
        .await
        .context("update failed")
    }

    async fn delete(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>> {
        self.mutate(|all| {
            let idx = all.iter().position(|e| e.owner == owner && e.id == id)?;
            Some(all.remove(idx))
        })
        .await
        .context("delete failed")
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn purge(&self) -> anyhow::Result<u64> {
        let removed = self
            .mutate(|all| {
                let n = all.len() as u64;
                all.clear();
                Some(n)
            })
            .await
            .context("purge failed")?;
        Ok(removed.unwrap_or_default())
    }
}

async fn load_records(path: &Path) -> Vec<Expense> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "Data file not found, starting with an empty store");
            return Vec::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read data file, starting with an empty store");
            set_aside(path).await;
            return Vec::new();
        }
    };

    let entries = match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Data file is not a JSON array, starting with an empty store");
            set_aside(path).await;
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<Expense> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<ExpenseRecord>(entry) {
            Ok(record) => Some(record.into()),
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "Skipping unreadable expense record");
                None
            }
        })
        .collect();

    let skipped = total - records.len();
    if skipped > 0 {
        keep_copy(path).await;
    }
    info!(path = %path.display(), count = records.len(), skipped, "Loaded expenses from data file");
    records
}

/// Move an unusable data file out of the way so the next flush cannot destroy it.
async fn set_aside(path: &Path) {
    let target = sibling_path(path, CORRUPT_SUFFIX);
    match fs::rename(path, &target).await {
        Ok(()) => warn!(path = %target.display(), "Unusable data file moved aside"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not move unusable data file aside"),
    }
}

/// Copy a partially readable data file aside; the skipped records only survive there.
async fn keep_copy(path: &Path) {
    let target = sibling_path(path, CORRUPT_SUFFIX);
    match fs::copy(path, &target).await {
        Ok(_) => warn!(path = %target.display(), "Copy of the data file with skipped records kept"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not copy data file aside"),
    }
}

async fn persist(path: &Path, expenses: &[Expense]) -> anyhow::Result<()> {
    let records: Vec<ExpenseRecord> = expenses.iter().cloned().map(Into::into).collect();
    let data = serde_json::to_vec_pretty(&records).context("failed to serialize expenses")?;

    let tmp = tmp_path(path);
    if let Err(e) = write_atomic(path, &tmp, &data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    debug!(path = %path.display(), count = records.len(), "Flushed expenses to data file");
    Ok(())
}

async fn write_atomic(path: &Path, tmp: &Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let mut file = fs::File::create(tmp)
        .await
        .with_context(|| format!("failed to create {}", tmp.display()))?;
    file.write_all(data)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    file.sync_all()
        .await
        .with_context(|| format!("failed to sync {}", tmp.display()))?;
    drop(file);
    fs::rename(tmp, path)
        .await
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    sibling_path(path, TMP_SUFFIX)
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_is_a_sibling() {
        assert_eq!(
            tmp_path(Path::new("/data/gastos.json")),
            PathBuf::from("/data/gastos.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("gastos")), PathBuf::from("gastos.tmp"));
    }

    #[test]
    fn corrupt_path_is_a_sibling() {
        assert_eq!(
            sibling_path(Path::new("/data/gastos.json"), CORRUPT_SUFFIX),
            PathBuf::from("/data/gastos.json.corrupt")
        );
    }

    fn coffee(owner: &str, id: &str) -> Expense {
        Expense {
            owner: owner.to_string(),
            id: id.to_string(),
            description: "Coffee".to_string(),
            amount: 3.5,
            tags: vec![],
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            category: None,
        }
    }

    #[tokio::test]
    async fn unparsable_file_starts_empty_and_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let repo = FileExpensesRepository::open(&path).await;
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(!path.exists());

        let corrupt = sibling_path(&path, CORRUPT_SUFFIX);
        assert_eq!(std::fs::read(&corrupt).unwrap(), b"{ not json");

        repo.insert(coffee("juan", "a")).await.unwrap();
        assert_eq!(std::fs::read(&corrupt).unwrap(), b"{ not json");
    }

    #[tokio::test]
    async fn bad_records_are_skipped_and_the_rest_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.json");
        let original = serde_json::json!([
            {"usuario": "juan", "gastoId": "a", "descripcion": "Cafe", "valor": 3.5,
             "etiquetas": [], "fecha": "2025-01-15"},
            {"usuario": "juan", "gastoId": "b", "descripcion": "Cine", "valor": 12.5,
             "etiquetas": [], "fecha": "15/01/2025"}
        ])
        .to_string();
        std::fs::write(&path, &original).unwrap();

        let repo = FileExpensesRepository::open(&path).await;
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find("juan", "a").await.unwrap().is_some());

        repo.insert(coffee("maria", "c")).await.unwrap();
        let on_disk: Vec<ExpenseRecord> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let ids: Vec<&str> = on_disk.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let kept = std::fs::read_to_string(sibling_path(&path, CORRUPT_SUFFIX)).unwrap();
        assert_eq!(kept, original);
    }

    #[tokio::test]
    async fn clean_file_leaves_no_copy_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.json");
        let repo = FileExpensesRepository::open(&path).await;
        repo.insert(coffee("juan", "a")).await.unwrap();

        let reopened = FileExpensesRepository::open(&path).await;
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert!(!sibling_path(&path, CORRUPT_SUFFIX).exists());
    }

    #[tokio::test]
    async fn missing_file_starts_empty_and_is_created_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gastos.json");

        let repo = FileExpensesRepository::open(&path).await;
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(!path.exists());

        assert_eq!(repo.purge().await.unwrap(), 0);
        let on_disk: Vec<ExpenseRecord> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(on_disk.is_empty());
        assert!(!tmp_path(&path).exists());
    }
}
