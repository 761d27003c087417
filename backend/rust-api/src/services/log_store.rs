use chrono::NaiveDate;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::error::Result;
use crate::metrics::LOG_WRITES_TOTAL;
use crate::models::LogEntry;
use crate::utils::time::{day_file_name, today};

/// Daily JSON-array log of generated questions.
///
/// The entries of the current day live in memory and are mirrored to
/// `<data_dir>/YYYY_MM_DD.json` by a full rewrite on every append. The day file
/// is loaded when the store opens and whenever the date rolls over, so entries
/// written by an earlier process are kept. All mutations run under one lock.
pub struct LogStore {
    data_dir: PathBuf,
    day: Mutex<DayLog>,
}

struct DayLog {
    date: NaiveDate,
    path: PathBuf,
    entries: Vec<LogEntry>,
    // Entries for a new day whose file could not be loaded yet.
    pending: Vec<LogEntry>,
}

impl LogStore {
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let day = DayLog::load(&data_dir, today()).await?;
        tracing::info!(
            "Log store opened at {} with {} existing entries",
            day.path.display(),
            day.entries.len()
        );
        Ok(Self {
            data_dir,
            day: Mutex::new(day),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Adds `entry` to today's log and rewrites the file. On a write failure the
    /// entry stays in memory and is included by the next successful write.
    pub async fn append(&self, entry: LogEntry) -> Result<usize> {
        self.append_on(today(), entry).await
    }

    async fn append_on(&self, date: NaiveDate, entry: LogEntry) -> Result<usize> {
        let mut day = self.day.lock().await;
        if day.date != date {
            tracing::info!("Log date rolled over to {}", date);
            match DayLog::load(&self.data_dir, date).await {
                Ok(mut next) => {
                    next.entries.append(&mut day.pending);
                    *day = next;
                }
                Err(e) => {
                    day.pending.push(entry);
                    LOG_WRITES_TOTAL.with_label_values(&["error"]).inc();
                    tracing::error!(
                        "Failed to load log for {}, {} entries pending: {}",
                        date,
                        day.pending.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        day.entries.push(entry);
        match process_and_write(&day.path, &day.entries).await {
            Ok(()) => {
                LOG_WRITES_TOTAL.with_label_values(&["success"]).inc();
                Ok(day.entries.len())
            }
            Err(e) => {
                LOG_WRITES_TOTAL.with_label_values(&["error"]).inc();
                tracing::error!("Failed to write log file {}: {}", day.path.display(), e);
                Err(e.into())
            }
        }
    }

    pub async fn current_path(&self) -> PathBuf {
        self.day.lock().await.path.clone()
    }

    pub async fn entries(&self) -> Vec<LogEntry> {
        self.day.lock().await.entries.clone()
    }
}

impl DayLog {
    async fn load(data_dir: &Path, date: NaiveDate) -> Result<Self> {
        let path = file_name_for(data_dir, date).await?;
        initial_file(&path).await?;
        let entries = load_entries(&path).await?;
        Ok(Self {
            date,
            path,
            entries,
            pending: Vec::new(),
        })
    }
}

/// Path of the log file for `date`, creating `data_dir` if needed.
pub async fn file_name_for(data_dir: &Path, date: NaiveDate) -> std::io::Result<PathBuf> {
    fs::create_dir_all(data_dir).await?;
    Ok(data_dir.join(day_file_name(date)))
}

pub async fn file_name_by_time(data_dir: &Path) -> std::io::Result<PathBuf> {
    file_name_for(data_dir, today()).await
}

/// Creates `path` if missing and writes `[]` into it when empty. Existing content is
/// never truncated.
pub async fn initial_file(path: &Path) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    if file.metadata().await?.len() == 0 {
        file.write_all(b"[]").await?;
        file.flush().await?;
    }
    Ok(())
}

async fn load_entries(path: &Path) -> std::io::Result<Vec<LogEntry>> {
    let raw = fs::read_to_string(path).await?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|e| {
        Error::new(
            ErrorKind::InvalidData,
            format!("{} is not a JSON array of log entries: {}", path.display(), e),
        )
    })
}

/// Replaces the content of `path` with `entries` as a 2-space indented JSON array.
/// The data goes to a sibling temp file first and is renamed over `path`, so a failed
/// write leaves the previous content in place.
pub async fn process_and_write(path: &Path, entries: &[LogEntry]) -> std::io::Result<()> {
    let data = serde_json::to_vec_pretty(entries)?;
    let tmp = temp_path_for(path);

    let written = write_synced(&tmp, &data).await;
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    fs::rename(&tmp, path).await
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;
    use crate::models::{QuizRecord, RequestEcho};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn entry(question: &str) -> LogEntry {
        LogEntry {
            request: RequestEcho {
                model: "tongyi".into(),
                language: "go".into(),
                kind: "1".into(),
                keyword: "channel".into(),
            },
            response: QuizRecord {
                question: question.into(),
                options: vec!["A: a".into(), "B: b".into()],
                answer: "A".into(),
                explanation: "E".into(),
            },
            start_time: "2025-03-07T10:00:00.000+08:00".into(),
            end_time: "2025-03-07T10:00:01.500+08:00".into(),
            cost_seconds: 1.5,
        }
    }

    async fn read_entries(path: &Path) -> Vec<LogEntry> {
        let raw = fs::read_to_string(path).await.unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_dir_and_empty_array() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        let store = LogStore::open(&data_dir).await.unwrap();
        let path = store.current_path().await;

        assert!(path.starts_with(&data_dir));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[]");
        assert!(store.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_initial_file_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2025_03_07.json");
        fs::write(&path, "[{\"aiCostTime\": 1.0}]").await.unwrap();

        initial_file(&path).await.unwrap();
        assert_eq!(
            fs::read_to_string(&path).await.unwrap(),
            "[{\"aiCostTime\": 1.0}]"
        );
    }

    #[tokio::test]
    async fn test_initial_file_fills_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2025_03_07.json");
        fs::write(&path, "").await.unwrap();

        initial_file(&path).await.unwrap();
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_append_rewrites_pretty_array() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::open(dir.path()).await.unwrap();

        assert_eq!(store.append(entry("first")).await.unwrap(), 1);
        assert_eq!(store.append(entry("second")).await.unwrap(), 2);

        let path = store.current_path().await;
        let raw = fs::read_to_string(&path).await.unwrap();
        assert!(raw.starts_with("[\n  {\n    \"aiReq\""));

        let stored = read_entries(&path).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].response.question, "first");
        assert_eq!(stored[1].response.question, "second");
        assert!(!temp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_reopen_keeps_entries_from_disk() {
        let dir = TempDir::new().unwrap();
        {
            let store = LogStore::open(dir.path()).await.unwrap();
            store.append(entry("before restart")).await.unwrap();
        }

        let store = LogStore::open(dir.path()).await.unwrap();
        store.append(entry("after restart")).await.unwrap();

        let stored = read_entries(&store.current_path().await).await;
        let questions: Vec<_> = stored.iter().map(|e| e.response.question.as_str()).collect();
        assert_eq!(questions, vec!["before restart", "after restart"]);
    }

    #[tokio::test]
    async fn test_open_refuses_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = file_name_by_time(dir.path()).await.unwrap();
        fs::write(&path, "[{\"aiReq\": ").await.unwrap();

        let result = LogStore::open(dir.path()).await;
        assert!(matches!(result, Err(QuizError::Persistence(_))));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[{\"aiReq\": ");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_file_and_memory() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::open(dir.path()).await.unwrap();
        store.append(entry("one")).await.unwrap();

        let path = store.current_path().await;
        let before = fs::read_to_string(&path).await.unwrap();

        // A directory squatting on the temp path makes the write fail.
        let tmp = temp_path_for(&path);
        fs::create_dir(&tmp).await.unwrap();
        let result = store.append(entry("two")).await;
        assert!(matches!(result, Err(QuizError::Persistence(_))));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), before);
        assert_eq!(store.entries().await.len(), 2);

        fs::remove_dir(&tmp).await.unwrap();
        store.append(entry("three")).await.unwrap();
        let questions: Vec<_> = read_entries(&path)
            .await
            .into_iter()
            .map(|e| e.response.question)
            .collect();
        assert_eq!(questions, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_date_rollover_starts_new_file() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::open(dir.path()).await.unwrap();
        let first_day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();

        store.append_on(first_day, entry("friday")).await.unwrap();
        store.append_on(next_day, entry("saturday")).await.unwrap();

        let friday = read_entries(&dir.path().join("2025_03_07.json")).await;
        let saturday = read_entries(&dir.path().join("2025_03_08.json")).await;
        assert_eq!(friday.len(), 1);
        assert_eq!(saturday.len(), 1);
        assert_eq!(saturday[0].response.question, "saturday");
        assert_eq!(store.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_rollover_keeps_entry_for_next_write() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::open(dir.path()).await.unwrap();
        let first_day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        store.append_on(first_day, entry("friday")).await.unwrap();

        let saturday_path = dir.path().join("2025_03_08.json");
        fs::write(&saturday_path, "[{").await.unwrap();
        let result = store.append_on(next_day, entry("late friday night")).await;
        assert!(matches!(result, Err(QuizError::Persistence(_))));
        assert_eq!(fs::read_to_string(&saturday_path).await.unwrap(), "[{");

        fs::write(&saturday_path, "[]").await.unwrap();
        assert_eq!(store.append_on(next_day, entry("saturday")).await.unwrap(), 2);

        let questions: Vec<_> = read_entries(&saturday_path)
            .await
            .into_iter()
            .map(|e| e.response.question)
            .collect();
        assert_eq!(questions, vec!["late friday night", "saturday"]);
        assert_eq!(read_entries(&dir.path().join("2025_03_07.json")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_persisted() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(LogStore::open(dir.path()).await.unwrap());

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(entry(&format!("q{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = read_entries(&store.current_path().await).await;
        assert_eq!(stored.len(), 20);
        for i in 0..20 {
            let question = format!("q{i}");
            assert!(stored.iter().any(|e| e.response.question == question));
        }
    }
}
