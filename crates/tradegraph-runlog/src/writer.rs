use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::error::RunLogError;
use crate::record::RunRecord;

const LOG_DIR: &str = "TradingAgentsStrategy_logs";

/// Dated run records for one subject, as stored on disk.
pub type SubjectLog = BTreeMap<String, RunRecord>;

/// Writes run records as JSON under a results directory.
///
/// Each file holds every date this writer has logged for the subject, so
/// later runs rewrite the file with the accumulated map.
pub struct RunLogWriter {
    root: PathBuf,
    /// Sanitized subject → everything logged for it.
    logged: Mutex<HashMap<String, SubjectLog>>,
}

impl RunLogWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logged: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<subject>/TradingAgentsStrategy_logs/full_states_log_<date>.json`
    pub fn path_for(&self, subject: &str, as_of_date: &str) -> PathBuf {
        self.root
            .join(sanitize(subject))
            .join(LOG_DIR)
            .join(format!("full_states_log_{}.json", sanitize(as_of_date)))
    }

    /// Persist `record` and return the file it was written to.
    pub fn write(&self, record: RunRecord) -> Result<PathBuf, RunLogError> {
        if record.final_decision.trim().is_empty() {
            return Err(RunLogError::Incomplete(record.subject));
        }

        let path = self.path_for(&record.subject, &record.as_of_date);
        let subject = record.subject.clone();
        let run_id = record.run_id;

        // Keyed like the file name, so subjects sharing a file share a map.
        let mut logged = self.logged.lock().unwrap_or_else(|e| e.into_inner());
        let entries = logged.entry(sanitize(&subject)).or_default();
        entries.insert(record.as_of_date.clone(), record);

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&path, json)?;

        info!(subject = %subject, %run_id, path = %path.display(), "Run logged");
        Ok(path)
    }
}

/// Read a log file written by [`RunLogWriter`].
pub fn load(path: impl AsRef<Path>) -> Result<SubjectLog, RunLogError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Keep a path component inside its parent directory.
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}
