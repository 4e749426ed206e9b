//! Progress store: persisted session pointers and streak.

use serde::{Deserialize, Serialize};
use skillpilot_core::SessionPointer;
use skillpilot_error::{SkillPilotResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Key-value persistence for the last active task/step of each project
/// and for the streak count.
///
/// Pointers are stored by id only. Readers must re-resolve them against
/// the live tree before trusting them.
pub trait ProgressStore {
    /// Load the saved pointer for a project, `None` when nothing was saved.
    fn load_pointer(&self, project_id: &str) -> SkillPilotResult<Option<SessionPointer>>;

    /// Save the pointer for its project, replacing any previous one.
    fn save_pointer(&mut self, pointer: &SessionPointer) -> SkillPilotResult<()>;

    /// Forget the pointer for a project.
    fn clear_pointer(&mut self, project_id: &str) -> SkillPilotResult<()>;

    /// Load the persisted streak, zero when nothing was saved.
    fn load_streak(&self) -> SkillPilotResult<u32>;

    /// Save the streak.
    fn save_streak(&mut self, streak: u32) -> SkillPilotResult<()>;
}

/// HashMap-backed store. All data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    pointers: HashMap<String, SessionPointer>,
    streak: u32,
}

impl InMemoryProgressStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns true when no pointer is stored.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn load_pointer(&self, project_id: &str) -> SkillPilotResult<Option<SessionPointer>> {
        Ok(self.pointers.get(project_id).cloned())
    }

    fn save_pointer(&mut self, pointer: &SessionPointer) -> SkillPilotResult<()> {
        self.pointers
            .insert(pointer.project_id().clone(), pointer.clone());
        Ok(())
    }

    fn clear_pointer(&mut self, project_id: &str) -> SkillPilotResult<()> {
        self.pointers.remove(project_id);
        Ok(())
    }

    fn load_streak(&self) -> SkillPilotResult<u32> {
        Ok(self.streak)
    }

    fn save_streak(&mut self, streak: u32) -> SkillPilotResult<()> {
        self.streak = streak;
        Ok(())
    }
}

/// On-disk shape of a saved pointer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointerRecord {
    last_task_id: String,
    last_step_id: String,
}

/// On-disk shape of the saved streak.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreakRecord {
    code_streak: u32,
}

const STREAK_FILE: &str = "streak.json";

/// JSON files in a directory: `project_<id>_state.json` per project plus
/// `streak.json`.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> SkillPilotResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::Unavailable(format!(
                "Cannot create {}: {}",
                dir.display(),
                e
            )))
        })?;
        debug!("Progress store ready");
        Ok(Self { dir })
    }

    /// Directory holding the store's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn pointer_path(&self, project_id: &str) -> PathBuf {
        self.dir
            .join(format!("project_{}_state.json", sanitize(project_id)))
    }

    fn read_record<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> SkillPilotResult<Option<T>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::new(StorageErrorKind::Io(e.to_string())).into()),
        };
        let record = serde_json::from_str(&content).map_err(|e| {
            StorageError::new(StorageErrorKind::Deserialize(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Some(record))
    }

    fn write_record<T: Serialize>(&self, path: &Path, record: &T) -> SkillPilotResult<()> {
        let content = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialize(e.to_string())))?;
        std::fs::write(path, content)
            .map_err(|e| StorageError::new(StorageErrorKind::Io(e.to_string())))?;
        Ok(())
    }
}

impl ProgressStore for FileProgressStore {
    #[instrument(skip(self))]
    fn load_pointer(&self, project_id: &str) -> SkillPilotResult<Option<SessionPointer>> {
        let record: Option<PointerRecord> = self.read_record(&self.pointer_path(project_id))?;
        Ok(record.map(|r| SessionPointer::new(project_id, r.last_task_id, r.last_step_id)))
    }

    #[instrument(skip(self), fields(project = %pointer.project_id()))]
    fn save_pointer(&mut self, pointer: &SessionPointer) -> SkillPilotResult<()> {
        let record = PointerRecord {
            last_task_id: pointer.task_id().clone(),
            last_step_id: pointer.step_id().clone(),
        };
        self.write_record(&self.pointer_path(pointer.project_id()), &record)?;
        debug!("Session pointer saved");
        Ok(())
    }

    fn clear_pointer(&mut self, project_id: &str) -> SkillPilotResult<()> {
        match std::fs::remove_file(self.pointer_path(project_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::Io(e.to_string())).into()),
        }
    }

    fn load_streak(&self) -> SkillPilotResult<u32> {
        let record: Option<StreakRecord> = self.read_record(&self.dir.join(STREAK_FILE))?;
        Ok(record.map(|r| r.code_streak).unwrap_or(0))
    }

    fn save_streak(&mut self, streak: u32) -> SkillPilotResult<()> {
        self.write_record(
            &self.dir.join(STREAK_FILE),
            &StreakRecord {
                code_streak: streak,
            },
        )
    }
}

/// Keeps project ids from escaping the store directory.
///
/// Bytes outside `[A-Za-z0-9_-]` become `%XX`, so distinct ids never share
/// a file name.
fn sanitize(project_id: &str) -> String {
    let mut encoded = String::with_capacity(project_id.len());
    for byte in project_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_encodes_path_characters() {
        assert_eq!(sanitize("../etc/passwd"), "%2E%2E%2Fetc%2Fpasswd");
        assert_eq!(sanitize("python-101_a"), "python-101_a");
    }

    #[test]
    fn sanitize_keeps_distinct_ids_apart() {
        assert_eq!(sanitize("a.b"), "a%2Eb");
        assert_ne!(sanitize("a.b"), sanitize("a_b"));
        assert_ne!(sanitize("a%2Eb"), sanitize("a.b"));
        assert_eq!(sanitize("é"), "%C3%A9");
    }
}
