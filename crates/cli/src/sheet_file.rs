// Sheet files on disk
// One sheet per file: <dir>/<sheet_name>.<ext>. History goes to a JSON-lines
// log next to the sheet.

use std::fs::{self, OpenOptions};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use quantgrid_dsl::{HistoryAppender, HistoryRecord, SheetChange, SheetContentUpdater};

/// Sheet name of a file: its stem.
pub fn sheet_name_of(path: &Path) -> Result<String, String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("cannot derive a sheet name from {}", path.display()))
}

pub fn read_sheet(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))
}

/// Writes every changed sheet to its own file in one directory.
#[derive(Debug, Clone)]
pub struct SheetFileWriter {
    dir: PathBuf,
    extension: String,
}

impl SheetFileWriter {
    /// Writer for the directory and extension of `sheet_path`.
    pub fn beside(sheet_path: &Path) -> Self {
        let dir = sheet_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let extension = sheet_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("qg")
            .to_string();
        Self { dir, extension }
    }

    pub fn path_for(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", sheet_name, self.extension))
    }
}

impl SheetContentUpdater for SheetFileWriter {
    fn update_sheet_content(&self, changes: Vec<SheetChange>) -> impl Future<Output = bool> {
        let targets: Vec<(PathBuf, String)> = changes
            .into_iter()
            .map(|change| (self.path_for(&change.sheet_name), change.content))
            .collect();

        async move {
            for (path, content) in targets {
                if let Err(e) = smol::fs::write(&path, content).await {
                    log::warn!("Failed to write {}: {}", path.display(), e);
                    return false;
                }
                log::debug!("Wrote {}", path.display());
            }
            true
        }
    }
}

/// Appends one `HistoryRecord` JSON object per line.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// `<sheet file>.history.jsonl`
    pub fn for_sheet(sheet_path: &Path) -> Self {
        let mut name = sheet_path.as_os_str().to_owned();
        name.push(".history.jsonl");
        Self {
            path: PathBuf::from(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &HistoryRecord) -> Result<(), String> {
        let line = serde_json::to_string(record).map_err(|e| e.to_string())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| e.to_string())?;
        writeln!(file, "{}", line).map_err(|e| e.to_string())
    }

    pub fn records(&self) -> Result<Vec<HistoryRecord>, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.to_string()),
        };
        contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(|e| e.to_string()))
            .collect()
    }
}

impl HistoryAppender for HistoryLog {
    fn append_to(&self, title: &str, changes: &[SheetChange]) {
        let record = HistoryRecord {
            title: title.to_string(),
            changes: changes.to_vec(),
        };
        if let Err(e) = self.append(&record) {
            log::warn!("Failed to append history to {}: {}", self.path.display(), e);
        }
    }
}
