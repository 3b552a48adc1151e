use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::engine::progress::ProgressData;
use crate::error::{Error, Result};
use crate::store::schema::{EXPORT_VERSION, ExportData, HistoryData};

const PROGRESS_FILE: &str = "progress.json";
const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

fn write_synced(path: &Path, json: &str) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taja");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing files are defaults; unreadable ones are logged and treated the same.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(Error::from));
        match parsed {
            Ok(data) => data,
            Err(e) => {
                log::warn!("{}: {e}; starting fresh", path.display());
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(data)?;
        write_synced(&tmp_path, &json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_progress(&self) -> ProgressData {
        let progress: ProgressData = self.load(PROGRESS_FILE);
        if progress.needs_reset() {
            log::warn!("progress schema {} is stale; resetting", progress.schema_version);
            return ProgressData::default();
        }
        progress
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save(PROGRESS_FILE, data)
    }

    pub fn load_history(&self) -> HistoryData {
        let history: HistoryData = self.load(HISTORY_FILE);
        if history.needs_reset() {
            log::warn!("history schema {} is stale; resetting", history.schema_version);
            return HistoryData::default();
        }
        history
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            taja_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            progress: self.load_progress(),
            history: self.load_history(),
        }
    }

    pub fn export_to(&self, config: &Config, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export_all(config))?;
        write_synced(path, &json)?;
        Ok(())
    }

    pub fn read_export(path: &Path) -> Result<ExportData> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace progress and history with the export's. Every file is staged
    /// first; originals are moved aside to `.bak` and put back if any rename
    /// fails.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.taja_export_version != EXPORT_VERSION {
            return Err(Error::UnsupportedExportVersion {
                found: data.taja_export_version,
                expected: EXPORT_VERSION,
            });
        }

        let files = [
            (PROGRESS_FILE, serde_json::to_string_pretty(&data.progress)?),
            (HISTORY_FILE, serde_json::to_string_pretty(&data.history)?),
        ];

        let staged = files
            .iter()
            .map(|(name, json)| {
                let tmp = self.file_path(name).with_extension("json.tmp");
                write_synced(&tmp, json).map(|()| tmp)
            })
            .collect::<Result<Vec<_>>>();
        let staged = match staged {
            Ok(staged) => staged,
            Err(e) => {
                self.discard_staged();
                return Err(e);
            }
        };

        let mut swaps: Vec<Swap> = Vec::with_capacity(staged.len());
        for ((name, _), tmp) in files.iter().zip(&staged) {
            match Swap::perform(tmp, self.file_path(name)) {
                Ok(swap) => swaps.push(swap),
                Err(e) => {
                    swaps.iter().rev().for_each(Swap::undo);
                    self.discard_staged();
                    return Err(e.into());
                }
            }
        }

        swaps.iter().for_each(Swap::finish);
        log::info!(
            "imported {} results from {}",
            data.history.results.len(),
            data.exported_at
        );
        Ok(())
    }

    fn discard_staged(&self) {
        for name in [PROGRESS_FILE, HISTORY_FILE] {
            let _ = fs::remove_file(self.file_path(name).with_extension("json.tmp"));
        }
    }

    /// Remove `.bak` files an interrupted import left behind. Returns whether
    /// any were found.
    pub fn check_interrupted_import(&self) -> bool {
        let mut found = false;
        for name in [PROGRESS_FILE, HISTORY_FILE] {
            let bak_path = self.file_path(name).with_extension("json.bak");
            if bak_path.exists() {
                found = true;
                let _ = fs::remove_file(&bak_path);
            }
        }
        found
    }
}

/// One staged file moved into place, remembering what it replaced.
struct Swap {
    target: PathBuf,
    backup: Option<PathBuf>,
}

impl Swap {
    fn perform(staged: &Path, target: PathBuf) -> std::io::Result<Self> {
        let backup = if target.exists() {
            let bak = target.with_extension("json.bak");
            fs::rename(&target, &bak)?;
            Some(bak)
        } else {
            None
        };
        let swap = Swap { target, backup };
        if let Err(e) = fs::rename(staged, &swap.target) {
            swap.undo();
            return Err(e);
        }
        Ok(swap)
    }

    fn undo(&self) {
        match &self.backup {
            Some(bak) => {
                let _ = fs::rename(bak, &self.target);
            }
            None => {
                let _ = fs::remove_file(&self.target);
            }
        }
    }

    fn finish(&self) {
        if let Some(bak) = &self.backup {
            let _ = fs::remove_file(bak);
        }
    }
}
