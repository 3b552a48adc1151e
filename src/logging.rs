use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

pub const LOG_ENV: &str = "TAJA_LOG";

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taja")
        .join("taja.log")
}

/// Send `log` output to a file; the terminal belongs to the UI. Filter comes
/// from `TAJA_LOG`, default `info`.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
