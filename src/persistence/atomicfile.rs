use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

fn temp_path_for(final_path: &Path) -> PathBuf {
    let mut file_name = final_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    final_path.with_file_name(file_name)
}

/// Writes `value` as pretty JSON next to `final_path` and renames it into place.
///
/// The previous file stays untouched until the rename, so a failure at any
/// earlier step leaves the old content readable.
pub fn write_json_atomic<T: Serialize + ?Sized>(final_path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = temp_path_for(final_path);
    let result = write_then_rename(&tmp_path, final_path, value);
    if result.is_err() && tmp_path.exists() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename<T: Serialize + ?Sized>(tmp_path: &Path, final_path: &Path, value: &T) -> io::Result<()> {
    let file = File::create(tmp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|error| error.into_error())?;
    file.sync_all()?;
    fs::rename(tmp_path, final_path)
}
