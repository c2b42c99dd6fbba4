//! Tag rewriting by remuxing through ffmpeg.
//!
//! ffmpeg copies the encoded stream into a sibling temp file with new
//! container metadata, and the temp file is then renamed over the original.
//! The original is never opened for writing, so any failure before the rename
//! leaves it byte-for-byte intact.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{TagFields, TagWriteError, TagWriter};

const TOOL: &str = "ffmpeg";

/// Remux based writer for flac, wav, ogg, aac, m4a and wma.
pub struct RemuxTagWriter {
    program: PathBuf,
}

impl RemuxTagWriter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `<dir>/<stem>.tmp.<ext>` next to the input.
    pub fn temp_path(path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(ext) => format!("{}.tmp.{}", stem, ext.to_string_lossy()),
            None => format!("{}.tmp", stem),
        };
        path.with_file_name(name)
    }

    /// Argument list passed to ffmpeg.
    ///
    /// Fields missing from the request are written as empty values.
    pub fn arguments(input: &Path, output: &Path, fields: &TagFields) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-y".into(),
            "-c".into(),
            "copy".into(),
            "-map_metadata".into(),
            "0".into(),
        ];
        let pairs = [
            ("title", &fields.title),
            ("artist", &fields.artist),
            ("album", &fields.album),
            ("track", &fields.track),
        ];
        for (key, value) in pairs {
            args.push("-metadata".into());
            args.push(format!("{}={}", key, value.as_deref().unwrap_or("")).into());
        }
        args.push(output.as_os_str().to_owned());
        args
    }

    fn remux(&self, path: &Path, temp: &Path, fields: &TagFields) -> Result<(), TagWriteError> {
        let output = Command::new(&self.program)
            .args(Self::arguments(path, temp, fields))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!("{} stderr for {}: {}", TOOL, path.display(), stderr);
            return Err(TagWriteError::ToolFailed {
                tool: TOOL.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        if !temp.is_file() {
            return Err(TagWriteError::MissingOutput {
                tool: TOOL.to_string(),
                path: temp.to_path_buf(),
            });
        }

        fs::rename(temp, path).map_err(|source| TagWriteError::Rename {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TagWriter for RemuxTagWriter {
    fn name(&self) -> &'static str {
        "remux"
    }

    fn write(&self, path: &Path, fields: &TagFields) -> Result<(), TagWriteError> {
        let temp = Self::temp_path(path);
        let result = self.remux(path, &temp, fields);

        if result.is_err()
            && temp.exists()
            && let Err(e) = fs::remove_file(&temp)
        {
            tracing::warn!("Failed to remove temp file {}: {}", temp.display(), e);
        }
        result
    }
}
