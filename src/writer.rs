//! Writes rendered files and runs the external formatter on them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{GenError, GenResult};
use crate::render::RenderedFile;

/// External formatter invoked once per written file, with the path appended to `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatter {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Formatter {
    /// `gofmt -l -w <file>`: rewrite in place.
    pub fn gofmt() -> Self {
        Self {
            program: "gofmt".to_string(),
            args: vec!["-l".to_string(), "-w".to_string()],
        }
    }

    /// Run the formatter on `path` and wait for it.
    pub async fn run(&self, path: &Path) -> Result<(), String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ))
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::gofmt()
    }
}

/// A file that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
    /// False when formatting was disabled or the formatter failed.
    pub formatted: bool,
}

/// Write every file into `dir`, formatting each one after it is written.
///
/// Any write failure aborts the run; formatter failures are only logged.
pub async fn write_files(
    dir: &Path,
    files: &[RenderedFile],
    formatter: Option<&Formatter>,
) -> GenResult<Vec<WrittenFile>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let path = dir.join(&file.file_name);
        let bytes = write_file(&path, &file.contents).await?;
        info!(path = %path.display(), bytes, "wrote model file");

        let formatted = match formatter {
            Some(formatter) => match formatter.run(&path).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "formatting failed, leaving file as generated");
                    false
                }
            },
            None => false,
        };

        written.push(WrittenFile {
            path,
            bytes,
            formatted,
        });
    }

    Ok(written)
}

async fn write_file(path: &Path, contents: &str) -> GenResult<usize> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| GenError::io(path, e))?;
    file.write_all(contents.as_bytes())
        .await
        .map_err(|e| GenError::io(path, e))?;
    file.flush().await.map_err(|e| GenError::io(path, e))?;
    Ok(contents.len())
}
