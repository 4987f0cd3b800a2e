use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("input file does not exist: {0}")]
    Missing(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize output for '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file and parse it as a single JSON document.
pub async fn read_json(path: &Path) -> Result<Value, FileError> {
    let text = fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FileError::Missing(path.to_path_buf())
        } else {
            FileError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&text).map_err(|source| FileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A document serialized and ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Serialize `value` as pretty-printed JSON (2-space indent) for `path`.
pub fn render_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<RenderedFile, FileError> {
    let contents = serde_json::to_string_pretty(value).map_err(|source| FileError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(RenderedFile {
        path: path.to_path_buf(),
        contents,
    })
}

/// Write every rendered document, or none of them.
///
/// Each document is first written to a hidden sibling of its target. The
/// staged files are renamed into place only after all of them were written;
/// on failure the staged files are removed and no target is replaced.
/// Missing parent directories are created.
pub async fn write_all(files: &[RenderedFile]) -> Result<(), FileError> {
    let mut staged = Vec::with_capacity(files.len());
    for (idx, file) in files.iter().enumerate() {
        match stage(file, idx).await {
            Ok(tmp) => staged.push(tmp),
            Err(e) => {
                discard(&staged).await;
                return Err(e);
            }
        }
    }

    for (idx, (file, tmp)) in files.iter().zip(&staged).enumerate() {
        if let Err(source) = fs::rename(tmp, &file.path).await {
            discard(&staged[idx..]).await;
            return Err(FileError::Write {
                path: file.path.clone(),
                source,
            });
        }
    }

    Ok(())
}

async fn stage(file: &RenderedFile, idx: usize) -> Result<PathBuf, FileError> {
    let write_err = |source: std::io::Error| FileError::Write {
        path: file.path.clone(),
        source,
    };

    if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    if let Ok(meta) = fs::metadata(&file.path).await {
        if meta.is_dir() {
            return Err(write_err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "destination is a directory",
            )));
        }
    }

    let tmp = staging_path(&file.path, idx);
    if let Err(source) = fs::write(&tmp, file.contents.as_bytes()).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    Ok(tmp)
}

async fn discard(staged: &[PathBuf]) {
    for tmp in staged {
        if let Err(e) = fs::remove_file(tmp).await {
            tracing::warn!(path = %tmp.display(), error = %e, "Could not remove staged file");
        }
    }
}

fn staging_path(target: &Path, idx: usize) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{}.{}-{}.tmp", name, std::process::id(), idx))
}
