use std::fs;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::runtime::codegen::Executable;

/// Failure in the persistence pipeline.
#[derive(Debug, Error)]
pub enum ArtifactWriteError {
    #[error("failed to stage the artifact sources: {0}")]
    Io(#[from] std::io::Error),
    #[error("C compiler `{compiler}` could not be started: {source}")]
    CompilerUnavailable {
        compiler: String,
        source: std::io::Error,
    },
    #[error("C compiler `{compiler}` rejected the generated program:\n{stderr}")]
    CompilerFailed { compiler: String, stderr: String },
}

const C_COMPILER: &str = "cc";

/// Persists the executable as a standalone native binary at `path`.
///
/// The executable's C translation is staged in a scratch directory and
/// handed to the platform C compiler, which owns the artifact's on-disk
/// format. Invalid target paths and permission problems surface through the
/// compiler's own failure output.
pub fn emit(exec: &Executable, path: &Path) -> Result<(), ArtifactWriteError> {
    let scratch = tempfile::tempdir()?;
    let unit_path = scratch.path().join("program.c");
    fs::write(&unit_path, exec.translation_unit())?;

    let output = Command::new(C_COMPILER)
        .arg(&unit_path)
        .arg("-o")
        .arg(path)
        .output()
        .map_err(|source| ArtifactWriteError::CompilerUnavailable {
            compiler: C_COMPILER.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(ArtifactWriteError::CompilerFailed {
            compiler: C_COMPILER.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
