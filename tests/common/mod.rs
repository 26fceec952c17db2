#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use mdconvert::{ConvertError, DocumentEngine, EngineRequest};

/// One recorded engine invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub request: EngineRequest,
    /// Contents of the staged source at the time of the call.
    pub staged: String,
}

/// A mock engine that copies the staged Markdown to the destination.
///
/// Fails with `EngineFailed` when the staged text contains `fail_on`.
#[derive(Default)]
pub struct CopyEngine {
    pub calls: RefCell<Vec<Call>>,
    pub fail_on: Option<String>,
}

impl CopyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn last_call(&self) -> Call {
        self.calls.borrow().last().cloned().expect("engine was not called")
    }
}

impl DocumentEngine for CopyEngine {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        request: &EngineRequest,
    ) -> Result<(), ConvertError> {
        let staged = std::fs::read_to_string(source)?;
        self.calls.borrow_mut().push(Call {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            request: request.clone(),
            staged: staged.clone(),
        });

        if let Some(marker) = &self.fail_on
            && staged.contains(marker.as_str())
        {
            return Err(ConvertError::EngineFailed {
                code: Some(83),
                stderr: "mock engine refused input".to_string(),
            });
        }

        std::fs::write(dest, staged)?;
        Ok(())
    }
}

/// Write a file under `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
