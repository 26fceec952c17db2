use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::converter::{DocumentEngine, EngineRequest};
use crate::error::ConvertError;

/// Environment variable naming the pandoc executable to run.
pub const PANDOC_ENV: &str = "MDCONVERT_PANDOC";

/// `DocumentEngine` backed by the `pandoc` command-line tool.
///
/// # Example
///
/// ```no_run
/// use mdconvert::pandoc::Pandoc;
///
/// let pandoc = Pandoc::new();
/// // or honour MDCONVERT_PANDOC when set:
/// let pandoc = Pandoc::from_env();
/// ```
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new()
    }
}

impl Pandoc {
    /// Run `pandoc` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("pandoc"),
        }
    }

    /// Use the executable named by `MDCONVERT_PANDOC`, falling back to `pandoc`.
    pub fn from_env() -> Self {
        match std::env::var_os(PANDOC_ENV) {
            Some(program) if !program.is_empty() => Self::with_program(program),
            _ => Self::new(),
        }
    }

    /// Use a specific executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `pandoc --version`.
    pub fn version(&self) -> Result<String, ConvertError> {
        let output = self.command().arg("--version").output().map_err(|e| {
            ConvertError::EngineUnavailable {
                program: self.program.display().to_string(),
                source: e,
            }
        })?;
        if !output.status.success() {
            return Err(ConvertError::EngineFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn command(&self) -> Command {
        Command::new(&self.program)
    }
}

/// Build pandoc's argument list for one conversion.
pub(crate) fn build_args(
    source: &Path,
    dest: &Path,
    request: &EngineRequest,
) -> Result<Vec<OsString>, ConvertError> {
    let mut args: Vec<OsString> = vec![
        source.as_os_str().to_owned(),
        "--from=markdown".into(),
        format!("--to={}", request.format.pandoc_writer()).into(),
    ];

    let mut output = OsString::from("--output=");
    output.push(dest.as_os_str());
    args.push(output);

    if request.preserve_wrap {
        args.push("--wrap=preserve".into());
    }
    if request.atx_headings {
        args.push("--markdown-headings=atx".into());
    }
    if !request.resource_dirs.is_empty() {
        let joined = std::env::join_paths(&request.resource_dirs).map_err(|e| {
            ConvertError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;
        let mut resource = OsString::from("--resource-path=");
        resource.push(joined);
        args.push(resource);
    }

    Ok(args)
}

impl DocumentEngine for Pandoc {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        request: &EngineRequest,
    ) -> Result<(), ConvertError> {
        let args = build_args(source, dest, request)?;
        tracing::debug!(program = %self.program.display(), ?args, "running pandoc");

        let output = self.command().args(&args).output().map_err(|e| {
            ConvertError::EngineUnavailable {
                program: self.program.display().to_string(),
                source: e,
            }
        })?;

        if !output.status.success() {
            return Err(ConvertError::EngineFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::warn!(target: "mdconvert::pandoc", "{line}");
        }
        Ok(())
    }
}
