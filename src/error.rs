use std::path::PathBuf;

/// Errors that can occur while converting Markdown documents.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("no input files given")]
    NoInputs,

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("could not run {program}: {source}")]
    EngineUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("conversion failed ({}): {stderr}", exit_label(.code))]
    EngineFailed { code: Option<i32>, stderr: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}
