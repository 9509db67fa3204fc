use sigen_parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one generation request.
///
/// `Parse` fails a whole source file. `Io` fails only the interface whose
/// output was being read or written.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, GenerateError::Parse(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, GenerateError::Io { .. })
    }
}
