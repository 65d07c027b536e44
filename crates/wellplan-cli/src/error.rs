use std::path::PathBuf;
use thiserror::Error;
use wellplan::core::labware::registry::RegistryLoadError;
use wellplan::engine::error::EngineError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Container type registry error: {0}")]
    Registry(#[from] RegistryLoadError),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
