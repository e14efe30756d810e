use std::path::PathBuf;

use thiserror::Error;

/// Everything the core can fail with. The UI shows these to the user as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported file format '.{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    #[error("Invalid comparison on column '{column}': {reason}")]
    InvalidComparison { column: String, reason: String },

    #[error("Unsupported filter operator '{0}'")]
    UnsupportedOperator(String),

    #[error("No datasets selected")]
    EmptySelection,

    #[error("Unsupported visualization type '{0}'")]
    UnsupportedVisualization(String),

    #[error("Dataset '{dataset}' cannot be drawn as a {chart}: {reason}")]
    InsufficientData {
        dataset: String,
        chart: &'static str,
        reason: String,
    },

    #[error("No visualization to export")]
    NoFigure,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Malformed data in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
