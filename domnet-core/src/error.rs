use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Required column missing from input: {0}")]
    MissingColumn(String),

    #[error("No valid rows left after cleaning ({total} rows read)")]
    EmptyDataset { total: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;
