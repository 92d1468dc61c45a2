use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("invalid time range: {field} `{value}` is not a calendar date")]
    InvalidRange { field: &'static str, value: String },

    #[error("failed reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("score row {row}: `{value}` is not a calendar date")]
    InvalidRow { row: usize, value: String },

    #[error("malformed score csv: {0}")]
    Csv(#[from] csv::Error),
}

impl HeatmapError {
    pub fn invalid_range(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidRange {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
