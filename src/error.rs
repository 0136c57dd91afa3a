use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid date argument '{0}' (expected dd/mm/yyyy)")]
    InvalidDateArgument(String),

    #[error("Cannot fit classifier: no resolved matches with complete features")]
    EmptyTrainingSet,

    #[error("Shape mismatch: {features} feature rows but {targets} targets")]
    ShapeMismatch { features: usize, targets: usize },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
