use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("aspect ratio must be a positive finite number, got {0}")]
    InvalidAspectRatio(f64),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger setup failed: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;
