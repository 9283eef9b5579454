//! 에러 타입 정의

use thiserror::Error;

/// 공통 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;
