//! 엔진 어댑터 에러 타입

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// 엔진 어댑터 에러
#[derive(Debug, Error)]
pub enum EngineError {
    /// 지원하지 않는 엔진 종류로 핸들을 열려고 함
    #[error("unsupported engine: {kind}")]
    UnsupportedEngine { kind: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
