//! wsk-engine: SQLite 실행 어댑터
//!
//! `wsk-sql`이 생성한 `(SQL 텍스트, 파라미터 목록)` 문장을 sqlx SQLite
//! 풀에서 실행하고, 결과를 JSON row 목록 또는 insert id로 정규화합니다.
//!
//! # 모듈 구조
//!
//! - `config`: 핸들 설정 (엔진 선택, 디버그 플래그)
//! - `error`: 에러 타입
//! - `handle`: 데이터베이스 핸들과 CRUD/DDL 실행 메서드

pub mod config;
pub mod error;
pub mod handle;
mod row;

pub use config::{EngineKind, HandleConfig};
pub use error::{EngineError, Result};
pub use handle::{Handle, WriteOutcome};
pub use row::Row;
