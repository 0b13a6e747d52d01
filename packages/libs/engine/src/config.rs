//! 핸들 설정
//!
//! 엔진 종류는 호출자가 명시적으로 선택합니다. 전역 심볼 존재 여부 같은
//! 앰비언트 탐지는 하지 않습니다.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// 사용할 엔진 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 파일 기반 SQLite
    #[default]
    Sqlite,

    /// 인메모리 SQLite
    Memory,
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, EngineError> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(EngineKind::Sqlite),
            "memory" => Ok(EngineKind::Memory),
            other => Err(EngineError::UnsupportedEngine {
                kind: other.to_string(),
            }),
        }
    }
}

/// 핸들 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// 데이터베이스 이름 (파일 기반이면 경로로 사용)
    pub name: String,

    /// 스키마 버전 (오픈 시점 메타데이터)
    pub version: String,

    /// 설명 (메타데이터)
    pub description: String,

    /// 예상 크기 힌트. SQLite는 사용하지 않지만 오픈 계약의 일부로 보존
    pub size_hint: Option<u64>,

    /// 엔진 종류
    pub engine: EngineKind,

    /// 실행 전 문장 로깅 여부
    pub debug: bool,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            name: "wsk.db".to_string(),
            version: "1.0".to_string(),
            description: String::new(),
            size_hint: None,
            engine: EngineKind::default(),
            debug: false,
        }
    }
}

impl HandleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn size_hint(mut self, size_hint: u64) -> Self {
        self.size_hint = Some(size_hint);
        self
    }

    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> crate::error::Result<Self> {
        Ok(Self {
            name: env::var("WSK_DB_NAME").unwrap_or_else(|_| "wsk.db".to_string()),

            version: env::var("WSK_DB_VERSION").unwrap_or_else(|_| "1.0".to_string()),

            description: env::var("WSK_DB_DESC").unwrap_or_default(),

            size_hint: env::var("WSK_DB_SIZE_HINT").ok().and_then(|v| v.parse().ok()),

            engine: env::var("WSK_DB_ENGINE")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),

            debug: env::var("WSK_DEBUG")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
