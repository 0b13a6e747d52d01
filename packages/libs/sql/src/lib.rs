//! wsk-sql: 동적 SQL 생성 라이브러리
//!
//! 구조화된 기술자(컬럼 조건, 필드 스키마, 값 목록)를 받아 런타임에
//! SQL 텍스트와 위치 바인딩 파라미터 목록을 생성합니다. 실행은
//! `wsk-engine` 어댑터가 담당하며, 이 크레이트는 I/O 없이 순수하게
//! 문장만 만듭니다.
//!
//! # 모듈 구조
//!
//! - `template`: `{token}` 슬롯 치환 템플릿 엔진
//! - `condition`: WHERE 절 컴파일러
//! - `schema`: CREATE TABLE 컬럼 정의 컴파일러
//! - `builder`: CRUD/DDL 문장 빌더

pub mod builder;
pub mod condition;
pub mod schema;
pub mod template;

pub use builder::{
    CreateTableBuilder, DeleteBuilder, DropTableBuilder, IndexBuilder, InsertBuilder,
    SelectAllBuilder, SelectBuilder, Statement, UpdateBuilder,
};
pub use condition::{BindMode, Condition, ConditionError, ConditionSet, Connective, WhereFragment};
pub use schema::{FieldSpec, SchemaFragment, TableSchema};
pub use template::Template;
