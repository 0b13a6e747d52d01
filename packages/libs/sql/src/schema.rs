//! CREATE TABLE 컬럼 정의 컴파일러
//!
//! 컬럼 → 필드 정의 목록을 삽입 순서대로 컬럼 정의 SQL 조각으로 변환하고,
//! PRIMARY KEY 컬럼 목록을 함께 수집합니다.

use serde::{Deserialize, Serialize};

use crate::template::Template;

/// 컬럼 정의 기본 템플릿
const FIELD_TEMPLATE: &str = "{type} {null}";

/// 필드 정의
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    /// SQL 타입 토큰 (`INTEGER`, `TEXT`, …)
    #[serde(rename = "type")]
    pub sql_type: String,

    /// NULL 허용 여부. `None`이면 `{null}` 토큰이 빈 문자열로 렌더링됨
    #[serde(default, rename = "null")]
    pub nullable: Option<bool>,

    /// 기본값 (SQL 리터럴 그대로)
    #[serde(default)]
    pub default: Option<String>,

    /// PRIMARY KEY 여부
    #[serde(default)]
    pub primary: bool,

    /// AUTOINCREMENT 여부
    #[serde(default)]
    pub auto_increment: bool,

    /// 기본 템플릿에 추가로 치환할 토큰 (스키마 DSL 확장 지점)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<(String, String)>,
}

impl FieldSpec {
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            ..Self::default()
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.push((key.into(), value.into()));
        self
    }

    fn null_text(&self) -> &'static str {
        match self.nullable {
            None => "",
            Some(true) => "NULL",
            Some(false) => "NOT NULL",
        }
    }
}

/// 컴파일된 스키마 조각
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFragment {
    /// 쉼표로 구분된 컬럼 정의 목록
    pub columns_sql: String,

    /// `primary`가 설정된 컬럼 이름 (수집만 하고 빌더는 사용하지 않음)
    pub primary_keys: Vec<String>,
}

/// 삽입 순서를 유지하는 테이블 스키마
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 필드 추가 (삽입 순서 유지)
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// 컬럼 정의 목록 컴파일
    pub fn compile(&self) -> SchemaFragment {
        let template = Template::parse(FIELD_TEMPLATE);
        let mut columns_sql = String::new();
        let mut primary_keys = Vec::new();
        let last = self.fields.len().saturating_sub(1);

        for (i, (name, field)) in self.fields.iter().enumerate() {
            let mut values: Vec<(&str, &str)> = vec![
                ("type", field.sql_type.as_str()),
                ("null", field.null_text()),
            ];
            for (key, value) in &field.extras {
                values.push((key.as_str(), value.as_str()));
            }

            columns_sql.push('`');
            columns_sql.push_str(name);
            columns_sql.push_str("` ");
            columns_sql.push_str(&template.render(&values));

            if let Some(default) = &field.default {
                columns_sql.push_str(" DEFAULT ");
                columns_sql.push_str(default);
            }
            if field.primary {
                columns_sql.push_str(" PRIMARY KEY");
                primary_keys.push(name.clone());
            }
            if field.auto_increment {
                columns_sql.push_str(" AUTOINCREMENT");
            }
            if i != last {
                columns_sql.push(',');
            }
        }

        SchemaFragment {
            columns_sql,
            primary_keys,
        }
    }
}
