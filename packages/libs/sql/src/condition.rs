//! WHERE 절 컴파일러
//!
//! 컬럼 → 조건 목록을 삽입 순서대로 SQL 불리언 식 조각으로 변환합니다.
//! 값은 인라인 인용(과거 리비전 호환) 또는 위치 바인딩(`?`) 중
//! 하나로 처리합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 조건과 다음 조건을 잇는 논리 연결자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// 단일 컬럼 조건
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// 동등 비교. 문자열 값이 `NULL` 텍스트를 포함하면 (대소문자 무관)
    /// 값을 술어로 그대로 출력합니다 (`IS NULL` 패스스루).
    Literal(Value),

    /// 명시적 패스스루 술어 (`IS NULL`, `IS NOT NULL` 등)
    Null(String),

    /// 비교 연산. `connective`는 다음 조건과의 연결자이며,
    /// 마지막 조건은 생략해야 합니다.
    Comparison {
        operator: String,
        value: Value,
        connective: Option<Connective>,
    },
}

fn is_null_text(text: &str) -> bool {
    text.to_ascii_uppercase().contains("NULL")
}

/// 인라인 모드에서 값을 텍스트로 표기
pub(crate) fn inline_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

/// 값 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// 값을 작은따옴표로 인용해 SQL 텍스트에 직접 넣음
    Inline,

    /// `?` 플레이스홀더를 넣고 값은 파라미터 목록으로 분리
    #[default]
    Bound,
}

/// 컴파일된 WHERE 조각
#[derive(Debug, Clone, PartialEq)]
pub struct WhereFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

/// 검증 에러
#[derive(Debug, Clone, Error)]
pub enum ConditionError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// 삽입 순서를 유지하는 조건 목록
///
/// 조건 사이에는 각 조건의 `connective` 외에 어떤 구분자도 넣지 않습니다.
/// 마지막이 아닌 조건이 연결자를 생략하면 문법적으로 깨진 SQL이 되며,
/// 이는 호출자의 책임입니다 (컴파일러는 검증하지 않음).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionSet {
    entries: Vec<(String, Condition)>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 조건 추가 (삽입 순서 유지)
    pub fn push(mut self, column: impl Into<String>, condition: Condition) -> Self {
        self.entries.push((column.into(), condition));
        self
    }

    /// 동등 조건 추가
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, Condition::Literal(value.into()))
    }

    /// 패스스루 술어 추가
    pub fn null(self, column: impl Into<String>, predicate: impl Into<String>) -> Self {
        self.push(column, Condition::Null(predicate.into()))
    }

    /// 비교 조건 추가 (연결자 없음 — 마지막 조건용)
    pub fn cmp(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.push(
            column,
            Condition::Comparison {
                operator: operator.into(),
                value: value.into(),
                connective: None,
            },
        )
    }

    /// 비교 조건 추가 (다음 조건과 연결)
    pub fn cmp_joined(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
        connective: Connective,
    ) -> Self {
        self.push(
            column,
            Condition::Comparison {
                operator: operator.into(),
                value: value.into(),
                connective: Some(connective),
            },
        )
    }

    /// 컬럼 허용 목록 검증
    ///
    /// `compile`은 이 검사를 호출하지 않습니다.
    pub fn validate(&self, allowed_columns: &[&str]) -> Result<(), ConditionError> {
        for (column, _) in &self.entries {
            if !allowed_columns.contains(&column.as_str()) {
                return Err(ConditionError::UnknownColumn(column.clone()));
            }
        }
        Ok(())
    }

    /// WHERE 조각 컴파일
    pub fn compile(&self, mode: BindMode) -> WhereFragment {
        let mut sql = String::new();
        let mut params = Vec::new();

        for (column, condition) in &self.entries {
            match condition {
                Condition::Literal(value) => {
                    if let Value::String(text) = value {
                        if is_null_text(text) {
                            sql.push_str(&format!("`{column}` {text}"));
                            continue;
                        }
                    }
                    match mode {
                        BindMode::Inline => {
                            sql.push_str(&format!("`{column}`='{}'", inline_text(value)));
                        }
                        BindMode::Bound => {
                            sql.push_str(&format!("`{column}`=?"));
                            params.push(value.clone());
                        }
                    }
                }
                Condition::Null(predicate) => {
                    sql.push_str(&format!("`{column}` {predicate}"));
                }
                Condition::Comparison {
                    operator,
                    value,
                    connective,
                } => {
                    let null_passthrough = matches!(value, Value::String(text) if is_null_text(text));
                    if null_passthrough {
                        sql.push_str(&format!("`{column}` {}", inline_text(value)));
                    } else if operator.eq_ignore_ascii_case("IN") {
                        match (mode, value) {
                            // 빈 배열은 `IN ()`이 되어 실행 시점에 문법
                            // 오류로 거부된다. 호출자가 피해야 함
                            (BindMode::Bound, Value::Array(items)) => {
                                let placeholders = vec!["?"; items.len()].join(",");
                                sql.push_str(&format!("`{column}` {operator} ({placeholders})"));
                                params.extend(items.iter().cloned());
                            }
                            // 배열이 아니면 괄호로 묶인 리터럴 목록으로 간주,
                            // 인용 없이 그대로 출력
                            _ => {
                                sql.push_str(&format!(
                                    "`{column}` {operator} {}",
                                    inline_text(value)
                                ));
                            }
                        }
                    } else {
                        match mode {
                            BindMode::Inline => {
                                sql.push_str(&format!(
                                    "`{column}` {operator} '{}'",
                                    inline_text(value)
                                ));
                            }
                            BindMode::Bound => {
                                sql.push_str(&format!("`{column}` {operator} ?"));
                                params.push(value.clone());
                            }
                        }
                    }
                    if let Some(connective) = connective {
                        sql.push(' ');
                        sql.push_str(connective.as_sql());
                        sql.push(' ');
                    }
                }
            }
        }

        WhereFragment { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_literal_inline() {
        let fragment = ConditionSet::new()
            .eq("name", "kim")
            .compile(BindMode::Inline);
        assert_eq!(fragment.sql, "`name`='kim'");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_bare_literal_bound() {
        let fragment = ConditionSet::new().eq("name", "kim").compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`name`=?");
        assert_eq!(fragment.params, vec![json!("kim")]);
    }

    #[test]
    fn test_null_passthrough_from_string_literal() {
        let fragment = ConditionSet::new()
            .eq("deleted_at", "IS NULL")
            .compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`deleted_at` IS NULL");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_null_passthrough_case_insensitive() {
        let fragment = ConditionSet::new()
            .eq("deleted_at", "is not null")
            .compile(BindMode::Inline);
        assert_eq!(fragment.sql, "`deleted_at` is not null");
    }

    #[test]
    fn test_explicit_null_predicate() {
        let fragment = ConditionSet::new()
            .null("deleted_at", "IS NOT NULL")
            .compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`deleted_at` IS NOT NULL");
    }

    #[test]
    fn test_comparison_chain_with_connectives() {
        // 마지막 조건만 연결자를 생략한다
        let fragment = ConditionSet::new()
            .cmp_joined("age", ">", 18, Connective::And)
            .cmp_joined("status", "=", "active", Connective::Or)
            .cmp("score", "<", 100)
            .compile(BindMode::Inline);
        assert_eq!(
            fragment.sql,
            "`age` > '18' AND `status` = 'active' OR `score` < '100'"
        );
    }

    #[test]
    fn test_comparison_chain_bound() {
        let fragment = ConditionSet::new()
            .cmp_joined("age", ">", 18, Connective::And)
            .cmp("status", "=", "active")
            .compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`age` > ? AND `status` = ?");
        assert_eq!(fragment.params, vec![json!(18), json!("active")]);
    }

    #[test]
    fn test_in_operator_inline_suppresses_quoting() {
        let fragment = ConditionSet::new()
            .cmp("id", "IN", "(1,2,3)")
            .compile(BindMode::Inline);
        assert_eq!(fragment.sql, "`id` IN (1,2,3)");
    }

    #[test]
    fn test_in_operator_bound_builds_placeholder_list() {
        let fragment = ConditionSet::new()
            .cmp("id", "IN", json!([1, 2, 3]))
            .compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`id` IN (?,?,?)");
        assert_eq!(fragment.params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_in_operator_bound_empty_array() {
        // 빈 목록은 그대로 `IN ()`으로 렌더링된다 (컴파일러는 검증하지 않음)
        let fragment = ConditionSet::new()
            .cmp("id", "IN", json!([]))
            .compile(BindMode::Bound);
        assert_eq!(fragment.sql, "`id` IN ()");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_condition_serde_round_trip() {
        let conditions = ConditionSet::new()
            .cmp_joined("age", ">", 18, Connective::And)
            .eq("status", "active");
        let text = serde_json::to_string(&conditions).unwrap();
        assert!(text.contains("\"AND\""));

        let back: ConditionSet = serde_json::from_str(&text).unwrap();
        assert_eq!(
            back.compile(BindMode::Bound),
            conditions.compile(BindMode::Bound)
        );
    }

    #[test]
    fn test_no_implicit_separator_between_entries() {
        // 연결자가 없는 조건 사이에는 아무것도 넣지 않는다 (호출자 책임)
        let fragment = ConditionSet::new()
            .eq("a", 1)
            .eq("b", 2)
            .compile(BindMode::Inline);
        assert_eq!(fragment.sql, "`a`='1'`b`='2'");
    }

    #[test]
    fn test_validate_allowlist() {
        let conditions = ConditionSet::new().eq("status", "active");
        assert!(conditions.validate(&["status", "age"]).is_ok());
        assert!(matches!(
            conditions.validate(&["age"]),
            Err(ConditionError::UnknownColumn(col)) if col == "status"
        ));
    }
}
