//! 데이터베이스 핸들
//!
//! `wsk-sql` 빌더가 만든 문장을 sqlx SQLite 풀에서 실행합니다.
//! 모든 호출은 정확히 한 번 완료되는 future를 돌려주며, 결과 없음(`Ok`의
//! 빈 목록)과 실행 실패(`Err`)를 구분합니다.

use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};

use wsk_sql::builder::{
    CreateTableBuilder, DeleteBuilder, DropTableBuilder, IndexBuilder, InsertBuilder,
    SelectAllBuilder, SelectBuilder, Statement, UpdateBuilder,
};
use wsk_sql::condition::ConditionSet;
use wsk_sql::schema::TableSchema;

use crate::config::{EngineKind, HandleConfig};
use crate::error::Result;
use crate::row::{rows_to_json, Row};

/// 쓰기 문장 실행 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// 마지막으로 삽입된 rowid
    pub insert_id: i64,

    /// 영향 받은 row 수
    pub rows_affected: u64,
}

/// 열린 데이터베이스 핸들
#[derive(Clone)]
pub struct Handle {
    pool: SqlitePool,
    config: HandleConfig,
}

impl Handle {
    /// 핸들 오픈
    ///
    /// 실패는 `Err`로 반환합니다 (로그만 남기고 삼키지 않음).
    pub async fn open(config: HandleConfig) -> Result<Self> {
        let (url, max_connections) = match config.engine {
            EngineKind::Sqlite => (format!("sqlite://{}?mode=rwc", config.name), 5),
            // 인메모리 DB는 연결마다 독립된 인스턴스이므로 연결을 하나로 제한
            EngineKind::Memory => ("sqlite::memory:".to_string(), 1),
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&url)
            .await?;

        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &HandleConfig {
        &self.config
    }

    /// row를 돌려주는 문장 실행 (SELECT 계열)
    pub async fn fetch(&self, stmt: &Statement) -> Result<Vec<Row>> {
        self.log_statement(stmt);
        let query = bind_params(sqlx::query(&stmt.sql), &stmt.params);
        match query.fetch_all(&self.pool).await {
            Ok(rows) => Ok(rows_to_json(rows)),
            Err(e) => {
                tracing::error!(sql = %stmt.sql, error = %e, "statement failed");
                Err(e.into())
            }
        }
    }

    /// 쓰기 문장 실행 (INSERT/UPDATE/DELETE/DDL)
    pub async fn run(&self, stmt: &Statement) -> Result<WriteOutcome> {
        self.log_statement(stmt);
        let query = bind_params(sqlx::query(&stmt.sql), &stmt.params);
        match query.execute(&self.pool).await {
            Ok(result) => Ok(WriteOutcome {
                insert_id: result.last_insert_rowid(),
                rows_affected: result.rows_affected(),
            }),
            Err(e) => {
                tracing::error!(sql = %stmt.sql, error = %e, "statement failed");
                Err(e.into())
            }
        }
    }

    /// row 삽입, 삽입된 rowid 반환
    pub async fn insert(&self, table: &str, row: &[(&str, Value)]) -> Result<i64> {
        let stmt = InsertBuilder::new(table).build(row);
        Ok(self.run(&stmt).await?.insert_id)
    }

    /// 조건에 맞는 row 갱신, 영향 받은 row 수 반환
    pub async fn update(
        &self,
        table: &str,
        data: &[(&str, Value)],
        conditions: &ConditionSet,
    ) -> Result<u64> {
        let stmt = UpdateBuilder::new(table).build(data, conditions);
        Ok(self.run(&stmt).await?.rows_affected)
    }

    /// 조건에 맞는 row 삭제, 영향 받은 row 수 반환
    pub async fn del(&self, table: &str, conditions: &ConditionSet) -> Result<u64> {
        let stmt = DeleteBuilder::new(table).build(conditions);
        Ok(self.run(&stmt).await?.rows_affected)
    }

    /// 조건 SELECT
    pub async fn select(&self, table: &str, conditions: &ConditionSet) -> Result<Vec<Row>> {
        let stmt = SelectBuilder::new(table).build(conditions);
        self.fetch(&stmt).await
    }

    /// 정렬 SELECT (`ascending` → `ASC`/`DESC`)
    pub async fn ordered_select(
        &self,
        table: &str,
        conditions: &ConditionSet,
        order_by: &str,
        ascending: bool,
    ) -> Result<Vec<Row>> {
        let stmt = SelectBuilder::ordered(table, order_by, ascending).build(conditions);
        self.fetch(&stmt).await
    }

    /// 정렬 + LIMIT SELECT
    pub async fn limited_ordered_select(
        &self,
        table: &str,
        conditions: &ConditionSet,
        order_by: &str,
        ascending: bool,
        limit: u64,
    ) -> Result<Vec<Row>> {
        let stmt = SelectBuilder::limited(table, order_by, ascending, limit).build(conditions);
        self.fetch(&stmt).await
    }

    /// 전체 SELECT
    pub async fn select_all(&self, table: &str) -> Result<Vec<Row>> {
        let stmt = SelectAllBuilder::new(table).build();
        self.fetch(&stmt).await
    }

    /// 인덱스 생성
    pub async fn index(
        &self,
        table: &str,
        index_name: &str,
        columns: &[&str],
        unique: bool,
    ) -> Result<()> {
        let stmt = IndexBuilder::new(table, index_name).unique(unique).build(columns);
        self.run(&stmt).await?;
        Ok(())
    }

    /// 테이블 생성
    pub async fn create_table(&self, table: &str, schema: &TableSchema) -> Result<()> {
        let stmt = CreateTableBuilder::new(table).build(schema);
        self.run(&stmt).await?;
        Ok(())
    }

    /// 테이블 삭제
    pub async fn drop_table(&self, table: &str) -> Result<()> {
        let stmt = DropTableBuilder::new(table).build();
        self.run(&stmt).await?;
        Ok(())
    }

    fn log_statement(&self, stmt: &Statement) {
        if self.config.debug {
            tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "executing statement");
        }
    }
}

/// `serde_json::Value` 파라미터를 위치 순서대로 바인딩
fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in params.iter().cloned() {
        match value {
            Value::Null => {
                let null: Option<String> = None;
                query = query.bind(null);
            }
            Value::Bool(b) => query = query.bind(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query = query.bind(i);
                } else if let Some(f) = n.as_f64() {
                    query = query.bind(f);
                } else {
                    query = query.bind(n.to_string());
                }
            }
            Value::String(s) => query = query.bind(s),
            // 배열/객체는 JSON 텍스트로 직렬화해서 저장
            other @ (Value::Array(_) | Value::Object(_)) => query = query.bind(other.to_string()),
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wsk_sql::schema::FieldSpec;

    async fn open_test_handle() -> Handle {
        let config = HandleConfig::new("test")
            .engine(EngineKind::Memory)
            .debug(true);
        let handle = Handle::open(config).await.unwrap();

        let schema = TableSchema::new()
            .field("id", FieldSpec::new("INTEGER").primary().auto_increment())
            .field("name", FieldSpec::new("TEXT").nullable(false))
            .field("age", FieldSpec::new("INTEGER"));
        handle.create_table("users", &schema).await.unwrap();
        handle
    }

    #[tokio::test]
    async fn test_open_and_create_table() {
        let handle = open_test_handle().await;
        // 멱등: 같은 문장을 다시 실행해도 성공
        let schema = TableSchema::new()
            .field("id", FieldSpec::new("INTEGER").primary().auto_increment())
            .field("name", FieldSpec::new("TEXT").nullable(false))
            .field("age", FieldSpec::new("INTEGER"));
        handle.create_table("users", &schema).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_returns_rowid() {
        let handle = open_test_handle().await;
        let id = handle
            .insert("users", &[("name", json!("kim")), ("age", json!(30))])
            .await
            .unwrap();
        assert_eq!(id, 1);

        let id = handle
            .insert("users", &[("name", json!("lee")), ("age", json!(25))])
            .await
            .unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn test_select_with_conditions() {
        let handle = open_test_handle().await;
        handle
            .insert("users", &[("name", json!("kim")), ("age", json!(30))])
            .await
            .unwrap();
        handle
            .insert("users", &[("name", json!("lee")), ("age", json!(25))])
            .await
            .unwrap();

        let conditions = ConditionSet::new().eq("name", "kim");
        let rows = handle.select("users", &conditions).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&json!("kim")));
        assert_eq!(rows[0].get("age"), Some(&json!(30)));
    }

    #[tokio::test]
    async fn test_select_zero_rows_is_ok_empty() {
        let handle = open_test_handle().await;
        let conditions = ConditionSet::new().eq("name", "nobody");
        let rows = handle.select("users", &conditions).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_missing_table_is_err() {
        // 빈 결과와 실행 실패는 구분된다
        let handle = open_test_handle().await;
        let result = handle.select_all("missing").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ordered_and_limited_select() {
        let handle = open_test_handle().await;
        for (name, age) in [("a", 10), ("b", 30), ("c", 20)] {
            handle
                .insert("users", &[("name", json!(name)), ("age", json!(age))])
                .await
                .unwrap();
        }

        let conditions = ConditionSet::new().cmp("age", ">", 0);
        let rows = handle
            .ordered_select("users", &conditions, "age", false)
            .await
            .unwrap();
        assert_eq!(rows[0].get("name"), Some(&json!("b")));

        let rows = handle
            .limited_ordered_select("users", &conditions, "age", true, 2)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&json!("a")));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let handle = open_test_handle().await;
        handle
            .insert("users", &[("name", json!("kim")), ("age", json!(30))])
            .await
            .unwrap();

        let conditions = ConditionSet::new().eq("name", "kim");
        let affected = handle
            .update("users", &[("age", json!(31))], &conditions)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let rows = handle.select("users", &conditions).await.unwrap();
        assert_eq!(rows[0].get("age"), Some(&json!(31)));

        let deleted = handle.del("users", &conditions).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(handle.select_all("users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_null_predicate_select() {
        let handle = open_test_handle().await;
        handle
            .insert("users", &[("name", json!("kim")), ("age", json!(30))])
            .await
            .unwrap();
        handle
            .insert("users", &[("name", json!("lee")), ("age", Value::Null)])
            .await
            .unwrap();

        let conditions = ConditionSet::new().eq("age", "IS NULL");
        let rows = handle.select("users", &conditions).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&json!("lee")));
    }

    #[tokio::test]
    async fn test_in_operator_binds_each_element() {
        let handle = open_test_handle().await;
        for (name, age) in [("a", 10), ("b", 20), ("c", 30)] {
            handle
                .insert("users", &[("name", json!(name)), ("age", json!(age))])
                .await
                .unwrap();
        }

        let conditions = ConditionSet::new().cmp("age", "IN", json!([10, 30]));
        let rows = handle
            .ordered_select("users", &conditions, "age", true)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&json!("a")));
        assert_eq!(rows[1].get("name"), Some(&json!("c")));
    }

    #[tokio::test]
    async fn test_index_and_drop_table() {
        let handle = open_test_handle().await;
        handle
            .index("users", "idx_users_name", &["name"], true)
            .await
            .unwrap();
        // IF NOT EXISTS: 재실행해도 성공
        handle
            .index("users", "idx_users_name", &["name"], true)
            .await
            .unwrap();

        handle.drop_table("users").await.unwrap();
        assert!(handle.select_all("users").await.is_err());
        // IF EXISTS: 없는 테이블 드랍도 성공
        handle.drop_table("users").await.unwrap();
    }
}
