//! CRUD/DDL 문장 빌더
//!
//! 템플릿 엔진과 조건/스키마 컴파일러를 조합해 최종
//! `(SQL 텍스트, 파라미터 목록)` 쌍을 만듭니다. 모든 빌더는 순수 함수이며,
//! 같은 입력은 항상 바이트 단위로 동일한 문장을 생성합니다.

use serde_json::Value;

use crate::condition::{inline_text, BindMode, ConditionSet};
use crate::schema::TableSchema;
use crate::template::Template;

/// 생성된 문장
///
/// 호출마다 새로 만들어지는 일시적 값이며, 빌더는 아무 상태도 유지하지
/// 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// INSERT 문장 빌더
pub struct InsertBuilder<'a> {
    table: &'a str,
}

impl<'a> InsertBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self { table }
    }

    /// 컬럼 순서는 입력 순서를 그대로 따릅니다.
    pub fn build(&self, row: &[(&str, Value)]) -> Statement {
        let template = Template::parse("INSERT INTO `{table}` ({columns}) VALUES({values}); ");
        let columns = row
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(",");
        let placeholders = vec!["?"; row.len()].join(",");

        Statement {
            sql: template.render(&[
                ("table", self.table),
                ("columns", &columns),
                ("values", &placeholders),
            ]),
            params: row.iter().map(|(_, value)| value.clone()).collect(),
        }
    }
}

/// UPDATE 문장 빌더
pub struct UpdateBuilder<'a> {
    table: &'a str,
    mode: BindMode,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            mode: BindMode::default(),
        }
    }

    pub fn bind_mode(mut self, mode: BindMode) -> Self {
        self.mode = mode;
        self
    }

    /// 파라미터는 갱신 값 먼저, 조건 값이 그 뒤를 따릅니다.
    pub fn build(&self, data: &[(&str, Value)], conditions: &ConditionSet) -> Statement {
        let template = Template::parse("UPDATE `{table}` SET {update} WHERE {where}; ");
        let where_fragment = conditions.compile(self.mode);

        let (set_sql, mut params) = match self.mode {
            BindMode::Bound => (
                data.iter()
                    .map(|(column, _)| format!("`{column}`=?"))
                    .collect::<Vec<_>>()
                    .join(","),
                data.iter()
                    .map(|(_, value)| value.clone())
                    .collect::<Vec<_>>(),
            ),
            BindMode::Inline => (
                data.iter()
                    .map(|(column, value)| format!("`{column}`='{}'", inline_text(value)))
                    .collect::<Vec<_>>()
                    .join(","),
                Vec::new(),
            ),
        };
        params.extend(where_fragment.params);

        Statement {
            sql: template.render(&[
                ("table", self.table),
                ("update", &set_sql),
                ("where", &where_fragment.sql),
            ]),
            params,
        }
    }
}

/// DELETE 문장 빌더
pub struct DeleteBuilder<'a> {
    table: &'a str,
    mode: BindMode,
}

impl<'a> DeleteBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            mode: BindMode::default(),
        }
    }

    pub fn bind_mode(mut self, mode: BindMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(&self, conditions: &ConditionSet) -> Statement {
        let template = Template::parse("DELETE FROM `{table}` WHERE {where}; ");
        let where_fragment = conditions.compile(self.mode);

        Statement {
            sql: template.render(&[("table", self.table), ("where", &where_fragment.sql)]),
            params: where_fragment.params,
        }
    }
}

/// SELECT 변형
enum SelectVariant {
    Plain,
    Ordered {
        order_by: String,
        ascending: bool,
    },
    Limited {
        order_by: String,
        ascending: bool,
        limit: u64,
    },
}

/// SELECT 문장 빌더
///
/// `select` / `orderedSelect` / `limitedOrderedSelect` 세 가지 형태를
/// 생성자별로 제공합니다.
pub struct SelectBuilder<'a> {
    table: &'a str,
    variant: SelectVariant,
    mode: BindMode,
}

impl<'a> SelectBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            variant: SelectVariant::Plain,
            mode: BindMode::default(),
        }
    }

    pub fn ordered(table: &'a str, order_by: impl Into<String>, ascending: bool) -> Self {
        Self {
            table,
            variant: SelectVariant::Ordered {
                order_by: order_by.into(),
                ascending,
            },
            mode: BindMode::default(),
        }
    }

    pub fn limited(
        table: &'a str,
        order_by: impl Into<String>,
        ascending: bool,
        limit: u64,
    ) -> Self {
        Self {
            table,
            variant: SelectVariant::Limited {
                order_by: order_by.into(),
                ascending,
                limit,
            },
            mode: BindMode::default(),
        }
    }

    pub fn bind_mode(mut self, mode: BindMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(&self, conditions: &ConditionSet) -> Statement {
        let where_fragment = conditions.compile(self.mode);

        let sql = match &self.variant {
            SelectVariant::Plain => Template::parse("SELECT * FROM `{table}` WHERE {where}; ")
                .render(&[("table", self.table), ("where", &where_fragment.sql)]),
            SelectVariant::Ordered { order_by, ascending } => Template::parse(
                "SELECT * FROM `{table}` WHERE {where} ORDER BY {orderBy} {sortOrder}; ",
            )
            .render(&[
                ("table", self.table),
                ("where", &where_fragment.sql),
                ("orderBy", order_by),
                ("sortOrder", sort_order(*ascending)),
            ]),
            SelectVariant::Limited {
                order_by,
                ascending,
                limit,
            } => Template::parse(
                "SELECT * FROM `{table}` WHERE {where} ORDER BY {orderBy} {sortOrder} LIMIT {limit}; ",
            )
            .render(&[
                ("table", self.table),
                ("where", &where_fragment.sql),
                ("orderBy", order_by),
                ("sortOrder", sort_order(*ascending)),
                ("limit", &limit.to_string()),
            ]),
        };

        Statement {
            sql,
            params: where_fragment.params,
        }
    }
}

fn sort_order(ascending: bool) -> &'static str {
    if ascending {
        "ASC"
    } else {
        "DESC"
    }
}

/// 전체 SELECT 문장 빌더
pub struct SelectAllBuilder<'a> {
    table: &'a str,
}

impl<'a> SelectAllBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self { table }
    }

    pub fn build(&self) -> Statement {
        Statement {
            sql: Template::parse("SELECT * FROM `{table}`; ").render(&[("table", self.table)]),
            params: Vec::new(),
        }
    }
}

/// CREATE INDEX 문장 빌더
pub struct IndexBuilder<'a> {
    table: &'a str,
    name: &'a str,
    unique: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(table: &'a str, name: &'a str) -> Self {
        Self {
            table,
            name,
            unique: false,
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn build(&self, columns: &[&str]) -> Statement {
        let template =
            Template::parse("CREATE {unique} INDEX IF NOT EXISTS `{index}` ON `{table}`({columns})");
        Statement {
            sql: template.render(&[
                ("unique", if self.unique { "UNIQUE" } else { "" }),
                ("index", self.name),
                ("table", self.table),
                ("columns", &columns.join(",")),
            ]),
            params: Vec::new(),
        }
    }
}

/// CREATE TABLE 문장 빌더
///
/// PRIMARY KEY 컬럼 목록이 필요하면 `TableSchema::compile`을 직접 호출해
/// 얻습니다 (빌더는 컬럼 정의 텍스트만 사용).
pub struct CreateTableBuilder<'a> {
    table: &'a str,
}

impl<'a> CreateTableBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self { table }
    }

    pub fn build(&self, schema: &TableSchema) -> Statement {
        let template = Template::parse("CREATE TABLE IF NOT EXISTS `{tableName}` ({fields}); ");
        let fragment = schema.compile();

        Statement {
            sql: template.render(&[
                ("tableName", self.table),
                ("fields", &fragment.columns_sql),
            ]),
            params: Vec::new(),
        }
    }
}

/// DROP TABLE 문장 빌더
pub struct DropTableBuilder<'a> {
    table: &'a str,
}

impl<'a> DropTableBuilder<'a> {
    pub fn new(table: &'a str) -> Self {
        Self { table }
    }

    pub fn build(&self) -> Statement {
        Statement {
            sql: Template::parse("DROP TABLE IF EXISTS `{table}`; ").render(&[(
                "table",
                self.table,
            )]),
            params: Vec::new(),
        }
    }
}
