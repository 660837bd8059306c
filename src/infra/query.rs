use crate::types::{DbError, DbResult};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Postgres, QueryBuilder, Row as SqlxRow};
use std::collections::HashMap;

/// クエリ結果の1行（列名 → 文字列値またはNULL）
///
/// SQL実行とレコード構築の間の中間表現。数値や日時などの非文字列列は
/// 変換時に文字列表現へ落とし込む。
pub type Row = HashMap<String, Option<String>>;

// プレースホルダにバインドできる値の表現
// 等値検索・挿入で文字列と数値を混在させるために使う
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// 値を型に応じたプレースホルダとしてクエリに積む
fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &SqlValue) {
    match value {
        SqlValue::Null => qb.push_bind(Option::<String>::None),
        SqlValue::Int(v) => qb.push_bind(*v),
        SqlValue::Float(v) => qb.push_bind(*v),
        SqlValue::Bool(v) => qb.push_bind(*v),
        SqlValue::Text(v) => qb.push_bind(v.clone()),
    };
}

// 1列を文字列表現に変換する。対応しない型はNone（外側）を返す
fn render_column(row: &PgRow, index: usize) -> Option<Option<String>> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Some(v);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Some(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Some(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Some(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Some(v.map(|b| b.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return Some(v.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return Some(v.map(|d| d.format("%Y-%m-%d").to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return Some(v.map(|dt| dt.to_rfc3339()));
    }
    None
}

/// 取得結果の1行を列名→文字列値のマップに変換する
///
/// 接続側のフェッチモード既定値には依存せず、呼び出しごとにここで形を決める。
pub fn row_to_map(row: &PgRow) -> DbResult<Row> {
    let mut map = Row::new();
    for column in row.columns() {
        let rendered =
            render_column(row, column.ordinal()).ok_or_else(|| DbError::decode(column.name()))?;
        map.insert(column.name().to_string(), rendered);
    }
    Ok(map)
}

/// SQL文字列をそのまま実行し、全行をマップ形式で返す
///
/// パラメータは受け取らない。SQLは信頼できる内部呼び出し元が組み立てた
/// 固定文字列に限る。
pub async fn execute_raw(sql: &str, pool: &PgPool) -> DbResult<Vec<Row>> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::from_execution("SQL文字列の直接実行", e))?;

    rows.iter().map(row_to_map).collect()
}

/// テーブルの全行を取得する
///
/// テーブル名は信頼できるリテラルのみ（外部入力を渡してはならない）。
pub async fn select_all(table: &str, pool: &PgPool) -> DbResult<Vec<Row>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
    qb.push(table);

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::from_execution(format!("{}の全件取得", table), e))?;

    rows.iter().map(row_to_map).collect()
}

/// テーブルに1行挿入する
///
/// `INSERT INTO <table> (<keys>) VALUES ($1, ...)`を組み立て、
/// 各値をキー順のプレースホルダにバインドする。成功時は`Ok(true)`。
pub async fn insert(table: &str, fields: &[(&str, SqlValue)], pool: &PgPool) -> DbResult<bool> {
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
    qb.push(table);
    qb.push(" (");
    for (i, (key, _)) in fields.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*key);
    }
    qb.push(") VALUES (");
    for (i, (_, value)) in fields.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, value);
    }
    qb.push(")");

    let result = qb
        .build()
        .execute(pool)
        .await
        .map_err(|e| DbError::from_execution(format!("{}への行挿入", table), e))?;

    Ok(result.rows_affected() > 0)
}

/// 等値条件で1行を検索する
///
/// 複数キーは必ずANDで連結する。一致する行がなければ`Ok(None)`。
pub async fn find_one_by(
    table: &str,
    fields: &[(&str, SqlValue)],
    pool: &PgPool,
) -> DbResult<Option<Row>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
    qb.push(table);
    for (i, (key, value)) in fields.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(*key);
        qb.push(" = ");
        push_value(&mut qb, value);
    }

    let row = qb
        .build()
        .fetch_optional(pool)
        .await
        .map_err(|e| DbError::from_execution(format!("{}の等値検索", table), e))?;

    row.as_ref().map(row_to_map).transpose()
}
