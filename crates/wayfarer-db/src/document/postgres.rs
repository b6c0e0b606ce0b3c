//! Postgres document store
//!
//! One table per collection (`id UUID`, `body JSONB`, insertion `seq`, timestamps).
//! Filters compile to JSONB operators:
//! - `@>` containment for equality and array membership (uses the GIN index)
//! - `->>` with `lower()` for case-insensitive equality
//! - `regexp_replace` for whitespace-collapsed equality
//! - `jsonb_array_elements_text` for element prefix matches

use super::filter::{validate_field, Condition, Filter, FindOptions, SortOrder};
use super::{Collection, DocumentStore};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::postgres::PgArguments;
use sqlx::{Arguments, PgPool};
use uuid::Uuid;
use wayfarer_core::AppError;

#[derive(Debug, Clone)]
enum Bind {
    Text(String),
    Json(Value),
    Id(Uuid),
    Int(i64),
}

/// Accumulates positional parameters while a WHERE clause is built.
#[derive(Debug, Default)]
struct Params {
    binds: Vec<Bind>,
}

impl Params {
    fn push(&mut self, bind: Bind) -> usize {
        self.binds.push(bind);
        self.binds.len()
    }

    fn into_arguments(self) -> Result<PgArguments, AppError> {
        let mut args = PgArguments::default();
        for bind in self.binds {
            let added = match bind {
                Bind::Text(v) => args.add(v),
                Bind::Json(v) => args.add(v),
                Bind::Id(v) => args.add(v),
                Bind::Int(v) => args.add(v),
            };
            added.map_err(|e| AppError::Persistence(format!("Failed to bind parameter: {}", e)))?;
        }
        Ok(args)
    }
}

/// `{field: value}`, the right-hand side of a containment test.
fn single_field(field: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(field.to_string(), value);
    Value::Object(object)
}

fn condition_sql(condition: &Condition, params: &mut Params) -> String {
    match condition {
        Condition::Eq(field, value) => {
            let n = params.push(Bind::Json(single_field(field, value.clone())));
            format!("body @> ${}::jsonb", n)
        }
        Condition::EqIgnoreCase(field, value) => {
            let k = params.push(Bind::Text(field.clone()));
            let v = params.push(Bind::Text(value.clone()));
            format!("lower(body->>(${}::text)) = lower(${}::text)", k, v)
        }
        Condition::EqUnderscored(field, value) => {
            let k = params.push(Bind::Text(field.clone()));
            let v = params.push(Bind::Text(value.clone()));
            format!(
                "regexp_replace(regexp_replace(body->>(${}::text), '^\\s+|\\s+$', '', 'g'), '\\s+', '_', 'g') = ${}::text",
                k, v
            )
        }
        Condition::Contains(field, value) => {
            let n = params.push(Bind::Json(single_field(field, json!([value]))));
            format!("body @> ${}::jsonb", n)
        }
        Condition::ElementPrefix(field, prefix) => {
            let k = params.push(Bind::Text(field.clone()));
            let p = params.push(Bind::Text(prefix.clone()));
            format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements_text(CASE WHEN jsonb_typeof(body->(${k}::text)) = 'array' THEN body->(${k}::text) ELSE '[]'::jsonb END) AS e(elem) WHERE left(e.elem, length(${p}::text)) = ${p}::text)",
                k = k,
                p = p
            )
        }
        Condition::NotId(id) => {
            let n = params.push(Bind::Id(*id));
            format!("id <> ${}", n)
        }
        Condition::Any(conditions) if conditions.is_empty() => "FALSE".to_string(),
        Condition::Any(conditions) => {
            let parts: Vec<String> = conditions
                .iter()
                .map(|c| condition_sql(c, params))
                .collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

fn where_clause(filter: &Filter, params: &mut Params) -> Result<String, AppError> {
    filter.validate()?;
    if filter.is_empty() {
        return Ok("TRUE".to_string());
    }
    let parts: Vec<String> = filter
        .conditions
        .iter()
        .map(|c| condition_sql(c, params))
        .collect();
    Ok(parts.join(" AND "))
}

/// Document store backed by Postgres JSONB tables
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self, body), fields(db.table = %collection, db.operation = "insert", db.record_id = %id))]
    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2)",
            collection.table_name()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = %collection, db.operation = "select", db.record_id = %id))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, AppError> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", collection.table_name());
        let body = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(body)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = %collection, db.operation = "select", id_count = ids.len()))]
    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[Uuid],
    ) -> Result<Vec<Value>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT body FROM {} WHERE id = ANY($1) ORDER BY seq ASC",
            collection.table_name()
        );
        let bodies = sqlx::query_scalar::<_, Value>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(bodies)
    }

    #[tracing::instrument(skip(self, filter), fields(db.table = %collection, db.operation = "select", filter_count = filter.conditions.len()))]
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        let mut params = Params::default();
        let where_sql = where_clause(filter, &mut params)?;
        let direction = match options.order {
            SortOrder::Oldest => "ASC",
            SortOrder::Newest => "DESC",
        };

        let mut sql = format!(
            "SELECT body FROM {} WHERE {} ORDER BY seq {}",
            collection.table_name(),
            where_sql,
            direction
        );
        if let Some(limit) = options.limit {
            let n = params.push(Bind::Int(limit as i64));
            sql.push_str(&format!(" LIMIT ${}", n));
        }
        if options.offset > 0 {
            let n = params.push(Bind::Int(options.offset as i64));
            sql.push_str(&format!(" OFFSET ${}", n));
        }

        let bodies = sqlx::query_scalar_with::<_, Value, _>(&sql, params.into_arguments()?)
            .fetch_all(&self.pool)
            .await?;
        Ok(bodies)
    }

    #[tracing::instrument(skip(self, filter), fields(db.table = %collection, db.operation = "count"))]
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError> {
        let mut params = Params::default();
        let where_sql = where_clause(filter, &mut params)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            collection.table_name(),
            where_sql
        );
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, params.into_arguments()?)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    #[tracing::instrument(skip(self, body), fields(db.table = %collection, db.operation = "update", db.record_id = %id))]
    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "UPDATE {} SET body = $2, updated_at = NOW() WHERE id = $1",
            collection.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = %collection, db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING body",
            collection.table_name()
        );
        let body = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(body)
    }

    #[tracing::instrument(skip(self, value), fields(db.table = %collection, db.operation = "add_to_set", db.record_id = %id, field = %field))]
    async fn add_to_set(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError> {
        validate_field(field)?;
        // Single statement: the row lock makes check-and-append atomic.
        let sql = format!(
            r#"
            UPDATE {}
            SET body = jsonb_set(
                    body,
                    ARRAY[$2::text],
                    CASE
                        WHEN COALESCE(body->($2::text), '[]'::jsonb) @> jsonb_build_array($3::jsonb)
                            THEN COALESCE(body->($2::text), '[]'::jsonb)
                        ELSE COALESCE(body->($2::text), '[]'::jsonb) || jsonb_build_array($3::jsonb)
                    END,
                    true
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
            collection.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(field)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, value), fields(db.table = %collection, db.operation = "pull", db.record_id = %id, field = %field))]
    async fn pull(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError> {
        validate_field(field)?;
        let sql = format!(
            r#"
            UPDATE {}
            SET body = jsonb_set(
                    body,
                    ARRAY[$2::text],
                    COALESCE(
                        (SELECT jsonb_agg(e.item)
                         FROM jsonb_array_elements(COALESCE(body->($2::text), '[]'::jsonb)) AS e(item)
                         WHERE e.item <> $3::jsonb),
                        '[]'::jsonb
                    ),
                    true
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
            collection.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(field)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_numbers_parameters() {
        let filter = Filter::new()
            .eq("state", "Goa")
            .not_id(Uuid::new_v4())
            .any(vec![
                Condition::EqIgnoreCase("state".to_string(), "goa".to_string()),
                Condition::ElementPrefix("images".to_string(), "Goa/".to_string()),
            ]);
        let mut params = Params::default();
        let sql = where_clause(&filter, &mut params).unwrap();

        assert_eq!(params.binds.len(), 6);
        assert!(sql.starts_with("body @> $1::jsonb AND id <> $2 AND ("));
        assert!(sql.contains("lower(body->>($3::text)) = lower($4::text)"));
        assert!(sql.contains("length($6::text)) = $6::text"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let mut params = Params::default();
        assert_eq!(where_clause(&Filter::new(), &mut params).unwrap(), "TRUE");
        assert!(params.binds.is_empty());

        let sql = where_clause(&Filter::new().any(vec![]), &mut params).unwrap();
        assert_eq!(sql, "FALSE");
    }

    #[test]
    fn test_eq_underscored_normalizes_stored_value() {
        let mut params = Params::default();
        let sql = where_clause(&Filter::new().eq_underscored("state", "Tamil_Nadu"), &mut params)
            .unwrap();

        assert_eq!(params.binds.len(), 2);
        assert!(sql.starts_with("regexp_replace(regexp_replace(body->>($1::text)"));
        assert!(sql.ends_with("'\\s+', '_', 'g') = $2::text"));
    }

    #[test]
    fn test_contains_builds_array_document() {
        let mut params = Params::default();
        where_clause(&Filter::new().contains("themeIds", "t1"), &mut params).unwrap();
        match &params.binds[0] {
            Bind::Json(v) => assert_eq!(v, &json!({"themeIds": ["t1"]})),
            other => panic!("unexpected bind {:?}", other),
        }
    }
}
