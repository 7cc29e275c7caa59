use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::{PgPool, Row};

use crate::database::models::{BusinessProfile, BusinessSettings, UserAccount};
use crate::database::store::{BusinessStore, PublicRecord, StoreError, TokenStore};
use crate::filter::{Filter, FilterData, SqlResult};

/// Stable fetch order shared by every listing
const FETCH_ORDER: &str = "created_at asc, id asc";

/// Reads typed rows from one table through the filter language
pub struct PgCollection<T> {
    table_name: String,
    pool: PgPool,
    max_limit: Option<i32>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> PgCollection<T>
where
    T: DeserializeOwned + Send + Sync,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            max_limit: None,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn with_max_limit(mut self, max_limit: Option<i32>) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, StoreError> {
        select_rows(&self.pool, &self.table_name, self.max_limit, filter_data).await
    }

    pub async fn select_one(&self, where_clause: Value) -> Result<Option<T>, StoreError> {
        let filter_data = FilterData {
            where_clause: Some(where_clause),
            order: Some(json!(FETCH_ORDER)),
            limit: Some(1),
        };
        Ok(self.select_any(filter_data).await?.into_iter().next())
    }
}

#[async_trait]
impl<T> TokenStore for PgCollection<T>
where
    T: DeserializeOwned + PublicRecord + Clone + Send + Sync + 'static,
{
    type Record = T;

    fn collection(&self) -> &str {
        &self.table_name
    }

    async fn find_by_token(&self, token: &str) -> Result<Vec<T>, StoreError> {
        self.select_any(exact_token_filter(token)).await
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        self.select_any(list_all_filter()).await
    }
}

/// `business_settings` keyed by `owner_email`, `users` keyed by `email`
pub struct PgBusinessStore {
    settings: PgCollection<BusinessSettings>,
    users: PgCollection<UserAccount>,
}

impl PgBusinessStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            settings: PgCollection::new("business_settings", pool.clone()),
            users: PgCollection::new("users", pool),
        }
    }
}

#[async_trait]
impl BusinessStore for PgBusinessStore {
    async fn settings_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError> {
        let row = self.settings.select_one(json!({ "owner_email": owner })).await?;
        Ok(row.map(|s| s.profile))
    }

    async fn account_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError> {
        let row = self.users.select_one(json!({ "email": owner })).await?;
        Ok(row.as_ref().map(BusinessProfile::from))
    }
}

/// Exact read: visible rows whose stored token equals `token`
fn exact_token_filter(token: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "public_token": token })),
        order: Some(json!(FETCH_ORDER)),
        limit: None,
    }
}

/// Full read: every visible row, unbounded
fn list_all_filter() -> FilterData {
    FilterData {
        where_clause: None,
        order: Some(json!(FETCH_ORDER)),
        limit: None,
    }
}

/// Render a filtered select whose rows each come back as one JSON object
fn render_select(table_name: &str, max_limit: Option<i32>, filter_data: FilterData) -> Result<SqlResult, StoreError> {
    let mut filter = Filter::new(table_name)?;
    filter.max_limit(max_limit).assign(filter_data)?;
    let inner = filter.to_sql()?;

    Ok(SqlResult {
        query: format!("SELECT row_to_json(t) AS row FROM ({}) t", inner.query),
        params: inner.params,
    })
}

async fn select_rows<T: DeserializeOwned>(
    pool: &PgPool,
    table_name: &str,
    max_limit: Option<i32>,
    filter_data: FilterData,
) -> Result<Vec<T>, StoreError> {
    let sql_result = render_select(table_name, max_limit, filter_data)?;

    let mut q = sqlx::query(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param(q, p);
    }
    let rows = q.fetch_all(pool).await?;

    rows.into_iter()
        .map(|row| {
            let value: Value = row.try_get("row")?;
            serde_json::from_value(value).map_err(|source| StoreError::Decode {
                collection: table_name.to_string(),
                source,
            })
        })
        .collect()
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match v {
        Value::Null => q.bind(Option::<String>::None),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_read_sql() {
        let sql = render_select("invoices", Some(10_000), exact_token_filter("abc-123")).unwrap();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM \"invoices\" \
             WHERE \"trashed_at\" IS NULL AND \"public_token\" = $1 \
             ORDER BY \"created_at\" ASC, \"id\" ASC) t"
        );
        assert_eq!(sql.params, vec![json!("abc-123")]);
    }

    #[test]
    fn list_all_sql_is_unbounded() {
        let sql = render_select("reviews", Some(10), list_all_filter()).unwrap();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM \"reviews\" \
             WHERE \"trashed_at\" IS NULL ORDER BY \"created_at\" ASC, \"id\" ASC) t"
        );
        assert!(!sql.query.contains("LIMIT"));
        assert!(sql.params.is_empty());
    }

    #[test]
    fn owner_lookup_is_limited_to_one_row() {
        let filter = FilterData {
            where_clause: Some(json!({ "owner_email": "studio@acme.test" })),
            order: Some(json!(FETCH_ORDER)),
            limit: Some(1),
        };
        let sql = render_select("business_settings", None, filter).unwrap();
        assert!(sql.query.ends_with("ORDER BY \"created_at\" ASC, \"id\" ASC LIMIT 1) t"), "{}", sql.query);
    }

    #[test]
    fn rejects_unsafe_table_names() {
        assert!(matches!(
            render_select("invoices; drop table users", None, list_all_filter()),
            Err(StoreError::Filter(_))
        ));
    }
}
