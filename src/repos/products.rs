//! Product reads for page generation.

use std::collections::BTreeMap;

use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::debug;

use crate::diagnostics;
use crate::error::{DatastoreError, Result};
use crate::models::ProductRecord;
use crate::namespace::Namespace;

const COLUMNS: &str = "id, slug, title, description, price_cents, image_url, updated_at, attributes";

/// Product repository
pub struct ProductRepo<'a> {
    ns: &'a Namespace,
}

impl<'a> ProductRepo<'a> {
    pub fn new(ns: &'a Namespace) -> Self {
        Self { ns }
    }

    /// Fetch a single product by slug.
    ///
    /// A miss is not an error: it emits a `resource-not-found` diagnostic
    /// and returns `None`, and the calling page flow falls back to its
    /// static default.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ProductRecord>> {
        let relation = self.ns.relation("products");
        let query = format!("SELECT {COLUMNS} FROM {relation} WHERE slug = $1");

        let row = sqlx::query(&query)
            .bind(slug)
            .fetch_optional(self.ns.pool())
            .await
            .map_err(|err| DatastoreError::query(relation.as_str(), err))?;

        match row {
            Some(row) => Ok(Some(record_from_row(&relation, &row)?)),
            None => {
                debug!(
                    category = diagnostics::RESOURCE_NOT_FOUND,
                    slug, "product lookup returned no rows"
                );
                Ok(None)
            }
        }
    }

    /// List published products, most recently updated first
    pub async fn list_published(&self, limit: i64) -> Result<Vec<ProductRecord>> {
        let relation = self.ns.relation("products");
        let query = format!(
            "SELECT {COLUMNS} FROM {relation} WHERE published ORDER BY updated_at DESC LIMIT $1"
        );

        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(self.ns.pool())
            .await
            .map_err(|err| DatastoreError::query(relation.as_str(), err))?;

        rows.iter()
            .map(|row| record_from_row(&relation, row))
            .collect()
    }
}

fn record_from_row(relation: &str, row: &PgRow) -> Result<ProductRecord> {
    let wrap = |err: sqlx::Error| DatastoreError::query(relation, err);

    let attributes: Option<serde_json::Value> = row.try_get("attributes").map_err(wrap)?;
    let extra: BTreeMap<String, serde_json::Value> = match attributes {
        Some(serde_json::Value::Object(map)) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };

    Ok(ProductRecord {
        id: row.try_get("id").map_err(wrap)?,
        slug: row.try_get("slug").map_err(wrap)?,
        title: row.try_get("title").map_err(wrap)?,
        description: row.try_get("description").map_err(wrap)?,
        price_cents: row.try_get("price_cents").map_err(wrap)?,
        image_url: row.try_get("image_url").map_err(wrap)?,
        updated_at: row.try_get("updated_at").map_err(wrap)?,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ConnectionCache;
    use crate::config::DatastoreConfig;

    // Integration tests require a real database.
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    // Each test gets its own schema so the suite can run in parallel.
    async fn fixture_namespace(schema: &str) -> Namespace {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let mut config = DatastoreConfig::new(url);
        config.namespace = schema.to_string();

        let cache = ConnectionCache::new(config);
        let handle = cache.acquire().await.expect("connect failed");
        let ns = cache.resolve_namespace(handle);

        sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
            .execute(ns.pool())
            .await
            .expect("drop fixture schema");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(ns.pool())
            .await
            .expect("create fixture schema");
        sqlx::query(&format!(
            r#"
            CREATE TABLE {} (
                id UUID PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                description TEXT,
                price_cents BIGINT NOT NULL,
                image_url TEXT,
                published BOOLEAN NOT NULL DEFAULT TRUE,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                attributes JSONB NOT NULL DEFAULT '{{}}'::jsonb
            )
            "#,
            ns.relation("products")
        ))
        .execute(ns.pool())
        .await
        .expect("create fixture table");

        ns
    }

    async fn insert_product(ns: &Namespace, slug: &str, published: bool, attributes: &str) {
        sqlx::query(&format!(
            "INSERT INTO {} (id, slug, title, price_cents, published, attributes) \
             VALUES ($1, $2, $3, $4, $5, $6::jsonb)",
            ns.relation("products")
        ))
        .bind(uuid::Uuid::new_v4())
        .bind(slug)
        .bind(format!("Product {slug}"))
        .bind(1800i64)
        .bind(published)
        .bind(attributes)
        .execute(ns.pool())
        .await
        .expect("insert fixture row");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_by_slug_round_trips_attributes() {
        let ns = fixture_namespace("storefront_test_get_by_slug").await;
        insert_product(&ns, "enamel-mug", true, r#"{"badge": "bestseller"}"#).await;

        let repo = ProductRepo::new(&ns);
        let record = repo
            .get_by_slug("enamel-mug")
            .await
            .expect("query failed")
            .expect("row missing");

        assert_eq!(record.slug, "enamel-mug");
        assert_eq!(
            record.extra.get("badge"),
            Some(&serde_json::json!("bestseller"))
        );

        let miss = repo.get_by_slug("no-such-slug").await.expect("query failed");
        assert!(miss.is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_published_excludes_drafts() {
        let ns = fixture_namespace("storefront_test_list_published").await;
        insert_product(&ns, "tote-bag", true, "{}").await;
        insert_product(&ns, "draft-item", false, "{}").await;

        let repo = ProductRepo::new(&ns);
        let records = repo.list_published(10).await.expect("query failed");

        assert!(records.iter().any(|r| r.slug == "tote-bag"));
        assert!(records.iter().all(|r| r.slug != "draft-item"));
    }
}
