//! Records the storefront's page generators consume.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A product row with an explicit partial schema.
///
/// Known fields are typed. Anything else the catalog team attaches to a
/// product (badges, shipping notes, campaign flags) lives in `extra`,
/// backed by the `attributes` JSONB column, so the boundary stays bounded
/// instead of any-shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
