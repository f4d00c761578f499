use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Flat category record as served by the upstream catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// `None` marks a root category
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    /// Fields the service does not interpret, passed through unchanged.
    /// Never holds `children`: the subtree is owned by `CategoryNode`.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

/// Nullable upstream columns read as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CategoryRecord {
    /// Drop an upstream `children` key so it cannot clash with the built subtree
    pub fn strip_children(&mut self) {
        self.extra.remove("children");
    }
}
