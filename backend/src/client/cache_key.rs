//! Deterministic cache keys for query results.

use std::fmt;

use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use super::invalidation::Entity;

/// Raised when a command name cannot be keyed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheKeyError {
    /// The command does not address a cacheable entity.
    #[error("command `{0}` does not address a known entity")]
    UnknownEntity(String),
    /// The canonical parameters could not be encoded.
    #[error("failed to encode canonical parameters: {message}")]
    Serialization { message: String },
}

/// Identity of one cached query: its entity plus a SHA-256 digest of
/// `{entity, operation, params}` in canonical JSON.
///
/// Canonical JSON sorts object keys recursively, keeps array order and has
/// no whitespace, so parameter objects that differ only in key order share
/// a key.
///
/// # Examples
/// ```
/// use backoffice::client::CacheKey;
/// use serde_json::json;
///
/// let a = CacheKey::for_command("brands:list", &json!({"page": 1, "loggedUserId": 3}))?;
/// let b = CacheKey::for_command("brands:list", &json!({"loggedUserId": 3, "page": 1}))?;
/// assert_eq!(a, b);
/// # Ok::<(), backoffice::client::CacheKeyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    entity: Entity,
    digest: [u8; 32],
}

impl CacheKey {
    /// Key the query `command` (e.g. `products:list`) issued with `params`.
    ///
    /// # Errors
    /// Returns [`CacheKeyError::UnknownEntity`] when the command prefix is
    /// not an entity.
    pub fn for_command(command: &str, params: &Value) -> Result<Self, CacheKeyError> {
        let entity = Entity::of_command(command)
            .ok_or_else(|| CacheKeyError::UnknownEntity(command.to_owned()))?;
        let operation = command
            .split_once(':')
            .map_or(command, |(_, operation)| operation);
        let identity = json!({
            "entity": entity.as_str(),
            "operation": operation,
            "params": params,
        });
        let bytes = serde_json::to_vec(&canonicalize(&identity)).map_err(|err| {
            CacheKeyError::Serialization {
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            entity,
            digest: Sha256::digest(&bytes).into(),
        })
    }

    /// Entity whose invalidation drops this key.
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, hex::encode(self.digest))
    }
}

/// Recursively sort object keys.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by_key(|(key, _)| key.as_str());
            let canonical: Map<String, Value> = sorted
                .into_iter()
                .map(|(key, nested)| (key.clone(), canonicalize(nested)))
                .collect();
            Value::Object(canonical)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(command: &str, params: Value) -> CacheKey {
        CacheKey::for_command(command, &params).expect("cache key")
    }

    #[rstest]
    fn nested_key_order_does_not_matter() {
        let a = key(
            "orders:list",
            json!({"loggedUserId": 1, "filter": {"b": [1, 2], "a": null}}),
        );
        let b = key(
            "orders:list",
            json!({"filter": {"a": null, "b": [1, 2]}, "loggedUserId": 1}),
        );
        assert_eq!(a, b);
    }

    #[rstest]
    #[case::different_page(json!({"loggedUserId": 1, "page": 2}))]
    #[case::different_user(json!({"loggedUserId": 2, "page": 1}))]
    #[case::number_as_string(json!({"loggedUserId": 1, "page": "1"}))]
    fn different_parameters_give_different_keys(#[case] other: Value) {
        let base = key("brands:list", json!({"loggedUserId": 1, "page": 1}));
        assert_ne!(base, key("brands:list", other));
    }

    #[rstest]
    fn array_order_matters() {
        assert_ne!(
            key("brands:list", json!({"ids": [1, 2]})),
            key("brands:list", json!({"ids": [2, 1]}))
        );
    }

    #[rstest]
    fn operation_and_entity_are_part_of_the_key() {
        let params = json!({"loggedUserId": 1});
        let list = key("brands:list", params.clone());
        assert_ne!(list, key("brands:get", params.clone()));
        assert_ne!(list, key("categories:list", params));
        assert_eq!(list.entity(), Entity::Brands);
    }

    #[rstest]
    fn display_is_entity_prefixed_hex() {
        let rendered = key("users:list", json!({})).to_string();
        let (entity, digest) = rendered.split_once(':').expect("separator");
        assert_eq!(entity, "users");
        assert_eq!(digest.len(), 64);
    }

    #[rstest]
    fn commands_without_entities_are_rejected() {
        assert_eq!(
            CacheKey::for_command("login", &json!({})),
            Err(CacheKeyError::UnknownEntity("login".to_owned()))
        );
    }
}
