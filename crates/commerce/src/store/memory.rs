//! In-memory document store.
//!
//! Backs the test suites and local experiments with the same semantics as
//! the Postgres implementation: per-document atomicity on the single
//! operations and all-or-nothing batches. Batches apply to a copy of the
//! state that is only swapped in once every operation has succeeded.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{DocumentStore, Query, SortOrder, StoreError, WriteBatch, WriteOp};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Hash-map-backed store, safe for concurrent use from multiple tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Total order over optional JSON values for sorting query results.
///
/// Missing fields sort first; numbers compare numerically, everything else
/// by its JSON serialization (ISO-8601 timestamps therefore sort
/// chronologically).
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => left.to_string().cmp(&right.to_string()),
        },
    }
}

fn matches(doc: &Value, query: &Query) -> bool {
    query
        .filters
        .iter()
        .all(|filter| doc.get(&filter.field) == Some(&filter.value))
}

/// Apply one op to the working copy. Errors leave the copy dirty; the caller
/// discards it instead of swapping it in.
fn apply_op(state: &mut Collections, op: &WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Insert {
            collection,
            id,
            data,
        } => {
            let docs = state.entry(collection.clone()).or_default();
            if docs.contains_key(id) {
                return Err(StoreError::AlreadyExists {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
            docs.insert(id.clone(), data.clone());
            Ok(())
        }
        WriteOp::Update {
            collection,
            id,
            patch,
        } => {
            let doc = state
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                })?;
            merge_patch(doc, patch)
        }
        WriteOp::Increment {
            collection,
            id,
            field,
            delta,
            floor,
        } => {
            let doc = state
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                })?;
            let current = doc.get(field).and_then(Value::as_i64).ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "field '{field}' on {collection}/{id} is not an integer"
                ))
            })?;
            let next = current + delta;
            if let Some(floor) = floor
                && next < *floor
            {
                return Err(StoreError::ConditionFailed {
                    collection: collection.clone(),
                    id: id.clone(),
                    condition: format!("{field} {current} + {delta} >= {floor}"),
                });
            }
            doc[field.as_str()] = Value::from(next);
            Ok(())
        }
        WriteOp::Delete { collection, id } => {
            let removed = state
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some();
            if removed {
                Ok(())
            } else {
                Err(StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                })
            }
        }
    }
}

fn merge_patch(doc: &mut Value, patch: &Value) -> Result<(), StoreError> {
    let fields = patch
        .as_object()
        .ok_or_else(|| StoreError::Corrupt("update patch must be a JSON object".to_string()))?;
    for (key, value) in fields {
        doc[key.as_str()] = value.clone();
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let guard = self.collections.read().await;
        let mut results: Vec<Value> = guard
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches(doc, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(guard);

        if let Some(order) = &query.order_by {
            results.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(0);
        let mut results: Vec<Value> = results.into_iter().skip(offset).collect();
        if let Some(limit) = query.limit {
            results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(results)
    }

    async fn add(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        apply_op(
            &mut guard,
            &WriteOp::Insert {
                collection: collection.to_string(),
                id: id.to_string(),
                data,
            },
        )
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        apply_op(
            &mut guard,
            &WriteOp::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                patch,
            },
        )
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut guard = self.collections.write().await;
        Ok(guard
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        // Work on a copy so a mid-batch failure leaves the store untouched.
        let mut working = guard.clone();
        for op in batch.ops() {
            apply_op(&mut working, op)?;
        }
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_get_round_trip() {
        let store = MemoryStore::new();
        store
            .add("products", "p1", json!({"name": "Tote", "inventory_count": 4}))
            .await
            .expect("add");
        let doc = store.get("products", "p1").await.expect("get");
        assert_eq!(doc.expect("present")["name"], "Tote");
    }

    #[tokio::test]
    async fn test_add_conflict() {
        let store = MemoryStore::new();
        store.add("products", "p1", json!({})).await.expect("add");
        let err = store.add("products", "p1", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .add("products", "p1", json!({"name": "Tote", "status": "active"}))
            .await
            .expect("add");
        store
            .update("products", "p1", json!({"status": "inactive"}))
            .await
            .expect("update");
        let doc = store.get("products", "p1").await.expect("get").expect("present");
        assert_eq!(doc["name"], "Tote");
        assert_eq!(doc["status"], "inactive");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update("products", "nope", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        store.add("products", "p1", json!({})).await.expect("add");
        assert!(store.delete("products", "p1").await.expect("delete"));
        assert!(!store.delete("products", "p1").await.expect("delete"));
    }

    #[tokio::test]
    async fn test_query_filters_orders_and_paginates() {
        let store = MemoryStore::new();
        for (id, status, created) in [
            ("a", "active", "2026-01-01T00:00:00Z"),
            ("b", "inactive", "2026-01-02T00:00:00Z"),
            ("c", "active", "2026-01-03T00:00:00Z"),
            ("d", "active", "2026-01-04T00:00:00Z"),
        ] {
            store
                .add("products", id, json!({"id": id, "status": status, "created_at": created}))
                .await
                .expect("add");
        }

        let query = Query::new()
            .filter(super::super::Filter::eq("status", "active"))
            .order_desc("created_at")
            .limit(2);
        let results = store.query("products", &query).await.expect("query");
        let ids: Vec<&str> = results.iter().filter_map(|d| d["id"].as_str()).collect();
        assert_eq!(ids, vec!["d", "c"]);
    }

    #[tokio::test]
    async fn test_batch_is_atomic_on_guard_failure() {
        let store = MemoryStore::new();
        store
            .add("products", "p1", json!({"inventory_count": 1}))
            .await
            .expect("add");

        let mut batch = WriteBatch::new();
        batch.insert("orders", "o1", json!({"status": "pending"}));
        batch.increment("products", "p1", "inventory_count", -2, Some(0));
        let err = store.apply(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed { .. }));

        // Nothing from the batch landed.
        assert!(store.get("orders", "o1").await.expect("get").is_none());
        let doc = store.get("products", "p1").await.expect("get").expect("present");
        assert_eq!(doc["inventory_count"], 1);
    }

    #[tokio::test]
    async fn test_batch_increments_apply_progressively() {
        let store = MemoryStore::new();
        store
            .add("variants", "v1", json!({"inventory_count": 3}))
            .await
            .expect("add");

        // Two lines for the same variant in one checkout: 2 + 1 fits, but a
        // third unit would not.
        let mut batch = WriteBatch::new();
        batch.increment("variants", "v1", "inventory_count", -2, Some(0));
        batch.increment("variants", "v1", "inventory_count", -1, Some(0));
        store.apply(batch).await.expect("apply");

        let doc = store.get("variants", "v1").await.expect("get").expect("present");
        assert_eq!(doc["inventory_count"], 0);

        let mut over = WriteBatch::new();
        over.increment("variants", "v1", "inventory_count", -1, Some(0));
        assert!(store.apply(over).await.is_err());
    }
}
