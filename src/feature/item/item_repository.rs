//! Types and functions for storing and loading items from the database.

use crate::infra::{
    error::{ApiResult, InternalError},
    validation::{self, FieldError, FromJsonValue},
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// A new item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewItem {
    /// The item's name.
    #[schema(example = "item1")]
    pub name: String,
    /// The item's description.
    #[schema(example = "A very interesting item")]
    pub description: Option<String>,
}

impl FromJsonValue for NewItem {
    fn from_value(value: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = value.as_object() else {
            return Err(vec![FieldError::model_type()]);
        };
        let name = validation::require_string(object, "name");
        let description = validation::optional_string(object, "description");
        match (name, description) {
            (Ok(name), Ok(description)) => Ok(NewItem { name, description }),
            (name, description) => {
                Err(name.err().into_iter().chain(description.err()).collect())
            }
        }
    }
}

/// The stored shape of an item. The identifier is absent until the
/// database assigns one on insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
}

/// An existing item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// The identifier assigned by the database, rendered as a string.
    #[serde(rename = "_id")]
    #[schema(example = "66b1f9d2e4b0a6c8d9e01234")]
    pub id: String,
    /// The item's name.
    #[schema(example = "item1")]
    pub name: String,
    /// The item's description.
    #[schema(example = "A very interesting item")]
    pub description: Option<String>,
}

impl From<ItemDocument> for Item {
    fn from(document: ItemDocument) -> Self {
        Item {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: document.name,
            description: document.description,
        }
    }
}

/// The narrow persistence interface items are accessed through.
///
/// Implementations provide "find all", "find one by name", "insert one",
/// "update one by name", and "delete one by name"; everything else is the
/// service layer's business.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Returns every stored item, in database order.
    async fn find_all(&self) -> ApiResult<Vec<Item>>;

    /// Returns the item whose name matches exactly, if any.
    async fn find_by_name(&self, name: &str) -> ApiResult<Option<Item>>;

    /// Inserts a new item and returns it as re-read by its assigned id.
    async fn insert(&self, new_item: &NewItem) -> ApiResult<Item>;

    /// Replaces the fields of the item matched by name with the payload's
    /// fields. Returns the number of matched documents.
    async fn update_by_name(&self, name: &str, new_item: &NewItem) -> ApiResult<u64>;

    /// Deletes the item matched by name. Returns the number of deleted
    /// documents.
    async fn delete_by_name(&self, name: &str) -> ApiResult<u64>;
}

/// A shared, dynamically dispatched item repository.
pub type DynItemRepository = Arc<dyn ItemRepository>;

/// An [`ItemRepository`] backed by a MongoDB collection.
#[derive(Clone, Debug)]
pub struct MongoItemRepository {
    collection: Collection<ItemDocument>,
}

impl MongoItemRepository {
    /// Constructs a new repository over the given collection handle.
    pub fn new(collection: Collection<ItemDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ApiResult<Vec<Item>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> ApiResult<Option<Item>> {
        let document = self.collection.find_one(doc! { "name": name }).await?;
        Ok(document.map(Item::from))
    }

    #[instrument(skip(self))]
    async fn insert(&self, new_item: &NewItem) -> ApiResult<Item> {
        let document = ItemDocument {
            id: None,
            name: new_item.name.clone(),
            description: new_item.description.clone(),
        };
        let result = self.collection.insert_one(&document).await?;
        let created = self
            .collection
            .find_one(doc! { "_id": result.inserted_id })
            .await?;
        created.map(Item::from).ok_or_else(|| {
            InternalError::Other("inserted item could not be read back".to_string()).into()
        })
    }

    #[instrument(skip(self))]
    async fn update_by_name(&self, name: &str, new_item: &NewItem) -> ApiResult<u64> {
        let update = doc! {
            "$set": {
                "name": new_item.name.clone(),
                "description": new_item.description.clone(),
            }
        };
        let result = self
            .collection
            .update_one(doc! { "name": name }, update)
            .await?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete_by_name(&self, name: &str) -> ApiResult<u64> {
        let result = self.collection.delete_one(doc! { "name": name }).await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! An in-memory [`ItemRepository`] for exercising the service without a
    //! live database.

    use super::*;
    use tokio::sync::Mutex;

    /// Stores documents in insertion order, matching how an unsorted
    /// collection scan returns them.
    #[derive(Debug, Default)]
    pub(crate) struct InMemoryItemRepository {
        items: Mutex<Vec<ItemDocument>>,
    }

    impl InMemoryItemRepository {
        pub(crate) fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ItemRepository for InMemoryItemRepository {
        async fn find_all(&self) -> ApiResult<Vec<Item>> {
            let items = self.items.lock().await;
            Ok(items.iter().cloned().map(Item::from).collect())
        }

        async fn find_by_name(&self, name: &str) -> ApiResult<Option<Item>> {
            let items = self.items.lock().await;
            Ok(items
                .iter()
                .find(|document| document.name == name)
                .cloned()
                .map(Item::from))
        }

        async fn insert(&self, new_item: &NewItem) -> ApiResult<Item> {
            let mut items = self.items.lock().await;
            let document = ItemDocument {
                id: Some(ObjectId::new()),
                name: new_item.name.clone(),
                description: new_item.description.clone(),
            };
            items.push(document.clone());
            Ok(Item::from(document))
        }

        async fn update_by_name(&self, name: &str, new_item: &NewItem) -> ApiResult<u64> {
            let mut items = self.items.lock().await;
            match items.iter_mut().find(|document| document.name == name) {
                Some(document) => {
                    document.name = new_item.name.clone();
                    document.description = new_item.description.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete_by_name(&self, name: &str) -> ApiResult<u64> {
            let mut items = self.items.lock().await;
            match items.iter().position(|document| document.name == name) {
                Some(index) => {
                    items.remove(index);
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_with_name_and_description_parses() {
        let value = json!({"name": "item1", "description": "First item"});
        let new_item = NewItem::from_value(&value).unwrap();
        assert_eq!(
            NewItem {
                name: "item1".to_string(),
                description: Some("First item".to_string()),
            },
            new_item,
        );
    }

    #[test]
    fn payload_without_description_parses() {
        let value = json!({"name": "item1"});
        let new_item = NewItem::from_value(&value).unwrap();
        assert_eq!(None, new_item.description);
    }

    #[test]
    fn payload_with_extra_fields_ignores_them() {
        let value = json!({"name": "item1", "color": "red"});
        assert!(NewItem::from_value(&value).is_ok());
    }

    #[test]
    fn payload_missing_name_is_rejected() {
        let value = json!({"description": "First item"});
        let errors = NewItem::from_value(&value).unwrap_err();
        assert_eq!(1, errors.len());
        assert_eq!(["body", "name"], errors[0].loc());
        assert_eq!("missing", errors[0].kind());
    }

    #[test]
    fn payload_with_both_fields_invalid_reports_both() {
        let value = json!({"name": 1, "description": 2});
        let errors = NewItem::from_value(&value).unwrap_err();
        assert_eq!(2, errors.len());
        assert_eq!(["body", "name"], errors[0].loc());
        assert_eq!(["body", "description"], errors[1].loc());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let errors = NewItem::from_value(&json!(["item1"])).unwrap_err();
        assert_eq!(1, errors.len());
        assert_eq!(["body"], errors[0].loc());
        assert_eq!("model_type", errors[0].kind());
    }

    #[test]
    fn document_id_renders_as_hex_string() {
        let id = ObjectId::new();
        let item = Item::from(ItemDocument {
            id: Some(id),
            name: "item1".to_string(),
            description: None,
        });
        assert_eq!(id.to_hex(), item.id);
    }

    #[test]
    fn item_serializes_id_under_underscore_key() {
        let item = Item {
            id: "abc123".to_string(),
            name: "item1".to_string(),
            description: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json!({"_id": "abc123", "name": "item1", "description": null}),
            value
        );
    }
}
