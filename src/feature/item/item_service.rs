//! A service for interacting with items.
//!
//! Holds the request/response contract: uniqueness of names, not-found
//! handling, and the exact sequence of repository round-trips each
//! operation performs.

use crate::{
    feature::item::item_repository::{Item, ItemRepository, NewItem},
    infra::error::{ApiResult, ClientError, InternalError},
};
use tracing::instrument;

/// Creates a new item after verifying its name is unused.
///
/// The existence check and the insert are two separate round-trips; two
/// concurrent creates with the same name can both pass the check.
#[instrument(skip(repository))]
pub async fn create_item(repository: &dyn ItemRepository, new_item: &NewItem) -> ApiResult<Item> {
    if repository.find_by_name(&new_item.name).await?.is_some() {
        tracing::warn!("Duplicate item creation attempted: {}", new_item.name);
        return Err(ClientError::Conflict.into());
    }
    let item = repository.insert(new_item).await?;
    tracing::info!("Item created: {}", item.name);
    Ok(item)
}

/// Reads an item by name.
#[instrument(skip(repository))]
pub async fn get_item(repository: &dyn ItemRepository, name: &str) -> ApiResult<Item> {
    let Some(item) = repository.find_by_name(name).await? else {
        tracing::warn!("Item not found: {name}");
        return Err(ClientError::NotFound.into());
    };
    tracing::info!("Item retrieved: {name}");
    Ok(item)
}

/// Replaces the fields of the item matched by the path name with the
/// payload's fields.
///
/// The response is rebuilt by looking up the payload's name, which may
/// differ from the path name; this is what makes rename-on-update
/// observable.
#[instrument(skip(repository))]
pub async fn update_item(
    repository: &dyn ItemRepository,
    name: &str,
    new_item: &NewItem,
) -> ApiResult<Item> {
    let matched = repository.update_by_name(name, new_item).await?;
    if matched == 0 {
        tracing::warn!("Update failed. Item not found: {name}");
        return Err(ClientError::NotFound.into());
    }
    let item = repository
        .find_by_name(&new_item.name)
        .await?
        .ok_or_else(|| {
            InternalError::Other(format!(
                "updated item {} could not be read back",
                new_item.name
            ))
        })?;
    tracing::info!("Item updated: {name}");
    Ok(item)
}

/// Deletes an item by name and returns its last known state.
#[instrument(skip(repository))]
pub async fn delete_item(repository: &dyn ItemRepository, name: &str) -> ApiResult<Item> {
    let Some(item) = repository.find_by_name(name).await? else {
        tracing::warn!("Delete failed. Item not found: {name}");
        return Err(ClientError::NotFound.into());
    };
    repository.delete_by_name(name).await?;
    tracing::info!("Item deleted: {name}");
    Ok(item)
}

/// Lists all items.
#[instrument(skip(repository))]
pub async fn list_items(repository: &dyn ItemRepository) -> ApiResult<Vec<Item>> {
    tracing::info!("Retrieving all items");
    repository.find_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::item::item_repository::memory::InMemoryItemRepository;
    use crate::infra::error::ApiError;

    fn new_item(name: &str, description: Option<&str>) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn created_item_can_be_read_back() {
        let repository = InMemoryItemRepository::new();
        let created = create_item(&repository, &new_item("item1", Some("First item")))
            .await
            .unwrap();
        assert!(!created.id.is_empty());

        let fetched = get_item(&repository, "item1").await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(Some("First item".to_string()), fetched.description);
    }

    #[tokio::test]
    async fn creating_the_same_name_twice_is_a_conflict() {
        let repository = InMemoryItemRepository::new();
        create_item(&repository, &new_item("item1", None))
            .await
            .unwrap();

        let error = create_item(&repository, &new_item("item1", Some("again")))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::Conflict)
        ));

        // The failed create must not have inserted a duplicate.
        assert_eq!(1, list_items(&repository).await.unwrap().len());
    }

    #[tokio::test]
    async fn getting_an_unknown_name_is_not_found() {
        let repository = InMemoryItemRepository::new();
        let error = get_item(&repository, "missing").await.unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let repository = InMemoryItemRepository::new();
        create_item(&repository, &new_item("item1", Some("First item")))
            .await
            .unwrap();

        let updated = update_item(&repository, "item1", &new_item("item1", None))
            .await
            .unwrap();
        assert_eq!(None, updated.description);
    }

    #[tokio::test]
    async fn update_can_rename_an_item() {
        let repository = InMemoryItemRepository::new();
        create_item(&repository, &new_item("item1", Some("First item")))
            .await
            .unwrap();

        let updated = update_item(&repository, "item1", &new_item("item1b", Some("d")))
            .await
            .unwrap();
        assert_eq!("item1b", updated.name);

        let error = get_item(&repository, "item1").await.unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::NotFound)
        ));
        assert_eq!("item1b", get_item(&repository, "item1b").await.unwrap().name);
    }

    #[tokio::test]
    async fn updating_an_unknown_name_is_not_found() {
        let repository = InMemoryItemRepository::new();
        let error = update_item(&repository, "missing", &new_item("missing", None))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_returns_the_last_known_state() {
        let repository = InMemoryItemRepository::new();
        create_item(&repository, &new_item("item1", Some("First item")))
            .await
            .unwrap();

        let deleted = delete_item(&repository, "item1").await.unwrap();
        assert_eq!("item1", deleted.name);
        assert_eq!(Some("First item".to_string()), deleted.description);

        let error = get_item(&repository, "item1").await.unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::NotFound)
        ));
    }

    #[tokio::test]
    async fn deleting_an_unknown_name_is_not_found() {
        let repository = InMemoryItemRepository::new();
        let error = delete_item(&repository, "missing").await.unwrap_err();
        assert!(matches!(
            error,
            ApiError::ClientError(ClientError::NotFound)
        ));
    }

    #[tokio::test]
    async fn listing_an_empty_collection_returns_no_items() {
        let repository = InMemoryItemRepository::new();
        assert!(list_items(&repository).await.unwrap().is_empty());
    }
}
