use std::sync::Arc;

use viewgraph::catalog::{registry, ColumnType, TableId, TableViewType};
use viewgraph::presets::{self, PRESETS};
use viewgraph::query::SortField;
use viewgraph::views::{
    JsonFileViewStore, SeedOutcome, TableViewDefinition, ViewDefinitionStore, ViewError, ViewKey,
};

#[tokio::test]
async fn json_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views").join("store.json");

    let id = {
        let store = JsonFileViewStore::open(&path).await.unwrap();
        let report = presets::seed(&store, registry(), "acme", Some("u-1")).await;
        assert!(report.is_clean());

        let mut users = TableViewDefinition::new("acme", None, TableViewType::Users, TableId::Users, "Team");
        users.sort_override = Some(SortField::desc(ColumnType::UsersCreatedDate));
        store.upsert(users).await.unwrap().id
    };

    let store = JsonFileViewStore::open(&path).await.unwrap();
    let views = store.list("acme", Some("u-1")).await.unwrap();
    assert_eq!(views.len(), PRESETS.len() + 1);

    let users = store
        .get(&ViewKey::new("acme", None, TableId::Users))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(users.id, id);
    assert!(!users.is_preset);

    let portfolio = store
        .get(&ViewKey::new("acme", Some("u-1".to_string()), TableId::MyPortfolio))
        .await
        .unwrap()
        .unwrap();
    assert!(portfolio.is_preset);

    let again = presets::seed(&store, registry(), "acme", Some("u-1")).await;
    assert_eq!(again.unchanged.len(), PRESETS.len());
}

#[tokio::test]
async fn preset_deletion_is_refused_and_persisted_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = JsonFileViewStore::open(&path).await.unwrap();
    presets::seed(&store, registry(), "acme", None).await;

    let key = ViewKey::new("acme", None, TableId::Churn);
    assert_eq!(store.delete(&key).await, Err(ViewError::Protected(TableId::Churn)));

    let reopened = JsonFileViewStore::open(&path).await.unwrap();
    assert!(reopened.get(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn seeding_a_changed_preset_refreshes_shipped_fields_only() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn ViewDefinitionStore> =
        Arc::new(JsonFileViewStore::open(dir.path().join("store.json")).await.unwrap());

    let preset = PRESETS
        .iter()
        .find(|p| p.table_id == TableId::Leads)
        .unwrap()
        .build(registry(), "acme", None)
        .unwrap();
    assert_eq!(store.seed(preset.clone()).await.unwrap(), SeedOutcome::Created);

    let mut custom = preset.clone();
    custom.name = "Hot leads".to_string();
    custom.columns.truncate(2);
    store.upsert(custom).await.unwrap();

    let mut shipped = preset;
    shipped.icon = "flame".to_string();
    shipped.order = 42;
    assert_eq!(store.seed(shipped).await.unwrap(), SeedOutcome::Refreshed);

    let stored = store
        .get(&ViewKey::new("acme", None, TableId::Leads))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Hot leads");
    assert_eq!(stored.columns.len(), 2);
    assert_eq!(stored.icon, "flame");
    assert_eq!(stored.order, 42);
    assert!(stored.is_preset);
}

#[tokio::test]
async fn garbage_file_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        JsonFileViewStore::open(&path).await,
        Err(ViewError::Persistence(_))
    ));
}
