//! Persistence of table-view definitions.
//!
//! Both backends share [`ViewMap`], which holds the merge rules; a backend
//! only decides where the map lives. Every mutation happens under one write
//! lock, so a definition is never observed half-written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::definition::{TableViewDefinition, ViewKey};
use super::errors::ViewError;

/// What seeding a preset did to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeedOutcome {
    Created,
    Refreshed,
    Unchanged,
}

#[async_trait]
pub trait ViewDefinitionStore: Send + Sync {
    async fn get(&self, key: &ViewKey) -> Result<Option<TableViewDefinition>, ViewError>;

    /// Views visible to a tenant/user pair: tenant-wide ones plus the
    /// user's own, ordered by `order` then table id.
    async fn list(
        &self,
        tenant: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<TableViewDefinition>, ViewError>;

    /// Inserts or replaces by key. The stored id, creation time and preset
    /// flag are preserved across replacements.
    async fn upsert(&self, def: TableViewDefinition) -> Result<TableViewDefinition, ViewError>;

    /// Creates the view if missing, otherwise refreshes only the shipped
    /// fields and leaves user customisation alone.
    async fn seed(&self, preset: TableViewDefinition) -> Result<SeedOutcome, ViewError>;

    async fn delete(&self, key: &ViewKey) -> Result<TableViewDefinition, ViewError>;
}

#[derive(Debug, Clone, Default)]
struct ViewMap {
    views: BTreeMap<ViewKey, TableViewDefinition>,
}

impl ViewMap {
    fn from_definitions(defs: Vec<TableViewDefinition>) -> Self {
        let mut map = ViewMap::default();
        for def in defs {
            if let Some(previous) = map.views.insert(def.key(), def) {
                log::warn!("Duplicate stored view for {}, keeping the later one", previous.table_id);
            }
        }
        map
    }

    fn definitions(&self) -> Vec<&TableViewDefinition> {
        self.views.values().collect()
    }

    fn get(&self, key: &ViewKey) -> Option<TableViewDefinition> {
        self.views.get(key).cloned()
    }

    fn list(&self, tenant: &str, user_id: Option<&str>) -> Vec<TableViewDefinition> {
        let mut views: Vec<_> = self
            .views
            .values()
            .filter(|v| v.tenant == tenant)
            .filter(|v| match v.user_id.as_deref() {
                None => true,
                Some(owner) => Some(owner) == user_id,
            })
            .cloned()
            .collect();
        views.sort_by(|a, b| a.order.cmp(&b.order).then(a.table_id.cmp(&b.table_id)));
        views
    }

    fn upsert(&mut self, def: TableViewDefinition) -> TableViewDefinition {
        let key = def.key();
        let merged = def.merged_over(self.views.get(&key));
        self.views.insert(key, merged.clone());
        merged
    }

    fn seed(&mut self, preset: TableViewDefinition) -> SeedOutcome {
        let key = preset.key();
        match self.views.get_mut(&key) {
            Some(existing) => {
                if existing.refresh_from(&preset) {
                    SeedOutcome::Refreshed
                } else {
                    SeedOutcome::Unchanged
                }
            }
            None => {
                let mut created = preset.merged_over(None);
                created.is_preset = true;
                self.views.insert(key, created);
                SeedOutcome::Created
            }
        }
    }

    fn delete(&mut self, key: &ViewKey) -> Result<TableViewDefinition, ViewError> {
        match self.views.get(key) {
            None => Err(not_found(key)),
            Some(def) if def.is_preset => Err(ViewError::Protected(key.table_id)),
            Some(_) => self.views.remove(key).ok_or_else(|| not_found(key)),
        }
    }
}

fn not_found(key: &ViewKey) -> ViewError {
    ViewError::NotFound {
        tenant: key.tenant.clone(),
        user_id: key.user_id.clone(),
        table_id: key.table_id,
    }
}

/// Process-local store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryViewStore {
    views: RwLock<ViewMap>,
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.views.len()
    }
}

#[async_trait]
impl ViewDefinitionStore for InMemoryViewStore {
    async fn get(&self, key: &ViewKey) -> Result<Option<TableViewDefinition>, ViewError> {
        Ok(self.views.read().await.get(key))
    }

    async fn list(
        &self,
        tenant: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<TableViewDefinition>, ViewError> {
        Ok(self.views.read().await.list(tenant, user_id))
    }

    async fn upsert(&self, def: TableViewDefinition) -> Result<TableViewDefinition, ViewError> {
        Ok(self.views.write().await.upsert(def))
    }

    async fn seed(&self, preset: TableViewDefinition) -> Result<SeedOutcome, ViewError> {
        Ok(self.views.write().await.seed(preset))
    }

    async fn delete(&self, key: &ViewKey) -> Result<TableViewDefinition, ViewError> {
        self.views.write().await.delete(key)
    }
}

/// Store backed by a single JSON document.
///
/// Mutations are applied to a copy, written to a sibling temp file and
/// renamed into place; the in-memory map is only replaced once the rename
/// succeeds.
#[derive(Debug)]
pub struct JsonFileViewStore {
    path: PathBuf,
    views: RwLock<ViewMap>,
}

impl JsonFileViewStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, ViewError> {
        let path = path.as_ref().to_path_buf();
        let map = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => ViewMap::default(),
            Ok(bytes) => {
                let defs: Vec<TableViewDefinition> = serde_json::from_slice(&bytes)?;
                log::info!("Loaded {} view definitions from {}", defs.len(), path.display());
                ViewMap::from_definitions(defs)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("View store {} does not exist yet, starting empty", path.display());
                ViewMap::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(JsonFileViewStore {
            path,
            views: RwLock::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, map: &ViewMap) -> Result<(), ViewError> {
        let body = serde_json::to_vec_pretty(&map.definitions())?;
        let tmp = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut ViewMap) -> Result<T, ViewError>,
    ) -> Result<T, ViewError> {
        let mut guard = self.views.write().await;
        let mut next = guard.clone();
        let out = apply(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl ViewDefinitionStore for JsonFileViewStore {
    async fn get(&self, key: &ViewKey) -> Result<Option<TableViewDefinition>, ViewError> {
        Ok(self.views.read().await.get(key))
    }

    async fn list(
        &self,
        tenant: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<TableViewDefinition>, ViewError> {
        Ok(self.views.read().await.list(tenant, user_id))
    }

    async fn upsert(&self, def: TableViewDefinition) -> Result<TableViewDefinition, ViewError> {
        self.mutate(|map| Ok(map.upsert(def))).await
    }

    async fn seed(&self, preset: TableViewDefinition) -> Result<SeedOutcome, ViewError> {
        let mut guard = self.views.write().await;
        let mut next = guard.clone();
        let outcome = next.seed(preset);
        if outcome != SeedOutcome::Unchanged {
            self.persist(&next).await?;
            *guard = next;
        }
        Ok(outcome)
    }

    async fn delete(&self, key: &ViewKey) -> Result<TableViewDefinition, ViewError> {
        self.mutate(|map| map.delete(key)).await
    }
}
