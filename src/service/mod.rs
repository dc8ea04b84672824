//! The façade callers use: look up the caller's view, translate, execute,
//! and manage the view catalog.
//!
//! Every call that reads through a view lazily seeds the tenant's presets
//! first, so a tenant that missed provisioning still gets them.

pub mod context;
pub mod errors;

pub use context::RequestContext;
pub use errors::{ErrorKind, ServiceError};

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::{ColumnType, PropertyRegistry, TableId};
use crate::executor::{EntityRow, GraphExecutor, StoreError};
use crate::predicate::{Condition, FilterOperation, Predicate};
use crate::presets::{self, SeedReport};
use crate::query::{
    ExecutablePlan, PageRequest, PageResult, SortSpec, TranslationError, TranslationRequest,
    Translator,
};
use crate::views::{validate_definition, TableViewDefinition, ViewDefinitionStore, ViewError, ViewKey};

/// Caller-supplied overrides for one read. Anything left `None` falls back
/// to the stored view, then to the service defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub filter: Option<Predicate>,
    pub sort: Option<SortSpec>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Organizations that count towards billing versus those hidden from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillableInfo {
    pub whitelisted_organizations: u64,
    pub greylisted_organizations: u64,
}

pub struct ViewService<E> {
    registry: &'static PropertyRegistry,
    store: Arc<dyn ViewDefinitionStore>,
    executor: E,
    default_page_limit: i64,
}

impl<E: GraphExecutor> ViewService<E> {
    pub fn new(
        registry: &'static PropertyRegistry,
        store: Arc<dyn ViewDefinitionStore>,
        executor: E,
    ) -> Self {
        ViewService {
            registry,
            store,
            executor,
            default_page_limit: 25,
        }
    }

    pub fn with_default_page_limit(mut self, limit: i64) -> Self {
        self.default_page_limit = limit;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs `table_id` for the caller and returns one page of root entities.
    pub async fn run_view(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
        query: &ViewQuery,
    ) -> Result<PageResult<EntityRow>, ServiceError> {
        let plan = self.explain(ctx, table_id, query).await?;
        if ctx.is_cancelled() {
            return Err(TranslationError::Cancelled.into());
        }

        let raw = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                log::debug!("{} request cancelled while executing", table_id);
                return Err(StoreError::Cancelled.into());
            }
            result = self.executor.execute(&plan) => result,
        };
        let raw = raw.inspect_err(|e| log::error!("{} query failed: {}", table_id, e))?;
        Ok(PageResult::new(raw.rows, raw.total, &plan.window))
    }

    /// `run_view` with rows deserialised into `T`.
    pub async fn run_view_as<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
        query: &ViewQuery,
    ) -> Result<PageResult<T>, ServiceError> {
        let page = self.run_view(ctx, table_id, query).await?;
        page.try_map(|row| {
            serde_json::from_value(row.to_json())
                .map_err(|e| StoreError::Corrupt(format!("row {}: {}", row.id, e)).into())
        })
    }

    /// Translates without executing. The result is what `run_view` would
    /// send to the store.
    pub async fn explain(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
        query: &ViewQuery,
    ) -> Result<ExecutablePlan, ServiceError> {
        if ctx.is_cancelled() {
            return Err(TranslationError::Cancelled.into());
        }
        self.ensure_seeded(ctx).await;

        let key = self.view_key(ctx, table_id)?;
        let view = self.store.get(&key).await?;
        let scope = ctx.scope();
        let page = PageRequest::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(self.default_page_limit),
        );

        let plan = Translator::new(self.registry)
            .translate(TranslationRequest {
                table_id,
                filter: query.filter.as_ref(),
                sort: query.sort.as_ref(),
                view: view.as_ref(),
                scope: &scope,
                page,
                cancel: Some(&ctx.cancel),
            })
            .inspect_err(|e| log::error!("Rejected {} request: {}", table_id, e))?;
        Ok(plan)
    }

    /// Views visible to the caller, ordered for display.
    pub async fn list_views(&self, ctx: &RequestContext) -> Result<Vec<TableViewDefinition>, ServiceError> {
        self.ensure_seeded(ctx).await;
        Ok(self.store.list(&ctx.tenant, ctx.user_id.as_deref()).await?)
    }

    pub async fn get_view(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
    ) -> Result<TableViewDefinition, ServiceError> {
        self.ensure_seeded(ctx).await;
        let key = self.view_key(ctx, table_id)?;
        self.store.get(&key).await?.ok_or_else(|| {
            ViewError::NotFound {
                tenant: key.tenant,
                user_id: key.user_id,
                table_id,
            }
            .into()
        })
    }

    /// Validates and stores a view for the caller. Tenant and owner come
    /// from the context, never from the payload.
    pub async fn upsert_view(
        &self,
        ctx: &RequestContext,
        mut def: TableViewDefinition,
    ) -> Result<TableViewDefinition, ServiceError> {
        let key = self.view_key(ctx, def.table_id)?;
        def.tenant = key.tenant;
        def.user_id = key.user_id;
        def.is_preset = false;
        validate_definition(&def, self.registry)?;
        let stored = self.store.upsert(def).await?;
        log::info!("Stored {} view for tenant {}", stored.table_id, stored.tenant);
        Ok(stored)
    }

    pub async fn delete_view(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
    ) -> Result<TableViewDefinition, ServiceError> {
        let key = self.view_key(ctx, table_id)?;
        Ok(self.store.delete(&key).await?)
    }

    /// Seeds or refreshes every preset for the caller.
    pub async fn seed(&self, ctx: &RequestContext) -> SeedReport {
        presets::seed(self.store.as_ref(), self.registry, &ctx.tenant, ctx.user_id.as_deref()).await
    }

    /// Counts billable organizations: visible ones are whitelisted, hidden
    /// ones greylisted.
    pub async fn billable_info(&self, ctx: &RequestContext) -> Result<BillableInfo, ServiceError> {
        let visible = Predicate::and(vec![Condition::new(
            ColumnType::OrganizationsHidden,
            FilterOperation::Eq,
            false,
        )
        .include_empty()
        .into()]);
        let hidden = Predicate::and(vec![Condition::new(
            ColumnType::OrganizationsHidden,
            FilterOperation::Eq,
            true,
        )
        .into()]);

        Ok(BillableInfo {
            whitelisted_organizations: self.count_where(ctx, &visible).await?,
            greylisted_organizations: self.count_where(ctx, &hidden).await?,
        })
    }

    async fn count_where(&self, ctx: &RequestContext, filter: &Predicate) -> Result<u64, ServiceError> {
        let scope = ctx.scope();
        let plan = Translator::new(self.registry).translate(TranslationRequest {
            table_id: TableId::BillableOrganizations,
            filter: Some(filter),
            sort: None,
            view: None,
            scope: &scope,
            page: PageRequest::unbounded(),
            cancel: Some(&ctx.cancel),
        })?;
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(StoreError::Cancelled.into()),
            result = self.executor.count(&plan) => Ok(result?),
        }
    }

    /// Storage key for the caller's view of `table_id`; owner-scoped tables
    /// need a user.
    fn view_key(&self, ctx: &RequestContext, table_id: TableId) -> Result<ViewKey, ServiceError> {
        let table = self.registry.table(table_id).map_err(TranslationError::from)?;
        let user_id = if table.is_owner_scoped() {
            Some(ctx.user_id.clone().ok_or(ViewError::OwnerRequired(table_id))?)
        } else {
            None
        };
        Ok(ViewKey::new(ctx.tenant.clone(), user_id, table_id))
    }

    /// Seeds presets the caller has not got yet. Failures are logged and
    /// never block the request.
    async fn ensure_seeded(&self, ctx: &RequestContext) {
        let existing: HashSet<TableId> = match self.store.list(&ctx.tenant, ctx.user_id.as_deref()).await {
            Ok(views) => views.iter().map(|v| v.table_id).collect(),
            Err(e) => {
                log::warn!("Could not list views for tenant {}: {}", ctx.tenant, e);
                return;
            }
        };
        let missing = presets::applicable(self.registry, ctx.user_id.as_deref())
            .any(|p| !existing.contains(&p.table_id));
        if missing {
            log::info!("Seeding missing preset views for tenant {}", ctx.tenant);
            self.seed(ctx).await;
        }
    }
}
