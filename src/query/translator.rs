//! Turns a table id, an optional filter/sort and a page request into an
//! [`ExecutablePlan`].
//!
//! Translation is pure: it reads the registry and its inputs, touches no
//! shared mutable state and never awaits. Any failure aborts before a plan
//! exists, so a store is never asked to run a partial plan.

use super::cypher;
use super::errors::TranslationError;
use super::pagination::PageRequest;
use super::plan::{ConditionOrigin, ExecutablePlan, ResolvedCondition, ResolvedPredicate};
use super::sort::{ResolvedSort, SortSpec};
use crate::catalog::{
    BaseCondition, BaseValue, PropertyRegistry, TableDefinition, TableId, ValueType,
};
use crate::executor::Cancellation;
use crate::predicate::{self, Combinator, FilterOperation, FilterValue, Predicate, Scalar};
use crate::views::TableViewDefinition;

/// Trusted identity the query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    pub tenant: String,
    pub user_id: Option<String>,
}

impl TenantScope {
    pub fn new(tenant: impl Into<String>, user_id: Option<String>) -> Self {
        TenantScope {
            tenant: tenant.into(),
            user_id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    pub table_id: TableId,
    /// Replaces the view's effective filter when present.
    pub filter: Option<&'a Predicate>,
    /// Replaces the view's effective sort when present.
    pub sort: Option<&'a SortSpec>,
    pub view: Option<&'a TableViewDefinition>,
    pub scope: &'a TenantScope,
    pub page: PageRequest,
    pub cancel: Option<&'a Cancellation>,
}

#[derive(Debug, Clone, Copy)]
pub struct Translator<'r> {
    registry: &'r PropertyRegistry,
}

impl<'r> Translator<'r> {
    pub fn new(registry: &'r PropertyRegistry) -> Self {
        Translator { registry }
    }

    pub fn translate(&self, request: TranslationRequest<'_>) -> Result<ExecutablePlan, TranslationError> {
        check_cancelled(request.cancel)?;
        let table = self.registry.table(request.table_id)?;

        let view_filter = request.view.and_then(TableViewDefinition::effective_filter);
        let filter = request.filter.or(view_filter);
        if let Some(filter) = filter {
            predicate::validate(filter, self.registry, table.table_id)?;
        }

        let scoped = self.scope(table, request.scope, filter)?;

        let view_sort = request.view.and_then(TableViewDefinition::effective_sort);
        let sort = match request.sort {
            Some(spec) => self.resolve_sort(table, spec)?,
            None => match view_sort {
                Some(spec) => self.resolve_sort(table, &spec)?,
                None => Vec::new(),
            },
        };

        let window = request.page.window()?;
        check_cancelled(request.cancel)?;

        let (count, data) = cypher::render(table.root_label, &scoped, &sort, &window);
        log::debug!("{} count query:\n{}", table.table_id, count.text);
        log::debug!("{} data query:\n{}", table.table_id, data.text);

        Ok(ExecutablePlan {
            table_id: table.table_id,
            root_label: table.root_label,
            predicate: scoped,
            sort,
            window,
            count,
            data,
        })
    }

    /// AND[tenant, owner?, base conditions..., caller tree].
    fn scope(
        &self,
        table: &TableDefinition,
        scope: &TenantScope,
        filter: Option<&Predicate>,
    ) -> Result<ResolvedPredicate, TranslationError> {
        let mut conjuncts = vec![ResolvedPredicate::Leaf(ResolvedCondition {
            origin: ConditionOrigin::Tenant,
            path: table.tenant_path,
            value_type: ValueType::String,
            operation: FilterOperation::Eq,
            value: FilterValue::from(scope.tenant.as_str()),
            include_empty: false,
        })];

        if let Some(owner_path) = table.owner_path {
            let user_id = scope
                .user_id
                .as_deref()
                .ok_or(TranslationError::OwnerRequired(table.table_id))?;
            conjuncts.push(ResolvedPredicate::Leaf(ResolvedCondition {
                origin: ConditionOrigin::Owner,
                path: owner_path,
                value_type: ValueType::String,
                operation: FilterOperation::Eq,
                value: FilterValue::from(user_id),
                include_empty: false,
            }));
        }

        conjuncts.extend(table.base_conditions.iter().map(|base| ResolvedPredicate::Leaf(resolve_base(base))));

        if let Some(filter) = filter {
            if !filter.is_match_all() {
                conjuncts.push(self.resolve_predicate(table, filter)?);
            }
        }

        Ok(ResolvedPredicate::Group {
            combinator: Combinator::And,
            children: conjuncts,
        })
    }

    fn resolve_predicate(
        &self,
        table: &TableDefinition,
        node: &Predicate,
    ) -> Result<ResolvedPredicate, TranslationError> {
        match node {
            Predicate::Group {
                combinator,
                children,
            } => Ok(ResolvedPredicate::Group {
                combinator: *combinator,
                children: children
                    .iter()
                    .map(|child| self.resolve_predicate(table, child))
                    .collect::<Result<_, _>>()?,
            }),
            Predicate::Leaf(condition) => {
                let column = self.registry.resolve(table.table_id, condition.property)?;
                Ok(ResolvedPredicate::Leaf(ResolvedCondition {
                    origin: ConditionOrigin::Filter(condition.property),
                    path: column.path,
                    value_type: column.value_type,
                    operation: condition.operation,
                    value: condition.value.clone(),
                    include_empty: condition.include_empty,
                }))
            }
        }
    }

    fn resolve_sort(
        &self,
        table: &TableDefinition,
        spec: &SortSpec,
    ) -> Result<Vec<ResolvedSort>, TranslationError> {
        spec.fields()
            .iter()
            .map(|field| {
                let unknown = || TranslationError::SortFieldUnknown {
                    table_id: table.table_id,
                    field: field.field_id.to_string(),
                };
                let column = table.column(field.field_id).ok_or_else(unknown)?;
                if !column.sortable {
                    return Err(unknown());
                }
                Ok(ResolvedSort {
                    column: column.column_type,
                    path: column.path,
                    value_type: column.value_type,
                    descending: field.descending,
                })
            })
            .collect()
    }
}

fn resolve_base(base: &BaseCondition) -> ResolvedCondition {
    let scalar = match base.value {
        BaseValue::Bool(b) => Scalar::Bool(b),
        BaseValue::Str(s) => Scalar::Str(s.to_string()),
    };
    ResolvedCondition {
        origin: ConditionOrigin::Base,
        path: base.path,
        value_type: base.value_type,
        operation: base.operation,
        value: FilterValue::Scalar(scalar),
        include_empty: base.include_empty,
    }
}

fn check_cancelled(cancel: Option<&Cancellation>) -> Result<(), TranslationError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(TranslationError::Cancelled),
        _ => Ok(()),
    }
}
