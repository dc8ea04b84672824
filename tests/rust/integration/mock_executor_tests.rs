use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};
use viewgraph::catalog::{registry, ColumnType, TableId};
use viewgraph::entities::Contact;
use viewgraph::executor::{Cancellation, EntityRow, GraphExecutor, RawPage, RetryingExecutor, StoreError};
use viewgraph::predicate::{Condition, FilterOperation, Predicate};
use viewgraph::query::ExecutablePlan;
use viewgraph::service::{BillableInfo, ErrorKind, RequestContext, ViewQuery, ViewService};
use viewgraph::views::InMemoryViewStore;

mock! {
    pub Executor {}

    #[async_trait]
    impl GraphExecutor for Executor {
        async fn execute(&self, plan: &ExecutablePlan) -> Result<RawPage, StoreError>;
        async fn count(&self, plan: &ExecutablePlan) -> Result<u64, StoreError>;
    }
}

fn service<E: GraphExecutor>(executor: E) -> ViewService<E> {
    ViewService::new(registry(), Arc::new(InMemoryViewStore::new()), executor)
}

fn contact_row(id: &str, properties: Value) -> EntityRow {
    let properties = match properties {
        Value::Object(map) => map,
        _ => panic!("row properties must be an object"),
    };
    EntityRow {
        id: id.to_string(),
        labels: vec!["Contact".to_string()],
        properties,
    }
}

#[tokio::test]
async fn malformed_filter_never_reaches_the_executor() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    executor.expect_count().never();
    let service = service(executor);

    let query = ViewQuery {
        filter: Some(Predicate::and(vec![Condition::new(
            ColumnType::ContactsExperience,
            FilterOperation::Between,
            3i64,
        )
        .into()])),
        ..Default::default()
    };
    let err = service
        .run_view(&RequestContext::new("acme", None), TableId::Contacts, &query)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FilterValueInvalid);
}

#[tokio::test]
async fn non_finite_bounds_never_reach_the_executor() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    executor.expect_count().never();
    let service = service(executor);

    for bound in [f64::NAN, f64::INFINITY] {
        let query = ViewQuery {
            filter: Some(Predicate::and(vec![Condition::new(
                ColumnType::OrganizationsForecastArr,
                FilterOperation::Lte,
                bound,
            )
            .into()])),
            ..Default::default()
        };
        let err = service
            .run_view(&RequestContext::new("acme", None), TableId::Organizations, &query)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FilterValueInvalid);
    }
}

#[tokio::test]
async fn invalid_pagination_never_reaches_the_executor() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    let service = service(executor);
    let query = ViewQuery {
        page: Some(-2),
        ..Default::default()
    };
    let err = service
        .run_view(&RequestContext::new("acme", None), TableId::Contacts, &query)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PaginationInvalid);
}

#[tokio::test]
async fn cancelled_request_never_reaches_the_executor() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    executor.expect_count().never();
    let service = service(executor);

    let cancel = Cancellation::new();
    cancel.cancel();
    let ctx = RequestContext::new("acme", None).with_cancellation(cancel);
    let err = service
        .billable_info(&ctx)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn plan_carries_window_and_tenant() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|plan| {
            plan.table_id == TableId::Contacts
                && plan.window.skip == 20
                && plan.window.limit == Some(10)
                && plan.count.params.values().any(|v| v == "acme")
        })
        .times(1)
        .returning(|_| {
            Ok(RawPage {
                rows: vec![contact_row("c-1", json!({"name": "Ann Lee"}))],
                total: 21,
            })
        });
    let service = service(executor);
    let query = ViewQuery {
        page: Some(3),
        limit: Some(10),
        ..Default::default()
    };
    let page = service
        .run_view(&RequestContext::new("acme", None), TableId::Contacts, &query)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 21);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content.len(), 1);
}

#[tokio::test]
async fn typed_rows_and_corrupt_rows() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().times(1).returning(|_| {
        Ok(RawPage {
            rows: vec![contact_row(
                "c-1",
                json!({"name": "Ann Lee", "skills": ["Rust"], "experienceYears": 7}),
            )],
            total: 1,
        })
    });
    executor.expect_execute().times(1).returning(|_| {
        Ok(RawPage {
            rows: vec![contact_row("c-2", json!({"name": 42}))],
            total: 1,
        })
    });
    let service = service(executor);
    let ctx = RequestContext::new("acme", None);

    let page = service
        .run_view_as::<Contact>(&ctx, TableId::Contacts, &ViewQuery::default())
        .await
        .unwrap();
    assert_eq!(page.content[0].id, "c-1");
    assert_eq!(page.content[0].skills, vec!["Rust".to_string()]);
    assert_eq!(page.content[0].experience_years, Some(7));

    let err = service
        .run_view_as::<Contact>(&ctx, TableId::Contacts, &ViewQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreFailure);
}

#[tokio::test]
async fn billable_info_runs_two_counts() {
    let mut executor = MockExecutor::new();
    let mut calls = 0;
    executor
        .expect_count()
        .withf(|plan| plan.table_id == TableId::BillableOrganizations && plan.window.limit.is_none())
        .times(2)
        .returning(move |_| {
            calls += 1;
            Ok(if calls == 1 { 3 } else { 2 })
        });
    executor.expect_execute().never();
    let service = service(executor);
    let info = service
        .billable_info(&RequestContext::new("acme", None))
        .await
        .unwrap();
    assert_eq!(
        info,
        BillableInfo {
            whitelisted_organizations: 3,
            greylisted_organizations: 2,
        }
    );
}

#[tokio::test]
async fn unavailable_store_is_retried_then_reported() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .times(2)
        .returning(|_| Err(StoreError::Unavailable("connection refused".into())));
    let service = service(RetryingExecutor::new(executor, 2, Duration::ZERO));
    let err = service
        .run_view(&RequestContext::new("acme", None), TableId::Contacts, &ViewQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}

/// Executor whose queries never complete.
struct Stalled;

#[async_trait]
impl GraphExecutor for Stalled {
    async fn execute(&self, _plan: &ExecutablePlan) -> Result<RawPage, StoreError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn cancellation_interrupts_a_running_query() {
    let service = service(Stalled);
    let cancel = Cancellation::new();
    let ctx = RequestContext::new("acme", None).with_cancellation(cancel.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });
    let err = tokio::time::timeout(
        Duration::from_secs(5),
        service.run_view(&ctx, TableId::Contacts, &ViewQuery::default()),
    )
    .await
    .expect("run_view should return once cancelled")
    .unwrap_err();
    trigger.await.unwrap();

    assert!(err.is_cancelled());
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}
