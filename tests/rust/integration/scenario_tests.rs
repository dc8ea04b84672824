use serde_json::json;
use viewgraph::catalog::{ColumnType, TableId};
use viewgraph::predicate::{Condition, FilterOperation, FilterValue, Predicate};
use viewgraph::presets::PRESETS;
use viewgraph::query::{SortField, SortSpec};
use viewgraph::service::{BillableInfo, ErrorKind, RequestContext, ViewQuery};

use super::common::{add_contact, add_organization, ids, names, service, tenant_graph};

fn filtered(filter: Predicate) -> ViewQuery {
    ViewQuery {
        filter: Some(filter),
        limit: Some(0),
        ..Default::default()
    }
}

fn name_contains(column: ColumnType, needle: &str) -> Predicate {
    Condition::new(column, FilterOperation::Contains, needle).into()
}

#[tokio::test]
async fn billable_info_splits_visible_and_hidden_organizations() {
    let graph = tenant_graph(&["acme", "globex"]).await;
    add_organization(&graph, "acme", "o-1", json!({"name": "Alpha", "hide": false})).await;
    add_organization(&graph, "acme", "o-2", json!({"name": "Beta"})).await;
    add_organization(&graph, "acme", "o-3", json!({"name": "Gamma", "hide": false})).await;
    add_organization(&graph, "acme", "o-4", json!({"name": "Delta", "hide": true})).await;
    add_organization(&graph, "acme", "o-5", json!({"name": "Epsilon", "hide": true})).await;
    add_organization(
        &graph,
        "acme",
        "o-acme",
        json!({"name": "Acme", "tenantOrganization": true}),
    )
    .await;
    add_organization(&graph, "globex", "o-g", json!({"name": "Globex", "hide": true})).await;

    let service = service(graph);
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
async fn name_search_ignores_case_and_skips_the_tenant_organization() {
    let graph = tenant_graph(&["acme"]).await;
    for n in 1..=4 {
        add_organization(
            &graph,
            "acme",
            &format!("o-{}", n),
            json!({ "name": format!("org {}", n) }),
        )
        .await;
    }
    add_organization(
        &graph,
        "acme",
        "o-self",
        json!({"name": "Acme Tenant Org", "tenantOrganization": true}),
    )
    .await;

    let service = service(graph);
    let ctx = RequestContext::new("acme", None);

    let page = service
        .run_view(
            &ctx,
            TableId::Organizations,
            &filtered(name_contains(ColumnType::OrganizationsName, "ORG")),
        )
        .await
        .unwrap();
    assert_eq!(page.total_elements, 4);
    assert!(!ids(&page).contains(&"o-self"));

    let page = service
        .run_view(
            &ctx,
            TableId::Organizations,
            &filtered(name_contains(ColumnType::OrganizationsName, "tenant")),
        )
        .await
        .unwrap();
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn created_date_bounds_compare_instants_across_offsets() {
    let graph = tenant_graph(&["acme"]).await;
    // 20:00Z on Jan 31 written with a +05:00 offset
    add_organization(
        &graph,
        "acme",
        "o-early",
        json!({"name": "Early", "createdAt": "2024-02-01T01:00:00+05:00"}),
    )
    .await;
    add_organization(
        &graph,
        "acme",
        "o-late",
        json!({"name": "Late", "createdAt": "2024-01-31T22:00:00Z"}),
    )
    .await;
    add_organization(&graph, "acme", "o-day", json!({"name": "Day", "createdAt": "2024-01-31"})).await;

    let service = service(graph);
    let ctx = RequestContext::new("acme", None);
    let created = |operation, value: &str| -> ViewQuery {
        ViewQuery {
            filter: Some(Condition::new(ColumnType::OrganizationsCreatedDate, operation, value).into()),
            limit: Some(0),
            ..Default::default()
        }
    };

    let page = service
        .run_view(&ctx, TableId::Organizations, &created(FilterOperation::Gte, "2024-01-31T21:00:00Z"))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["o-late"]);

    let page = service
        .run_view(&ctx, TableId::Organizations, &created(FilterOperation::Lte, "2024-01-31T21:00:00Z"))
        .await
        .unwrap();
    let mut matched = ids(&page);
    matched.sort_unstable();
    assert_eq!(matched, vec!["o-day", "o-early"]);

    // a bare date bound covers the whole calendar day
    let page = service
        .run_view(&ctx, TableId::Organizations, &created(FilterOperation::Gte, "2024-02-01"))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["o-early"]);

    let sort = ViewQuery {
        sort: Some(SortSpec::from(SortField::asc(ColumnType::OrganizationsCreatedDate))),
        limit: Some(0),
        ..Default::default()
    };
    let page = service.run_view(&ctx, TableId::Organizations, &sort).await.unwrap();
    assert_eq!(ids(&page), vec!["o-day", "o-early", "o-late"]);
}

async fn contacts_service() -> super::common::GraphService {
    let graph = tenant_graph(&["acme"]).await;
    graph
        .insert_node("l-ny", &["Location"], json!({"region": "NY"}))
        .await
        .unwrap();
    graph
        .insert_node("l-tx", &["Location"], json!({"region": "TX"}))
        .await
        .unwrap();
    add_contact(&graph, "acme", "c-1", "Ann Lee", Some("l-ny")).await;
    add_contact(&graph, "acme", "c-2", "Joanna Kim", Some("l-tx")).await;
    add_contact(&graph, "acme", "c-3", "Cara Singh", Some("l-ny")).await;
    add_contact(&graph, "acme", "c-4", "Annika Berg", None).await;
    service(graph)
}

fn region(operation: FilterOperation, value: impl Into<FilterValue>) -> Condition {
    Condition::new(ColumnType::ContactsRegion, operation, value)
}

async fn matching_contacts(
    service: &super::common::GraphService,
    ctx: &RequestContext,
    filter: Predicate,
) -> Vec<String> {
    let page = service
        .run_view(ctx, TableId::Contacts, &filtered(filter))
        .await
        .unwrap();
    ids(&page).into_iter().map(str::to_string).collect()
}

#[tokio::test]
async fn contacts_filter_by_region() {
    let service = contacts_service().await;
    let ctx = RequestContext::new("acme", None);
    let run = |filter: Predicate| matching_contacts(&service, &ctx, filter);

    assert_eq!(
        run(Predicate::and(vec![region(FilterOperation::Eq, "NY").into()])).await,
        vec!["c-1", "c-3"]
    );
    assert_eq!(
        run(Predicate::and(vec![region(
            FilterOperation::In,
            FilterValue::list(["NY", "TX"])
        )
        .into()]))
        .await,
        vec!["c-1", "c-2", "c-3"]
    );
    assert_eq!(
        run(Predicate::and(vec![
            name_contains(ColumnType::ContactsName, "ann"),
            region(FilterOperation::In, FilterValue::list(["NY", "TX"])).into(),
        ]))
        .await,
        vec!["c-1", "c-2"]
    );
    assert_eq!(
        run(Predicate::or(vec![
            name_contains(ColumnType::ContactsName, "ann"),
            region(FilterOperation::Eq, "NY").into(),
        ]))
        .await,
        vec!["c-1", "c-2", "c-3", "c-4"]
    );
    assert_eq!(
        run(Predicate::and(vec![Condition::is_empty(ColumnType::ContactsRegion).into()])).await,
        vec!["c-4"]
    );
    assert_eq!(
        run(Predicate::and(vec![region(FilterOperation::Eq, "NY")
            .include_empty()
            .into()]))
        .await,
        vec!["c-1", "c-3", "c-4"]
    );
    assert_eq!(run(Predicate::match_all()).await.len(), 4);
}

#[tokio::test]
async fn paging_reports_totals_for_the_whole_set() {
    let service = contacts_service().await;
    let ctx = RequestContext::new("acme", None);
    let query = ViewQuery {
        sort: Some(SortSpec::from(SortField::desc(ColumnType::ContactsName))),
        page: Some(2),
        limit: Some(3),
        ..Default::default()
    };
    let page = service.run_view(&ctx, TableId::Contacts, &query).await.unwrap();
    assert_eq!(page.total_elements, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(names(&page), vec!["Ann Lee"]);
}

#[tokio::test]
async fn tenants_never_see_each_other() {
    let graph = tenant_graph(&["acme", "globex"]).await;
    add_organization(&graph, "acme", "o-a", json!({"name": "Shared Name"})).await;
    add_organization(&graph, "globex", "o-g", json!({"name": "Shared Name"})).await;
    let service = service(graph);

    for (tenant, expected) in [("acme", "o-a"), ("globex", "o-g")] {
        let page = service
            .run_view(
                &RequestContext::new(tenant, None),
                TableId::Organizations,
                &ViewQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![expected]);
    }
}

#[tokio::test]
async fn unsortable_column_is_rejected() {
    let service = contacts_service().await;
    let query = ViewQuery {
        sort: Some(SortField::asc(ColumnType::ContactsSkills).into()),
        ..Default::default()
    };
    let err = service
        .run_view(&RequestContext::new("acme", None), TableId::Contacts, &query)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SortFieldUnknown);
}

#[tokio::test]
async fn reseeding_keeps_user_customisation() {
    let service = contacts_service().await;
    let ctx = RequestContext::new("acme", Some("u-1".to_string()));

    let first = service.seed(&ctx).await;
    assert!(first.is_clean());
    assert_eq!(first.created.len(), PRESETS.len());

    let mut contacts = service.get_view(&ctx, TableId::Contacts).await.unwrap();
    let hidden = contacts.columns[1].column_type;
    contacts.columns[1].visible = false;
    contacts.name = "My contacts".to_string();
    service.upsert_view(&ctx, contacts).await.unwrap();

    let second = service.seed(&ctx).await;
    assert!(second.is_clean());
    assert!(second.created.is_empty());
    assert_eq!(second.unchanged.len(), PRESETS.len());

    let contacts = service.get_view(&ctx, TableId::Contacts).await.unwrap();
    assert!(contacts.is_preset);
    assert_eq!(contacts.name, "My contacts");
    let column = contacts
        .columns
        .iter()
        .find(|c| c.column_type == hidden)
        .unwrap();
    assert!(!column.visible);

    let views = service.list_views(&ctx).await.unwrap();
    assert_eq!(views.len(), PRESETS.len());
    assert!(views.windows(2).all(|w| w[0].order <= w[1].order));
}
