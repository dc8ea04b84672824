use std::sync::Arc;

use test_case::test_case;
use viewgraph::catalog::TableId;
use viewgraph::entities::Organization;
use viewgraph::executor::{GraphFixture, InMemoryGraph};
use viewgraph::service::{BillableInfo, RequestContext, ViewQuery};

use super::common::{ids, names, service, GraphService};

const FIXTURE: &str = include_str!("../../../demos/fixture.yaml");

fn demo_service() -> GraphService {
    let fixture = GraphFixture::from_yaml_str(FIXTURE).unwrap();
    service(Arc::new(InMemoryGraph::from_fixture(fixture).unwrap()))
}

fn everything() -> ViewQuery {
    ViewQuery {
        limit: Some(0),
        ..Default::default()
    }
}

#[test_case(TableId::Organizations, &["o-contoso", "o-initech", "o-northwind", "o-umbrella"]; "all visible organizations")]
#[test_case(TableId::Customers, &["o-northwind"]; "customers")]
#[test_case(TableId::Leads, &["o-contoso"]; "leads")]
#[test_case(TableId::Nurture, &["o-initech"]; "nurture")]
#[test_case(TableId::Churn, &["o-umbrella"]; "churn")]
#[test_case(TableId::Contacts, &["c-ann", "c-ben", "c-cara"]; "contacts")]
#[test_case(TableId::ContactsForTargetOrganizations, &["c-ann"]; "target contacts")]
#[test_case(TableId::Opportunities, &["op-1", "op-2"]; "pipeline")]
#[test_case(TableId::MonthlyRenewals, &["rn-1"]; "monthly renewals")]
#[test_case(TableId::AnnualRenewals, &[]; "annual renewals")]
#[test_case(TableId::UpcomingInvoices, &["inv-2"]; "upcoming invoices")]
#[test_case(TableId::PastInvoices, &["inv-1"]; "past invoices")]
#[tokio::test]
async fn preset_views_over_the_demo_graph(table_id: TableId, expected: &[&str]) {
    let service = demo_service();
    let page = service
        .run_view(&RequestContext::new("acme", None), table_id, &everything())
        .await
        .unwrap();
    let mut found = ids(&page);
    found.sort_unstable();
    assert_eq!(found, expected);
    assert_eq!(page.total_elements, expected.len() as u64);
}

#[tokio::test]
async fn portfolio_is_bound_to_the_requesting_user() {
    let service = demo_service();
    for (user, expected) in [("u-dana", vec!["Northwind"]), ("u-eli", vec!["Initech"])] {
        let page = service
            .run_view(
                &RequestContext::new("acme", Some(user.to_string())),
                TableId::MyPortfolio,
                &everything(),
            )
            .await
            .unwrap();
        assert_eq!(names(&page), expected, "portfolio of {}", user);
    }
}

#[tokio::test]
async fn organizations_sort_by_latest_touchpoint_first() {
    let service = demo_service();
    let page = service
        .run_view_as::<Organization>(
            &RequestContext::new("acme", None),
            TableId::Organizations,
            &everything(),
        )
        .await
        .unwrap();
    let touchpoints: Vec<&str> = page
        .content
        .iter()
        .filter_map(|org| org.last_touchpoint_at.as_deref())
        .collect();
    assert_eq!(touchpoints.len(), 3);
    assert!(touchpoints.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(page.content.last().map(|o| o.id.as_str()), Some("o-umbrella"));
}

#[tokio::test]
async fn billable_counts_for_the_demo_tenant() {
    let service = demo_service();
    let info = service
        .billable_info(&RequestContext::new("acme", None))
        .await
        .unwrap();
    assert_eq!(
        info,
        BillableInfo {
            whitelisted_organizations: 4,
            greylisted_organizations: 1,
        }
    );
}

#[tokio::test]
async fn second_tenant_sees_only_its_own_customer() {
    let service = demo_service();
    let page = service
        .run_view(&RequestContext::new("globex", None), TableId::Customers, &everything())
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["Globex Corp"]);
}
