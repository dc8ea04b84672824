use test_case::test_case;
use viewgraph::catalog::{registry, ColumnType, TableId, TableViewType};
use viewgraph::query::{total_pages, PageRequest, TranslationError};

fn column_ids(table_id: TableId) -> Vec<&'static str> {
    registry()
        .columns_for(table_id)
        .unwrap()
        .iter()
        .map(|c| c.column_type.as_str())
        .collect()
}

#[test]
fn every_table_is_registered() {
    for table_id in TableId::ALL {
        let table = registry().table(*table_id).unwrap();
        assert_eq!(table.table_id, *table_id);
        assert!(!table.columns.is_empty(), "{} has no columns", table_id);
    }
    assert_eq!(registry().table_ids().count(), TableId::ALL.len());
}

#[test]
fn user_columns_in_display_order() {
    assert_eq!(
        column_ids(TableId::Users),
        vec!["USERS_NAME", "USERS_EMAIL", "USERS_ROLES", "USERS_CREATED_DATE"]
    );
}

#[test]
fn billable_organizations_expose_the_hidden_flag() {
    assert_eq!(
        column_ids(TableId::BillableOrganizations),
        vec!["ORGANIZATIONS_NAME", "ORGANIZATIONS_HIDDEN"]
    );
    assert!(registry()
        .resolve(TableId::Organizations, ColumnType::OrganizationsHidden)
        .is_err());
}

#[test_case(TableId::Organizations, TableViewType::Organizations)]
#[test_case(TableId::MyPortfolio, TableViewType::Organizations)]
#[test_case(TableId::ContactsForTargetOrganizations, TableViewType::Contacts)]
#[test_case(TableId::QuarterlyRenewals, TableViewType::Renewals)]
#[test_case(TableId::PastInvoices, TableViewType::Invoices)]
#[test_case(TableId::Opportunities, TableViewType::Opportunities)]
fn tables_group_by_view_type(table_id: TableId, expected: TableViewType) {
    assert_eq!(registry().table(table_id).unwrap().view_type, expected);
}

#[test]
fn only_my_portfolio_is_owner_scoped() {
    let scoped: Vec<TableId> = TableId::ALL
        .iter()
        .copied()
        .filter(|t| registry().table(*t).unwrap().is_owner_scoped())
        .collect();
    assert_eq!(scoped, vec![TableId::MyPortfolio]);
}

#[test]
fn limit_zero_is_a_single_unbounded_page() {
    let window = PageRequest::new(3, 0).window().unwrap();
    assert_eq!(window.skip, 0);
    assert_eq!(window.limit, None);
    assert_eq!(window.total_pages(0), 0);
    assert_eq!(window.total_pages(1), 1);
    assert_eq!(window.total_pages(10_000), 1);
}

#[test]
fn page_zero_reads_as_the_first_page() {
    assert_eq!(
        PageRequest::new(0, 10).window().unwrap(),
        PageRequest::new(1, 10).window().unwrap()
    );
    assert_eq!(PageRequest::new(3, 10).window().unwrap().skip, 20);
}

#[test_case(-1, 10)]
#[test_case(1, -5)]
fn negative_pagination_is_rejected(page: i64, limit: i64) {
    assert_eq!(
        PageRequest::new(page, limit).window(),
        Err(TranslationError::PaginationInvalid { page, limit })
    );
}

#[test]
fn total_pages_covers_every_element_exactly() {
    for limit in 1..=7u64 {
        for total in 0..=50u64 {
            let pages = total_pages(total, limit);
            assert!(pages * limit >= total, "total={} limit={}", total, limit);
            if total > 0 {
                assert!((pages - 1) * limit < total, "total={} limit={}", total, limit);
            } else {
                assert_eq!(pages, 0);
            }
        }
    }
}
