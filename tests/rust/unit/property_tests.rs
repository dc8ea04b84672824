use proptest::prelude::*;
use viewgraph::catalog::ColumnType;
use viewgraph::predicate::{Condition, FilterOperation, FilterValue, Predicate, Scalar};
use viewgraph::query::{total_pages, PageRequest, SortField, Window};

use super::sort_order_tests::{graph_with_employees, sorted_ids};

fn arb_column() -> impl Strategy<Value = ColumnType> {
    prop::sample::select(ColumnType::ALL)
}

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Scalar::Str),
        any::<i64>().prop_map(Scalar::Int),
        (-1.0e12..1.0e12f64).prop_map(Scalar::Float),
        any::<bool>().prop_map(Scalar::Bool),
    ]
}

fn arb_scalar_operation() -> impl Strategy<Value = FilterOperation> {
    prop::sample::select(vec![
        FilterOperation::Eq,
        FilterOperation::Neq,
        FilterOperation::Contains,
        FilterOperation::StartsWith,
        FilterOperation::Gte,
        FilterOperation::Lte,
    ])
}

fn with_include_empty(condition: Condition, include_empty: bool) -> Condition {
    if include_empty {
        condition.include_empty()
    } else {
        condition
    }
}

/// Leaves whose operand shape fits their operation.
fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (arb_column(), arb_scalar_operation(), arb_scalar(), any::<bool>())
            .prop_map(|(column, op, value, lenient)| with_include_empty(
                Condition::new(column, op, value),
                lenient
            )),
        (arb_column(), prop::collection::vec(arb_scalar(), 1..4), any::<bool>()).prop_map(
            |(column, items, lenient)| with_include_empty(
                Condition::new(column, FilterOperation::In, FilterValue::List(items)),
                lenient
            )
        ),
        (arb_column(), arb_scalar(), arb_scalar()).prop_map(|(column, lo, hi)| Condition::new(
            column,
            FilterOperation::Between,
            FilterValue::List(vec![lo, hi])
        )),
        arb_column().prop_map(Condition::is_empty),
    ]
}

fn arb_predicate() -> impl Strategy<Value = Predicate> {
    arb_condition()
        .prop_map(Predicate::from)
        .prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Predicate::and),
                prop::collection::vec(inner, 0..4).prop_map(Predicate::or),
            ]
        })
}

proptest! {
    #[test]
    fn wire_form_round_trips(tree in arb_predicate()) {
        let decoded = Predicate::from_wire(&tree.to_wire()).unwrap();
        prop_assert_eq!(&decoded, &tree);

        let reparsed = Predicate::from_wire_str(&tree.to_wire_string()).unwrap();
        prop_assert_eq!(&reparsed, &tree);
    }
}

proptest! {
    #[test]
    fn zero_limit_is_a_single_unbounded_window(page in 0i64..1_000_000) {
        let window = PageRequest::new(page, 0).window().unwrap();
        prop_assert_eq!(window, Window { skip: 0, limit: None });
    }

    #[test]
    fn zero_limit_has_at_most_one_page(total in 0u64..100_000) {
        let pages = total_pages(total, 0);
        prop_assert!(pages <= 1);
        prop_assert_eq!(pages == 0, total == 0);
    }

    #[test]
    fn total_pages_is_the_ceiling(total in 1u64..1_000_000, limit in 1u64..1_000) {
        let pages = total_pages(total, limit);
        prop_assert!((pages - 1) * limit < total);
        prop_assert!(total <= pages * limit);
    }

    #[test]
    fn zero_limit_returns_every_row(count in 0usize..15) {
        let ids: Vec<String> = (0..count).map(|i| format!("o-{:02}", i)).collect();
        let rows = tokio_test::block_on(async {
            let seeded: Vec<(&str, Option<i64>)> =
                ids.iter().map(|id| (id.as_str(), Some(1))).collect();
            let graph = graph_with_employees(&seeded).await;
            sorted_ids(
                &graph,
                SortField::asc(ColumnType::OrganizationsEmployeeCount).into(),
                PageRequest::new(3, 0),
            )
            .await
        });
        prop_assert_eq!(rows.len(), count);
    }
}

proptest! {
    #[test]
    fn descending_sort_puts_larger_values_first(
        employees in prop::collection::vec(prop::option::of(-50i64..50), 0..12)
    ) {
        let ids: Vec<String> = (0..employees.len()).map(|i| format!("o-{:02}", i)).collect();
        let seeded: Vec<(&str, Option<i64>)> = ids
            .iter()
            .map(String::as_str)
            .zip(employees.iter().copied())
            .collect();
        let rows = tokio_test::block_on(async {
            let graph = graph_with_employees(&seeded).await;
            sorted_ids(
                &graph,
                SortField::desc(ColumnType::OrganizationsEmployeeCount).into(),
                PageRequest::unbounded(),
            )
            .await
        });

        prop_assert_eq!(rows.len(), employees.len());
        for pair in rows.windows(2) {
            let ((a_id, a), (b_id, b)) = (&pair[0], &pair[1]);
            match (a, b) {
                (Some(x), Some(y)) => {
                    prop_assert!(x > y || (x == y && a_id < b_id));
                }
                (Some(_), None) => {}
                (None, None) => prop_assert!(a_id < b_id),
                (None, Some(_)) => prop_assert!(false, "missing value sorted before {:?}", b),
            }
        }
    }
}
