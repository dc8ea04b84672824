use serde_json::{json, Value};
use viewgraph::catalog::{registry, ColumnType, TableId};
use viewgraph::executor::{GraphExecutor, InMemoryGraph};
use viewgraph::query::{PageRequest, SortField, SortSpec, TenantScope, TranslationRequest, Translator};

pub(super) async fn graph_with_employees(counts: &[(&str, Option<i64>)]) -> InMemoryGraph {
    let graph = InMemoryGraph::new();
    graph
        .insert_node("t-acme", &["Tenant"], json!({"name": "acme"}))
        .await
        .unwrap();
    for (id, employees) in counts {
        let properties = match employees {
            Some(n) => json!({"name": id, "employees": n}),
            None => json!({"name": id}),
        };
        graph.insert_node(id, &["Organization"], properties).await.unwrap();
        graph
            .relate(id, "ORGANIZATION_BELONGS_TO_TENANT", "t-acme")
            .await
            .unwrap();
    }
    graph
}

pub(super) async fn sorted_ids(graph: &InMemoryGraph, sort: SortSpec, page: PageRequest) -> Vec<(String, Option<i64>)> {
    let scope = TenantScope::new("acme", None);
    let plan = Translator::new(registry())
        .translate(TranslationRequest {
            table_id: TableId::Organizations,
            filter: None,
            sort: Some(&sort),
            view: None,
            scope: &scope,
            page,
            cancel: None,
        })
        .unwrap();
    graph
        .execute(&plan)
        .await
        .unwrap()
        .rows
        .into_iter()
        .map(|row| {
            let employees = row.properties.get("employees").and_then(Value::as_i64);
            (row.id, employees)
        })
        .collect()
}

#[tokio::test]
async fn descending_sort_is_non_increasing_with_id_tie_break() {
    let graph = graph_with_employees(&[
        ("o-e", Some(10)),
        ("o-b", Some(50)),
        ("o-d", Some(10)),
        ("o-a", None),
        ("o-c", Some(50)),
        ("o-f", Some(3)),
    ])
    .await;

    let rows = sorted_ids(
        &graph,
        SortField::desc(ColumnType::OrganizationsEmployeeCount).into(),
        PageRequest::unbounded(),
    )
    .await;

    let ids: Vec<&str> = rows.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["o-b", "o-c", "o-d", "o-e", "o-f", "o-a"]);

    let present: Vec<i64> = rows.iter().filter_map(|(_, n)| *n).collect();
    assert!(present.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn pages_partition_the_sorted_set() {
    let graph = graph_with_employees(&[
        ("o-1", Some(5)),
        ("o-2", Some(1)),
        ("o-3", Some(4)),
        ("o-4", Some(2)),
        ("o-5", Some(3)),
    ])
    .await;
    let sort: SortSpec = SortField::asc(ColumnType::OrganizationsEmployeeCount).into();

    let mut paged = Vec::new();
    for page in 1..=3 {
        paged.extend(sorted_ids(&graph, sort.clone(), PageRequest::new(page, 2)).await);
    }
    let whole = sorted_ids(&graph, sort, PageRequest::unbounded()).await;

    assert_eq!(paged, whole);
    let counts: Vec<i64> = whole.iter().filter_map(|(_, n)| *n).collect();
    assert_eq!(counts, vec![1, 2, 3, 4, 5]);
}
