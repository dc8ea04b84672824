use std::sync::Arc;

use serde_json::{json, Value};
use viewgraph::catalog::registry;
use viewgraph::executor::{EntityRow, InMemoryGraph};
use viewgraph::query::PageResult;
use viewgraph::service::ViewService;
use viewgraph::views::InMemoryViewStore;

pub type GraphService = ViewService<Arc<InMemoryGraph>>;

pub fn service(graph: Arc<InMemoryGraph>) -> GraphService {
    ViewService::new(registry(), Arc::new(InMemoryViewStore::new()), graph)
}

/// Graph holding just the `Tenant` nodes.
pub async fn tenant_graph(tenants: &[&str]) -> Arc<InMemoryGraph> {
    let graph = InMemoryGraph::new();
    for tenant in tenants {
        graph
            .insert_node(&tenant_node(tenant), &["Tenant"], json!({ "name": tenant }))
            .await
            .unwrap();
    }
    Arc::new(graph)
}

pub fn tenant_node(tenant: &str) -> String {
    format!("t-{}", tenant)
}

pub async fn add_organization(graph: &InMemoryGraph, tenant: &str, id: &str, properties: Value) {
    graph.insert_node(id, &["Organization"], properties).await.unwrap();
    graph
        .relate(id, "ORGANIZATION_BELONGS_TO_TENANT", &tenant_node(tenant))
        .await
        .unwrap();
}

pub async fn add_contact(graph: &InMemoryGraph, tenant: &str, id: &str, name: &str, location: Option<&str>) {
    graph.insert_node(id, &["Contact"], json!({ "name": name })).await.unwrap();
    graph
        .relate(id, "CONTACT_BELONGS_TO_TENANT", &tenant_node(tenant))
        .await
        .unwrap();
    if let Some(location) = location {
        graph.relate(id, "ASSOCIATED_WITH", location).await.unwrap();
    }
}

pub fn ids(page: &PageResult<EntityRow>) -> Vec<&str> {
    page.content.iter().map(|row| row.id.as_str()).collect()
}

pub fn names(page: &PageResult<EntityRow>) -> Vec<&str> {
    page.content
        .iter()
        .filter_map(|row| row.properties.get("name").and_then(Value::as_str))
        .collect()
}
