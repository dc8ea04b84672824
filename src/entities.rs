//! Typed views of root entities, for callers of `ViewService::run_view_as`.
//!
//! Only root-node properties are carried; values behind a traversal (owner,
//! location, tags) are not part of a row. Every field beyond `id` is
//! optional because the graph is schemaless.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: String,
    pub name: Option<String>,
    pub website: Option<String>,
    pub relationship: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub employees: Option<i64>,
    pub year_founded: Option<i64>,
    pub is_public: Option<bool>,
    pub hide: Option<bool>,
    pub last_touchpoint_at: Option<String>,
    pub derived_churned_at: Option<String>,
    pub derived_ltv: Option<f64>,
    pub renewal_forecast_arr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub name: Option<String>,
    pub linked_in_url: Option<String>,
    pub skills: Vec<String>,
    pub schools: Vec<String>,
    pub languages: Vec<String>,
    pub experience_years: Option<i64>,
    pub last_interaction_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Opportunity {
    pub id: String,
    pub name: Option<String>,
    pub internal_type: Option<String>,
    pub external_stage: Option<String>,
    pub max_amount: Option<f64>,
    pub amount: Option<f64>,
    pub renewal_cycle: Option<String>,
    pub renewal_likelihood: Option<String>,
    pub renewed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub number: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub issued_date: Option<String>,
    pub due_date: Option<String>,
    pub total_amount: Option<f64>,
    pub preview: Option<bool>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub created_at: Option<String>,
}
