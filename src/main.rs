use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use viewgraph::catalog::{registry, TableId};
use viewgraph::config::{self, EngineConfig};
use viewgraph::executor::{GraphFixture, InMemoryGraph, RetryingExecutor};
use viewgraph::query::{decode_filter, SortSpec};
use viewgraph::service::{RequestContext, ViewQuery, ViewService};
use viewgraph::views::{InMemoryViewStore, JsonFileViewStore, ViewDefinitionStore};

/// Viewgraph - run saved table views against a property graph
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tenant the request is scoped to
    #[arg(long)]
    tenant: String,

    /// Requesting user id (needed for owner-scoped tables such as MY_PORTFOLIO)
    #[arg(long)]
    user: Option<String>,

    /// Table id to run, e.g. CONTACTS or CHURN
    #[arg(long)]
    table: Option<String>,

    /// Filter tree in wire JSON; replaces the view's filter
    #[arg(long)]
    filter: Option<String>,

    /// Sort as {"id": COLUMN, "desc": bool} or an array of them
    #[arg(long)]
    sort: Option<String>,

    /// 1-based page number
    #[arg(long)]
    page: Option<i64>,

    /// Page size; 0 returns everything
    #[arg(long)]
    limit: Option<i64>,

    /// YAML or JSON graph fixture to query
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// YAML engine configuration; environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file to persist view definitions in
    #[arg(long)]
    view_store: Option<String>,

    /// Attempts per store call
    #[arg(long)]
    store_max_attempts: Option<u32>,

    /// Milliseconds between store retries
    #[arg(long)]
    store_retry_backoff_ms: Option<u64>,

    /// Skip seeding preset views on startup
    #[arg(long)]
    no_seed: bool,

    /// Print the views visible to the tenant/user and exit
    #[arg(long)]
    list_views: bool,

    /// Print the generated queries instead of running them
    #[arg(long)]
    explain: bool,

    /// Print whitelisted/greylisted organization counts and exit
    #[arg(long)]
    billable: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            view_store_path: cli.view_store.clone(),
            store_max_attempts: cli.store_max_attempts,
            store_retry_backoff_ms: cli.store_retry_backoff_ms,
            no_seed: cli.no_seed,
            default_page_limit: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::from_env().context("reading VIEWGRAPH_* environment")?,
    };
    config.merge(&config::CliConfig::from(&cli));

    let store: Arc<dyn ViewDefinitionStore> = match &config.view_store_path {
        Some(path) => Arc::new(JsonFileViewStore::open(path).await?),
        None => Arc::new(InMemoryViewStore::new()),
    };

    let graph = match &cli.fixture {
        Some(path) => InMemoryGraph::from_fixture(GraphFixture::from_path(path)?)?,
        None => {
            log::warn!("No --fixture given, querying an empty graph");
            InMemoryGraph::new()
        }
    };
    let executor = RetryingExecutor::new(graph, config.store_max_attempts, config.retry_backoff());
    let service = ViewService::new(registry(), store, executor)
        .with_default_page_limit(config.default_page_limit);

    let ctx = RequestContext::new(cli.tenant.clone(), cli.user.clone());
    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, cancelling request");
            cancel.cancel();
        }
    });

    if config.seed_on_startup {
        let report = service.seed(&ctx).await;
        if !report.is_clean() {
            log::warn!("{} preset views failed to seed", report.failed.len());
        }
    }

    if cli.list_views {
        let views = service.list_views(&ctx).await?;
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if cli.billable {
        let info = service.billable_info(&ctx).await?;
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let table_id: TableId = cli
        .table
        .as_deref()
        .context("--table is required unless --list-views or --billable is given")?
        .parse()?;
    let query = ViewQuery {
        filter: cli
            .filter
            .as_deref()
            .map(|json| decode_filter(table_id, json))
            .transpose()?,
        sort: cli
            .sort
            .as_deref()
            .map(|json| SortSpec::from_wire_str(table_id, json))
            .transpose()?,
        page: cli.page,
        limit: cli.limit,
    };

    if cli.explain {
        let plan = service.explain(&ctx, table_id, &query).await?;
        let out = serde_json::json!({
            "table": plan.table_id,
            "window": plan.window,
            "count": plan.count,
            "data": plan.data,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let page = service.run_view(&ctx, table_id, &query).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
