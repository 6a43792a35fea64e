//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that open the
//! profile's knowledge store, load agent templates, and wire both into a
//! running MCP tool handler.

use crate::tools::InstructTools;
use anyhow::{Context, Result};
use mcp_instruct::config::InstructConfig;
use mcp_instruct::knowledge::KnowledgeStore;
use mcp_instruct::persona::AgentManager;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

type SharedState = (
    Arc<Mutex<KnowledgeStore>>,
    Arc<Mutex<AgentManager>>,
    Arc<InstructConfig>,
);

/// Shared setup: open the knowledge store, load agent templates.
/// Returns (store, agents, config) wrapped in Arc for sharing.
fn setup_shared_state(config: InstructConfig) -> Result<SharedState> {
    let data_dir = config.resolved_data_dir();
    let store = KnowledgeStore::open(&data_dir, &config.storage.profile, config.store_settings())
        .with_context(|| format!("failed to open knowledge base in {}", data_dir.display()))?;
    tracing::info!(
        profile = %store.profile(),
        path = %store.file_path().display(),
        new = store.is_new(),
        "knowledge base ready"
    );

    let mut agents = AgentManager::new(config.resolved_agents_dir());
    if let Err(e) = agents.load() {
        tracing::warn!(error = %e, "no agent templates loaded, persona tools will be empty");
    }

    Ok((
        Arc::new(Mutex::new(store)),
        Arc::new(Mutex::new(agents)),
        Arc::new(config),
    ))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: InstructConfig) -> Result<()> {
    tracing::info!("starting MCP Instruct server on stdio");

    let (store, agents, config) = setup_shared_state(config)?;

    let tools = InstructTools::new(store, agents, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP, mounted at `/mcp`.
///
/// Every session shares the same store and agent manager, so the active
/// persona is per process, not per session.
pub async fn serve_http(config: InstructConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting MCP Instruct server on HTTP");

    let (store, agents, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || {
            Ok(InstructTools::new(
                store.clone(),
                agents.clone(),
                config.clone(),
            ))
        },
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
