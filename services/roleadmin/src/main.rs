//! Role administration HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the directory client and the HTTP router,
//! then serves the API and the metrics endpoint.
use anyhow::Context;
use roleadmin::app::{AppState, build_router};
use roleadmin::config::RoleAdminConfig;
use roleadmin::directory::DirectoryClient;
use roleadmin::directory::memory::InMemoryDirectory;
use roleadmin::observability;
use roleadmin::store::RoleStore;
use roleadmin::store::memory::InMemoryStore;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RoleAdminConfig::from_env_or_yaml().context("roleadmin config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: RoleAdminConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("roleadmin");
    let state = build_state(&config)?;
    tracing::info!(
        store = state.store.backend_name(),
        directory = state.directory.backend_name(),
        normalize_on_load = state.normalize_on_load,
        session_ttl_secs = state.sessions.ttl().as_secs(),
        "roleadmin state ready"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    tracing::info!(%addr, "roleadmin listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_state(config: &RoleAdminConfig) -> anyhow::Result<AppState> {
    let directory = match &config.directory_seed {
        Some(path) => InMemoryDirectory::from_yaml_file(path)?,
        None => {
            tracing::warn!("ROLEADMIN_DIRECTORY_SEED not set; directory is empty");
            InMemoryDirectory::new()
        }
    };
    let store: Arc<dyn RoleStore> = Arc::new(InMemoryStore::new());
    let directory: Arc<dyn DirectoryClient> = Arc::new(directory);
    Ok(AppState::new(store, directory, config.normalize_on_load)
        .with_session_ttl(config.session_ttl))
}
