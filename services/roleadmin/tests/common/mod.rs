#![allow(dead_code)]

use roleadmin::app::{AppState, build_router};
use roleadmin::directory::DirectoryClient;
use roleadmin::directory::memory::InMemoryDirectory;
use roleadmin::model::{DirectorySeed, PortfolioRecord, SubPortfolioRecord, TenantRecord};
use roleadmin::store::memory::InMemoryStore;
use scopegrant_authz::{PortfolioId, SubPortfolioId, TenantId};
use std::sync::Arc;
use std::time::Duration;

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// T1 → { P1 → { S1, S2 }, P2 → { S3 } }, T2 → { P3 }.
pub fn seed() -> DirectorySeed {
    let tenant = |id: i64, name: &str| TenantRecord {
        tenant_id: TenantId::new(id),
        display_name: name.to_string(),
    };
    let portfolio = |id: i64, tenant_id: i64, name: &str| PortfolioRecord {
        portfolio_id: PortfolioId::new(id),
        tenant_id: TenantId::new(tenant_id),
        display_name: name.to_string(),
    };
    let sub = |id: i64, portfolio_id: i64, name: &str| SubPortfolioRecord {
        sub_portfolio_id: SubPortfolioId::new(id),
        portfolio_id: PortfolioId::new(portfolio_id),
        display_name: name.to_string(),
    };
    DirectorySeed {
        tenants: vec![tenant(1, "Acme"), tenant(2, "Globex")],
        portfolios: vec![
            portfolio(10, 1, "Equities"),
            portfolio(11, 1, "Bonds"),
            portfolio(20, 2, "Treasury"),
        ],
        sub_portfolios: vec![
            sub(100, 10, "Equities EU"),
            sub(101, 10, "Equities US"),
            sub(110, 11, "Bonds EU"),
        ],
    }
}

pub fn app_with(
    store: Arc<InMemoryStore>,
    directory: Arc<dyn DirectoryClient>,
    normalize_on_load: bool,
) -> TestApp {
    build_router(AppState::new(store, directory, normalize_on_load)).into_service()
}

pub fn app() -> (TestApp, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let directory = Arc::new(InMemoryDirectory::from_seed(seed()));
    (app_with(store.clone(), directory, true), store)
}

pub fn app_with_session_ttl(ttl: Duration) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let directory = Arc::new(InMemoryDirectory::from_seed(seed()));
    build_router(AppState::new(store, directory, true).with_session_ttl(ttl)).into_service()
}
