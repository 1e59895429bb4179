//! In-memory directory backed by a seed snapshot.
//!
//! Used for local development, tests, and deployments that ship the
//! directory as a YAML file (`ROLEADMIN_DIRECTORY_SEED`).
use super::{DirectoryClient, DirectoryResult};
use crate::model::{DirectorySeed, PortfolioRecord, SubPortfolioRecord, TenantRecord};
use anyhow::Context;
use async_trait::async_trait;
use scopegrant_authz::{PortfolioId, TenantId};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    seed: Arc<RwLock<DirectorySeed>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: DirectorySeed) -> Self {
        Self {
            seed: Arc::new(RwLock::new(seed)),
        }
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read directory seed: {}", path.display()))?;
        let seed = DirectorySeed::from_yaml(&contents)
            .with_context(|| format!("parse directory seed: {}", path.display()))?;
        Ok(Self::from_seed(seed))
    }

    /// Replace the directory contents; open sessions keep their snapshot.
    pub async fn replace(&self, seed: DirectorySeed) {
        *self.seed.write().await = seed;
    }
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn list_tenants(&self) -> DirectoryResult<Vec<TenantRecord>> {
        Ok(self.seed.read().await.tenants.clone())
    }

    async fn list_portfolios(&self, tenant_id: TenantId) -> DirectoryResult<Vec<PortfolioRecord>> {
        let seed = self.seed.read().await;
        Ok(seed
            .portfolios
            .iter()
            .filter(|portfolio| portfolio.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn list_sub_portfolios(
        &self,
        portfolio_id: PortfolioId,
    ) -> DirectoryResult<Vec<SubPortfolioRecord>> {
        let seed = self.seed.read().await;
        Ok(seed
            .sub_portfolios
            .iter()
            .filter(|sub| sub.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
