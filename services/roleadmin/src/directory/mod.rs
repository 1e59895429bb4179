//! Directory access and scope-tree loading.
//!
//! # Purpose
//! The directory is the source of tenants, portfolios and sub-portfolios.
//! Editing sessions never talk to it node by node: [`load_directory`] walks
//! the whole hierarchy up front and freezes it into a [`ScopeTree`] snapshot
//! plus display labels.
//!
//! # Key invariants
//! - A snapshot is built only from a complete walk; any directory failure
//!   aborts the load so no toggle ever runs against a partial branch.
//! - The snapshot is immutable and shared by `Arc` for the life of a session.
use crate::model::{PortfolioRecord, SubPortfolioRecord, TenantRecord};
use async_trait::async_trait;
use scopegrant_authz::{
    Portfolio, PortfolioId, ScopeError, ScopeLevel, ScopeNode, ScopeTree, SubPortfolio,
    SubPortfolioId, Tenant, TenantId,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("invalid directory snapshot: {0}")]
    Snapshot(#[from] ScopeError),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn list_tenants(&self) -> DirectoryResult<Vec<TenantRecord>>;
    async fn list_portfolios(&self, tenant_id: TenantId) -> DirectoryResult<Vec<PortfolioRecord>>;
    async fn list_sub_portfolios(
        &self,
        portfolio_id: PortfolioId,
    ) -> DirectoryResult<Vec<SubPortfolioRecord>>;
    fn backend_name(&self) -> &'static str;
}

/// Display names keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct ScopeLabels {
    tenants: HashMap<TenantId, String>,
    portfolios: HashMap<PortfolioId, String>,
    sub_portfolios: HashMap<SubPortfolioId, String>,
}

impl ScopeLabels {
    pub fn label(&self, node: &ScopeNode) -> String {
        let found = match node {
            ScopeNode::Tenant(tenant) => self.tenants.get(tenant),
            ScopeNode::Portfolio(_, portfolio) => self.portfolios.get(portfolio),
            ScopeNode::SubPortfolio(_, _, sub) => self.sub_portfolios.get(sub),
        };
        found.cloned().unwrap_or_else(|| node.to_string())
    }
}

/// Frozen directory state used by editing sessions.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub tree: ScopeTree,
    pub labels: ScopeLabels,
}

/// Walk the directory completely and build an immutable snapshot.
pub async fn load_directory(
    directory: &dyn DirectoryClient,
) -> DirectoryResult<Arc<DirectorySnapshot>> {
    let mut builder = ScopeTree::builder();
    let mut labels = ScopeLabels::default();
    let tenants = directory.list_tenants().await?;
    for tenant in tenants {
        builder = builder.tenant(Tenant {
            id: tenant.tenant_id,
        });
        labels
            .tenants
            .insert(tenant.tenant_id, tenant.display_name.clone());
        for portfolio in directory.list_portfolios(tenant.tenant_id).await? {
            if portfolio.tenant_id != tenant.tenant_id {
                return Err(ScopeError::MisplacedNode {
                    level: ScopeLevel::Portfolio,
                    id: portfolio.portfolio_id.get(),
                    listed_under: tenant.tenant_id.get(),
                    recorded: portfolio.tenant_id.get(),
                }
                .into());
            }
            builder = builder.portfolio(Portfolio {
                id: portfolio.portfolio_id,
                tenant_id: tenant.tenant_id,
            });
            labels
                .portfolios
                .insert(portfolio.portfolio_id, portfolio.display_name.clone());
            for sub in directory
                .list_sub_portfolios(portfolio.portfolio_id)
                .await?
            {
                if sub.portfolio_id != portfolio.portfolio_id {
                    return Err(ScopeError::MisplacedNode {
                        level: ScopeLevel::SubPortfolio,
                        id: sub.sub_portfolio_id.get(),
                        listed_under: portfolio.portfolio_id.get(),
                        recorded: sub.portfolio_id.get(),
                    }
                    .into());
                }
                builder = builder.sub_portfolio(SubPortfolio {
                    id: sub.sub_portfolio_id,
                    portfolio_id: portfolio.portfolio_id,
                });
                labels
                    .sub_portfolios
                    .insert(sub.sub_portfolio_id, sub.display_name);
            }
        }
    }
    let tree = builder.build()?;
    tracing::info!(
        backend = directory.backend_name(),
        tenants = tree.tenant_count(),
        portfolios = tree.portfolio_count(),
        sub_portfolios = tree.sub_portfolio_count(),
        "scope tree loaded"
    );
    Ok(Arc::new(DirectorySnapshot { tree, labels }))
}
