//! Checkbox-tree rendering of a session's grant set.
use crate::directory::DirectorySnapshot;
use scopegrant_authz::coverage::is_covered;
use scopegrant_authz::{
    ExpansionHints, GrantSet, PortfolioId, ScopeNode, SubPortfolioId, TenantId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct TenantCheckbox {
    #[schema(value_type = i64)]
    pub tenant_id: TenantId,
    pub label: String,
    pub checked: bool,
    /// Unchecked, but something beneath it is granted.
    pub indeterminate: bool,
    pub expanded: bool,
    pub portfolios: Vec<PortfolioCheckbox>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PortfolioCheckbox {
    #[schema(value_type = i64)]
    pub portfolio_id: PortfolioId,
    pub label: String,
    pub checked: bool,
    pub indeterminate: bool,
    pub expanded: bool,
    pub sub_portfolios: Vec<SubPortfolioCheckbox>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SubPortfolioCheckbox {
    #[schema(value_type = i64)]
    pub sub_portfolio_id: SubPortfolioId,
    pub label: String,
    pub checked: bool,
}

fn indeterminate(grants: &GrantSet, node: &ScopeNode, checked: bool) -> bool {
    !checked && grants.within(node).next().is_some()
}

pub(crate) fn checkbox_tree(
    directory: &DirectorySnapshot,
    grants: &GrantSet,
    expansion: &ExpansionHints,
) -> Vec<TenantCheckbox> {
    let tree = &directory.tree;
    tree.tenants()
        .iter()
        .map(|&tenant| {
            let tenant_node = ScopeNode::Tenant(tenant);
            let checked = is_covered(grants, &tenant_node);
            let portfolios = tree
                .portfolios_of(tenant)
                .unwrap_or_default()
                .iter()
                .map(|&portfolio| {
                    let portfolio_node = ScopeNode::Portfolio(tenant, portfolio);
                    let checked = is_covered(grants, &portfolio_node);
                    let sub_portfolios = tree
                        .sub_portfolios_of(portfolio)
                        .unwrap_or_default()
                        .iter()
                        .map(|&sub| {
                            let sub_node = ScopeNode::SubPortfolio(tenant, portfolio, sub);
                            SubPortfolioCheckbox {
                                sub_portfolio_id: sub,
                                label: directory.labels.label(&sub_node),
                                checked: is_covered(grants, &sub_node),
                            }
                        })
                        .collect();
                    PortfolioCheckbox {
                        portfolio_id: portfolio,
                        label: directory.labels.label(&portfolio_node),
                        checked,
                        indeterminate: indeterminate(grants, &portfolio_node, checked),
                        expanded: expansion.portfolios.contains(&portfolio),
                        sub_portfolios,
                    }
                })
                .collect();
            TenantCheckbox {
                tenant_id: tenant,
                label: directory.labels.label(&tenant_node),
                checked,
                indeterminate: indeterminate(grants, &tenant_node, checked),
                expanded: expansion.tenants.contains(&tenant),
                portfolios,
            }
        })
        .collect()
}
