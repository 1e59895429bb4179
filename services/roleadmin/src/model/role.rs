//! Role records and the editable draft fields of an editing session.
use scopegrant_authz::GrantRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type RoleId = u64;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Role {
    #[schema(value_type = u64)]
    pub role_id: RoleId,
    pub name: String,
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub permission_ids: Vec<u64>,
    /// Canonical grant set in deterministic order.
    #[serde(default)]
    pub grants: Vec<GrantRecord>,
}

impl Role {
    pub fn draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            active: self.active,
            permission_ids: self.permission_ids.clone(),
        }
    }
}

/// Role fields edited alongside the grant set.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: String,
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub permission_ids: Vec<u64>,
}

impl Default for RoleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            active: true,
            permission_ids: Vec::new(),
        }
    }
}

impl RoleDraft {
    /// Problems preventing a save; empty when the draft is savable.
    pub fn validation_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name must not be empty");
        }
        if self.description.trim().is_empty() {
            errors.push("description must not be empty");
        }
        errors
    }

    pub fn apply(&mut self, patch: RoleDraftPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(permission_ids) = patch.permission_ids {
            self.permission_ids = permission_ids;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct RoleDraftPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub permission_ids: Option<Vec<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_validation() {
        let draft = RoleDraft {
            name: "  ".to_string(),
            description: "Auditors".to_string(),
            ..RoleDraft::default()
        };
        assert_eq!(draft.validation_errors(), vec!["name must not be empty"]);
        assert_eq!(RoleDraft::default().validation_errors().len(), 2);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut draft = RoleDraft {
            name: "Ops".to_string(),
            description: "Operations".to_string(),
            active: true,
            permission_ids: vec![1, 2],
        };
        draft.apply(RoleDraftPatch {
            active: Some(false),
            permission_ids: Some(vec![3]),
            ..RoleDraftPatch::default()
        });
        assert_eq!(draft.name, "Ops");
        assert!(!draft.active);
        assert_eq!(draft.permission_ids, vec![3]);
    }
}
