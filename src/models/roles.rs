// src/models/roles.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "role_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    SuperAdmin,
    Staff,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invitation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
}

/// As áreas do app que podem ser liberadas ou bloqueadas por pessoa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionArea {
    Accounts,
    Events,
    Members,
}

impl PermissionArea {
    pub fn slug(self) -> &'static str {
        match self {
            PermissionArea::Accounts => "accounts",
            PermissionArea::Events => "events",
            PermissionArea::Members => "members",
        }
    }
}

/// O "saco" de permissões gravado em JSONB. Chave ausente = liberado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RolePermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<bool>,
}

impl RolePermissions {
    fn slot(&mut self, area: PermissionArea) -> &mut Option<bool> {
        match area {
            PermissionArea::Accounts => &mut self.accounts,
            PermissionArea::Events => &mut self.events,
            PermissionArea::Members => &mut self.members,
        }
    }

    pub fn allows(&self, area: PermissionArea) -> bool {
        let value = match area {
            PermissionArea::Accounts => self.accounts,
            PermissionArea::Events => self.events,
            PermissionArea::Members => self.members,
        };
        value.unwrap_or(true)
    }

    /// Inverte o valor efetivo da área (ausente conta como `true`, então vira `false`).
    pub fn toggled(mut self, area: PermissionArea) -> Self {
        let next = !self.allows(area);
        *self.slot(area) = Some(next);
        self
    }
}

// O que sai do banco (Tabela user_roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: RoleKind,
    #[schema(value_type = RolePermissions, example = json!({"accounts": false}))]
    pub permissions: Json<RolePermissions>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleInvitation {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    #[schema(example = "staff@mjm.lk")]
    pub email: String,
    pub role: RoleKind,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

fn validate_invitable(role: &RoleKind) -> Result<(), ValidationError> {
    if *role == RoleKind::SuperAdmin {
        return Err(ValidationError::new("role_not_invitable"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "staff@mjm.lk")]
    pub email: String,

    #[validate(custom(function = "validate_invitable"))]
    #[schema(example = "staff")]
    pub role: RoleKind,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TogglePermissionPayload {
    pub area: PermissionArea,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub roles: Vec<UserRole>,
    pub invitations: Vec<RoleInvitation>,
}

/// O vínculo da conta com a mesquita da requisição (resolvido no tenant_guard).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub role: RoleKind,
    pub permissions: RolePermissions,
    pub is_owner: bool,
}

impl Membership {
    pub fn can(&self, area: PermissionArea) -> bool {
        self.role == RoleKind::SuperAdmin || self.permissions.allows(area)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == RoleKind::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_are_allowed() {
        let perms = RolePermissions::default();
        assert!(perms.allows(PermissionArea::Accounts));
        assert!(perms.allows(PermissionArea::Events));
        assert!(perms.allows(PermissionArea::Members));
    }

    #[test]
    fn toggle_starts_from_effective_value() {
        let perms = RolePermissions::default().toggled(PermissionArea::Accounts);
        assert_eq!(perms.accounts, Some(false));
        assert!(!perms.allows(PermissionArea::Accounts));

        let perms = perms.toggled(PermissionArea::Accounts);
        assert_eq!(perms.accounts, Some(true));
        assert!(perms.events.is_none());
    }

    #[test]
    fn super_admin_bypasses_the_bag() {
        let locked = RolePermissions { accounts: Some(false), events: Some(false), members: Some(false) };
        let admin = Membership { role: RoleKind::SuperAdmin, permissions: locked, is_owner: false };
        let staff = Membership { role: RoleKind::Staff, permissions: locked, is_owner: false };

        assert!(admin.can(PermissionArea::Events));
        assert!(!staff.can(PermissionArea::Events));
    }

    #[test]
    fn bag_reads_legacy_json() {
        let perms: RolePermissions = serde_json::from_value(json!({ "events": false })).unwrap();
        assert!(perms.allows(PermissionArea::Accounts));
        assert!(!perms.allows(PermissionArea::Events));
        assert_eq!(serde_json::to_value(perms).unwrap(), json!({ "events": false }));
    }

    #[test]
    fn super_admin_cannot_be_invited() {
        let payload = InvitePayload { email: "x@mjm.lk".into(), role: RoleKind::SuperAdmin };
        assert!(payload.validate().is_err());
        let payload = InvitePayload { email: "x@mjm.lk".into(), role: RoleKind::Editor };
        assert!(payload.validate().is_ok());
    }
}
