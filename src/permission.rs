//! Member and permission resolution.
//!
//! Permissions follow an allow-by-default, deny-by-exclusion model: a role
//! grants every feature except the ones named in its `excluded_features`
//! list, and admin roles bypass the list entirely. The polarity matters: a
//! feature id nobody has heard of is granted to any role that does not
//! exclude it. Every denial branch fails closed and is tagged, so handlers
//! map outcomes to status codes uniformly instead of catching errors.

use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;

use crate::entity::{member, role};
use crate::resolver::{Session, SessionResolver};

/// Well-known feature ids evaluated against `role.excluded_features`.
pub mod features {
    pub const EDIT_MEMBERS: &str = "admin_can_edit_members";
    pub const MANAGE_COMMUNICATIONS: &str = "admin_can_manage_communications";
    pub const EDIT_PAGES: &str = "admin_can_edit_pages";
    pub const MANAGE_EVENTS: &str = "admin_can_manage_events";
}

/// Outcome of a permission check, with the denial reason kept visible in the
/// type rather than collapsed into a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Permission granted, either by admin bypass or by not being excluded.
    Granted,
    /// The member's role names this feature in its exclusion list.
    DeniedByExclusion,
    /// The member is authenticated but has no role (or the role could not be
    /// read); default-deny with no explicit error.
    DeniedNoRole,
    /// No valid session or no member behind it.
    DeniedAuthFailure,
    /// Infrastructure failure: the member lookup itself failed.
    Unavailable,
}

impl Decision {
    pub fn is_granted(self) -> bool {
        self == Decision::Granted
    }

    /// Conventional HTTP status for this outcome.
    pub fn http_status(self) -> u16 {
        match self {
            Decision::Granted => 200,
            Decision::DeniedAuthFailure => 401,
            Decision::DeniedByExclusion | Decision::DeniedNoRole => 403,
            Decision::Unavailable => 503,
        }
    }

    /// Error message for the response body, `None` when granted.
    pub fn error_message(self) -> Option<&'static str> {
        match self {
            Decision::Granted => None,
            Decision::DeniedAuthFailure => Some("Not authenticated"),
            Decision::DeniedByExclusion | Decision::DeniedNoRole => Some("Permission denied"),
            Decision::Unavailable => Some("Database not configured"),
        }
    }
}

/// Result of [`authorize`]: the decision plus the member id when one was
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheck {
    pub decision: Decision,
    pub member_id: Option<i64>,
}

impl PermissionCheck {
    fn denied(decision: Decision) -> Self {
        Self {
            decision,
            member_id: None,
        }
    }
}

/// The capability set derived per request from a member's role.
///
/// Not persisted anywhere; serialized camelCase for handing straight to the
/// client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub is_admin: bool,
    pub can_edit_members: bool,
    pub can_manage_communications: bool,
    pub can_edit_pages: bool,
    pub can_manage_events: bool,
}

impl Capabilities {
    /// Derives the capability set from a role. `None` (roleless member)
    /// yields all-false.
    pub fn from_role(role: Option<&role::Model>) -> Self {
        let Some(role) = role else {
            return Self::default();
        };
        let granted = |feature: &str| role.is_admin || !role.excludes(feature);
        Self {
            is_admin: role.is_admin,
            can_edit_members: granted(features::EDIT_MEMBERS),
            can_manage_communications: granted(features::MANAGE_COMMUNICATIONS),
            can_edit_pages: granted(features::EDIT_PAGES),
            can_manage_events: granted(features::MANAGE_EVENTS),
        }
    }
}

/// Fetches the member row behind a resolved session.
///
/// `Ok(None)` covers both a session with no member id (never logged in fully)
/// and a member row that has since disappeared.
pub async fn resolve_member(
    conn: &DatabaseConnection,
    session: &Session,
) -> Result<Option<member::Model>, sea_orm::DbErr> {
    let Some(member_id) = session.data.member_id else {
        return Ok(None);
    };
    member::Entity::find_by_id(member_id).one(conn).await
}

/// The pure permission rule, evaluated against an already-fetched role.
///
/// `None` means the member has no role: default-deny. An admin role grants
/// unconditionally, even for permission ids not recognized anywhere else.
/// Otherwise the feature is granted unless named in `excluded_features`.
pub fn decide(role: Option<&role::Model>, permission_id: &str) -> Decision {
    let Some(role) = role else {
        return Decision::DeniedNoRole;
    };
    if role.is_admin {
        return Decision::Granted;
    }
    if role.excludes(permission_id) {
        Decision::DeniedByExclusion
    } else {
        Decision::Granted
    }
}

/// Resolves a member's permission for one feature id.
///
/// A failed role lookup (database error or missing row) fails closed: the
/// error is logged and the member is treated as roleless rather than letting
/// the failure grant anything.
pub async fn resolve_capabilities(
    conn: &DatabaseConnection,
    member: &member::Model,
    permission_id: &str,
) -> PermissionCheck {
    let Some(role_id) = member.role_id else {
        return PermissionCheck {
            decision: Decision::DeniedNoRole,
            member_id: Some(member.id),
        };
    };

    let role = match role::Entity::find_by_id(role_id).one(conn).await {
        Ok(role) => role,
        Err(err) => {
            tracing::warn!(error = %err, member_id = member.id, "role lookup failed; denying");
            None
        }
    };

    PermissionCheck {
        decision: decide(role.as_ref(), permission_id),
        member_id: Some(member.id),
    }
}

/// Full per-request authorization: session → member → role → decision.
///
/// The outcome distinguishes authentication absence (401 class) from
/// authorization denial (403 class) from infrastructure failure (503 class);
/// handlers map it with [`Decision::http_status`] and
/// [`Decision::error_message`].
pub async fn authorize(
    resolver: &SessionResolver,
    conn: &DatabaseConnection,
    cookie_header: Option<&str>,
    permission_id: &str,
) -> PermissionCheck {
    let Some(session) = resolver.resolve(cookie_header).await else {
        return PermissionCheck::denied(Decision::DeniedAuthFailure);
    };

    let member = match resolve_member(conn, &session).await {
        Ok(Some(member)) => member,
        Ok(None) => return PermissionCheck::denied(Decision::DeniedAuthFailure),
        Err(err) => {
            tracing::warn!(error = %err, "member lookup failed");
            return PermissionCheck::denied(Decision::Unavailable);
        }
    };

    resolve_capabilities(conn, &member, permission_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role(is_admin: bool, excluded: &[&str]) -> role::Model {
        role::Model {
            id: 1,
            name: "Test Role".to_string(),
            is_admin,
            excluded_features: json!(excluded),
        }
    }

    #[test]
    fn no_role_is_denied_for_every_permission() {
        for permission in [features::EDIT_MEMBERS, "anything_at_all"] {
            assert_eq!(decide(None, permission), Decision::DeniedNoRole);
        }
    }

    #[test]
    fn admin_bypass_is_total() {
        // Admins are granted even features named in their own exclusion list,
        // and ids recognized nowhere else in the system.
        let admin = role(true, &[features::EDIT_MEMBERS]);
        assert_eq!(
            decide(Some(&admin), features::EDIT_MEMBERS),
            Decision::Granted
        );
        assert_eq!(
            decide(Some(&admin), "some_future_feature"),
            Decision::Granted
        );
    }

    #[test]
    fn excluded_feature_is_denied_everything_else_granted() {
        let restricted = role(false, &[features::EDIT_MEMBERS]);
        assert_eq!(
            decide(Some(&restricted), features::EDIT_MEMBERS),
            Decision::DeniedByExclusion
        );
        assert_eq!(
            decide(Some(&restricted), features::MANAGE_COMMUNICATIONS),
            Decision::Granted
        );
        // Allow-by-default extends to unknown ids.
        assert_eq!(
            decide(Some(&restricted), "unknown_feature"),
            Decision::Granted
        );
    }

    #[test]
    fn malformed_exclusion_list_excludes_nothing() {
        let mut broken = role(false, &[]);
        broken.excluded_features = json!({"not": "an array"});
        assert_eq!(
            decide(Some(&broken), features::EDIT_MEMBERS),
            Decision::Granted
        );
    }

    #[test]
    fn capabilities_follow_the_exclusion_list() {
        let restricted = role(false, &[features::MANAGE_COMMUNICATIONS]);
        let caps = Capabilities::from_role(Some(&restricted));
        assert!(!caps.is_admin);
        assert!(caps.can_edit_members);
        assert!(!caps.can_manage_communications);
        assert!(caps.can_edit_pages);

        let roleless = Capabilities::from_role(None);
        assert_eq!(roleless, Capabilities::default());

        let admin = Capabilities::from_role(Some(&role(true, &[features::EDIT_PAGES])));
        assert!(admin.is_admin && admin.can_edit_pages);
    }

    #[test]
    fn decisions_map_to_conventional_statuses() {
        assert_eq!(Decision::Granted.http_status(), 200);
        assert_eq!(Decision::DeniedAuthFailure.http_status(), 401);
        assert_eq!(Decision::DeniedNoRole.http_status(), 403);
        assert_eq!(Decision::DeniedByExclusion.http_status(), 403);
        assert_eq!(Decision::Unavailable.http_status(), 503);

        assert_eq!(Decision::Granted.error_message(), None);
        assert_eq!(
            Decision::DeniedAuthFailure.error_message(),
            Some("Not authenticated")
        );
        assert_eq!(
            Decision::DeniedByExclusion.error_message(),
            Some("Permission denied")
        );
        assert_eq!(
            Decision::Unavailable.error_message(),
            Some("Database not configured")
        );
    }
}
