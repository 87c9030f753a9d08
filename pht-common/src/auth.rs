//! Caller role resolution
//!
//! Identity is established upstream of the engine; this module only maps a
//! presented API token to the role the engine consumes. With no tokens
//! configured, auth checking is disabled and every caller resolves to admin
//! (local development and tests).

use serde::{Deserialize, Serialize};

/// Resolved caller role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    User,
    Admin,
}

impl Role {
    /// True for authenticated callers (user or admin)
    pub fn is_user(&self) -> bool {
        matches!(self, Role::User | Role::Admin)
    }

    /// True for admin callers only
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// API token configuration for role resolution
#[derive(Debug, Clone, Default)]
pub struct AuthTokens {
    /// Token granting the admin role
    pub admin_token: Option<String>,
    /// Token granting the user role (shared by registered players)
    pub player_token: Option<String>,
}

impl AuthTokens {
    pub fn new(admin_token: Option<String>, player_token: Option<String>) -> Self {
        Self {
            admin_token,
            player_token,
        }
    }

    /// True when no tokens are configured, which disables auth checking
    pub fn disabled(&self) -> bool {
        self.admin_token.is_none() && self.player_token.is_none()
    }

    /// Resolve a presented token to a caller role
    pub fn resolve(&self, presented: Option<&str>) -> Role {
        if self.disabled() {
            return Role::Admin;
        }
        match presented {
            Some(token) if self.admin_token.as_deref() == Some(token) => Role::Admin,
            Some(token) if self.player_token.as_deref() == Some(token) => Role::User,
            _ => Role::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tokens_disables_auth() {
        let tokens = AuthTokens::default();
        assert!(tokens.disabled());
        assert_eq!(tokens.resolve(None), Role::Admin);
        assert_eq!(tokens.resolve(Some("anything")), Role::Admin);
    }

    #[test]
    fn test_token_resolution() {
        let tokens = AuthTokens::new(Some("admin-secret".into()), Some("player-secret".into()));
        assert!(!tokens.disabled());
        assert_eq!(tokens.resolve(Some("admin-secret")), Role::Admin);
        assert_eq!(tokens.resolve(Some("player-secret")), Role::User);
        assert_eq!(tokens.resolve(Some("wrong")), Role::Anonymous);
        assert_eq!(tokens.resolve(None), Role::Anonymous);
    }

    #[test]
    fn test_player_token_alone_still_enforces() {
        let tokens = AuthTokens::new(None, Some("player-secret".into()));
        assert_eq!(tokens.resolve(Some("player-secret")), Role::User);
        assert_eq!(tokens.resolve(None), Role::Anonymous);
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Admin.is_user());
        assert!(Role::Admin.is_admin());
        assert!(Role::User.is_user());
        assert!(!Role::User.is_admin());
        assert!(!Role::Anonymous.is_user());
    }
}
