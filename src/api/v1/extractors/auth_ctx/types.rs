/*
 * Responsibility
 * - The authenticated context seen by handlers
 * - The middleware verifies the token and stores it in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - Token verification lives in services::auth; this file is the contract only
 */

/// Context attached to every request that passed access-token verification.
///
/// - `subject` is the identity provider's user id (`sub`)
/// - `role` is the coarse-grained role (`role`); per-resource checks use `can_act_on`
/// - `expires_at` / `issued_at` are seconds since the epoch, when the token carried them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub role: String,
    pub email: Option<String>,
    pub expires_at: Option<i64>,
    pub issued_at: Option<i64>,
}

impl AuthCtx {
    const ELEVATED_ROLES: [&'static str; 2] = ["admin", "service_role"];

    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
            email: None,
            expires_at: None,
            issued_at: None,
        }
    }

    pub fn is_elevated(&self) -> bool {
        Self::ELEVATED_ROLES.contains(&self.role.as_str())
    }

    /// A caller may act on its own user record; elevated roles may act on any.
    pub fn can_act_on(&self, user_id: &str) -> bool {
        self.is_elevated() || self.subject.eq_ignore_ascii_case(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_can_act_on_self_only() {
        let ctx = AuthCtx::new("5803acaf-821a-4463-b8b4-15ac6e0e466a", "authenticated");

        assert!(ctx.can_act_on("5803ACAF-821A-4463-B8B4-15AC6E0E466A"));
        assert!(!ctx.can_act_on("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn elevated_roles_can_act_on_anyone() {
        for role in ["admin", "service_role"] {
            let ctx = AuthCtx::new("u1", role);
            assert!(ctx.can_act_on("someone-else"));
        }
    }
}
