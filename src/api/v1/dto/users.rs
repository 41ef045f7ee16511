/*
 * Responsibility
 * - Users request/response DTOs
 * - validate() for shape checks
 */
use serde::{Deserialize, Serialize};

use crate::services::supabase::types::{AuthUser, UserFields};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !looks_like_email(&self.email) {
            return Err("a valid email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: String,
    pub email: Option<String>,
}

impl From<AuthUser> for CreatedUserResponse {
    fn from(u: AuthUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.as_deref().filter(|s| !s.trim().is_empty());
        let role = self.role.as_deref().filter(|s| !s.trim().is_empty());

        if email.is_none() && role.is_none() {
            return Err("no valid fields to update");
        }
        if let Some(email) = email
            && !looks_like_email(email)
        {
            return Err("email is invalid");
        }
        Ok(())
    }

    pub fn into_fields(self) -> UserFields {
        UserFields {
            email: self
                .email
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            role: self
                .role
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    matches!(s.split_once('@'), Some((local, domain)) if !local.is_empty() && domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_validation() {
        let ok = CreateUserRequest {
            email: "a@example.com".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = CreateUserRequest {
            email: "nope".into(),
            password: "pw".into(),
        };
        assert!(bad_email.validate().is_err());

        let no_password = CreateUserRequest {
            email: "a@example.com".into(),
            password: String::new(),
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn update_user_drops_blank_fields() {
        let req = UpdateUserRequest {
            email: Some(" ".into()),
            role: Some("editor".into()),
        };
        assert!(req.validate().is_ok());

        let fields = req.into_fields();
        assert_eq!(fields.email, None);
        assert_eq!(fields.role.as_deref(), Some("editor"));

        let empty = UpdateUserRequest {
            email: None,
            role: Some("".into()),
        };
        assert!(empty.validate().is_err());
    }
}
