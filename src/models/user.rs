// src/models/user.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Access level of an account. Only these two values exist; anything else is
/// rejected when decoding JSON, token claims, or database rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(value)),
        }
    }
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,

    /// Unique email, also accepted as login identifier.
    pub email: String,

    /// Unique display name, also accepted as login identifier.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    #[sqlx(try_from = "String")]
    pub role: Role,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for self-service registration. The role is never taken from input.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(
        length(max = 50, message = "Username is required (max 50 characters)."),
        custom(function = not_blank, message = "Username is required (max 50 characters).")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128, message = "Password is required (max 128 characters)."))]
    pub password: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// DTO for user login. Either `email` or `username` identifies the account.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Which column a login identifier is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl LoginIdentifier<'_> {
    pub fn value(&self) -> &str {
        match self {
            LoginIdentifier::Email(v) | LoginIdentifier::Username(v) => v,
        }
    }
}

impl LoginRequest {
    /// The first non-empty identifier, email preferred.
    pub fn identifier(&self) -> Option<LoginIdentifier<'_>> {
        non_blank(&self.email)
            .map(LoginIdentifier::Email)
            .or_else(|| non_blank(&self.username).map(LoginIdentifier::Username))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user: i64,
    pub username: String,
}

/// DTO for an admin creating a user with an explicit role.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(
        length(max = 50, message = "Username is required (max 50 characters)."),
        custom(function = not_blank, message = "Username is required (max 50 characters).")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128, message = "Password is required (max 128 characters)."))]
    pub password: String,
    pub role: Role,
}

/// DTO for changing a user's role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::try_from("admin".to_string()).unwrap(), Role::Admin);
        assert_eq!(Role::try_from("user".to_string()).unwrap(), Role::User);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn role_rejects_other_values() {
        assert!(Role::try_from("root".to_string()).is_err());
        assert!(Role::try_from("Admin".to_string()).is_err());
        assert!(serde_json::from_str::<UpdateRoleRequest>(r#"{"role":"superuser"}"#).is_err());
    }

    #[test]
    fn login_identifier_prefers_email_and_skips_blanks() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":" ","username":"ana","password":"x"}"#).unwrap();
        assert_eq!(req.identifier(), Some(LoginIdentifier::Username("ana")));

        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","username":"ana","password":"x"}"#).unwrap();
        assert_eq!(req.identifier(), Some(LoginIdentifier::Email("a@b.co")));

        let req: LoginRequest = serde_json::from_str(r#"{"password":"x"}"#).unwrap();
        assert_eq!(req.identifier(), None);
    }

    #[test]
    fn register_validation_requires_all_fields() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","username":"","password":"pw"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","username":"ana","password":"pw"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn whitespace_username_is_rejected() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","username":"   ","password":"pw"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: AdminCreateUserRequest = serde_json::from_str(
            r#"{"email":"a@b.co","username":"\t ","password":"pw","role":"user"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
