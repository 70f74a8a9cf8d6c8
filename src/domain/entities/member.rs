//! Member entity and repository trait.
//!
//! Maps to the `members` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::drink::DrinkType;
use crate::shared::error::{AppError, ErrorCode};

/// Member role enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a member account.
///
/// Maps to the `members` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - region_id: BIGINT NOT NULL REFERENCES regions(id)
/// - name: VARCHAR(50) NOT NULL
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - birth_date: DATE NULL
/// - favor_drinks: TEXT[] NOT NULL DEFAULT '{}'
/// - role: VARCHAR(10) NOT NULL DEFAULT 'USER'
/// - alarm_enabled: BOOLEAN NOT NULL DEFAULT TRUE
/// - image_url: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Home region
    pub region_id: i64,

    /// Display name
    pub name: String,

    /// Email address (unique, used for sign-in)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub birth_date: Option<NaiveDate>,

    /// Drink categories the member likes
    pub favor_drinks: Vec<DrinkType>,

    pub role: Role,

    /// Whether the member wants notifications
    pub alarm_enabled: bool,

    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Default for Member {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            region_id: 0,
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            birth_date: None,
            favor_drinks: Vec::new(),
            role: Role::default(),
            alarm_enabled: true,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity of the authenticated caller.
///
/// Produced by the auth middleware from the access token and passed
/// explicitly into every service call that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentMember {
    pub id: i64,
    pub role: Role,
}

impl CurrentMember {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `AccessDenied` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ErrorCode::AccessDenied.into())
        }
    }

    /// Fails with `AccessDenied` unless the caller owns the resource or is an admin.
    pub fn require_owner_or_admin(&self, owner_id: i64) -> Result<(), AppError> {
        if self.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(ErrorCode::AccessDenied.into())
        }
    }
}

/// Repository trait for Member data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, AppError>;

    /// Find a member by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Create a new member.
    async fn create(&self, member: &Member) -> Result<Member, AppError>;

    /// Update profile fields (region, name, favorites, alarm flag, image).
    async fn update(&self, member: &Member) -> Result<Member, AppError>;

    /// Replace the password hash.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ADMIN", Role::Admin)]
    #[test_case("admin", Role::Admin)]
    #[test_case("USER", Role::User)]
    #[test_case("unknown", Role::User)]
    fn test_role_from_str(input: &str, expected: Role) {
        assert_eq!(Role::from_str(input), expected);
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_member_password_hash_not_serialized() {
        let member = Member {
            password_hash: "hashed_password".into(),
            ..Member::default()
        };

        let serialized = serde_json::to_string(&member).unwrap();
        assert!(!serialized.contains("hashed_password"));
    }

    #[test]
    fn test_require_admin() {
        assert!(CurrentMember::new(1, Role::Admin).require_admin().is_ok());

        let member = CurrentMember::new(1, Role::User);
        let err = member.require_admin().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::AccessDenied));
    }

    #[test]
    fn test_require_owner_or_admin() {
        let author = CurrentMember::new(7, Role::User);
        let admin = CurrentMember::new(1, Role::Admin);
        let stranger = CurrentMember::new(8, Role::User);

        assert!(author.require_owner_or_admin(7).is_ok());
        assert!(admin.require_owner_or_admin(7).is_ok());
        assert!(stranger.require_owner_or_admin(7).is_err());
    }
}
