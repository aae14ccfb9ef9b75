//! Member entity - a person on the recognition board

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Board role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl Role {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::ValidationError(format!("unknown role: {other}"))),
        }
    }
}

/// Member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Snowflake,
    pub display_name: String,
    pub email: String,
    pub department: String,
    pub role: Role,
    pub deleted: bool,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(
        id: Snowflake,
        display_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            department: department.into(),
            role,
            deleted: false,
            joined_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Active members can act, be tagged, and be notified
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Authenticated principal handed to the engine by the identity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Snowflake,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Snowflake, role: Role) -> Self {
        Self { id, role }
    }

    pub fn employee(id: Snowflake) -> Self {
        Self::new(id, Role::Employee)
    }

    pub fn admin(id: Snowflake) -> Self {
        Self::new(id, Role::Admin)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when the actor owns the resource or holds the admin role
    #[inline]
    pub fn owns_or_admin(&self, owner_id: Snowflake) -> bool {
        self.id == owner_id || self.is_admin()
    }
}

impl From<&Member> for Actor {
    fn from(member: &Member) -> Self {
        Self::new(member.id, member.role)
    }
}
