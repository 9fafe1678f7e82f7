//! Employee Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employee role. Fixed at creation, never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Employee entity (password hash never leaves the server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    /// Tenant key; visibility and assignment rules compare this field
    pub company: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Public name card embedded in task listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&Employee> for EmployeeSummary {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            username: e.username.clone(),
            email: e.email.clone(),
        }
    }
}

/// Self-registration payload, always creates a company admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company: String,
    pub designation: Option<String>,
    pub department: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Employee,
}

/// Create employee payload (admin action, company is inherited)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub designation: Option<String>,
    pub department: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Employee.to_string(), "employee");
        assert!("manager".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let e = Employee {
            id: 1,
            username: "ann".into(),
            email: "ann@acme.io".into(),
            hash_pass: "$argon2id$secret".into(),
            designation: None,
            department: Some("ops".into()),
            role: Role::Employee,
            company: "Acme".into(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(!json.contains("hash_pass"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"company\":\"Acme\""));
    }
}
