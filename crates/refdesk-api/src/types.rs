// Wire types for the refdesk REST API.
//
// Envelopes first, then one section per entity. Field names follow the
// backend's snake_case JSON; `#[serde(default)]` marks fields the backend
// omits on some endpoints.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ status, data }` -- single-object and picklist responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataResponse<T> {
    #[serde(default)]
    pub status: bool,
    pub data: T,
}

/// `{ status, data: [...], pagination }` -- every paginated list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageResponse<T> {
    #[serde(default)]
    pub status: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

/// `{ status, message }` -- create / update / delete responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
}

/// One violated validation rule. A field may appear several times.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldViolation {
    pub input: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Body of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldViolation>>,
}

/// A column value the backend sends either as an id or as a display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Label {
    Id(u64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginPayload {
    pub token: String,
    pub user: User,
}

/// The logged-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub phone_verified_at: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub verification: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Branches ─────────────────────────────────────────────────────────

/// A regional branch. `parent_id == 0` marks a top-level region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Branch {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub warehouse: bool,
    #[serde(default)]
    pub parent_id: u64,
    /// Sub-regions, present on the branch list endpoint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub childrens: Vec<Branch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchInput {
    pub name: String,
    /// `None` creates a top-level region.
    pub parent_id: Option<u64>,
    pub warehouse: bool,
}

/// Flat picklist entry from `api/filter/branches?tree=0`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchOption {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub warehouse: bool,
}

/// Nested picklist entry from `api/filter/branches?tree=1`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchTreeNode {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub warehouse: bool,
    #[serde(default)]
    pub childrens: Vec<BranchLeaf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchLeaf {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: u64,
}

// ── Orients (landmarks) ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Orient {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub branch_id: Option<Label>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrientInput {
    pub name: String,
    pub branch_id: Option<u64>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub manager_id: Option<Label>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub branch_id: Option<u64>,
    #[serde(default)]
    pub manager_id: Option<u64>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    pub birthday: Option<NaiveDate>,
    pub address: String,
    pub description: String,
    pub password: String,
    pub password_confirmation: String,
    pub active: bool,
    pub branch_id: Option<u64>,
    pub manager_id: Option<u64>,
}

impl Default for ClientInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            birthday: None,
            address: String::new(),
            description: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            active: true,
            branch_id: None,
            manager_id: None,
        }
    }
}

// ── Employees ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeDetail {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub branch_id: Option<u64>,
    #[serde(default)]
    pub orient_id: Option<u64>,
    #[serde(default)]
    pub manager_id: Option<u64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeInput {
    pub name: String,
    pub phone: String,
    pub birthday: Option<NaiveDate>,
    pub address: String,
    pub description: String,
    pub password: String,
    pub password_confirmation: String,
    pub active: bool,
    pub branch_id: Option<u64>,
    pub roles: Vec<String>,
}

impl Default for EmployeeInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            birthday: None,
            address: String::new(),
            description: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            active: true,
            branch_id: None,
            roles: Vec::new(),
        }
    }
}

// ── Roles ────────────────────────────────────────────────────────────

/// Picklist entry shared by roles, orients, managers and permissions filters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<NamedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoleInput {
    pub name: String,
    pub permissions: Vec<u64>,
}

impl From<&Role> for RoleInput {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            permissions: role.permissions.iter().map(|p| p.id).collect(),
        }
    }
}
