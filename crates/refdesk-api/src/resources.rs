// Typed CRUD endpoints.
//
// Every entity in the console follows the same shape: a paginated list,
// an edit-view fetch, create, update and delete. `Resource` captures the
// per-entity differences (path, payload types, update verb) so one set of
// generic client methods serves them all.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    Branch, BranchInput, Category, CategoryInput, Client, ClientDetail, ClientInput,
    DataResponse, Employee, EmployeeDetail, EmployeeInput, MessageResponse, Orient, OrientInput,
    PageResponse, Role, RoleInput,
};

// ── Sort direction ───────────────────────────────────────────────────

/// Wire value of the `orderby` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── List parameters ──────────────────────────────────────────────────

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub order: SortDirection,
    pub search: String,
    /// Entity-specific filters, sent verbatim after the common parameters.
    pub filters: Vec<(String, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            sort: "id".into(),
            order: SortDirection::Asc,
            search: String::new(),
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    /// Render as `(name, value)` pairs in the backend's parameter names.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_owned(), self.page.to_string()),
            ("perpage".to_owned(), self.per_page.to_string()),
            ("sort".to_owned(), self.sort.clone()),
            ("orderby".to_owned(), self.order.as_str().to_owned()),
            ("search".to_owned(), self.search.clone()),
        ];
        query.extend(self.filters.iter().cloned());
        query
    }
}

// ── Resource descriptors ─────────────────────────────────────────────

/// How an entity's update endpoint expects to be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStyle {
    /// `PUT {path}/{id}`
    Put,
    /// `POST {path}/{id}` with `_method: "PUT"` in the body.
    MethodOverride,
}

/// One CRUD entity exposed by the backend.
pub trait Resource: Send + Sync + 'static {
    /// Collection path relative to the base URL, e.g. `"api/categories"`.
    const PATH: &'static str;
    /// Singular display name, e.g. `"category"`.
    const NAME: &'static str;
    const UPDATE: UpdateStyle = UpdateStyle::Put;

    /// Row shape returned by the list endpoint.
    type Row: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;
    /// Shape returned by `{path}/{id}/edit`.
    type Detail: DeserializeOwned + Serialize + Send + 'static;
    /// Create / update payload.
    type Input: Serialize + Send + Sync;
}

pub struct Branches;
pub struct Orients;
pub struct Categories;
pub struct Clients;
pub struct Employees;
pub struct Roles;

impl Resource for Branches {
    const PATH: &'static str = "api/branches";
    const NAME: &'static str = "branch";
    type Row = Branch;
    type Detail = Branch;
    type Input = BranchInput;
}

impl Resource for Orients {
    const PATH: &'static str = "api/orients";
    const NAME: &'static str = "orient";
    type Row = Orient;
    type Detail = Orient;
    type Input = OrientInput;
}

impl Resource for Categories {
    const PATH: &'static str = "api/categories";
    const NAME: &'static str = "category";
    type Row = Category;
    type Detail = Category;
    type Input = CategoryInput;
}

impl Resource for Clients {
    const PATH: &'static str = "api/clients";
    const NAME: &'static str = "client";
    const UPDATE: UpdateStyle = UpdateStyle::MethodOverride;
    type Row = Client;
    type Detail = ClientDetail;
    type Input = ClientInput;
}

impl Resource for Employees {
    const PATH: &'static str = "api/user/users";
    const NAME: &'static str = "employee";
    const UPDATE: UpdateStyle = UpdateStyle::MethodOverride;
    type Row = Employee;
    type Detail = EmployeeDetail;
    type Input = EmployeeInput;
}

impl Resource for Roles {
    const PATH: &'static str = "api/roles";
    const NAME: &'static str = "role";
    const UPDATE: UpdateStyle = UpdateStyle::MethodOverride;
    type Row = Role;
    type Detail = Role;
    type Input = RoleInput;
}

#[derive(Serialize)]
struct MethodOverride<'a, B: Serialize> {
    #[serde(flatten)]
    body: &'a B,
    #[serde(rename = "_method")]
    method: &'static str,
}

// ── Generic CRUD ─────────────────────────────────────────────────────

impl ApiClient {
    /// Fetch one page of `R`.
    pub async fn list<R: Resource>(
        &self,
        params: &ListParams,
    ) -> Result<PageResponse<R::Row>, Error> {
        self.get(R::PATH, &params.to_query()).await
    }

    /// Fetch the edit view of one `R`.
    pub async fn fetch<R: Resource>(&self, id: u64) -> Result<R::Detail, Error> {
        let resp: DataResponse<R::Detail> =
            self.get(&format!("{}/{id}/edit", R::PATH), &[]).await?;
        Ok(resp.data)
    }

    pub async fn create<R: Resource>(&self, input: &R::Input) -> Result<MessageResponse, Error> {
        self.post(R::PATH, input).await
    }

    pub async fn update<R: Resource>(
        &self,
        id: u64,
        input: &R::Input,
    ) -> Result<MessageResponse, Error> {
        let path = format!("{}/{id}", R::PATH);
        match R::UPDATE {
            UpdateStyle::Put => self.put(&path, input).await,
            UpdateStyle::MethodOverride => {
                let body = MethodOverride {
                    body: input,
                    method: "PUT",
                };
                self.post(&path, &body).await
            }
        }
    }

    pub async fn remove<R: Resource>(&self, id: u64) -> Result<MessageResponse, Error> {
        self.delete(&format!("{}/{id}", R::PATH)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn list_params_use_backend_names_in_order() {
        let params = ListParams {
            page: 3,
            per_page: 25,
            sort: "name".into(),
            order: SortDirection::Desc,
            search: "nor".into(),
            filters: vec![("branch_id".into(), "7".into())],
        };
        let query = params.to_query();
        let names: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["page", "perpage", "sort", "orderby", "search", "branch_id"]
        );
        assert_eq!(query[3].1, "desc");
        assert_eq!(query[5].1, "7");
    }

    #[test]
    fn method_override_flattens_the_payload() {
        let input = RoleInput {
            name: "auditor".into(),
            permissions: vec![1, 2],
        };
        let body = MethodOverride {
            body: &input,
            method: "PUT",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["name"], "auditor");
        assert_eq!(value["_method"], "PUT");
        assert_eq!(value["permissions"][1], 2);
    }

    #[test]
    fn sort_direction_toggles() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
        assert_eq!(SortDirection::default().to_string(), "asc");
    }
}
