// Picklist endpoints under `api/filter/*`.
//
// These feed the selects on create/edit forms and the filter controls on
// list views. All of them return `{ status, data: [...] }`.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{BranchOption, BranchTreeNode, DataResponse, NamedRef};

impl ApiClient {
    /// Every branch as a flat list, children carrying `parent_name`.
    pub async fn branch_options(&self) -> Result<Vec<BranchOption>, Error> {
        let resp: DataResponse<Vec<BranchOption>> = self
            .get("api/filter/branches", &[("tree".into(), "0".into())])
            .await?;
        Ok(resp.data)
    }

    /// Regions with their sub-regions nested under `childrens`.
    pub async fn branch_tree(&self) -> Result<Vec<BranchTreeNode>, Error> {
        let resp: DataResponse<Vec<BranchTreeNode>> = self
            .get("api/filter/branches", &[("tree".into(), "1".into())])
            .await?;
        Ok(resp.data)
    }

    /// Roles, optionally excluding one by name.
    pub async fn role_options(&self, without: Option<&str>) -> Result<Vec<NamedRef>, Error> {
        let params = [("withOutRole".to_owned(), without.unwrap_or_default().to_owned())];
        let resp: DataResponse<Vec<NamedRef>> = self.get("api/filter/roles", &params).await?;
        Ok(resp.data)
    }

    /// Orients belonging to one branch.
    pub async fn orient_options(&self, branch_id: u64) -> Result<Vec<NamedRef>, Error> {
        let params = [("branch_id".to_owned(), branch_id.to_string())];
        let resp: DataResponse<Vec<NamedRef>> = self.get("api/filter/orients", &params).await?;
        Ok(resp.data)
    }

    pub async fn manager_options(&self) -> Result<Vec<NamedRef>, Error> {
        let resp: DataResponse<Vec<NamedRef>> = self.get("api/filter/managers", &[]).await?;
        Ok(resp.data)
    }

    pub async fn permission_options(&self) -> Result<Vec<NamedRef>, Error> {
        let resp: DataResponse<Vec<NamedRef>> = self.get("api/filter/permissions", &[]).await?;
        Ok(resp.data)
    }
}
