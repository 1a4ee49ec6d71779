// The seam between the list controller and wherever rows come from.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use refdesk_api::types::{PageResponse, Pagination};
use refdesk_api::{ApiClient, ListParams, Resource};
use tracing::debug;

use crate::error::CoreError;

/// One page of rows plus the backend's pagination block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> ListResult<T> {
    /// `last_page`, never less than 1.
    pub fn page_count(&self) -> u32 {
        self.pagination.last_page.max(1)
    }
}

impl<T> From<PageResponse<T>> for ListResult<T> {
    fn from(resp: PageResponse<T>) -> Self {
        Self {
            items: resp.data,
            pagination: resp.pagination,
        }
    }
}

/// Something a [`ListQueryController`](crate::ListQueryController) can
/// fetch pages from and delete rows through.
pub trait ListSource: Send + Sync {
    type Item: Send;

    fn fetch(
        &self,
        params: &ListParams,
    ) -> impl Future<Output = Result<ListResult<Self::Item>, CoreError>> + Send;

    /// Delete one row. Returns the backend's confirmation message.
    fn delete(&self, id: u64) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// [`ListSource`] over the REST API for any [`Resource`].
pub struct RemoteList<R> {
    api: Arc<ApiClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for RemoteList<R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> RemoteList<R> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ListSource for RemoteList<R> {
    type Item = R::Row;

    async fn fetch(&self, params: &ListParams) -> Result<ListResult<R::Row>, CoreError> {
        debug!(resource = R::NAME, page = params.page, "fetching list page");
        let page = self.api.list::<R>(params).await?;
        Ok(page.into())
    }

    async fn delete(&self, id: u64) -> Result<String, CoreError> {
        debug!(resource = R::NAME, id, "deleting row");
        let resp = self.api.remove::<R>(id).await?;
        Ok(resp.message)
    }
}
