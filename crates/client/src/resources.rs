//! Resource Access Layer: one parameterised service for projects, events,
//! templates and guides.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use resourcehub_core::{
    ClientError, ClientResult, DepartmentId, DocumentType, Envelope, Pagination, RecordId,
    ResourceKind, ResourceRecord,
};

use crate::transport::ApiClient;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters, paging and sorting for list calls.
///
/// Unset fields are left out of the query so the backend applies its own
/// defaults. `document_type` is never sent; it filters the returned page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub department: Option<DepartmentId>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub is_active: Option<bool>,
    pub document_type: Option<DocumentType>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, department: impl Into<DepartmentId>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = Some(document_type);
        self
    }

    /// Fill the department-view defaults (page 1, 10 per page, newest first,
    /// active only) wherever the caller left a field unset.
    pub fn with_defaults(mut self) -> Self {
        self.page.get_or_insert(DEFAULT_PAGE);
        self.limit.get_or_insert(DEFAULT_LIMIT);
        self.sort_by.get_or_insert_with(|| DEFAULT_SORT_FIELD.to_string());
        self.order.get_or_insert(SortOrder::Desc);
        self.is_active.get_or_insert(true);
        self
    }

    /// Query-string pairs for the set fields. Blank search terms and zero
    /// page/limit values are treated as unset.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(department) = &self.department {
            pairs.push(("department", department.to_string()));
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("search", term.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sortBy", sort_by.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_string()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("isActive", active.to_string()));
        }

        pairs
    }
}

/// One page of records with the backend's paging metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePage {
    pub records: Vec<ResourceRecord>,
    pub pagination: Option<Pagination>,
    pub count: u64,
}

impl ResourcePage {
    fn from_envelope(env: Envelope<Vec<ResourceRecord>>) -> Self {
        let records = env.data.unwrap_or_default();
        let count = env.count.unwrap_or(records.len() as u64);
        Self {
            records,
            pagination: env.pagination,
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep only records of `document_type`. When a filter applies, `count`
/// becomes the number of records kept; pagination is left as the backend
/// reported it.
pub fn apply_document_filter(mut page: ResourcePage, document_type: Option<DocumentType>) -> ResourcePage {
    if let Some(wanted) = document_type {
        page.records.retain(|r| r.document_type() == Some(wanted));
        page.count = page.records.len() as u64;
    }
    page
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub department: DepartmentId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl NewRecord {
    pub fn new(department: impl Into<DepartmentId>, title: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            title: title.into(),
            file_url: None,
            is_active: None,
        }
    }

    pub fn file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }
}

/// Partial update; unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.file_url.is_none() && self.is_active.is_none()
    }
}

/// CRUD and query access to one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceService {
    kind: ResourceKind,
    api: ApiClient,
}

impl ResourceService {
    pub fn new(kind: ResourceKind, api: ApiClient) -> Self {
        Self { kind, api }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn fetch_context(&self) -> String {
        format!("Failed to fetch {}", self.kind)
    }

    pub async fn list(&self, options: &ListOptions) -> ClientResult<ResourcePage> {
        let request = self
            .api
            .request(Method::GET, &[self.kind.as_str()], self.fetch_context())
            .query(&options.query_pairs());
        let env: Envelope<Vec<ResourceRecord>> = self.api.send(request).await?;

        let page = apply_document_filter(ResourcePage::from_envelope(env), options.document_type);
        tracing::debug!(kind = %self.kind, returned = page.records.len(), count = page.count, "listed records");
        Ok(page)
    }

    /// List one department's records with the department-view defaults.
    pub async fn list_by_department(
        &self,
        department: &DepartmentId,
        options: ListOptions,
    ) -> ClientResult<ResourcePage> {
        let options = ListOptions {
            department: Some(department.clone()),
            ..options
        }
        .with_defaults();
        self.list(&options).await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> ClientResult<ResourceRecord> {
        let request = self.api.request(
            Method::GET,
            &[self.kind.as_str(), id.as_str()],
            format!("Failed to fetch {}", self.kind.singular()),
        );
        let env: Envelope<ResourceRecord> = self.api.send(request).await?;
        env.into_data(format!("{} not found", self.kind.label()))
    }

    pub async fn create(&self, record: &NewRecord) -> ClientResult<ResourceRecord> {
        if record.title.trim().is_empty() {
            return Err(ClientError::invalid_field("title", "Title is required"));
        }
        let request = self
            .api
            .request(
                Method::POST,
                &[self.kind.as_str()],
                format!("Failed to create {}", self.kind.singular()),
            )
            .json(record);
        let env: Envelope<ResourceRecord> = self.api.send(request).await?;
        let created = env
            .data
            .ok_or_else(|| ClientError::unknown(format!("{} was not returned after create", self.kind.label())))?;

        tracing::info!(kind = %self.kind, id = %created.id, "record created");
        Ok(created)
    }

    pub async fn update(&self, id: &RecordId, update: &RecordUpdate) -> ClientResult<ResourceRecord> {
        let request = self
            .api
            .request(
                Method::PUT,
                &[self.kind.as_str(), id.as_str()],
                format!("Failed to update {}", self.kind.singular()),
            )
            .json(update);
        let env: Envelope<ResourceRecord> = self.api.send(request).await?;
        env.into_data(format!("{} not found", self.kind.label()))
    }

    pub async fn delete(&self, id: &RecordId) -> ClientResult<()> {
        let request = self.api.request(
            Method::DELETE,
            &[self.kind.as_str(), id.as_str()],
            format!("Failed to delete {}", self.kind.singular()),
        );
        let _: Envelope<Value> = self.api.send(request).await?;

        tracing::info!(kind = %self.kind, id = %id, "record deleted");
        Ok(())
    }

    /// Title search, first page of [`SEARCH_LIMIT`] results.
    pub async fn search(
        &self,
        term: &str,
        department: Option<&DepartmentId>,
    ) -> ClientResult<ResourcePage> {
        let options = ListOptions {
            department: department.cloned(),
            search: Some(term.to_string()),
            page: Some(DEFAULT_PAGE),
            limit: Some(SEARCH_LIMIT),
            ..ListOptions::default()
        };
        self.list(&options).await
    }

    /// Newest active records across all departments.
    pub async fn recent(&self, limit: u32) -> ClientResult<Vec<ResourceRecord>> {
        let options = ListOptions::new()
            .limit(limit)
            .sort_by(DEFAULT_SORT_FIELD)
            .order(SortOrder::Desc)
            .is_active(true);
        Ok(self.list(&options).await?.records)
    }

    /// Bump the view counter. Failures are logged and swallowed.
    pub async fn record_view(&self, id: &RecordId) {
        let request = self.api.request(
            Method::PATCH,
            &[self.kind.as_str(), id.as_str(), "views"],
            "Failed to record view",
        );
        if let Err(err) = self.api.send::<Value>(request).await {
            tracing::warn!(kind = %self.kind, id = %id, code = err.code(), "view not recorded: {err}");
        }
    }
}
