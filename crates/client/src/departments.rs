use reqwest::Method;

use resourcehub_core::{ClientError, ClientResult, Department, Envelope};

use crate::transport::ApiClient;

const DEPARTMENTS: &str = "departments";

/// Read-only department directory.
#[derive(Debug, Clone)]
pub struct DepartmentService {
    api: ApiClient,
}

impl DepartmentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Vec<Department>> {
        let request = self
            .api
            .request(Method::GET, &[DEPARTMENTS], "Failed to fetch departments");
        let env: Envelope<Vec<Department>> = self.api.send(request).await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn by_slug(&self, slug: &str) -> ClientResult<Department> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ClientError::invalid_field("slug", "Department slug is required"));
        }

        let request = self.api.request(
            Method::GET,
            &[DEPARTMENTS, slug],
            format!("Failed to fetch department '{slug}'"),
        );
        let env: Envelope<Department> = self.api.send(request).await?;
        env.into_data(format!("Department '{slug}' not found"))
    }
}
