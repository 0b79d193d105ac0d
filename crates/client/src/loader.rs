//! Department-then-records loading for a folder view, with stale results
//! dropped when a newer load has started.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use resourcehub_core::{ClientResult, Department, ResourceKind};

use crate::departments::DepartmentService;
use crate::resources::{ListOptions, ResourcePage, ResourceService};
use crate::transport::ApiClient;

/// A folder's contents: the department, the kind, and one page of records.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderPage {
    pub department: Department,
    pub kind: ResourceKind,
    pub page: ResourcePage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(FolderPage),
    /// A later `load` (or `cancel`) happened while this one was in flight.
    Superseded,
}

impl LoadOutcome {
    pub fn into_page(self) -> Option<FolderPage> {
        match self {
            LoadOutcome::Loaded(page) => Some(page),
            LoadOutcome::Superseded => None,
        }
    }
}

/// Clones share the generation counter, so a load started from any clone
/// supersedes loads started from the others.
#[derive(Debug, Clone)]
pub struct FolderLoader {
    departments: DepartmentService,
    api: ApiClient,
    generation: Arc<AtomicU64>,
}

impl FolderLoader {
    pub fn new(api: ApiClient) -> Self {
        Self {
            departments: DepartmentService::new(api.clone()),
            api,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate whatever load is in flight.
    pub fn cancel(&self) {
        self.begin();
    }

    /// Resolve `slug` to a department, then list its `kind` records.
    ///
    /// The record fetch is only issued once the department id is known.
    /// Errors from a superseded load are dropped as well.
    pub async fn load(
        &self,
        slug: &str,
        kind: ResourceKind,
        options: ListOptions,
    ) -> ClientResult<LoadOutcome> {
        let ticket = self.begin();

        let department = match self.departments.by_slug(slug).await {
            Ok(department) => department,
            Err(_) if !self.is_current(ticket) => return Ok(self.superseded(ticket, slug)),
            Err(err) => return Err(err),
        };
        if !self.is_current(ticket) {
            return Ok(self.superseded(ticket, slug));
        }

        let page = match ResourceService::new(kind, self.api.clone())
            .list_by_department(&department.id, options)
            .await
        {
            Ok(page) => page,
            Err(_) if !self.is_current(ticket) => return Ok(self.superseded(ticket, slug)),
            Err(err) => return Err(err),
        };
        if !self.is_current(ticket) {
            return Ok(self.superseded(ticket, slug));
        }

        Ok(LoadOutcome::Loaded(FolderPage {
            department,
            kind,
            page,
        }))
    }

    fn superseded(&self, ticket: u64, slug: &str) -> LoadOutcome {
        tracing::debug!(ticket, slug, "folder load superseded");
        LoadOutcome::Superseded
    }
}
