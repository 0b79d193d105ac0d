//! Response envelope shared by every backend endpoint.
//!
//! `{ success, data | message, count?, pagination? }`

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

fn default_true() -> bool {
    true
}

/// Page metadata returned by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub pages: u32,
}

impl Pagination {
    /// Metadata for `page` (1-based) of `total` items split into pages of `limit`.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Generic backend envelope.
///
/// A missing `success` flag is read as success; only an explicit `false`
/// marks a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    /// Backend-supplied failure text, or `fallback` when none was sent.
    pub fn failure_message(&self, fallback: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Unwrap `data`, reporting an absent payload as `NotFound`.
    pub fn into_data(self, missing: impl Into<String>) -> ClientResult<T> {
        self.data.ok_or_else(|| ClientError::not_found(missing))
    }
}
