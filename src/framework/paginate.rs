//! Bounds-checked window selection over an ordered sequence.
//!
//! Limits are validated once, when a [`Window`] is built from request values. The
//! [`paginate`] function itself trusts its input and never clamps.

use crate::framework::error::ApiError;
use crate::framework::record::RecordId;
use serde::{Deserialize, Serialize};

/// Listing bounds and defaults, threaded explicitly into every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub min_limit: u32,
    pub max_limit: u32,
    pub default_limit: u32,
    pub default_page: u32,
    pub default_since_id: RecordId,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            min_limit: 1,
            max_limit: 250,
            default_limit: 50,
            default_page: 1,
            default_since_id: 0,
        }
    }
}

impl PaginationConfig {
    /// Check that the defaults sit inside the bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_limit < 1 {
            return Err("min_limit must be at least 1".into());
        }
        if self.min_limit > self.max_limit {
            return Err(format!(
                "min_limit ({}) exceeds max_limit ({})",
                self.min_limit, self.max_limit
            ));
        }
        if !(self.min_limit..=self.max_limit).contains(&self.default_limit) {
            return Err(format!(
                "default_limit ({}) outside [{}, {}]",
                self.default_limit, self.min_limit, self.max_limit
            ));
        }
        if self.default_page < 1 {
            return Err("default_page must be at least 1".into());
        }
        Ok(())
    }
}

/// A validated `(limit, page)` pair. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    limit: u32,
    page: u32,
}

impl Window {
    /// Validate raw request values, falling back to the configured defaults.
    ///
    /// # Errors
    /// `limit` outside `[min_limit, max_limit]`, a `limit` of 0, or a `page` below 1 is a
    /// validation error on that field.
    pub fn new(
        limit: Option<i64>,
        page: Option<i64>,
        config: &PaginationConfig,
    ) -> Result<Self, ApiError> {
        let limit = limit.unwrap_or(i64::from(config.default_limit));
        let page = page.unwrap_or(i64::from(config.default_page));

        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| *l >= 1 && (config.min_limit..=config.max_limit).contains(l))
            .ok_or_else(|| ApiError::validation("limit", "invalid limit parameter"))?;
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| ApiError::validation("page", "invalid page parameter"))?;

        Ok(Self { limit, page })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1).saturating_mul(self.limit as usize)
    }
}

/// Items at `offset()`, at most `limit()` of them. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, window: Window) -> Vec<T> {
    items
        .into_iter()
        .skip(window.offset())
        .take(window.limit as usize)
        .collect()
}
