//! Paging rules for the read side.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::app::AppError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size bounds applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PageLimits {
    default_size: i64,
    max_size: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Creates bounds, clamping `default_size` into `1..=max_size`.
    pub fn new(default_size: i64, max_size: i64) -> Self {
        let max_size = max_size.max(1);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }

    /// Resolves a requested page against these bounds.
    ///
    /// A missing limit falls back to the default and a large one is capped.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidQuery`] for a limit below 1 or a negative offset.
    #[instrument(skip(self))]
    pub fn resolve(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Page, AppError> {
        let limit = match limit {
            None => self.default_size,
            Some(n) if n < 1 => {
                warn!(limit = n, "Rejected page limit");
                return Err(AppError::InvalidQuery("limit".to_string()));
            }
            Some(n) => n.min(self.max_size),
        };
        let offset = match offset {
            None => 0,
            Some(n) if n < 0 => {
                warn!(offset = n, "Rejected page offset");
                return Err(AppError::InvalidQuery("offset".to_string()));
            }
            Some(n) => n,
        };
        Ok(Page { limit, offset })
    }
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Page {
    limit: i64,
    offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_limit_uses_default() {
        let page = PageLimits::default().resolve(None, None).expect("page");
        assert_eq!(*page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(*page.offset(), 0);
    }

    #[test]
    fn test_large_limit_is_capped() {
        let page = PageLimits::new(5, 20).resolve(Some(500), Some(3)).expect("page");
        assert_eq!(*page.limit(), 20);
        assert_eq!(*page.offset(), 3);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let limits = PageLimits::default();
        assert_eq!(
            limits.resolve(Some(0), None).unwrap_err().slug(),
            "query-params"
        );
        assert!(matches!(
            limits.resolve(None, Some(-1)),
            Err(AppError::InvalidQuery(p)) if p == "offset"
        ));
    }

    #[test]
    fn test_default_is_clamped_to_max() {
        let limits = PageLimits::new(50, 10);
        assert_eq!(*limits.default_size(), 10);
        assert_eq!(*limits.max_size(), 10);
    }
}
