use serde::{Deserialize, Serialize};
use tabgate_core::{GateError, Result};

pub const DEFAULT_BOOKMARK_LIMIT: usize = 10;
pub const DEFAULT_BOOKMARKS_FOLDER: &str = "Bookmarks Bar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// How far a slow event subscriber may lag before missing events.
    pub event_capacity: usize,
    /// Substituted when a caller passes no limit, or a limit of 0.
    pub default_bookmark_limit: usize,
    pub bookmarks_folder: String,
}

impl FacadeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(GateError::InvalidArgument(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        if self.default_bookmark_limit == 0 {
            return Err(GateError::InvalidArgument(
                "default_bookmark_limit must be at least 1".to_string(),
            ));
        }
        if self.bookmarks_folder.trim().is_empty() {
            return Err(GateError::InvalidArgument(
                "bookmarks_folder must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            default_bookmark_limit: DEFAULT_BOOKMARK_LIMIT,
            bookmarks_folder: DEFAULT_BOOKMARKS_FOLDER.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FacadeConfig = serde_json::from_str(r#"{"event_capacity": 8}"#).unwrap();
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.default_bookmark_limit, 10);
        assert_eq!(config.bookmarks_folder, "Bookmarks Bar");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = FacadeConfig {
            default_bookmark_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GateError::InvalidArgument(_))));
    }
}
