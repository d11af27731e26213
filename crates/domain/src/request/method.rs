//! HTTP Method enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods used against the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
}

impl HttpMethod {
    /// Returns the method as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(
            serde_json::to_string(&HttpMethod::Patch).unwrap_or_default(),
            "\"PATCH\""
        );
    }
}
