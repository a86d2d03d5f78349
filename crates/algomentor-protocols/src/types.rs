//! Shared data model for the helper runtime.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

/// Trailing numeric suffix of a problem page path, e.g. `/problems/two-sum-1`.
static PROBLEM_ID_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d+)$").expect("problem id pattern"));

/// Identifier of a coding problem, extracted from the page URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract the problem id from a URL path.
    ///
    /// Returns `None` when the path carries no trailing numeric suffix;
    /// chat features are disabled for such pages.
    pub fn from_path(path: &str) -> Option<Self> {
        PROBLEM_ID_SUFFIX
            .captures(path)
            .map(|caps| Self(caps[1].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One turn of a conversation, as persisted per problem.
///
/// Serializes as `{"text", "isUser"}`, the on-disk shape of the history
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// A worked example attached to a problem statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemExample {
    pub input: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Problem metadata captured from the host application's own traffic.
///
/// Every field defaults on decode so partially populated upstream bodies
/// still parse; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemContext {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<ProblemExample>,
    pub constraints: Option<String>,
    pub user_code: Option<String>,
}

/// A completed outgoing request observed by the network tap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficEvent {
    pub url: String,
    pub status: u16,
    /// Raw response body.
    pub response: String,
}

/// Credential change broadcast by the settings surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SettingsNotice {
    #[serde(rename = "API_KEY_UPDATED")]
    ApiKeyUpdated { value: String },
    #[serde(rename = "API_KEY_REMOVED")]
    ApiKeyRemoved,
}

/// Visibility of the helper widget on the current page.
///
/// Exactly one of the button or the chat panel is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Nothing mounted (non-qualifying page or missing container).
    Hidden,
    /// Entry-point button mounted.
    ButtonVisible,
    /// Chat panel open.
    ChatOpen,
}
