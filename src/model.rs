//! Issue entity and the status allow-list.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked work item.
///
/// Every field defaults when absent or `null` in incoming JSON, and keys are
/// also accepted capitalized (`Title`) or upper-cased (`TITLE`). `status`
/// stays a plain string so that unknown values survive decoding and are
/// rejected by the service layer instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Assigned by the store on creation.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "Id",
        alias = "ID"
    )]
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "Title",
        alias = "TITLE"
    )]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "Description",
        alias = "DESCRIPTION"
    )]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "Status",
        alias = "STATUS"
    )]
    pub status: String,
}

/// Decode `null` as the field's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
impl Issue {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            status: IssueStatus::Open.to_string(),
        }
    }
}

/// Allowed values for [`Issue::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueStatus {
    Open,
    InProgress,
    Done,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [Self::Open, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in IssueStatus::ALL {
            assert_eq!(status.as_str().parse::<IssueStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert!("Open".parse::<IssueStatus>().is_err());
        assert!("in-progress".parse::<IssueStatus>().is_err());
        assert!("".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_issue_decodes_with_missing_fields() {
        let issue: Issue = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(issue.id, 0);
        assert_eq!(issue.title, "T");
        assert_eq!(issue.description, "");
        assert_eq!(issue.status, "");
    }

    #[test]
    fn test_issue_decodes_null_fields_as_empty() {
        let issue: Issue = serde_json::from_str(
            r#"{"id":null,"title":null,"description":null,"status":null}"#,
        )
        .unwrap();
        assert_eq!(issue, Issue::default());
    }

    #[test]
    fn test_issue_decodes_capitalized_keys() {
        let issue: Issue = serde_json::from_str(
            r#"{"ID":3,"Title":"T","Description":"D","STATUS":"done"}"#,
        )
        .unwrap();
        assert_eq!(issue.id, 3);
        assert_eq!(issue.title, "T");
        assert_eq!(issue.description, "D");
        assert_eq!(issue.status, "done");
    }

    #[test]
    fn test_issue_json_shape() {
        let issue = Issue {
            id: 7,
            title: "T".to_string(),
            description: "D".to_string(),
            status: "done".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            serde_json::json!({"id": 7, "title": "T", "description": "D", "status": "done"})
        );
    }
}
