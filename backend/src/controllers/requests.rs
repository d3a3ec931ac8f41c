//! Request shapes shared by several controllers.

use serde::{Deserialize, Serialize};

use crate::domain::{Error, ListQuery, UserId};

/// Parameters of every `<entity>:list` command.
///
/// Unknown fields are rejected and numbers are never coerced from strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListRequest {
    pub logged_user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<i64>,
}

impl ListRequest {
    /// A first-page request without a filter.
    pub fn first_page(logged_user_id: UserId) -> Self {
        Self {
            logged_user_id,
            name: None,
            page: None,
            items_per_page: None,
        }
    }

    /// Validate the paging and filter parameters.
    pub fn to_query(&self) -> Result<ListQuery, Error> {
        ListQuery::try_new(self.name.as_deref(), self.page, self.items_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn optional_fields_default_to_absent() {
        let request: ListRequest =
            serde_json::from_value(json!({ "loggedUserId": 1 })).expect("decodes");
        assert_eq!(request, ListRequest::first_page(UserId::new(1)));
    }

    #[rstest]
    #[case(json!({ "loggedUserId": "1" }))]
    #[case(json!({ "loggedUserId": 1, "page": "2" }))]
    #[case(json!({ "loggedUserId": 1, "limit": 5 }))]
    #[case(json!({ "page": 1 }))]
    fn strict_decoding(#[case] payload: serde_json::Value) {
        assert!(serde_json::from_value::<ListRequest>(payload).is_err());
    }

    #[rstest]
    fn serializes_without_absent_fields() {
        let value = serde_json::to_value(ListRequest::first_page(UserId::new(4))).expect("encodes");
        assert_eq!(value, json!({ "loggedUserId": 4 }));
    }
}
