//! Search API: query parameters and response shape of `GET /search`.

use serde::{Deserialize, Serialize};

use crate::entity::{Person, Role, Work, WorkType};

/// Which entity kind the text search is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Work,
    Person,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Person => "Person",
        }
    }

    /// Case-insensitive parse. Unknown or empty input yields `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        [Category::Work, Category::Person]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Raw query string of `GET /search`.
///
/// Every field is optional text so that malformed input never fails
/// extraction; [`SearchParams::into_query`] maps anything unrecognised to
/// "no constraint".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> SearchQuery {
        SearchQuery {
            category: self
                .category
                .as_deref()
                .and_then(Category::parse_lenient)
                .unwrap_or_default(),
            search: self.search.unwrap_or_default().trim().to_string(),
            work_type: self.work_type.as_deref().and_then(WorkType::parse_lenient),
            role: self.role.as_deref().and_then(Role::parse_lenient),
        }
    }
}

/// Typed filter criteria
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub category: Category,
    /// Case-insensitive substring; empty matches everything
    pub search: String,
    pub work_type: Option<WorkType>,
    pub role: Option<Role>,
}

impl SearchQuery {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Builder: set search text
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Builder: constrain work type
    pub fn with_work_type(mut self, work_type: WorkType) -> Self {
        self.work_type = Some(work_type);
        self
    }

    /// Builder: constrain role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Query string pairs in wire form; absent constraints are sent as ""
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("category", self.category.as_str().to_string()),
            ("search", self.search.clone()),
            (
                "type",
                self.work_type
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
            ),
            (
                "role",
                self.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            ),
        ]
    }
}

/// Response of `GET /search`: the entity snapshot the graph is built from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub works: Vec<Work>,
}

impl SearchResponse {
    pub fn new(persons: Vec<Person>, works: Vec<Work>) -> Self {
        Self { persons, works }
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.works.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_malformed_params_default_to_no_constraint() {
        let params = SearchParams {
            category: Some("Galaxy".into()),
            search: None,
            work_type: Some("Music".into()),
            role: Some("".into()),
        };
        assert_eq!(params.into_query(), SearchQuery::default());
    }

    #[test]
    fn test_params_parse_case_insensitively() {
        let params = SearchParams {
            category: Some("person".into()),
            search: Some("  dal ".into()),
            work_type: Some("painting".into()),
            role: Some("PAINTER".into()),
        };
        let query = params.into_query();
        assert_eq!(query.category, Category::Person);
        assert_eq!(query.search, "dal");
        assert_eq!(query.work_type, Some(WorkType::Painting));
        assert_eq!(query.role, Some(Role::Painter));
    }

    #[test]
    fn test_pairs_send_empty_for_absent_constraints() {
        let pairs = SearchQuery::new(Category::Work).with_search("night").to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("category", "Work".to_string()),
                ("search", "night".to_string()),
                ("type", String::new()),
                ("role", String::new()),
            ]
        );
    }

    #[test]
    fn test_response_missing_collections() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_empty());
    }
}
