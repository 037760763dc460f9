//! Topic page routes: `/topics/{category}` and `/topics/{category}/{subcategory}`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RouteError;

const ROUTE_PREFIX: &str = "topics";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRoute {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl TopicRoute {
    /// Parse a route path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let bare = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let mut segments = bare.split('/').filter(|s| !s.is_empty());

        if segments.next() != Some(ROUTE_PREFIX) {
            return Err(RouteError::NotTopicRoute(path.to_string()));
        }
        let category = segments.next().map(str::to_string);
        let subcategory = segments.next().map(str::to_string);
        if segments.next().is_some() {
            return Err(RouteError::TooManySegments(path.to_string()));
        }

        Ok(Self {
            category,
            subcategory,
        })
    }

    /// Route for a single catalog key.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            category: Some(key.into()),
            subcategory: None,
        }
    }

    /// Catalog key this route selects: the subcategory if present, else the category.
    pub fn key(&self) -> Option<&str> {
        self.subcategory.as_deref().or(self.category.as_deref())
    }
}

impl fmt::Display for TopicRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{ROUTE_PREFIX}")?;
        if let Some(category) = &self.category {
            write!(f, "/{category}")?;
        }
        if let Some(subcategory) = &self.subcategory {
            write!(f, "/{subcategory}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_and_subcategory() {
        let route = TopicRoute::parse("/topics/databases/sql").unwrap();
        assert_eq!(route.category.as_deref(), Some("databases"));
        assert_eq!(route.key(), Some("sql"));
        assert_eq!(route.to_string(), "/topics/databases/sql");
    }

    #[test]
    fn test_parse_ignores_query_and_trailing_slash() {
        let route = TopicRoute::parse("/topics/react/?q=hooks").unwrap();
        assert_eq!(route.key(), Some("react"));
        assert!(route.subcategory.is_none());
    }

    #[test]
    fn test_bare_prefix_has_no_key() {
        let route = TopicRoute::parse("/topics").unwrap();
        assert_eq!(route.key(), None);
    }

    #[test]
    fn test_rejects_other_routes() {
        assert_eq!(
            TopicRoute::parse("/blogs"),
            Err(RouteError::NotTopicRoute("/blogs".to_string()))
        );
        assert!(matches!(
            TopicRoute::parse("/topics/a/b/c"),
            Err(RouteError::TooManySegments(_))
        ));
    }
}
