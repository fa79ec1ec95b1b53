//! Routing query boundary
//!
//! Validates the `start`/`end` parameters a web layer receives and shapes
//! the answer into the payloads it returns. A missing parameter is a client
//! error; a query that cannot be routed is a normal "not found" answer.

use serde::Serialize;

use crate::core::{NavError, Route};

/// A validated routing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub start: String,
    pub end: String,
}

impl RouteQuery {
    /// Build a query from raw, possibly absent, parameters
    ///
    /// Absent or blank parameters are rejected. Present values are kept
    /// exactly as given, since waypoint ids are compared without
    /// normalization.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Self, NavError> {
        match (non_blank(start), non_blank(end)) {
            (Some(start), Some(end)) => Ok(Self {
                start: start.to_string(),
                end: end.to_string(),
            }),
            _ => Err(NavError::invalid_input(RouteResponse::MISSING_PARAMS)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Answer to a routing query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteResponse {
    Found(Route),
    NotFound(ErrorPayload),
    BadRequest(ErrorPayload),
}

impl RouteResponse {
    pub const MISSING_PARAMS: &'static str = "Missing start or end parameters";
    pub const NO_PATH: &'static str = "No path found";

    /// Wrap a routing outcome
    pub fn from_route(route: Option<Route>) -> Self {
        match route {
            Some(route) => Self::Found(route),
            None => Self::not_found(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound(ErrorPayload {
            error: Self::NO_PATH.to_string(),
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(ErrorPayload {
            error: message.into(),
        })
    }

    /// HTTP status code a web layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Found(_) => 200,
            Self::NotFound(_) => 404,
            Self::BadRequest(_) => 400,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeRecord;
    use serde_json::json;

    #[test]
    fn test_from_params() {
        let query = RouteQuery::from_params(Some("main_gate"), Some("library")).unwrap();
        assert_eq!(query.start, "main_gate");
        assert_eq!(query.end, "library");
    }

    #[test]
    fn test_missing_or_blank_params_are_client_errors() {
        for (start, end) in [
            (None, Some("library")),
            (Some("main_gate"), None),
            (None, None),
            (Some(""), Some("library")),
            (Some("main_gate"), Some("   ")),
        ] {
            let err = RouteQuery::from_params(start, end).unwrap_err();
            assert!(err.is_client_error());
            assert!(err.to_string().contains(RouteResponse::MISSING_PARAMS));
        }
    }

    #[test]
    fn test_params_are_not_normalized() {
        let query = RouteQuery::from_params(Some(" Library"), Some("gate")).unwrap();
        assert_eq!(query.start, " Library");
    }

    #[test]
    fn test_found_payload_shape() {
        let response = RouteResponse::from_route(Some(Route {
            path: vec!["main_gate".into(), "library".into()],
            distance: 120.0,
            nodes: vec![
                NodeRecord::new(json!({ "name": "Main Gate" })),
                NodeRecord::new(json!({ "name": "Library" })),
            ],
        }));
        assert_eq!(response.status_code(), 200);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "path": ["main_gate", "library"],
                "distance": 120.0,
                "nodes": [{ "name": "Main Gate" }, { "name": "Library" }]
            })
        );
    }

    #[test]
    fn test_error_payload_shapes() {
        let not_found = RouteResponse::from_route(None);
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(
            serde_json::to_value(&not_found).unwrap(),
            json!({ "error": "No path found" })
        );

        let bad = RouteResponse::bad_request(RouteResponse::MISSING_PARAMS);
        assert_eq!(bad.status_code(), 400);
        assert!(!bad.is_found());
        assert_eq!(
            serde_json::to_value(&bad).unwrap(),
            json!({ "error": "Missing start or end parameters" })
        );
    }
}
