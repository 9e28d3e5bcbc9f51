use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A query to run against a [`Schema`](crate::Schema).
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub(crate) query: String,
    pub(crate) operation_name: Option<String>,
    pub(crate) variables: serde_json::Map<String, Value>,
    pub(crate) root: Option<crate::Instance>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// The value the root query type resolves its fields against.
    #[must_use]
    pub fn root(mut self, root: crate::Instance) -> Self {
        self.root = Some(root);
        self
    }

    pub(crate) fn into_parts(self) -> (async_graphql::Request, Option<crate::Instance>) {
        let mut request =
            async_graphql::Request::new(self.query).variables(async_graphql::Variables::from_json(self.variables.into()));

        if let Some(name) = self.operation_name {
            request = request.operation_name(name);
        }

        (request, self.root)
    }
}

/// The outcome of an execution: the `data` payload and the errors, empty on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Value,
    pub errors: Vec<QueryError>,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<async_graphql::Response> for QueryResult {
    fn from(response: async_graphql::Response) -> Self {
        Self {
            data: response.data.into_json().unwrap_or_default(),
            errors: response.errors.into_iter().map(QueryError::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl From<async_graphql::ServerError> for QueryError {
    fn from(error: async_graphql::ServerError) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .into_iter()
                .map(|pos| Location {
                    line: pos.line,
                    column: pos.column,
                })
                .collect(),
            path: error
                .path
                .into_iter()
                .map(|segment| match segment {
                    async_graphql::PathSegment::Field(name) => PathSegment::Field(name),
                    async_graphql::PathSegment::Index(index) => PathSegment::Index(index),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}
