//! Shared test support: a scripted, recording gateway double.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use mcp_mealie::client::{MealieApi, MealieError};
use serde_json::Value;

/// One request as the code under test issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Scripted [`MealieApi`] double.
///
/// Responses are queued per `(method, path)` pair and consumed in order,
/// so a path polled repeatedly (pagination, retries) can answer
/// differently each time. Every request is recorded for later assertions.
/// An unscripted request panics, which keeps tests honest about exactly
/// which calls they expect.
#[derive(Default)]
pub struct MockApi {
    routes: Mutex<HashMap<(String, String), VecDeque<Result<Value, MealieError>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &str, path: &str, response: Value) -> &Self {
        self.push(method, path, Ok(response));
        self
    }

    pub fn fail(&self, method: &str, path: &str, status_code: u16, response_body: &str) -> &Self {
        self.push(
            method,
            path,
            Err(MealieError::Api {
                status_code,
                response_body: response_body.to_string(),
            }),
        );
        self
    }

    fn push(&self, method: &str, path: &str, response: Result<Value, MealieError>) {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests issued against a path, across all methods.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn dispatch(
        &self,
        method: &str,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, MealieError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body,
        });

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&(method.to_string(), path.to_string()))
            .unwrap_or_else(|| panic!("unscripted request: {} {}", method, path));
        queue
            .pop_front()
            .unwrap_or_else(|| panic!("response queue exhausted for {} {}", method, path))
    }
}

impl MealieApi for MockApi {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MealieError> {
        self.dispatch("GET", path, query, None)
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.dispatch("POST", path, &[], Some(body))
    }

    async fn put_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.dispatch("PUT", path, &[], Some(body))
    }

    async fn patch_json(&self, path: &str, body: Value) -> Result<Value, MealieError> {
        self.dispatch("PATCH", path, &[], Some(body))
    }

    async fn delete_json(&self, path: &str) -> Result<Value, MealieError> {
        self.dispatch("DELETE", path, &[], None)
    }
}
