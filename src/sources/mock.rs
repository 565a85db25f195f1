//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Work, WorkId, WorkList, WorkStub};
use crate::sources::{SourceError, WorkSource};

/// A mock source that serves predefined works and records every request.
#[derive(Debug, Default)]
pub struct MockSource {
    works: Mutex<HashMap<String, Work>>,
    cited_by: Mutex<HashMap<String, WorkList>>,
    requests: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new, empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `work` for the given identifier.
    pub fn insert_work(&self, id: &str, work: Work) {
        let key = normalize(id);
        self.works.lock().unwrap().insert(key, work);
    }

    /// Serve a cited-by page listing `ids` at `url`.
    pub fn insert_cited_by<I, S>(&self, url: &str, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let page = WorkList {
            results: ids.into_iter().map(|id| WorkStub { id: id.into() }).collect(),
        };
        self.cited_by.lock().unwrap().insert(url.to_string(), page);
    }

    /// Every identifier or URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &str) {
        self.requests.lock().unwrap().push(request.to_string());
    }
}

fn normalize(id: &str) -> String {
    WorkId::parse(id)
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|_| id.to_string())
}

#[async_trait]
impl WorkSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn get_work(&self, id: &WorkId) -> Result<Work, SourceError> {
        self.record(id.as_str());
        self.works
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn get_cited_by(&self, cited_by_url: &str) -> Result<WorkList, SourceError> {
        self.record(cited_by_url);
        self.cited_by
            .lock()
            .unwrap()
            .get(cited_by_url)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(cited_by_url.to_string()))
    }
}

/// Helper function to create a mock journal article for testing.
pub fn make_work(key: &str, title: &str) -> Work {
    crate::models::WorkBuilder::new(format!("https://openalex.org/{}", key))
        .title(title)
        .work_type("journal-article")
        .build()
}
