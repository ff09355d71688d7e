//! Scripted `ComponentSource` for unit tests

use crate::client::ComponentSource;
use crate::component::{Component, Page};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

pub(crate) const BASE: &str = "http://nexus/service/rest/v1/components";

/// Build a page from `(id, size, path)` triples
pub(crate) fn page(items: &[(&str, u64, &str)], token: Option<&str>) -> Page {
    Page {
        records: items
            .iter()
            .map(|(id, size, path)| Component::new(*id, *size, *path))
            .collect(),
        next_token: token.map(str::to_string),
    }
}

/// Replays canned pages in order and records every call
pub(crate) struct ScriptedSource {
    pages: Mutex<VecDeque<Result<Page>>>,
    fetched: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    failing_deletes: HashSet<String>,
}

impl ScriptedSource {
    pub(crate) fn new(pages: Vec<Result<Page>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            fetched: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            failing_deletes: HashSet::new(),
        }
    }

    /// Make DELETE calls for these ids fail
    pub(crate) fn failing_deletes(mut self, ids: &[&str]) -> Self {
        self.failing_deletes = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub(crate) fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Every DELETE attempted, including failed ones
    pub(crate) fn delete_calls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComponentSource for ScriptedSource {
    fn listing_url(&self, repository: &str) -> String {
        format!("{}?repository={}", BASE, repository)
    }

    fn component_url(&self, id: &str) -> String {
        format!("{}/{}", BASE, id)
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::fetch(url, "no more scripted pages")))
    }

    async fn delete_component(&self, id: &str) -> Result<()> {
        let url = self.component_url(id);
        self.deleted.lock().unwrap().push(url.clone());

        if self.failing_deletes.contains(id) {
            Err(Error::delete(id, url, "HTTP 500"))
        } else {
            Ok(())
        }
    }
}
