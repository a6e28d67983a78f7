/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! In-memory request source and response rendering.

use crate::event_loop::{PendingRequest, RequestSource};
use crate::routes::{AssetStore, Body, Response};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

/// A response rendered to bytes, as a transport would send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// Encoded body.
    pub body: Vec<u8>,
}

impl Response<'_> {
    /// Renders the response body to bytes. The latest sample is encoded as
    /// JSON, the CSV export as text.
    #[must_use]
    pub fn render(&self) -> RenderedResponse {
        let body = match &self.body {
            Body::Empty => Vec::new(),
            Body::Text(text) => text.as_bytes().to_vec(),
            Body::Csv(csv) => csv.to_string().into_bytes(),
            // Serializing a plain struct of integers never fails.
            Body::Json(latest) => serde_json::to_vec(latest).unwrap_or_default(),
            Body::Asset(content) => content.to_vec(),
        };
        RenderedResponse {
            status: self.status,
            content_type: self.content_type,
            body,
        }
    }
}

/// A request from a [`RequestQueue`].
#[derive(Debug)]
pub struct QueuedRequest {
    path: String,
    responses: Rc<RefCell<Vec<RenderedResponse>>>,
}

impl PendingRequest for QueuedRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn respond(self, response: Response<'_>) {
        self.responses.borrow_mut().push(response.render());
    }
}

/// Scripted, non-blocking request source. Requests are answered in order and
/// the rendered responses are collected.
#[derive(Debug, Default)]
pub struct RequestQueue {
    pending: VecDeque<String>,
    responses: Rc<RefCell<Vec<RenderedResponse>>>,
}

impl RequestQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a request for the given path.
    pub fn push(&mut self, path: impl Into<String>) {
        self.pending.push_back(path.into());
    }

    /// Returns the number of requests not served yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns all responses sent so far, in order.
    #[must_use]
    pub fn responses(&self) -> std::cell::Ref<'_, Vec<RenderedResponse>> {
        self.responses.borrow()
    }

    /// Removes and returns all responses sent so far.
    pub fn take_responses(&mut self) -> Vec<RenderedResponse> {
        self.responses.take()
    }
}

impl RequestSource for RequestQueue {
    type Request = QueuedRequest;

    fn poll_request(&mut self) -> Option<Self::Request> {
        self.pending.pop_front().map(|path| QueuedRequest {
            path,
            responses: self.responses.clone(),
        })
    }
}

/// Asset store backed by a map from path to content.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl AssetStore for MemoryAssets {
    fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::LatestExport;
    use assert2::check;

    #[test]
    fn render_bodies() {
        let response = Response {
            status: 200,
            content_type: "application/json",
            body: Body::Json(LatestExport::STOPPED),
        };
        check!(response.render().body == br#"{"status":"stopped"}"#.to_vec());

        let response = Response {
            status: 204,
            content_type: "text/plain",
            body: Body::Empty,
        };
        let rendered = response.render();
        check!(rendered.status == 204);
        check!(rendered.body.is_empty());
    }

    #[test]
    fn queue_collects_responses_in_order() {
        let mut queue = RequestQueue::new();
        queue.push("/a");
        queue.push(String::from("/b"));
        check!(queue.pending() == 2);

        let first = queue.poll_request().unwrap();
        check!(first.path() == "/a");
        first.respond(Response {
            status: 404,
            content_type: "text/plain",
            body: Body::Text("x"),
        });
        let second = queue.poll_request().unwrap();
        second.respond(Response {
            status: 200,
            content_type: "text/plain",
            body: Body::Text("y"),
        });
        check!(queue.poll_request().is_none());

        let responses = queue.take_responses();
        check!(responses.len() == 2);
        check!(responses[0].status == 404);
        check!(responses[1].body == b"y".to_vec());
        check!(queue.responses().is_empty());
    }

    #[test]
    fn memory_assets() {
        let mut assets = MemoryAssets::new();
        assets.insert("/index.html", "<html></html>");
        check!(assets.get("/index.html") == Some(b"<html></html>".as_slice()));
        check!(assets.get("/other.html") == None);
    }
}
