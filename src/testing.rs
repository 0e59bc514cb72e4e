//! Recording in-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::requester::Requester;
use crate::transport::{HttpResponse, Transport};

type Form = Vec<(String, String)>;

/// URL, content type and body of a raw POST.
pub(crate) type RawPost = (String, String, Vec<u8>);

#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<HashMap<String, HttpResponse>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Form)>>,
    raw_posts: Mutex<Vec<RawPost>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requester(self: &Arc<Self>) -> Requester {
        Requester::new(self.clone())
    }

    pub fn with_response(&self, url: &str, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), response);
    }

    pub fn with_json(&self, url: &str, value: serde_json::Value) {
        self.with_body(url, serde_json::to_vec(&value).unwrap());
    }

    pub fn with_body(&self, url: &str, body: Vec<u8>) {
        self.with_response(
            url,
            HttpResponse {
                status: 200,
                location: None,
                body,
            },
        );
    }

    pub fn with_status(&self, url: &str, status: u16) {
        self.with_response(
            url,
            HttpResponse {
                status,
                location: None,
                body: Vec::new(),
            },
        );
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.gets.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.gets.lock().unwrap().len()
            + self.posts.lock().unwrap().len()
            + self.raw_posts.lock().unwrap().len()
    }

    pub fn posts(&self) -> Vec<(String, Form)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn raw_posts(&self) -> Vec<RawPost> {
        self.raw_posts.lock().unwrap().clone()
    }

    fn respond(&self, url: &str) -> HttpResponse {
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(HttpResponse {
                status: 404,
                location: None,
                body: Vec::new(),
            })
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.gets.lock().unwrap().push(url.to_owned());
        Ok(self.respond(url))
    }

    fn post(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_owned(), form.to_vec()));
        Ok(self.respond(url))
    }

    fn post_body(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse> {
        self.raw_posts.lock().unwrap().push((
            url.to_owned(),
            content_type.to_owned(),
            body.to_vec(),
        ));
        Ok(self.respond(url))
    }
}
