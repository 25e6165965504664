//! In-process fake GRC server for discovery tests.
//!
//! Binds `tiny_http` to `127.0.0.1:0`, answers canned bodies by path, and
//! records every request so tests can assert on call counts and headers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use grc_config::DiscoveryConfig;
use grc_core::entities::ConnectionDescriptor;
use grc_discovery::{SchemaCache, SchemaDiscovery};

pub const SESSION_TOKEN: &str = "tok-123";
pub const TENANT: &str = "acme";

/// Canned response for one path.
#[derive(Clone)]
pub struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

impl Route {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query as sent.
    pub url: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

pub struct FakeGrc {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: Arc<tiny_http::Server>,
    handle: Option<JoinHandle<()>>,
}

impl FakeGrc {
    /// Serve `routes` (exact path, query ignored). Unknown paths get 404.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        // one thread per request so a delayed route does not stall the others
        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    std::thread::spawn(move || respond(request, &routes, &requests));
                }
            })
        };

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
            server,
            handle: Some(handle),
        }
    }

    pub fn connection(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(&self.base_url, SESSION_TOKEN, "50000")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl Drop for FakeGrc {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(
    request: tiny_http::Request,
    routes: &HashMap<String, Route>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let header = |name: &str| {
        request
            .headers()
            .iter()
            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str().to_string())
    };
    requests.lock().unwrap().push(RecordedRequest {
        url: request.url().to_string(),
        authorization: header("Authorization"),
        accept: header("Accept"),
    });

    let path = request.url().split('?').next().unwrap_or_default();
    let route = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| Route::status(404, r#"{"error":"not found"}"#));
    if !route.delay.is_zero() {
        std::thread::sleep(route.delay);
    }
    let response = tiny_http::Response::from_string(route.body)
        .with_status_code(route.status)
        .with_header(tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap());
    let _ = request.respond(response);
}

/// A discovery client with its own cache and default settings.
pub fn discovery() -> SchemaDiscovery {
    discovery_with(&DiscoveryConfig::default())
}

pub fn discovery_with(config: &DiscoveryConfig) -> SchemaDiscovery {
    SchemaDiscovery::new(config, Arc::new(SchemaCache::default())).unwrap()
}

pub const RISK_RECORD: &str = r#"{
    "@odata.context": "http://grc.example.com/contentapi/$metadata#Risk_Register",
    "value": [
        {
            "@odata.etag": "W/\"1\"",
            "Title": "Vendor outage",
            "Score": 7,
            "Owner": {"Id": 5, "Name": "A"},
            "DueDate": "2024-01-15",
            "Notes": null
        }
    ]
}"#;

pub const METADATA: &str = r#"{
    "value": [
        {
            "applicationId": 12,
            "applicationName": "Risk Register",
            "retrievalPath": "Risk_Register",
            "fields": [
                {"name": "Title", "type": "string", "fieldId": 101, "maxLength": 255},
                {"name": "Score", "type": "number", "fieldId": 102},
                {"name": "Owner", "type": "reference", "fieldId": 103}
            ]
        },
        {
            "applicationId": 13,
            "applicationName": "Controls",
            "retrievalPath": "Controls_Library",
            "fields": [
                {"name": "Control", "type": "string"},
                {"name": "Tested", "type": "boolean"}
            ]
        }
    ]
}"#;
