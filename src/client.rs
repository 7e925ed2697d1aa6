use std::error::Error as StdError;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiKey;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.snusbase.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SEARCH_PATH: &str = "/data/search";
const STATS_PATH: &str = "/data/stats";
const IP_WHOIS_PATH: &str = "/tools/ip-whois";
const HASH_LOOKUP_PATH: &str = "/tools/hash-lookup";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("snusbase-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Body shared by the search and hash lookup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupRequest {
    pub terms: Vec<String>,
    pub types: Vec<String>,
    pub wildcard: bool,
    pub group_by: String,
    #[serde(skip_serializing_if = "is_unscoped")]
    pub tables: Option<Vec<String>>,
}

fn is_unscoped(tables: &Option<Vec<String>>) -> bool {
    tables.as_ref().map_or(true, Vec::is_empty)
}

impl LookupRequest {
    pub fn new(terms: Vec<String>, types: Vec<String>) -> Self {
        Self {
            terms,
            types,
            wildcard: false,
            group_by: "db".to_string(),
            tables: None,
        }
    }

    pub fn wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = group_by.into();
        self
    }

    pub fn tables(mut self, tables: Option<Vec<String>>) -> Self {
        self.tables = tables;
        self
    }
}

#[derive(Serialize)]
struct WhoisRequest<'a> {
    terms: &'a [String],
}

/// Outcome of a single API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Parsed response body, as sent by the service.
    Success(Value),
    /// Local transport failure.
    Failure(String),
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Response::Success(value) => Some(value),
            Response::Failure(_) => None,
        }
    }

    /// The `error` field the service embedded in an otherwise successful body.
    pub fn remote_error(&self) -> Option<&Value> {
        self.payload().and_then(|body| body.get("error"))
    }
}

pub struct SnusbaseClient {
    client: Client,
    base_url: String,
}

impl SnusbaseClient {
    pub fn new(api_key: ApiKey, options: ClientOptions) -> Result<Self> {
        let mut auth = HeaderValue::from_str(api_key.as_str()).map_err(|_| Error::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("auth"), auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search(&self, request: &LookupRequest) -> Response {
        self.send(self.client.post(self.url(SEARCH_PATH)).json(request))
    }

    /// Hash or password lookup. Type tags other than `hash` and `password`
    /// are left for the service to reject.
    pub fn hash_lookup(&self, request: &LookupRequest) -> Response {
        self.send(self.client.post(self.url(HASH_LOOKUP_PATH)).json(request))
    }

    pub fn ip_whois(&self, ips: &[String]) -> Response {
        self.send(
            self.client
                .post(self.url(IP_WHOIS_PATH))
                .json(&WhoisRequest { terms: ips }),
        )
    }

    pub fn stats(&self) -> Response {
        self.send(self.client.get(self.url(STATS_PATH)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Response {
        match execute(request) {
            Ok(body) => Response::Success(body),
            Err(e) => Response::Failure(describe(&e)),
        }
    }
}

fn execute(request: RequestBuilder) -> reqwest::Result<Value> {
    request.send()?.error_for_status()?.json()
}

/// Flattens an error and its sources into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
