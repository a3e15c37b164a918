//! Minimal REST client for the GitHub API
//!
//! Requests are described by a path template with `:name` placeholders and a
//! JSON object of parameters. Placeholders are substituted from the
//! parameters; whatever is left over becomes the query string (GET/DELETE)
//! or the JSON body (PUT/POST/PATCH).

use crate::error::{Error, Result};
use crate::types::Page;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Default media type for API requests
pub const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

/// Preview media type needed by the squash merge endpoint on older deployments
pub const POLARIS_PREVIEW_ACCEPT: &str = "application/vnd.github.polaris-preview+json";

/// Connection settings for [`RestClient`]
#[derive(Debug, Clone)]
pub struct RestClientOptions {
    /// API root, e.g. `https://api.github.com`
    pub base_url: String,
    /// Token sent as a bearer credential
    pub token: String,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

/// Authenticated REST client with path-template expansion and pagination
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    token: String,
    accept: String,
}

impl RestClient {
    /// Create a new client
    pub fn new(options: &RestClientOptions) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("repo-bots/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token: options.token.clone(),
            accept: DEFAULT_ACCEPT.to_string(),
        })
    }

    /// Clone of this client that negotiates an alternate media type
    #[must_use]
    pub fn with_accept(&self, accept: &str) -> Self {
        Self {
            accept: accept.to_string(),
            ..self.clone()
        }
    }

    /// Media type sent in the `Accept` header
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// GET a resource
    pub async fn get<T: DeserializeOwned>(&self, template: &str, params: &Value) -> Result<T> {
        let response = self.send(Method::GET, template, params).await?;
        Ok(response.json().await?)
    }

    /// GET one page of a listing, keeping the `rel="next"` cursor
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        template: &str,
        params: &Value,
    ) -> Result<Page<T>> {
        let response = self.send(Method::GET, template, params).await?;
        let next = next_page_url(response.headers());
        let items = response.json().await?;
        Ok(Page { items, next })
    }

    /// GET every page of a listing
    pub async fn get_all<T: DeserializeOwned>(&self, template: &str, params: &Value) -> Result<Vec<T>> {
        let mut page: Page<T> = self.get_page(template, params).await?;
        let mut items = std::mem::take(&mut page.items);
        while let Some(next) = page.next.take() {
            page = self.get_page(&next, &Value::Null).await?;
            items.append(&mut page.items);
        }
        Ok(items)
    }

    /// PUT a resource
    pub async fn put<T: DeserializeOwned>(&self, template: &str, params: &Value) -> Result<T> {
        let response = self.send(Method::PUT, template, params).await?;
        Ok(response.json().await?)
    }

    /// POST a resource
    pub async fn post<T: DeserializeOwned>(&self, template: &str, params: &Value) -> Result<T> {
        let response = self.send(Method::POST, template, params).await?;
        Ok(response.json().await?)
    }

    /// PATCH a resource
    pub async fn patch<T: DeserializeOwned>(&self, template: &str, params: &Value) -> Result<T> {
        let response = self.send(Method::PATCH, template, params).await?;
        Ok(response.json().await?)
    }

    /// DELETE a resource (response body is ignored)
    pub async fn delete(&self, template: &str, params: &Value) -> Result<()> {
        self.send(Method::DELETE, template, params).await?;
        Ok(())
    }

    async fn send(&self, method: Method, template: &str, params: &Value) -> Result<Response> {
        let (path, rest) = expand_path(template, params)?;
        let url = if is_absolute(&path) {
            path
        } else {
            format!("{}{path}", self.base_url)
        };

        debug!(%method, %url, "GitHub request");
        let request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, &self.accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        let request = attach_params(request, &method, rest);

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        debug!(%status, %url, "GitHub request failed");
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 404 {
            return Err(Error::NotFound(url));
        }
        Err(Error::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

fn attach_params(request: RequestBuilder, method: &Method, rest: Map<String, Value>) -> RequestBuilder {
    if rest.is_empty() {
        return request;
    }
    if *method == Method::GET || *method == Method::DELETE {
        let query: Vec<(String, String)> = rest
            .into_iter()
            .map(|(key, value)| (key, param_to_string(&value)))
            .collect();
        request.query(&query)
    } else {
        request.json(&Value::Object(rest))
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("https://") || path.starts_with("http://")
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute `:name` placeholders in `template` from `params`
///
/// Returns the expanded path and the parameters that were not consumed.
/// Substituted values are percent-encoded per path segment, so `/` inside a
/// value (file paths, `heads/<branch>` refs) is kept as a separator.
pub fn expand_path(template: &str, params: &Value) -> Result<(String, Map<String, Value>)> {
    let mut rest = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(Error::Internal(format!(
                "request parameters must be an object, got {other}"
            )));
        }
    };

    if is_absolute(template) {
        return Ok((template.to_string(), rest));
    }

    let mut path = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch != ':' {
            path.push(ch);
            continue;
        }
        let start = index + 1;
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let name = &template[start..end];
        if name.is_empty() {
            path.push(':');
            continue;
        }
        let value = rest.remove(name).ok_or_else(|| {
            Error::Internal(format!("missing path parameter :{name} for {template}"))
        })?;
        path.push_str(&encode_segments(&param_to_string(&value)));
    }

    Ok((path, rest))
}

fn encode_segments(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extract the `rel="next"` target from a `Link` header
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link)
}

/// Parse a `Link` header value and return the `rel="next"` URL
pub fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(ToString::to_string)
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or_else(|| body.to_string())
}
