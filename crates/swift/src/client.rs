//! Swift client implementation
//!
//! Talks to the Swift object API over reqwest and implements the
//! ObjectConnection trait from swo-core.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderMap, LAST_MODIFIED};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use swo_core::{
    Endpoint, Error, ObjectConnection, ObjectHeaders, ObjectInfo, ObjectStream, ObjectWriter,
    Profile, Result,
};
use tracing::debug;

use crate::auth;
use crate::writer::SwiftWriter;

/// Largest page the Swift container listing returns
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

const AUTH_TOKEN: &str = "X-Auth-Token";
const COPY_FROM: &str = "X-Copy-From";
const DIRECTORY_TYPE: &str = "application/directory";

/// Authenticated connection to one Swift account
pub struct SwiftConnection {
    http: Client,
    endpoint: Endpoint,
    page_size: usize,
}

impl SwiftConnection {
    /// Authenticate with a profile and open a connection
    pub async fn connect(profile: &Profile) -> Result<Self> {
        profile.validate()?;
        let http = auth::http_client(profile)?;
        let endpoint = auth::authenticate(&http, profile).await?;
        debug!(storage_url = %endpoint.storage_url, "Connected");
        Ok(Self::with_endpoint(http, endpoint))
    }

    /// Use an already authenticated endpoint
    pub fn with_endpoint(http: Client, endpoint: Endpoint) -> Self {
        Self {
            http,
            endpoint,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the number of names requested per listing page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_TOKEN, &self.endpoint.auth_token)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request for {what} failed: {e}")))?;
        check_status(response, what).await
    }
}

/// Map a non-2xx response onto the error taxonomy
pub(crate) async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status(status, what, body.trim()))
}

fn map_status(status: StatusCode, what: &str, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("Access to {what} denied (HTTP {status})"))
        }
        StatusCode::NOT_FOUND => Error::NotFound(what.to_string()),
        StatusCode::UNPROCESSABLE_ENTITY => {
            Error::Transport(format!("HTTP {status}: checksum mismatch for {what}"))
        }
        _ if body.is_empty() => Error::Transport(format!("HTTP {status}")),
        _ => Error::Transport(format!("HTTP {status}: {body}")),
    }
}

/// Turn a HEAD response into object info and canonical headers
fn parse_object_info(object: &str, headers: &HeaderMap) -> (ObjectInfo, ObjectHeaders) {
    let get = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let mut info = ObjectInfo::file(object, get(CONTENT_LENGTH).parse().unwrap_or(0));
    info.content_type = get(CONTENT_TYPE);
    info.last_modified = get(LAST_MODIFIED);
    info.hash = get(ETAG).trim_matches('"').to_string();
    info.pseudo_directory = info.content_type == DIRECTORY_TYPE;

    let all = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((canonical_header(name.as_str()), value.to_string()))
        })
        .collect();

    (info, all)
}

/// `x-object-meta-owner` becomes `X-Object-Meta-Owner`
fn canonical_header(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Value of `X-Copy-From`: `/container/object`, percent-encoded like the object URL
fn copy_source(container: &str, object: &str) -> Result<String> {
    let base = Endpoint {
        storage_url: "http://copy.invalid/".into(),
        auth_token: String::new(),
    };
    Ok(base.object_url(container, object)?.path().to_string())
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    subdir: Option<String>,
}

#[async_trait]
impl ObjectConnection for SwiftConnection {
    async fn object_info(
        &self,
        container: &str,
        object: &str,
    ) -> Result<(ObjectInfo, ObjectHeaders)> {
        let url = self.endpoint.object_url(container, object)?;
        let what = format!("{container}/{object}");
        let response = self.send(self.http.head(url), &what).await?;
        Ok(parse_object_info(object, response.headers()))
    }

    async fn object_names_all(&self, container: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut url = self.endpoint.container_url(container)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("format", "json")
                    .append_pair("limit", &self.page_size.to_string());
                if let Some(marker) = &marker {
                    query.append_pair("marker", marker);
                }
            }

            let response = self.send(self.http.get(url), container).await?;
            let body = response
                .bytes()
                .await
                .map_err(|e| Error::Transport(format!("Failed to read listing: {e}")))?;
            let page: Vec<ListingEntry> = if body.is_empty() {
                Vec::new()
            } else {
                serde_json::from_slice(&body)?
            };

            let count = page.len();
            names.extend(page.into_iter().map(|e| e.subdir.unwrap_or(e.name)));
            debug!(container, page = count, total = names.len(), "Listed page");

            if count < self.page_size {
                break;
            }
            marker = names.last().cloned();
        }

        Ok(names)
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        hash: Option<String>,
        content_type: Option<String>,
    ) -> Result<Box<dyn ObjectWriter>> {
        let url = self.endpoint.object_url(container, object)?;
        let mut request = self.authed(self.http.put(url));
        if let Some(hash) = hash {
            request = request.header(ETAG, hash);
        }
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        Ok(Box::new(SwiftWriter::start(
            request,
            format!("{container}/{object}"),
        )))
    }

    async fn copy_object(
        &self,
        src_container: &str,
        src_object: &str,
        dst_container: &str,
        dst_object: &str,
    ) -> Result<()> {
        let url = self.endpoint.object_url(dst_container, dst_object)?;
        let request = self
            .http
            .put(url)
            .header(COPY_FROM, copy_source(src_container, src_object)?)
            .header(CONTENT_LENGTH, "0");
        self.send(request, &format!("{src_container}/{src_object}"))
            .await?;
        Ok(())
    }

    async fn get_object(&self, container: &str, object: &str) -> Result<ObjectStream> {
        let url = self.endpoint.object_url(container, object)?;
        let response = self
            .send(self.http.get(url), &format!("{container}/{object}"))
            .await?;
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::Transport(format!("Failed to read object: {e}"))));
        Ok(stream.boxed())
    }

    async fn delete_object(&self, container: &str, object: &str) -> Result<()> {
        let url = self.endpoint.object_url(container, object)?;
        self.send(self.http.delete(url), &format!("{container}/{object}"))
            .await?;
        Ok(())
    }

    fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }

    fn http_client(&self) -> Client {
        self.http.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::{Request, State};
    use axum::http::{Method, StatusCode as MockStatus};
    use axum::response::Response as MockResponse;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use swo_core::{DeleteRequest, NoStatus, TimeoutConfig};

    const TOKEN: &str = "AUTH_tk";
    const LAST_MODIFIED_AT: &str = "Tue, 22 Nov 2016 18:10:59 GMT";

    #[derive(Clone, Default)]
    struct StoredObject {
        data: Vec<u8>,
        content_type: String,
    }

    /// Minimal in-memory Swift account
    #[derive(Clone, Default)]
    struct MockSwift {
        storage_url: String,
        containers: Arc<Mutex<BTreeMap<String, BTreeMap<String, StoredObject>>>>,
    }

    fn reply(status: MockStatus) -> MockResponse {
        MockResponse::builder()
            .status(status)
            .body(Body::empty())
            .unwrap()
    }

    async fn handle(State(swift): State<MockSwift>, req: Request) -> MockResponse {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();

        if path == "/auth/v1.0" {
            let user = parts.headers.get("x-auth-user").and_then(|v| v.to_str().ok());
            let key = parts.headers.get("x-auth-key").and_then(|v| v.to_str().ok());
            if user != Some("test:tester") || key != Some("testing") {
                return reply(MockStatus::UNAUTHORIZED);
            }
            return MockResponse::builder()
                .header("X-Storage-Url", &swift.storage_url)
                .header("X-Auth-Token", TOKEN)
                .body(Body::empty())
                .unwrap();
        }

        if parts.headers.get("x-auth-token").and_then(|v| v.to_str().ok()) != Some(TOKEN) {
            return reply(MockStatus::UNAUTHORIZED);
        }
        let Some(rest) = path.strip_prefix("/v1/AUTH_test/") else {
            return reply(MockStatus::NOT_FOUND);
        };
        let (container, object) = match rest.split_once('/') {
            Some((c, o)) => (c.to_string(), Some(o.to_string())),
            None => (rest.to_string(), None),
        };

        // Read the request body before taking the lock.
        let data = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let mut containers = swift.containers.lock().unwrap();

        let Some(objects) = containers.get(&container) else {
            return reply(MockStatus::NOT_FOUND);
        };
        let Some(object) = object else {
            // Container listing
            let query: BTreeMap<String, String> =
                url::form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())
                    .into_owned()
                    .collect();
            let limit: usize = query["limit"].parse().unwrap();
            let marker = query.get("marker").cloned().unwrap_or_default();
            let page: Vec<serde_json::Value> = objects
                .iter()
                .filter(|(name, _)| name.as_str() > marker.as_str())
                .take(limit)
                .map(|(name, obj)| {
                    serde_json::json!({
                        "name": name,
                        "bytes": obj.data.len(),
                        "content_type": obj.content_type,
                    })
                })
                .collect();
            if page.is_empty() {
                return reply(MockStatus::NO_CONTENT);
            }
            return MockResponse::new(Body::from(serde_json::to_vec(&page).unwrap()));
        };

        match parts.method {
            Method::HEAD | Method::GET => match objects.get(&object) {
                Some(obj) => MockResponse::builder()
                    .header("Content-Type", &obj.content_type)
                    .header("Etag", format!("{:x}", md5::compute(&obj.data)))
                    .header("Last-Modified", LAST_MODIFIED_AT)
                    .header("X-Object-Meta-Owner", "ops")
                    .body(Body::from(obj.data.clone()))
                    .unwrap(),
                None => reply(MockStatus::NOT_FOUND),
            },
            Method::DELETE => {
                let removed = containers
                    .get_mut(&container)
                    .and_then(|objects| objects.remove(&object));
                match removed {
                    Some(_) => reply(MockStatus::NO_CONTENT),
                    None => reply(MockStatus::NOT_FOUND),
                }
            }
            Method::PUT => {
                let stored = if let Some(source) = parts.headers.get("x-copy-from") {
                    let source = source.to_str().unwrap().trim_start_matches('/');
                    let (src_c, src_o) = source.split_once('/').unwrap();
                    match containers.get(src_c).and_then(|objects| objects.get(src_o)) {
                        Some(obj) => obj.clone(),
                        None => return reply(MockStatus::NOT_FOUND),
                    }
                } else {
                    let etag = parts.headers.get("etag").and_then(|v| v.to_str().ok());
                    if let Some(etag) = etag
                        && etag != format!("{:x}", md5::compute(&data))
                    {
                        return reply(MockStatus::UNPROCESSABLE_ENTITY);
                    }
                    StoredObject {
                        data: data.to_vec(),
                        content_type: parts
                            .headers
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("application/octet-stream")
                            .to_string(),
                    }
                };
                if let Some(objects) = containers.get_mut(&container) {
                    objects.insert(object, stored);
                }
                reply(MockStatus::CREATED)
            }
            _ => reply(MockStatus::METHOD_NOT_ALLOWED),
        }
    }

    /// Start a mock account holding the given containers; returns its profile
    async fn mock_swift(containers: &[&str]) -> (Profile, MockSwift) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let swift = MockSwift {
            storage_url: format!("http://{addr}/v1/AUTH_test"),
            containers: Arc::default(),
        };
        {
            let mut map = swift.containers.lock().unwrap();
            for c in containers {
                map.insert(c.to_string(), BTreeMap::new());
            }
        }
        let app = Router::new().fallback(handle).with_state(swift.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let profile = Profile::new(
            "mock",
            format!("http://{addr}/auth/v1.0"),
            "test:tester",
            "testing",
        );
        (profile, swift)
    }

    fn seed(swift: &MockSwift, container: &str, object: &str, data: &[u8]) {
        swift
            .containers
            .lock()
            .unwrap()
            .get_mut(container)
            .unwrap()
            .insert(
                object.to_string(),
                StoredObject {
                    data: data.to_vec(),
                    content_type: "text/plain".into(),
                },
            );
    }

    async fn read_all(conn: &SwiftConnection, container: &str, object: &str) -> Result<Vec<u8>> {
        let mut stream = conn.get_object(container, object).await?;
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    #[test]
    fn test_canonical_header() {
        assert_eq!(canonical_header("x-object-meta-owner"), "X-Object-Meta-Owner");
        assert_eq!(canonical_header("etag"), "Etag");
        assert_eq!(canonical_header("content-length"), "Content-Length");
    }

    #[test]
    fn test_copy_source_encodes_path() {
        assert_eq!(copy_source("media", "2016/a b.jpg").unwrap(), "/media/2016/a%20b.jpg");
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "c/o", ""),
            Error::Auth(_)
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "c/o", ""),
            Error::NotFound(ref w) if w == "c/o"
        ));
        let err = map_status(StatusCode::UNPROCESSABLE_ENTITY, "c/o", "");
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(
            err.to_string(),
            "Transport error: HTTP 422 Unprocessable Entity: checksum mismatch for c/o"
        );
        let err = map_status(StatusCode::SERVICE_UNAVAILABLE, "c/o", "busy");
        assert_eq!(err.to_string(), "Transport error: HTTP 503 Service Unavailable: busy");
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_credentials() {
        let (mut profile, _swift) = mock_swift(&["media"]).await;
        profile.key = "wrong".into();
        let err = SwiftConnection::connect(&profile).await.err().unwrap();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_upload_head_and_download() {
        let (profile, _swift) = mock_swift(&["media"]).await;
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 253) as u8).collect();
        let hash = format!("{:x}", md5::compute(&data));
        let mut writer = conn
            .create_object("media", "clip.bin", Some(hash.clone()), Some("video/mp4".into()))
            .await
            .unwrap();
        for chunk in data.chunks(16 * 1024) {
            writer.write(chunk).await.unwrap();
        }
        writer.close().await.unwrap();

        let (info, headers) = conn.object_info("media", "clip.bin").await.unwrap();
        assert_eq!(info.name, "clip.bin");
        assert_eq!(info.bytes, 100_000);
        assert_eq!(info.hash, hash);
        assert_eq!(info.content_type, "video/mp4");
        assert_eq!(info.last_modified, LAST_MODIFIED_AT);
        assert!(!info.pseudo_directory);
        assert_eq!(headers.get("X-Object-Meta-Owner").map(String::as_str), Some("ops"));

        assert_eq!(read_all(&conn, "media", "clip.bin").await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_upload_hash_mismatch_rejected_on_close() {
        let (profile, swift) = mock_swift(&["media"]).await;
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        let mut writer = conn
            .create_object("media", "bad.bin", Some("0".repeat(32)), None)
            .await
            .unwrap();
        writer.write(b"corrupted").await.unwrap();
        let err = writer.close().await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("422"));
        assert!(!swift.containers.lock().unwrap()["media"].contains_key("bad.bin"));
    }

    #[tokio::test]
    async fn test_listing_follows_pages() {
        let (profile, swift) = mock_swift(&["logs"]).await;
        for i in 0..5 {
            seed(&swift, "logs", &format!("day-{i}.log"), b"x");
        }
        let conn = SwiftConnection::connect(&profile)
            .await
            .unwrap()
            .with_page_size(2);

        let names = conn.object_names_all("logs").await.unwrap();
        assert_eq!(
            names,
            vec!["day-0.log", "day-1.log", "day-2.log", "day-3.log", "day-4.log"]
        );
    }

    #[tokio::test]
    async fn test_listing_exact_page_multiple_and_empty() {
        let (profile, swift) = mock_swift(&["logs", "empty"]).await;
        for i in 0..4 {
            seed(&swift, "logs", &format!("day-{i}.log"), b"x");
        }
        let conn = SwiftConnection::connect(&profile)
            .await
            .unwrap()
            .with_page_size(2);

        assert_eq!(conn.object_names_all("logs").await.unwrap().len(), 4);
        assert!(conn.object_names_all("empty").await.unwrap().is_empty());

        let err = conn.object_names_all("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_copy_and_delete() {
        let (profile, swift) = mock_swift(&["docs", "archive"]).await;
        seed(&swift, "docs", "2016/report.txt", b"quarterly");
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        conn.copy_object("docs", "2016/report.txt", "archive", "2016/report.txt")
            .await
            .unwrap();
        assert_eq!(
            read_all(&conn, "archive", "2016/report.txt").await.unwrap(),
            b"quarterly"
        );

        conn.delete_object("docs", "2016/report.txt").await.unwrap();
        let err = conn.object_info("docs", "2016/report.txt").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = conn.delete_object("docs", "2016/report.txt").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let (profile, _swift) = mock_swift(&["docs", "archive"]).await;
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        let err = conn
            .copy_object("docs", "nope.txt", "archive", "nope.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let (profile, _swift) = mock_swift(&["docs"]).await;
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        let err = read_all(&conn, "docs", "gone.txt").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_token_is_auth_error() {
        let (_profile, swift) = mock_swift(&["docs"]).await;
        let conn = SwiftConnection::with_endpoint(
            reqwest::Client::new(),
            Endpoint {
                storage_url: swift.storage_url.clone(),
                auth_token: "AUTH_stale".into(),
            },
        );

        let err = conn.object_names_all("docs").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_large_delete_through_connection() {
        let (profile, swift) = mock_swift(&["videos"]).await;
        seed(&swift, "videos", "launch.mp4", b"manifest");
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        let req = DeleteRequest::new("videos", "launch.mp4", true).unwrap();
        swo_core::delete_object(&conn, &req, &NoStatus).await.unwrap();
        assert!(!swift.containers.lock().unwrap()["videos"].contains_key("launch.mp4"));
    }

    /// Storage endpoint that answers every request after `delay`
    async fn slow_storage(delay: Duration) -> String {
        let app = Router::new().fallback(move || async move {
            tokio::time::sleep(delay).await;
            reply(MockStatus::NO_CONTENT)
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/AUTH_test")
    }

    #[tokio::test]
    async fn test_large_delete_applies_profile_timeout() {
        let storage_url = slow_storage(Duration::from_secs(3)).await;
        let mut profile = Profile::new("slow", "http://127.0.0.1:9/auth/v1.0", "", "");
        profile.storage_url = Some(storage_url);
        profile.auth_token = Some(TOKEN.into());
        profile.timeout = Some(TimeoutConfig {
            connect_ms: 200,
            read_ms: 200,
        });
        let conn = SwiftConnection::connect(&profile).await.unwrap();

        for large in [false, true] {
            let req = DeleteRequest::new("videos", "launch.mp4", large).unwrap();
            let started = Instant::now();
            let err = swo_core::delete_object(&conn, &req, &NoStatus)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Transport(_)), "large={large}: {err}");
            assert!(
                started.elapsed() < Duration::from_secs(2),
                "large={large} ignored the read timeout"
            );
        }
    }
}
