use crate::record::{Record, validate_collection};
use pulseboard_common::model::{ValidationError, comment::Comment, post::Post, user::User};
use reqwest::{Client, StatusCode};
use std::{
    fmt::{Display, Formatter},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// The collection endpoints of the source API.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Collection {
    Users,
    Posts,
    Comments,
}

impl Collection {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Comments => "comments",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Invalid API base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("API base url cannot be used as a base: {0}")]
    OpaqueBaseUrl(Url),
    #[error("Error building http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request for {operation} failed: {source}")]
    Transport {
        operation: Collection,
        source: reqwest::Error,
    },
    #[error("Request for {operation} returned status {status}")]
    Status {
        operation: Collection,
        status: StatusCode,
    },
    #[error("Response for {operation} was not a JSON array of records: {source}")]
    Decode {
        operation: Collection,
        source: serde_json::Error,
    },
    #[error("Response for {operation} contained an invalid record: {source}")]
    Validation {
        operation: Collection,
        source: ValidationError,
    },
}

impl FetchError {
    #[must_use]
    pub fn operation(&self) -> Collection {
        match self {
            FetchError::Transport { operation, .. }
            | FetchError::Status { operation, .. }
            | FetchError::Decode { operation, .. }
            | FetchError::Validation { operation, .. } => *operation,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::OpaqueBaseUrl(base_url));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn endpoint(&self, collection: Collection) -> Url {
        let mut url = self.base_url.clone();
        // The base is never opaque, checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection.path());
        }
        url
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.fetch_collection(Collection::Users).await
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        self.fetch_collection(Collection::Posts).await
    }

    pub async fn fetch_comments(&self) -> Result<Vec<Comment>> {
        self.fetch_collection(Collection::Comments).await
    }

    async fn fetch_collection<T: Record>(&self, operation: Collection) -> Result<Vec<T>> {
        let url = self.endpoint(operation);
        debug!(%operation, %url, "Fetching collection");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { operation, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { operation, source })?;
        let raw: Vec<T::Raw> = serde_json::from_slice(&body)
            .map_err(|source| FetchError::Decode { operation, source })?;
        let records = validate_collection(raw)
            .map_err(|source| FetchError::Validation { operation, source })?;

        debug!(%operation, count = records.len(), "Fetched collection");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{ApiClient, ClientBuildError, Collection, FetchError};
    use pulseboard_common::model::ValidationError;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn endpoints_keep_base_path() {
        let client = ApiClient::new("https://example.com/api/v1", TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint(Collection::Posts).as_str(),
            "https://example.com/api/v1/posts"
        );

        let client = ApiClient::new("https://example.com/", TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint(Collection::Comments).as_str(),
            "https://example.com/comments"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", TIMEOUT),
            Err(ClientBuildError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", TIMEOUT),
            Err(ClientBuildError::OpaqueBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn fetches_and_validates_users() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/users",
            ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz"},
                {"id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv"}
            ])),
        )
        .await;

        let client = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        let users = client.fetch_users().await.unwrap();

        let usernames: Vec<&str> = users.iter().map(|user| user.username.as_str()).collect();
        assert_eq!(usernames, ["Bret", "Antonette"]);
    }

    #[tokio::test]
    async fn failure_status_names_operation() {
        let server = MockServer::start().await;
        serve(&server, "/comments", ResponseTemplate::new(503)).await;

        let client = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        let error = client.fetch_comments().await.unwrap_err();

        assert_eq!(error.operation(), Collection::Comments);
        assert!(matches!(
            error,
            FetchError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn rejects_non_array_body() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/posts",
            ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})),
        )
        .await;

        let client = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        let error = client.fetch_posts().await.unwrap_err();

        assert!(matches!(
            error,
            FetchError::Decode {
                operation: Collection::Posts,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn rejects_records_missing_fields() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/posts",
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "t", "body": "b"}])),
        )
        .await;

        let client = ApiClient::new(&server.uri(), TIMEOUT).unwrap();
        let error = client.fetch_posts().await.unwrap_err();

        match error {
            FetchError::Validation { operation, source } => {
                assert_eq!(operation, Collection::Posts);
                assert_eq!(
                    source,
                    ValidationError::MissingField {
                        entity: "Post",
                        field: "userId"
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = ApiClient::new(&uri, TIMEOUT).unwrap();
        let error = client.fetch_users().await.unwrap_err();

        assert!(matches!(
            error,
            FetchError::Transport {
                operation: Collection::Users,
                ..
            }
        ));
    }
}
