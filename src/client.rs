//! Represents a client abstraction for the Comments and Reactions services, and the
//! engagement aggregation built on top of them.

pub(crate) mod api;

use crate::{
    engagement::{Engagement, ReactionSummary},
    error::{
        ClientBuilderError, EngagementError, InvalidBaseUrl, UpstreamStatus, UpstreamTransport,
    },
    meta::{PostId, Service},
    stdx::http::{DEFAULT_USER_AGENT, IRetry},
};

use api::comments::CommentCount;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Where the Comments service is expected when nothing else is configured.
pub const DEFAULT_COMMENTS_URL: &str = "http://localhost:4003";

/// Where the Reactions service is expected when nothing else is configured.
pub const DEFAULT_REACTIONS_URL: &str = "http://localhost:4004";

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// Every setting has a default: the upstream services are looked for at
/// [`DEFAULT_COMMENTS_URL`] and [`DEFAULT_REACTIONS_URL`], there is no timeout beyond
/// what the transport does on its own, and failed calls are not retried.
///
/// # Example
///
/// ```
/// # use engagement::ClientBuilder;
/// # use std::time::Duration;
/// let client = ClientBuilder::new()
///     .comments_url("http://comments.internal:4003")
///     .reactions_url("http://reactions.internal:4004")
///     .timeout(Duration::from_secs(2))
///     .build()?;
/// # Ok::<(), engagement::error::ClientBuilderError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    comments_url: String,
    reactions_url: String,
    retries: u8,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This includes a default user agent (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            comments_url: DEFAULT_COMMENTS_URL.to_owned(),
            reactions_url: DEFAULT_REACTIONS_URL.to_owned(),
            retries: 0,
        }
    }

    /// Base URL of the Comments service, e.g. `http://localhost:4003`.
    ///
    /// Count requests go to `{url}/comments/count`.
    #[inline]
    #[must_use]
    pub fn comments_url(mut self, url: &str) -> Self {
        url.clone_into(&mut self.comments_url);
        self
    }

    /// Base URL of the Reactions service, e.g. `http://localhost:4004`.
    ///
    /// Count requests go to `{url}/reactions/count`.
    #[inline]
    #[must_use]
    pub fn reactions_url(mut self, url: &str) -> Self {
        url.clone_into(&mut self.reactions_url);
        self
    }

    /// Sets a custom `User-Agent` header for the upstream requests.
    #[inline]
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        let builder = self.builder.user_agent(user_agent);
        Self { builder, ..self }
    }

    /// Upper bound on a whole upstream call, from connecting until the body is read.
    ///
    /// Hitting it is reported as a transport failure.
    #[inline]
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let builder = self.builder.timeout(timeout);
        Self { builder, ..self }
    }

    /// How many extra attempts an upstream call gets after a transport error or a
    /// `429 Too Many Requests`. Defaults to `0`.
    #[inline]
    #[must_use]
    pub fn retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuilderError::InvalidBaseUrl`] if either base URL is not an
    /// absolute `http` or `https` URL, and [`ClientBuilderError::BuildFailed`] if
    /// the underlying HTTP client could not be built, such as when TLS
    /// initialization fails.
    #[inline]
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let endpoints = Endpoints {
            comments: count_endpoint(&self.comments_url, Service::Comments)?,
            reactions: count_endpoint(&self.reactions_url, Service::Reactions)?,
        };

        Ok(Client {
            http: self
                .builder
                .build()
                .map_err(|_err| ClientBuilderError::BuildFailed)?,
            endpoints: Arc::new(endpoints),
            retries: self.retries,
        })
    }
}

fn count_endpoint(base: &str, service: Service) -> Result<Url, InvalidBaseUrl> {
    let mut url = Url::parse(base).map_err(|err| InvalidBaseUrl::new(base, err))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(InvalidBaseUrl::new(base, "scheme should be `http` or `https`"));
    }

    // `join` replaces the last segment unless the path ends in `/`.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join(service.count_path())
        .map_err(|err| InvalidBaseUrl::new(base, err))
}

#[derive(Debug)]
struct Endpoints {
    comments: Url,
    reactions: Url,
}

impl Endpoints {
    fn get(&self, service: Service) -> &Url {
        match service {
            Service::Comments => &self.comments,
            Service::Reactions => &self.reactions,
        }
    }
}

/// A high-level, asynchronous client for the Comments and Reactions services.
///
/// The `Client` is cheap to clone and internally manages connection pooling, so a
/// single instance should be shared for the lifetime of the process.
///
/// # Example
///
/// ```no_run
/// # use engagement::{Client, PostId};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder().build()?;
///
/// let engagement = client.engagement(PostId::new(7)?).await?;
/// println!("{} comments, {} reactions", engagement.comments, engagement.reactions.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    retries: u8,
}

impl Client {
    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Full URL of the Comments count endpoint.
    #[must_use]
    pub fn comments_url(&self) -> &Url {
        &self.endpoints.comments
    }

    /// Full URL of the Reactions count endpoint.
    #[must_use]
    pub fn reactions_url(&self) -> &Url {
        &self.endpoints.reactions
    }

    /// Fetches the comment count and the reaction summary of `post` at the same time
    /// and merges them.
    ///
    /// Exactly one request goes to each service (more only if [retries] were
    /// configured), and neither waits on the other. The result is all or nothing,
    /// checked in this order once both calls settled:
    ///
    /// 1. a call that failed outright or timed out is an [`EngagementError::Transport`];
    /// 2. a non-success status from either service is an [`EngagementError::Status`];
    /// 3. a body that can't be read or decoded is an [`EngagementError::Transport`].
    ///
    /// A comment payload without a `count` counts as `0` comments.
    ///
    /// [retries]: ClientBuilder::retries
    #[tracing::instrument(skip_all, fields(post = %post))]
    pub async fn engagement(&self, post: PostId) -> Result<Engagement, EngagementError> {
        let (comments, reactions) = futures::join!(
            self.get_count(Service::Comments, post),
            self.get_count(Service::Reactions, post)
        );

        // Both sends must have gone through before any status is looked at.
        let (comments, reactions) = (comments?, reactions?);

        let comments = success(Service::Comments, comments)?;
        let reactions = success(Service::Reactions, reactions)?;

        let (comments, reactions) = futures::join!(
            read::<CommentCount>(Service::Comments, comments),
            read::<ReactionSummary>(Service::Reactions, reactions)
        );

        Ok(Engagement::merge(post, &comments?, reactions?))
    }
}

// Internal only impls
impl Client {
    async fn get_count(&self, service: Service, post: PostId) -> Result<Response, UpstreamTransport> {
        let url = self.endpoints.get(service);

        tracing::debug!(%service, %url, "querying upstream");

        self.http
            .get(url.clone())
            .query(&[("postId", post.get())])
            .retry(self.retries)
            .send()
            .await
            .map_err(|err| UpstreamTransport::new(service, err))
    }
}

fn success(service: Service, response: Response) -> Result<Response, UpstreamStatus> {
    let status = response.status();

    if !status.is_success() {
        return Err(UpstreamStatus { service, status });
    }

    Ok(response)
}

async fn read<T: DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T, UpstreamTransport> {
    let body = response
        .text()
        .await
        .map_err(|err| UpstreamTransport::new(service, err))?;

    serde_json::from_str::<T>(&body).map_err(|err| UpstreamTransport::new(service, err))
}
