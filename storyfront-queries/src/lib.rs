pub mod mapper;
pub mod media;
pub mod models;
pub mod strategy;

use std::sync::Arc;

use isahc::{
    config::Configurable as _, http::StatusCode, AsyncReadResponseExt as _, HttpClient, Request,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use storyfront_common::{bail, err, models::Page, Context as _, Report, Uri};

pub use strategy::{QueryStrategy, POSTS};

pub const DEFAULT_FIRST: u32 = 9;
pub const MAX_FIRST: u32 = 24;

const USER_AGENT: &str = concat!("storyfront/", env!("CARGO_PKG_VERSION"));

/// Page size from a raw query value: 9 when missing, unparsable or zero,
/// never more than 24. Only the leading integer counts, so `12abc` is 12.
pub fn clamp_first(raw: Option<&str>) -> u32 {
    raw.and_then(leading_int)
        .filter(|first| *first != 0)
        .map(|first| first.clamp(1, MAX_FIRST as i64) as u32)
        .unwrap_or(DEFAULT_FIRST)
}

fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();

    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() {
        return None;
    }

    let value = digits.parse::<i64>().unwrap_or(i64::MAX);

    Some(if negative { -value } else { value })
}

/// Status and body of an upstream reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl Reply {
    /// A reply whose body could not be read is an error, not an empty body.
    pub fn read(status: StatusCode, body: std::io::Result<String>) -> Result<Self, Report> {
        let body = body.with_context(|| format!("unable to read CMS response body ({})", status))?;

        Ok(Self {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends an encoded GraphQL request to the CMS.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, body: String) -> Result<Reply, Report>;
}

pub struct IsahcTransport {
    client: HttpClient,
    endpoint: Uri,
}

impl IsahcTransport {
    pub fn new(endpoint: &str) -> Result<Self, Report> {
        let endpoint = Uri::try_from(endpoint)
            .with_context(|| format!("with endpoint, at line {}: `{}`", line!(), endpoint))?;

        let client = HttpClient::builder()
            .default_header("User-Agent", USER_AGENT)
            .default_header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl Transport for IsahcTransport {
    #[tracing::instrument(err, skip(self, body), fields(endpoint = %self.endpoint))]
    async fn post(&self, body: String) -> Result<Reply, Report> {
        tracing::debug!("posting query");

        let req = Request::post(self.endpoint.clone()).body(body)?;

        let mut res = self.client.send_async(req).await?;

        let status = res.status();
        let body = res.text().await;

        Reply::read(status, body)
    }
}

#[derive(Debug, Serialize)]
pub struct PostsVariables<'a> {
    pub first: u32,
    pub after: Option<&'a str>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// CMS client shared by every request handler.
#[derive(Clone)]
pub struct Cms {
    transport: Arc<dyn Transport>,
    strategies: &'static [QueryStrategy],
}

impl Cms {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            strategies: POSTS,
        }
    }

    pub fn with_strategies(mut self, strategies: &'static [QueryStrategy]) -> Self {
        self.strategies = strategies;
        self
    }

    pub async fn gql_fetch<V, T>(&self, query: &str, variables: &V) -> Result<T, Report>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(&GraphQlRequest { query, variables })?;

        let reply = self.transport.post(body).await?;

        if !reply.is_success() {
            bail!(
                "GraphQL request failed: {} {} {}",
                reply.status,
                reply.reason,
                reply.body
            );
        }

        let res: GraphQlResponse<T> =
            serde_json::from_str(&reply.body).context("malformed GraphQL response")?;

        if let Some(errors) = res.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>();

            bail!("{}", messages.join("; "));
        }

        res.data.ok_or_else(|| err!("GraphQL response has no data"))
    }

    /// Tries each strategy in order; the first success wins and the last
    /// failure is returned when none succeed.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch_posts(
        &self,
        first: u32,
        after: Option<&str>,
    ) -> Result<models::Posts, Report> {
        let variables = PostsVariables { first, after };
        let mut last_error = None;

        for strategy in self.strategies {
            match self
                .gql_fetch::<_, models::PostsData>(strategy.document, &variables)
                .await
            {
                Ok(data) => {
                    tracing::debug!(strategy = strategy.name, count = data.posts.nodes.len(), "fetched posts");

                    return Ok(data.posts);
                }
                Err(error) => {
                    tracing::warn!(strategy = strategy.name, error = %error, "query strategy failed");

                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| err!("no query strategies configured")))
    }

    /// Fetches and reshapes one page of posts.
    pub async fn fetch_page(&self, first: u32, after: Option<&str>) -> Result<Page, Report> {
        let posts = self.fetch_posts(first, after).await?;

        Ok(mapper::page(posts))
    }
}
