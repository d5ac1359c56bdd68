mod api;
mod pages;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    BoxError, Json, Router, Server,
};
use storyfront_common::{Conf, Context as _};
use storyfront_queries::{Cms, IsahcTransport, MAX_FIRST};
use storyfront_viewer::WheelPolicy;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Everything a request handler needs.
pub struct AppState {
    pub cms: Cms,
    pub site: String,
    pub page_size: u32,
    pub revalidate: u64,
    pub wheel: WheelPolicy,
}

impl AppState {
    pub fn new(cms: Cms, conf: &Conf) -> Self {
        Self {
            cms,
            site: conf.site().to_string(),
            page_size: conf.page_size().min(MAX_FIRST as usize) as u32,
            revalidate: conf.revalidate(),
            wheel: WheelPolicy::from_cooldown(conf.wheel_cooldown),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/grid", get(pages::grid))
        .route("/story", get(pages::story))
        .route("/api/posts", get(api::posts))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|error: BoxError| async move {
                    if error.is::<tower::timeout::error::Elapsed>() {
                        (StatusCode::REQUEST_TIMEOUT, String::new())
                    } else {
                        (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                    }
                }))
                .load_shed()
                .concurrency_limit(1024)
                .timeout(Duration::from_secs(10))
                .layer(Extension(Arc::new(state)))
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
}

pub async fn run(conf: &Conf) -> Result<(), storyfront_common::Report> {
    let transport = IsahcTransport::new(conf.endpoint())?;
    let state = AppState::new(Cms::new(Arc::new(transport)), conf);

    let addr: SocketAddr = conf
        .bind()
        .parse()
        .with_context(|| format!("invalid bind address `{}`", conf.bind()))?;

    tracing::info!(endpoint = conf.endpoint(), "starting on `{}`", addr);

    Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await?;

    Ok(())
}

#[derive(Debug)]
pub struct Error(storyfront_common::Report);

impl Error {
    pub fn from_any<A>(err: A) -> Self
    where
        A: Into<storyfront_common::Report>,
    {
        Self(err.into())
    }
}

impl From<storyfront_common::Report> for Error {
    fn from(err: storyfront_common::Report) -> Self {
        Self(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum_core::response::Response {
        #[derive(serde::Serialize)]
        struct Res {
            error: String,
        }

        let err = self.0;

        tracing::error!(error = ?err, "error handling request");

        let body = Res {
            error: err.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
