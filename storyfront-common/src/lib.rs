pub mod models;
pub mod text;

pub use color_eyre::{
    eyre::{bail, eyre as err, Context, Report},
    install,
};
pub use http::Uri;

pub const DEFAULT_ENDPOINT: &str = "https://portal.commarilia.com/graphql";
pub const DEFAULT_SITE: &str = "https://portal.commarilia.com";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const DEFAULT_REVALIDATE: u64 = 60;

#[twelf::config]
pub struct Conf {
    /// CMS GraphQL endpoint
    pub endpoint: Option<String>,

    /// Public site used to build canonical article links
    pub site: Option<String>,

    /// Address the web server listens on
    pub bind: Option<String>,

    /// Number of posts per grid page
    pub page_size: Option<usize>,

    /// Seconds a CDN may serve a cached proxy response
    pub revalidate: Option<u64>,

    /// Minimum milliseconds between wheel-driven story changes
    pub wheel_cooldown: Option<u64>,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            endpoint: None,
            site: None,
            bind: None,
            page_size: None,
            revalidate: None,
            wheel_cooldown: None,
        }
    }
}

impl Conf {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn site(&self) -> &str {
        self.site
            .as_deref()
            .unwrap_or(DEFAULT_SITE)
            .trim_end_matches('/')
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn page_size(&self) -> usize {
        match self.page_size {
            Some(0) => {
                tracing::warn!("page_size must be positive, using {}", DEFAULT_PAGE_SIZE);

                DEFAULT_PAGE_SIZE
            }
            Some(size) => size,
            None => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn revalidate(&self) -> u64 {
        self.revalidate.unwrap_or(DEFAULT_REVALIDATE)
    }
}

/// Joins the public site with a post's relative URI.
pub fn canonical_link(site: &str, uri: &str) -> String {
    format!("{}{}", site.trim_end_matches('/'), uri)
}
