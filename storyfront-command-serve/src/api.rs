use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::header,
    response::IntoResponse,
    Json,
};
use storyfront_queries::clamp_first;

use crate::{AppState, Error};

#[derive(Debug, serde::Deserialize)]
pub struct PostsQuery {
    first: Option<String>,
    after: Option<String>,
}

/// Proxies one page of posts from the CMS, reshaped into items.
#[tracing::instrument(skip(state))]
pub async fn posts(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<PostsQuery>,
) -> Result<impl IntoResponse, Error> {
    let first = clamp_first(query.first.as_deref());
    let after = query.after.as_deref().filter(|after| !after.is_empty());

    let page = state.cms.fetch_page(first, after).await?;

    let cache_control = format!(
        "public, s-maxage={}, stale-while-revalidate",
        state.revalidate
    );

    Ok(([(header::CACHE_CONTROL, cache_control)], Json(page)))
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use axum::http::StatusCode;
    use storyfront_common::models::Page;

    use crate::testing::{get, router, Catalog};

    #[tokio::test]
    async fn first_is_clamped_to_24() {
        let catalog = Arc::new(Catalog::new(30));

        let (status, headers, body) = get(router(catalog.clone()), "/api/posts?first=30").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers["cache-control"],
            "public, s-maxage=60, stale-while-revalidate"
        );
        assert_eq!(catalog.requested_firsts(), vec![24]);

        let page: Page = serde_json::from_str(&body).unwrap();
        assert_eq!(page.items.len(), 24);
        assert!(page.page_info.has_next_page);
    }

    #[tokio::test]
    async fn default_page_size_is_nine() {
        let catalog = Arc::new(Catalog::new(30));

        let (_, _, body) = get(router(catalog.clone()), "/api/posts?first=nope").await;

        let page: Page = serde_json::from_str(&body).unwrap();
        assert_eq!(page.items.len(), 9);
        assert_eq!(catalog.requested_firsts(), vec![9]);
    }

    #[tokio::test]
    async fn end_cursor_yields_the_next_disjoint_page() {
        let catalog = Arc::new(Catalog::new(20));

        let (_, _, body) = get(router(catalog.clone()), "/api/posts?first=9").await;
        let first: Page = serde_json::from_str(&body).unwrap();

        let cursor = first.page_info.end_cursor.clone().unwrap();
        let (_, _, body) = get(
            router(catalog.clone()),
            &format!("/api/posts?first=9&after={}", cursor),
        )
        .await;
        let second: Page = serde_json::from_str(&body).unwrap();

        let seen: HashSet<_> = first.items.iter().map(|item| item.id.clone()).collect();
        assert_eq!(second.items.len(), 9);
        assert!(second.items.iter().all(|item| !seen.contains(&item.id)));
    }

    #[tokio::test]
    async fn items_carry_screens() {
        let catalog = Arc::new(Catalog::new(1));

        let (_, _, body) = get(router(catalog), "/api/posts").await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let item = &value["items"][0];

        assert_eq!(item["readingTimeMin"], 1);
        assert_eq!(item["excerpt"], "Summary of 0.");
        assert_eq!(item["category"]["slug"], "cidade");
        assert_eq!(item["screens"][0]["content"], "Headline 0");
        assert_eq!(item["screens"][1]["imageUrl"], "https://cdn.example/0-a.jpg");
        assert_eq!(item["screens"][2]["type"], "quote");
        assert_eq!(item["screens"][2]["showButton"], true);
    }

    #[tokio::test]
    async fn reduced_query_is_used_when_rich_fails() {
        let mut catalog = Catalog::new(3);
        catalog.reject_rich = true;
        let catalog = Arc::new(catalog);

        let (status, _, body) = get(router(catalog.clone()), "/api/posts").await;

        assert_eq!(status, StatusCode::OK);
        let page: Page = serde_json::from_str(&body).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].screens.len(), 1);
        assert_eq!(catalog.requested_firsts().len(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_becomes_error_envelope() {
        let mut catalog = Catalog::new(3);
        catalog.down = true;

        let (status, _, body) = get(router(Arc::new(catalog)), "/api/posts").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "error": "GraphQL request failed: 503 Service Unavailable " })
        );
    }
}
