//! GraphQL documents, ordered from richest to most conservative.

/// A query document attempted against the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStrategy {
    pub name: &'static str,
    pub document: &'static str,
}

/// Includes the `storiesSimples` custom-field group.
pub const RICH: QueryStrategy = QueryStrategy {
    name: "rich",
    document: r#"
  query Posts($first: Int!, $after: String) {
    posts(first: $first, after: $after, where: { status: PUBLISH, orderby: { field: DATE, order: DESC } }) {
      pageInfo { endCursor hasNextPage }
      nodes {
        id
        title
        date
        uri
        excerpt
        content
        categories { nodes { name slug } }
        featuredImage { node { sourceUrl } }
        storiesSimples {
          stories {
            type
            title
            text
            showButton
            media {
              ... on MediaItem {
                sourceUrl
                mediaItemUrl
              }
              ... on MediaItemConnection {
                nodes { sourceUrl mediaItemUrl }
                edges { node { sourceUrl mediaItemUrl } }
              }
            }
          }
        }
      }
    }
  }
"#,
};

/// Core post fields only, for schemas without the custom fields.
pub const BASE: QueryStrategy = QueryStrategy {
    name: "base",
    document: r#"
  query PostsBase($first: Int!, $after: String) {
    posts(first: $first, after: $after, where: { status: PUBLISH, orderby: { field: DATE, order: DESC } }) {
      pageInfo { endCursor hasNextPage }
      nodes {
        id
        title
        date
        uri
        excerpt
        content
        categories { nodes { name slug } }
        featuredImage { node { sourceUrl } }
      }
    }
  }
"#,
};

pub const POSTS: &[QueryStrategy] = &[RICH, BASE];
