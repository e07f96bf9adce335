//! # Updates Client
//!
//! Reads update posts from the headless CMS REST API.
//!
//! Older CMS deployments choke on some query parameters and answer HTTP 500,
//! so each read walks a list of progressively simpler queries:
//!
//! ```text
//! published_posts(N)                       post_by_slug(S)
//! ──────────────────                       ───────────────
//! updates?sort=-createdAt&limit=N          updates?where[slug][equals]=S&limit=1&depth=2
//!   │ 500                                    │ 500
//!   ▼                                        ▼
//! updates?sort=-created_at&limit=N         updates?where[slug][equals]=S&limit=1
//!   │ 500
//!   ▼
//! updates?limit=N
//!   │ 500
//!   ▼
//! updates
//! ```
//!
//! Only a 500 moves on to the next query. Any other status is final.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use zim_core::updates::{sort_newest_first, PostsPage, UpdatePost};

/// Per-request timeout for CMS calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts fetched by [`UpdatesClient::all_posts`].
const ALL_POSTS_LIMIT: u32 = 1000;

type QueryPairs = Vec<(&'static str, String)>;

/// CMS client errors.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS answered HTTP {0}")]
    Status(u16),
}

/// HTTP client for the `updates` collection.
#[derive(Debug, Clone)]
pub struct UpdatesClient {
    http: Client,
    updates_url: String,
}

impl UpdatesClient {
    /// Creates a client for the CMS API rooted at `base_url`
    /// (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        UpdatesClient {
            http,
            updates_url: format!("{}/updates", base_url.trim_end_matches('/')),
        }
    }

    /// Latest posts, newest first.
    pub async fn published_posts(&self, limit: u32) -> Result<Vec<UpdatePost>, CmsError> {
        let limit = limit.to_string();
        let candidates: Vec<QueryPairs> = vec![
            vec![("sort", "-createdAt".to_string()), ("limit", limit.clone())],
            vec![("sort", "-created_at".to_string()), ("limit", limit.clone())],
            vec![("limit", limit)],
            vec![],
        ];

        let page = self.fetch_page(&candidates).await?;
        let mut posts = page.docs;
        sort_newest_first(&mut posts);

        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    /// The post with the given slug, if any.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<UpdatePost>, CmsError> {
        let by_slug = vec![
            ("where[slug][equals]", slug.to_string()),
            ("limit", "1".to_string()),
        ];
        let mut with_depth = by_slug.clone();
        with_depth.push(("depth", "2".to_string()));

        let page = self.fetch_page(&[with_depth, by_slug]).await?;
        Ok(page.docs.into_iter().next())
    }

    /// Every post, in the order the CMS returns them.
    pub async fn all_posts(&self) -> Result<Vec<UpdatePost>, CmsError> {
        let query = vec![
            ("sort", "-created_at".to_string()),
            ("limit", ALL_POSTS_LIMIT.to_string()),
        ];
        let page = self.fetch_page(&[query]).await?;
        Ok(page.docs)
    }

    /// Tries each query in turn until one does not answer HTTP 500.
    async fn fetch_page(&self, candidates: &[QueryPairs]) -> Result<PostsPage, CmsError> {
        for query in candidates {
            let response = self.http.get(&self.updates_url).query(query).send().await?;
            let status = response.status();

            if status == StatusCode::INTERNAL_SERVER_ERROR {
                warn!(url = %response.url(), "CMS answered 500, trying a simpler query");
                continue;
            }
            if !status.is_success() {
                return Err(CmsError::Status(status.as_u16()));
            }

            return Ok(response.json::<PostsPage>().await?);
        }

        Err(CmsError::Status(StatusCode::INTERNAL_SERVER_ERROR.as_u16()))
    }
}
