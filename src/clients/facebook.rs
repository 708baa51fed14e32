use super::{GraphError, PostClient, PostRecord, PostsPage, UserRecord};
use crate::criteria::{Criteria, Request};
use crate::http::TransportError;
use crate::post_url::PostUrlMatch;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v2.6";

const TOKEN_PATH: &str = "oauth/access_token";

/// App credentials used for the client-credentials token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacebookCredentials {
    pub app_id: String,
    pub app_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

pub struct FacebookClient<C> {
    credentials: FacebookCredentials,
    transport: C,
    // `Some(None)` is a token response that carried no `access_token`.
    access_token: OnceCell<Option<String>>,
}

impl<C: Criteria> FacebookClient<C> {
    pub fn new(credentials: FacebookCredentials, transport: C) -> Self {
        Self {
            credentials,
            transport,
            access_token: OnceCell::new(),
        }
    }

    /// Token from the cache, fetching it on first use. A failed fetch leaves
    /// the cache empty. A token response without `access_token` is cached as
    /// `None`, and later requests still carry the parameter as `access_token=`.
    async fn access_token(&self) -> Result<Option<String>, GraphError> {
        let token = self
            .access_token
            .get_or_try_init(|| self.fetch_access_token())
            .await?;
        Ok(token.clone())
    }

    async fn fetch_access_token(&self) -> Result<Option<String>, GraphError> {
        let request = Request::new(TOKEN_PATH)
            .param("client_id", self.credentials.app_id.as_str())
            .param("client_secret", self.credentials.app_secret.as_str())
            .param("grant_type", "client_credentials");

        match self.get_json::<TokenResponse>(request).await {
            Ok(token) => {
                if token.access_token.is_none() {
                    tracing::warn!("token response carried no access_token");
                }
                Ok(token.access_token)
            }
            Err(e) => {
                tracing::error!(error = %e, "OAuth token request failed");
                Err(GraphError::Authentication(e))
            }
        }
    }

    async fn get_user(&self, handle: &str) -> Result<UserRecord, GraphError> {
        let token = self.access_token().await?;
        let request = Request::new(handle).optional_param("access_token", token);

        self.get_json(request).await.map_err(|e| {
            tracing::error!(error = %e, handle, "user lookup failed");
            GraphError::Upstream(e)
        })
    }

    /// Raw post candidates published by the page, in the order the API
    /// returns them.
    async fn get_posts(&self, handle: &str) -> Result<Vec<Value>, GraphError> {
        let token = self.access_token().await?;
        let request = Request::new(format!("{}/posts", handle)).optional_param("access_token", token);

        self.get_json::<PostsPage>(request)
            .await
            .map(|page| page.data)
            .map_err(|e| {
                tracing::error!(error = %e, handle, "posts lookup failed");
                GraphError::Upstream(e)
            })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<T, TransportError> {
        self.transport.apply(request).await?.json()
    }
}

#[async_trait]
impl<C: Criteria> PostClient for FacebookClient<C> {
    async fn resolve_post(&self, url: &str) -> Result<PostRecord, GraphError> {
        let target =
            PostUrlMatch::parse(url).ok_or_else(|| GraphError::InvalidInput(url.to_string()))?;

        let user = self.get_user(&target.handle).await?;
        let posts = self.get_posts(&target.handle).await?;

        let message_id = target.composite_id(&user.id);
        tracing::debug!(%message_id, candidates = posts.len(), "matching post");

        // Candidates without a string `id` cannot match and are skipped.
        let mut post = posts
            .into_iter()
            .filter_map(PostRecord::from_value)
            .find(|post| post.id() == message_id)
            .ok_or(GraphError::NotFound(message_id))?;

        post.set_author(user.name, target.avatar_url());
        Ok(post)
    }
}
