//! API session
//!
//! [`Api`] owns the credentials and the HTTP transport. It is created once,
//! shared by reference, and every operation validates its options before
//! issuing any request.

use super::graph::{GraphEndpoint, GraphFamily};
use super::models::{Status, Trend, User, UserId};
use super::options::{
    FavoritesOptions, GraphRequest, IdListOptions, ListTimelineOptions, RetweetersOptions,
    RetweetsOptions, SearchOptions, TimelineOptions, TrendsOptions, UserListOptions,
    UserShowOptions, UserTimelineOptions, UsersLookupOptions, UsersSearchOptions,
};
use crate::auth::AuthConfig;
use crate::config::ClientConfig;
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{CursorPaginator, Page};
use crate::types::{JsonObject, JsonValue, QueryParams};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Single page of a cursored family with its cursors
pub type PagedResult<T> = Page<T>;

/// Client session for the REST API
#[derive(Debug)]
pub struct Api {
    client: HttpClient,
    budget: Option<Duration>,
    help_config: OnceCell<JsonObject>,
}

impl Api {
    /// Create a session over a configured HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            budget: None,
            help_config: OnceCell::new(),
        }
    }

    /// Start building a session
    pub fn builder() -> ApiBuilder {
        ApiBuilder::default()
    }

    /// Build a session from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let auth = config.auth_config()?;
        let client = HttpClient::with_auth(config.http_config(), auth)?;
        Ok(Self::new(client))
    }

    /// Limit how long one aggregation may take
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Replace the credentials used for subsequent calls
    pub fn set_credentials(&mut self, auth: AuthConfig) {
        self.client.set_auth(auth);
    }

    /// Drop all credentials; later calls fail with an auth error
    pub fn clear_credentials(&mut self) {
        self.client.set_auth(AuthConfig::None);
    }

    /// Whether credentials are configured
    pub fn has_credentials(&self) -> bool {
        self.client.authenticator().config().is_configured()
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    // ========================================================================
    // Cursored families
    // ========================================================================

    /// Users followed by the target, aggregated across pages
    pub async fn get_friends(&self, options: &UserListOptions) -> Result<Vec<User>> {
        self.aggregate(GraphFamily::Friends, options.validate()?).await
    }

    /// One page of users followed by the target
    pub async fn get_friends_paged(&self, options: &UserListOptions) -> Result<PagedResult<User>> {
        self.page(GraphFamily::Friends, options.validate()?).await
    }

    /// Users following the target, aggregated across pages
    pub async fn get_followers(&self, options: &UserListOptions) -> Result<Vec<User>> {
        self.aggregate(GraphFamily::Followers, options.validate()?).await
    }

    /// One page of users following the target
    pub async fn get_followers_paged(
        &self,
        options: &UserListOptions,
    ) -> Result<PagedResult<User>> {
        self.page(GraphFamily::Followers, options.validate()?).await
    }

    /// Ids of users followed by the target, aggregated across pages
    pub async fn get_friend_ids(&self, options: &IdListOptions) -> Result<Vec<UserId>> {
        self.aggregate(GraphFamily::FriendIds, options.validate()?).await
    }

    /// One page of ids of users followed by the target
    pub async fn get_friend_ids_paged(
        &self,
        options: &IdListOptions,
    ) -> Result<PagedResult<UserId>> {
        self.page(GraphFamily::FriendIds, options.validate()?).await
    }

    /// Ids of users following the target, aggregated across pages
    pub async fn get_follower_ids(&self, options: &IdListOptions) -> Result<Vec<UserId>> {
        self.aggregate(GraphFamily::FollowerIds, options.validate()?)
            .await
    }

    /// One page of ids of users following the target
    pub async fn get_follower_ids_paged(
        &self,
        options: &IdListOptions,
    ) -> Result<PagedResult<UserId>> {
        self.page(GraphFamily::FollowerIds, options.validate()?).await
    }

    /// Users blocked by the authenticating user.
    ///
    /// The identifier fields of `options` are not used by this endpoint.
    pub async fn get_blocks(&self, options: &UserListOptions) -> Result<Vec<User>> {
        self.aggregate(GraphFamily::Blocks, without_user(options.validate()?))
            .await
    }

    /// One page of users blocked by the authenticating user
    pub async fn get_blocks_paged(&self, options: &UserListOptions) -> Result<PagedResult<User>> {
        self.page(GraphFamily::Blocks, without_user(options.validate()?))
            .await
    }

    /// Ids of users blocked by the authenticating user
    pub async fn get_block_ids(&self, options: &IdListOptions) -> Result<Vec<UserId>> {
        self.aggregate(GraphFamily::BlockIds, without_user(options.validate()?))
            .await
    }

    /// One page of ids of users blocked by the authenticating user
    pub async fn get_block_ids_paged(
        &self,
        options: &IdListOptions,
    ) -> Result<PagedResult<UserId>> {
        self.page(GraphFamily::BlockIds, without_user(options.validate()?))
            .await
    }

    /// Ids of users who retweeted a status, aggregated across pages
    pub async fn get_retweeters(&self, options: &RetweetersOptions) -> Result<Vec<UserId>> {
        self.aggregate(GraphFamily::RetweeterIds, options.validate()?)
            .await
    }

    /// One page of ids of users who retweeted a status
    pub async fn get_retweeters_paged(
        &self,
        options: &RetweetersOptions,
    ) -> Result<PagedResult<UserId>> {
        self.page(GraphFamily::RetweeterIds, options.validate()?)
            .await
    }

    fn paginator<T>(&self, family: GraphFamily) -> CursorPaginator<GraphEndpoint<'_, T>>
    where
        T: DeserializeOwned + Send,
    {
        let paginator = CursorPaginator::new(GraphEndpoint::new(&self.client, family));
        match self.budget {
            Some(budget) => paginator.with_budget(budget),
            None => paginator,
        }
    }

    async fn aggregate<T>(&self, family: GraphFamily, request: GraphRequest) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        debug!(
            path = family.path(),
            total_count = ?request.total_count,
            "Aggregating collection"
        );
        self.paginator(family)
            .fetch_all(&request.params, request.total_count)
            .await
    }

    async fn page<T>(&self, family: GraphFamily, request: GraphRequest) -> Result<PagedResult<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.paginator(family)
            .fetch_page(&request.params, request.cursor)
            .await
    }

    // ========================================================================
    // Single-shot endpoints
    // ========================================================================

    /// Statuses from accounts the authenticating user follows
    pub async fn get_home_timeline(&self, options: &TimelineOptions) -> Result<Vec<Status>> {
        let query = options.to_query()?;
        self.get("statuses/home_timeline.json", query).await
    }

    /// Statuses posted by the target user
    pub async fn get_user_timeline(&self, options: &UserTimelineOptions) -> Result<Vec<Status>> {
        let query = options.to_query()?;
        self.get("statuses/user_timeline.json", query).await
    }

    /// Statuses from the members of a list
    pub async fn get_list_timeline(&self, options: &ListTimelineOptions) -> Result<Vec<Status>> {
        let query = options.to_query()?;
        self.get("lists/statuses.json", query).await
    }

    /// Search recent statuses.
    ///
    /// Returns an empty result without a request when there is nothing to
    /// search for.
    pub async fn get_search(&self, options: &SearchOptions) -> Result<Vec<Status>> {
        let Some(query) = options.to_query()? else {
            debug!("Search has no term, query or geocode; skipping request");
            return Ok(Vec::new());
        };

        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            statuses: Vec<Status>,
        }

        let response: SearchResponse = self.get("search/tweets.json", query).await?;
        Ok(response.statuses)
    }

    /// Search users by term
    pub async fn get_users_search(&self, options: &UsersSearchOptions) -> Result<Vec<User>> {
        let query = options.to_query()?;
        self.get("users/search.json", query).await
    }

    /// A single user profile
    pub async fn get_user(&self, options: &UserShowOptions) -> Result<User> {
        let query = options.to_query()?;
        self.get("users/show.json", query).await
    }

    /// Up to 100 user profiles in one request
    pub async fn users_lookup(&self, options: &UsersLookupOptions) -> Result<Vec<User>> {
        let query = options.to_query()?;
        self.get("users/lookup.json", query).await
    }

    /// The most recent retweets of a status
    pub async fn get_retweets(&self, options: &RetweetsOptions) -> Result<Vec<Status>> {
        let (status_id, query) = options.validate()?;
        self.get(&format!("statuses/retweets/{status_id}.json"), query)
            .await
    }

    /// Statuses liked by the target user
    pub async fn get_favorites(&self, options: &FavoritesOptions) -> Result<Vec<Status>> {
        let query = options.to_query()?;
        self.get("favorites/list.json", query).await
    }

    /// Trending topics at a location
    pub async fn get_trends(&self, options: &TrendsOptions) -> Result<Vec<Trend>> {
        let query = options.to_query()?;

        #[derive(Deserialize)]
        struct TrendsResponse {
            #[serde(default)]
            trends: Vec<Trend>,
        }

        let locations: Vec<TrendsResponse> = self.get("trends/place.json", query).await?;
        Ok(locations
            .into_iter()
            .next()
            .map(|location| location.trends)
            .unwrap_or_default())
    }

    /// Worldwide trending topics
    pub async fn get_trends_current(&self, exclude_hashtags: bool) -> Result<Vec<Trend>> {
        self.get_trends(&TrendsOptions::worldwide().exclude_hashtags(exclude_hashtags))
            .await
    }

    /// Service configuration (t.co lengths, reserved names, limits).
    ///
    /// Fetched once per session.
    pub async fn get_help_configuration(&self) -> Result<JsonObject> {
        let config = self
            .help_config
            .get_or_try_init(|| self.get("help/configuration.json", QueryParams::new()))
            .await?;
        Ok(config.clone())
    }

    /// Characters a link takes once wrapped by t.co
    pub async fn get_short_url_length(&self, https: bool) -> Result<u64> {
        let key = if https {
            "short_url_length_https"
        } else {
            "short_url_length"
        };
        self.get_help_configuration()
            .await?
            .get(key)
            .and_then(JsonValue::as_u64)
            .ok_or_else(|| FetchError::decode(format!("help configuration has no '{key}'")).into())
    }

    /// The authenticating user, confirming the credentials work
    pub async fn verify_credentials(&self) -> Result<User> {
        self.get("account/verify_credentials.json", QueryParams::new())
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> Result<T> {
        self.client
            .get_json(path, RequestConfig::with_query(query))
            .await
    }
}

fn without_user(mut request: GraphRequest) -> GraphRequest {
    request.params.user = None;
    request
}

/// Builder for [`Api`]
#[derive(Debug, Default)]
pub struct ApiBuilder {
    http: Option<HttpClientConfig>,
    base_url: Option<String>,
    bearer_token: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    token_url: Option<String>,
    budget: Option<Duration>,
}

impl ApiBuilder {
    /// Use a prepared HTTP configuration
    #[must_use]
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http = Some(config);
        self
    }

    /// Override the API root
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Authenticate with a pre-issued bearer token
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Consumer key for app-only auth
    #[must_use]
    pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self
    }

    /// Consumer secret for app-only auth
    #[must_use]
    pub fn consumer_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Override the app-only token endpoint
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Limit how long one aggregation may take
    #[must_use]
    pub fn budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Build the session
    pub fn build(self) -> Result<Api> {
        let auth = AuthConfig::from_parts(
            self.bearer_token,
            self.consumer_key,
            self.consumer_secret,
            self.token_url,
        )?;

        let mut http = self.http.unwrap_or_default();
        if let Some(url) = self.base_url {
            http.base_url = url;
        }

        let client = HttpClient::with_auth(http, auth)?;
        Ok(Api {
            client,
            budget: self.budget,
            help_config: OnceCell::new(),
        })
    }
}
