//! Per-operation option structs
//!
//! Options hold raw caller input. Each struct validates itself into the
//! query parameters or [`GraphParams`] for its endpoint, so a rejected
//! option never reaches the network.

use super::graph::GraphParams;
use crate::error::{Error, Result};
use crate::types::{query_bool, Cursor, QueryParams};
use crate::validate::{
    limits, resolve_list, resolve_user, validate_count, validate_id, validate_screen_name,
    validate_total_count, ParamValue,
};

/// Validated follow-graph request: page parameters plus the aggregation cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    /// Parameters sent with every page
    pub params: GraphParams,
    /// Maximum items to aggregate
    pub total_count: Option<usize>,
    /// Cursor for paged mode
    pub cursor: Cursor,
}

/// Shared identifier and paging fields of the cursored families
fn graph_request(
    screen_name: Option<&str>,
    user_id: Option<&ParamValue>,
    count: Option<&ParamValue>,
    total_count: Option<&ParamValue>,
    cursor: Cursor,
    max: u32,
) -> Result<GraphRequest> {
    let user = resolve_user(screen_name, user_id)?;
    let mut count = match count {
        Some(value) => validate_count("count", value, max)?,
        None => max,
    };
    let total_count = total_count.map(validate_total_count).transpose()?;

    if let Some(total) = total_count {
        if total > 0 && total < count as usize {
            count = total as u32;
        }
    }

    Ok(GraphRequest {
        params: GraphParams::new(user, count),
        total_count,
        cursor,
    })
}

// ============================================================================
// Cursored families
// ============================================================================

/// Options for user-object lists (friends, followers, blocks)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListOptions {
    /// Target handle
    pub screen_name: Option<String>,
    /// Target numeric id
    pub user_id: Option<ParamValue>,
    /// Page size, at most 200
    pub count: Option<ParamValue>,
    /// Maximum users to aggregate
    pub total_count: Option<ParamValue>,
    /// Starting cursor for paged requests
    pub cursor: Cursor,
    /// Omit the embedded latest status
    pub skip_status: bool,
    /// Include the `entities` node
    pub include_user_entities: bool,
}

impl Default for UserListOptions {
    fn default() -> Self {
        Self {
            screen_name: None,
            user_id: None,
            count: None,
            total_count: None,
            cursor: Cursor::START,
            skip_status: false,
            include_user_entities: true,
        }
    }
}

impl UserListOptions {
    /// Options targeting the authenticating user
    pub fn new() -> Self {
        Self::default()
    }

    /// Options targeting a handle
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self::new().screen_name(screen_name)
    }

    /// Options targeting a numeric id
    pub fn for_user_id(user_id: impl Into<ParamValue>) -> Self {
        Self::new().user_id(user_id)
    }

    #[must_use]
    pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<ParamValue>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn total_count(mut self, total_count: impl Into<ParamValue>) -> Self {
        self.total_count = Some(total_count.into());
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.cursor = cursor.into();
        self
    }

    #[must_use]
    pub fn skip_status(mut self, skip_status: bool) -> Self {
        self.skip_status = skip_status;
        self
    }

    #[must_use]
    pub fn include_user_entities(mut self, include: bool) -> Self {
        self.include_user_entities = include;
        self
    }

    /// Validate into a request
    pub fn validate(&self) -> Result<GraphRequest> {
        let mut request = graph_request(
            self.screen_name.as_deref(),
            self.user_id.as_ref(),
            self.count.as_ref(),
            self.total_count.as_ref(),
            self.cursor,
            limits::USER_PAGE,
        )?;
        request.params = request
            .params
            .flag("skip_status", self.skip_status)
            .flag("include_user_entities", self.include_user_entities);
        Ok(request)
    }
}

/// Options for id lists (friend ids, follower ids, block ids)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdListOptions {
    /// Target handle
    pub screen_name: Option<String>,
    /// Target numeric id
    pub user_id: Option<ParamValue>,
    /// Page size, at most 5000
    pub count: Option<ParamValue>,
    /// Maximum ids to aggregate
    pub total_count: Option<ParamValue>,
    /// Starting cursor for paged requests
    pub cursor: Cursor,
    /// Return ids as strings
    pub stringify_ids: bool,
}

impl Default for IdListOptions {
    fn default() -> Self {
        Self {
            screen_name: None,
            user_id: None,
            count: None,
            total_count: None,
            cursor: Cursor::START,
            stringify_ids: false,
        }
    }
}

impl IdListOptions {
    /// Options targeting the authenticating user
    pub fn new() -> Self {
        Self::default()
    }

    /// Options targeting a handle
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self::new().screen_name(screen_name)
    }

    /// Options targeting a numeric id
    pub fn for_user_id(user_id: impl Into<ParamValue>) -> Self {
        Self::new().user_id(user_id)
    }

    #[must_use]
    pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<ParamValue>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn total_count(mut self, total_count: impl Into<ParamValue>) -> Self {
        self.total_count = Some(total_count.into());
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.cursor = cursor.into();
        self
    }

    #[must_use]
    pub fn stringify_ids(mut self, stringify: bool) -> Self {
        self.stringify_ids = stringify;
        self
    }

    /// Validate into a request
    pub fn validate(&self) -> Result<GraphRequest> {
        let mut request = graph_request(
            self.screen_name.as_deref(),
            self.user_id.as_ref(),
            self.count.as_ref(),
            self.total_count.as_ref(),
            self.cursor,
            limits::ID_PAGE,
        )?;
        request.params = request.params.flag("stringify_ids", self.stringify_ids);
        Ok(request)
    }
}

// ============================================================================
// Timelines
// ============================================================================

fn insert_count(query: &mut QueryParams, count: Option<&ParamValue>, max: u32) -> Result<()> {
    if let Some(value) = count {
        let n = validate_count("count", value, max)?;
        query.insert("count".to_string(), n.to_string());
    }
    Ok(())
}

fn insert_id(query: &mut QueryParams, field: &str, value: Option<&ParamValue>) -> Result<()> {
    if let Some(value) = value {
        let id = validate_id(field, value)?;
        query.insert(field.to_string(), id.to_string());
    }
    Ok(())
}

fn insert_flag(query: &mut QueryParams, field: &str, value: Option<bool>) {
    if let Some(value) = value {
        query.insert(field.to_string(), query_bool(value));
    }
}

/// Options for the home timeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Statuses to return, at most 200
    pub count: Option<ParamValue>,
    /// Only statuses newer than this id
    pub since_id: Option<ParamValue>,
    /// Only statuses at or older than this id
    pub max_id: Option<ParamValue>,
    /// Reduce embedded users to their id
    pub trim_user: Option<bool>,
    /// Drop replies from the result
    pub exclude_replies: Option<bool>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl TimelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn since_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.since_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn max_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.max_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn trim_user(mut self, trim: bool) -> Self {
        self.trim_user = Some(trim);
        self
    }

    #[must_use]
    pub fn exclude_replies(mut self, exclude: bool) -> Self {
        self.exclude_replies = Some(exclude);
        self
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let mut query = QueryParams::new();
        insert_count(&mut query, self.count.as_ref(), limits::TIMELINE)?;
        insert_id(&mut query, "since_id", self.since_id.as_ref())?;
        insert_id(&mut query, "max_id", self.max_id.as_ref())?;
        insert_flag(&mut query, "trim_user", self.trim_user);
        insert_flag(&mut query, "exclude_replies", self.exclude_replies);
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(query)
    }
}

/// Options for a user's timeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTimelineOptions {
    /// Target handle
    pub screen_name: Option<String>,
    /// Target numeric id
    pub user_id: Option<ParamValue>,
    /// Include retweets
    pub include_rts: Option<bool>,
    /// Count, id range and flags shared with the home timeline
    pub timeline: TimelineOptions,
}

impl UserTimelineOptions {
    /// Options targeting a handle
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            ..Self::default()
        }
    }

    /// Options targeting a numeric id
    pub fn for_user_id(user_id: impl Into<ParamValue>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn include_rts(mut self, include: bool) -> Self {
        self.include_rts = Some(include);
        self
    }

    #[must_use]
    pub fn timeline(mut self, timeline: TimelineOptions) -> Self {
        self.timeline = timeline;
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let mut query = self.timeline.to_query()?;
        if let Some(user) = resolve_user(self.screen_name.as_deref(), self.user_id.as_ref())? {
            user.apply(&mut query);
        }
        insert_flag(&mut query, "include_rts", self.include_rts);
        Ok(query)
    }
}

/// Options for a list timeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTimelineOptions {
    /// Numeric list id
    pub list_id: Option<ParamValue>,
    /// List slug, requires an owner
    pub slug: Option<String>,
    /// Owner numeric id
    pub owner_id: Option<ParamValue>,
    /// Owner handle
    pub owner_screen_name: Option<String>,
    /// Include retweets
    pub include_rts: Option<bool>,
    /// Count, id range and flags shared with the home timeline
    pub timeline: TimelineOptions,
}

impl ListTimelineOptions {
    /// Options for a list id
    pub fn for_list_id(list_id: impl Into<ParamValue>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            ..Self::default()
        }
    }

    /// Options for a slug owned by a handle
    pub fn for_slug(slug: impl Into<String>, owner_screen_name: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            owner_screen_name: Some(owner_screen_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: impl Into<ParamValue>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    #[must_use]
    pub fn include_rts(mut self, include: bool) -> Self {
        self.include_rts = Some(include);
        self
    }

    #[must_use]
    pub fn timeline(mut self, timeline: TimelineOptions) -> Self {
        self.timeline = timeline;
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let list = resolve_list(
            self.list_id.as_ref(),
            self.slug.as_deref(),
            self.owner_id.as_ref(),
            self.owner_screen_name.as_deref(),
        )?;
        let mut query = self.timeline.to_query()?;
        list.apply(&mut query);
        insert_flag(&mut query, "include_rts", self.include_rts);
        Ok(query)
    }
}

// ============================================================================
// Search
// ============================================================================

/// Ordering of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    /// Popular and recent results
    #[default]
    Mixed,
    /// Most recent results only
    Recent,
    /// Most popular results only
    Popular,
}

impl ResultType {
    /// Query value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Recent => "recent",
            Self::Popular => "popular",
        }
    }
}

impl std::str::FromStr for ResultType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mixed" => Ok(Self::Mixed),
            "recent" => Ok(Self::Recent),
            "popular" => Ok(Self::Popular),
            other => Err(Error::invalid_param(
                "result_type",
                format!("must be one of mixed, recent, popular, got '{other}'"),
            )),
        }
    }
}

/// Options for status search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Search term
    pub term: Option<String>,
    /// Pre-encoded query string, used verbatim instead of the other fields
    pub raw_query: Option<String>,
    /// `(latitude, longitude, radius)` such as `(37.78, -122.40, "1mi")`
    pub geocode: Option<(f64, f64, String)>,
    /// Only statuses newer than this id
    pub since_id: Option<ParamValue>,
    /// Only statuses at or older than this id
    pub max_id: Option<ParamValue>,
    /// Only statuses before this date (`YYYY-MM-DD`)
    pub until: Option<String>,
    /// Statuses to return, at most 100
    pub count: Option<ParamValue>,
    /// Restrict to a language code
    pub lang: Option<String>,
    /// Result ordering
    pub result_type: Option<ResultType>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl SearchOptions {
    /// Search for a term
    pub fn for_term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Self::default()
        }
    }

    /// Search with a pre-encoded query string
    pub fn raw(query: impl Into<String>) -> Self {
        Self {
            raw_query: Some(query.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn geocode(mut self, latitude: f64, longitude: f64, radius: impl Into<String>) -> Self {
        self.geocode = Some((latitude, longitude, radius.into()));
        self
    }

    #[must_use]
    pub fn since_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.since_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn max_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.max_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn until(mut self, date: impl Into<String>) -> Self {
        self.until = Some(date.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = Some(result_type);
        self
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters.
    ///
    /// Returns `None` when there is nothing to search for.
    pub fn to_query(&self) -> Result<Option<QueryParams>> {
        if let Some(raw) = self.raw_query.as_deref() {
            let raw = raw.trim_start_matches('?');
            let query: QueryParams = url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect();
            return Ok(Some(query));
        }

        let term = self.term.as_deref().filter(|t| !t.trim().is_empty());
        if term.is_none() && self.geocode.is_none() {
            return Ok(None);
        }

        let mut query = QueryParams::new();
        if let Some(term) = term {
            query.insert("q".to_string(), term.to_string());
        }
        if let Some((lat, long, radius)) = &self.geocode {
            query.insert("geocode".to_string(), format!("{lat},{long},{radius}"));
        }
        insert_count(&mut query, self.count.as_ref(), limits::SEARCH)?;
        insert_id(&mut query, "since_id", self.since_id.as_ref())?;
        insert_id(&mut query, "max_id", self.max_id.as_ref())?;
        if let Some(until) = &self.until {
            chrono::NaiveDate::parse_from_str(until, "%Y-%m-%d").map_err(|_| {
                Error::invalid_param("until", format!("must be a YYYY-MM-DD date, got '{until}'"))
            })?;
            query.insert("until".to_string(), until.clone());
        }
        if let Some(lang) = &self.lang {
            query.insert("lang".to_string(), lang.clone());
        }
        if let Some(result_type) = self.result_type {
            query.insert("result_type".to_string(), result_type.as_str().to_string());
        }
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(Some(query))
    }
}

/// Options for user search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersSearchOptions {
    /// Search term, required
    pub term: String,
    /// Page of results, starting at 1
    pub page: Option<ParamValue>,
    /// Users per page, at most 20
    pub count: Option<ParamValue>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl UsersSearchOptions {
    /// Search for a term
    pub fn for_term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<ParamValue>) -> Self {
        self.page = Some(page.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let term = self.term.trim();
        if term.is_empty() {
            return Err(Error::invalid_param("term", "must not be empty"));
        }

        let mut query = QueryParams::new();
        query.insert("q".to_string(), term.to_string());
        insert_count(&mut query, self.count.as_ref(), limits::USER_SEARCH)?;
        if let Some(page) = &self.page {
            let page = validate_id("page", page)?;
            query.insert("page".to_string(), page.to_string());
        }
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(query)
    }
}

// ============================================================================
// Statuses and users
// ============================================================================

/// Options for the ids of accounts that retweeted a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetweetersOptions {
    /// Retweeted status
    pub status_id: ParamValue,
    /// Page size, at most 100
    pub count: Option<ParamValue>,
    /// Maximum ids to aggregate
    pub total_count: Option<ParamValue>,
    /// Starting cursor for paged requests
    pub cursor: Cursor,
    /// Return ids as strings
    pub stringify_ids: bool,
}

impl RetweetersOptions {
    /// Options for the retweeters of a status
    pub fn for_status(status_id: impl Into<ParamValue>) -> Self {
        Self {
            status_id: status_id.into(),
            count: None,
            total_count: None,
            cursor: Cursor::START,
            stringify_ids: false,
        }
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn total_count(mut self, total_count: impl Into<ParamValue>) -> Self {
        self.total_count = Some(total_count.into());
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.cursor = cursor.into();
        self
    }

    #[must_use]
    pub fn stringify_ids(mut self, stringify: bool) -> Self {
        self.stringify_ids = stringify;
        self
    }

    /// Validate into a request
    pub fn validate(&self) -> Result<GraphRequest> {
        let status_id = validate_id("status_id", &self.status_id)?;
        let mut request = graph_request(
            None,
            None,
            self.count.as_ref(),
            self.total_count.as_ref(),
            self.cursor,
            limits::RETWEETS,
        )?;
        request.params = request
            .params
            .status(status_id)
            .flag("stringify_ids", self.stringify_ids);
        Ok(request)
    }
}

/// Options for the most recent retweets of a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetweetsOptions {
    /// Retweeted status
    pub status_id: ParamValue,
    /// Retweets to return, at most 100
    pub count: Option<ParamValue>,
    /// Reduce embedded users to their id
    pub trim_user: Option<bool>,
}

impl RetweetsOptions {
    /// Options for the retweets of a status
    pub fn for_status(status_id: impl Into<ParamValue>) -> Self {
        Self {
            status_id: status_id.into(),
            count: None,
            trim_user: None,
        }
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn trim_user(mut self, trim: bool) -> Self {
        self.trim_user = Some(trim);
        self
    }

    /// Validate into the status id and query parameters
    pub fn validate(&self) -> Result<(u64, QueryParams)> {
        let status_id = validate_id("status_id", &self.status_id)?;
        let mut query = QueryParams::new();
        insert_count(&mut query, self.count.as_ref(), limits::RETWEETS)?;
        insert_flag(&mut query, "trim_user", self.trim_user);
        Ok((status_id, query))
    }
}

/// Options for statuses liked by a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesOptions {
    /// Target handle
    pub screen_name: Option<String>,
    /// Target numeric id
    pub user_id: Option<ParamValue>,
    /// Statuses to return, at most 200
    pub count: Option<ParamValue>,
    /// Only statuses newer than this id
    pub since_id: Option<ParamValue>,
    /// Only statuses at or older than this id
    pub max_id: Option<ParamValue>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl FavoritesOptions {
    /// Options targeting the authenticating user
    pub fn new() -> Self {
        Self::default()
    }

    /// Options targeting a handle
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            ..Self::default()
        }
    }

    /// Options targeting a numeric id
    pub fn for_user_id(user_id: impl Into<ParamValue>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<ParamValue>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn since_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.since_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn max_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.max_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let mut query = QueryParams::new();
        if let Some(user) = resolve_user(self.screen_name.as_deref(), self.user_id.as_ref())? {
            user.apply(&mut query);
        }
        insert_count(&mut query, self.count.as_ref(), limits::TIMELINE)?;
        insert_id(&mut query, "since_id", self.since_id.as_ref())?;
        insert_id(&mut query, "max_id", self.max_id.as_ref())?;
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(query)
    }
}

/// Options for a single user profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserShowOptions {
    /// Target handle
    pub screen_name: Option<String>,
    /// Target numeric id
    pub user_id: Option<ParamValue>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl UserShowOptions {
    /// Options for a handle
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            ..Self::default()
        }
    }

    /// Options for a numeric id
    pub fn for_user_id(user_id: impl Into<ParamValue>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters.
    ///
    /// Unlike the collections, one identifier is required.
    pub fn to_query(&self) -> Result<QueryParams> {
        let user = resolve_user(self.screen_name.as_deref(), self.user_id.as_ref())?
            .ok_or_else(|| Error::invalid_param("user_id", "a screen_name or user_id is required"))?;

        let mut query = QueryParams::new();
        user.apply(&mut query);
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(query)
    }
}

/// Options for a bulk profile lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersLookupOptions {
    /// Numeric ids to look up
    pub user_ids: Vec<ParamValue>,
    /// Handles to look up
    pub screen_names: Vec<String>,
    /// Include the `entities` node
    pub include_entities: Option<bool>,
}

impl UsersLookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one numeric id
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<ParamValue>) -> Self {
        self.user_ids.push(user_id.into());
        self
    }

    /// Add several numeric ids
    #[must_use]
    pub fn user_ids<I, V>(mut self, user_ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.user_ids.extend(user_ids.into_iter().map(Into::into));
        self
    }

    /// Add one handle
    #[must_use]
    pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_names.push(screen_name.into());
        self
    }

    #[must_use]
    pub fn include_entities(mut self, include: bool) -> Self {
        self.include_entities = Some(include);
        self
    }

    /// Validate into query parameters with comma-joined identifiers
    pub fn to_query(&self) -> Result<QueryParams> {
        let requested = self.user_ids.len() + self.screen_names.len();
        if requested == 0 {
            return Err(Error::invalid_param(
                "user_id",
                "at least one user_id or screen_name is required",
            ));
        }
        if requested > limits::USER_LOOKUP {
            return Err(Error::invalid_param(
                "user_id",
                format!(
                    "at most {} users per lookup, got {requested}",
                    limits::USER_LOOKUP
                ),
            ));
        }

        let mut query = QueryParams::new();
        if !self.user_ids.is_empty() {
            let ids = self
                .user_ids
                .iter()
                .map(|id| validate_id("user_id", id).map(|id| id.to_string()))
                .collect::<Result<Vec<_>>>()?;
            query.insert("user_id".to_string(), ids.join(","));
        }
        if !self.screen_names.is_empty() {
            let names = self
                .screen_names
                .iter()
                .map(|name| validate_screen_name("screen_name", name))
                .collect::<Result<Vec<_>>>()?;
            query.insert("screen_name".to_string(), names.join(","));
        }
        insert_flag(&mut query, "include_entities", self.include_entities);
        Ok(query)
    }
}

// ============================================================================
// Trends
// ============================================================================

/// Yahoo! Where On Earth id of the whole world
pub const WORLDWIDE_WOEID: u64 = 1;

/// Options for trending topics at a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsOptions {
    /// Location as a Where On Earth id
    pub woeid: ParamValue,
    /// Leave hashtags out of the result
    pub exclude_hashtags: bool,
}

impl Default for TrendsOptions {
    fn default() -> Self {
        Self::worldwide()
    }
}

impl TrendsOptions {
    /// Worldwide trends
    pub fn worldwide() -> Self {
        Self::for_woeid(WORLDWIDE_WOEID)
    }

    /// Trends for a location
    pub fn for_woeid(woeid: impl Into<ParamValue>) -> Self {
        Self {
            woeid: woeid.into(),
            exclude_hashtags: false,
        }
    }

    #[must_use]
    pub fn exclude_hashtags(mut self, exclude: bool) -> Self {
        self.exclude_hashtags = exclude;
        self
    }

    /// Validate into query parameters
    pub fn to_query(&self) -> Result<QueryParams> {
        let woeid = validate_id("woeid", &self.woeid)?;
        let mut query = QueryParams::new();
        query.insert("id".to_string(), woeid.to_string());
        if self.exclude_hashtags {
            query.insert("exclude".to_string(), "hashtags".to_string());
        }
        Ok(query)
    }
}
