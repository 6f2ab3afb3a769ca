//! CLI commands and argument parsing

use crate::api::{IdListOptions, ResultType, SearchOptions, UserListOptions};
use crate::error::Result;
use crate::validate::ParamValue;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Follow-graph, timeline and search client
#[derive(Parser, Debug)]
#[command(name = "tweetgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the configured credentials
    Check,

    /// Accounts the user follows
    Friends(UserListArgs),

    /// Accounts following the user
    Followers(UserListArgs),

    /// Ids of accounts the user follows
    FriendIds(IdListArgs),

    /// Ids of accounts following the user
    FollowerIds(IdListArgs),

    /// Accounts blocked by the authenticating user
    Blocks(UserListArgs),

    /// Ids of accounts blocked by the authenticating user
    BlockIds(IdListArgs),

    /// Search recent statuses
    Search(SearchArgs),
}

/// Identifier and paging flags shared by the cursored families
#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Target handle (defaults to the authenticating user)
    #[arg(long)]
    pub screen_name: Option<String>,

    /// Target numeric id
    #[arg(long)]
    pub user_id: Option<String>,

    /// Page size hint
    #[arg(long)]
    pub count: Option<String>,

    /// Maximum items to collect across pages
    #[arg(long)]
    pub total_count: Option<String>,

    /// Fetch a single page and print its cursors
    #[arg(long)]
    pub paged: bool,

    /// Cursor for --paged
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub cursor: i64,
}

/// Flags for user-object lists
#[derive(Args, Debug, Clone, Default)]
pub struct UserListArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Omit each user's latest status
    #[arg(long)]
    pub skip_status: bool,

    /// Omit the entities node
    #[arg(long)]
    pub no_user_entities: bool,
}

/// Flags for id lists
#[derive(Args, Debug, Clone, Default)]
pub struct IdListArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Return ids as strings
    #[arg(long)]
    pub stringify_ids: bool,
}

/// Flags for status search
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Search term
    pub term: Option<String>,

    /// Pre-encoded query string, overrides the other flags
    #[arg(long)]
    pub raw_query: Option<String>,

    /// Statuses to return
    #[arg(long)]
    pub count: Option<String>,

    /// mixed, recent or popular
    #[arg(long)]
    pub result_type: Option<String>,

    /// Language code
    #[arg(long)]
    pub lang: Option<String>,

    /// Only statuses before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn raw(value: Option<&String>) -> Option<ParamValue> {
    value.map(|v| ParamValue::Text(v.clone()))
}

impl UserListArgs {
    /// Options for the API call; values are validated by the call itself
    pub fn to_options(&self) -> UserListOptions {
        UserListOptions {
            screen_name: self.graph.screen_name.clone(),
            user_id: raw(self.graph.user_id.as_ref()),
            count: raw(self.graph.count.as_ref()),
            total_count: raw(self.graph.total_count.as_ref()),
            cursor: self.graph.cursor.into(),
            skip_status: self.skip_status,
            include_user_entities: !self.no_user_entities,
        }
    }
}

impl IdListArgs {
    /// Options for the API call; values are validated by the call itself
    pub fn to_options(&self) -> IdListOptions {
        IdListOptions {
            screen_name: self.graph.screen_name.clone(),
            user_id: raw(self.graph.user_id.as_ref()),
            count: raw(self.graph.count.as_ref()),
            total_count: raw(self.graph.total_count.as_ref()),
            cursor: self.graph.cursor.into(),
            stringify_ids: self.stringify_ids,
        }
    }
}

impl SearchArgs {
    /// Options for the API call
    pub fn to_options(&self) -> Result<SearchOptions> {
        let result_type = self
            .result_type
            .as_deref()
            .map(str::parse::<ResultType>)
            .transpose()?;

        Ok(SearchOptions {
            term: self.term.clone(),
            raw_query: self.raw_query.clone(),
            count: raw(self.count.as_ref()),
            result_type,
            lang: self.lang.clone(),
            until: self.until.clone(),
            ..SearchOptions::default()
        })
    }
}
