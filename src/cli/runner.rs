//! CLI runner - executes commands

use crate::api::{Api, GraphFamily, PagedResult};
use crate::cli::commands::{Cli, Commands, IdListArgs, OutputFormat, SearchArgs, UserListArgs};
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let api = Api::from_config(&self.load_config()?)?;

        match &self.cli.command {
            Commands::Check => self.check(&api).await,
            Commands::Friends(args) => self.user_list(&api, GraphFamily::Friends, args).await,
            Commands::Followers(args) => self.user_list(&api, GraphFamily::Followers, args).await,
            Commands::Blocks(args) => self.user_list(&api, GraphFamily::Blocks, args).await,
            Commands::FriendIds(args) => self.id_list(&api, GraphFamily::FriendIds, args).await,
            Commands::FollowerIds(args) => {
                self.id_list(&api, GraphFamily::FollowerIds, args).await
            }
            Commands::BlockIds(args) => self.id_list(&api, GraphFamily::BlockIds, args).await,
            Commands::Search(args) => self.search(&api, args).await,
        }
    }

    /// Load configuration from `--config` (if any) plus the environment
    fn load_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("loading --config {}", path.display()))?,
            None => ClientConfig::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Check credentials
    async fn check(&self, api: &Api) -> Result<()> {
        match api.verify_credentials().await {
            Ok(user) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": format!("Authenticated as @{}", user.screen_name)
                    }
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
                Err(e)
            }
        }
    }

    async fn user_list(&self, api: &Api, family: GraphFamily, args: &UserListArgs) -> Result<()> {
        let options = args.to_options();
        let started = Instant::now();

        if args.graph.paged {
            let page = match family {
                GraphFamily::Friends => api.get_friends_paged(&options).await?,
                GraphFamily::Followers => api.get_followers_paged(&options).await?,
                _ => api.get_blocks_paged(&options).await?,
            };
            self.emit_page(family, page);
        } else {
            let users = match family {
                GraphFamily::Friends => api.get_friends(&options).await?,
                GraphFamily::Followers => api.get_followers(&options).await?,
                _ => api.get_blocks(&options).await?,
            };
            self.emit_records(family, &users);
        }

        info!(path = family.path(), elapsed = ?started.elapsed(), "Done");
        Ok(())
    }

    async fn id_list(&self, api: &Api, family: GraphFamily, args: &IdListArgs) -> Result<()> {
        let options = args.to_options();
        let started = Instant::now();

        if args.graph.paged {
            let page = match family {
                GraphFamily::FriendIds => api.get_friend_ids_paged(&options).await?,
                GraphFamily::FollowerIds => api.get_follower_ids_paged(&options).await?,
                _ => api.get_block_ids_paged(&options).await?,
            };
            self.emit_page(family, page);
        } else {
            let ids = match family {
                GraphFamily::FriendIds => api.get_friend_ids(&options).await?,
                GraphFamily::FollowerIds => api.get_follower_ids(&options).await?,
                _ => api.get_block_ids(&options).await?,
            };
            self.emit_records(family, &ids);
        }

        info!(path = family.path(), elapsed = ?started.elapsed(), "Done");
        Ok(())
    }

    async fn search(&self, api: &Api, args: &SearchArgs) -> Result<()> {
        let options = args.to_options()?;
        let statuses = api.get_search(&options).await?;

        for status in &statuses {
            self.output_message(&json!({
                "type": "RECORD",
                "record": { "stream": "search", "data": status }
            }));
        }
        self.output_summary("search", statuses.len());
        Ok(())
    }

    fn emit_records<T: Serialize>(&self, family: GraphFamily, items: &[T]) {
        let stream = stream_name(family);
        for item in items {
            self.output_message(&json!({
                "type": "RECORD",
                "record": { "stream": stream, "data": item }
            }));
        }
        self.output_summary(stream, items.len());
    }

    fn emit_page<T: Serialize>(&self, family: GraphFamily, page: PagedResult<T>) {
        let (next_cursor, previous_cursor, items) = page.into_parts();
        self.emit_records(family, &items);
        self.output_message(&json!({
            "type": "CURSOR",
            "cursor": {
                "stream": stream_name(family),
                "next_cursor": next_cursor,
                "previous_cursor": previous_cursor
            }
        }));
    }

    fn output_summary(&self, stream: &str, count: usize) {
        self.output_message(&json!({
            "type": "SUMMARY",
            "summary": { "stream": stream, "records": count }
        }));
    }

    /// Print one message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn stream_name(family: GraphFamily) -> &'static str {
    match family {
        GraphFamily::Friends => "friends",
        GraphFamily::Followers => "followers",
        GraphFamily::FriendIds => "friend_ids",
        GraphFamily::FollowerIds => "follower_ids",
        GraphFamily::Blocks => "blocks",
        GraphFamily::BlockIds => "block_ids",
        GraphFamily::RetweeterIds => "retweeter_ids",
    }
}
