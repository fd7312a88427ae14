//! Command-line arguments.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tiktok_research::{Condition, DEFAULT_MAX_COUNT, VideoQuery};

#[derive(Parser)]
#[command(author, version, about = "Query the TikTok Research API and print JSON lines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Exchange CLIENT_KEY / CLIENT_SECRET for an access token
    Token,

    /// Search videos
    Videos(VideoArgs),

    /// List comments on a video
    Comments {
        video_id: u64,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show a user's profile summary
    UserInfo { username: String },

    /// List a user's followers
    Followers {
        username: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List the accounts a user follows
    Following {
        username: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List videos a user liked
    Liked(UserVideoArgs),

    /// List videos pinned on a user's profile
    Pinned(UserVideoArgs),

    /// List videos a user reposted
    Reposted(UserVideoArgs),
}

#[derive(Args)]
pub struct PageArgs {
    /// Page size requested from the API
    #[arg(long, default_value_t = DEFAULT_MAX_COUNT)]
    pub max_count: u32,

    /// Stop after printing this many items
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct VideoArgs {
    /// First day of the search window (YYYY-MM-DD or YYYYMMDD)
    #[arg(long, value_parser = parse_date)]
    pub start_date: NaiveDate,

    /// Last day of the search window (YYYY-MM-DD or YYYYMMDD)
    #[arg(long, value_parser = parse_date)]
    pub end_date: NaiveDate,

    /// Full query object as JSON; combined with the filters below
    #[arg(long, value_parser = parse_query)]
    pub query: Option<VideoQuery>,

    /// Region code filter (repeatable)
    #[arg(long)]
    pub region: Vec<String>,

    /// Hashtag filter, without the leading `#` (repeatable)
    #[arg(long)]
    pub hashtag: Vec<String>,

    /// Keyword filter (repeatable)
    #[arg(long)]
    pub keyword: Vec<String>,

    /// Creator username filter (repeatable)
    #[arg(long)]
    pub username: Vec<String>,

    /// Ask for a random sample instead of the default ordering
    #[arg(long)]
    pub random: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

impl VideoArgs {
    /// Merge `--query` with the per-field filters. Each repeated filter
    /// becomes one `IN` clause under `and`.
    pub fn video_query(&self) -> VideoQuery {
        let mut query = self.query.clone().unwrap_or_default();
        let filters = [
            ("region_code", &self.region),
            ("hashtag_name", &self.hashtag),
            ("keyword", &self.keyword),
            ("username", &self.username),
        ];
        for (field, values) in filters {
            if !values.is_empty() {
                query = query.and(Condition::is_in(field, values.iter().cloned()));
            }
        }
        query
    }
}

#[derive(Args)]
pub struct UserVideoArgs {
    pub username: String,

    /// Start point as a date or RFC 3339 timestamp; defaults to now
    #[arg(long, value_parser = parse_start_time)]
    pub since: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub page: PageArgs,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| format!("expected YYYY-MM-DD or YYYYMMDD, got `{s}`"))
}

fn parse_start_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_date(s).map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn parse_query(s: &str) -> Result<VideoQuery, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid query JSON: {e}"))
}
