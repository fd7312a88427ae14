//! Command-line front end for the research API client.
//!
//! Results go to stdout as JSON lines; logs go to stderr.

mod args;

use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use futures_util::StreamExt;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tiktok_research::{
    BearerToken, ClientConfig, ItemStream, QueryVideosRequest, ResearchAuth, ResearchClient,
};

use crate::args::{Cli, Command, PageArgs, UserVideoArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    let token = fetch_token(&config).await?;
    let client = ResearchClient::with_config(&token, config)?;
    run(&client, &token, cli.command).await
}

async fn run(
    client: &ResearchClient,
    token: &BearerToken,
    command: Command,
) -> anyhow::Result<()> {
    let printed = match command {
        Command::Token => {
            print_json(&serde_json::json!({ "access_token": token.as_str() }))?;
            1
        }
        Command::Videos(args) => {
            let mut request =
                QueryVideosRequest::new(args.video_query(), args.start_date, args.end_date)
                    .with_max_count(args.page.max_count);
            if args.random {
                request = request.with_random(true);
            }
            emit(client.query_videos(&request), &args.page).await?
        }
        Command::Comments { video_id, page } => {
            emit(client.query_video_comments(video_id, page.max_count), &page).await?
        }
        Command::UserInfo { username } => {
            let info = client.query_user_info(&username).await?;
            print_json(&info)?;
            1
        }
        Command::Followers { username, page } => {
            emit(client.query_user_followers(&username, page.max_count), &page).await?
        }
        Command::Following { username, page } => {
            emit(client.query_user_following(&username, page.max_count), &page).await?
        }
        Command::Liked(args) => {
            let (username, since) = user_video_target(&args);
            let stream = client.query_user_liked_videos(username, since, args.page.max_count);
            emit(stream, &args.page).await?
        }
        Command::Pinned(args) => {
            let (username, since) = user_video_target(&args);
            let stream = client.query_user_pinned_videos(username, since, args.page.max_count);
            emit(stream, &args.page).await?
        }
        Command::Reposted(args) => {
            let (username, since) = user_video_target(&args);
            let stream = client.query_user_reposted_videos(username, since, args.page.max_count);
            emit(stream, &args.page).await?
        }
    };

    tracing::info!(items = printed, "Done");
    Ok(())
}

fn user_video_target(args: &UserVideoArgs) -> (&str, chrono::DateTime<Utc>) {
    (&args.username, args.since.unwrap_or_else(Utc::now))
}

async fn fetch_token(config: &ClientConfig) -> anyhow::Result<BearerToken> {
    let client_key = std::env::var("CLIENT_KEY").context("CLIENT_KEY is not set")?;
    let client_secret = std::env::var("CLIENT_SECRET").context("CLIENT_SECRET is not set")?;

    let auth = ResearchAuth::new(client_key, client_secret, config)?;
    auth.create_bearer_token()
        .await
        .context("failed to obtain access token")
}

/// Print each item as it arrives. Dropping the stream at `--limit` stops
/// any further page requests.
async fn emit<T>(stream: ItemStream<T>, page: &PageArgs) -> anyhow::Result<usize>
where
    T: Serialize + Send + 'static,
{
    let mut stream = match page.limit {
        Some(limit) => stream.take(limit).boxed(),
        None => stream,
    };

    let mut printed = 0;
    while let Some(item) = stream.next().await {
        print_json(&item?)?;
        printed += 1;
    }
    Ok(printed)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let line = serde_json::to_string(value)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}

/// Load .env from the working directory, falling back to the parent so the
/// workspace-root file is found when run from `crates/research-cli`.
/// Variables already set in the process environment take precedence.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::debug!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using process environment");
}
