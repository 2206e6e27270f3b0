//! moltnet: terminal dashboard for the MoltNet agent network.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use molt_dashboard::render;
use molt_dashboard::server::ApiServer;
use molt_dashboard::DashboardConfig;
use molt_protocol::Category;
use molt_source::fixture::DEFAULT_FIXTURE_SEED;
use molt_source::{
    AgentSource, AnalyticsClient, ChatRelay, ChatSession, DataSource, RemoteConfig, SnapshotFeed,
    SourceConfig,
};
use molt_views::{
    build_leaderboard_with, project_graph, sort_agents, top_ranked, GraphFilter, NetworkStats, SortKey,
};

#[derive(Parser)]
#[command(name = "moltnet", version, about = "MoltNet agent network dashboard")]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read from this API instead of the configured source.
    #[arg(long, global = true, env = "MOLTNET_API_BASE_URL")]
    remote: Option<String>,

    /// Bearer token for the remote API.
    #[arg(long, global = true, env = "MOLTNET_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Use the generated fixture with this seed.
    #[arg(long, global = true, conflicts_with = "remote")]
    seed: Option<u64>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    View(ViewCommand),

    /// Talk to the assistant relay. Reads stdin lines when no message is given.
    Chat { message: Option<String> },

    /// Moltbook network activity digest.
    Analytics {
        /// Keep polling and reprint the digest on every refresh.
        #[arg(long)]
        watch: bool,
        /// Seconds between refreshes (overrides config).
        #[arg(long, requires = "watch")]
        interval: Option<u64>,
    },
}

/// Commands that read the agent snapshot feed.
#[derive(Subcommand)]
enum ViewCommand {
    /// Top agents by balance, with podium.
    Leaderboard {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Project the network map.
    Graph {
        /// Case-insensitive substring of the agent name.
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<Category>,
    },

    /// List agents.
    Agents {
        /// rank, balance or name.
        #[arg(long, default_value = "rank")]
        sort: SortKey,
        #[arg(long)]
        category: Option<Category>,
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only the compact ranking list.
        #[arg(long)]
        top: bool,
    },

    /// Show one agent's profile, history and connections.
    Agent { id: String },

    /// Network totals.
    Stats,

    /// Poll the source and reprint the overview on every change.
    Watch {
        /// Seconds between refreshes (overrides config).
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Serve the read API over HTTP.
    Serve {
        /// Listen address (overrides config).
        #[arg(long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.remote {
        let mut remote = RemoteConfig::new(url.clone());
        remote.api_key = cli.api_key.clone();
        config.source = SourceConfig::Remote(remote);
    } else if let Some(seed) = cli.seed {
        config.source = SourceConfig::Fixture { seed };
    }

    match cli.command {
        Commands::Chat { message } => run_chat(&config, message).await,
        Commands::Analytics { watch: false, .. } => run_analytics(&config, cli.json).await,
        Commands::Analytics { watch: true, interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.poll.analytics_interval());
            run_analytics_watch(&config, interval, cli.json).await
        }
        Commands::View(command) => run_view(command, &config, cli.json).await,
    }
}

fn build_feed(config: &DashboardConfig) -> anyhow::Result<Arc<SnapshotFeed>> {
    let fallback_seed = match &config.source {
        SourceConfig::Fixture { seed } => *seed,
        SourceConfig::Remote(_) => DEFAULT_FIXTURE_SEED,
    };
    let source: Arc<dyn AgentSource> =
        Arc::new(DataSource::from_config(&config.source).context("failed to build data source")?);
    Ok(Arc::new(SnapshotFeed::with_fallback_seed(source, fallback_seed)))
}

async fn run_view(command: ViewCommand, config: &DashboardConfig, json: bool) -> anyhow::Result<()> {
    let feed = build_feed(config)?;

    match command {
        ViewCommand::Leaderboard { limit } => {
            let snapshot = feed.snapshot().await;
            let size = limit.unwrap_or(config.view.leaderboard_size);
            let entries = build_leaderboard_with(&snapshot.agents, size);
            emit(json, &entries, || render::leaderboard(&entries))?;
        }
        ViewCommand::Graph { search, category } => {
            let snapshot = feed.snapshot().await;
            let filter = GraphFilter::new(search, category);
            let graph = project_graph(&snapshot.agents, &snapshot.connections, &filter);
            emit(json, &graph, || render::graph(&graph))?;
        }
        ViewCommand::Agents {
            sort,
            category,
            search,
            top,
        } => {
            let snapshot = feed.snapshot().await;
            let filter = GraphFilter::new(search, category);
            let matching: Vec<_> = snapshot.agents.iter().filter(|a| filter.matches(a)).cloned().collect();
            let agents = if top {
                top_ranked(&matching, sort)
            } else {
                sort_agents(&matching, sort)
            };
            emit(json, &agents, || render::agent_table(&agents))?;
        }
        ViewCommand::Agent { id } => {
            let snapshot = feed.snapshot().await;
            let agent = snapshot
                .agent(&id)
                .with_context(|| format!("no agent with id '{id}'"))?;
            emit(json, agent, || render::agent_detail(agent, &snapshot.connections))?;
        }
        ViewCommand::Stats => {
            let snapshot = feed.snapshot().await;
            let stats = NetworkStats::compute(&snapshot.agents, &snapshot.connections);
            emit(json, &stats, || render::stats(&stats))?;
        }
        ViewCommand::Watch { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.poll.interval());
            run_watch(feed, interval, config.view.leaderboard_size).await?;
        }
        ViewCommand::Serve { listen } => {
            let listen = listen.unwrap_or(config.server.listen_addr.clone());
            let poller = feed.clone().spawn_polling(config.poll.interval());
            let result = ApiServer::new(listen, feed).run().await;
            poller.abort();
            result?;
        }
    }

    Ok(())
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn run_watch(feed: Arc<SnapshotFeed>, interval: Duration, size: usize) -> anyhow::Result<()> {
    let mut updates = feed.subscribe();
    let poller = feed.clone().spawn_polling(interval);
    tracing::info!(interval_secs = interval.as_secs(), "Watching agent network");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(snapshot) = updates.borrow_and_update().clone() else {
                    continue;
                };
                let stats = NetworkStats::compute(&snapshot.agents, &snapshot.connections);
                println!("{}", render::snapshot_banner(&snapshot));
                println!("{}\n", render::stats(&stats));
                println!("{}\n", render::leaderboard(&build_leaderboard_with(&snapshot.agents, size)));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    poller.abort();
    Ok(())
}

async fn run_chat(config: &DashboardConfig, message: Option<String>) -> anyhow::Result<()> {
    let relay = ChatRelay::new(config.chat.clone()).context("failed to build chat relay")?;
    let mut session = ChatSession::new(relay);

    if let Some(message) = message {
        if let Some(reply) = session.ask(&message).await {
            println!("{}", reply.content);
        }
        return Ok(());
    }

    if let Some(greeting) = session.messages().first() {
        println!("{}", render::chat_message(greeting));
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = session.ask(&line).await {
            println!("{}", render::chat_message(reply));
        }
    }
    Ok(())
}

async fn run_analytics(config: &DashboardConfig, json: bool) -> anyhow::Result<()> {
    let client = AnalyticsClient::new(config.analytics.clone()).context("failed to build analytics client")?;
    let digest = client
        .digest(config.view.post_limit, config.view.analytics_agent_limit)
        .await;
    emit(json, &digest, || render::digest(&digest))
}

async fn run_analytics_watch(config: &DashboardConfig, interval: Duration, json: bool) -> anyhow::Result<()> {
    let client = Arc::new(AnalyticsClient::new(config.analytics.clone()).context("failed to build analytics client")?);
    let (mut updates, poller) =
        client.spawn_polling(interval, config.view.post_limit, config.view.analytics_agent_limit);
    tracing::info!(interval_secs = interval.as_secs(), "Watching Moltbook activity");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(digest) = updates.borrow_and_update().clone() else {
                    continue;
                };
                emit(json, digest.as_ref(), || render::digest(&digest))?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping analytics watch");
                break;
            }
        }
    }

    poller.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_commands_route_to_feed() {
        let cli = Cli::try_parse_from(["moltnet", "stats"]).unwrap();
        assert!(matches!(cli.command, Commands::View(ViewCommand::Stats)));

        let cli = Cli::try_parse_from(["moltnet", "--json", "graph", "--category", "trader"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::View(ViewCommand::Graph { category: Some(Category::Trader), .. })
        ));
    }

    #[test]
    fn test_analytics_watch_flags() {
        let cli = Cli::try_parse_from(["moltnet", "analytics"]).unwrap();
        assert!(matches!(cli.command, Commands::Analytics { watch: false, interval: None }));

        let cli = Cli::try_parse_from(["moltnet", "analytics", "--watch", "--interval", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Analytics { watch: true, interval: Some(5) }));

        assert!(Cli::try_parse_from(["moltnet", "analytics", "--interval", "5"]).is_err());
    }
}
