//! Client for the public Moltbook analytics API.
//!
//! Read-only and bearer-authenticated. The external schema drifts, so every
//! field is optional on the way in: missing numbers become 0, missing text a
//! placeholder. Every public method swallows failures and returns a fallback
//! (published stats, or an empty list) after logging.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{Result, SourceError};
use crate::remote::{build_http_client, parse_base_url, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_ANALYTICS_BASE_URL: &str = "https://www.moltbook.com/api/v1";
pub const DEFAULT_ANALYTICS_POLL_INTERVAL: Duration = Duration::from_secs(60);

// Published figures shown when the API is unreachable.
pub const FALLBACK_AGENT_COUNT: u64 = 17_656;
pub const FALLBACK_TOTAL_POSTS: u64 = 1_231_607;
pub const FALLBACK_TOTAL_COMMENTS: u64 = 12_160_905;
pub const FALLBACK_TOTAL_SUBMOLTS: u64 = 100;

const UNTITLED: &str = "Sin título";
const ANONYMOUS: &str = "Anonymous";
const DEFAULT_SUBMOLT: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_ANALYTICS_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Listing order of the posts endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    New,
    Hot,
    Top,
    Rising,
}

impl PostSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Hot => "hot",
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenPrice {
    pub usd: f64,
    pub change_24h: f64,
}

/// Network-wide activity figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkActivity {
    pub price: TokenPrice,
    pub market_cap: u64,
    pub volume_24h: u64,
    pub holders: u64,
    pub circulating_supply: String,
    pub active_agents: u64,
    pub transactions_24h: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_submolts: u64,
}

impl NetworkActivity {
    pub fn fallback() -> Self {
        Self {
            price: TokenPrice::default(),
            market_cap: 0,
            volume_24h: 0,
            holders: FALLBACK_AGENT_COUNT,
            circulating_supply: "N/A".to_string(),
            active_agents: FALLBACK_AGENT_COUNT,
            transactions_24h: FALLBACK_TOTAL_COMMENTS,
            total_posts: FALLBACK_TOTAL_POSTS,
            total_comments: FALLBACK_TOTAL_COMMENTS,
            total_submolts: FALLBACK_TOTAL_SUBMOLTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub author_id: String,
    pub upvotes: i64,
    pub comments: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub submolt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentActivity {
    pub agent_id: String,
    pub name: String,
    pub collaborations: u64,
    pub reputation: i64,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submolt {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: u64,
    pub posts: u64,
}

/// A post viewed as a ledger-style activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub hash: String,
    pub kind: String,
    pub from: String,
    pub to: String,
    pub amount: i64,
    /// Unix millis; 0 when the post had no timestamp.
    pub timestamp_ms: i64,
}

impl From<&Post> for ActivityRecord {
    fn from(post: &Post) -> Self {
        Self {
            hash: post.id.clone(),
            kind: "post".to_string(),
            from: post.author_name.clone(),
            to: post.submolt.clone(),
            amount: post.upvotes,
            timestamp_ms: post.created_at.map(|t| t.timestamp_millis()).unwrap_or(0),
        }
    }
}

/// Everything the analytics panel shows, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDigest {
    pub activity: NetworkActivity,
    pub hot_posts: Vec<Post>,
    pub top_posts: Vec<Post>,
    pub rising_posts: Vec<Post>,
    pub recent_posts: Vec<Post>,
    pub top_agents: Vec<AgentActivity>,
    pub submolts: Vec<Submolt>,
}

// ── Wire shapes ─────────────────────────────────────────────────────────────
//
// Every field is optional so a `null` degrades that field only, never the
// whole listing.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubmolts {
    success: Option<bool>,
    count: Option<u64>,
    total_posts: Option<u64>,
    total_comments: Option<u64>,
    submolts: Option<Vec<RawSubmolt>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubmolt {
    id: Option<String>,
    name: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    subscriber_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPosts {
    success: Option<bool>,
    posts: Option<Vec<RawPost>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    author: Option<RawAuthor>,
    upvotes: Option<i64>,
    comment_count: Option<u64>,
    created_at: Option<String>,
    submolt: Option<RawSubmoltRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAuthor {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubmoltRef {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAgents {
    success: Option<bool>,
    agents: Option<Vec<RawAgent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAgent {
    id: Option<String>,
    name: Option<String>,
    karma: Option<i64>,
    stats: Option<RawAgentStats>,
    is_claimed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAgentStats {
    posts: Option<u64>,
}

fn non_empty(value: Option<String>, placeholder: &str) -> String {
    value.filter(|s| !s.is_empty()).unwrap_or_else(|| placeholder.to_string())
}

fn non_zero(value: Option<u64>, fallback: u64) -> u64 {
    value.filter(|v| *v > 0).unwrap_or(fallback)
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        let author = raw.author.unwrap_or_default();
        Self {
            id: raw.id.unwrap_or_default(),
            title: non_empty(raw.title, UNTITLED),
            content: raw.content.unwrap_or_default(),
            author_name: non_empty(author.name, ANONYMOUS),
            author_id: author.id.unwrap_or_default(),
            upvotes: raw.upvotes.unwrap_or_default(),
            comments: raw.comment_count.unwrap_or_default(),
            created_at: raw
                .created_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|t| t.with_timezone(&Utc)),
            submolt: non_empty(raw.submolt.and_then(|s| s.name), DEFAULT_SUBMOLT),
        }
    }
}

impl From<RawAgent> for AgentActivity {
    fn from(raw: RawAgent) -> Self {
        Self {
            agent_id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            collaborations: raw.stats.and_then(|s| s.posts).unwrap_or_default(),
            reputation: raw.karma.unwrap_or_default(),
            verified: raw.is_claimed.unwrap_or_default(),
        }
    }
}

impl From<RawSubmolt> for Submolt {
    fn from(raw: RawSubmolt) -> Self {
        let name = raw
            .display_name
            .filter(|s| !s.is_empty())
            .or(raw.name)
            .unwrap_or_default();
        Self {
            id: raw.id.unwrap_or_default(),
            name,
            description: raw.description.unwrap_or_default(),
            members: raw.subscriber_count.unwrap_or_default(),
            posts: 0,
        }
    }
}

impl From<RawSubmolts> for NetworkActivity {
    fn from(raw: RawSubmolts) -> Self {
        let agents = non_zero(raw.count, FALLBACK_AGENT_COUNT);
        let comments = non_zero(raw.total_comments, FALLBACK_TOTAL_COMMENTS);
        let submolts = raw
            .submolts
            .as_ref()
            .map(|s| s.len() as u64)
            .filter(|n| *n > 0)
            .unwrap_or(FALLBACK_TOTAL_SUBMOLTS);
        Self {
            holders: agents,
            active_agents: agents,
            transactions_24h: comments,
            total_posts: non_zero(raw.total_posts, FALLBACK_TOTAL_POSTS),
            total_comments: comments,
            total_submolts: submolts,
            ..NetworkActivity::fallback()
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

pub struct AnalyticsClient {
    base_url: Url,
    client: Client,
}

impl AnalyticsClient {
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_http_client(config.api_key.as_deref(), config.timeout_secs)?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidConfig(format!("'{}' cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "Fetching analytics");

        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Network-wide figures, or the published fallback on any failure.
    pub async fn activity(&self) -> NetworkActivity {
        match self.fetch::<RawSubmolts>("submolts", &[]).await {
            Ok(raw) => NetworkActivity::from(raw),
            Err(e) => {
                tracing::warn!(error = %e, "Analytics stats unavailable, using fallback");
                NetworkActivity::fallback()
            }
        }
    }

    pub async fn posts(&self, sort: PostSort, limit: usize) -> Vec<Post> {
        let query = [("sort", sort.as_str().to_string()), ("limit", limit.to_string())];
        match self.fetch::<RawPosts>("posts", &query).await {
            Ok(RawPosts { success: Some(true), posts: Some(posts) }) => {
                posts.into_iter().map(Post::from).collect()
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(sort = sort.as_str(), error = %e, "Analytics posts unavailable");
                Vec::new()
            }
        }
    }

    /// Agents ordered by karma.
    pub async fn top_agents(&self, limit: usize) -> Vec<AgentActivity> {
        let query = [("sort", "karma".to_string()), ("limit", limit.to_string())];
        match self.fetch::<RawAgents>("agents", &query).await {
            Ok(RawAgents { success: Some(true), agents: Some(agents) }) => {
                agents.into_iter().map(AgentActivity::from).collect()
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Analytics agents unavailable");
                Vec::new()
            }
        }
    }

    pub async fn submolts(&self, limit: usize) -> Vec<Submolt> {
        match self.fetch::<RawSubmolts>("submolts", &[]).await {
            Ok(RawSubmolts { success: Some(true), submolts: Some(submolts), .. }) => {
                submolts.into_iter().take(limit).map(Submolt::from).collect()
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Analytics submolts unavailable");
                Vec::new()
            }
        }
    }

    /// Newest posts viewed as activity records.
    pub async fn recent_activity(&self, limit: usize) -> Vec<ActivityRecord> {
        self.posts(PostSort::New, limit)
            .await
            .iter()
            .map(ActivityRecord::from)
            .collect()
    }

    /// Fetch every panel concurrently.
    pub async fn digest(&self, post_limit: usize, agent_limit: usize) -> AnalyticsDigest {
        let (activity, hot_posts, top_posts, rising_posts, recent_posts, top_agents, submolts) = tokio::join!(
            self.activity(),
            self.posts(PostSort::Hot, post_limit),
            self.posts(PostSort::Top, post_limit),
            self.posts(PostSort::Rising, post_limit),
            self.posts(PostSort::New, post_limit),
            self.top_agents(agent_limit),
            self.submolts(agent_limit),
        );
        AnalyticsDigest {
            activity,
            hot_posts,
            top_posts,
            rising_posts,
            recent_posts,
            top_agents,
            submolts,
        }
    }

    /// Re-fetch the digest on a fixed interval and publish each result.
    /// The first tick fires immediately; the task ends when every receiver
    /// is dropped or the handle is aborted.
    pub fn spawn_polling(
        self: Arc<Self>,
        interval: Duration,
        post_limit: usize,
        agent_limit: usize,
    ) -> (watch::Receiver<Option<Arc<AnalyticsDigest>>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let digest = self.digest(post_limit, agent_limit).await;
                tracing::debug!(
                    hot_posts = digest.hot_posts.len(),
                    top_agents = digest.top_agents.len(),
                    "Analytics digest refreshed"
                );
                if tx.send(Some(Arc::new(digest))).is_err() {
                    break;
                }
            }
        });
        (rx, handle)
    }
}
