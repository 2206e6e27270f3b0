//! Plain-text rendering of the views for the terminal.

use molt_protocol::{Agent, Connection, TOKEN_SYMBOL};
use molt_source::analytics::{AnalyticsDigest, Post};
use molt_source::chat::{ChatMessage, ChatRole};
use molt_source::{Snapshot, SnapshotOrigin};
use molt_views::leaderboard::{podium, remaining};
use molt_views::{
    category_label, connection_label, format_compact, format_count, tier_of, GraphData, LeaderboardEntry,
    NetworkStats,
};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// One-line status of the snapshot being shown.
pub fn snapshot_banner(snapshot: &Snapshot) -> String {
    let origin = match snapshot.origin {
        SnapshotOrigin::Source => "live",
        SnapshotOrigin::Fallback => "fixture (source unavailable)",
    };
    format!(
        "MoltNet · {} agents · {} · updated {}",
        snapshot.agents.len(),
        origin,
        snapshot.fetched_at.format("%H:%M:%S")
    )
}

pub fn stats(stats: &NetworkStats) -> String {
    stats
        .rows()
        .into_iter()
        .map(|(label, value)| format!("{label:<12} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn signed_percent(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.1}%")
    } else {
        format!("{change:.1}%")
    }
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No agents yet.".to_string();
    }

    let mut lines = Vec::new();
    for (medal, entry) in MEDALS.iter().zip(podium(entries)) {
        lines.push(format!(
            "{medal} {:<12} {:>8} {TOKEN_SYMBOL}  {}  {}",
            entry.name,
            format_compact(entry.balance),
            entry.tier.label(),
            signed_percent(entry.weekly_change),
        ));
    }

    let rest = remaining(entries);
    if !rest.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{:>4}  {:<12} {:<12} {:>10} {:>8} {:>6} {:>6}",
            "#", "Agente", "Categoría", TOKEN_SYMBOL, "7d", "Tareas", "Colab"
        ));
        for entry in rest {
            lines.push(format!(
                "{:>4}  {:<12} {:<12} {:>10} {:>8} {:>6} {:>6}",
                entry.rank,
                entry.name,
                category_label(entry.category),
                format_compact(entry.balance),
                signed_percent(entry.weekly_change),
                entry.tasks_completed,
                entry.collaborations,
            ));
        }
    }
    lines.join("\n")
}

pub fn agent_table(agents: &[Agent]) -> String {
    if agents.is_empty() {
        return "No agents match.".to_string();
    }
    let mut lines = vec![format!(
        "{:>4}  {:<12} {:<12} {:>10}  {}",
        "#", "Agente", "Categoría", TOKEN_SYMBOL, "Estado"
    )];
    for agent in agents {
        lines.push(format!(
            "{:>4}  {:<12} {:<12} {:>10}  {}",
            agent.rank,
            agent.name,
            category_label(agent.category),
            format_compact(agent.balance),
            agent.status,
        ));
    }
    lines.join("\n")
}

/// Profile, token history (newest first) and relations of one agent.
pub fn agent_detail(agent: &Agent, connections: &[Connection]) -> String {
    let mut lines = vec![
        format!("{} ({})", agent.name, agent.id),
        format!(
            "{} · {} · rank #{}",
            category_label(agent.category),
            agent.status,
            agent.rank
        ),
        agent.description.clone(),
        format!(
            "Balance: {} {} ({})",
            agent.balance,
            agent.symbol,
            tier_of(agent.balance).label()
        ),
        format!("Recompensas totales: {}", format_compact(agent.total_rewards)),
        format!("Miembro desde: {}", agent.created_at.format("%Y-%m-%d")),
    ];

    if !agent.token_history.is_empty() {
        lines.push(String::new());
        lines.push("Historial:".to_string());
        for tx in agent.token_history.iter().rev() {
            lines.push(format!(
                "  {}  {:<8} {:>8}  {}",
                tx.timestamp.format("%Y-%m-%d"),
                tx.kind,
                tx.amount,
                tx.description
            ));
        }
    }

    let related: Vec<&Connection> = connections.iter().filter(|c| c.touches(&agent.id)).collect();
    if !related.is_empty() {
        lines.push(String::new());
        lines.push("Conexiones:".to_string());
        for conn in related {
            let other = if conn.source == agent.id { &conn.target } else { &conn.source };
            lines.push(format!(
                "  {:<12} {:<13} fuerza {}",
                other,
                connection_label(conn.kind),
                conn.effective_strength()
            ));
        }
    }
    lines.join("\n")
}

pub fn graph(graph: &GraphData) -> String {
    let mut lines = vec![format!("{} nodes, {} links", graph.nodes.len(), graph.links.len())];
    for node in &graph.nodes {
        lines.push(format!(
            "  {:<12} size {:>5.2}  {}",
            node.name, node.size, node.color
        ));
    }
    for link in &graph.links {
        lines.push(format!(
            "  {} -> {}  {} (width {:.1})",
            link.source,
            link.target,
            connection_label(link.kind),
            link.width
        ));
    }
    lines.join("\n")
}

fn post_line(post: &Post) -> String {
    format!(
        "  [{}] {} · {} ▲{} 💬{}",
        post.submolt, post.title, post.author_name, post.upvotes, post.comments
    )
}

pub fn digest(digest: &AnalyticsDigest) -> String {
    let a = &digest.activity;
    let mut lines = vec![
        format!("Agentes activos: {}", format_count(a.active_agents)),
        format!("Posts: {}", format_count(a.total_posts)),
        format!("Comentarios: {}", format_count(a.total_comments)),
        format!("Submolts: {}", a.total_submolts),
    ];

    for (title, posts) in [
        ("Hot", &digest.hot_posts),
        ("Top", &digest.top_posts),
        ("Rising", &digest.rising_posts),
        ("Recientes", &digest.recent_posts),
    ] {
        if posts.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{title}:"));
        lines.extend(posts.iter().map(post_line));
    }

    if !digest.top_agents.is_empty() {
        lines.push(String::new());
        lines.push("Top agentes:".to_string());
        for agent in &digest.top_agents {
            let mark = if agent.verified { " ✓" } else { "" };
            lines.push(format!("  {}{} · karma {}", agent.name, mark, agent.reputation));
        }
    }

    if !digest.submolts.is_empty() {
        lines.push(String::new());
        lines.push("Submolts:".to_string());
        for submolt in &digest.submolts {
            lines.push(format!("  m/{} · {} miembros", submolt.name, submolt.members));
        }
    }
    lines.join("\n")
}

pub fn chat_message(message: &ChatMessage) -> String {
    let who = match message.role {
        ChatRole::User => "tú",
        ChatRole::Assistant => "MoltNet AI",
    };
    format!("{who}> {}", message.content)
}
