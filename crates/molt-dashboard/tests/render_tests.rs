use chrono::Utc;
use molt_dashboard::render;
use molt_protocol::{Agent, Category, Connection, ConnectionKind, TokenTransaction, TransactionKind};
use molt_source::analytics::{AnalyticsDigest, NetworkActivity};
use molt_source::chat::{ChatMessage, ChatRole};
use molt_views::{build_leaderboard, project_graph, GraphFilter, NetworkStats};

fn agents() -> Vec<Agent> {
    (0..5u64)
        .map(|i| Agent::new(format!("a{i}"), format!("Agent{i}"), Category::Trader, 1_000 * (i + 1)))
        .collect()
}

#[test]
fn test_leaderboard_podium_and_table() {
    let text = render::leaderboard(&build_leaderboard(&agents()));
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("🥇 Agent4"));
    assert!(lines[1].starts_with("🥈 Agent3"));
    assert!(lines[2].starts_with("🥉 Agent2"));
    assert!(text.contains("Agent1"));
    assert!(text.contains("Agent0"));
    assert!(text.contains("5.0K"));
}

#[test]
fn test_empty_leaderboard() {
    assert_eq!(render::leaderboard(&[]), "No agents yet.");
}

#[test]
fn test_stats_rows() {
    let stats = NetworkStats::compute(&agents(), &[]);
    let text = render::stats(&stats);
    assert!(text.starts_with("Agentes"));
    assert!(text.contains("15.0K"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_agent_detail_lists_history_newest_first_and_relations() {
    let mut agent = Agent::new("a1", "Nova", Category::Researcher, 12_000);
    let mut first = TokenTransaction::new(TransactionKind::Reward, 100, "primero").unwrap();
    first.timestamp = Utc::now() - chrono::Duration::days(2);
    let second = TokenTransaction::new(TransactionKind::Stake, 50, "segundo").unwrap();
    agent.record_transaction(first);
    agent.record_transaction(second);

    let connections = vec![
        Connection::new("a2", "a1", ConnectionKind::Mentorship, 7),
        Connection::new("a3", "a4", ConnectionKind::Trade, 3),
    ];
    let text = render::agent_detail(&agent, &connections);

    assert!(text.contains("Investigador"));
    assert!(text.contains("Holder"));
    let newer = text.find("segundo").unwrap();
    let older = text.find("primero").unwrap();
    assert!(newer < older);
    assert!(text.contains("Mentoría"));
    assert!(text.contains("a2"));
    assert!(!text.contains("a3"));
}

#[test]
fn test_graph_summary_counts() {
    let agents = agents();
    let connections = vec![Connection::new("a0", "a1", ConnectionKind::Learning, 5)];
    let graph = project_graph(&agents, &connections, &GraphFilter::default());
    let text = render::graph(&graph);
    assert!(text.starts_with("5 nodes, 1 links"));
    assert!(text.contains("a0 -> a1"));
}

#[test]
fn test_chat_message_prefix() {
    let msg = ChatMessage {
        role: ChatRole::Assistant,
        content: "hola".to_string(),
    };
    assert_eq!(render::chat_message(&msg), "MoltNet AI> hola");
}

#[test]
fn test_digest_uses_millions_for_network_counts() {
    let digest = AnalyticsDigest {
        activity: NetworkActivity::fallback(),
        hot_posts: Vec::new(),
        top_posts: Vec::new(),
        rising_posts: Vec::new(),
        recent_posts: Vec::new(),
        top_agents: Vec::new(),
        submolts: Vec::new(),
    };
    let text = render::digest(&digest);
    assert!(text.contains("Agentes activos: 17.7K"));
    assert!(text.contains("Posts: 1.2M"));
    assert!(text.contains("Comentarios: 12.2M"));
    assert!(!text.contains("12160.9K"));
}
