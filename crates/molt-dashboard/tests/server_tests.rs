use std::sync::Arc;

use molt_dashboard::server::ApiServer;
use molt_source::{AgentSource, FixtureSource, RemoteConfig, RemoteSource, SnapshotFeed};
use tokio::net::TcpListener;

async fn start() -> (String, FixtureSource) {
    let fixture = FixtureSource::new(7);
    let feed = Arc::new(SnapshotFeed::new(Arc::new(fixture.clone())));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(ApiServer::new(addr.to_string(), feed).run_on(listener));
    (format!("http://{addr}"), fixture)
}

#[tokio::test]
async fn test_remote_source_reads_served_fixture() {
    let (base, fixture) = start().await;
    let remote = RemoteSource::new(RemoteConfig::new(base)).unwrap();

    let agents = remote.list_agents().await.unwrap();
    assert_eq!(agents.len(), fixture.agents().len());
    assert_eq!(agents[0].id, fixture.agents()[0].id);
    assert_eq!(agents[0].rank, 1);

    let connections = remote.list_connections().await.unwrap();
    assert_eq!(connections.len(), fixture.connections().len());

    let id = &fixture.agents()[3].id;
    let agent = remote.get_agent(id).await.unwrap().unwrap();
    assert_eq!(&agent.name, &fixture.agents()[3].name);
    assert_eq!(agent.token_history.len(), fixture.agents()[3].token_history.len());

    assert!(remote.get_agent("agent-404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_leaderboard_graph_and_stats_endpoints() {
    let (base, _fixture) = start().await;

    let root: serde_json::Value = reqwest::get(format!("{base}/")).await.unwrap().json().await.unwrap();
    assert_eq!(root["status"], "MoltNet API online");

    let board: Vec<serde_json::Value> = reqwest::get(format!("{base}/api/leaderboard?limit=5"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board.len(), 5);
    assert_eq!(board[0]["rank"], 1);
    assert!(board[0].get("weeklyChange").is_some());

    let graph: serde_json::Value = reqwest::get(format!("{base}/api/graph?category=researcher"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let nodes = graph["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert!(nodes.iter().all(|n| n["category"] == "researcher"));

    let unfiltered: serde_json::Value = reqwest::get(format!("{base}/api/graph?search=&category="))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unfiltered["nodes"].as_array().unwrap().len(), 20);

    let stats: serde_json::Value = reqwest::get(format!("{base}/api/stats")).await.unwrap().json().await.unwrap();
    assert_eq!(stats["agentCount"], 20);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let (base, _fixture) = start().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{base}/api/agents"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
