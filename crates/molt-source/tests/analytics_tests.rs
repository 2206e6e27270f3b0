use molt_source::analytics::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> AnalyticsClient {
    AnalyticsClient::new(AnalyticsConfig {
        base_url: format!("{}/api/v1", server.uri()),
        api_key: Some("moltbook_sk_test".to_string()),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_activity_reads_submolt_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .and(header("authorization", "Bearer moltbook_sk_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 42,
            "total_posts": 900,
            "total_comments": 1200,
            "submolts": [{"id": "s1", "name": "general"}, {"id": "s2", "name": "memes"}]
        })))
        .mount(&server)
        .await;

    let activity = client_for(&server).await.activity().await;
    assert_eq!(activity.active_agents, 42);
    assert_eq!(activity.holders, 42);
    assert_eq!(activity.total_posts, 900);
    assert_eq!(activity.transactions_24h, 1200);
    assert_eq!(activity.total_submolts, 2);
    assert_eq!(activity.circulating_supply, "N/A");
}

#[tokio::test]
async fn test_activity_missing_fields_use_published_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let activity = client_for(&server).await.activity().await;
    assert_eq!(activity, NetworkActivity::fallback());
}

#[tokio::test]
async fn test_activity_failure_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let activity = client_for(&server).await.activity().await;
    assert_eq!(activity.active_agents, FALLBACK_AGENT_COUNT);
    assert_eq!(activity.total_comments, FALLBACK_TOTAL_COMMENTS);
}

#[tokio::test]
async fn test_posts_defaults_for_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(query_param("sort", "hot"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "posts": [
                {"id": "p1", "title": "Hello", "upvotes": 7, "comment_count": 2,
                 "author": {"id": "u1", "name": "Nova"},
                 "created_at": "2026-02-01T10:00:00Z",
                 "submolt": {"name": "agents"}},
                {"id": "p2"}
            ]
        })))
        .mount(&server)
        .await;

    let posts = client_for(&server).await.posts(PostSort::Hot, 10).await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].author_name, "Nova");
    assert_eq!(posts[0].submolt, "agents");
    assert!(posts[0].created_at.is_some());
    assert_eq!(posts[1].title, "Sin título");
    assert_eq!(posts[1].author_name, "Anonymous");
    assert_eq!(posts[1].submolt, "general");
    assert_eq!(posts[1].upvotes, 0);
    assert!(posts[1].created_at.is_none());
}

#[tokio::test]
async fn test_posts_unsuccessful_payload_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "rate limited"})))
        .mount(&server)
        .await;

    assert!(client_for(&server).await.posts(PostSort::Top, 5).await.is_empty());
}

#[tokio::test]
async fn test_top_agents_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .and(query_param("sort", "karma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agents": [
                {"id": "a1", "name": "Cipher", "karma": 310, "stats": {"posts": 12}, "is_claimed": true},
                {"id": "a2", "name": "Echo"}
            ]
        })))
        .mount(&server)
        .await;

    let agents = client_for(&server).await.top_agents(5).await;
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].reputation, 310);
    assert_eq!(agents[0].collaborations, 12);
    assert!(agents[0].verified);
    assert_eq!(agents[1].reputation, 0);
    assert!(!agents[1].verified);
}

#[tokio::test]
async fn test_submolts_limit_and_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "submolts": [
                {"id": "s1", "name": "general", "display_name": "General", "subscriber_count": 90},
                {"id": "s2", "name": "memes"},
                {"id": "s3", "name": "dev"}
            ]
        })))
        .mount(&server)
        .await;

    let submolts = client_for(&server).await.submolts(2).await;
    assert_eq!(submolts.len(), 2);
    assert_eq!(submolts[0].name, "General");
    assert_eq!(submolts[0].members, 90);
    assert_eq!(submolts[1].name, "memes");
}

#[tokio::test]
async fn test_recent_activity_projects_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(query_param("sort", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "posts": [{"id": "p9", "upvotes": 3, "author": {"name": "Rune"},
                       "created_at": "1970-01-01T00:00:01Z"}]
        })))
        .mount(&server)
        .await;

    let records = client_for(&server).await.recent_activity(10).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hash, "p9");
    assert_eq!(records[0].kind, "post");
    assert_eq!(records[0].from, "Rune");
    assert_eq!(records[0].to, "general");
    assert_eq!(records[0].amount, 3);
    assert_eq!(records[0].timestamp_ms, 1_000);
}

#[tokio::test]
async fn test_digest_survives_total_outage() {
    let server = MockServer::start().await;
    let digest = client_for(&server).await.digest(10, 5).await;
    assert_eq!(digest.activity, NetworkActivity::fallback());
    assert!(digest.hot_posts.is_empty());
    assert!(digest.top_agents.is_empty());
    assert!(digest.submolts.is_empty());
}

#[tokio::test]
async fn test_null_fields_default_per_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "posts": [
                {"id": "p1", "title": "Hello", "upvotes": 7, "comment_count": 2},
                {"id": null, "title": null, "upvotes": null, "comment_count": null,
                 "author": null, "created_at": null, "submolt": {"name": null}}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agents": [{"id": "a1", "name": null, "karma": null, "stats": {"posts": null}, "is_claimed": null}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": null,
            "submolts": [{"id": "s1", "name": "general", "display_name": null, "subscriber_count": null}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let posts = client.posts(PostSort::Hot, 10).await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].upvotes, 7);
    assert_eq!(posts[1].upvotes, 0);
    assert_eq!(posts[1].comments, 0);
    assert_eq!(posts[1].title, "Sin título");
    assert_eq!(posts[1].author_name, "Anonymous");
    assert_eq!(posts[1].submolt, "general");

    let agents = client.top_agents(5).await;
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].agent_id, "a1");
    assert_eq!(agents[0].reputation, 0);
    assert_eq!(agents[0].collaborations, 0);
    assert!(!agents[0].verified);

    let submolts = client.submolts(5).await;
    assert_eq!(submolts.len(), 1);
    assert_eq!(submolts[0].name, "general");
    assert_eq!(submolts[0].members, 0);

    let activity = client.activity().await;
    assert_eq!(activity.active_agents, FALLBACK_AGENT_COUNT);
    assert_eq!(activity.total_submolts, 1);
}

#[tokio::test]
async fn test_polling_republishes_digest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submolts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "count": 42})))
        .mount(&server)
        .await;

    let client = std::sync::Arc::new(client_for(&server).await);
    let (mut updates, handle) = client.spawn_polling(std::time::Duration::from_millis(20), 10, 5);

    for _ in 0..2 {
        tokio::time::timeout(std::time::Duration::from_secs(5), updates.changed())
            .await
            .unwrap()
            .unwrap();
        let digest = updates.borrow_and_update().clone().unwrap();
        assert_eq!(digest.activity.active_agents, 42);
    }
    handle.abort();

    let submolt_hits = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/v1/submolts")
        .count();
    assert!(submolt_hits >= 4);
}
