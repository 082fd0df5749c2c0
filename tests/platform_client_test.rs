//! HTTP behavior of the platform client against a mock server.
//!
//! Covers authentication, pagination, partial-update bodies, empty delete
//! responses and normalization of error bodies.

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use voxdesk::domain::models::{AgentPatch, CreateAgentRequest};
use voxdesk::domain::ports::AgentApi;
use voxdesk::infrastructure::platform::{PlatformClient, PlatformClientConfig};
use voxdesk::services::AgentService;
use voxdesk::{AgentCache, ApiError, DomainError};

const TOKEN: &str = "API_0123456789abcdef0123";

fn client(server: &Server) -> PlatformClient {
    PlatformClient::new(PlatformClientConfig {
        base_url: server.url(),
        token: TOKEN.to_string(),
        timeout_secs: 5,
    })
    .expect("client")
}

fn agent_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "ai_agent_id": id,
        "agent_name": name,
        "agent_status": "ACTIVE",
        "language_code": "en-US",
        "created_at": 1_700_000_000,
        "modified_at": 1_700_000_100,
        "welcome_message": "Hi",
        "organization_id": "org_1",
        "llm": {
            "llm_type": "simple",
            "model_provider": "openai",
            "model_name": "gpt-4o-mini",
            "system_prompt": "Be brief",
            "model_temperature": 0.0
        },
        "stt": { "provider": "pia", "model": "pia_bangla_v1" },
        "tts": { "provider": "pia", "voice_id": "maria", "voice_name": "Maria" }
    })
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/ai-agents/")
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": [agent_json("a1", "Support Bot")] }).to_string())
        .create_async()
        .await;

    let page = client(&server).list_agents(None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].agent_name, "Support Bot");
    assert_eq!(page.data[0].extra["organization_id"], "org_1");
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn test_refresh_walks_every_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/v2/ai-agents/")
        .with_status(200)
        .with_body(
            json!({ "data": [agent_json("a1", "One"), agent_json("a2", "Two")], "next_page_token": "p2" })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/v2/ai-agents/")
        .match_query(Matcher::UrlEncoded("page_token".into(), "p2".into()))
        .with_status(200)
        .with_body(json!({ "data": [agent_json("a3", "Three")], "next_page_token": null }).to_string())
        .expect(1)
        .create_async()
        .await;

    let service = AgentService::new(Arc::new(client(&server)), Arc::new(AgentCache::default()));
    let count = service.refresh().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(count, 3);
    let names: Vec<_> = service.cache().rows().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
}

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/v2/ai-agents/a1")
        .match_body(Matcher::Json(json!({ "agent_name": "Helpdesk" })))
        .with_status(200)
        .with_body(json!({ "status": "SUCCESS", "message": "updated", "agent_id": "a1" }).to_string())
        .create_async()
        .await;

    let confirmation = client(&server)
        .update_agent("a1", &AgentPatch::name("Helpdesk"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(confirmation.ai_agent_id.as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_create_posts_template_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/ai-agents")
        .match_body(Matcher::PartialJson(json!({
            "agent_name": "Night Shift",
            "llm": { "model_provider": "openai" },
            "tts": { "voice_id": "maria" }
        })))
        .with_status(201)
        .with_body(json!({ "agent_id": "a9", "status": "SUCCESS", "message": "created" }).to_string())
        .create_async()
        .await;

    let created = client(&server)
        .create_agent(&CreateAgentRequest::default().with_name("Night Shift"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.ai_agent_id, "a9");
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/v2/ai-agents/a1")
        .with_status(204)
        .create_async()
        .await;

    let confirmation = client(&server).delete_agent("a1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(confirmation.ai_agent_id.as_deref(), Some("a1"));
    assert_eq!(confirmation.status, "SUCCESS");
}

#[tokio::test]
async fn test_id_with_reserved_characters_stays_in_its_segment() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/v2/ai-agents/a1%2Fb%3Fforce=1")
        .with_status(204)
        .create_async()
        .await;
    let collection = server
        .mock("DELETE", Matcher::Regex("^/v2/ai-agents/a1$".into()))
        .expect(0)
        .create_async()
        .await;

    client(&server).delete_agent("a1/b?force=1").await.unwrap();

    mock.assert_async().await;
    collection.assert_async().await;
}

#[tokio::test]
async fn test_error_body_is_normalized() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/ai-agents")
        .with_status(500)
        .with_body(json!({ "error": "Failed to create AI agent", "details": "voice_id is required" }).to_string())
        .create_async()
        .await;

    let err = client(&server)
        .create_agent(&CreateAgentRequest::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 500,
            message: Some("Failed to create AI agent".into()),
            details: Some("voice_id is required".into()),
        }
    );
}

#[tokio::test]
async fn test_missing_agent_maps_to_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v2/ai-agents/ghost")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let service = AgentService::new(Arc::new(client(&server)), Arc::new(AgentCache::default()));
    let err = service.get("ghost").await.unwrap_err();

    assert!(matches!(err, DomainError::AgentNotFound(id) if id == "ghost"));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v2/ai-agents/a1")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(&server).get_agent("a1").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = PlatformClient::new(PlatformClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        token: TOKEN.to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let err = client.list_agents(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
}
