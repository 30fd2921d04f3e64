use std::time::Duration;

use anyhow::Result;
use vidgen::{default_context, JobOutcome, PollConfig, Poller, TaskArtifact};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_poller(max_attempts: u32) -> Poller {
    Poller::new(
        PollConfig::new()
            .with_max_attempts(max_attempts)
            .with_interval(Duration::from_millis(20)),
    )
}

fn cv_client(endpoint: &str) -> vidgen::cv::Client {
    let config = vidgen::cv::Config::new()
        .with_access_key_id("AKLTtest")
        .with_secret_access_key("test-secret-key")
        .with_endpoint(endpoint);
    vidgen::cv::Client::new(default_context(), config)
}

fn ark_client(endpoint: &str) -> vidgen::ark::Client {
    let config = vidgen::ark::Config::new()
        .with_api_key("test-api-key")
        .with_endpoint(endpoint);
    vidgen::ark::Client::new(default_context(), config)
}

#[tokio::test]
async fn test_cv_submit_poll_download() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let artifact = b"not really an mp4, but enough bytes to stream".to_vec();

    Mock::given(method("POST"))
        .and(query_param("Action", "CVSubmitTask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-e2e"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("Action", "CVGetResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"status": "in_queue"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("Action", "CVGetResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "status": "done",
                "video_url": format!("{}/files/out.mp4", server.uri())
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/out.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(artifact.clone()))
        .mount(&server)
        .await;

    let client = cv_client(&server.uri());
    let task = vidgen::cv::TaskRequest::avatar_video(
        "https://example.com/face.png",
        "https://example.com/voice.wav",
    );

    let dir = tempfile::tempdir()?;
    let dest = dir.path().join("avatar.mp4");
    let outcome = client.run(&task, &fast_poller(10), &dest).await?;

    assert_eq!(
        outcome,
        JobOutcome::Downloaded {
            path: dest.clone(),
            bytes: artifact.len() as u64,
        }
    );
    assert_eq!(std::fs::read(&dest)?, artifact);

    Ok(())
}

#[tokio::test]
async fn test_ark_submit_poll_download() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let artifact = vec![42u8; 24 * 1024];

    Mock::given(method("POST"))
        .and(path("/contents/generations/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cgt-e2e"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contents/generations/tasks/cgt-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cgt-e2e", "status": "running", "progress": 80
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contents/generations/tasks/cgt-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cgt-e2e",
            "status": "succeeded",
            "content": {"video_url": format!("{}/files/clip.mp4", server.uri())}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(artifact.clone()))
        .mount(&server)
        .await;

    let client = ark_client(&server.uri());
    let task = vidgen::ark::TaskRequest::image_to_video(
        "gen-video-pro",
        "a fox jumps over a frozen lake",
        &vidgen::ark::RenderOptions::new().with_duration_secs(5),
        "https://example.com/first.png",
    );

    let dir = tempfile::tempdir()?;
    let dest = dir.path().join("clip.mp4");
    let outcome = client.run(&task, &fast_poller(10), &dest).await?;

    assert_eq!(
        outcome,
        JobOutcome::Downloaded {
            path: dest.clone(),
            bytes: artifact.len() as u64,
        }
    );
    assert_eq!(std::fs::read(&dest)?.len(), artifact.len());

    Ok(())
}

#[tokio::test]
async fn test_download_failure_degrades_to_outcome() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("Action", "CVSubmitTask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-gone"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("Action", "CVGetResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "status": "done",
                "video_url": format!("{}/files/missing.mp4", server.uri())
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/missing.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = cv_client(&server.uri());
    let task = vidgen::cv::TaskRequest::avatar_video(
        "https://example.com/face.png",
        "https://example.com/voice.wav",
    );

    let dir = tempfile::tempdir()?;
    let dest = dir.path().join("missing.mp4");
    let outcome = client.run(&task, &fast_poller(5), &dest).await?;

    assert!(matches!(outcome, JobOutcome::Failed(_)));
    assert!(!dest.exists());

    Ok(())
}

#[tokio::test]
async fn test_role_job_completes_without_download() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("Action", "CVSubmitTask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "role-e2e"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("Action", "CVGetResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"status": "done", "resp_data": "{\"status\": 1}"}
        })))
        .mount(&server)
        .await;

    let client = cv_client(&server.uri());
    let task = vidgen::cv::TaskRequest::create_role("https://example.com/face.png");

    let dir = tempfile::tempdir()?;
    let dest = dir.path().join("unused.mp4");
    let outcome = client.run(&task, &fast_poller(5), &dest).await?;

    assert_eq!(
        outcome,
        JobOutcome::Completed(TaskArtifact::Id("role-e2e".to_string()))
    );
    assert!(!dest.exists());

    Ok(())
}

#[tokio::test]
async fn test_timeout_reports_failure_outcome() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contents/generations/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cgt-stuck"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contents/generations/tasks/cgt-stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cgt-stuck", "status": "running"
        })))
        .mount(&server)
        .await;

    let client = ark_client(&server.uri());
    let task = vidgen::ark::TaskRequest::image_to_video(
        "gen-video-pro",
        "stuck forever",
        &vidgen::ark::RenderOptions::new(),
        "https://example.com/first.png",
    );

    let dir = tempfile::tempdir()?;
    let outcome = client
        .run(&task, &fast_poller(2), &dir.path().join("never.mp4"))
        .await?;

    assert_eq!(
        outcome,
        JobOutcome::Failed("no terminal status after 2 attempts".to_string())
    );

    Ok(())
}
