//! Integration tests for the enumeration job
//!
//! These tests use wiremock to stand in for the suggest and search
//! endpoints and drive a job built from configuration end-to-end.

use autosuggest_explorer::config::{
    Config, EndpointConfig, JobConfig, OutputConfig, UserAgentConfig,
};
use autosuggest_explorer::{JobController, JobError, JobStatus, StepStatus};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing both endpoints at the mock server
fn create_test_config(server_uri: &str, alphabet: &str) -> Config {
    Config {
        job: JobConfig {
            alphabet: alphabet.to_string(),
            separator: String::new(),
            max_suggestions: 10,
            min_request_interval_ms: 0, // No pacing in tests
            rate_limit_backoff_secs: 1,
            max_consecutive_failures: 3,
        },
        endpoints: EndpointConfig {
            suggest_url: format!("{}/complete/search", server_uri),
            search_url: format!("{}/search", server_uri),
            ..EndpointConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig::default(),
    }
}

/// Mounts a suggest response for one candidate
async fn mount_suggestions(server: &MockServer, candidate: &str, suggestions: &[&str]) {
    let body = serde_json::json!([candidate, suggestions]).to_string();
    Mock::given(method("GET"))
        .and(path("/complete/search"))
        .and(query_param("q", candidate))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a search results page for one suggestion
async fn mount_results(server: &MockServer, suggestion: &str, links: &[(&str, &str)]) {
    let blocks: String = links
        .iter()
        .map(|(href, title)| {
            format!(
                r#"<div class="g"><a href="{}"><h3>{}</h3></a><div class="VwiC3b">about {}</div></div>"#,
                href, title, title
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", suggestion))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body>{}</body></html>", blocks))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_job_two_candidates() {
    let server = MockServer::start().await;

    mount_suggestions(&server, "ax", &["ax tools"]).await;
    mount_suggestions(&server, "ay", &[]).await;
    mount_results(
        &server,
        "ax tools",
        &[
            ("https://d1.com/one", "One"),
            ("https://d2.com/", "Two"),
            ("https://d1.com/two", "Three"),
        ],
    )
    .await;

    let config = create_test_config(&server.uri(), "xy");
    let controller = JobController::from_config(&config).expect("Failed to build controller");
    assert_eq!(controller.start("a", 1).await.unwrap(), 2);

    let first = controller.advance_step().await.unwrap();
    assert_eq!(first.status, StepStatus::Running);
    assert_eq!(first.new_entries.len(), 1);
    let clusters: Vec<(&str, usize)> = first.new_entries[0]
        .clusters
        .iter()
        .map(|c| (c.domain.as_str(), c.cluster_size))
        .collect();
    assert_eq!(clusters, vec![("d1.com", 2), ("d2.com", 1)]);

    let second = controller.advance_step().await.unwrap();
    assert_eq!(second.status, StepStatus::Complete);
    assert!(second.new_entries.is_empty());

    let csv = String::from_utf8(controller.export().await.unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "query,suggestion,domain,cluster_size,title,link,snippet",
            "ax,ax tools,d1.com,2,One,https://d1.com/one,about One",
            "ax,ax tools,d1.com,2,Three,https://d1.com/two,about Three",
            "ax,ax tools,d2.com,1,Two,https://d2.com/,about Two",
        ]
    );

    let summary = controller.summary().await;
    assert_eq!(summary.candidates_processed, 2);
    assert_eq!(summary.candidates_with_suggestions, 1);
    assert_eq!(summary.unique_domains, 2);
}

#[tokio::test]
async fn test_rate_limited_suggest_keeps_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/complete/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), "xy");
    let controller = JobController::from_config(&config).unwrap();
    controller.start("a", 1).await.unwrap();

    let err = controller.advance_step().await.unwrap_err();
    assert!(matches!(err, JobError::RateLimited(_)));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.cursor, 0);
    assert_eq!(snapshot.status, JobStatus::Running);
    assert_eq!(snapshot.consecutive_failures, 1);
}

#[tokio::test]
async fn test_failed_search_fails_whole_step() {
    let server = MockServer::start().await;

    mount_suggestions(&server, "ax", &["ax good", "ax broken"]).await;
    mount_results(&server, "ax good", &[("https://d1.com/", "Good")]).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "ax broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), "x");
    let controller = JobController::from_config(&config).unwrap();
    controller.start("a", 1).await.unwrap();

    let err = controller.advance_step().await.unwrap_err();
    assert!(matches!(err, JobError::TransientError(_)));

    // Nothing from the partial step is kept
    assert_eq!(controller.snapshot().await.cursor, 0);
    assert_eq!(controller.summary().await.suggestions, 0);
}

#[tokio::test]
async fn test_pause_cancel_and_restart() {
    let server = MockServer::start().await;

    for candidate in ["ax", "ay", "az"] {
        mount_suggestions(&server, candidate, &[]).await;
    }

    let config = create_test_config(&server.uri(), "xyz");
    let controller = JobController::from_config(&config).unwrap();
    controller.start("a", 1).await.unwrap();
    controller.advance_step().await.unwrap();

    controller.pause().await.unwrap();
    assert_eq!(
        controller.advance_step().await.unwrap().status,
        StepStatus::NotRunning
    );
    assert!(matches!(
        controller.export().await,
        Err(autosuggest_explorer::ExplorerError::Job(JobError::JobNotComplete))
    ));

    controller.cancel().await;
    assert_eq!(controller.snapshot().await.status, JobStatus::Idle);

    controller.start("a", 1).await.unwrap();
    let mut last = None;
    for _ in 0..3 {
        last = Some(controller.advance_step().await.unwrap().status);
    }
    assert_eq!(last, Some(StepStatus::Complete));

    // Header only: no candidate produced suggestions
    let csv = controller.export().await.unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
}
