//! Integration tests for inference and the full extraction pipeline.
//!
//! Separate `wiremock` servers play the target site, the readability proxy
//! and the completion API.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freyja_profiler::{
    infer_brand_profile, BrandExtractionPipeline, CompletionClient, CompletionOptions,
    PipelineConfig, PipelineError, ProfilerError,
};
use freyja_scraper::{AcquisitionSource, ScraperError};

const SAMPLE_REPLY: &str = r##"{"brandName":"Shop","offerDetails":"Sells hats","targetAudience":"Adults","brandPositioning":"Affordable","primaryColor":"#ff0000","secondaryColor":"#00ff00","brandMood":"Playful"}"##;

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

fn pipeline_config(proxy: &MockServer, completion: &MockServer) -> PipelineConfig {
    PipelineConfig {
        completion_api_base: format!("{}/v1", completion.uri()),
        completion_api_key: "sk-test".to_string(),
        proxy_base_url: proxy.uri(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.3,
        max_tokens: 800,
        direct_timeout: Duration::from_secs(5),
    }
}

fn completion_client(completion: &MockServer) -> CompletionClient {
    CompletionClient::new(
        &format!("{}/v1", completion.uri()),
        "sk-test",
        CompletionOptions::default(),
    )
    .expect("failed to build completion client")
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_site_is_profiled_through_proxy() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;
    let completion = MockServer::start().await;
    let target = format!("{}/example-shop.test", site.uri());
    let markdown: String = "Example Shop sells hats. ".repeat(20);
    assert_eq!(markdown.len(), 500);

    Mock::given(method("GET"))
        .and(path("/example-shop.test"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"example-shop\.test$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(markdown.clone()))
        .expect(1)
        .mount(&proxy)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 800,
            "temperature": 0.3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SAMPLE_REPLY)))
        .expect(1)
        .mount(&completion)
        .await;

    let pipeline = BrandExtractionPipeline::new(pipeline_config(&proxy, &completion))
        .expect("pipeline builds");
    let profile = pipeline.run(&target).await.expect("pipeline succeeds");

    assert_eq!(profile.brand_name, "Shop");
    assert_eq!(profile.offer_details, "Sells hats");
    assert_eq!(profile.target_audience, "Adults");
    assert_eq!(profile.brand_positioning, "Affordable");
    assert_eq!(profile.primary_color, "#ff0000");
    assert_eq!(profile.secondary_color, "#00ff00");
    assert_eq!(profile.brand_mood, "Playful");
    assert_eq!(profile.raw_content, markdown);
}

#[tokio::test]
async fn pipelines_on_a_shared_client_keep_their_own_api_keys() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;
    let completion = MockServer::start().await;

    let html = r#"<html><body><header style="color:#ABCDEF">Hat Shop</header></body></html>"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(2)
        .mount(&site)
        .await;

    for key in ["sk-alice", "sk-bob"] {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {key}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SAMPLE_REPLY)))
            .expect(1)
            .mount(&completion)
            .await;
    }

    let shared = reqwest::Client::new();
    for key in ["sk-alice", "sk-bob"] {
        let config = PipelineConfig {
            completion_api_key: key.to_string(),
            ..pipeline_config(&proxy, &completion)
        };
        let profile = BrandExtractionPipeline::with_client(config, shared.clone())
            .run(&site.uri())
            .await
            .expect("pipeline succeeds");
        assert_eq!(profile.brand_name, "Shop");
    }
}

#[tokio::test]
async fn direct_html_sends_color_candidates_to_model() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;
    let completion = MockServer::start().await;

    let html = r#"<html><body><header style="color:#ABCDEF">Hat Shop</header><p>Hats</p></body></html>"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(100)))
        .expect(0)
        .mount(&proxy)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SAMPLE_REPLY)))
        .expect(1)
        .mount(&completion)
        .await;

    let pipeline = BrandExtractionPipeline::new(pipeline_config(&proxy, &completion))
        .expect("pipeline builds");
    let profile = pipeline.run(&site.uri()).await.expect("pipeline succeeds");
    assert_eq!(profile.raw_content, "Hat Shop Hats");

    let requests = completion
        .received_requests()
        .await
        .expect("request recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    let prompt = body["messages"][1]["content"].as_str().expect("user prompt");
    assert_eq!(body["messages"][0]["content"], "JSON only.");
    assert!(prompt.contains("#abcdef"), "prompt: {prompt}");
    assert!(prompt.contains("Scraping source: direct"));
}

#[tokio::test]
async fn unreachable_site_never_calls_completion_api() {
    let site = MockServer::start().await;
    let proxy = MockServer::start().await;
    let completion = MockServer::start().await;
    let target = format!("{}/down", site.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&proxy)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SAMPLE_REPLY)))
        .expect(0)
        .mount(&completion)
        .await;

    let pipeline = BrandExtractionPipeline::new(pipeline_config(&proxy, &completion))
        .expect("pipeline builds");
    let err = pipeline.run(&target).await.expect_err("site is unreachable");

    match err {
        PipelineError::Acquisition(ScraperError::Unreachable { url }) => assert_eq!(url, target),
        other => panic!("expected Acquisition(Unreachable), got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_message_is_carried() {
    let completion = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: sk-test.",
                "type": "invalid_request_error"
            }
        })))
        .expect(1)
        .mount(&completion)
        .await;

    let err = infer_brand_profile(
        &completion_client(&completion),
        "https://example.com",
        "text",
        &[],
        AcquisitionSource::ProxyFallback,
    )
    .await
    .expect_err("upstream rejects key");

    match err {
        ProfilerError::Upstream { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Incorrect API key provided: sk-test.");
        }
        other => panic!("expected Upstream, got: {other:?}"),
    }
}

#[tokio::test]
async fn fenced_reply_missing_colors_gets_defaults() {
    let completion = MockServer::start().await;
    let reply = "Here you go:\n```json\n{\"brandName\":\"Shop\",\"brandMood\":\"Calm\"}\n```";

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .mount(&completion)
        .await;

    let profile = infer_brand_profile(
        &completion_client(&completion),
        "https://example.com",
        "text",
        &[],
        AcquisitionSource::ProxyFallback,
    )
    .await
    .expect("reply parses");

    assert_eq!(profile.brand_name, "Shop");
    assert_eq!(profile.primary_color, "#000000");
    assert_eq!(profile.secondary_color, "#ffffff");
    assert_eq!(profile.brand_mood, "Calm");
}

#[tokio::test]
async fn reply_without_content_is_malformed() {
    let completion = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&completion)
        .await;

    let err = infer_brand_profile(
        &completion_client(&completion),
        "https://example.com",
        "text",
        &[],
        AcquisitionSource::Direct,
    )
    .await
    .expect_err("no choices");
    assert!(matches!(err, ProfilerError::MalformedResponse { .. }));
}

#[tokio::test]
async fn prose_only_reply_is_malformed() {
    let completion = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Sorry, I cannot analyse this site.")),
        )
        .expect(1)
        .mount(&completion)
        .await;

    let err = infer_brand_profile(
        &completion_client(&completion),
        "https://example.com",
        "text",
        &[],
        AcquisitionSource::Direct,
    )
    .await
    .expect_err("no JSON object");
    assert!(matches!(err, ProfilerError::MalformedResponse { .. }));
}
