use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use image::ImageFormat;
use pretty_assertions::assert_eq;
use shoe_analyzer::{
    ai::{GeminiVisionClient, MockVisionClient, VisionService},
    app::{App, AppServices},
    models::Config,
    server::{self, Application},
};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "shoe-analyzer-test-boundary";
const TEST_LIMIT: usize = 1024 * 1024;

fn encode_image(format: ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([30, 60, 90]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn analyze_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze-shoe")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, data)))
        .unwrap()
}

fn router_with(vision: Option<Arc<dyn VisionService>>) -> Router {
    let app = App::with_services(AppServices {
        vision,
        prompt: "Describe the shoe.".to_string(),
    });
    server::router(app, TEST_LIMIT)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_analyze_success_returns_model_text() {
    let mock = MockVisionClient::new()
        .with_response("รองเท้าผ้าใบ (ความหนาปานกลาง)\nเวลาที่แนะนำ: 40 นาที".to_string());
    let router = router_with(Some(Arc::new(mock.clone())));

    let (status, body) = send(
        router,
        analyze_request("image", "shoe.png", &encode_image(ImageFormat::Png)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "status": "success",
            "result": "รองเท้าผ้าใบ (ความหนาปานกลาง)\nเวลาที่แนะนำ: 40 นาที"
        })
    );
    assert_eq!(mock.get_call_count(), 1);
    assert_eq!(mock.last_prompt().as_deref(), Some("Describe the shoe."));
}

#[tokio::test]
async fn test_text_file_renamed_jpg_is_rejected() {
    let mock = MockVisionClient::new();
    let router = router_with(Some(Arc::new(mock.clone())));

    let (status, body) = send(
        router,
        analyze_request("image", "shoe.jpg", b"this is a text file"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid image file uploaded.");
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn test_zero_byte_upload_is_rejected() {
    let mock = MockVisionClient::new();
    let router = router_with(Some(Arc::new(mock.clone())));

    let (status, body) = send(router, analyze_request("image", "empty.png", b"")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid image file uploaded.");
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn test_unconfigured_service_fails_every_analyze_call() {
    let requests = vec![
        analyze_request("image", "shoe.png", &encode_image(ImageFormat::Png)),
        analyze_request("image", "shoe.jpg", b"not an image"),
        analyze_request("photo", "shoe.png", b"wrong field"),
        Request::builder()
            .method("POST")
            .uri("/api/analyze-shoe")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let (status, body) = send(router_with(None), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Gemini Client is not configured.");
    }
}

#[tokio::test]
async fn test_upstream_error_is_reported_with_cause() {
    let mock = MockVisionClient::new()
        .with_error("Gemini API error (status 429): RESOURCE_EXHAUSTED".to_string());
    let router = router_with(Some(Arc::new(mock)));

    let (status, body) = send(
        router,
        analyze_request("image", "shoe.jpg", &encode_image(ImageFormat::Jpeg)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Gemini API failed: "));
    assert!(detail.contains("RESOURCE_EXHAUSTED"));
}

#[tokio::test]
async fn test_empty_model_text_is_a_failure() {
    let mock = MockVisionClient::new().with_response(String::new());
    let router = router_with(Some(Arc::new(mock)));

    let (status, body) = send(
        router,
        analyze_request("image", "shoe.png", &encode_image(ImageFormat::Png)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Gemini API failed: Gemini returned an empty response."
    );
}

#[tokio::test]
async fn test_whitespace_model_text_is_a_success() {
    let mock = MockVisionClient::new().with_response("  \n".to_string());
    let router = router_with(Some(Arc::new(mock)));

    let (status, body) = send(
        router,
        analyze_request("image", "shoe.png", &encode_image(ImageFormat::Png)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "status": "success", "result": "  \n" })
    );
}

#[tokio::test]
async fn test_float_image_reaches_the_model() {
    let mock = MockVisionClient::new();
    let router = router_with(Some(Arc::new(mock.clone())));

    let img = image::Rgb32FImage::from_pixel(8, 8, image::Rgb([0.2f32, 0.4, 0.6]));
    let mut exr = Vec::new();
    image::DynamicImage::ImageRgb32F(img)
        .write_to(&mut std::io::Cursor::new(&mut exr), ImageFormat::OpenExr)
        .unwrap();

    let (status, body) = send(router, analyze_request("image", "shoe.exr", &exr)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(mock.get_call_count(), 1);
}

#[tokio::test]
async fn test_missing_image_field_is_unprocessable() {
    let mock = MockVisionClient::new();
    let router = router_with(Some(Arc::new(mock.clone())));

    let (status, body) = send(
        router,
        analyze_request("file", "shoe.png", &encode_image(ImageFormat::Png)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Field 'image' is required.");
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn test_non_multipart_request_is_rejected() {
    let router = router_with(Some(Arc::new(MockVisionClient::new())));

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze-shoe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mock = MockVisionClient::new();
    let app = App::with_services(AppServices {
        vision: Some(Arc::new(mock.clone())),
        prompt: "Describe the shoe.".to_string(),
    });
    let router = server::router(app, 512);

    let (status, _) = send(router, analyze_request("image", "big.bin", &[0u8; 4096])).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn test_health_is_independent_of_configuration() {
    let configured = router_with(Some(Arc::new(MockVisionClient::new())));
    let unconfigured = router_with(None);

    for router in [configured, unconfigured] {
        let request = Request::builder().uri("/api").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "status": "ok", "message": "Shoe Analyzer API is running." })
        );
    }
}

#[tokio::test]
async fn test_concurrent_requests_share_one_client() {
    let mock = MockVisionClient::new();
    let router = router_with(Some(Arc::new(mock.clone())));
    let png = encode_image(ImageFormat::Png);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = router.clone();
            let request = analyze_request("image", "shoe.png", &png);
            tokio::spawn(async move { send(router, request).await.0 })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(mock.get_call_count(), 8);
}

#[tokio::test]
async fn test_end_to_end_against_mock_gemini() {
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "รองเท้าหนัง (หนา)\nเวลาที่แนะนำ: 55 นาที" }]
                }
            }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let vision = GeminiVisionClient::new("test-key".to_string(), "gemini-2.5-flash".to_string())
        .unwrap()
        .with_base_url(gemini.uri());
    let app = App::with_services(AppServices {
        vision: Some(Arc::new(vision)),
        prompt: shoe_analyzer::prompts::SHOE_DRYING.to_string(),
    });

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Config::default()
    };
    let server = Application::build(&config, app).await.unwrap();
    let port = server.port();
    tokio::spawn(async move {
        let _ = server.run_until_stopped().await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/api/analyze-shoe", port))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(
            "image",
            "shoe.webp",
            &encode_image(ImageFormat::WebP),
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["result"], "รองเท้าหนัง (หนา)\nเวลาที่แนะนำ: 55 นาที");
}
