//! Tests for the /api/convert endpoint.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use imgconv::codec;
use imgconv::models::AppConfig;
use mode_normalize::PixelMode;

#[tokio::test]
async fn test_convert_png_to_jpg() {
    let app = TestApp::new();

    let response = app.convert("jpg", fixtures::rgb_png(24, 16)).await;

    common::assert_jpeg(&response);
    assert_eq!(response.header("x-image-width"), Some("24"));
    assert_eq!(response.header("x-image-height"), Some("16"));
    assert_eq!(response.header("x-image-mode"), Some("RGB"));
    assert_eq!(response.header("x-conversion-passthrough"), Some("false"));
    assert_eq!(
        response.header("content-length"),
        Some(response.body.len().to_string().as_str())
    );
}

#[tokio::test]
async fn test_convert_jpg_to_png() {
    let app = TestApp::new();

    let response = app.convert("PNG", fixtures::rgb_jpeg(20, 10)).await;

    common::assert_png(&response);
    assert_eq!(response.header("x-image-mode"), Some("RGB"));
    let image = codec::decode(&response.body).unwrap();
    assert_eq!((image.width(), image.height()), (20, 10));
}

#[tokio::test]
async fn test_transparent_png_to_jpeg_is_white() {
    let app = TestApp::new();

    let response = app.convert("jpeg", fixtures::transparent_rgba_png(10, 10)).await;

    common::assert_jpeg(&response);
    let image = codec::decode(&response.body).unwrap();
    assert_eq!(image.mode(), PixelMode::Rgb);
    assert!(
        image.pixels().as_bytes().iter().all(|&v| v >= 250),
        "transparent pixels must flatten to white"
    );
}

#[tokio::test]
async fn test_same_format_returns_original_bytes() {
    let app = TestApp::new();
    let source = fixtures::rgb_png(8, 8);

    let response = app.convert("png", source.clone()).await;

    common::assert_png(&response);
    assert_eq!(response.body, source);
    assert_eq!(response.header("x-conversion-passthrough"), Some("true"));
}

#[tokio::test]
async fn test_jpg_and_jpeg_are_the_same_format() {
    let app = TestApp::new();
    let source = fixtures::rgb_jpeg(8, 8);

    for token in ["jpg", "JPEG", "Jpg"] {
        let response = app.convert(token, source.clone()).await;
        common::assert_jpeg(&response);
        assert_eq!(response.body, source, "token {token}");
        assert_eq!(response.header("x-conversion-passthrough"), Some("true"));
    }
}

#[tokio::test]
async fn test_content_disposition_uses_original_name() {
    let app = TestApp::new();

    let response = app
        .post_bytes(
            "/api/convert?format=jpg&filename=holiday.png",
            fixtures::rgb_png(4, 4),
        )
        .await;

    common::assert_ok(&response);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"holiday_converted.jpg\"")
    );
}

#[tokio::test]
async fn test_content_disposition_default_name() {
    let app = TestApp::new();

    let response = app.convert("png", fixtures::rgb_jpeg(4, 4)).await;

    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"image_converted.png\"")
    );
}

#[tokio::test]
async fn test_content_disposition_non_ascii_name() {
    let app = TestApp::new();

    // filename=日本.png
    let response = app
        .post_bytes(
            "/api/convert?format=JPG&filename=%E6%97%A5%E6%9C%AC.png",
            fixtures::rgb_png(4, 4),
        )
        .await;

    common::assert_jpeg(&response);
    let disposition = response
        .header("content-disposition")
        .expect("Expected ASCII Content-Disposition");
    assert!(disposition.is_ascii());
    assert_eq!(
        disposition,
        "attachment; filename=\"image_converted.jpg\"; \
         filename*=UTF-8''%E6%97%A5%E6%9C%AC_converted.jpg"
    );

    let encoded = disposition
        .split("filename*=UTF-8''")
        .nth(1)
        .expect("Expected filename* parameter");
    let decoded = percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .unwrap();
    assert_eq!(decoded, "\u{65e5}\u{672c}_converted.jpg");
}

#[tokio::test]
async fn test_missing_format_parameter() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/convert", fixtures::rgb_png(4, 4))
        .await;

    common::assert_error_kind(&response, StatusCode::BAD_REQUEST, "MissingParameter");
}

#[tokio::test]
async fn test_unsupported_format() {
    let app = TestApp::new();

    let response = app.convert("bmp", fixtures::rgb_png(4, 4)).await;

    common::assert_error_kind(&response, StatusCode::BAD_REQUEST, "UnsupportedFormatError");
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("'bmp'"));
}

#[tokio::test]
async fn test_undecodable_body() {
    let app = TestApp::new();

    let response = app.convert("png", b"definitely not an image".to_vec()).await;

    common::assert_error_kind(
        &response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "DecodeError",
    );
}

#[tokio::test]
async fn test_truncated_png() {
    let app = TestApp::new();
    let mut source = fixtures::rgb_png(32, 32);
    source.truncate(source.len() / 2);

    let response = app.convert("jpg", source).await;

    common::assert_error_kind(
        &response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "DecodeError",
    );
}

#[tokio::test]
async fn test_empty_body() {
    let app = TestApp::new();

    let response = app.convert("png", Vec::new()).await;

    common::assert_error_kind(&response, StatusCode::BAD_REQUEST, "InvalidBody");
}

#[tokio::test]
async fn test_upload_limit() {
    let app = TestApp::with_config(AppConfig {
        max_upload_bytes: 1024,
        ..Default::default()
    });

    let response = app.convert("png", vec![0u8; 4096]).await;

    common::assert_error_kind(&response, StatusCode::PAYLOAD_TOO_LARGE, "InvalidBody");
}

#[tokio::test]
async fn test_responses_are_not_cached() {
    let app = TestApp::new();

    let response = app.convert("jpg", fixtures::rgb_png(4, 4)).await;

    assert_eq!(response.header("cache-control"), Some("no-store"));
}
