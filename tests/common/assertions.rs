//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image of the given size
pub fn assert_png(response: &TestResponse, width: u32, height: u32) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    let content_type = response
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert_eq!(
        content_type,
        Some("image/png"),
        "Expected Content-Type: image/png"
    );

    let content_length = response
        .headers
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    assert_eq!(content_length, Some(response.body.len()));

    assert_eq!(response.png_dimensions(), Some((width, height)));
}

/// Assert response is the opaque render failure
pub fn assert_render_failure(response: &TestResponse) {
    assert_status(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Failed to generate the image");
}
