//! Assertions on API error bodies

use axum::http::StatusCode;
use axum_test::TestResponse;
use serde_json::Value;

/// Assert `response` is a JSON error with `status`, returning its message
pub fn assert_api_error(response: &TestResponse, status: StatusCode) -> String {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["status"], status.as_u16(), "error body: {}", body);
    body["error"]
        .as_str()
        .unwrap_or_else(|| panic!("error body has no message: {}", body))
        .to_string()
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected {:?} to contain {:?}",
            $haystack,
            $needle
        );
    };
}
