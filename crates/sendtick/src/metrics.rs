//! Metric names recorded when the `metrics` feature is enabled.

/// Total API calls, labelled by `resource` and `operation`.
pub const REQUESTS_TOTAL: &str = "sendtick_requests_total";
/// Calls that failed in transport or with a non-success status, same labels.
pub const REQUEST_ERRORS_TOTAL: &str = "sendtick_request_errors_total";
/// Wall-clock time of a single API call in seconds.
pub const REQUEST_DURATION_SECONDS: &str = "sendtick_request_duration_seconds";
