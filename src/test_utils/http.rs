use axum::{
    body::Body,
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::Response,
};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Headers missing {name}"))
        .to_str()
        .expect("Could not convert header to str")
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(header(response, "hx-redirect"), endpoint);
}

/// Check that `response` is a CSV download that browsers will save as `filename`.
#[track_caller]
pub(crate) fn assert_csv_attachment(response: &Response<Body>, filename: &str) {
    assert_eq!(
        header(response, CONTENT_TYPE.as_str()),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        header(response, CONTENT_DISPOSITION.as_str()),
        format!("attachment; filename=\"{filename}\"")
    );
}
