//! Log-out route handler that ends the backend session, invalidates the auth cookie and
//! redirects the user.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    api::ApiClient,
    auth::{cookie::get_session_from_cookies, invalidate_auth_cookie},
    endpoints,
};

/// Tell the backend to end the session, invalidate the auth cookie and redirect the client
/// to the log-in page.
///
/// The cookie is invalidated even if the backend could not be reached.
pub async fn get_log_out(State(api): State<Arc<dyn ApiClient>>, jar: PrivateCookieJar) -> Response {
    if let Ok(session) = get_session_from_cookies(&jar)
        && let Err(error) = api.log_out(&session).await
    {
        tracing::warn!("Could not end the session with the backend: {error}");
    }

    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
