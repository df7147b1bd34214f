//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_sign_up_page, post_log_in,
        post_sign_up,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, download_expenses, download_income, get_expenses_page,
        get_income_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::SIGN_UP_API, post(post_sign_up))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::INCOME_DOWNLOAD, get(download_income))
        .route(endpoints::EXPENSES_DOWNLOAD, get(download_expenses))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::INCOME_API, post(create_income_endpoint))
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .route(endpoints::DELETE_INCOME, delete(delete_income_endpoint))
            .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::macros::date;

    use crate::{
        AppState, InMemoryApiClient, endpoints, routing::build_router,
        transaction::test_utils::expense,
    };

    const EMAIL: &str = "test@example.com";
    const PASSWORD: &str = "password123";

    fn get_test_server() -> TestServer {
        let api = InMemoryApiClient::new()
            .with_user("Test", EMAIL, PASSWORD)
            .with_transactions(
                EMAIL,
                vec![expense("1", "Rent", 900.0, date!(2025 - 06 - 02))],
            );
        let state = AppState::new(Arc::new(api), "foobar", "Etc/UTC");
        let mut server =
            TestServer::new(build_router(state));
        server.save_cookies();

        server
    }

    #[tokio::test]
    async fn protected_page_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::INCOME_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_in_then_browse_and_log_out() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        server
            .get(endpoints::DASHBOARD_VIEW)
            .await
            .assert_status_ok();
        let download = server.get(endpoints::EXPENSES_DOWNLOAD).await;
        download.assert_status_ok();
        assert!(download.text().contains("Rent"));

        server
            .get(endpoints::LOG_OUT)
            .await
            .assert_status(StatusCode::SEE_OTHER);
        server
            .get(endpoints::DASHBOARD_VIEW)
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }
}
