//! The sign-up page for creating an account with the backend.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    api::Registration,
    auth::{LoginState, invalidate_auth_cookie, log_in::email_input, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input,
    },
};

/// The minimum number of characters a password needs before it is sent to the backend.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 8;

/// Error messages for the fields of the sign-up form.
#[derive(Debug, Default)]
struct SignUpErrors<'a> {
    name: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
    form: Option<&'a str>,
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn sign_up_form(name: &str, email: &str, errors: SignUpErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_UP_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #email, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = errors.form
            {
                p class="text-red-500 text-base" { (error_message) }
            }

            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Full Name"
                }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="John Doe"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(name);

                @if let Some(error_message) = errors.name
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            (email_input(email))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let sign_up_form = sign_up_form("", "", SignUpErrors::default());
    let content = log_in_register("Create an account", &sign_up_form);
    base("Sign Up", &[], &content).into_response()
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignUpData {
    /// The user's full name.
    pub name: String,
    /// The email to log in with.
    pub email: String,
    /// The chosen password.
    pub password: String,
    /// The password typed a second time.
    pub confirm_password: String,
}

/// Handler for sign-up requests via the POST method.
///
/// On success the user is logged in and redirected to the dashboard. Otherwise the
/// form is returned with an error message explaining the problem.
pub async fn post_sign_up(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(data): Form<SignUpData>,
) -> Response {
    let name = data.name.trim();
    let email = data.email.trim();

    if name.is_empty() {
        let errors = SignUpErrors {
            name: Some("Enter your name."),
            ..Default::default()
        };
        return sign_up_form(name, email, errors).into_response();
    }

    if data.password.chars().count() < PASSWORD_INPUT_MIN_LENGTH as usize {
        let message = format!(
            "The password must be at least {PASSWORD_INPUT_MIN_LENGTH} characters long."
        );
        let errors = SignUpErrors {
            password: Some(&message),
            ..Default::default()
        };
        return sign_up_form(name, email, errors).into_response();
    }

    if data.password != data.confirm_password {
        let errors = SignUpErrors {
            confirm_password: Some("Passwords do not match."),
            ..Default::default()
        };
        return sign_up_form(name, email, errors).into_response();
    }

    let registration = Registration {
        name: name.to_owned(),
        email: email.to_owned(),
        password: data.password,
    };

    let session = match state.api.sign_up(&registration).await {
        Ok(session) => session,
        Err(Error::Transport(message)) => {
            let errors = SignUpErrors {
                form: Some(&message),
                ..Default::default()
            };
            return sign_up_form(name, email, errors).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while signing up: {error}");
            let errors = SignUpErrors {
                form: Some("An internal error occurred. Please try again later."),
                ..Default::default()
            };
            return sign_up_form(name, email, errors).into_response();
        }
    };

    set_auth_cookie(jar.clone(), &session, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}
