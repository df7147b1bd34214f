//! Logging in and out, signing up, and guarding pages behind a session.
//!
//! The backend owns the accounts. This module keeps the [Session] it issues in
//! an encrypted cookie and hands it to handlers through the auth middleware.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod session;
mod sign_up;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use session::{Session, User};
pub use sign_up::{get_sign_up_page, post_sign_up};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
