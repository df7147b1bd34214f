//! The logged-in user and the token the backend issued for them.

use serde::{Deserialize, Serialize};

/// The profile of the logged-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The backend's ID for the user.
    pub id: String,
    /// The user's display name.
    pub name: String,
    /// The email address the user logs in with.
    pub email: String,
}

/// A logged-in user together with the bearer token for backend requests.
///
/// A session is created when the user logs in or signs up, stored in an
/// encrypted cookie, handed to request handlers by the auth middleware and
/// discarded when the user logs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Who is logged in.
    pub user: User,
    /// The bearer token the backend issued at log-in.
    pub token: String,
}

impl Session {
    /// The name to greet the user with, falling back to their email.
    pub fn display_name(&self) -> &str {
        if self.user.name.trim().is_empty() {
            &self.user.email
        } else {
            &self.user.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, User};

    #[test]
    fn display_name_falls_back_to_email() {
        let mut session = Session {
            user: User {
                id: "1".to_owned(),
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
            },
            token: "token".to_owned(),
        };
        assert_eq!(session.display_name(), "Ada");

        session.user.name = String::new();
        assert_eq!(session.display_name(), "ada@example.com");
    }
}
