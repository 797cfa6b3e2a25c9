//! Stand-in identity provider
//!
//! Holds at most one signed-in user and gates routes on it. There are no
//! credentials; any well-formed email signs in.

use tracing::info;

use crate::error::{Error, Result};
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, email: &str) -> Result<&User> {
        let email = email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(Error::InvalidEmail(email.to_string())),
        }

        info!(%email, "signed in");
        Ok(&*self.user.insert(User {
            email: email.to_string(),
        }))
    }

    /// Signs out; returns the user that was signed in, if any
    pub fn sign_out(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(u) = &user {
            info!(email = %u.email, "signed out");
        }
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Checks that `route` may be opened in the current session
    pub fn authorize(&self, route: &Route) -> Result<()> {
        if route.requires_session() && self.user.is_none() {
            return Err(Error::NotSignedIn(route.path()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new();
        assert!(session.current_user().is_none());

        let user = session.sign_in(" jane@example.com ").unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert!(session.current_user().is_some());

        let previous = session.sign_out().unwrap();
        assert_eq!(previous.email, "jane@example.com");
        assert!(session.sign_out().is_none());
    }

    #[test]
    fn test_sign_in_rejects_bad_email() {
        let mut session = Session::new();
        assert_eq!(
            session.sign_in("jane").unwrap_err(),
            Error::InvalidEmail("jane".into())
        );
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_authorize_gates_routes() {
        let mut session = Session::new();
        assert!(session.authorize(&Route::Auth).is_ok());
        assert_eq!(
            session.authorize(&Route::Deleted),
            Err(Error::NotSignedIn("/deleted".into()))
        );

        session.sign_in("john@example.com").unwrap();
        assert!(session.authorize(&Route::Deleted).is_ok());
    }
}
