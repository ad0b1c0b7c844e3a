use crate::error::SessionError;
use crate::gateway::ResearchGateway;
use crate::poller::NotificationPoller;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use simlit_model::{summarize, Notification, NotificationId, NotificationSummary, User};
use std::sync::Arc;
use std::time::Duration;

/// Opaque bearer token plus its expiry.
///
/// Parsing and storage of the raw credential are outside the workflow
/// model; expiry is the only attribute the session inspects.
#[derive(Debug, Clone)]
pub struct AuthToken {
    raw: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            raw: raw.into(),
            expires_at,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// The raw credential, for the transport layer only.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// One login's worth of client state.
///
/// Holds the cached user profile that permission checks resolve against and
/// the shared notification store the poller refreshes. There is exactly one
/// poller per session and [`Session::teardown`] stops it deterministically,
/// so timers never leak across logins.
pub struct Session {
    token: AuthToken,
    user: User,
    notifications: Arc<RwLock<Vec<Notification>>>,
    poller: Option<NotificationPoller>,
}

impl Session {
    /// Establishes a session from a token and the cached profile.
    ///
    /// An expired token never yields a session; the caller must
    /// re-authenticate instead.
    pub fn new(token: AuthToken, user: User) -> Result<Self, SessionError> {
        if token.is_expired() {
            return Err(SessionError::TokenExpired);
        }
        Ok(Self {
            token,
            user,
            notifications: Arc::new(RwLock::new(Vec::new())),
            poller: None,
        })
    }

    /// The logged-in user every permission check resolves against.
    #[inline]
    #[must_use]
    pub fn current_user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Snapshot of the notification feed.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    /// Read/unread counters over the current feed.
    #[must_use]
    pub fn notification_summary(&self) -> NotificationSummary {
        summarize(&self.notifications.read())
    }

    /// Starts the background notification poller. A second call replaces
    /// the previous poller after stopping it.
    pub async fn start_polling<G>(&mut self, gateway: Arc<G>, period: Duration)
    where
        G: ResearchGateway + 'static,
    {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        self.poller = Some(NotificationPoller::spawn(
            gateway,
            self.user.id,
            Arc::clone(&self.notifications),
            period,
        ));
    }

    /// Mirrors a successful mark-read call into the local feed. Only called
    /// after the backend confirmed; the feed itself stays server-owned.
    pub fn apply_read(&self, id: NotificationId) {
        let mut feed = self.notifications.write();
        if let Some(n) = feed.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    /// Stops background polling and drops session state. Resolves only
    /// after the poll task has fully exited.
    pub async fn teardown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        self.notifications.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use simlit_model::{Role, UserId, UserType};

    fn user() -> User {
        User::new(
            UserId(1),
            "arini",
            "arini@kampus.ac.id",
            UserType::DosenStaff,
            [Role::Dosen],
        )
    }

    #[test]
    fn expired_token_is_refused() {
        let token = AuthToken::new("t", Utc::now() - ChronoDuration::minutes(1));
        assert_eq!(
            Session::new(token, user()).err(),
            Some(SessionError::TokenExpired)
        );
    }

    #[test]
    fn fresh_session_has_empty_feed() {
        let token = AuthToken::new("t", Utc::now() + ChronoDuration::hours(1));
        let session = Session::new(token, user()).unwrap();
        assert!(session.notifications().is_empty());
        assert_eq!(session.notification_summary(), NotificationSummary::default());
    }
}
