//! Per-request session resolution and lifecycle.
//!
//! The resolver is the single entry point handlers use: it turns a raw
//! `Cookie` header into a logical session (or nothing), and owns the
//! login/logout lifecycle around the store. One resolution attempt per
//! request, no retries, no cross-request caching: every request re-reads
//! the store.

use cookie::Cookie;
use time::OffsetDateTime;

use crate::config::SessionConfig;
use crate::signing::unsign;
use crate::store::{SessionData, SessionStore, StoreError};

/// A resolved logical session: the trusted id plus the decoded data blob.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
}

/// Resolves sessions from request cookies and manages their lifecycle.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    store: SessionStore,
    config: SessionConfig,
}

impl SessionResolver {
    pub fn new(store: SessionStore, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolves the session referenced by a request's `Cookie` header.
    ///
    /// Steps: find the configured cookie by name (percent-decoded), unsign it,
    /// read the store. Any failed step (absent header, absent cookie, bad
    /// signature, missing or expired row) yields `None`; they are deliberately
    /// indistinguishable to the caller. A store error is logged and downgraded
    /// to `None` here so handlers never see raw infrastructure failures from
    /// this path.
    pub async fn resolve(&self, cookie_header: Option<&str>) -> Option<Session> {
        let header = cookie_header?;
        let raw = Cookie::split_parse_encoded(header.to_owned())
            .filter_map(Result::ok)
            .find(|c| c.name() == self.config.cookie_name)
            .map(|c| c.value().to_string())?;

        let sid = unsign(&raw, self.config.secret())?;

        match self.store.get(&sid).await {
            Ok(Some(record)) => Some(Session {
                id: sid,
                data: record.sess,
            }),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed");
                None
            }
        }
    }

    /// Creates a session row for a fresh login and returns the session plus
    /// the signed cookie to set on the response.
    pub async fn establish(
        &self,
        data: SessionData,
    ) -> Result<(Session, Cookie<'static>), StoreError> {
        let expire = OffsetDateTime::now_utc() + self.store.ttl();
        let sid = self.store.create(&data, expire).await?;
        let cookie = self.config.session_cookie(&sid);
        Ok((Session { id: sid, data }, cookie))
    }

    /// Deletes the session row (logout) and returns the removal cookie that
    /// clears it on the client.
    pub async fn destroy(&self, session: &Session) -> Result<Cookie<'static>, StoreError> {
        self.store.delete(&session.id).await?;
        Ok(self.config.removal_cookie())
    }
}
