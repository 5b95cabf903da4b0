use anyhow::{Context, Result};
use nomex_types::AuthStatus;

use crate::api::{ApiClient, ApiError, FeedApi};
use crate::app::Viewer;
use crate::session::{SessionData, SessionStore};

/// Outcome of resolving who is using the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResolution {
    pub status: AuthStatus,
    pub viewer: Option<Viewer>,
    /// The user record still carries the onboarding flag
    pub new_user: bool,
}

impl AuthResolution {
    pub fn unauthenticated() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            viewer: None,
            new_user: false,
        }
    }
}

/// Turns a remembered session into an auth status plus the viewer's identity.
///
/// A rejected session resolves to `Unauthenticated`; any other failure is
/// handed back to the caller.
pub async fn resolve_session<A: FeedApi + ?Sized>(
    api: &A,
    session: Option<&SessionData>,
) -> Result<AuthResolution> {
    let session = match session {
        Some(session) => session,
        None => {
            log::debug!("No session, viewer is unauthenticated");
            return Ok(AuthResolution::unauthenticated());
        }
    };

    match api.fetch_user(&session.email).await {
        Ok(profile) => {
            log::info!("Session resolved for user {}", profile.id);
            Ok(AuthResolution {
                status: AuthStatus::Authenticated,
                viewer: Some(Viewer::new(profile.id, profile.email)),
                new_user: profile.new_user,
            })
        }
        Err(ApiError::Unauthorized(message)) => {
            log::warn!("Session rejected: {}", message);
            Ok(AuthResolution::unauthenticated())
        }
        Err(e) => Err(e).context("Failed to resolve session"),
    }
}

/// Session lookup against the local store and the user service.
pub struct AuthFlow {
    session_store: SessionStore,
}

impl AuthFlow {
    pub fn new() -> Result<Self> {
        let session_store = SessionStore::new().context("Failed to initialize session store")?;
        Ok(Self { session_store })
    }

    pub fn with_store(session_store: SessionStore) -> Self {
        Self { session_store }
    }

    /// Remember a session handed over on the command line
    pub fn remember(&self, email: &str, session_token: &str) -> Result<()> {
        self.session_store.save(&SessionData {
            email: email.to_string(),
            session_token: session_token.to_string(),
        })
    }

    /// Load the stored session, attach its token to the client and resolve it.
    /// A session the server rejects is deleted.
    pub async fn check_existing_session(&self, api_client: &mut ApiClient) -> Result<AuthResolution> {
        let session = self.session_store.load()?;
        if let Some(session) = &session {
            log::info!("Found existing session, validating with server");
            api_client.set_session_token(Some(session.session_token.clone()));
        }

        let resolution = resolve_session(&*api_client, session.as_ref()).await?;
        if session.is_some() && resolution.status == AuthStatus::Unauthenticated {
            api_client.set_session_token(None);
            if let Err(e) = self.session_store.delete() {
                log::warn!("Failed to clear rejected session: {}", e);
            }
        }
        Ok(resolution)
    }

    pub fn logout(&self) -> Result<()> {
        self.session_store.delete()
    }
}
