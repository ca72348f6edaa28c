//! Restores a persisted login when the client starts.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tienda_core::SessionUser;

use super::{HookOutcome, StartupHook};
use crate::config::ExecutionContext;

/// Shared authentication state.
pub trait AuthSession: Send + Sync {
    /// Try to restore a session. Returns whether one was restored; never
    /// fails.
    fn check_auth(&self) -> impl Future<Output = bool> + Send;

    /// The signed-in user, if any.
    fn user(&self) -> Option<SessionUser>;

    /// Whether a user is signed in.
    fn is_logged_in(&self) -> bool {
        self.user().is_some()
    }
}

/// Startup hook that asks an [`AuthSession`] to restore itself.
pub struct AuthRestoreBootstrap<A> {
    session: Arc<A>,
}

impl<A: AuthSession> AuthRestoreBootstrap<A> {
    pub const NAME: &'static str = "auth-restore";

    #[must_use]
    pub const fn new(session: Arc<A>) -> Self {
        Self { session }
    }

    async fn restore(&self, context: ExecutionContext) -> HookOutcome {
        if !context.is_client() {
            return HookOutcome::Skipped;
        }

        let restored = self.session.check_auth().await;
        match self.session.user().filter(|_| restored) {
            Some(user) => {
                tracing::info!(email = %user.email, "Session restored for {}", user.email);
                HookOutcome::Completed {
                    detail: Some(user.email.to_string()),
                }
            }
            None => {
                tracing::info!("No session restored");
                HookOutcome::completed()
            }
        }
    }
}

impl<A: AuthSession + 'static> StartupHook for AuthRestoreBootstrap<A> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, context: ExecutionContext) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.restore(context))
    }
}
