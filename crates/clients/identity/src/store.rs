//! Observable auth state.
//!
//! [`AuthStore`] owns a single writer task. It fetches the current user once
//! on mount and follows the provider's auth change stream until dropped.
//! Readers take snapshots or watch for changes.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{AuthSubscription, IdentityProvider};
use crate::error::IdentityResult;
use crate::types::{AuthChangeEvent, AuthStateChange, ProviderUser};

/// Point-in-time auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub user: Option<ProviderUser>,
    /// True until the first user fetch settles
    pub is_loading: bool,
}

impl AuthSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

enum Command {
    ClearUser,
}

/// Auth state container bound to one identity provider.
pub struct AuthStore {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Receiver<AuthSnapshot>,
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl AuthStore {
    /// Subscribe to auth changes and start fetching the current user.
    pub async fn mount(provider: Arc<dyn IdentityProvider>) -> Self {
        let subscription = provider.subscribe().await;

        // Detached so unmounting never cancels the provider call
        let fetch = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.current_user().await }
        });

        let (state_tx, state) = watch::channel(AuthSnapshot::default());
        let (commands, command_rx) = mpsc::channel(8);
        let task = tokio::spawn(run(fetch, subscription, state_tx, command_rx));

        Self {
            provider,
            state,
            commands,
            task,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn changes(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.clone()
    }

    /// Wait until the initial load has settled.
    pub async fn settled(&self) -> AuthSnapshot {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|snapshot| !snapshot.is_loading)
            .await
            .map(|snapshot| snapshot.clone())
            .ok();
        settled.unwrap_or_else(|| state.borrow().clone())
    }

    /// Sign out at the provider, then clear the user.
    pub async fn sign_out(&self) -> IdentityResult<()> {
        self.provider.sign_out().await?;
        // Writer only stops once the store is dropped
        let _ = self.commands.send(Command::ClearUser).await;
        Ok(())
    }
}

impl Drop for AuthStore {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut fetch: JoinHandle<IdentityResult<Option<ProviderUser>>>,
    mut subscription: AuthSubscription,
    state: watch::Sender<AuthSnapshot>,
    mut commands: mpsc::Receiver<Command>,
) {
    let mut fetching = true;
    let mut listening = true;

    loop {
        tokio::select! {
            result = &mut fetch, if fetching => {
                fetching = false;
                let user = match result {
                    Ok(Ok(user)) => user,
                    Ok(Err(e)) => {
                        warn!(error = %e, "Failed to fetch current user");
                        None
                    }
                    Err(e) => {
                        warn!(error = %e, "Current user fetch aborted");
                        None
                    }
                };
                state.send_if_modified(|snapshot| {
                    let changed = snapshot.user != user || snapshot.is_loading;
                    snapshot.user = user;
                    snapshot.is_loading = false;
                    changed
                });
            }
            change = subscription.next(), if listening => match change {
                Some(change) => apply_change(&state, change),
                None => listening = false,
            },
            command = commands.recv() => match command {
                Some(Command::ClearUser) => {
                    state.send_if_modified(|snapshot| snapshot.user.take().is_some());
                }
                None => break,
            },
        }
    }
}

fn apply_change(state: &watch::Sender<AuthSnapshot>, change: AuthStateChange) {
    debug!(event = ?change.event, "Auth state changed");
    let user = change.session.map(|session| session.user);

    state.send_if_modified(|snapshot| {
        let mut changed = false;
        if snapshot.user != user {
            snapshot.user = user;
            changed = true;
        }
        if change.event == AuthChangeEvent::InitialSession && snapshot.is_loading {
            snapshot.is_loading = false;
            changed = true;
        }
        changed
    });
}
