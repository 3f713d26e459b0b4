//! Signed-in user tracking.
//!
//! The provider publishes the current user on a `watch` channel so
//! subscribers observe every sign-in, sign-out and account switch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            full_name: None,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// First word of the full name, or "there" for greetings.
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("there")
    }
}

/// Source of truth for who is signed in.
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    sender: Arc<watch::Sender<Option<User>>>,
}

impl IdentityProvider {
    /// Creates a provider with nobody signed in.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Option<User> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.sender.subscribe()
    }

    /// Signs in `user`. Re-signing the same user is not a change.
    pub fn sign_in(&self, user: User) {
        self.replace(Some(user));
    }

    pub fn sign_out(&self) {
        self.replace(None);
    }

    fn replace(&self, next: Option<User>) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            match self.sender.borrow().as_ref() {
                Some(user) => log::info!("User {} signed in", user.id),
                None => log::info!("Signed out"),
            }
        }
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}
