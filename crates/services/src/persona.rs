use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

use feynman_core::model::{Persona, default_persona, find_persona};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown guide: {0}")]
pub struct UnknownPersona(pub String);

/// The learner's chosen guide, shared across the session.
///
/// Consumers that need to react to changes call [`PersonaSelection::subscribe`]
/// instead of polling.
#[derive(Clone)]
pub struct PersonaSelection {
    sender: Arc<watch::Sender<Persona>>,
}

impl PersonaSelection {
    #[must_use]
    pub fn new(persona: Persona) -> Self {
        let (sender, _) = watch::channel(persona);
        Self {
            sender: Arc::new(sender),
        }
    }

    #[must_use]
    pub fn current(&self) -> Persona {
        self.sender.borrow().clone()
    }

    pub fn select(&self, persona: Persona) {
        info!(guide = %persona.id, "guide selected");
        self.sender.send_replace(persona);
    }

    /// Select a built-in guide by id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPersona` if no built-in guide has that id.
    pub fn select_by_id(&self, id: &str) -> Result<(), UnknownPersona> {
        let persona = find_persona(id).ok_or_else(|| UnknownPersona(id.to_owned()))?;
        self.select(persona);
        Ok(())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Persona> {
        self.sender.subscribe()
    }
}

impl Default for PersonaSelection {
    fn default() -> Self {
        Self::new(default_persona())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_default_persona() {
        assert_eq!(PersonaSelection::default().current(), default_persona());
    }

    #[test]
    fn select_by_id_rejects_unknown() {
        let selection = PersonaSelection::default();
        assert_eq!(
            selection.select_by_id("nobody").unwrap_err(),
            UnknownPersona("nobody".into())
        );
        selection.select_by_id("ada_lovelace").unwrap();
        assert_eq!(selection.current().short_name, "Ada");
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let selection = PersonaSelection::default();
        let mut rx = selection.subscribe();
        let other = selection.clone();

        other.select_by_id("isaac_newton").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().id, "isaac_newton");
    }
}
