use crate::error::RegistryError;
use didrelay_types::ConnectionState;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

/// Where connection lifecycle facts live.
///
/// The dispatcher writes through this trait and HTTP workers read through it,
/// so implementations must be safe for concurrent access.
pub trait ConnectionRegistry: Send + Sync {
    /// Record the latest state seen for a connection.
    fn record_state(
        &self,
        connection_id: &str,
        state: ConnectionState,
    ) -> Result<(), RegistryError>;

    fn state_of(&self, connection_id: &str) -> Result<Option<ConnectionState>, RegistryError>;

    /// Mark a connection usable. Returns `true` only the first time.
    fn mark_usable(&self, connection_id: &str) -> Result<bool, RegistryError>;

    fn is_usable(&self, connection_id: &str) -> Result<bool, RegistryError>;

    /// Usable connections, sorted by id.
    fn usable_connections(&self) -> Result<Vec<String>, RegistryError>;
}

#[derive(Default)]
struct RegistryInner {
    states: HashMap<String, ConnectionState>,
    usable: BTreeSet<String>,
}

/// Process-lifetime registry.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn record_state(
        &self,
        connection_id: &str,
        state: ConnectionState,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().map_err(|_| RegistryError::LockPoisoned)?;
        let current = inner.states.entry(connection_id.to_string()).or_insert(state);
        // Terminal states are sticky; late or duplicated notifications do not
        // move a finished attempt backwards.
        if !current.is_terminal() {
            *current = state;
        }
        Ok(())
    }

    fn state_of(&self, connection_id: &str) -> Result<Option<ConnectionState>, RegistryError> {
        let inner = self.inner.read().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(inner.states.get(connection_id).copied())
    }

    fn mark_usable(&self, connection_id: &str) -> Result<bool, RegistryError> {
        let mut inner = self.inner.write().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(inner.usable.insert(connection_id.to_string()))
    }

    fn is_usable(&self, connection_id: &str) -> Result<bool, RegistryError> {
        let inner = self.inner.read().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(inner.usable.contains(connection_id))
    }

    fn usable_connections(&self) -> Result<Vec<String>, RegistryError> {
        let inner = self.inner.read().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(inner.usable.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_usable_reports_first_time_only() {
        let registry = InMemoryConnectionRegistry::new();
        assert!(registry.mark_usable("conn-1").unwrap());
        assert!(!registry.mark_usable("conn-1").unwrap());
        assert!(registry.is_usable("conn-1").unwrap());
        assert!(!registry.is_usable("conn-2").unwrap());
    }

    #[test]
    fn terminal_state_is_not_overwritten() {
        let registry = InMemoryConnectionRegistry::new();
        registry.record_state("c", ConnectionState::Requested).unwrap();
        registry.record_state("c", ConnectionState::Completed).unwrap();
        registry.record_state("c", ConnectionState::Responded).unwrap();
        assert_eq!(registry.state_of("c").unwrap(), Some(ConnectionState::Completed));
    }

    #[test]
    fn usable_connections_are_sorted() {
        let registry = InMemoryConnectionRegistry::new();
        registry.mark_usable("b").unwrap();
        registry.mark_usable("a").unwrap();
        assert_eq!(registry.usable_connections().unwrap(), vec!["a", "b"]);
    }
}
