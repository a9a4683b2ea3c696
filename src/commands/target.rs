//! Player-name token to identity and stored record.

use crate::host::{IdentityBridge, OnlinePlayer, PlayerDirectory};
use crate::storage::PlayerStore;
use crate::types::{PlayerId, PlayerRecord};

use super::CommandError;

/// A player name resolved all the way to its stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub id: PlayerId,
    /// Name to show in replies.
    pub name: String,
    pub record: PlayerRecord,
}

/// Resolves names in this order: identity bridge (when it claims the name), connected
/// players, then the server's offline lookup.
pub struct TargetResolver<'a, D: PlayerDirectory + ?Sized> {
    directory: &'a D,
    bridge: Option<&'a dyn IdentityBridge>,
}

impl<'a, D: PlayerDirectory + ?Sized> TargetResolver<'a, D> {
    pub fn new(directory: &'a D, bridge: Option<&'a dyn IdentityBridge>) -> Self {
        Self { directory, bridge }
    }

    /// Identity and display name for `name`, without touching storage.
    pub fn identity(&self, name: &str) -> Result<(PlayerId, String), CommandError> {
        if let Some(bridge) = self.bridge.filter(|b| b.is_known_non_native(name)) {
            let id = bridge
                .resolve_non_native(name)
                .ok_or_else(|| CommandError::PlayerNotFound(name.to_string()))?;
            return Ok((id, name.to_string()));
        }
        if let Some(online) = self.directory.online_player(name) {
            return Ok((online.id, online.name));
        }
        match self.directory.offline_player(name) {
            Some(known) => match known.name {
                Some(known_name) => Ok((known.id, known_name)),
                // The server has an identity but nobody ever joined under it.
                None => Err(CommandError::PlayerNotFound(name.to_string())),
            },
            None => Err(CommandError::PlayerNotFound(name.to_string())),
        }
    }

    /// Full resolution including the stored record.
    pub fn resolve(
        &self,
        store: &dyn PlayerStore,
        name: &str,
    ) -> Result<ResolvedTarget, CommandError> {
        let (id, display) = self.identity(name)?;
        let record = store
            .load(&id)?
            .ok_or_else(|| CommandError::PlayerNotFound(name.to_string()))?;
        Ok(ResolvedTarget {
            id,
            name: display,
            record,
        })
    }

    /// A connected player only; offline targets are not found.
    pub fn online(&self, name: &str) -> Result<OnlinePlayer, CommandError> {
        self.directory
            .online_player(name)
            .ok_or_else(|| CommandError::PlayerNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::InMemoryServer;
    use crate::host::BridgeRegistry;
    use crate::storage::SledPlayerStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SledPlayerStore, InMemoryServer) {
        let dir = TempDir::new().unwrap();
        let store = SledPlayerStore::open(dir.path()).unwrap();
        (dir, store, InMemoryServer::new("test"))
    }

    #[test]
    fn prefers_connected_player_then_offline_lookup() {
        let (_dir, mut store, mut server) = setup();
        let alex = PlayerId::new_random();
        let steve = PlayerId::new_random();
        store.save(&PlayerRecord::new(alex, "Alex", 10)).unwrap();
        store.save(&PlayerRecord::new(steve, "Steve", 10)).unwrap();
        server.connect(alex, "Alex", 20.0);
        server.remember(steve, Some("Steve"));

        let resolver = TargetResolver::new(&server, None);
        let target = resolver.resolve(&store, "alex").unwrap();
        assert_eq!(target.id, alex);
        assert_eq!(target.name, "Alex");
        assert_eq!(resolver.resolve(&store, "Steve").unwrap().id, steve);
        assert!(resolver.online("Steve").is_err());
    }

    #[test]
    fn never_joined_and_nameless_are_not_found() {
        let (_dir, store, mut server) = setup();
        server.remember_nameless("Ghost", PlayerId::new_random());
        let resolver = TargetResolver::new(&server, None);
        assert!(matches!(
            resolver.resolve(&store, "Ghost"),
            Err(CommandError::PlayerNotFound(_))
        ));
        assert!(matches!(
            resolver.resolve(&store, "Nobody"),
            Err(CommandError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn known_but_without_record_is_not_found() {
        let (_dir, store, mut server) = setup();
        server.connect(PlayerId::new_random(), "Fresh", 20.0);
        let resolver = TargetResolver::new(&server, None);
        assert!(matches!(
            resolver.resolve(&store, "Fresh"),
            Err(CommandError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn bridge_claims_names_first() {
        let (_dir, mut store, mut server) = setup();
        let bedrock = PlayerId::new_random();
        let impostor = PlayerId::new_random();
        store.save(&PlayerRecord::new(bedrock, ".Steve", 10)).unwrap();
        server.remember(impostor, Some(".Steve"));
        let mut bridge = BridgeRegistry::default();
        bridge.insert(".Steve", bedrock);

        let resolver = TargetResolver::new(&server, Some(&bridge));
        assert_eq!(resolver.resolve(&store, ".steve").unwrap().id, bedrock);
    }
}
