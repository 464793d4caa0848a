use crate::dtos::WsEventDTO;
use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

/// Signals delivered to a connection's write task
#[derive(Debug)]
pub enum InternalSignal {
    Shutdown,
    Event(WsEventDTO),
}

/// Channel of the write task of each connected user. A user has at most one
/// live connection: registering again replaces and shuts down the previous one.
#[derive(Default)]
pub struct UserMap {
    users_online: DashMap<String, UnboundedSender<InternalSignal>>,
}

impl UserMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, tx), fields(user_id = %user_id))]
    pub fn register_online(&self, user_id: &str, tx: UnboundedSender<InternalSignal>) {
        if let Some(previous) = self.users_online.insert(user_id.to_string(), tx) {
            info!("Replacing previous connection");
            let _ = previous.send(InternalSignal::Shutdown);
        }
        info!("Total online users: {}", self.users_online.len());
    }

    /// Removes the user only if `tx` is still their registered channel, so a
    /// closing connection never unregisters the one that replaced it
    #[instrument(skip(self, tx), fields(user_id = %user_id))]
    pub fn remove_from_online(&self, user_id: &str, tx: &UnboundedSender<InternalSignal>) {
        if self
            .users_online
            .remove_if(user_id, |_, registered| registered.same_channel(tx))
            .is_some()
        {
            info!("User removed from online");
        }
    }

    #[instrument(skip(self, event), fields(user_id = %user_id))]
    pub fn send_if_online(&self, user_id: &str, event: WsEventDTO) {
        match self.users_online.get(user_id) {
            Some(entry) => {
                if let Err(e) = entry.value().send(InternalSignal::Event(event)) {
                    warn!("Failed to queue event for user: {:?}", e);
                }
            }
            None => debug!("User not online, event dropped"),
        }
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, user_id: &str) -> bool {
        self.users_online.contains_key(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn event() -> WsEventDTO {
        WsEventDTO::UnreadCount { count: 1 }
    }

    #[tokio::test]
    async fn events_reach_registered_users_only() {
        let map = UserMap::new();
        let (tx, mut rx) = unbounded_channel();
        map.register_online("alice", tx);

        map.send_if_online("alice", event());
        map.send_if_online("bob", event());

        match rx.recv().await {
            Some(InternalSignal::Event(e)) => assert_eq!(e, event()),
            other => panic!("unexpected signal: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
        assert!(!map.is_user_online("bob"));
    }

    #[tokio::test]
    async fn new_connection_shuts_down_the_previous_one() {
        let map = UserMap::new();
        let (old_tx, mut old_rx) = unbounded_channel();
        let (new_tx, _new_rx) = unbounded_channel();

        map.register_online("alice", old_tx.clone());
        map.register_online("alice", new_tx);
        assert!(matches!(old_rx.recv().await, Some(InternalSignal::Shutdown)));

        // the old connection closing must not unregister the new one
        map.remove_from_online("alice", &old_tx);
        assert!(map.is_user_online("alice"));
        assert_eq!(map.online_count(), 1);
    }

    #[test]
    fn removing_the_current_channel_unregisters_the_user() {
        let map = UserMap::new();
        let (tx, _rx) = unbounded_channel();
        map.register_online("alice", tx.clone());
        map.remove_from_online("alice", &tx);
        assert_eq!(map.online_count(), 0);
    }
}
