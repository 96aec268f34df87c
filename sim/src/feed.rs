//! Latest-snapshot channels, one per body.
//!
//! The driver sends every installed snapshot into a `watch` channel. Readers only
//! ever see the newest state and never hold the driver up.
use std::collections::{BTreeMap, HashMap};

use aero_physics::{Body, Simulation, StateSnapshot};
use tokio::sync::watch;

pub struct SnapshotFeed {
    receivers: BTreeMap<String, watch::Receiver<StateSnapshot>>,
}

impl SnapshotFeed {
    /// Opens a channel for every body currently in `simulation`, seeded with its current state.
    pub fn attach(simulation: &mut Simulation) -> Self {
        let mut senders = HashMap::new();
        let mut receivers = BTreeMap::new();
        for body in simulation.bodies() {
            let (sender, receiver) = watch::channel(body.state().clone());
            senders.insert(body.name().to_owned(), sender);
            receivers.insert(body.name().to_owned(), receiver);
        }

        simulation.add_observer(Box::new(move |body: &Body| {
            if let Some(sender) = senders.get(body.name()) {
                sender.send_replace(body.state().clone());
            }
        }));

        Self { receivers }
    }

    pub fn subscribe(&self, name: &str) -> Option<watch::Receiver<StateSnapshot>> {
        self.receivers.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.receivers.keys().map(String::as_str)
    }

    /// Latest snapshot of `name`, copied out of the channel.
    pub fn latest(&self, name: &str) -> Option<StateSnapshot> {
        self.receivers.get(name).map(|receiver| receiver.borrow().clone())
    }
}
