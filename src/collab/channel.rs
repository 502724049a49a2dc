//! Collaboration channel.
//!
//! A duplex pub/sub keyed by project id. Every subscriber of a project,
//! including the publisher itself, receives each message; echo suppression
//! is the reconciler's job.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::event::ChannelMessage;
use crate::project::ProjectId;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel for project `{0}` is closed")]
    Closed(ProjectId),
}

pub trait CollabChannel: Send + Sync {
    /// Send to every subscriber of `project`. Returns how many received it.
    fn publish(&self, project: &ProjectId, message: ChannelMessage) -> Result<usize, ChannelError>;

    /// Receive every message published to `project` from now on.
    fn subscribe(&self, project: &ProjectId) -> Receiver<ChannelMessage>;
}

/// In-process channel: all collaborators live in the same process.
#[derive(Default)]
pub struct LoopbackHub {
    topics: Mutex<FxHashMap<ProjectId, Vec<Sender<ChannelMessage>>>>,
    closed: AtomicBool,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disconnect every subscriber. Later publishes fail.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.topics.lock().clear();
    }

    pub fn subscriber_count(&self, project: &ProjectId) -> usize {
        self.topics.lock().get(project).map_or(0, Vec::len)
    }
}

impl CollabChannel for LoopbackHub {
    fn publish(&self, project: &ProjectId, message: ChannelMessage) -> Result<usize, ChannelError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed(project.clone()));
        }
        let mut topics = self.topics.lock();
        let Some(subscribers) = topics.get_mut(project) else {
            return Ok(0);
        };

        // Dropped receivers unsubscribe implicitly.
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        if subscribers.is_empty() {
            topics.remove(project);
        }
        Ok(topics.get(project).map_or(0, Vec::len))
    }

    fn subscribe(&self, project: &ProjectId) -> Receiver<ChannelMessage> {
        let (tx, rx) = unbounded();
        self.topics.lock().entry(project.clone()).or_default().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::event::CollaboratorId;

    fn leave(who: &str) -> ChannelMessage {
        ChannelMessage::Leave(CollaboratorId::from(who))
    }

    #[test]
    fn test_all_subscribers_receive() {
        let hub = LoopbackHub::new();
        let project = ProjectId::from("p1");
        let a = hub.subscribe(&project);
        let b = hub.subscribe(&project);

        assert_eq!(hub.publish(&project, leave("alice")).unwrap(), 2);
        assert_eq!(a.try_recv().unwrap(), leave("alice"));
        assert_eq!(b.try_recv().unwrap(), leave("alice"));
    }

    #[test]
    fn test_projects_are_isolated() {
        let hub = LoopbackHub::new();
        let one = hub.subscribe(&ProjectId::from("one"));
        let _two = hub.subscribe(&ProjectId::from("two"));

        hub.publish(&ProjectId::from("two"), leave("bob")).unwrap();
        assert!(one.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_unsubscribes() {
        let hub = LoopbackHub::new();
        let project = ProjectId::from("p1");
        let kept = hub.subscribe(&project);
        drop(hub.subscribe(&project));

        assert_eq!(hub.publish(&project, leave("x")).unwrap(), 1);
        assert_eq!(hub.subscriber_count(&project), 1);
        drop(kept);
        assert_eq!(hub.publish(&project, leave("y")).unwrap(), 0);
        assert_eq!(hub.subscriber_count(&project), 0);
    }

    #[test]
    fn test_shutdown_disconnects() {
        let hub = LoopbackHub::new();
        let project = ProjectId::from("p1");
        let rx = hub.subscribe(&project);

        hub.shutdown();
        assert!(rx.recv().is_err());
        assert!(matches!(hub.publish(&project, leave("z")), Err(ChannelError::Closed(_))));
    }
}
