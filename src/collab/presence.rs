//! Who else has the project open.

use std::time::Duration;

use rustc_hash::FxHashMap;

use super::event::{CollaboratorId, PresenceBeat};
use crate::project::FileId;

/// A collaborator seen recently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collaborator {
    pub id: CollaboratorId,
    pub file_id: Option<FileId>,
    /// Milliseconds since the Unix epoch.
    pub last_seen: i64,
}

/// Last presence beat per collaborator.
pub struct PresenceRoster {
    me: CollaboratorId,
    window: Duration,
    seen: FxHashMap<CollaboratorId, (Option<FileId>, i64)>,
}

impl PresenceRoster {
    pub fn new(me: CollaboratorId, window: Duration) -> Self {
        Self {
            me,
            window,
            seen: FxHashMap::default(),
        }
    }

    /// Our own beat for `file_id`.
    pub fn beat(&self, file_id: Option<FileId>, now_ms: i64) -> PresenceBeat {
        PresenceBeat {
            collaborator: self.me.clone(),
            file_id,
            timestamp: now_ms,
        }
    }

    /// Record a beat. Own and out-of-order beats are ignored.
    pub fn record(&mut self, beat: &PresenceBeat) -> bool {
        if beat.collaborator == self.me {
            return false;
        }
        if let Some((_, at)) = self.seen.get(&beat.collaborator)
            && *at > beat.timestamp
        {
            return false;
        }
        self.seen
            .insert(beat.collaborator.clone(), (beat.file_id.clone(), beat.timestamp));
        true
    }

    /// A collaborator left.
    pub fn remove(&mut self, id: &CollaboratorId) -> bool {
        self.seen.remove(id).is_some()
    }

    /// Collaborators seen within the presence window, sorted by id.
    pub fn present(&self, now_ms: i64) -> Vec<Collaborator> {
        let cutoff = now_ms - self.window_ms();
        let mut present: Vec<Collaborator> = self
            .seen
            .iter()
            .filter(|(_, (_, at))| *at >= cutoff)
            .map(|(id, (file_id, at))| Collaborator {
                id: id.clone(),
                file_id: file_id.clone(),
                last_seen: *at,
            })
            .collect();
        present.sort_by(|a, b| a.id.cmp(&b.id));
        present
    }

    /// Drop collaborators outside the window.
    pub fn prune(&mut self, now_ms: i64) {
        let cutoff = now_ms - self.window_ms();
        self.seen.retain(|_, (_, at)| *at >= cutoff);
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    fn beat(who: &str, file: &str, at: i64) -> PresenceBeat {
        PresenceBeat {
            collaborator: who.into(),
            file_id: Some(file.into()),
            timestamp: at,
        }
    }

    fn roster() -> PresenceRoster {
        PresenceRoster::new("me".into(), Duration::from_secs(300))
    }

    #[test]
    fn test_window_and_self_excluded() {
        let mut roster = roster();
        assert!(roster.record(&beat("bob", "index", 0)));
        assert!(roster.record(&beat("carol", "styles", 4 * MIN)));
        assert!(!roster.record(&beat("me", "index", 4 * MIN)));

        let ids: Vec<_> = roster.present(5 * MIN).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CollaboratorId::from("bob"), CollaboratorId::from("carol")]);

        let ids: Vec<_> = roster.present(6 * MIN).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CollaboratorId::from("carol")]);
    }

    #[test]
    fn test_latest_beat_wins() {
        let mut roster = roster();
        roster.record(&beat("bob", "index", 2 * MIN));
        assert!(!roster.record(&beat("bob", "about", MIN)));
        assert_eq!(roster.present(2 * MIN)[0].file_id, Some(FileId::from("index")));

        roster.record(&beat("bob", "about", 3 * MIN));
        assert_eq!(roster.present(3 * MIN)[0].file_id, Some(FileId::from("about")));
    }

    #[test]
    fn test_leave_and_prune() {
        let mut roster = roster();
        roster.record(&beat("bob", "index", 0));
        roster.record(&beat("carol", "index", 10 * MIN));
        assert!(roster.remove(&"carol".into()));

        roster.prune(10 * MIN);
        assert!(roster.present(10 * MIN).is_empty());
    }
}
