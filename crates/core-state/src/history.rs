use ropey::Rope;
use tracing::{debug, trace};

/// Maximum number of snapshots retained in undo history by default.
pub const HISTORY_CAPACITY_DEFAULT: usize = 100;

/// Buffer content and cursor captured immediately before a mutation.
///
/// Content is a rope clone: chunks are shared structurally with the live
/// buffer, but later edits to either side never affect the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: Rope,
    pub cursor: usize,
}

impl Snapshot {
    pub fn new(content: Rope, cursor: usize) -> Self {
        Self { content, cursor }
    }
}

/// Linear undo/redo history.
///
/// `position` indexes the snapshot currently shown; `position == len()` means
/// the live edit is shown. Pushes always append and jump back to the live
/// edge; entries left over from an abandoned redo branch stay in the sequence.
/// Once `capacity` entries are stored further pushes are dropped, old entries
/// are never evicted.
///
/// The live state is parked when an undo first leaves the live edge so that
/// redo can walk all the way back to it. A push discards the parked state.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    position: usize,
    capacity: usize,
    parked: Option<Snapshot>,
    dropped: u64,
    skipped: u64,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY_DEFAULT)
    }
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            position: 0,
            capacity,
            parked: None,
            dropped: 0,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.entries.len()
    }

    /// Pushes ignored because the stack was full.
    pub fn dropped_pushes(&self) -> u64 {
        self.dropped
    }

    /// Pushes ignored because they repeated the newest entry.
    pub fn skipped_pushes(&self) -> u64 {
        self.skipped
    }

    /// Record the pre-mutation state. Never fails; a full stack silently
    /// ignores the snapshot.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.parked = None;
        if self.entries.last() == Some(&snapshot) {
            self.skipped += 1;
            self.position = self.entries.len();
            trace!(target: "state.history", len = self.entries.len(), "snapshot_dedupe_skip");
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.push(snapshot);
            trace!(target: "state.history", len = self.entries.len(), cursor = self.entries[self.entries.len() - 1].cursor, "push_snapshot");
        } else {
            self.dropped += 1;
            debug!(target: "state.history", capacity = self.capacity, dropped = self.dropped, "history_full_push_dropped");
        }
        self.position = self.entries.len();
    }

    /// Step back one entry. `live` is the state currently shown; it is kept
    /// when leaving the live edge so [`redo`](Self::redo) can return to it.
    /// Returns the snapshot to restore, or `None` at the bottom of history.
    pub fn undo(&mut self, live: Snapshot) -> Option<Snapshot> {
        if self.position == 0 {
            return None;
        }
        if self.position == self.entries.len() {
            self.parked = Some(live);
        }
        self.position -= 1;
        trace!(target: "state.history", position = self.position, len = self.entries.len(), "undo");
        Some(self.entries[self.position].clone())
    }

    /// Step forward one entry. Returns `None` when already at the live edge.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.position >= self.entries.len() {
            return None;
        }
        let next = self.position + 1;
        let snapshot = if next == self.entries.len() {
            self.parked.take()?
        } else {
            self.entries[next].clone()
        };
        self.position = next;
        trace!(target: "state.history", position = self.position, len = self.entries.len(), "redo");
        Some(snapshot)
    }

    /// Forget everything (new document loaded).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.parked = None;
        self.position = 0;
        trace!(target: "state.history", "history_cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(s: &str, cursor: usize) -> Snapshot {
        Snapshot::new(Rope::from_str(s), cursor)
    }

    fn text(s: &Snapshot) -> String {
        s.content.to_string()
    }

    #[test]
    fn push_moves_to_live_edge() {
        let mut h = HistoryStack::new(10);
        h.push(snap("a", 1));
        h.push(snap("ab", 2));
        assert_eq!(h.len(), 2);
        assert_eq!(h.position(), 2);
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn undo_at_bottom_is_noop() {
        let mut h = HistoryStack::new(10);
        assert!(h.undo(snap("", 0)).is_none());
        assert_eq!(h.position(), 0);
    }

    #[test]
    fn redo_at_live_edge_is_noop() {
        let mut h = HistoryStack::new(10);
        h.push(snap("a", 1));
        assert!(h.redo().is_none());
        assert_eq!(h.position(), 1);
    }

    #[test]
    fn undo_then_redo_returns_to_parked_live_state() {
        let mut h = HistoryStack::new(10);
        h.push(snap("", 0));
        h.push(snap("a", 1));
        let live = snap("ab", 2);
        assert_eq!(text(&h.undo(live.clone()).unwrap()), "a");
        assert_eq!(text(&h.undo(snap("a", 1)).unwrap()), "");
        assert!(h.undo(snap("", 0)).is_none());
        assert_eq!(text(&h.redo().unwrap()), "a");
        assert_eq!(h.redo().unwrap(), live);
        assert!(h.redo().is_none());
    }

    #[test]
    fn push_after_undo_appends_and_discards_parked() {
        let mut h = HistoryStack::new(10);
        h.push(snap("x", 1));
        h.push(snap("xy", 2));
        h.undo(snap("xyz", 3));
        h.undo(snap("xy", 2));
        assert_eq!(h.position(), 0);
        h.push(snap("x", 1));
        // appended after the abandoned branch; the new pre-state equals entry 0
        // but not the newest entry, so it is stored
        assert_eq!(h.len(), 3);
        assert_eq!(h.position(), 3);
        assert!(h.redo().is_none());
    }

    #[test]
    fn identical_consecutive_snapshot_is_skipped() {
        let mut h = HistoryStack::new(10);
        h.push(snap("a", 1));
        h.push(snap("a", 1));
        assert_eq!(h.len(), 1);
        assert_eq!(h.skipped_pushes(), 1);
        // same content, different cursor is a distinct snapshot
        h.push(snap("a", 0));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn full_stack_drops_new_pushes() {
        let mut h = HistoryStack::new(100);
        for i in 0..100 {
            h.push(snap(&i.to_string(), 0));
        }
        assert_eq!(h.len(), 100);
        h.push(snap("overflow", 0));
        assert_eq!(h.len(), 100);
        assert_eq!(h.dropped_pushes(), 1);
        assert_eq!(h.position(), 100);
        let restored = h.undo(snap("live", 0)).unwrap();
        assert_eq!(text(&restored), "99");
        let mut steps = 1;
        while h.undo(snap("ignored", 0)).is_some() {
            steps += 1;
        }
        assert_eq!(steps, 100);
    }

    #[test]
    fn clear_resets_everything() {
        let mut h = HistoryStack::new(4);
        h.push(snap("a", 0));
        h.undo(snap("b", 0));
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.position(), 0);
        assert!(h.redo().is_none());
        assert!(h.undo(snap("c", 0)).is_none());
    }
}
