use tracing::debug;

/// Whether the lightbox is open, and on which item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Closed,
    Open(usize),
}

impl SelectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SelectionState::Open(_))
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            SelectionState::Open(index) => Some(*index),
            SelectionState::Closed => None,
        }
    }
}

/// A committed state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub from: SelectionState,
    pub to: SelectionState,
}

impl SelectionChange {
    /// The viewer went from closed to open or back
    pub fn toggles_viewer(&self) -> bool {
        self.from.is_open() != self.to.is_open()
    }
}

/// Lightbox state machine over a list of `len` items
///
/// Every operation returns the change it made, or `None` when it was a
/// no-op. Requests that name an index outside the list are ignored rather
/// than clamped, and `next`/`previous` stop at the ends of the list.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
    len: usize,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self {
            state: SelectionState::Closed,
            len,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index()
    }

    pub fn has_next(&self) -> bool {
        matches!(self.state, SelectionState::Open(i) if i + 1 < self.len)
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.state, SelectionState::Open(i) if i > 0)
    }

    fn transition(&mut self, to: SelectionState) -> Option<SelectionChange> {
        if self.state == to {
            return None;
        }
        let change = SelectionChange {
            from: self.state,
            to,
        };
        debug!(from = ?change.from, to = ?change.to, "Selection changed");
        self.state = to;
        Some(change)
    }

    pub fn open_at(&mut self, index: usize) -> Option<SelectionChange> {
        if index >= self.len {
            debug!(index, len = self.len, "Ignoring out-of-range selection");
            return None;
        }
        self.transition(SelectionState::Open(index))
    }

    pub fn next(&mut self) -> Option<SelectionChange> {
        match self.state {
            SelectionState::Open(i) if i + 1 < self.len => self.transition(SelectionState::Open(i + 1)),
            _ => None,
        }
    }

    pub fn previous(&mut self) -> Option<SelectionChange> {
        match self.state {
            SelectionState::Open(i) if i > 0 => self.transition(SelectionState::Open(i - 1)),
            _ => None,
        }
    }

    pub fn close(&mut self) -> Option<SelectionChange> {
        self.transition(SelectionState::Closed)
    }

    /// Adopt a replaced item list
    ///
    /// `active` is where the previously open item sits in the new list, or
    /// `None` when it was removed. The viewer follows the item or closes; it
    /// never stays on an index that now holds something else.
    pub fn reconcile(&mut self, len: usize, active: Option<usize>) -> Option<SelectionChange> {
        self.len = len;
        if !self.state.is_open() {
            return None;
        }
        match active {
            Some(index) if index < len => self.transition(SelectionState::Open(index)),
            _ => self.transition(SelectionState::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let selection = Selection::new(3);
        assert_eq!(selection.state(), SelectionState::Closed);
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn test_open_and_jump() {
        let mut selection = Selection::new(5);
        let change = selection.open_at(2).unwrap();
        assert_eq!(change.from, SelectionState::Closed);
        assert_eq!(change.to, SelectionState::Open(2));
        assert!(change.toggles_viewer());

        let change = selection.open_at(4).unwrap();
        assert!(!change.toggles_viewer());
        assert_eq!(selection.active_index(), Some(4));
    }

    #[test]
    fn test_open_out_of_range_is_noop() {
        let mut selection = Selection::new(3);
        assert!(selection.open_at(3).is_none());
        assert_eq!(selection.state(), SelectionState::Closed);

        selection.open_at(1);
        assert!(selection.open_at(10).is_none());
        assert_eq!(selection.state(), SelectionState::Open(1));
    }

    #[test]
    fn test_reopening_same_index_is_noop() {
        let mut selection = Selection::new(3);
        selection.open_at(1);
        assert!(selection.open_at(1).is_none());
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut selection = Selection::new(3);
        selection.open_at(2);
        for _ in 0..5 {
            assert!(selection.next().is_none());
        }
        assert_eq!(selection.state(), SelectionState::Open(2));
        assert!(!selection.has_next());
    }

    #[test]
    fn test_previous_clamps_at_start() {
        let mut selection = Selection::new(3);
        selection.open_at(0);
        for _ in 0..5 {
            assert!(selection.previous().is_none());
        }
        assert_eq!(selection.state(), SelectionState::Open(0));
        assert!(!selection.has_previous());
    }

    #[test]
    fn test_next_previous_walk() {
        let mut selection = Selection::new(3);
        selection.open_at(0);
        selection.next();
        selection.next();
        assert_eq!(selection.active_index(), Some(2));
        selection.previous();
        assert_eq!(selection.active_index(), Some(1));
    }

    #[test]
    fn test_navigation_requires_open() {
        let mut selection = Selection::new(3);
        assert!(selection.next().is_none());
        assert!(selection.previous().is_none());
        assert!(selection.close().is_none());
    }

    #[test]
    fn test_close() {
        let mut selection = Selection::new(3);
        selection.open_at(1);
        let change = selection.close().unwrap();
        assert_eq!(change.to, SelectionState::Closed);
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn test_reconcile_closes_when_item_removed() {
        let mut selection = Selection::new(5);
        selection.open_at(2);
        let change = selection.reconcile(2, None).unwrap();
        assert_eq!(change.to, SelectionState::Closed);
        assert_eq!(selection.state(), SelectionState::Closed);
    }

    #[test]
    fn test_reconcile_follows_moved_item() {
        let mut selection = Selection::new(5);
        selection.open_at(2);
        let change = selection.reconcile(4, Some(1)).unwrap();
        assert_eq!(change.from, SelectionState::Open(2));
        assert_eq!(change.to, SelectionState::Open(1));
        assert_eq!(selection.len(), 4);
    }

    #[test]
    fn test_reconcile_unmoved_item_is_noop() {
        let mut selection = Selection::new(5);
        selection.open_at(1);
        assert!(selection.reconcile(3, Some(1)).is_none());
        assert_eq!(selection.state(), SelectionState::Open(1));
    }

    #[test]
    fn test_reconcile_while_closed() {
        let mut selection = Selection::new(5);
        assert!(selection.reconcile(2, None).is_none());
        assert_eq!(selection.len(), 2);
    }
}
