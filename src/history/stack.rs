//! Undo/redo stack with coalescing of rapid transform edits.
//!
//! Holding an arrow key produces a burst of tiny transforms; the stack folds
//! each burst into one entry so a single undo reverts the whole gesture.

use super::action::{Action, ApplyAction};

/// Default coalescing window in milliseconds.
pub const DEFAULT_THRESHOLD_MS: u64 = 100;

/// Chronological action history with a cursor at the last applied action.
#[derive(Clone, Debug)]
pub struct ActionStack {
    actions: Vec<Action>,
    /// Number of applied actions (cursor + 1)
    applied: usize,
    threshold_ms: u64,
}

impl ActionStack {
    /// Create an empty stack with the default coalescing window.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD_MS)
    }

    /// Create an empty stack with a custom coalescing window.
    pub fn with_threshold(threshold_ms: u64) -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            threshold_ms,
        }
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    pub fn set_threshold_ms(&mut self, threshold_ms: u64) {
        self.threshold_ms = threshold_ms;
    }

    /// Record an action that has already been applied to its target.
    ///
    /// Continuous transforms on the same target within the window are merged
    /// into the action at the cursor. Anything after the cursor is discarded.
    pub fn push(&mut self, action: Action) {
        if self.should_coalesce(&action) {
            let last = &mut self.actions[self.applied - 1];
            last.offset.accumulate(action.offset);
            last.timestamp = action.timestamp;
            log::trace!("coalesced {} on {} -> {}", last.kind, last.target, last.offset);
        } else {
            if self.applied < self.actions.len() {
                self.actions[self.applied] = action;
            } else {
                self.actions.push(action);
            }
            self.applied += 1;
        }

        self.actions.truncate(self.applied);
    }

    fn should_coalesce(&self, action: &Action) -> bool {
        if !action.kind.is_continuous() {
            return false;
        }
        let Some(last) = self.current() else {
            return false;
        };
        // A clock that went backwards never merges.
        let within_window = action
            .timestamp
            .checked_sub(last.timestamp)
            .is_some_and(|delta| delta < self.threshold_ms);

        within_window && last.kind == action.kind && last.target == action.target
    }

    /// Revert the action at the cursor by replaying its inverse.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo<A: ApplyAction + ?Sized>(&mut self, applier: &mut A) -> bool {
        let Some(action) = self.current() else {
            return false;
        };
        let inverse = action.inverse();
        applier.apply_action(&inverse);
        self.applied -= 1;
        true
    }

    /// Re-apply the action right after the cursor.
    ///
    /// Returns false when there is nothing to redo.
    pub fn redo<A: ApplyAction + ?Sized>(&mut self, applier: &mut A) -> bool {
        let Some(action) = self.actions.get(self.applied) else {
            return false;
        };
        self.applied += 1;
        applier.apply_action(action);
        true
    }

    /// The last applied action.
    pub fn current(&self) -> Option<&Action> {
        self.applied.checked_sub(1).and_then(|i| self.actions.get(i))
    }

    /// Cursor index, `-1` when nothing is applied.
    pub fn cursor(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// All stored actions, including undone ones still available for redo.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions currently in effect.
    pub fn applied(&self) -> &[Action] {
        &self.actions[..self.applied]
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
    }

    /// One line per entry, the cursor marked with `>`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let marker = |on: bool| if on { '>' } else { ' ' };
        out.push_str(&format!("{} ======= STACK =======\n", marker(self.applied == 0)));
        for (i, action) in self.actions.iter().enumerate() {
            let current = i + 1 == self.applied;
            if action.kind.is_continuous() {
                out.push_str(&format!("{} {} {}\n", marker(current), action.kind, action.offset));
            } else {
                out.push_str(&format!("{} {} {}\n", marker(current), action.kind, action.target));
            }
        }
        out
    }
}

impl Default for ActionStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::action::{ActionKind, Offset};
    use crate::scene::ObjectId;
    use std::collections::HashMap;

    /// Applies offsets to a flat per-target state and logs every replay.
    #[derive(Default)]
    struct Recorder {
        replayed: Vec<Action>,
        state: HashMap<(ObjectId, ActionKind), (f64, f64)>,
    }

    impl Recorder {
        fn apply(&mut self, action: &Action) {
            let entry = self.state.entry((action.target.clone(), action.kind)).or_default();
            match action.offset {
                Offset::Scalar(v) => entry.0 += v,
                Offset::Pair(a, b) => {
                    entry.0 += a;
                    entry.1 += b;
                }
            }
        }

        fn get(&self, target: &str, kind: ActionKind) -> (f64, f64) {
            self.state.get(&(ObjectId::new(target), kind)).copied().unwrap_or_default()
        }
    }

    impl ApplyAction for Recorder {
        fn apply_action(&mut self, action: &Action) {
            self.replayed.push(action.clone());
            self.apply(action);
        }
    }

    fn id(s: &str) -> ObjectId {
        ObjectId::new(s)
    }

    #[test]
    fn test_new_stack_is_empty() {
        let stack = ActionStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.cursor(), -1);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.threshold_ms(), DEFAULT_THRESHOLD_MS);
    }

    #[test]
    fn test_position_within_window_coalesces() {
        let mut stack = ActionStack::new();
        stack.push(Action::position(id("a"), 0.001, 0.0, 1_000));
        stack.push(Action::position(id("a"), 0.002, -0.001, 1_050));

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.cursor(), 0);
        let merged = &stack.actions()[0];
        match merged.offset {
            Offset::Pair(lng, lat) => {
                assert!((lng - 0.003).abs() < 1e-12);
                assert!((lat + 0.001).abs() < 1e-12);
            }
            Offset::Scalar(_) => panic!("position must stay a pair"),
        }
        assert_eq!(merged.timestamp, 1_050);
    }

    #[test]
    fn test_position_beyond_window_stays_separate() {
        let mut stack = ActionStack::new();
        stack.push(Action::position(id("a"), 0.001, 0.0, 1_000));
        stack.push(Action::position(id("a"), 0.002, 0.0, 1_200));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.cursor(), 1);
    }

    #[test]
    fn test_window_is_exclusive() {
        let mut stack = ActionStack::new();
        stack.push(Action::rotation(id("a"), 1.0, 1_000));
        stack.push(Action::rotation(id("a"), 1.0, 1_100));
        assert_eq!(stack.len(), 2);

        stack.push(Action::rotation(id("a"), 1.0, 1_199));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.actions()[1].offset, Offset::Scalar(2.0));
    }

    #[test]
    fn test_chained_bursts_extend_window() {
        let mut stack = ActionStack::new();
        for i in 0..10 {
            stack.push(Action::scale(id("a"), 0.5, 1_000 + i * 60));
        }
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.actions()[0].offset, Offset::Scalar(5.0));
        assert_eq!(stack.actions()[0].timestamp, 1_540);
    }

    #[test]
    fn test_different_target_or_kind_does_not_coalesce() {
        let mut stack = ActionStack::new();
        stack.push(Action::rotation(id("a"), 1.0, 1_000));
        stack.push(Action::rotation(id("b"), 1.0, 1_010));
        stack.push(Action::scale(id("b"), 1.0, 1_020));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_remove_and_create_never_coalesce() {
        let mut stack = ActionStack::new();
        stack.push(Action::create(id("a"), 1_000));
        stack.push(Action::remove(id("a"), 1_001));
        stack.push(Action::remove(id("a"), 1_002));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_backwards_clock_does_not_coalesce() {
        let mut stack = ActionStack::new();
        stack.push(Action::rotation(id("a"), 1.0, 1_000));
        stack.push(Action::rotation(id("a"), 1.0, 990));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_undo_replays_inverse() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        stack.push(Action::position(id("a"), 0.5, 0.25, 1_000));

        assert!(stack.undo(&mut rec));
        assert_eq!(rec.replayed.len(), 1);
        assert_eq!(rec.replayed[0].offset, Offset::Pair(-0.5, -0.25));
        assert_eq!(rec.replayed[0].timestamp, 1_000);
        assert_eq!(stack.cursor(), -1);
        assert!(stack.can_redo());
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        assert!(!stack.undo(&mut rec));
        assert!(!stack.redo(&mut rec));
        assert!(rec.replayed.is_empty());
        assert_eq!(stack.cursor(), -1);
    }

    #[test]
    fn test_redo_replays_stored_action() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        stack.push(Action::scale(id("a"), 2.0, 1_000));
        stack.undo(&mut rec);

        assert!(stack.redo(&mut rec));
        assert_eq!(rec.replayed[1].offset, Offset::Scalar(2.0));
        assert_eq!(stack.cursor(), 0);
        assert!(!stack.redo(&mut rec));
        assert_eq!(rec.replayed.len(), 2);
    }

    #[test]
    fn test_push_after_undo_discards_redo() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        let a = Action::rotation(id("a"), 1.0, 1_000);
        let b = Action::rotation(id("b"), 2.0, 2_000);
        let c = Action::rotation(id("c"), 3.0, 3_000);

        stack.push(a.clone());
        stack.push(b);
        stack.undo(&mut rec);
        stack.push(c.clone());

        assert!(!stack.redo(&mut rec));
        assert_eq!(stack.actions(), &[a, c]);
        assert_eq!(stack.cursor(), 1);
    }

    #[test]
    fn test_coalescing_push_still_truncates() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        stack.push(Action::rotation(id("a"), 1.0, 1_000));
        stack.push(Action::scale(id("a"), 1.0, 1_010));
        stack.undo(&mut rec);

        // Merges into the rotation at the cursor and drops the undone scale.
        stack.push(Action::rotation(id("a"), 1.0, 1_050));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.actions()[0].offset, Offset::Scalar(2.0));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        let pushes = [
            Action::position(id("a"), 0.001, 0.002, 1_000),
            Action::rotation(id("a"), 15.0, 2_000),
            Action::scale(id("a"), 0.5, 3_000),
            Action::position(id("b"), -0.003, 0.0, 4_000),
            Action::rotation(id("a"), -5.0, 4_010),
        ];
        for action in pushes {
            rec.apply(&action);
            stack.push(action);
        }
        let final_state = rec.state.clone();

        let mut undone = 0;
        while stack.undo(&mut rec) {
            undone += 1;
        }
        assert_eq!(undone, stack.len());
        let (lng, lat) = rec.get("a", ActionKind::Position);
        assert!(lng.abs() < 1e-12 && lat.abs() < 1e-12);

        for _ in 0..undone {
            assert!(stack.redo(&mut rec));
        }
        for (key, value) in &final_state {
            let now = rec.state[key];
            assert!((now.0 - value.0).abs() < 1e-12);
            assert!((now.1 - value.1).abs() < 1e-12);
        }
    }

    #[test]
    fn test_clear() {
        let mut stack = ActionStack::new();
        stack.push(Action::create(id("a"), 0));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.cursor(), -1);
    }

    #[test]
    fn test_describe_marks_cursor() {
        let mut stack = ActionStack::new();
        let mut rec = Recorder::default();
        stack.push(Action::create(id("lamp"), 0));
        stack.push(Action::scale(id("lamp"), 1.0, 500));
        stack.undo(&mut rec);

        let text = stack.describe();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(' '));
        assert_eq!(lines[1], "> create lamp");
        assert_eq!(lines[2], "  scale 1");
    }
}
