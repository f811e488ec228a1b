//! Keyboard focus for the editor.
//!
//! Two input layers exist: `Shortcuts` (save, undo, redo) is bound while
//! editing is enabled, `Transform` (mode keys, arrows, multiplier, remove,
//! deselect) while an object is being edited. The controller tracks both and
//! tells the injected [`InputBinding`] only about actual changes.

use std::sync::{Arc, Mutex};

use crate::scene::ObjectId;

/// Group of keys that is bound and unbound together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Shortcuts,
    Transform,
}

/// Whatever routes key events to the editor (window, terminal, test).
pub trait InputBinding: Send {
    fn subscribe(&mut self, layer: Layer);
    fn unsubscribe(&mut self, layer: Layer);
}

/// Binding that ignores everything, for headless use.
#[derive(Debug, Default)]
pub struct NullBinding;

impl InputBinding for NullBinding {
    fn subscribe(&mut self, _layer: Layer) {}
    fn unsubscribe(&mut self, _layer: Layer) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingEvent {
    Subscribe(Layer),
    Unsubscribe(Layer),
}

/// Records every effect. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingBinding {
    events: Arc<Mutex<Vec<BindingEvent>>>,
}

impl RecordingBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BindingEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<BindingEvent> {
        self.events.lock().map(|mut e| std::mem::take(&mut *e)).unwrap_or_default()
    }
}

impl InputBinding for RecordingBinding {
    fn subscribe(&mut self, layer: Layer) {
        if let Ok(mut events) = self.events.lock() {
            events.push(BindingEvent::Subscribe(layer));
        }
    }

    fn unsubscribe(&mut self, layer: Layer) {
        if let Ok(mut events) = self.events.lock() {
            events.push(BindingEvent::Unsubscribe(layer));
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Idle,
    Editing(ObjectId),
}

pub struct InputFocus {
    enabled: bool,
    state: FocusState,
    binding: Box<dyn InputBinding>,
}

impl InputFocus {
    pub fn new(binding: Box<dyn InputBinding>) -> Self {
        Self {
            enabled: false,
            state: FocusState::Idle,
            binding,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, FocusState::Editing(_))
    }

    /// Bind or unbind the shortcut layer.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.binding.subscribe(Layer::Shortcuts);
        } else {
            self.binding.unsubscribe(Layer::Shortcuts);
        }
    }

    /// Move to `Editing(target)` or back to `Idle`.
    ///
    /// Switching from one target to another keeps the transform layer bound.
    pub fn set_state(&mut self, next: FocusState) {
        let was_editing = self.is_editing();
        self.state = next;
        match (was_editing, self.is_editing()) {
            (false, true) => self.binding.subscribe(Layer::Transform),
            (true, false) => self.binding.unsubscribe(Layer::Transform),
            _ => {}
        }
    }

    /// Return to idle and release every layer.
    pub fn reset(&mut self) {
        self.set_state(FocusState::Idle);
        self.set_enabled(false);
    }
}

impl std::fmt::Debug for InputFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFocus")
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::BindingEvent::*;

    fn focus() -> (InputFocus, RecordingBinding) {
        let binding = RecordingBinding::new();
        (InputFocus::new(Box::new(binding.clone())), binding)
    }

    #[test]
    fn test_enable_emits_once() {
        let (mut focus, binding) = focus();
        focus.set_enabled(true);
        focus.set_enabled(true);
        focus.set_enabled(false);
        focus.set_enabled(false);
        assert_eq!(
            binding.events(),
            vec![Subscribe(Layer::Shortcuts), Unsubscribe(Layer::Shortcuts)]
        );
    }

    #[test]
    fn test_editing_transitions() {
        let (mut focus, binding) = focus();
        focus.set_state(FocusState::Editing("a".into()));
        focus.set_state(FocusState::Editing("b".into()));
        assert_eq!(focus.state(), &FocusState::Editing("b".into()));
        focus.set_state(FocusState::Idle);
        focus.set_state(FocusState::Idle);

        assert_eq!(
            binding.take(),
            vec![Subscribe(Layer::Transform), Unsubscribe(Layer::Transform)]
        );
        assert!(binding.events().is_empty());
    }

    #[test]
    fn test_reset_releases_everything() {
        let (mut focus, binding) = focus();
        focus.set_enabled(true);
        focus.set_state(FocusState::Editing("a".into()));
        binding.take();

        focus.reset();
        assert!(!focus.is_enabled());
        assert!(!focus.is_editing());
        assert_eq!(
            binding.events(),
            vec![Unsubscribe(Layer::Transform), Unsubscribe(Layer::Shortcuts)]
        );
    }
}
