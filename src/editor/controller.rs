//! The placement editor: history, tracker and scene behind one owner.
//!
//! User-facing operations record an action and then apply it. Undo and redo
//! replay actions through [`ApplyAction`] on [`EditorState`], which mutates
//! without recording. Keeping the history outside the state lets the stack
//! borrow the state mutably while it replays.

use std::future::Future;
use std::sync::Arc;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::diff::{DifferenceTracker, Notifier, RecordStore, SaveOutcome, Severity, log_notifier};
use crate::history::{Action, ActionKind, ActionStack, ApplyAction};
use crate::scene::{ObjectId, ObjectRecord, PlacedObject, SceneStore};

use super::command::{Direction, EditorCommand, TransformMode};
use super::config::EditorConfig;
use super::focus::{FocusState, InputBinding, InputFocus, NullBinding};
use super::keymap::{self, KeyChord};
use super::status::{EditorStatus, TargetStatus};

/// Arrow step per transform mode
#[derive(Clone, Copy, Debug, PartialEq)]
struct Steps {
    position: f64,
    rotation: f64,
    scale: f64,
}

impl Steps {
    fn get(&self, mode: TransformMode) -> f64 {
        match mode {
            TransformMode::Position => self.position,
            TransformMode::Rotation => self.rotation,
            TransformMode::Scale => self.scale,
        }
    }

    fn set(&mut self, mode: TransformMode, step: f64) {
        match mode {
            TransformMode::Position => self.position = step,
            TransformMode::Rotation => self.rotation = step,
            TransformMode::Scale => self.scale = step,
        }
    }
}

/// Everything the editor mutates, minus the history.
pub struct EditorState {
    enabled: bool,
    target: Option<ObjectId>,
    mode: TransformMode,
    steps: Steps,
    multiplier: u8,
    scene: SceneStore,
    tracker: DifferenceTracker,
    focus: InputFocus,
    notifier: Notifier,
}

impl EditorState {
    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn tracker(&self) -> &DifferenceTracker {
        &self.tracker
    }

    pub fn target(&self) -> Option<&ObjectId> {
        self.target.as_ref()
    }

    /// Change the target and rebind input accordingly.
    ///
    /// An enabled editor enlists every object it targets, so anything that
    /// gets touched is snapshotted on save.
    fn set_target(&mut self, target: Option<ObjectId>) {
        if let Some(old) = self.target.take() {
            self.scene.set_selected(&old, false);
        }
        if let Some(id) = &target {
            self.scene.set_selected(id, true);
        }
        self.target = target;

        match &self.target {
            Some(id) if self.enabled => {
                self.tracker.enlist(id);
                self.focus.set_state(FocusState::Editing(id.clone()));
            }
            _ => self.focus.set_state(FocusState::Idle),
        }
    }

    fn translate_target(&mut self, dlng: f64, dlat: f64) {
        if let Some(id) = &self.target {
            self.scene.translate(id, dlng, dlat);
        }
    }

    fn rotate_target(&mut self, degrees: f64) {
        if let Some(id) = &self.target {
            self.scene.rotate_y(id, degrees);
        }
    }

    fn scale_target(&mut self, delta: f64) {
        if let Some(id) = &self.target {
            self.scene.scale_by(id, delta);
        }
    }

    /// `1` hides the target, flags it deleted and deselects it.
    /// Any other offset shows it again and clears the flag.
    fn remove_target(&mut self, offset: f64) {
        let Some(id) = self.target.clone() else {
            (self.notifier)("no target to remove", Severity::Warning);
            return;
        };

        if offset == 1.0 {
            self.tracker.remove(&id);
            self.scene.set_visible(&id, false);
            self.set_target(None);
        } else {
            self.tracker.undo_remove(&id);
            self.scene.set_visible(&id, true);
        }
    }
}

impl ApplyAction for EditorState {
    fn apply_action(&mut self, action: &Action) {
        // Replays mutate the scene even while editing is disabled
        self.tracker.enlist(&action.target);
        self.set_target(Some(action.target.clone()));

        match (action.kind, action.offset.as_scalar(), action.offset.as_pair()) {
            (ActionKind::Remove, Some(offset), _) => self.remove_target(offset),
            // Creation is removal in reverse
            (ActionKind::Create, Some(offset), _) => self.remove_target(-offset),
            (ActionKind::Position, _, Some((dlng, dlat))) => self.translate_target(dlng, dlat),
            (ActionKind::Rotation, Some(degrees), _) => self.rotate_target(degrees),
            (ActionKind::Scale, Some(delta), _) => self.scale_target(delta),
            _ => log::warn!("ignoring malformed {} action on {}", action.kind, action.target),
        }
    }
}

/// Interactive placement editor for one scene.
pub struct Editor {
    history: ActionStack,
    state: EditorState,
    clock: Arc<dyn Clock>,
    enabled_on_start: bool,
}

impl Editor {
    pub fn new(scene: SceneStore, config: &EditorConfig) -> Self {
        Self {
            history: ActionStack::with_threshold(config.coalesce_threshold_ms),
            state: EditorState {
                enabled: false,
                target: None,
                mode: TransformMode::default(),
                steps: Steps {
                    position: config.position_step,
                    rotation: config.rotation_step,
                    scale: config.scale_step,
                },
                multiplier: 1,
                scene,
                tracker: DifferenceTracker::new(),
                focus: InputFocus::new(Box::new(NullBinding)),
                notifier: log_notifier(),
            },
            clock: Arc::new(SystemClock),
            enabled_on_start: config.enabled_on_start,
        }
    }

    /// Use another timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Route focus changes to `binding`.
    pub fn with_binding(mut self, binding: Box<dyn InputBinding>) -> Self {
        let mut focus = InputFocus::new(binding);
        focus.set_enabled(self.state.enabled);
        self.state.focus = focus;
        self
    }

    pub fn set_store(&mut self, store: Arc<dyn RecordStore>) {
        self.state.tracker.set_store(store);
    }

    pub fn set_save_load_fn<D, DF, U, UF>(&mut self, download: D, upload: U)
    where
        D: Fn() -> DF + Send + Sync + 'static,
        DF: Future<Output = Result<Vec<ObjectRecord>>> + Send + 'static,
        U: Fn(Vec<ObjectRecord>) -> UF + Send + Sync + 'static,
        UF: Future<Output = Result<()>> + Send + 'static,
    {
        self.state.tracker.set_save_load_fn(download, upload);
    }

    /// Replace the notifier of the editor and its tracker.
    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.state.tracker.set_notifier(notifier.clone());
        self.state.notifier = notifier;
    }

    pub fn scene(&self) -> &SceneStore {
        self.state.scene()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &ActionStack {
        &self.history
    }

    pub fn tracker(&self) -> &DifferenceTracker {
        self.state.tracker()
    }

    pub fn focus(&self) -> &InputFocus {
        &self.state.focus
    }

    pub fn target(&self) -> Option<&ObjectId> {
        self.state.target()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn mode(&self) -> TransformMode {
        self.state.mode
    }

    pub fn multiplier(&self) -> u8 {
        self.state.multiplier
    }

    // --- Session ---

    /// Start a fresh session: empty history and tracker.
    pub fn begin_session(&mut self) {
        self.history.clear();
        self.state.tracker.clear();
        self.set_enabled(self.enabled_on_start);
        log::info!("editing session started ({} objects)", self.state.scene.len());
    }

    /// Drop everything the session tracked and release input.
    pub fn end_session(&mut self) {
        self.set_enabled(false);
        self.deselect();
        self.history.clear();
        self.state.tracker.clear();
        self.state.focus.reset();
        log::info!("editing session ended");
    }

    // --- Selection and modes ---

    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
        self.state.focus.set_enabled(enabled);
        let target = self.state.target.clone();
        self.state.set_target(target);
    }

    /// Target an object. False when it is not in the scene.
    pub fn select(&mut self, id: &ObjectId) -> bool {
        if !self.state.scene.contains(id) {
            return false;
        }
        self.state.set_target(Some(id.clone()));
        true
    }

    pub fn deselect(&mut self) {
        self.state.set_target(None);
    }

    /// Switch the property the arrows change. Resets the multiplier.
    pub fn set_mode(&mut self, mode: TransformMode) {
        self.state.mode = mode;
        self.state.multiplier = 1;
    }

    /// Accepts 1 through 9.
    pub fn set_multiplier(&mut self, multiplier: u8) -> bool {
        if !(1..=9).contains(&multiplier) {
            return false;
        }
        self.state.multiplier = multiplier;
        true
    }

    /// Step of the current mode.
    pub fn step(&self) -> f64 {
        self.state.steps.get(self.state.mode)
    }

    pub fn set_step(&mut self, step: f64) {
        self.state.steps.set(self.state.mode, step);
    }

    /// Step times multiplier.
    pub fn effective_step(&self) -> f64 {
        self.step() * f64::from(self.state.multiplier)
    }

    // --- Recorded edits ---

    /// The target edits apply to. None while editing is disabled.
    fn edit_target(&self) -> Option<ObjectId> {
        if !self.state.enabled {
            return None;
        }
        self.state.target.clone()
    }

    /// One arrow press in the current mode.
    ///
    /// Vertical arrows move latitude or scale, horizontal ones longitude or
    /// heading. Returns false when the mode ignores the direction, nothing is
    /// targeted or editing is disabled.
    pub fn nudge(&mut self, direction: Direction) -> bool {
        let offset = direction.sign() * self.effective_step();
        match (self.state.mode, direction.is_vertical()) {
            (TransformMode::Position, true) => self.translate(0.0, offset),
            (TransformMode::Position, false) => self.translate(offset, 0.0),
            (TransformMode::Scale, true) => self.scale(offset),
            (TransformMode::Rotation, false) => self.rotate(offset),
            _ => false,
        }
    }

    pub fn translate(&mut self, dlng: f64, dlat: f64) -> bool {
        let Some(target) = self.edit_target() else {
            return false;
        };
        self.history.push(Action::position(target, dlng, dlat, self.clock.now_ms()));
        self.state.translate_target(dlng, dlat);
        true
    }

    pub fn rotate(&mut self, degrees: f64) -> bool {
        let Some(target) = self.edit_target() else {
            return false;
        };
        self.history.push(Action::rotation(target, degrees, self.clock.now_ms()));
        self.state.rotate_target(degrees);
        true
    }

    pub fn scale(&mut self, delta: f64) -> bool {
        let Some(target) = self.edit_target() else {
            return false;
        };
        self.history.push(Action::scale(target, delta, self.clock.now_ms()));
        self.state.scale_target(delta);
        true
    }

    /// Hide the target and flag it deleted. Warns when nothing is targeted.
    pub fn remove(&mut self) -> bool {
        if !self.state.enabled {
            return false;
        }
        let Some(target) = self.state.target.clone() else {
            (self.state.notifier)("no target to remove", Severity::Warning);
            return false;
        };
        self.history.push(Action::remove(target, self.clock.now_ms()));
        self.state.remove_target(1.0);
        true
    }

    /// Place a new object and target it.
    ///
    /// The id must not be in the scene yet. A rejected create leaves scene
    /// and history untouched.
    pub fn create(&mut self, record: ObjectRecord) -> Result<ObjectId> {
        let id = record.id.clone();
        if self.state.scene.contains(&id) {
            (self.state.notifier)(&format!("object {} already exists", id), Severity::Danger);
            return Err(Error::DuplicateId(id));
        }
        self.state.scene.insert(PlacedObject::from_record(record));
        self.state.tracker.enlist(&id);
        self.state.set_target(Some(id.clone()));
        self.history.push(Action::create(id.clone(), self.clock.now_ms()));
        Ok(id)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        self.log_history();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        self.log_history();
        redone
    }

    /// Reconcile the session with the store and upload.
    pub async fn save(&mut self) -> SaveOutcome {
        self.state.tracker.save(&self.state.scene).await
    }

    // --- Dispatch ---

    /// Run the command bound to `chord`, if any layer resolves it.
    pub async fn handle_key(&mut self, chord: KeyChord) -> Option<EditorCommand> {
        let cmd = keymap::resolve(chord, self.state.focus.is_enabled(), self.state.focus.is_editing())?;
        self.handle_command(cmd).await;
        Some(cmd)
    }

    pub async fn handle_command(&mut self, cmd: EditorCommand) {
        log::debug!("command: {:?}", cmd);
        match cmd {
            EditorCommand::Save => {
                self.save().await;
            }
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::SetMode(mode) => self.set_mode(mode),
            EditorCommand::Nudge(direction) => {
                self.nudge(direction);
            }
            EditorCommand::SetMultiplier(n) => {
                self.set_multiplier(n);
            }
            EditorCommand::Remove => {
                self.remove();
            }
            EditorCommand::Deselect => self.deselect(),
        }
        self.log_history();
    }

    /// Dashboard snapshot.
    pub fn status(&self) -> EditorStatus {
        let target = self
            .state
            .target
            .as_ref()
            .and_then(|id| self.state.scene.get(id))
            .map(TargetStatus::from_object);

        EditorStatus {
            enabled: self.state.enabled,
            mode: self.state.mode,
            multiplier: self.state.multiplier,
            step: self.effective_step(),
            target,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            history: self.history.describe(),
        }
    }

    fn log_history(&self) {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("\n{}", self.history.describe());
        }
    }
}

impl ApplyAction for Editor {
    fn apply_action(&mut self, action: &Action) {
        self.state.apply_action(action);
    }
}
