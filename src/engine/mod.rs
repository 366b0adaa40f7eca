mod transition;

use anyhow::{Result, bail};
use rand::{Rng, distributions::Alphanumeric};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::EngineConfig;
use crate::console::console;
use crate::editor::{ActiveToken, EditorHost, EditorSnapshot};
use crate::mentions::{Mention, filter_mentions};
use crate::offset_key::{OffsetKey, OffsetKeyError};
use crate::registry::{CallbackSlot, NavAction, SuggestionRegistry};
use transition::{Visibility, plan_effects, resolve_visibility};

/// Popup state owned by one engine instance. Starts closed; discarded with
/// the instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropdownState {
    pub is_open: bool,
    pub focused_index: Option<usize>,
}

/// One suggestion engine instance, bound to a single decorated token span.
/// The host creates an instance when a decorator match appears and calls
/// [`SuggestionEngine::unmount`] when it disappears.
pub struct SuggestionEngine {
    instance_key: String,
    offset_key: OffsetKey,
    mentions: Vec<Mention>,
    filtered: Vec<Mention>,
    dropdown: DropdownState,
    active_token: Option<ActiveToken>,
    registry: Arc<Mutex<SuggestionRegistry>>,
    trigger: char,
}

impl SuggestionEngine {
    /// A missing candidate source behaves as an empty sequence.
    pub fn new(
        offset_key: OffsetKey,
        mentions: Option<Vec<Mention>>,
        registry: Arc<Mutex<SuggestionRegistry>>,
        config: &EngineConfig,
    ) -> Self {
        Self::with_instance_key(generate_instance_key(), offset_key, mentions, registry, config)
    }

    /// Builds an instance straight from the compound offset key the host's
    /// decorator handed out. A malformed key is fatal for the instance:
    /// there is no token boundary to resolve without one.
    pub fn from_raw_key(
        raw_offset_key: &str,
        mentions: Option<Vec<Mention>>,
        registry: Arc<Mutex<SuggestionRegistry>>,
        config: &EngineConfig,
    ) -> Result<Self, OffsetKeyError> {
        let offset_key = OffsetKey::decode(raw_offset_key)?;
        Ok(Self::new(offset_key, mentions, registry, config))
    }

    /// Like [`SuggestionEngine::new`] but with a caller-chosen instance key,
    /// for hosts that bring their own key scheme.
    pub fn with_instance_key(
        instance_key: impl Into<String>,
        offset_key: OffsetKey,
        mentions: Option<Vec<Mention>>,
        registry: Arc<Mutex<SuggestionRegistry>>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            instance_key: instance_key.into(),
            offset_key,
            mentions: mentions.unwrap_or_default(),
            filtered: Vec::new(),
            dropdown: DropdownState::default(),
            active_token: None,
            registry,
            trigger: config.trigger,
        }
    }

    pub fn instance_key(&self) -> &str {
        &self.instance_key
    }

    pub fn offset_key(&self) -> &OffsetKey {
        &self.offset_key
    }

    pub fn dropdown(&self) -> &DropdownState {
        &self.dropdown
    }

    pub fn is_open(&self) -> bool {
        self.dropdown.is_open
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.dropdown.focused_index
    }

    /// Candidates the widget should currently render, at most
    /// [`crate::mentions::MAX_SUGGESTIONS`] of them.
    pub fn filtered_mentions(&self) -> &[Mention] {
        &self.filtered
    }

    /// The token resolved by the most recent edit event, if any.
    pub fn active_token(&self) -> Option<&ActiveToken> {
        self.active_token.as_ref()
    }

    /// External anchor id of the rendered list box.
    pub fn listbox_anchor_id(&self) -> String {
        format!("mentions-list-{}", self.instance_key)
    }

    /// External anchor id of one rendered option, referenced by the
    /// active-descendant accessibility attribute.
    pub fn option_anchor_id(&self, index: usize) -> String {
        format!("mention-option-{}-{}", self.instance_key, index)
    }

    /// The per-event entry point. Decides popup visibility from the
    /// selection and the token span, applies registry side effects on state
    /// edges, recomputes the filtered list while open, and hands back the
    /// snapshot it received. The handler never changes document content.
    pub fn on_editor_change(&mut self, snapshot: EditorSnapshot) -> EditorSnapshot {
        let token = snapshot.token_at(&self.offset_key, self.trigger);
        let visibility = resolve_visibility(
            snapshot.selection(),
            &self.offset_key.block_key,
            token.as_ref().map(|t| t.span),
        );

        let effects = plan_effects(self.dropdown.is_open, visibility);
        if effects.open_popup {
            self.claim_registrations();
            console().debug(&format!("popup {} opened", self.instance_key));
        }
        if effects.close_popup {
            self.release_registrations();
            console().debug(&format!("popup {} closed", self.instance_key));
        }

        self.dropdown.is_open = matches!(visibility, Visibility::Open);
        self.active_token = token;
        if self.dropdown.is_open {
            if let Some(token) = &self.active_token {
                self.filtered = filter_mentions(&self.mentions, &token.query);
            }
        } else {
            self.filtered.clear();
        }

        snapshot
    }

    /// Closes the popup and undoes every registry entry this instance made.
    /// Safe to call repeatedly; a second call on an already-closed instance
    /// does nothing.
    pub fn close(&mut self) {
        if self.dropdown.is_open {
            console().debug(&format!("popup {} closed", self.instance_key));
        }
        self.dropdown.is_open = false;
        self.filtered.clear();
        self.release_registrations();
    }

    /// Cancellation: the decorator match disappeared and the host is
    /// discarding this instance. Synchronously undoes all side effects.
    pub fn unmount(&mut self) {
        self.close();
    }

    /// Commits `mention` into the document: closes the popup, asks the host
    /// to replace the active token span with the structured entity, then
    /// asks it to adopt the result. `mention` is expected to come from the
    /// current filtered list; that is not checked here.
    pub fn on_mention_select(&mut self, host: &mut dyn EditorHost, mention: &Mention) -> Result<()> {
        self.close();
        let Some(token) = self.active_token.clone() else {
            bail!("mention selected while no token is active");
        };
        let current = host.editor_state();
        let replaced = host.replace_with_mention(&current, &self.offset_key, token.span, mention)?;
        host.set_editor_state(replaced)?;
        Ok(())
    }

    /// Moves option focus to `index`, points the active-descendant
    /// accessibility attribute at the option's anchor, and re-adopts the
    /// current editor state so the attribute change becomes observable. No
    /// document content changes.
    pub fn on_mention_focus(&mut self, host: &mut dyn EditorHost, index: usize) -> Result<()> {
        self.dropdown.focused_index = Some(index);
        let descendant_id = self.option_anchor_id(index);
        self.shared()
            .aria
            .set_active_descendant(&self.instance_key, descendant_id);
        let state = host.editor_state();
        host.set_editor_state(state)?;
        Ok(())
    }

    /// Wrap-around focus movement over the filtered list. No-op while the
    /// popup is closed or empty; the first step from an unfocused popup
    /// lands on the first option.
    pub fn focus_next(&mut self) {
        if !self.dropdown.is_open || self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len();
        let next = match self.dropdown.focused_index {
            None => 0,
            Some(index) => (index + 1) % len,
        };
        self.dropdown.focused_index = Some(next);
    }

    /// Counterpart of [`SuggestionEngine::focus_next`]; the first step from
    /// an unfocused popup lands on the last option.
    pub fn focus_prev(&mut self) {
        if !self.dropdown.is_open || self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len();
        let prev = match self.dropdown.focused_index {
            None | Some(0) => len - 1,
            Some(index) => index - 1,
        };
        self.dropdown.focused_index = Some(prev);
    }

    /// Routes a registered callback action back into this instance. This is
    /// how host key events reach the engine: the host looks the action up in
    /// the callback registry for the slot that fired and dispatches it here.
    pub fn handle_nav(&mut self, action: NavAction, host: &mut dyn EditorHost) -> Result<()> {
        match action {
            NavAction::FocusNext => {
                self.focus_next();
                if let Some(index) = self.dropdown.focused_index {
                    self.on_mention_focus(host, index)?;
                }
                Ok(())
            }
            NavAction::FocusPrev => {
                self.focus_prev();
                if let Some(index) = self.dropdown.focused_index {
                    self.on_mention_focus(host, index)?;
                }
                Ok(())
            }
            NavAction::Close => {
                self.close();
                Ok(())
            }
            NavAction::CommitFocused => {
                let focused = self
                    .dropdown
                    .focused_index
                    .and_then(|index| self.filtered.get(index).cloned());
                match focused {
                    Some(mention) => self.on_mention_select(host, &mention),
                    None => Ok(()),
                }
            }
            NavAction::Reevaluate => {
                let state = host.editor_state();
                self.on_editor_change(state);
                Ok(())
            }
        }
    }

    fn shared(&self) -> MutexGuard<'_, SuggestionRegistry> {
        self.registry.lock().unwrap()
    }

    fn claim_registrations(&self) {
        let mut shared = self.shared();
        let key = self.instance_key.as_str();
        shared
            .callbacks
            .register(CallbackSlot::DownArrow, key, NavAction::FocusNext);
        shared
            .callbacks
            .register(CallbackSlot::UpArrow, key, NavAction::FocusPrev);
        shared
            .callbacks
            .register(CallbackSlot::Escape, key, NavAction::Close);
        shared
            .callbacks
            .register(CallbackSlot::HandleReturn, key, NavAction::CommitFocused);
        shared
            .callbacks
            .register(CallbackSlot::Change, key, NavAction::Reevaluate);
        shared.aria.set_has_popup(key);
    }

    fn release_registrations(&mut self) {
        self.shared().clear_instance(&self.instance_key);
        self.dropdown.focused_index = None;
    }
}

fn generate_instance_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}
