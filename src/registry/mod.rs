use indexmap::IndexMap;

/// Named keyboard/change slots the host dispatches through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackSlot {
    DownArrow,
    UpArrow,
    Escape,
    HandleReturn,
    Change,
}

impl CallbackSlot {
    pub const ALL: [CallbackSlot; 5] = [
        CallbackSlot::DownArrow,
        CallbackSlot::UpArrow,
        CallbackSlot::Escape,
        CallbackSlot::HandleReturn,
        CallbackSlot::Change,
    ];
}

/// What a registered instance wants done when its slot fires. The host reads
/// the action from the registry and routes it back into the owning engine
/// via [`SuggestionEngine::handle_nav`].
///
/// [`SuggestionEngine::handle_nav`]: crate::engine::SuggestionEngine::handle_nav
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    FocusPrev,
    FocusNext,
    Close,
    CommitFocused,
    Reevaluate,
}

/// Slot → instance-key → action table. Register and unregister are
/// idempotent set/delete operations; removing an absent entry is a no-op.
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    slots: IndexMap<CallbackSlot, IndexMap<String, NavAction>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slot: CallbackSlot, instance_key: &str, action: NavAction) {
        self.slots
            .entry(slot)
            .or_default()
            .insert(instance_key.to_string(), action);
    }

    pub fn unregister(&mut self, slot: CallbackSlot, instance_key: &str) {
        if let Some(entries) = self.slots.get_mut(&slot) {
            entries.shift_remove(instance_key);
        }
    }

    /// Removes every slot entry belonging to `instance_key`.
    pub fn unregister_instance(&mut self, instance_key: &str) {
        for slot in CallbackSlot::ALL {
            self.unregister(slot, instance_key);
        }
    }

    pub fn is_registered(&self, slot: CallbackSlot, instance_key: &str) -> bool {
        self.slots
            .get(&slot)
            .is_some_and(|entries| entries.contains_key(instance_key))
    }

    pub fn action_for(&self, slot: CallbackSlot, instance_key: &str) -> Option<NavAction> {
        self.slots.get(&slot)?.get(instance_key).copied()
    }

    /// Registered instances for a slot, in registration order.
    pub fn instances(&self, slot: CallbackSlot) -> Vec<(&str, NavAction)> {
        self.slots
            .get(&slot)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, action)| (key.as_str(), *action))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn instance_entry_count(&self, instance_key: &str) -> usize {
        CallbackSlot::ALL
            .iter()
            .filter(|slot| self.is_registered(**slot, instance_key))
            .count()
    }
}

/// The four accessibility attribute maps, each keyed by instance-key.
///
/// Only `has_popup` (on open) and `active_descendant` (on option focus) are
/// ever written; `expanded` and `owner` exist and are cleared on close but
/// no code path populates them yet.
#[derive(Debug, Default)]
pub struct AriaRegistry {
    has_popup: IndexMap<String, bool>,
    expanded: IndexMap<String, bool>,
    active_descendant: IndexMap<String, String>,
    owner: IndexMap<String, String>,
}

impl AriaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_has_popup(&mut self, instance_key: &str) {
        self.has_popup.insert(instance_key.to_string(), true);
    }

    pub fn set_active_descendant(&mut self, instance_key: &str, descendant_id: String) {
        self.active_descendant
            .insert(instance_key.to_string(), descendant_id);
    }

    pub fn has_popup(&self, instance_key: &str) -> bool {
        self.has_popup.get(instance_key).copied().unwrap_or(false)
    }

    pub fn expanded(&self, instance_key: &str) -> Option<bool> {
        self.expanded.get(instance_key).copied()
    }

    pub fn active_descendant(&self, instance_key: &str) -> Option<&str> {
        self.active_descendant
            .get(instance_key)
            .map(String::as_str)
    }

    pub fn owner(&self, instance_key: &str) -> Option<&str> {
        self.owner.get(instance_key).map(String::as_str)
    }

    /// Drops the instance from all four maps. No-op for keys that were never
    /// written.
    pub fn clear_instance(&mut self, instance_key: &str) {
        self.has_popup.shift_remove(instance_key);
        self.expanded.shift_remove(instance_key);
        self.active_descendant.shift_remove(instance_key);
        self.owner.shift_remove(instance_key);
    }

    /// True when no map holds an entry for the instance.
    pub fn is_clear(&self, instance_key: &str) -> bool {
        !self.has_popup.contains_key(instance_key)
            && !self.expanded.contains_key(instance_key)
            && !self.active_descendant.contains_key(instance_key)
            && !self.owner.contains_key(instance_key)
    }
}

/// Shared side-effect registries, created once by the host and injected into
/// every engine instance. Each instance writes only entries keyed by its own
/// instance-key.
#[derive(Debug, Default)]
pub struct SuggestionRegistry {
    pub callbacks: CallbackRegistry,
    pub aria: AriaRegistry,
}

impl SuggestionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_instance(&mut self, instance_key: &str) {
        self.callbacks.unregister_instance(instance_key);
        self.aria.clear_instance(instance_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister_round_trip() {
        let mut registry = CallbackRegistry::new();
        registry.register(CallbackSlot::DownArrow, "k1", NavAction::FocusNext);

        assert!(registry.is_registered(CallbackSlot::DownArrow, "k1"));
        assert_eq!(
            registry.action_for(CallbackSlot::DownArrow, "k1"),
            Some(NavAction::FocusNext)
        );

        registry.unregister(CallbackSlot::DownArrow, "k1");
        assert!(!registry.is_registered(CallbackSlot::DownArrow, "k1"));
    }

    #[test]
    fn unregister_absent_key_is_noop() {
        let mut registry = CallbackRegistry::new();
        registry.unregister(CallbackSlot::Escape, "ghost");
        registry.unregister_instance("ghost");
        assert_eq!(registry.instance_entry_count("ghost"), 0);
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = CallbackRegistry::new();
        registry.register(CallbackSlot::Escape, "k1", NavAction::Close);
        registry.register(CallbackSlot::Escape, "k1", NavAction::Close);
        assert_eq!(registry.instances(CallbackSlot::Escape).len(), 1);
    }

    #[test]
    fn instances_keep_registration_order() {
        let mut registry = CallbackRegistry::new();
        registry.register(CallbackSlot::Change, "first", NavAction::Reevaluate);
        registry.register(CallbackSlot::Change, "second", NavAction::Reevaluate);

        let keys: Vec<&str> = registry
            .instances(CallbackSlot::Change)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn instance_keys_do_not_collide() {
        let mut registry = SuggestionRegistry::new();
        registry
            .callbacks
            .register(CallbackSlot::UpArrow, "a", NavAction::FocusPrev);
        registry
            .callbacks
            .register(CallbackSlot::UpArrow, "b", NavAction::FocusPrev);
        registry.aria.set_has_popup("a");
        registry.aria.set_has_popup("b");

        registry.clear_instance("a");

        assert!(!registry.callbacks.is_registered(CallbackSlot::UpArrow, "a"));
        assert!(registry.callbacks.is_registered(CallbackSlot::UpArrow, "b"));
        assert!(registry.aria.is_clear("a"));
        assert!(registry.aria.has_popup("b"));
    }

    #[test]
    fn aria_clear_is_idempotent() {
        let mut aria = AriaRegistry::new();
        aria.set_has_popup("k1");
        aria.set_active_descendant("k1", "mention-option-k1-0".to_string());

        aria.clear_instance("k1");
        aria.clear_instance("k1");
        assert!(aria.is_clear("k1"));
    }
}
