use crate::editor::{LeafSpan, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    Open,
    Closed,
}

/// Decides whether the popup is visible for one edit event. Evaluated in
/// strict precedence: a missing span (the token disappeared) closes first,
/// then selection shape, then block identity, then the offset window. The
/// start boundary is exclusive (a caret sitting on the trigger character
/// itself must not open the popup) while the end boundary is inclusive.
pub(crate) fn resolve_visibility(
    selection: &Selection,
    block_key: &str,
    span: Option<LeafSpan>,
) -> Visibility {
    let Some(span) = span else {
        return Visibility::Closed;
    };
    if !selection.is_collapsed || !selection.has_focus {
        return Visibility::Closed;
    }
    if selection.anchor_block_key != block_key {
        return Visibility::Closed;
    }
    if selection.anchor_offset <= span.start {
        return Visibility::Closed;
    }
    if selection.anchor_offset > span.end {
        return Visibility::Closed;
    }
    Visibility::Open
}

/// Registry writes a transition asks for. Computed from the state edge so
/// that re-entering the same state requests nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SideEffects {
    /// Register keyboard callbacks and set the has-popup attribute.
    pub open_popup: bool,
    /// Unregister callbacks, clear accessibility entries, reset focus.
    pub close_popup: bool,
}

pub(crate) fn plan_effects(was_open: bool, now: Visibility) -> SideEffects {
    match (was_open, now) {
        (false, Visibility::Open) => SideEffects {
            open_popup: true,
            close_popup: false,
        },
        (true, Visibility::Closed) => SideEffects {
            open_popup: false,
            close_popup: true,
        },
        _ => SideEffects::default(),
    }
}
