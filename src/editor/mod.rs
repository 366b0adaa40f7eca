use anyhow::Result;
use std::collections::HashMap;

use crate::mentions::Mention;
use crate::offset_key::OffsetKey;

/// Caret/selection state of the editing surface at the time of one edit
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor_block_key: String,
    pub anchor_offset: usize,
    pub is_collapsed: bool,
    pub has_focus: bool,
}

impl Selection {
    /// A collapsed, focused selection at `offset` inside `block_key`, the
    /// shape a caret has while the user is typing.
    pub fn caret(block_key: impl Into<String>, offset: usize) -> Self {
        Self {
            anchor_block_key: block_key.into(),
            anchor_offset: offset,
            is_collapsed: true,
            has_focus: true,
        }
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    pub fn with_collapsed(mut self, is_collapsed: bool) -> Self {
        self.is_collapsed = is_collapsed;
        self
    }
}

/// Character-offset span of one decorated leaf within its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafSpan {
    pub start: usize,
    pub end: usize,
}

impl LeafSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// The token currently being typed: its span, its raw text, and the search
/// query derived from it (raw text minus the leading trigger character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToken {
    pub span: LeafSpan,
    pub text: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct BlockView {
    text: String,
    leaves: HashMap<(String, String), LeafSpan>,
}

/// Immutable view of the document the host hands the engine on every edit
/// event: the selection plus, per block, the text and the decorator leaf
/// table. The engine never mutates a snapshot; its event handler returns the
/// snapshot it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    selection: Selection,
    blocks: HashMap<String, BlockView>,
}

impl EditorSnapshot {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            blocks: HashMap::new(),
        }
    }

    pub fn with_block_text(mut self, block_key: impl Into<String>, text: impl Into<String>) -> Self {
        self.blocks.entry(block_key.into()).or_default().text = text.into();
        self
    }

    pub fn with_leaf(
        mut self,
        block_key: impl Into<String>,
        decorator_key: impl Into<String>,
        leaf_key: impl Into<String>,
        span: LeafSpan,
    ) -> Self {
        self.blocks
            .entry(block_key.into())
            .or_default()
            .leaves
            .insert((decorator_key.into(), leaf_key.into()), span);
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Span of the decorated leaf the key addresses. `None` means the token
    /// has disappeared (e.g. deleted with backspace), which is a normal
    /// signal, not an error.
    pub fn leaf_span(&self, key: &OffsetKey) -> Option<LeafSpan> {
        self.blocks
            .get(&key.block_key)?
            .leaves
            .get(&(key.decorator_key.clone(), key.leaf_key.clone()))
            .copied()
    }

    /// Text of `span` within `block_key`, sliced by character offsets.
    pub fn text_in_span(&self, block_key: &str, span: LeafSpan) -> Option<String> {
        let block = self.blocks.get(block_key)?;
        Some(
            block
                .text
                .chars()
                .skip(span.start)
                .take(span.end.saturating_sub(span.start))
                .collect(),
        )
    }

    /// Resolves the active token for the decorated leaf the key addresses.
    /// The query strips the leading trigger character when present; a span
    /// that does not start with the trigger is used verbatim.
    pub fn token_at(&self, key: &OffsetKey, trigger: char) -> Option<ActiveToken> {
        let span = self.leaf_span(key)?;
        let text = self.text_in_span(&key.block_key, span)?;
        let mut chars = text.chars();
        let query = match chars.next() {
            Some(first) if first == trigger => chars.collect(),
            _ => text.clone(),
        };
        Some(ActiveToken { span, text, query })
    }
}

/// Store contract of the embedding editor. The engine observes snapshots
/// through [`SuggestionEngine::on_editor_change`] and reaches back through
/// this trait when committing a mention or requesting a re-render.
///
/// [`SuggestionEngine::on_editor_change`]: crate::engine::SuggestionEngine::on_editor_change
pub trait EditorHost {
    fn editor_state(&self) -> EditorSnapshot;

    /// Asks the host to adopt `state` as the current document snapshot.
    fn set_editor_state(&mut self, state: EditorSnapshot) -> Result<()>;

    /// Replaces the token at `span` with a structured entity derived from
    /// `mention`, returning the resulting snapshot. The insertion mechanics
    /// belong to the host document model.
    fn replace_with_mention(
        &self,
        state: &EditorSnapshot,
        key: &OffsetKey,
        span: LeafSpan,
        mention: &Mention,
    ) -> Result<EditorSnapshot>;
}
