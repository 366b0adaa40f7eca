pub mod config;
pub mod console;
pub mod editor;
pub mod engine;
pub mod mentions;
pub mod offset_key;
pub mod registry;

pub use config::{ConfigError, EngineConfig};
pub use console::{Console, VerbosityLevel, console, init_console};
pub use editor::{ActiveToken, EditorHost, EditorSnapshot, LeafSpan, Selection};
pub use engine::{DropdownState, SuggestionEngine};
pub use mentions::{MAX_SUGGESTIONS, Mention, filter_mentions};
pub use offset_key::{OffsetKey, OffsetKeyError};
pub use registry::{AriaRegistry, CallbackRegistry, CallbackSlot, NavAction, SuggestionRegistry};
