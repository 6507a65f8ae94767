//! Sketchboard Core Library
//!
//! Platform-agnostic state and logic for the Sketchboard layered drawing board.

pub mod color_history;
pub mod config;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod tools;

pub use color_history::ColorHistory;
pub use config::BoardConfig;
pub use input::{PointerInput, PointerPhase};
pub use layers::{Layer, LayerError, LayerStack};
pub use persistence::{LoadError, PendingLoad};
pub use session::{DrawingSession, Notice, SessionEvent};
pub use storage::{Gallery, GalleryError, KeyValueStore, MemoryStore, SavedDrawing, StorageError};
pub use tools::{DrawingState, ToolError, ToolKind, ToolMachine};
