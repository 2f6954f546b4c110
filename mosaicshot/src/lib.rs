//! Engine core of the mosaic image redaction tool.
//!
//! The UI layer (windowing, drag and drop, menus, dialogs) is an external
//! collaborator: it hands image files and pointer selections to
//! [`editor::Editor`] and renders the buffers and status payloads this
//! crate returns. Everything irreversible — pixelating a region, writing
//! the result next to the original — happens here.

pub mod config;
pub mod document;
pub mod editor;
pub mod file_info;

pub use config::Config;
pub use document::{DataState, Document};
pub use editor::{CycleDirection, EditSession, Editor, SaveTask};
pub use file_info::FileInfo;
