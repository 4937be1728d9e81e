//! decolor-export: Pure output serializers (sans-IO).
//!
//! Converts edge maps into presentation formats: an inverted RGBA
//! buffer for texture upload and inverted PNG bytes for download.
//! Everything here is a pure transform -- file writing and any other
//! I/O live with the caller.

pub mod display;
pub mod png;

pub use display::{invert, to_display_rgba};
pub use png::{ExportError, download_file_name, edge_map_to_png};
