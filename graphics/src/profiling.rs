//! Profiling support via Tracy.
//!
//! Re-exports the CPU profiling macros of [`lumen_core::profiling`] so
//! graphics code and applications can use one path. Everything expands to
//! nothing unless the `profiling` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! lumen-graphics = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! ```ignore
//! use lumen_graphics::profiling::{frame_mark, profile_scope};
//!
//! loop {
//!     {
//!         profile_scope!("draw_meshes");
//!         // ...
//!     }
//!     frame_mark!();
//! }
//! ```

pub use lumen_core::profiling::init_profiling;
pub use lumen_core::{frame_mark, profile_function, profile_scope};
