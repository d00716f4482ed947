//! Optional CPU profiling via Tracy.
//!
//! Enabled with the `profiling` Cargo feature. Without it every macro here
//! expands to nothing.
//!
//! ```ignore
//! use lumen_core::{profile_function, profile_scope};
//!
//! fn load_everything() {
//!     profile_function!();
//!     {
//!         profile_scope!("dedup");
//!         // ...
//!     }
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, frame_mark as tracy_frame_mark, span};

/// Open a named span that closes at the end of the enclosing scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Open a named span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Open a span named after the current function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Open a function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Mark the end of a rendered frame.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! frame_mark {
    () => {
        $crate::profiling::tracy_frame_mark()
    };
}

/// Mark the end of a frame (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! frame_mark {
    () => {};
}

/// Start the Tracy client. Call once near the top of `main`.
#[cfg(feature = "profiling")]
pub fn init_profiling() {
    tracy_client::Client::start();
    log::info!("Tracy profiling enabled");
}

/// Start the Tracy client (no-op when profiling disabled).
#[cfg(not(feature = "profiling"))]
pub fn init_profiling() {}
