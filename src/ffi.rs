//! C Foreign Function Interface (FFI) for the typewriter console.
//!
//! Hosts that cannot link Rust directly drive a console through an opaque
//! handle. The handle owns a [`GlyphGrid`] sink and a [`FrameTicker`]; the
//! host pumps frames with `typewriter_console_tick` and reads cells back.
//!
//! # Safety
//!
//! Handle pointers must come from `typewriter_console_new` and must not be
//! used after `typewriter_console_destroy`. A null handle is reported as
//! `NotInitialized` rather than dereferenced.
//!
//! # Example (C)
//!
//! ```c
//! #include "typewriter.h"
//!
//! int main() {
//!     TypewriterHandle* console = typewriter_console_new(8, 40, 2000.0, 10);
//!     if (!console) return 1;
//!
//!     typewriter_console_append(console, "hello\nworld");
//!     while (typewriter_console_is_running(console)) {
//!         typewriter_console_tick(console, 16.0);
//!     }
//!
//!     typewriter_console_destroy(console);
//!     return 0;
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::config::ConsoleConfig;
use crate::console::TypewriterConsole;
use crate::error::ConsoleError;
use crate::sink::GlyphGrid;
use crate::ticker::FrameTicker;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr;
use std::rc::Rc;
use tracing::error;

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a console with its own grid and frame clock.
pub struct TypewriterHandle(TypewriterConsole<GlyphGrid, FrameTicker>);

// =============================================================================
// Result and Error Codes
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null handle, or the console was released.
    NotInitialized = 1,
    /// Invalid UTF-8 string (or a null string pointer).
    InvalidUtf8 = 2,
    /// Grid or timing parameters rejected.
    InvalidConfig = 3,
    /// Called from inside a frame callback.
    Reentrant = 4,
}

impl From<ConsoleError> for TypewriterResult {
    fn from(err: ConsoleError) -> Self {
        match err {
            ConsoleError::NotInitialized => Self::NotInitialized,
            ConsoleError::InvalidGrid { .. } | ConsoleError::InvalidTiming { .. } => {
                Self::InvalidConfig
            }
            ConsoleError::Reentrant => Self::Reentrant,
        }
    }
}

impl<T> From<Result<T, ConsoleError>> for TypewriterResult {
    fn from(result: Result<T, ConsoleError>) -> Self {
        result.map_or_else(Self::from, |_| Self::Ok)
    }
}

// =============================================================================
// Console Functions
// =============================================================================

/// Create a console with a `rows × cols` grid.
///
/// Returns NULL if the grid is empty or the window is negative or not finite.
#[unsafe(no_mangle)]
pub extern "C" fn typewriter_console_new(
    rows: u16,
    cols: u16,
    window_ms: f64,
    break_equivalent_chars: c_uint,
) -> *mut TypewriterHandle {
    let config = ConsoleConfig::new(rows, cols, window_ms, break_equivalent_chars as usize);
    if let Err(err) = config.validate() {
        error!(%err, "rejecting console configuration");
        return ptr::null_mut();
    }

    let grid = GlyphGrid::new(rows, cols);
    match TypewriterConsole::initialize(config, grid, Rc::new(FrameTicker::new())) {
        Ok(console) => Box::into_raw(Box::new(TypewriterHandle(console))),
        Err(_) => ptr::null_mut(),
    }
}

/// Destroy a console handle. Releases the console first if needed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_destroy(handle: *mut TypewriterHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Queue UTF-8 text for reveal.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_append(
    handle: *mut TypewriterHandle,
    text: *const c_char,
) -> TypewriterResult {
    if handle.is_null() {
        return TypewriterResult::NotInitialized;
    }
    if text.is_null() {
        return TypewriterResult::InvalidUtf8;
    }

    let Ok(text_str) = CStr::from_ptr(text).to_str() else {
        return TypewriterResult::InvalidUtf8;
    };

    (*handle).0.append(text_str).into()
}

/// Advance the console's frame clock by `delta_ms` and run one frame.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_tick(
    handle: *mut TypewriterHandle,
    delta_ms: f64,
) -> TypewriterResult {
    if handle.is_null() {
        return TypewriterResult::NotInitialized;
    }
    let console = &(*handle).0;
    if console.is_released() {
        return TypewriterResult::NotInitialized;
    }
    console.ticker().advance(delta_ms);
    TypewriterResult::Ok
}

/// Check if the console still has text to reveal.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_is_running(handle: *const TypewriterHandle) -> bool {
    if handle.is_null() {
        return false;
    }
    (*handle).0.is_running()
}

/// Copy the glyph at `(row, col)` into `buf` as a NUL-terminated string.
///
/// Returns the glyph length in bytes (0 for a hidden cell), or -1 if the
/// handle is null or released, the cell is out of range, or `buf` is too small.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_cell(
    handle: *const TypewriterHandle,
    row: u16,
    col: u16,
    buf: *mut c_char,
    buf_len: usize,
) -> c_int {
    if handle.is_null() || buf.is_null() {
        return -1;
    }

    let lookup = (*handle).0.with_sink(|grid| {
        grid.get(row, col)
            .map(|_| grid.glyph(row, col).map(str::to_owned).unwrap_or_default())
    });
    let Ok(Some(glyph)) = lookup else {
        return -1;
    };

    let bytes = glyph.as_bytes();
    if bytes.len() >= buf_len {
        return -1;
    }
    ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
    *buf.add(bytes.len()) = 0;
    c_int::try_from(bytes.len()).unwrap_or(-1)
}

/// Release the console: stop revealing and drop the backlog. Idempotent.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typewriter_console_release(handle: *mut TypewriterHandle) -> TypewriterResult {
    if handle.is_null() {
        return TypewriterResult::NotInitialized;
    }
    (*handle).0.release();
    TypewriterResult::Ok
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the library version string.
#[unsafe(no_mangle)]
pub extern "C" fn typewriter_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast::<c_char>()
}
