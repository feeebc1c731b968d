//! composerlib: staff layout and playback scheduling core for the Sheet
//! Music Composer.
//!
//! The UI hands the core plain data (new events, deletions, tempo, transport
//! commands, width measurements, frame timestamps) and gets back row/glyph
//! geometry, the playback cursor and user-facing error messages.
//!
//! # Example
//! ```
//! use composerlib::{Composer, ComposerConfig, Duration, ManualFrameClock, MemoryStorage, NewEvent, NoteName};
//!
//! let mut composer = Composer::new(ComposerConfig::default(), MemoryStorage::new(), ManualFrameClock::new());
//! composer.add_event(NewEvent::note(NoteName::C, Duration::Quarter));
//! composer.add_event(NewEvent::note(NoteName::E, Duration::Quarter));
//! composer.observe_width(1024.0);
//!
//! composer.play(0.0).unwrap();
//! composer.clock_mut().fire();
//! composer.tick(500.0);
//! let view = composer.view();
//! assert_eq!(view.rows.len(), 1);
//! assert!(view.playing);
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod layout;
pub mod library;
pub mod model;
pub mod playback;
pub mod renderer;
pub mod storage;
pub mod store;

pub use composer::{Composer, ComposerView, SongSummary};
pub use config::{ComposerConfig, StaffMetrics, DRAFT_KEY, SONGS_KEY};
pub use error::ComposerError;
pub use layout::{
    flatten_rows, ledger_lines, pack_rows, pitch_offset, row_views, staff_y, EventGlyph, LayoutRow, RowView,
};
pub use library::SongLibrary;
pub use model::*;
pub use playback::{FrameClock, FrameHandle, ManualFrameClock, PlaybackScheduler, PlaybackState, TickOutcome, TransportState};
pub use renderer::render_rows_to_svg;
pub use storage::{DirectoryStorage, KeyValueStore, MemoryStorage};
pub use store::CompositionStore;

/// Parse an event sequence from the JSON the client stores.
/// Positions are re-derived from array order.
pub fn events_from_json(json: &str) -> Result<Vec<MusicalEvent>, ComposerError> {
    let mut events: Vec<MusicalEvent> = serde_json::from_str(json)?;
    reindex(&mut events);
    Ok(events)
}

/// Lay out an event sequence at `available_width` and return the row views
/// as JSON. Stateless; nothing is highlighted.
pub fn layout_json(events_json: &str, available_width: f64, metrics: &StaffMetrics) -> Result<String, ComposerError> {
    let events = events_from_json(events_json)?;
    let rows = layout::layout_events(&events, available_width, None, metrics);
    Ok(serde_json::to_string(&rows)?)
}

/// Lay out an event sequence and render it straight to SVG.
pub fn render_events_to_svg(events_json: &str, available_width: f64, metrics: &StaffMetrics) -> Result<String, ComposerError> {
    let events = events_from_json(events_json)?;
    let rows = layout::layout_events(&events, available_width, None, metrics);
    Ok(render_rows_to_svg(&rows, metrics))
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI: for hosts that embed the core as a native library
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Read a C string argument and the optional width; `None` on bad input.
unsafe fn ffi_args(events_json: *const c_char, available_width: f64) -> Option<(String, f64, StaffMetrics)> {
    if events_json.is_null() {
        return None;
    }
    let c_str = unsafe { CStr::from_ptr(events_json) };
    let json = c_str.to_str().ok()?.to_string();
    let metrics = StaffMetrics::default();
    let width = if available_width > 0.0 { available_width } else { metrics.default_width };
    Some((json, width, metrics))
}

fn into_c_string(result: Result<String, ComposerError>) -> *mut c_char {
    match result {
        Ok(s) => CString::new(s).map(CString::into_raw).unwrap_or(std::ptr::null_mut()),
        Err(e) => {
            log::warn!("FFI call failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Lay out a JSON event array and return the row views as a JSON C string.
/// The caller must free the returned string with `composerlib_free_string`.
///
/// `available_width` of 0.0 uses the default width. Returns null on
/// malformed input.
///
/// # Safety
/// `events_json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn composerlib_layout_json(events_json: *const c_char, available_width: f64) -> *mut c_char {
    match unsafe { ffi_args(events_json, available_width) } {
        Some((json, width, metrics)) => into_c_string(layout_json(&json, width, &metrics)),
        None => std::ptr::null_mut(),
    }
}

/// Lay out a JSON event array and return SVG as a C string.
/// The caller must free the returned string with `composerlib_free_string`.
///
/// # Safety
/// `events_json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn composerlib_render_svg(events_json: *const c_char, available_width: f64) -> *mut c_char {
    match unsafe { ffi_args(events_json, available_width) } {
        Some((json, width, metrics)) => into_c_string(render_events_to_svg(&json, width, &metrics)),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by composerlib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a composerlib function, or null.
#[no_mangle]
pub unsafe extern "C" fn composerlib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
