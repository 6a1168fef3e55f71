//! FFI bindings for storefront chrome
//!
//! This module lets a native or webview host drive the controllers through C.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `chrome_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::ChromeConfig;
use crate::session::{replay_trace, ChromeSession, ReplayEvent};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Replay a JSON trace and return the report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `chrome_free_string`.
/// - Returns NULL on error; call `chrome_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn chrome_replay_trace(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match replay_trace(&json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Session API
// ============================================================================

/// Opaque handle to a mounted ChromeSession
pub struct ChromeSessionHandle {
    session: ChromeSession,
}

/// Mount a new session.
///
/// # Safety
/// - `config_json` may be NULL (defaults) or a valid null-terminated C string.
/// - Returns a pointer that must be freed with `chrome_session_free`.
/// - Returns NULL on error; call `chrome_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn chrome_session_new(config_json: *const c_char) -> *mut ChromeSessionHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        ChromeConfig::default()
    } else {
        let json_str = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match ChromeConfig::from_json(&json_str) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    let handle = Box::new(ChromeSessionHandle {
        session: ChromeSession::new(config),
    });
    Box::into_raw(handle)
}

/// Unmount and free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `chrome_session_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn chrome_session_free(session: *mut ChromeSessionHandle) {
    if !session.is_null() {
        let mut handle = Box::from_raw(session);
        handle.session.unmount();
    }
}

/// Deliver one event (JSON) to a session and return the resulting frame JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `chrome_session_new`.
/// - `event_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `chrome_free_string`.
/// - Returns NULL on error; call `chrome_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn chrome_session_push_event(
    session: *mut ChromeSessionHandle,
    event_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }
    let handle = &mut *session;

    let json_str = match cstr_to_string(event_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid event string pointer");
            return ptr::null_mut();
        }
    };

    let event: ReplayEvent = match serde_json::from_str(&json_str) {
        Ok(event) => event,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match handle
        .session
        .process(&event)
        .and_then(|frame| Ok(serde_json::to_string(&frame)?))
    {
        Ok(frame_json) => string_to_cstr(&frame_json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Free a string returned by chrome functions.
///
/// # Safety
/// - `s` must be a pointer returned by a chrome function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn chrome_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local string; do not free it.
/// - The pointer is valid until the next chrome call on this thread.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn chrome_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the crate version.
///
/// # Safety
/// - Returns a static string; do not free it.
#[no_mangle]
pub unsafe extern "C" fn chrome_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
