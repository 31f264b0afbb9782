//! Keyboard adapter for the playback kill-switch.
//!
//! Listens for global key events and raises the shared [`CancelToken`] while
//! Space and T are held together. The playback controller only sees the
//! token; it never knows a keyboard exists.

use cheervox_core::CancelToken;
use rdev::{listen, Event, EventType, Key};
use std::collections::HashSet;
use tracing::{error, info};

/// Spawn the listener thread. `rdev::listen` blocks its thread for the life
/// of the process.
pub fn spawn(cancel: CancelToken) {
    std::thread::spawn(move || {
        info!("hotkey listener started (space+t cancels playback)");
        let mut held: HashSet<Key> = HashSet::new();
        let callback = move |event: Event| {
            match event.event_type {
                EventType::KeyPress(key) => {
                    held.insert(key);
                    if held.contains(&Key::Space) && held.contains(&Key::KeyT) {
                        cancel.cancel();
                    }
                }
                EventType::KeyRelease(key) => {
                    held.remove(&key);
                }
                _ => {}
            }
        };
        if let Err(e) = listen(callback) {
            error!("hotkey listener failed: {:?}", e);
        }
    });
}
