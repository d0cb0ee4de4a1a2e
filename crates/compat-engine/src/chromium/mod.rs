//! Headless Chrome engine built on chromiumoxide.
//!
//! One browser process serves a whole run; every session is a separate tab
//! with its own document, global scope and console listener. Environment
//! variants are emulated with a user-agent override on each tab.

mod browser;
mod emulation;
mod session;

pub use browser::{ChromiumConfig, ChromiumEngine};
pub use emulation::user_agent;
pub use session::ChromiumSession;
