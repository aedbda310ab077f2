//! # eventsub-settings
//!
//! Layered settings for the eventsub client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ClientSettings::default()`]
//! 2. **User file**: `~/.eventsub/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `EVENTSUB_*` overrides (highest priority)
//!
//! There is no global instance. Load once and hand the value to the client.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{
    ClientSettings, ConnectionSettings, DEFAULT_ADDRESS, DispatchMode, DispatchSettings,
    ErrorSettings, LoggingSettings,
};
