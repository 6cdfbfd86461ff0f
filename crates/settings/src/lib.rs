//! Local configuration for the Synesis workspace tools.

pub mod preferences;

pub use preferences::{
    CanvasPreferences, Preferences, PreferencesError, PreferencesStore, WorkspacePreferences,
};
