use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use synesis_core::{BoxGeometry, DEFAULT_BOX_WIDTH};
use thiserror::Error;
use tracing::{debug, info, warn};

const PREFERENCES_VERSION: u32 = 1;
const MIN_BOX_WIDTH: f64 = 40.0;
const MAX_BOX_WIDTH: f64 = 2000.0;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub canvas: CanvasPreferences,
    #[serde(default)]
    pub workspace: WorkspacePreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            canvas: CanvasPreferences::default(),
            workspace: WorkspacePreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.canvas.sanitize();
    }
}

/// Geometry of entity boxes on the project graph canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasPreferences {
    #[serde(default = "default_box_width")]
    pub box_width: f64,
}

fn default_box_width() -> f64 {
    DEFAULT_BOX_WIDTH
}

impl Default for CanvasPreferences {
    fn default() -> Self {
        Self {
            box_width: default_box_width(),
        }
    }
}

impl CanvasPreferences {
    fn sanitize(&mut self) {
        if !self.box_width.is_finite() || self.box_width <= 0.0 {
            self.box_width = default_box_width();
        }
        self.box_width = self.box_width.clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH);
    }

    pub fn box_geometry(&self) -> BoxGeometry {
        BoxGeometry {
            width: self.box_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkspacePreferences {
    /// Return focus to the project overview after a tab is closed.
    #[serde(default)]
    pub restore_project_on_close: bool,
}

/// Preferences file bound to its location on disk.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// Loads the file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            read_preferences(&path)?
        } else {
            debug!(path = %path.display(), "no preferences file, using defaults");
            let mut data = Preferences::default();
            data.sanitize();
            data
        };
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, op: F) -> Result<(), PreferencesError>
    where
        F: FnOnce(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn overwrite(&mut self, preferences: Preferences) -> Result<(), PreferencesError> {
        self.data = preferences;
        self.data.sanitize();
        self.save()
    }

    /// Writes through a temporary sibling file so readers never see a partial document.
    pub fn save(&self) -> Result<(), PreferencesError> {
        let tmp_path = self.path.with_extension("tmp");
        write_preferences(&tmp_path, &self.data)?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "saved preferences");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        write_preferences(path.as_ref(), &self.data)
    }

    /// Replaces the current preferences with `source`, keeping a `.bak` copy of the old file.
    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let data = read_preferences(source.as_ref())?;
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| PreferencesError::Write {
                path: backup,
                source,
            })?;
        }
        self.data = data;
        self.save()
    }
}

fn read_preferences(path: &Path) -> Result<Preferences, PreferencesError> {
    let contents = fs::read_to_string(path).map_err(|source| PreferencesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: Preferences =
        serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if data.version < PREFERENCES_VERSION {
        warn!(
            path = %path.display(),
            found = data.version,
            "upgrading preferences written by an older version"
        );
    }
    data.sanitize();
    Ok(data)
}

fn write_preferences(path: &Path, data: &Preferences) -> Result<(), PreferencesError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let payload =
        serde_json::to_string_pretty(data).map_err(|source| PreferencesError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_box_width_falls_back() {
        let mut prefs = Preferences::default();
        prefs.canvas.box_width = f64::NAN;
        prefs.sanitize();
        assert_eq!(prefs.canvas.box_width, DEFAULT_BOX_WIDTH);

        prefs.canvas.box_width = -3.0;
        prefs.sanitize();
        assert_eq!(prefs.canvas.box_width, DEFAULT_BOX_WIDTH);

        prefs.canvas.box_width = 5.0;
        prefs.sanitize();
        assert_eq!(prefs.canvas.box_width, MIN_BOX_WIDTH);
    }

    #[test]
    fn geometry_follows_box_width() {
        let canvas = CanvasPreferences { box_width: 220.0 };
        assert_eq!(canvas.box_geometry(), BoxGeometry { width: 220.0 });
    }
}
