//! Tuning and layout settings
//!
//! Persisted as JSON: LocalStorage on the web, an optional file on native.

use serde::{Deserialize, Serialize};

use crate::consts::START_ANGLE_DEGREES;
use crate::error::{Error, Result};
use crate::sim::{MarchSettings, Motion, ObstacleField, ScatterParams, Viewport};

/// Which obstacle field to build at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Six fixed circles
    #[default]
    Classic,
    /// Seeded random circles filling the viewport
    Scattered(ScatterParams),
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Classic => "Classic",
            Layout::Scattered(_) => "Scattered",
        }
    }

    /// Build the obstacle field for `viewport`
    pub fn build(&self, viewport: &Viewport) -> Result<ObstacleField> {
        match self {
            Layout::Classic => Ok(ObstacleField::classic()),
            Layout::Scattered(params) => {
                ObstacleField::scattered(params, viewport.width, viewport.height, viewport.center())
            }
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hero facing angle at spawn (degrees)
    pub start_angle_degrees: f64,
    /// Movement and turning
    pub motion: Motion,
    /// Marcher thresholds
    pub march: MarchSettings,
    /// Obstacle layout
    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_angle_degrees: START_ANGLE_DEGREES,
            motion: Motion::default(),
            march: MarchSettings::default(),
            layout: Layout::default(),
        }
    }
}

impl Settings {
    /// Env var naming a JSON settings file (native only)
    pub const PATH_ENV: &'static str = "CIRCLE_MARCH_SETTINGS";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "circle_march_settings";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| Error::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let m = &self.motion;
        if !(m.move_step.is_finite() && m.move_step >= 0.0) {
            return Err(Error::Settings(format!("move_step {} must be >= 0", m.move_step)));
        }
        if !(m.turn_step_degrees.is_finite() && m.turn_step_degrees >= 0.0) {
            return Err(Error::Settings(format!(
                "turn_step_degrees {} must be >= 0",
                m.turn_step_degrees
            )));
        }
        if !self.start_angle_degrees.is_finite() {
            return Err(Error::Settings("start_angle_degrees must be finite".into()));
        }
        let march = &self.march;
        if !(march.epsilon.is_finite() && march.epsilon >= 0.0) {
            return Err(Error::Settings(format!("epsilon {} must be >= 0", march.epsilon)));
        }
        if !(march.hit_threshold.is_finite() && march.hit_threshold >= march.epsilon) {
            return Err(Error::Settings(format!(
                "hit_threshold {} must be >= epsilon {}",
                march.hit_threshold, march.epsilon
            )));
        }
        if march.max_steps == 0 {
            return Err(Error::Settings("max_steps must be at least 1".into()));
        }
        if let Layout::Scattered(params) = &self.layout {
            params.validate()?;
        }
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match storage.get_item(Self::STORAGE_KEY) {
                Ok(Some(json)) => match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                },
                // First run: store the defaults so there is a document to edit
                Ok(None) => {
                    let settings = Self::default();
                    settings.save();
                    return settings;
                }
                Err(_) => {}
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `CIRCLE_MARCH_SETTINGS`, if set.
    ///
    /// A missing file is created with the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Falling back to default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Read `path`, writing the defaults there first if it does not exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
