//! Visitor preferences
//!
//! Persisted in LocalStorage, separate from any page state.

use serde::{Deserialize, Serialize};

use crate::consts::REDUCED_MOTION_SPEED;
use crate::field::Capacity;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Preset chosen by the host page through a `quality=<preset>` query parameter
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "quality")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// Particle count bounds for this preset
    pub fn particle_capacity(&self) -> Capacity {
        match self {
            QualityPreset::Low => Capacity::new(30, 80),
            QualityPreset::Medium => Capacity::new(50, 150),
            QualityPreset::High => Capacity::new(80, 250),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Field ===
    /// Pressed pointer pushes particles away
    pub pointer_interaction: bool,
    /// Constellation overlays on top of the field
    pub constellations: bool,

    // === Page chrome ===
    pub cursor_trail: bool,
    pub scroll_indicator: bool,

    // === Accessibility ===
    /// Slower particles, no cursor trail. The intro still plays.
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            pointer_interaction: true,
            constellations: true,
            cursor_trail: true,
            scroll_indicator: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Switch to `preset` if it differs from the current one. A new preset
    /// starts from its defaults. Returns whether anything changed.
    pub fn apply_preset(&mut self, preset: QualityPreset) -> bool {
        if preset == self.quality {
            return false;
        }
        *self = Self::from_preset(preset);
        true
    }

    /// Effective cursor trail (respects reduced_motion)
    pub fn effective_cursor_trail(&self) -> bool {
        self.cursor_trail && !self.reduced_motion
    }

    /// Particle speed multiplier
    pub fn motion_scale(&self) -> f32 {
        if self.reduced_motion {
            REDUCED_MOTION_SPEED
        } else {
            1.0
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "portfolio_fx_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
