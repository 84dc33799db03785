//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background loop volume
    pub music_volume: f32,
    pub kick_volume: f32,
    pub collision_volume: f32,
    pub score_volume: f32,
    pub siren_volume: f32,
    /// Mute toggle (the speaker button)
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.3,
            kick_volume: 0.6,
            collision_volume: 0.6,
            score_volume: 0.5,
            siren_volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective volume for a sound effect (0 when muted)
    pub fn effect_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = match effect {
            SoundEffect::Kick => self.kick_volume,
            SoundEffect::Collision | SoundEffect::PoliceCollision => self.collision_volume,
            SoundEffect::Score => self.score_volume,
            SoundEffect::PoliceAppear => self.siren_volume,
        };
        (self.master_volume * channel).clamp(0.0, 1.0)
    }

    /// Effective background loop volume (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "moto_chase_settings";

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channel_volumes() {
        let settings = Settings::default();
        assert_eq!(settings.effect_volume(SoundEffect::Kick), 0.6);
        assert_eq!(settings.effect_volume(SoundEffect::Score), 0.5);
        assert_eq!(settings.effective_music_volume(), 0.3);
    }

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effect_volume(SoundEffect::Collision), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_old_settings_json_fills_new_fields() {
        let settings: Settings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.kick_volume, 0.6);
    }
}
