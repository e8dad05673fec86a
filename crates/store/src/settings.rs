use serde::Serialize;
use serde_json::{Map, Value};
use shared::domain::SettingsSnapshot;

use crate::effects::PhoneEffect;

pub const DEFAULT_THEME: &str = "dark";
pub const AVAILABLE_THEMES: &[&str] = &["light", "dark", "oled"];
pub const DEFAULT_VOLUME: u8 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsState {
    pub theme: String,
    pub notification_enabled: bool,
    pub sound_enabled: bool,
    pub volume: u8,
    pub custom_settings: Map<String, Value>,
    pub is_loaded: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            notification_enabled: true,
            sound_enabled: true,
            volume: DEFAULT_VOLUME,
            custom_settings: Map::new(),
            is_loaded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsMutation {
    SetTheme(String),
    SetNotificationEnabled(bool),
    SetSoundEnabled(bool),
    SetVolume(f64),
    SetCustomSetting { key: String, value: Value },
    SetAllSettings(SettingsSnapshot),
    SetLoaded(bool),
    Reset,
}

/// Clamps to `0..=100`; NaN becomes 0.
pub fn clamp_volume(volume: f64) -> u8 {
    if volume.is_nan() {
        return 0;
    }
    volume.round().clamp(0.0, 100.0) as u8
}

impl SettingsState {
    pub fn apply(&mut self, mutation: SettingsMutation) -> Option<PhoneEffect> {
        match mutation {
            SettingsMutation::SetTheme(theme) => {
                self.theme = theme;
                return Some(PhoneEffect::ApplyTheme(self.theme.clone()));
            }
            SettingsMutation::SetNotificationEnabled(enabled) => {
                self.notification_enabled = enabled
            }
            SettingsMutation::SetSoundEnabled(enabled) => self.sound_enabled = enabled,
            SettingsMutation::SetVolume(volume) => self.volume = clamp_volume(volume),
            SettingsMutation::SetCustomSetting { key, value } => {
                self.custom_settings.insert(key, value);
            }
            SettingsMutation::SetAllSettings(snapshot) => {
                if let Some(theme) = snapshot.theme.filter(|t| !t.is_empty()) {
                    self.theme = theme;
                }
                if let Some(enabled) = snapshot.notification_enabled {
                    self.notification_enabled = enabled;
                }
                if let Some(enabled) = snapshot.sound_enabled {
                    self.sound_enabled = enabled;
                }
                if let Some(volume) = snapshot.volume {
                    self.volume = clamp_volume(volume);
                }
                if let Some(custom) = snapshot.custom_settings {
                    self.custom_settings = custom;
                }
                self.is_loaded = true;
                return Some(PhoneEffect::ApplyTheme(self.theme.clone()));
            }
            SettingsMutation::SetLoaded(loaded) => self.is_loaded = loaded,
            SettingsMutation::Reset => {
                *self = Self {
                    is_loaded: self.is_loaded,
                    ..Self::default()
                };
            }
        }
        None
    }

    pub fn custom_setting(&self, key: &str) -> Option<&Value> {
        self.custom_settings.get(key)
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            theme: Some(self.theme.clone()),
            notification_enabled: Some(self.notification_enabled),
            sound_enabled: Some(self.sound_enabled),
            volume: Some(f64::from(self.volume)),
            custom_settings: Some(self.custom_settings.clone()),
            locale: None,
        }
    }
}
