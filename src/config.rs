//! Gameplay constants and the runtime-tunable [`GameConfig`].
//!
//! The constants below are the authoritative defaults. `GameConfig::default()`
//! mirrors them, and [`GameConfig::from_json`] lets the host page override any
//! subset of fields; keys that are absent keep their compile-time value.

use serde::Deserialize;

use crate::error::EarthError;

// ── Storage ─────────────────────────────────────────────────────────────────
pub const STORAGE_KEY: &str = "earthcareState";

// ── Check-in / shields / photos ─────────────────────────────────────────────
pub const MAX_SHIELDS: u32 = 2;
pub const STREAK_BONUS_EVERY: u32 = 3;
pub const PHOTOS_PER_BADGE: u32 = 5;

/// Every time-gated action shares the same ten minute window.
pub const COOLDOWN_MS: u64 = 10 * 60 * 1000;

// ── Admin / external ────────────────────────────────────────────────────────
pub const DEV_PASSCODE: &str = "EARTHADMIN2025";
pub const PHOTO_FORM_URL: &str = "https://forms.gle/YOUR_FORM_ID";
pub const DEFAULT_KID_NAME: &str = "TestKid";

// ── Screen timings ──────────────────────────────────────────────────────────
pub const REPAIR_RETURN_DELAY_MS: i32 = 1_000;
pub const SAPLING_CELEBRATION_MS: i32 = 3_000;
pub const STORY_FINISH_DELAY_MS: i32 = 1_500;
pub const CHOICE_FEEDBACK_MS: i32 = 2_500;
pub const COUNTDOWN_REFRESH_MS: i32 = 1_000;

/// Runtime configuration. Every field falls back to the constant of the same
/// meaning when missing from the override JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub storage_key: String,
    pub check_in_cooldown_ms: u64,
    pub upload_cooldown_ms: u64,
    pub story_cooldown_ms: u64,
    pub dev_passcode: String,
    pub photo_form_url: String,
    /// Use the five-item tap cleanup instead of the falling sorting game.
    pub simple_repair: bool,
    /// Master volume for sound effects, 0.0..=1.0.
    pub volume: f64,
    pub sound_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            check_in_cooldown_ms: COOLDOWN_MS,
            upload_cooldown_ms: COOLDOWN_MS,
            story_cooldown_ms: COOLDOWN_MS,
            dev_passcode: DEV_PASSCODE.to_string(),
            photo_form_url: PHOTO_FORM_URL.to_string(),
            simple_repair: false,
            volume: 0.5,
            sound_enabled: true,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, EarthError> {
        let mut cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| EarthError::Config(e.to_string()))?;
        cfg.volume = cfg.volume.clamp(0.0, 1.0);
        Ok(cfg)
    }

    /// Like [`GameConfig::from_json`] but never fails: a bad override is
    /// logged and the defaults are used instead.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json {
            None => Self::default(),
            Some(raw) if raw.trim().is_empty() => Self::default(),
            Some(raw) => Self::from_json(raw).unwrap_or_else(|err| {
                crate::logging::warn(&format!("ignoring config override: {err}"));
                Self::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"checkInCooldownMs": 5000, "volume": 3.0}"#).unwrap();
        assert_eq!(cfg.check_in_cooldown_ms, 5000);
        assert_eq!(cfg.upload_cooldown_ms, COOLDOWN_MS);
        assert_eq!(cfg.dev_passcode, DEV_PASSCODE);
        assert_eq!(cfg.volume, 1.0);
    }

    #[test]
    fn broken_override_falls_back() {
        let cfg = GameConfig::from_json_or_default(Some("{not json"));
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(GameConfig::from_json_or_default(Some("  ")), GameConfig::default());
    }
}
