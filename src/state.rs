//! The single persisted record and its small value types.
//!
//! Stored as camelCase JSON. Every field has a default and the container is
//! `#[serde(default)]`, so blobs written by older builds (no `streak`, no
//! `storyIndex`, date-string check-ins) load with the missing fields filled in
//! and unknown fields ignored.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_KID_NAME, MAX_SHIELDS, PHOTOS_PER_BADGE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Kid,
    Dev,
}

/// Planet health ladder, ordered from best to worst.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EarthState {
    #[default]
    Healthy,
    Damaged,
    Critical,
}

impl EarthState {
    pub const ALL: [EarthState; 3] = [EarthState::Healthy, EarthState::Damaged, EarthState::Critical];

    /// One step toward Healthy. Healthy stays Healthy.
    pub fn repaired(self) -> Self {
        match self {
            EarthState::Critical => EarthState::Damaged,
            EarthState::Damaged | EarthState::Healthy => EarthState::Healthy,
        }
    }

    /// Severity for a run of `misses` consecutive skipped days.
    /// Zero misses leaves the current state alone.
    pub fn for_misses(self, misses: u32) -> Self {
        match misses {
            0 => self,
            1 => EarthState::Damaged,
            _ => EarthState::Critical,
        }
    }

    pub fn needs_repair(self) -> bool {
        self != EarthState::Healthy
    }

    pub fn label(self) -> &'static str {
        match self {
            EarthState::Healthy => "Healthy",
            EarthState::Damaged => "Damaged",
            EarthState::Critical => "Critical",
        }
    }

    pub fn mood(self) -> &'static str {
        match self {
            EarthState::Healthy => "Earth is happy and shining!",
            EarthState::Damaged => "Earth is feeling a bit sick...",
            EarthState::Critical => "Earth needs your help right now!",
        }
    }
}

pub const BADGE_TITLES: [&str; 6] = [
    "Eco Beginner",
    "Eco Helper",
    "Eco Hero",
    "Planet Protector",
    "Earth Guardian",
    "Eco Legend",
];

/// Title for a badge count; counts past the end of the ladder keep the top title.
pub fn badge_title(badge_count: u32) -> &'static str {
    let idx = (badge_count as usize).min(BADGE_TITLES.len() - 1);
    BADGE_TITLES[idx]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub mode: Mode,
    pub kid_name: String,
    pub earth_state: EarthState,
    pub shields_remaining: u32,
    pub consecutive_misses: u32,
    pub streak: u32,
    pub approved_photos: u32,
    pub badge_count: u32,
    pub last_check_in_timestamp: Option<u64>,
    pub last_upload_timestamp: Option<u64>,
    pub last_story_completion_timestamp: Option<u64>,
    pub last_check_in_was_skip: bool,
    pub story_index: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Kid,
            kid_name: DEFAULT_KID_NAME.to_string(),
            earth_state: EarthState::Healthy,
            shields_remaining: MAX_SHIELDS,
            consecutive_misses: 0,
            streak: 0,
            approved_photos: 0,
            badge_count: 0,
            last_check_in_timestamp: None,
            last_upload_timestamp: None,
            last_story_completion_timestamp: None,
            last_check_in_was_skip: false,
            story_index: 0,
        }
    }
}

impl AppState {
    /// Restore invariants on a record read from storage (hand-edited or
    /// written by an older build).
    pub fn sanitized(mut self, story_count: usize) -> Self {
        self.shields_remaining = self.shields_remaining.min(MAX_SHIELDS);
        if self.approved_photos >= PHOTOS_PER_BADGE {
            self.badge_count = self
                .badge_count
                .saturating_add(self.approved_photos / PHOTOS_PER_BADGE);
            self.approved_photos %= PHOTOS_PER_BADGE;
        }
        self.story_index = if story_count == 0 { 0 } else { self.story_index % story_count };
        self
    }

    pub fn badge_title(&self) -> &'static str {
        badge_title(self.badge_count)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_walks_one_step() {
        assert_eq!(EarthState::Critical.repaired(), EarthState::Damaged);
        assert_eq!(EarthState::Damaged.repaired(), EarthState::Healthy);
        assert_eq!(EarthState::Healthy.repaired(), EarthState::Healthy);
    }

    #[test]
    fn misses_escalate() {
        assert_eq!(EarthState::Healthy.for_misses(1), EarthState::Damaged);
        assert_eq!(EarthState::Healthy.for_misses(2), EarthState::Critical);
        assert_eq!(EarthState::Damaged.for_misses(7), EarthState::Critical);
        assert_eq!(EarthState::Critical.for_misses(0), EarthState::Critical);
    }

    #[test]
    fn badge_titles_saturate() {
        assert_eq!(badge_title(0), "Eco Beginner");
        assert_eq!(badge_title(2), "Eco Hero");
        assert_eq!(badge_title(99), "Eco Legend");
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = AppState::default().to_json().unwrap();
        assert!(json.contains("\"earthState\":\"Healthy\""));
        assert!(json.contains("\"mode\":\"kid\""));
        assert!(json.contains("\"lastCheckInWasSkip\":false"));
    }

    #[test]
    fn sanitize_restores_invariants() {
        let st = AppState {
            shields_remaining: 9,
            approved_photos: 11,
            badge_count: 1,
            story_index: 13,
            ..AppState::default()
        }
        .sanitized(10);
        assert_eq!(st.shields_remaining, 2);
        assert_eq!(st.approved_photos, 1);
        assert_eq!(st.badge_count, 3);
        assert_eq!(st.story_index, 3);
    }
}
