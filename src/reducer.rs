//! Every persisted mutation goes through [`reduce`].
//!
//! `reduce` takes a snapshot, an action and the current time and either
//! returns the next snapshot (plus where to navigate and what to tell the
//! kid) or a [`Rejection`]. It never touches storage or the DOM; the store
//! saves the new snapshot and the browser shell carries out the effects.

use crate::admin;
use crate::audio::Sound;
use crate::config::{GameConfig, MAX_SHIELDS, PHOTOS_PER_BADGE, STREAK_BONUS_EVERY};
use crate::error::Rejection;
use crate::router::View;
use crate::state::{AppState, EarthState, Mode};
use crate::timers::cooldown_remaining;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckInChoice {
    /// Kept the habit today; finished by playing the sapling game.
    Yes,
    /// Spend a shield instead of the habit.
    Shield,
    /// Missed the habit.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    CheckIn(CheckInChoice),
    HabitGameCompleted,
    RepairCompleted,
    StartStory,
    StoryCompleted { story_count: usize },
    StartUpload,
    UnlockDev { passcode: String },
    ApprovePhoto,
    SetEarthState(EarthState),
    ResetShields,
    ResetPhotos,
    AwardBadge,
    ClearData,
    ExitDevMode,
}

/// Side effects for the browser shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    OpenUrl(String),
    ClearStorage,
    Play(Sound),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: AppState,
    pub view: Option<View>,
    pub notice: Option<String>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: AppState, view: View) -> Self {
        Self { state, view: Some(view), notice: None, effects: Vec::new() }
    }

    fn stay(state: AppState) -> Self {
        Self { state, view: None, notice: None, effects: Vec::new() }
    }

    fn notice(mut self, text: impl Into<String>) -> Self {
        self.notice = Some(text.into());
        self
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

fn ensure_elapsed(last: Option<u64>, now_ms: u64, window_ms: u64) -> Result<(), Rejection> {
    match cooldown_remaining(last, now_ms, window_ms) {
        Some(remaining_ms) => Err(Rejection::CooldownActive { remaining_ms }),
        None => Ok(()),
    }
}

/// Streak grows by one; every third day earns a shield back if there is room.
fn record_success(st: &mut AppState) -> bool {
    st.streak = st.streak.saturating_add(1);
    st.consecutive_misses = 0;
    st.last_check_in_was_skip = false;
    let bonus = st.streak % STREAK_BONUS_EVERY == 0 && st.shields_remaining < MAX_SHIELDS;
    if bonus {
        st.shields_remaining += 1;
    }
    bonus
}

/// Returns true when this approval completed a badge.
fn add_photo(st: &mut AppState) -> bool {
    st.approved_photos += 1;
    if st.approved_photos >= PHOTOS_PER_BADGE {
        st.approved_photos = 0;
        st.badge_count = st.badge_count.saturating_add(1);
        true
    } else {
        false
    }
}

pub fn reduce(current: &AppState, action: Action, now_ms: u64, cfg: &GameConfig) -> Result<Transition, Rejection> {
    let mut st = current.clone();
    let out = match action {
        Action::CheckIn(choice) => {
            ensure_elapsed(st.last_check_in_timestamp, now_ms, cfg.check_in_cooldown_ms)?;
            match choice {
                CheckInChoice::Yes => {
                    st.last_check_in_timestamp = Some(now_ms);
                    Transition::to(st, View::Saplings)
                }
                CheckInChoice::Shield => {
                    if st.shields_remaining == 0 {
                        return Err(Rejection::NoShields);
                    }
                    st.shields_remaining -= 1;
                    st.last_check_in_timestamp = Some(now_ms);
                    let bonus = record_success(&mut st);
                    let t = Transition::to(st, View::KidHome)
                        .notice("Shield used! Earth is protected from harm.")
                        .effect(Effect::Play(Sound::Success));
                    if bonus { t.notice("Shield used! Your streak earned a shield back.") } else { t }
                }
                CheckInChoice::Skip => {
                    st.consecutive_misses = st.consecutive_misses.saturating_add(1);
                    st.streak = 0;
                    st.last_check_in_was_skip = true;
                    st.last_check_in_timestamp = Some(now_ms);
                    st.earth_state = st.earth_state.for_misses(st.consecutive_misses);
                    Transition::to(st, View::KidHome).effect(Effect::Play(Sound::Error))
                }
            }
        }
        Action::HabitGameCompleted => {
            let bonus = record_success(&mut st);
            let msg = if bonus {
                "Great job! Earth is happy! You earned a bonus shield!"
            } else {
                "Great job! Earth is happy!"
            };
            Transition::to(st, View::KidHome).notice(msg).effect(Effect::Play(Sound::Win))
        }
        Action::RepairCompleted => {
            st.earth_state = st.earth_state.repaired();
            st.consecutive_misses = 0;
            Transition::to(st, View::KidHome).effect(Effect::Play(Sound::Win))
        }
        Action::StartStory => {
            if st.last_check_in_was_skip {
                return Err(Rejection::StoryLocked);
            }
            ensure_elapsed(st.last_story_completion_timestamp, now_ms, cfg.story_cooldown_ms)?;
            Transition::to(st, View::Story).effect(Effect::Play(Sound::PageTurn))
        }
        Action::StoryCompleted { story_count } => {
            st.story_index = if story_count == 0 { 0 } else { (st.story_index + 1) % story_count };
            st.last_story_completion_timestamp = Some(now_ms);
            Transition::to(st, View::KidHome)
        }
        Action::StartUpload => {
            ensure_elapsed(st.last_upload_timestamp, now_ms, cfg.upload_cooldown_ms)?;
            st.last_upload_timestamp = Some(now_ms);
            Transition::stay(st).effect(Effect::OpenUrl(cfg.photo_form_url.clone()))
        }
        Action::UnlockDev { passcode } => {
            admin::verify(&passcode, &cfg.dev_passcode)?;
            st.mode = Mode::Dev;
            Transition::to(st, View::DevDashboard).effect(Effect::Play(Sound::Success))
        }
        Action::ApprovePhoto => {
            if add_photo(&mut st) {
                Transition::to(st, View::BadgeAwarded).effect(Effect::Play(Sound::Badge))
            } else {
                Transition::stay(st)
            }
        }
        Action::SetEarthState(earth) => {
            st.earth_state = earth;
            if earth == EarthState::Healthy {
                st.consecutive_misses = 0;
            }
            Transition::stay(st)
        }
        Action::ResetShields => {
            st.shields_remaining = MAX_SHIELDS;
            Transition::stay(st)
        }
        Action::ResetPhotos => {
            st.approved_photos = 0;
            Transition::stay(st)
        }
        Action::AwardBadge => {
            st.badge_count = st.badge_count.saturating_add(1);
            Transition::stay(st)
        }
        Action::ClearData => Transition::to(AppState::default(), View::KidHome).effect(Effect::ClearStorage),
        Action::ExitDevMode => {
            st.mode = Mode::Kid;
            Transition::to(st, View::KidHome)
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 60_000;
    const LATER: u64 = 11 * MIN;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    fn apply(st: &AppState, action: Action, now: u64) -> AppState {
        reduce(st, action, now, &cfg()).unwrap().state
    }

    #[test]
    fn yes_stamps_and_opens_game() {
        let st = AppState::default();
        let t = reduce(&st, Action::CheckIn(CheckInChoice::Yes), 1_000, &cfg()).unwrap();
        assert_eq!(t.view, Some(View::Saplings));
        assert_eq!(t.state.last_check_in_timestamp, Some(1_000));
        assert_eq!(t.state.streak, 0);
    }

    #[test]
    fn habit_game_bonus_shield_every_third() {
        let st = AppState { streak: 2, shields_remaining: 1, ..AppState::default() };
        let next = apply(&st, Action::HabitGameCompleted, 0);
        assert_eq!(next.streak, 3);
        assert_eq!(next.shields_remaining, 2);

        let full = AppState { streak: 5, ..AppState::default() };
        assert_eq!(apply(&full, Action::HabitGameCompleted, 0).shields_remaining, 2);

        let off = AppState { streak: 3, shields_remaining: 0, ..AppState::default() };
        assert_eq!(apply(&off, Action::HabitGameCompleted, 0).shields_remaining, 0);
    }

    #[test]
    fn shield_bonus_counts_after_spend() {
        let st = AppState { streak: 2, shields_remaining: 2, ..AppState::default() };
        let next = apply(&st, Action::CheckIn(CheckInChoice::Shield), 0);
        assert_eq!(next.streak, 3);
        assert_eq!(next.shields_remaining, 2);
        assert_eq!(next.consecutive_misses, 0);
    }

    #[test]
    fn shield_needs_shields() {
        let st = AppState { shields_remaining: 0, ..AppState::default() };
        assert_eq!(reduce(&st, Action::CheckIn(CheckInChoice::Shield), 0, &cfg()), Err(Rejection::NoShields));
    }

    #[test]
    fn cooldown_rejects_every_choice() {
        let st = AppState { last_check_in_timestamp: Some(0), ..AppState::default() };
        for choice in [CheckInChoice::Yes, CheckInChoice::Shield, CheckInChoice::Skip] {
            let err = reduce(&st, Action::CheckIn(choice), 5 * MIN, &cfg()).unwrap_err();
            assert_eq!(err, Rejection::CooldownActive { remaining_ms: 5 * MIN });
        }
        assert!(reduce(&st, Action::CheckIn(CheckInChoice::Skip), 10 * MIN, &cfg()).is_ok());
    }

    #[test]
    fn skips_then_repairs() {
        let st = AppState::default();
        let st = apply(&st, Action::CheckIn(CheckInChoice::Skip), 0);
        assert_eq!(st.earth_state, EarthState::Damaged);
        let st = apply(&st, Action::CheckIn(CheckInChoice::Skip), LATER);
        assert_eq!((st.earth_state, st.consecutive_misses, st.streak), (EarthState::Critical, 2, 0));
        assert!(st.last_check_in_was_skip);
        let st = apply(&st, Action::RepairCompleted, LATER);
        assert_eq!((st.earth_state, st.consecutive_misses), (EarthState::Damaged, 0));
        let st = apply(&st, Action::RepairCompleted, LATER);
        assert_eq!(st.earth_state, EarthState::Healthy);
    }

    #[test]
    fn success_does_not_repair() {
        let st = AppState { earth_state: EarthState::Critical, consecutive_misses: 3, ..AppState::default() };
        let next = apply(&st, Action::HabitGameCompleted, 0);
        assert_eq!(next.earth_state, EarthState::Critical);
        assert_eq!(next.consecutive_misses, 0);
    }

    #[test]
    fn fifth_photo_awards_badge() {
        let st = AppState { approved_photos: 4, ..AppState::default() };
        let t = reduce(&st, Action::ApprovePhoto, 0, &cfg()).unwrap();
        assert_eq!((t.state.approved_photos, t.state.badge_count), (0, 1));
        assert_eq!(t.view, Some(View::BadgeAwarded));

        let t = reduce(&AppState::default(), Action::ApprovePhoto, 0, &cfg()).unwrap();
        assert_eq!(t.state.approved_photos, 1);
        assert_eq!(t.view, None);
    }

    #[test]
    fn one_badge_per_five_photos_from_any_badge_count() {
        for start in [0, 1, 4, 5, 17] {
            let mut st = AppState { badge_count: start, ..AppState::default() };
            let mut awarded = 0;
            for i in 1..=12 {
                let t = reduce(&st, Action::ApprovePhoto, 0, &cfg()).unwrap();
                if t.view == Some(View::BadgeAwarded) {
                    awarded += 1;
                }
                st = t.state;
                assert_eq!(st.approved_photos, i % 5);
                assert_eq!(st.badge_count, start + i / 5);
            }
            assert_eq!(awarded, 2);
        }
    }

    #[test]
    fn story_gates() {
        let skipped = AppState { last_check_in_was_skip: true, ..AppState::default() };
        assert_eq!(reduce(&skipped, Action::StartStory, 0, &cfg()), Err(Rejection::StoryLocked));

        let recent = AppState { last_story_completion_timestamp: Some(0), ..AppState::default() };
        assert!(matches!(reduce(&recent, Action::StartStory, MIN, &cfg()), Err(Rejection::CooldownActive { .. })));
        assert_eq!(reduce(&recent, Action::StartStory, LATER, &cfg()).unwrap().view, Some(View::Story));
    }

    #[test]
    fn story_completion_wraps_index() {
        let st = AppState { story_index: 9, ..AppState::default() };
        let next = apply(&st, Action::StoryCompleted { story_count: 10 }, 77);
        assert_eq!(next.story_index, 0);
        assert_eq!(next.last_story_completion_timestamp, Some(77));
    }

    #[test]
    fn upload_opens_form_once_per_window() {
        let t = reduce(&AppState::default(), Action::StartUpload, 5, &cfg()).unwrap();
        assert_eq!(t.effects, vec![Effect::OpenUrl(cfg().photo_form_url)]);
        assert!(reduce(&t.state, Action::StartUpload, 6, &cfg()).is_err());
    }

    #[test]
    fn passcode_unlocks_dev_mode() {
        let bad = reduce(&AppState::default(), Action::UnlockDev { passcode: "nope".into() }, 0, &cfg());
        assert_eq!(bad, Err(Rejection::InvalidPasscode));
        let t = reduce(&AppState::default(), Action::UnlockDev { passcode: "EARTHADMIN2025".into() }, 0, &cfg()).unwrap();
        assert_eq!(t.state.mode, Mode::Dev);
        assert_eq!(t.view, Some(View::DevDashboard));
        let back = apply(&t.state, Action::ExitDevMode, 0);
        assert_eq!(back.mode, Mode::Kid);
    }

    #[test]
    fn admin_edits() {
        let st = AppState {
            earth_state: EarthState::Critical,
            consecutive_misses: 4,
            shields_remaining: 0,
            approved_photos: 3,
            ..AppState::default()
        };
        let damaged = apply(&st, Action::SetEarthState(EarthState::Damaged), 0);
        assert_eq!(damaged.consecutive_misses, 4);
        let healthy = apply(&st, Action::SetEarthState(EarthState::Healthy), 0);
        assert_eq!(healthy.consecutive_misses, 0);
        assert_eq!(apply(&st, Action::ResetShields, 0).shields_remaining, 2);
        assert_eq!(apply(&st, Action::ResetPhotos, 0).approved_photos, 0);
        assert_eq!(apply(&st, Action::AwardBadge, 0).badge_count, 1);
    }

    #[test]
    fn clear_data_resets_everything() {
        let st = AppState { mode: Mode::Dev, badge_count: 4, streak: 9, ..AppState::default() };
        let t = reduce(&st, Action::ClearData, 0, &cfg()).unwrap();
        assert_eq!(t.state, AppState::default());
        assert_eq!(t.view, Some(View::KidHome));
        assert!(t.effects.contains(&Effect::ClearStorage));
    }

    #[test]
    fn shields_stay_in_range() {
        let mut st = AppState::default();
        let mut now = 0;
        for i in 0..30 {
            let choice = if i % 4 == 0 { CheckInChoice::Shield } else { CheckInChoice::Skip };
            if let Ok(t) = reduce(&st, Action::CheckIn(choice), now, &cfg()) {
                st = t.state;
            }
            st = apply(&st, Action::HabitGameCompleted, now);
            assert!(st.shields_remaining <= MAX_SHIELDS);
            now += LATER;
        }
    }
}
