//! Error types.
//!
//! [`EarthError`] covers infrastructure failures (storage, config, DOM).
//! [`Rejection`] is the user-facing refusal of an action; it never leaves
//! partially applied state behind and is shown to the kid as a notice.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum EarthError {
    #[error("browser storage is unavailable")]
    StorageUnavailable,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<EarthError> for JsValue {
    fn from(err: EarthError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Please wait {} before trying again.", wait_label(.remaining_ms))]
    CooldownActive { remaining_ms: u64 },

    #[error("You have no shields left!")]
    NoShields,

    #[error("Stories unlock after a day you kept your eco habit.")]
    StoryLocked,

    #[error("Invalid passcode")]
    InvalidPasscode,
}

fn wait_label(remaining_ms: &u64) -> String {
    crate::timers::format_countdown(*remaining_ms)
}
