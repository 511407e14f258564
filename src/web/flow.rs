//! Screen steps that touch both a game model and the store. Kept apart from
//! `app` so they run under `cargo test`.

use crate::config::GameConfig;
use crate::error::Rejection;
use crate::persist::{KeyValueStore, Store};
use crate::reducer::{Action, Transition};
use crate::story::player::PageStep;
use crate::story::{STORIES, StoryPlayer};

#[derive(Debug)]
pub enum StoryTurn {
    Blocked,
    Turned,
    /// The last page closed. Completion is already recorded in the store;
    /// only the navigation in the transition is left to the caller.
    Finished(Result<Transition, Rejection>),
}

/// Press "next" on the story. Finishing records the completion at once so
/// leaving the screen early cannot lose it.
pub fn turn_story_page<S: KeyValueStore>(
    player: &mut StoryPlayer,
    store: &mut Store<S>,
    now_ms: u64,
    cfg: &GameConfig,
) -> StoryTurn {
    match player.next() {
        PageStep::Blocked => StoryTurn::Blocked,
        PageStep::Turned => StoryTurn::Turned,
        PageStep::Finished => {
            StoryTurn::Finished(store.dispatch(Action::StoryCompleted { story_count: STORIES.len() }, now_ms, cfg))
        }
    }
}
