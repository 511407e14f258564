//! Eco stories: static page data plus the page-by-page player.
//!
//! A page carries at most one interaction. Pages without one can be turned
//! straight away; pages with one unlock "next" once it is finished. A page may
//! also end with a reflection choice whose answer is shown as feedback.

pub mod library;
pub mod player;

use crate::geometry::{Point, Rect};

pub use library::STORIES;
pub use player::StoryPlayer;

#[derive(Debug)]
pub struct Story {
    pub title: &'static str,
    pub character: &'static str,
    pub pages: &'static [Page],
}

#[derive(Debug)]
pub struct Page {
    pub image: &'static str,
    pub text: &'static str,
    pub interaction: Option<Interaction>,
    pub choice: Option<Choice>,
}

impl Page {
    pub const fn plain(image: &'static str, text: &'static str) -> Self {
        Self { image, text, interaction: None, choice: None }
    }
}

#[derive(Debug)]
pub struct Interaction {
    pub prompt: &'static str,
    pub kind: InteractionKind,
}

#[derive(Debug)]
pub enum InteractionKind {
    /// Tap targets. If any target is marked correct the page is a "find the
    /// one" search, otherwise every target must be collected.
    TapCollect { targets: &'static [TapTarget] },
    /// One item dragged into one zone.
    DragDrop { emoji: &'static str, start: Point, zone: DropZone },
    /// Fixed items, each dragged to its own zone.
    Sort { items: &'static [SortItem], zones: &'static [DropZone] },
    /// Items fall from the top and are dragged into zones until `total` have
    /// been caught.
    CatchAndSort { spawns: &'static [CatchItem], zones: &'static [DropZone], total: u32 },
}

#[derive(Debug)]
pub struct TapTarget {
    pub id: u32,
    pub emoji: &'static str,
    pub pos: Point,
    pub correct: bool,
}

#[derive(Debug)]
pub struct DropZone {
    pub id: u32,
    pub name: &'static str,
    pub emoji: &'static str,
    pub rect: Rect,
}

#[derive(Debug)]
pub struct SortItem {
    pub id: u32,
    pub emoji: &'static str,
    pub zone: u32,
    pub start: Point,
}

#[derive(Debug)]
pub struct CatchItem {
    pub emoji: &'static str,
    pub zone: u32,
}

#[derive(Debug)]
pub struct Choice {
    pub prompt: &'static str,
    pub options: &'static [ChoiceOption],
}

#[derive(Debug)]
pub struct ChoiceOption {
    pub text: &'static str,
    pub response: &'static str,
}

/// Story shown for a persisted index; out of range wraps.
pub fn story_at(index: usize) -> &'static Story {
    &STORIES[index % STORIES.len()]
}
