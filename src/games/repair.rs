//! "Repair Earth" cleanup games.
//!
//! Two variants share one contract: they report [`CleanupEvent::Completed`]
//! exactly once, when the target count is reached. There is no failure state;
//! a badly sorted item simply goes back into play.

use crate::games::rng::Rng;
use crate::games::{FALL_DT_CAP_MS, Held};
use crate::geometry::{Point, Rect, item_center};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanupEvent {
    Ignored,
    Progress { cleaned: u32, target: u32 },
    /// Returned a single time per game.
    Completed,
}

// --- Tap variant -----------------------------------------------------------

pub const TAP_TRASH: [&str; 5] = ["🍾", "🥫", "📰", "🥤", "🍎"];

/// Five fixed pieces of litter; tapping one removes it.
#[derive(Clone, Debug, Default)]
pub struct TapCleanup {
    cleaned: [bool; TAP_TRASH.len()],
    completed: bool,
}

impl TapCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> u32 {
        TAP_TRASH.len() as u32
    }

    pub fn cleaned_count(&self) -> u32 {
        self.cleaned.iter().filter(|c| **c).count() as u32
    }

    pub fn is_cleaned(&self, idx: usize) -> bool {
        self.cleaned.get(idx).copied().unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Scattered layout, top-left anchored, in percent of the play area.
    pub fn position(idx: usize) -> Point {
        Point::new(
            15.0 + (idx % 4) as f64 * 20.0 + (idx % 2) as f64 * 5.0,
            10.0 + (idx % 3) as f64 * 25.0,
        )
    }

    pub fn clean(&mut self, idx: usize) -> CleanupEvent {
        if self.completed || idx >= self.cleaned.len() || self.cleaned[idx] {
            return CleanupEvent::Ignored;
        }
        self.cleaned[idx] = true;
        let cleaned = self.cleaned_count();
        if cleaned == self.target() {
            self.completed = true;
            CleanupEvent::Completed
        } else {
            CleanupEvent::Progress { cleaned, target: self.target() }
        }
    }
}

// --- Sorting variant -------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bin {
    Recycle,
    Compost,
}

impl Bin {
    pub const ALL: [Bin; 2] = [Bin::Recycle, Bin::Compost];

    pub fn rect(self) -> Rect {
        match self {
            Bin::Recycle => Rect::new(5.0, 78.0, 40.0, 22.0),
            Bin::Compost => Rect::new(55.0, 78.0, 40.0, 22.0),
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Bin::Recycle => "♻️",
            Bin::Compost => "🌱",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bin::Recycle => "Recycling",
            Bin::Compost => "Compost",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrashKind {
    pub emoji: &'static str,
    pub bin: Bin,
}

pub const TRASH_KINDS: [TrashKind; 7] = [
    TrashKind { emoji: "🍾", bin: Bin::Recycle },
    TrashKind { emoji: "🥫", bin: Bin::Recycle },
    TrashKind { emoji: "📰", bin: Bin::Recycle },
    TrashKind { emoji: "🥤", bin: Bin::Recycle },
    TrashKind { emoji: "🍎", bin: Bin::Compost },
    TrashKind { emoji: "🍌", bin: Bin::Compost },
    TrashKind { emoji: "🥕", bin: Bin::Compost },
];

pub const SORT_TARGET: u32 = 10;
pub const SORT_MAX_ONSCREEN: usize = 5;
pub const SORT_SPAWN_INTERVAL_MS: i32 = 1_500;
/// Percent of the play area per second.
pub const SORT_FALL_SPEED: f64 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallingTrash {
    pub id: u32,
    pub kind: TrashKind,
    pub pos: Point,
    /// Set for a short while after a wrong drop so the item can shake.
    pub returned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDrop {
    Sorted(CleanupEvent),
    WrongBin(Bin),
    Missed,
    NothingHeld,
}

/// Trash falls from the top; drag each piece into its bin.
#[derive(Clone, Debug, Default)]
pub struct SortingCleanup {
    items: Vec<FallingTrash>,
    held: Option<Held<FallingTrash>>,
    sorted: u32,
    next_id: u32,
    completed: bool,
}

impl SortingCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FallingTrash] {
        &self.items
    }

    pub fn held(&self) -> Option<&Held<FallingTrash>> {
        self.held.as_ref()
    }

    pub fn sorted(&self) -> u32 {
        self.sorted
    }

    pub fn target(&self) -> u32 {
        SORT_TARGET
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    fn on_screen(&self) -> usize {
        self.items.len() + usize::from(self.held.is_some())
    }

    /// Called from the spawn timer. Respects the on-screen cap and stops once
    /// the game is complete. Returns true when an item was added.
    pub fn spawn(&mut self, rng: &mut Rng) -> bool {
        if self.completed || self.on_screen() >= SORT_MAX_ONSCREEN {
            return false;
        }
        let kind = TRASH_KINDS[rng.index(TRASH_KINDS.len())];
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(FallingTrash {
            id,
            kind,
            pos: Point::new(rng.range(5.0, 85.0), -10.0),
            returned: false,
        });
        true
    }

    /// Advance falling items by `dt_ms`. Items that fall out of the bottom are
    /// dropped quietly and the spawner replaces them.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.completed {
            return;
        }
        let dy = SORT_FALL_SPEED * dt_ms.clamp(0.0, FALL_DT_CAP_MS) / 1000.0;
        for it in &mut self.items {
            it.pos.y += dy;
        }
        self.items.retain(|it| it.pos.y < 100.0);
    }

    pub fn settle(&mut self, id: u32) {
        if let Some(it) = self.items.iter_mut().find(|it| it.id == id) {
            it.returned = false;
        }
    }

    /// Pick up item `id`; `pointer` is where the pointer went down.
    pub fn grab(&mut self, id: u32, pointer: Point) -> bool {
        if self.completed || self.held.is_some() {
            return false;
        }
        let Some(idx) = self.items.iter().position(|it| it.id == id) else {
            return false;
        };
        let item = self.items.remove(idx);
        self.held = Some(Held::new(item, item.pos, pointer));
        true
    }

    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(h) = self.held.as_mut() {
            h.follow(pointer);
            h.item.pos = h.pos;
        }
    }

    pub fn release(&mut self) -> SortDrop {
        let Some(held) = self.held.take() else {
            return SortDrop::NothingHeld;
        };
        let center = item_center(held.pos);
        let hit = Bin::ALL.into_iter().find(|b| b.rect().contains(center));
        match hit {
            Some(bin) if bin == held.item.kind.bin => {
                self.sorted = (self.sorted + 1).min(SORT_TARGET);
                if self.sorted >= SORT_TARGET && !self.completed {
                    self.completed = true;
                    self.items.clear();
                    SortDrop::Sorted(CleanupEvent::Completed)
                } else {
                    SortDrop::Sorted(CleanupEvent::Progress { cleaned: self.sorted, target: SORT_TARGET })
                }
            }
            other => {
                let mut item = held.item;
                item.pos = Point::new(held.pos.x.clamp(0.0, 90.0), 10.0);
                item.returned = true;
                self.items.push(item);
                match other {
                    Some(bin) => SortDrop::WrongBin(bin),
                    None => SortDrop::Missed,
                }
            }
        }
    }
}

/// The repair screen runs one of the two variants.
#[derive(Clone, Debug)]
pub enum RepairGame {
    Tap(TapCleanup),
    Sorting(SortingCleanup),
}

impl RepairGame {
    pub fn new(simple: bool) -> Self {
        if simple { RepairGame::Tap(TapCleanup::new()) } else { RepairGame::Sorting(SortingCleanup::new()) }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            RepairGame::Tap(g) => g.is_complete(),
            RepairGame::Sorting(g) => g.is_complete(),
        }
    }

    pub fn progress(&self) -> (u32, u32) {
        match self {
            RepairGame::Tap(g) => (g.cleaned_count(), g.target()),
            RepairGame::Sorting(g) => (g.sorted(), g.target()),
        }
    }

    pub fn needs_frames(&self) -> bool {
        matches!(self, RepairGame::Sorting(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_cleanup_completes_once() {
        let mut g = TapCleanup::new();
        for i in 0..4 {
            assert!(matches!(g.clean(i), CleanupEvent::Progress { .. }));
        }
        assert_eq!(g.clean(0), CleanupEvent::Ignored);
        assert_eq!(g.clean(4), CleanupEvent::Completed);
        assert_eq!(g.clean(4), CleanupEvent::Ignored);
        assert_eq!(g.clean(99), CleanupEvent::Ignored);
        assert!(g.is_complete());
    }

    fn drop_into(g: &mut SortingCleanup, bin: Bin) -> SortDrop {
        let id = g.items()[0].id;
        let start = g.items()[0].pos;
        assert!(g.grab(id, start));
        let c = bin.rect().center();
        g.drag_to(Point::new(c.x - 5.0, c.y - 5.0));
        g.release()
    }

    #[test]
    fn spawn_respects_cap() {
        let mut rng = Rng::seeded(7);
        let mut g = SortingCleanup::new();
        for _ in 0..20 {
            g.spawn(&mut rng);
        }
        assert_eq!(g.items().len(), SORT_MAX_ONSCREEN);
    }

    #[test]
    fn sorting_reaches_target() {
        let mut rng = Rng::seeded(3);
        let mut g = SortingCleanup::new();
        let mut completions = 0;
        for _ in 0..SORT_TARGET {
            g.spawn(&mut rng);
            let bin = g.items()[0].kind.bin;
            if let SortDrop::Sorted(CleanupEvent::Completed) = drop_into(&mut g, bin) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(g.is_complete());
        assert!(!g.spawn(&mut rng));
    }

    #[test]
    fn wrong_bin_returns_item() {
        let mut rng = Rng::seeded(11);
        let mut g = SortingCleanup::new();
        g.spawn(&mut rng);
        let wrong = match g.items()[0].kind.bin {
            Bin::Recycle => Bin::Compost,
            Bin::Compost => Bin::Recycle,
        };
        assert_eq!(drop_into(&mut g, wrong), SortDrop::WrongBin(wrong));
        assert_eq!(g.items().len(), 1);
        assert!(g.items()[0].returned);
        assert_eq!(g.sorted(), 0);
    }

    #[test]
    fn fallen_items_are_removed() {
        let mut rng = Rng::seeded(5);
        let mut g = SortingCleanup::new();
        g.spawn(&mut rng);
        for _ in 0..200 {
            g.tick(100.0);
        }
        assert!(g.items().is_empty());
    }
}
