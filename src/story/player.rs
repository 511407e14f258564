//! Page-by-page story state machine.

use super::{CatchItem, DropZone, InteractionKind, Page, Story};
use crate::games::rng::Rng;
use crate::games::{FALL_DT_CAP_MS, Held};
use crate::geometry::{Point, Rect, first_hit, item_center};

pub const CATCH_SPAWN_INTERVAL_MS: i32 = 2_000;
/// 0.8% of the area per 60 Hz frame.
pub const CATCH_FALL_SPEED: f64 = 0.8 * 60.0;
/// Falling items leave play once they pass this height.
pub const CATCH_EXIT_Y: f64 = 110.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortPiece {
    pub id: u32,
    pub emoji: &'static str,
    pub zone: u32,
    pub start: Point,
    pub pos: Point,
    /// Bouncing back to its start after a bad drop.
    pub returning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatchPiece {
    pub id: u32,
    pub emoji: &'static str,
    pub zone: u32,
    pub pos: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Activity {
    None,
    Tap { tapped: Vec<u32>, find_one: bool, shaking: Option<u32> },
    Drag { pos: Point, held: Option<Held<()>> },
    Sort { items: Vec<SortPiece>, held: Option<Held<SortPiece>> },
    Catch { falling: Vec<CatchPiece>, held: Option<Held<CatchPiece>>, caught: u32, next_id: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Collected { done: bool },
    Found,
    Wrong,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Placed { zone: u32, done: bool },
    WrongZone { zone: u32 },
    Missed,
    NothingHeld,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageStep {
    Turned,
    Finished,
    Blocked,
}

fn zone_hit(zones: &[DropZone], pos: Point) -> Option<&DropZone> {
    let rects: Vec<Rect> = zones.iter().map(|z| z.rect).collect();
    first_hit(&rects, item_center(pos)).map(|i| &zones[i])
}

#[derive(Clone, Debug)]
pub struct StoryPlayer {
    story: &'static Story,
    page: usize,
    activity: Activity,
    interaction_done: bool,
    feedback: Option<&'static str>,
    finished: bool,
}

impl StoryPlayer {
    pub fn new(story: &'static Story) -> Self {
        let mut player = Self {
            story,
            page: 0,
            activity: Activity::None,
            interaction_done: true,
            feedback: None,
            finished: false,
        };
        player.enter_page();
        player
    }

    fn enter_page(&mut self) {
        self.feedback = None;
        let Some(interaction) = self.page().interaction.as_ref() else {
            self.activity = Activity::None;
            self.interaction_done = true;
            return;
        };
        self.interaction_done = false;
        self.activity = match &interaction.kind {
            InteractionKind::TapCollect { targets } => Activity::Tap {
                tapped: Vec::new(),
                find_one: targets.iter().any(|t| t.correct),
                shaking: None,
            },
            InteractionKind::DragDrop { start, .. } => Activity::Drag { pos: *start, held: None },
            InteractionKind::Sort { items, .. } => Activity::Sort {
                items: items
                    .iter()
                    .map(|i| SortPiece {
                        id: i.id,
                        emoji: i.emoji,
                        zone: i.zone,
                        start: i.start,
                        pos: i.start,
                        returning: false,
                    })
                    .collect(),
                held: None,
            },
            InteractionKind::CatchAndSort { .. } => Activity::Catch { falling: Vec::new(), held: None, caught: 0, next_id: 0 },
        };
    }

    pub fn story(&self) -> &'static Story {
        self.story
    }

    pub fn page(&self) -> &'static Page {
        &self.story.pages[self.page]
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn is_last_page(&self) -> bool {
        self.page + 1 >= self.story.pages.len()
    }

    /// (current page, page count), one-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.page + 1, self.story.pages.len())
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn interaction_done(&self) -> bool {
        self.interaction_done
    }

    pub fn feedback(&self) -> Option<&'static str> {
        self.feedback
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Text under the picture: choice feedback, else the pending prompt, else
    /// the page text.
    pub fn caption(&self) -> &'static str {
        if let Some(f) = self.feedback {
            return f;
        }
        match self.page().interaction.as_ref() {
            Some(i) if !self.interaction_done => i.prompt,
            _ => self.page().text,
        }
    }

    /// A choice page shows its options until one is picked.
    pub fn awaiting_choice(&self) -> bool {
        self.page().choice.is_some() && self.feedback.is_none()
    }

    pub fn can_advance(&self) -> bool {
        !self.finished && !self.awaiting_choice() && (self.interaction_done || self.feedback.is_some())
    }

    /// Catch pages need the frame loop and spawn timer while unfinished.
    pub fn wants_frames(&self) -> bool {
        matches!(self.activity, Activity::Catch { .. }) && !self.interaction_done
    }

    pub fn next(&mut self) -> PageStep {
        if !self.can_advance() {
            return PageStep::Blocked;
        }
        if self.is_last_page() {
            self.finished = true;
            return PageStep::Finished;
        }
        self.page += 1;
        self.enter_page();
        PageStep::Turned
    }

    /// Pick reflection option `idx`; returns the response now shown.
    pub fn choose(&mut self, idx: usize) -> Option<&'static str> {
        if self.feedback.is_some() {
            return None;
        }
        let response = self.page().choice.as_ref()?.options.get(idx)?.response;
        self.feedback = Some(response);
        Some(response)
    }

    // --- Tap ----------------------------------------------------------------

    pub fn tap(&mut self, id: u32) -> TapOutcome {
        let Some(InteractionKind::TapCollect { targets }) = self.page().interaction.as_ref().map(|i| &i.kind) else {
            return TapOutcome::Ignored;
        };
        if self.interaction_done {
            return TapOutcome::Ignored;
        }
        let Activity::Tap { tapped, find_one, shaking } = &mut self.activity else {
            return TapOutcome::Ignored;
        };
        let Some(target) = targets.iter().find(|t| t.id == id) else {
            return TapOutcome::Ignored;
        };
        if *find_one {
            if target.correct {
                *tapped = targets.iter().map(|t| t.id).collect();
                *shaking = None;
                self.interaction_done = true;
                TapOutcome::Found
            } else {
                *shaking = Some(id);
                TapOutcome::Wrong
            }
        } else {
            if tapped.contains(&id) {
                return TapOutcome::Ignored;
            }
            tapped.push(id);
            let done = tapped.len() >= targets.len();
            self.interaction_done = done;
            TapOutcome::Collected { done }
        }
    }

    /// Clears the shake marker on a wrong tap once its animation ran.
    pub fn stop_shaking(&mut self) {
        if let Activity::Tap { shaking, .. } = &mut self.activity {
            *shaking = None;
        }
    }

    pub fn is_tapped(&self, id: u32) -> bool {
        matches!(&self.activity, Activity::Tap { tapped, .. } if tapped.contains(&id))
    }

    // --- Dragging -----------------------------------------------------------

    pub fn is_holding(&self) -> bool {
        match &self.activity {
            Activity::Drag { held, .. } => held.is_some(),
            Activity::Sort { held, .. } => held.is_some(),
            Activity::Catch { held, .. } => held.is_some(),
            Activity::None | Activity::Tap { .. } => false,
        }
    }

    /// Pointer went down on item `id` (ignored for single drag pages).
    pub fn grab(&mut self, id: u32, pointer: Point) -> bool {
        if self.interaction_done {
            return false;
        }
        match &mut self.activity {
            Activity::Drag { pos, held } if held.is_none() => {
                *held = Some(Held::new((), *pos, pointer));
                true
            }
            Activity::Sort { items, held } if held.is_none() => {
                let Some(piece) = items.iter_mut().find(|p| p.id == id) else {
                    return false;
                };
                piece.returning = false;
                *held = Some(Held::new(*piece, piece.pos, pointer));
                true
            }
            Activity::Catch { falling, held, .. } if held.is_none() => {
                let Some(idx) = falling.iter().position(|p| p.id == id) else {
                    return false;
                };
                let piece = falling.remove(idx);
                *held = Some(Held::new(piece, piece.pos, pointer));
                true
            }
            _ => false,
        }
    }

    pub fn drag_to(&mut self, pointer: Point) {
        match &mut self.activity {
            Activity::Drag { pos, held: Some(h) } => {
                h.follow(pointer);
                *pos = h.pos;
            }
            Activity::Sort { items, held: Some(h) } => {
                h.follow(pointer);
                if let Some(p) = items.iter_mut().find(|p| p.id == h.item.id) {
                    p.pos = h.pos;
                }
            }
            Activity::Catch { held: Some(h), .. } => {
                h.follow(pointer);
                h.item.pos = h.pos;
            }
            _ => {}
        }
    }

    pub fn release(&mut self) -> DropOutcome {
        let page = self.page();
        let Some(kind) = page.interaction.as_ref().map(|i| &i.kind) else {
            return DropOutcome::NothingHeld;
        };
        match (&mut self.activity, kind) {
            (Activity::Drag { pos, held }, InteractionKind::DragDrop { start, zone, .. }) => {
                let Some(h) = held.take() else {
                    return DropOutcome::NothingHeld;
                };
                if zone.rect.contains(item_center(h.pos)) {
                    self.interaction_done = true;
                    DropOutcome::Placed { zone: zone.id, done: true }
                } else {
                    *pos = *start;
                    DropOutcome::Missed
                }
            }
            (Activity::Sort { items, held }, InteractionKind::Sort { zones, .. }) => {
                let Some(h) = held.take() else {
                    return DropOutcome::NothingHeld;
                };
                let outcome = match zone_hit(zones, h.pos) {
                    Some(z) if z.id == h.item.zone => {
                        items.retain(|p| p.id != h.item.id);
                        let done = items.is_empty();
                        return self.placed(z.id, done);
                    }
                    Some(z) => DropOutcome::WrongZone { zone: z.id },
                    None => DropOutcome::Missed,
                };
                if let Some(p) = items.iter_mut().find(|p| p.id == h.item.id) {
                    p.pos = p.start;
                    p.returning = true;
                }
                outcome
            }
            (Activity::Catch { falling, held, caught, .. }, InteractionKind::CatchAndSort { zones, total, .. }) => {
                let Some(h) = held.take() else {
                    return DropOutcome::NothingHeld;
                };
                // a caught item is gone whether or not it landed well
                match zone_hit(zones, h.pos) {
                    Some(z) if z.id == h.item.zone => {
                        *caught += 1;
                        let done = *caught >= *total;
                        if done {
                            falling.clear();
                        }
                        self.placed(z.id, done)
                    }
                    Some(z) => DropOutcome::WrongZone { zone: z.id },
                    None => DropOutcome::Missed,
                }
            }
            _ => DropOutcome::NothingHeld,
        }
    }

    fn placed(&mut self, zone: u32, done: bool) -> DropOutcome {
        if done {
            self.interaction_done = true;
        }
        DropOutcome::Placed { zone, done }
    }

    /// Clears the `returning` flag once the bounce-back animation ran.
    pub fn settle(&mut self, id: u32) {
        if let Activity::Sort { items, .. } = &mut self.activity {
            if let Some(p) = items.iter_mut().find(|p| p.id == id) {
                p.returning = false;
            }
        }
    }

    pub fn settle_all(&mut self) {
        if let Activity::Sort { items, .. } = &mut self.activity {
            for p in items.iter_mut() {
                p.returning = false;
            }
        }
    }

    // --- Catch and sort -----------------------------------------------------

    pub fn spawn(&mut self, rng: &mut Rng) -> bool {
        if self.interaction_done {
            return false;
        }
        let Some(InteractionKind::CatchAndSort { spawns, .. }) = self.page().interaction.as_ref().map(|i| &i.kind) else {
            return false;
        };
        let Activity::Catch { falling, next_id, .. } = &mut self.activity else {
            return false;
        };
        if spawns.is_empty() {
            return false;
        }
        let CatchItem { emoji, zone } = &spawns[rng.index(spawns.len())];
        falling.push(CatchPiece { id: *next_id, emoji: *emoji, zone: *zone, pos: Point::new(rng.range(0.0, 85.0), -10.0) });
        *next_id += 1;
        true
    }

    pub fn tick(&mut self, dt_ms: f64) {
        if self.interaction_done {
            return;
        }
        if let Activity::Catch { falling, .. } = &mut self.activity {
            let dy = CATCH_FALL_SPEED * dt_ms.clamp(0.0, FALL_DT_CAP_MS) / 1000.0;
            for p in falling.iter_mut() {
                p.pos.y += dy;
            }
            falling.retain(|p| p.pos.y < CATCH_EXIT_Y);
        }
    }

    pub fn caught(&self) -> Option<(u32, u32)> {
        match (&self.activity, self.page().interaction.as_ref().map(|i| &i.kind)) {
            (Activity::Catch { caught, .. }, Some(InteractionKind::CatchAndSort { total, .. })) => Some((*caught, *total)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::STORIES;

    fn player_on_interaction(story: usize) -> StoryPlayer {
        let mut p = StoryPlayer::new(&STORIES[story]);
        while p.page().interaction.is_none() {
            assert_eq!(p.next(), PageStep::Turned);
        }
        p
    }

    fn drag(p: &mut StoryPlayer, id: u32, from: Point, to_center: Point) -> DropOutcome {
        assert!(p.grab(id, from));
        assert!(p.is_holding());
        p.drag_to(Point::new(to_center.x - 5.0, to_center.y - 5.0));
        p.release()
    }

    #[test]
    fn plain_pages_turn_freely() {
        let mut p = StoryPlayer::new(&STORIES[0]);
        assert!(p.can_advance());
        assert_eq!(p.next(), PageStep::Turned);
        assert_eq!(p.progress(), (2, 5));
    }

    #[test]
    fn interaction_blocks_next() {
        let mut p = player_on_interaction(0);
        assert!(!p.can_advance());
        assert_eq!(p.next(), PageStep::Blocked);
        assert_eq!(p.caption(), "Tap all the litter to clean the forest!");
    }

    #[test]
    fn collect_all_ignores_repeats() {
        let mut p = player_on_interaction(0);
        assert_eq!(p.tap(1), TapOutcome::Collected { done: false });
        assert_eq!(p.tap(1), TapOutcome::Ignored);
        assert_eq!(p.tap(3), TapOutcome::Collected { done: false });
        assert_eq!(p.tap(2), TapOutcome::Collected { done: true });
        assert!(p.can_advance());
    }

    #[test]
    fn find_one_shakes_wrong_taps() {
        let mut p = player_on_interaction(2);
        assert_eq!(p.tap(2), TapOutcome::Wrong);
        assert!(matches!(p.activity(), Activity::Tap { shaking: Some(2), .. }));
        assert!(!p.can_advance());
        assert_eq!(p.tap(1), TapOutcome::Found);
        assert!(p.can_advance());
        assert!(p.is_tapped(4));
    }

    #[test]
    fn drag_drop_hits_and_misses() {
        let mut p = player_on_interaction(5);
        let start = Point::new(10.0, 60.0);
        assert_eq!(drag(&mut p, 0, start, Point::new(20.0, 20.0)), DropOutcome::Missed);
        assert!(matches!(p.activity(), Activity::Drag { pos, .. } if *pos == start));
        assert_eq!(drag(&mut p, 0, start, Point::new(75.0, 70.0)), DropOutcome::Placed { zone: 1, done: true });
        assert!(p.can_advance());
    }

    #[test]
    fn sort_returns_misplaced_items() {
        let mut p = player_on_interaction(3);
        let can = Point::new(20.0, 20.0);
        let compost = Point::new(49.5, 82.5);
        assert_eq!(drag(&mut p, 1, can, compost), DropOutcome::WrongZone { zone: 2 });
        match p.activity() {
            Activity::Sort { items, .. } => {
                let piece = items.iter().find(|i| i.id == 1).unwrap();
                assert_eq!(piece.pos, can);
                assert!(piece.returning);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(drag(&mut p, 1, can, Point::new(17.5, 82.5)), DropOutcome::Placed { zone: 1, done: false });
        assert_eq!(drag(&mut p, 2, Point::new(45.0, 25.0), compost), DropOutcome::Placed { zone: 2, done: false });
        assert_eq!(drag(&mut p, 3, Point::new(70.0, 20.0), Point::new(82.5, 82.5)), DropOutcome::Placed { zone: 3, done: true });
        assert!(p.interaction_done());
    }

    #[test]
    fn catch_and_sort_counts_to_total() {
        let mut p = player_on_interaction(1);
        assert!(p.wants_frames());
        let mut rng = Rng::seeded(21);
        let mut caught = 0;
        while !p.interaction_done() {
            assert!(p.spawn(&mut rng));
            let piece = match p.activity() {
                Activity::Catch { falling, .. } => *falling.last().unwrap(),
                other => panic!("unexpected {other:?}"),
            };
            let target = if piece.zone == 1 { Point::new(27.5, 89.0) } else { Point::new(72.5, 89.0) };
            if let DropOutcome::Placed { .. } = drag(&mut p, piece.id, piece.pos, target) {
                caught += 1;
            }
        }
        assert_eq!(caught, 6);
        assert_eq!(p.caught(), Some((6, 6)));
        assert!(!p.spawn(&mut rng));
        assert!(!p.wants_frames());
    }

    #[test]
    fn falling_items_leave_past_bottom() {
        let mut p = player_on_interaction(1);
        let mut rng = Rng::seeded(4);
        p.spawn(&mut rng);
        for _ in 0..40 {
            p.tick(100.0);
        }
        assert!(matches!(p.activity(), Activity::Catch { falling, .. } if falling.is_empty()));
    }

    #[test]
    fn choice_unlocks_and_finishes() {
        let mut p = StoryPlayer::new(&STORIES[0]);
        while !p.is_last_page() {
            if p.page().interaction.is_some() {
                for id in 1..=3 {
                    p.tap(id);
                }
            }
            p.next();
        }
        assert!(p.awaiting_choice());
        assert_eq!(p.choose(9), None);
        let response = p.choose(0).unwrap();
        assert_eq!(p.caption(), response);
        assert!(!p.awaiting_choice());
        assert_eq!(p.next(), PageStep::Finished);
        assert!(p.is_finished());
        assert_eq!(p.next(), PageStep::Blocked);
    }
}
