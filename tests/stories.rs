// Integration tests (native) for the story shelf.
// Every story is played start to finish through the public player API, the way
// a kid would: tapping, dragging and answering until the last page closes.

use earthcare::games::rng::Rng;
use earthcare::geometry::Point;
use earthcare::story::player::{Activity, DropOutcome, PageStep, TapOutcome};
use earthcare::story::{DropZone, InteractionKind, STORIES, StoryPlayer, story_at};

/// Pointer position that lands an item (grabbed at its top-left) in the
/// middle of `zone`.
fn aim(zone: &DropZone) -> Point {
    zone.rect.center().offset(-5.0, -5.0)
}

fn zone_by_id(zones: &'static [DropZone], id: u32) -> &'static DropZone {
    zones.iter().find(|z| z.id == id).expect("item points at a missing zone")
}

fn solve_page(p: &mut StoryPlayer, rng: &mut Rng) {
    let Some(interaction) = p.page().interaction.as_ref() else { return };
    match &interaction.kind {
        InteractionKind::TapCollect { targets } => {
            if let Some(answer) = targets.iter().find(|t| t.correct) {
                assert_eq!(p.tap(answer.id), TapOutcome::Found);
            } else {
                for t in targets.iter() {
                    assert!(matches!(p.tap(t.id), TapOutcome::Collected { .. }));
                }
            }
        }
        InteractionKind::DragDrop { start, zone, .. } => {
            assert!(p.grab(0, *start));
            p.drag_to(aim(zone));
            assert_eq!(p.release(), DropOutcome::Placed { zone: zone.id, done: true });
        }
        InteractionKind::Sort { items, zones } => {
            for item in items.iter() {
                assert!(p.grab(item.id, item.start));
                p.drag_to(aim(zone_by_id(zones, item.zone)));
                assert!(matches!(p.release(), DropOutcome::Placed { .. }));
            }
        }
        InteractionKind::CatchAndSort { zones, total, .. } => {
            let mut guard = 0;
            while !p.interaction_done() {
                guard += 1;
                assert!(guard < 10 * *total as usize, "catch page never finished");
                if !p.spawn(rng) {
                    continue;
                }
                let Activity::Catch { falling, .. } = p.activity() else { panic!("not a catch page") };
                let piece = falling[0];
                assert!(p.grab(piece.id, piece.pos));
                p.drag_to(aim(zone_by_id(zones, piece.zone)));
                assert!(matches!(p.release(), DropOutcome::Placed { .. }));
            }
        }
    }
    assert!(p.interaction_done());
}

#[test]
fn every_story_can_be_finished() {
    let mut rng = Rng::seeded(7);
    for story in STORIES.iter() {
        let mut p = StoryPlayer::new(story);
        let mut turns = 0;
        loop {
            solve_page(&mut p, &mut rng);
            if p.awaiting_choice() {
                assert!(p.choose(0).is_some());
            }
            match p.next() {
                PageStep::Turned => turns += 1,
                PageStep::Finished => break,
                PageStep::Blocked => panic!("{}: stuck on page {}", story.title, p.page_index()),
            }
        }
        assert_eq!(turns + 1, story.pages.len(), "{}", story.title);
        assert!(p.is_finished());
    }
}

#[test]
fn shelf_has_ten_stories_with_pages() {
    assert_eq!(STORIES.len(), 10);
    for story in STORIES.iter() {
        assert!(!story.title.is_empty());
        assert!(!story.pages.is_empty(), "{}", story.title);
    }
}

#[test]
fn interaction_ids_are_unique_per_page() {
    for story in STORIES.iter() {
        for page in story.pages {
            let Some(interaction) = page.interaction.as_ref() else { continue };
            let mut ids: Vec<u32> = match &interaction.kind {
                InteractionKind::TapCollect { targets } => targets.iter().map(|t| t.id).collect(),
                InteractionKind::Sort { items, .. } => items.iter().map(|i| i.id).collect(),
                InteractionKind::DragDrop { .. } | InteractionKind::CatchAndSort { .. } => continue,
            };
            let n = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), n, "{}: duplicate ids", story.title);
        }
    }
}

#[test]
fn search_pages_have_a_single_answer() {
    for story in STORIES.iter() {
        for page in story.pages {
            if let Some(InteractionKind::TapCollect { targets }) = page.interaction.as_ref().map(|i| &i.kind) {
                assert!(targets.iter().filter(|t| t.correct).count() <= 1, "{}", story.title);
            }
        }
    }
}

#[test]
fn catch_pages_have_work_to_do() {
    for story in STORIES.iter() {
        for page in story.pages {
            if let Some(InteractionKind::CatchAndSort { spawns, zones, total }) = page.interaction.as_ref().map(|i| &i.kind) {
                assert!(*total > 0);
                assert!(!spawns.is_empty());
                for s in spawns.iter() {
                    assert!(zones.iter().any(|z| z.id == s.zone), "{}: {} has no zone", story.title, s.emoji);
                }
            }
        }
    }
}

#[test]
fn story_index_wraps() {
    assert!(std::ptr::eq(story_at(0), &STORIES[0]));
    assert!(std::ptr::eq(story_at(STORIES.len() + 2), &STORIES[2]));
}
