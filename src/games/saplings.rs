//! "Save the Saplings": the reward game played after a successful check-in.
//!
//! Saplings drop from the sky and must be dragged into the zone where they
//! grow. Correct drops build a combo; every third combo step is worth a bonus
//! point. Golden saplings score double and grow anywhere except the compost
//! bin. A watering can occasionally drops instead and slows everything down.

use crate::games::rng::Rng;
use crate::games::{FALL_DT_CAP_MS, Held};
use crate::geometry::{Point, Rect};

pub const TARGET_SCORE: u32 = 12;
pub const MAX_ONSCREEN: usize = 6;
pub const SPAWN_INTERVAL_MS: i32 = 1_800;
/// Percent of the board per second.
pub const BASE_FALL_SPEED: f64 = 8.0;
pub const SLOW_FACTOR: f64 = 0.5;
pub const SLOW_DURATION_MS: f64 = 4_000.0;
pub const WOBBLE_MS: f64 = 800.0;

const POWER_UP_CHANCE: f64 = 0.1;
const WITHERED_CHANCE: f64 = 0.2;
const GOLDEN_CHANCE: f64 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Forest,
    Park,
    Desert,
    Island,
    Garden,
    Compost,
}

impl Zone {
    pub const ALL: [Zone; 6] = [Zone::Forest, Zone::Park, Zone::Desert, Zone::Island, Zone::Garden, Zone::Compost];

    pub fn index(self) -> usize {
        Zone::ALL.iter().position(|z| *z == self).unwrap_or(0)
    }

    /// Zones fill the bottom third of the board as a 3 x 2 grid.
    pub fn rect(self) -> Rect {
        let i = self.index();
        let col = (i % 3) as f64;
        let row = (i / 3) as f64;
        let w = 100.0 / 3.0;
        Rect::new(col * w, 64.0 + row * 18.0, w, 18.0)
    }

    /// Name variations; one is picked per game.
    pub fn variations(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Zone::Forest => &[("Deep Forest", "🏞️"), ("Misty Woods", "🌲"), ("Sunny Grove", "🌳")],
            Zone::Park => &[("City Park", "🏙️"), ("Playground", "🛝"), ("City Square", "🏢")],
            Zone::Desert => &[("Arid Desert", "🏜️")],
            Zone::Island => &[("Tropical Island", "🏝️")],
            Zone::Garden => &[("Garden", "⛲")],
            Zone::Compost => &[("Compost Bin", "🗑️")],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaplingKind {
    Pine,
    Oak,
    Cherry,
    Cactus,
    Palm,
    Bush,
    Withered,
}

impl SaplingKind {
    pub const HEALTHY: [SaplingKind; 6] = [
        SaplingKind::Pine,
        SaplingKind::Oak,
        SaplingKind::Cherry,
        SaplingKind::Cactus,
        SaplingKind::Palm,
        SaplingKind::Bush,
    ];

    pub fn zone(self) -> Zone {
        match self {
            SaplingKind::Pine | SaplingKind::Oak => Zone::Forest,
            SaplingKind::Cherry => Zone::Park,
            SaplingKind::Cactus => Zone::Desert,
            SaplingKind::Palm => Zone::Island,
            SaplingKind::Bush => Zone::Garden,
            SaplingKind::Withered => Zone::Compost,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            SaplingKind::Pine => "🌲",
            SaplingKind::Oak => "🌳",
            SaplingKind::Cherry => "🌸",
            SaplingKind::Cactus => "🌵",
            SaplingKind::Palm => "🌴",
            SaplingKind::Bush => "🌷",
            SaplingKind::Withered => "🥀",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sapling {
    pub kind: SaplingKind,
    pub golden: bool,
}

impl Sapling {
    /// Golden saplings grow anywhere but the compost bin.
    pub fn accepted_by(self, zone: Zone) -> bool {
        self.kind.zone() == zone || (self.golden && zone != Zone::Compost)
    }

    pub fn points(self) -> u32 {
        if self.golden { 2 } else { 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallingKind {
    Sapling(Sapling),
    WateringCan,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Falling {
    pub id: u32,
    pub kind: FallingKind,
    pub pos: Point,
    /// Game-clock time until which a returned sapling wobbles.
    pub wobble_until: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grab {
    Sapling,
    PowerUp,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaplingDrop {
    Saved { zone: Zone, points: u32, bonus: u32, combo: u32, completed: bool },
    Wrong { zone: Option<Zone> },
    NothingHeld,
}

#[derive(Clone, Debug)]
pub struct SaplingGame {
    items: Vec<Falling>,
    held: Option<Held<Sapling>>,
    score: u32,
    combo: u32,
    clock_ms: f64,
    slow_until: Option<f64>,
    next_id: u32,
    completed: bool,
    zone_looks: [(&'static str, &'static str); 6],
    planted: [Vec<&'static str>; 6],
}

impl SaplingGame {
    pub fn new(rng: &mut Rng) -> Self {
        let zone_looks = Zone::ALL.map(|z| {
            let v = z.variations();
            v[rng.index(v.len())]
        });
        Self {
            items: Vec::new(),
            held: None,
            score: 0,
            combo: 0,
            clock_ms: 0.0,
            slow_until: None,
            next_id: 0,
            completed: false,
            zone_looks,
            planted: Default::default(),
        }
    }

    pub fn items(&self) -> &[Falling] {
        &self.items
    }

    pub fn held(&self) -> Option<&Held<Sapling>> {
        self.held.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_until.is_some_and(|t| self.clock_ms < t)
    }

    pub fn zone_look(&self, zone: Zone) -> (&'static str, &'static str) {
        self.zone_looks[zone.index()]
    }

    /// Most recent saplings planted in `zone`, oldest first, at most five.
    pub fn planted(&self, zone: Zone) -> &[&'static str] {
        let all = &self.planted[zone.index()];
        &all[all.len().saturating_sub(5)..]
    }

    pub fn is_wobbling(&self, item: &Falling) -> bool {
        item.wobble_until.is_some_and(|t| self.clock_ms < t)
    }

    fn has_power_up(&self) -> bool {
        self.items.iter().any(|i| i.kind == FallingKind::WateringCan)
    }

    pub fn spawn(&mut self, rng: &mut Rng) -> bool {
        if self.completed || self.score >= TARGET_SCORE || self.items.len() >= MAX_ONSCREEN {
            return false;
        }
        let kind = if rng.chance(POWER_UP_CHANCE) && !self.has_power_up() {
            FallingKind::WateringCan
        } else {
            let kind = if rng.chance(WITHERED_CHANCE) {
                SaplingKind::Withered
            } else {
                SaplingKind::HEALTHY[rng.index(SaplingKind::HEALTHY.len())]
            };
            let golden = kind != SaplingKind::Withered && rng.chance(GOLDEN_CHANCE);
            FallingKind::Sapling(Sapling { kind, golden })
        };
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Falling { id, kind, pos: Point::new(rng.range(3.0, 85.0), -10.0), wobble_until: None });
        true
    }

    pub fn tick(&mut self, dt_ms: f64) {
        let dt = dt_ms.clamp(0.0, FALL_DT_CAP_MS);
        self.clock_ms += dt;
        if self.slow_until.is_some_and(|t| self.clock_ms >= t) {
            self.slow_until = None;
        }
        if self.completed {
            return;
        }
        let speed = if self.is_slowed() { BASE_FALL_SPEED * SLOW_FACTOR } else { BASE_FALL_SPEED };
        let dy = speed * dt / 1000.0;
        for it in &mut self.items {
            it.pos.y += dy;
        }
        self.items.retain(|it| it.pos.y < 100.0);
    }

    /// Pointer went down on item `id`. A sapling is lifted out of the fall
    /// list; the watering can is used up on touch.
    pub fn grab(&mut self, id: u32, pointer: Point) -> Grab {
        if self.completed || self.held.is_some() {
            return Grab::Ignored;
        }
        let Some(idx) = self.items.iter().position(|it| it.id == id) else {
            return Grab::Ignored;
        };
        let item = self.items.remove(idx);
        match item.kind {
            FallingKind::WateringCan => {
                self.slow_until = Some(self.clock_ms + SLOW_DURATION_MS);
                Grab::PowerUp
            }
            FallingKind::Sapling(s) => {
                self.held = Some(Held::new(s, item.pos, pointer));
                Grab::Sapling
            }
        }
    }

    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(h) = self.held.as_mut() {
            h.follow(pointer);
        }
    }

    /// Drop the held sapling where the pointer is.
    pub fn release(&mut self) -> SaplingDrop {
        let Some(held) = self.held.take() else {
            return SaplingDrop::NothingHeld;
        };
        let zone = Zone::ALL.into_iter().find(|z| z.rect().contains_inclusive(held.pointer));
        match zone {
            Some(z) if held.item.accepted_by(z) => {
                let points = held.item.points();
                self.combo += 1;
                let bonus = u32::from(self.combo % 3 == 0);
                self.score = (self.score + points + bonus).min(TARGET_SCORE);
                self.planted[z.index()].push(held.item.kind.emoji());
                let completed = self.score >= TARGET_SCORE && !self.completed;
                if completed {
                    self.completed = true;
                    self.items.clear();
                }
                SaplingDrop::Saved { zone: z, points, bonus, combo: self.combo, completed }
            }
            _ => {
                self.combo = 0;
                let id = self.next_id;
                self.next_id += 1;
                self.items.push(Falling {
                    id,
                    kind: FallingKind::Sapling(held.item),
                    pos: Point::new(held.pos.x.clamp(0.0, 90.0), 10.0),
                    wobble_until: Some(self.clock_ms + WOBBLE_MS),
                });
                SaplingDrop::Wrong { zone }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with(kind: SaplingKind, golden: bool) -> SaplingGame {
        let mut rng = Rng::seeded(1);
        let mut g = SaplingGame::new(&mut rng);
        g.items.push(Falling {
            id: 100,
            kind: FallingKind::Sapling(Sapling { kind, golden }),
            pos: Point::new(40.0, 20.0),
            wobble_until: None,
        });
        g
    }

    fn drop_in(g: &mut SaplingGame, id: u32, zone: Zone) -> SaplingDrop {
        let pos = g.items.iter().find(|i| i.id == id).map(|i| i.pos).unwrap();
        assert_eq!(g.grab(id, pos), Grab::Sapling);
        g.drag_to(zone.rect().center());
        g.release()
    }

    #[test]
    fn zones_tile_the_footer() {
        for z in Zone::ALL {
            let r = z.rect();
            assert!(r.y >= 64.0 && r.y + r.height <= 100.0 + 1e-9);
        }
        assert_eq!(Zone::Compost.rect().center().y, 91.0);
    }

    #[test]
    fn combo_bonus_every_third() {
        let mut g = game_with(SaplingKind::Pine, false);
        let mut bonuses = Vec::new();
        for n in 0..3 {
            let id = 200 + n;
            g.items.push(Falling {
                id,
                kind: FallingKind::Sapling(Sapling { kind: SaplingKind::Cactus, golden: false }),
                pos: Point::new(10.0, 10.0),
                wobble_until: None,
            });
            if let SaplingDrop::Saved { bonus, .. } = drop_in(&mut g, id, Zone::Desert) {
                bonuses.push(bonus);
            }
        }
        assert_eq!(bonuses, vec![0, 0, 1]);
        assert_eq!(g.score(), 4);
        assert_eq!(g.combo(), 3);
    }

    #[test]
    fn wrong_zone_resets_combo_and_returns_sapling() {
        let mut g = game_with(SaplingKind::Palm, false);
        g.combo = 2;
        assert_eq!(drop_in(&mut g, 100, Zone::Forest), SaplingDrop::Wrong { zone: Some(Zone::Forest) });
        assert_eq!(g.combo(), 0);
        assert_eq!(g.items().len(), 1);
        assert!(g.is_wobbling(&g.items()[0]));
        assert_eq!(g.items()[0].pos.y, 10.0);
    }

    #[test]
    fn golden_goes_anywhere_but_compost() {
        let mut g = game_with(SaplingKind::Palm, true);
        match drop_in(&mut g, 100, Zone::Park) {
            SaplingDrop::Saved { points, .. } => assert_eq!(points, 2),
            other => panic!("unexpected {other:?}"),
        }
        let mut g = game_with(SaplingKind::Palm, true);
        assert!(matches!(drop_in(&mut g, 100, Zone::Compost), SaplingDrop::Wrong { .. }));
    }

    #[test]
    fn withered_belongs_in_compost() {
        let mut g = game_with(SaplingKind::Withered, false);
        assert!(matches!(drop_in(&mut g, 100, Zone::Compost), SaplingDrop::Saved { .. }));
    }

    #[test]
    fn watering_can_slows_for_a_while() {
        let mut rng = Rng::seeded(2);
        let mut g = SaplingGame::new(&mut rng);
        g.items.push(Falling { id: 5, kind: FallingKind::WateringCan, pos: Point::new(0.0, 0.0), wobble_until: None });
        assert_eq!(g.grab(5, Point::new(0.0, 0.0)), Grab::PowerUp);
        assert!(g.is_slowed());
        for _ in 0..39 {
            g.tick(100.0);
        }
        assert!(g.is_slowed());
        g.tick(100.0);
        assert!(!g.is_slowed());
    }

    #[test]
    fn reaching_target_completes_once() {
        let mut g = game_with(SaplingKind::Oak, false);
        g.score = TARGET_SCORE - 1;
        match drop_in(&mut g, 100, Zone::Forest) {
            SaplingDrop::Saved { completed, .. } => assert!(completed),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(g.score(), TARGET_SCORE);
        assert!(g.is_complete());
        let mut rng = Rng::seeded(9);
        assert!(!g.spawn(&mut rng));
    }

    #[test]
    fn score_never_exceeds_target() {
        let mut g = game_with(SaplingKind::Oak, true);
        g.score = TARGET_SCORE - 1;
        g.combo = 2;
        drop_in(&mut g, 100, Zone::Forest);
        assert_eq!(g.score(), TARGET_SCORE);
    }

    #[test]
    fn spawn_cap_and_single_power_up() {
        let mut rng = Rng::seeded(1234);
        let mut g = SaplingGame::new(&mut rng);
        for _ in 0..50 {
            g.spawn(&mut rng);
        }
        assert_eq!(g.items().len(), MAX_ONSCREEN);
        let cans = g.items().iter().filter(|i| i.kind == FallingKind::WateringCan).count();
        assert!(cans <= 1);
        for it in g.items() {
            if let FallingKind::Sapling(s) = it.kind {
                assert!(!(s.golden && s.kind == SaplingKind::Withered));
            }
        }
    }
}
