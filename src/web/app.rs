//! The running app: store, router and the active screen behind one
//! thread-local, driven by delegated DOM listeners.
//!
//! Each screen owns its timers through [`ScreenTasks`]; navigating replaces
//! the whole struct, which drops (and so cancels) every interval, timeout and
//! frame loop the previous screen started.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent, PointerEvent, window};

use super::flow::{self, StoryTurn};
use super::render;
use crate::audio::{self, Sound};
use crate::config::{
    CHOICE_FEEDBACK_MS, COUNTDOWN_REFRESH_MS, GameConfig, REPAIR_RETURN_DELAY_MS, SAPLING_CELEBRATION_MS,
    STORY_FINISH_DELAY_MS,
};
use crate::error::Rejection;
use crate::games::repair::{CleanupEvent, RepairGame, SORT_SPAWN_INTERVAL_MS, SortDrop};
use crate::games::rng::Rng;
use crate::games::saplings::{self, Grab, SaplingDrop, SaplingGame};
use crate::geometry::{Point, to_percent};
use crate::logging;
use crate::persist::{KeyValueStore, LocalStorage, MemoryStore, Store};
use crate::reducer::{Action, CheckInChoice, Effect, Transition};
use crate::router::{Router, View};
use crate::state::Mode;
use crate::story::player::{CATCH_SPAWN_INTERVAL_MS, DropOutcome, TapOutcome};
use crate::story::{STORIES, StoryPlayer, story_at};
use crate::timers::{FrameLoop, Interval, Timeout, format_countdown, now_ms};

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the app if it is started and not already borrowed.
fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => {
            if let Some(app) = guard.as_mut() {
                f(app);
            }
        }
        Err(_) => logging::warn("event dropped: app busy"),
    });
}

enum Screen {
    Plain,
    Repair(RepairGame),
    Saplings(SaplingGame),
    Story(StoryPlayer),
    DevUnlock { error: bool },
}

#[derive(Default)]
struct ScreenTasks {
    spawn: Option<Interval>,
    frames: Option<FrameLoop>,
    countdown: Option<Interval>,
    pending: Vec<Timeout>,
}

struct App {
    cfg: GameConfig,
    store: Store<Box<dyn KeyValueStore>>,
    router: Router,
    screen: Screen,
    tasks: ScreenTasks,
    rng: Rng,
    doc: Document,
    root: Element,
    last_frame: Option<f64>,
    shown_locks: [bool; 3],
}

// --- Startup ---------------------------------------------------------------

pub fn start(cfg: GameConfig) -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        logging::warn("start_app called twice; keeping the running app");
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    if doc.get_element_by_id("earthcare-style").is_none() {
        let style = doc.create_element("style")?;
        style.set_id("earthcare-style");
        style.set_text_content(Some(render::STYLE));
        body.append_child(&style)?;
    }
    let root = match doc.get_element_by_id(render::ROOT_ID) {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id(render::ROOT_ID);
            body.append_child(&el)?;
            el
        }
    };

    let backend: Box<dyn KeyValueStore> = match LocalStorage::open() {
        Ok(ls) => Box::new(ls),
        Err(e) => {
            logging::warn(&format!("{e}; progress will only last until reload"));
            Box::new(MemoryStore::new())
        }
    };
    let store = Store::load(backend, &cfg.storage_key, STORIES.len());
    let router = Router::new(store.state().mode);
    let first = router.current();

    let app = App {
        cfg,
        store,
        router,
        screen: Screen::Plain,
        tasks: ScreenTasks::default(),
        rng: Rng::from_entropy(),
        doc: doc.clone(),
        root,
        last_frame: None,
        shown_locks: [false; 3],
    };
    APP.with(|cell| cell.replace(Some(app)));

    install_listeners(&doc)?;
    with_app(|app| app.enter(first));
    logging::info("EarthCare started");
    Ok(())
}

fn listen<E: JsCast + 'static>(doc: &Document, kind: &str, mut handler: impl FnMut(E) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    doc.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Closest ancestor of the event target carrying `attr`.
fn tagged(target: Option<web_sys::EventTarget>, attr: &str) -> Option<Element> {
    let el: Element = target?.dyn_into().ok()?;
    el.closest(&format!("[{attr}]")).ok().flatten()
}

fn install_listeners(doc: &Document) -> Result<(), JsValue> {
    listen::<MouseEvent>(doc, "click", |ev| {
        let Some(el) = tagged(ev.target(), "data-action") else { return };
        let Some(action) = el.get_attribute("data-action") else { return };
        let arg = el.get_attribute("data-arg");
        with_app(|app| app.on_action(&action, arg.as_deref()));
    })?;

    listen::<PointerEvent>(doc, "pointerdown", |ev| {
        let Some(el) = tagged(ev.target(), "data-item") else { return };
        let Some(id) = el.get_attribute("data-item").and_then(|v| v.parse::<u32>().ok()) else { return };
        ev.prevent_default();
        let (x, y) = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        with_app(|app| {
            if let Some(p) = app.play_point(x, y) {
                app.on_grab(id, p);
            }
        });
    })?;

    listen::<PointerEvent>(doc, "pointermove", |ev| {
        let (x, y) = (f64::from(ev.client_x()), f64::from(ev.client_y()));
        with_app(|app| {
            if let Some(p) = app.play_point(x, y) {
                app.on_drag(p);
            }
        });
    })?;

    for kind in ["pointerup", "pointercancel"] {
        listen::<PointerEvent>(doc, kind, |_| with_app(App::on_release))?;
    }

    listen::<KeyboardEvent>(doc, "keydown", |ev| {
        if ev.key() == "Enter" {
            with_app(|app| {
                if matches!(app.screen, Screen::DevUnlock { .. }) {
                    app.unlock();
                }
            });
        }
    })?;
    Ok(())
}

impl App {
    // --- Plumbing ----------------------------------------------------------

    fn sfx(&self, sound: Sound) {
        if self.cfg.sound_enabled {
            audio::play(sound, self.cfg.volume);
        }
    }

    fn alert(&self, msg: &str) {
        if let Some(w) = window() {
            if let Err(e) = w.alert_with_message(msg) {
                logging::warn(&format!("alert failed: {e:?}"));
            }
        }
    }

    fn confirm(&self, msg: &str) -> bool {
        window().and_then(|w| w.confirm_with_message(msg).ok()).unwrap_or(false)
    }

    fn later(&mut self, delay_ms: i32, f: impl FnOnce(&mut App) + 'static) {
        match Timeout::new(delay_ms, move || with_app(f)) {
            Ok(t) => self.tasks.pending.push(t),
            Err(e) => logging::error(&format!("setTimeout failed: {e:?}")),
        }
    }

    fn play_point(&self, client_x: f64, client_y: f64) -> Option<Point> {
        let area = self.doc.get_element_by_id(render::PLAY_AREA_ID)?;
        let r = area.get_bounding_client_rect();
        Some(to_percent(client_x, client_y, r.left(), r.top(), r.width(), r.height()))
    }

    fn lock_flags(&self) -> [bool; 3] {
        render::locks(self.store.state(), now_ms(), &self.cfg).map(|l| l.is_some())
    }

    // --- Navigation & rendering --------------------------------------------

    fn enter(&mut self, view: View) {
        self.router.navigate(view);
        self.tasks = ScreenTasks::default();
        self.last_frame = None;
        self.screen = match view {
            View::Repair => Screen::Repair(RepairGame::new(self.cfg.simple_repair)),
            View::Saplings => Screen::Saplings(SaplingGame::new(&mut self.rng)),
            View::Story => Screen::Story(StoryPlayer::new(story_at(self.store.state().story_index))),
            View::DevUnlock => Screen::DevUnlock { error: false },
            _ => Screen::Plain,
        };
        self.render();
        if let Err(e) = self.start_tasks(view) {
            logging::error(&format!("could not start screen timers: {e:?}"));
        }
    }

    fn start_tasks(&mut self, view: View) -> Result<(), JsValue> {
        let spawn_every = match &self.screen {
            Screen::Repair(g) if g.needs_frames() => Some(SORT_SPAWN_INTERVAL_MS),
            Screen::Saplings(_) => Some(saplings::SPAWN_INTERVAL_MS),
            Screen::Story(p) if p.wants_frames() => Some(CATCH_SPAWN_INTERVAL_MS),
            _ => None,
        };
        if let Some(ms) = spawn_every {
            return self.run_game_loop(ms);
        }
        if matches!(self.screen, Screen::Plain) && matches!(view, View::KidHome | View::CheckIn | View::Upload) {
            self.shown_locks = self.lock_flags();
            self.tasks.countdown = Some(Interval::new(COUNTDOWN_REFRESH_MS, || with_app(App::on_countdown))?);
        }
        Ok(())
    }

    fn run_game_loop(&mut self, spawn_every_ms: i32) -> Result<(), JsValue> {
        self.last_frame = None;
        self.tasks.spawn = Some(Interval::new(spawn_every_ms, || with_app(App::on_spawn))?);
        self.tasks.frames = Some(FrameLoop::start(|ts| with_app(|app| app.on_frame(ts)))?);
        Ok(())
    }

    fn stop_game_loop(&mut self) {
        self.tasks.spawn = None;
        self.tasks.frames = None;
    }

    fn render(&self) {
        let now = now_ms();
        let st = self.store.state();
        let html = match &self.screen {
            Screen::Repair(g) => render::repair(g),
            Screen::Saplings(g) => render::saplings(g),
            Screen::Story(p) => render::story(p),
            Screen::DevUnlock { error } => render::dev_unlock(*error),
            Screen::Plain => match self.router.current() {
                View::CheckIn => render::check_in(st, now, &self.cfg),
                View::Upload => render::upload(st, now, &self.cfg),
                View::BadgeAwarded => render::badge_awarded(st),
                View::DevDashboard => render::dev_dashboard(st),
                _ => render::kid_home(st, now, &self.cfg),
            },
        };
        self.root.set_inner_html(&html);
    }

    /// Redraw only the play area; buttons outside it stay put.
    fn render_field(&self) {
        let html = match &self.screen {
            Screen::Repair(g) => render::repair_field(g),
            Screen::Saplings(g) => render::saplings_field(g),
            Screen::Story(p) => render::story_field(p),
            _ => return,
        };
        if let Some(area) = self.doc.get_element_by_id(render::PLAY_AREA_ID) {
            area.set_inner_html(&html);
        }
    }

    // --- Store -------------------------------------------------------------

    fn dispatch(&mut self, action: Action) -> Option<Transition> {
        let outcome = self.store.dispatch(action, now_ms(), &self.cfg);
        self.apply(outcome)
    }

    /// Run the effects of an accepted action or report its refusal.
    fn apply(&mut self, outcome: Result<Transition, Rejection>) -> Option<Transition> {
        match outcome {
            Ok(t) => {
                for effect in &t.effects {
                    self.run_effect(effect);
                }
                Some(t)
            }
            Err(rejection) => {
                self.sfx(Sound::Error);
                logging::info(&format!("action refused: {rejection}"));
                if rejection != Rejection::InvalidPasscode {
                    self.alert(&rejection.to_string());
                }
                None
            }
        }
    }

    fn run_effect(&self, effect: &Effect) {
        match effect {
            Effect::Play(sound) => self.sfx(*sound),
            Effect::OpenUrl(url) => {
                if let Some(w) = window() {
                    if let Err(e) = w.open_with_url_and_target(url, "_blank") {
                        logging::warn(&format!("could not open {url}: {e:?}"));
                    }
                }
            }
            Effect::ClearStorage => logging::info("saved progress cleared"),
        }
    }

    /// Show the transition's notice, then go where it says.
    fn follow(&mut self, t: Transition) {
        if let Some(notice) = &t.notice {
            self.alert(notice);
        }
        match t.view {
            Some(view) => self.enter(view),
            None => self.render(),
        }
    }

    fn dispatch_and_follow(&mut self, action: Action) {
        if let Some(t) = self.dispatch(action) {
            self.follow(t);
        }
    }

    // --- Timers ------------------------------------------------------------

    fn on_countdown(&mut self) {
        let locks = render::locks(self.store.state(), now_ms(), &self.cfg);
        let flags = locks.map(|l| l.is_some());
        if flags != self.shown_locks {
            self.shown_locks = flags;
            self.render();
            return;
        }
        for (kind, remaining) in render::COUNTDOWN_KINDS.iter().zip(locks) {
            let Some(ms) = remaining else { continue };
            let Ok(nodes) = self.doc.query_selector_all(&format!("[data-countdown=\"{kind}\"]")) else {
                continue;
            };
            let text = format_countdown(ms);
            for i in 0..nodes.length() {
                if let Some(node) = nodes.get(i) {
                    node.set_text_content(Some(&text));
                }
            }
        }
    }

    fn on_spawn(&mut self) {
        let spawned = match &mut self.screen {
            Screen::Repair(RepairGame::Sorting(g)) => g.spawn(&mut self.rng),
            Screen::Saplings(g) => g.spawn(&mut self.rng),
            Screen::Story(p) => p.spawn(&mut self.rng),
            _ => false,
        };
        if spawned {
            self.render_field();
        }
    }

    fn on_frame(&mut self, ts: f64) {
        let dt = self.last_frame.map_or(0.0, |last| ts - last);
        self.last_frame = Some(ts);
        match &mut self.screen {
            Screen::Repair(RepairGame::Sorting(g)) => g.tick(dt),
            Screen::Saplings(g) => g.tick(dt),
            Screen::Story(p) => p.tick(dt),
            _ => return,
        }
        self.render_field();
    }

    // --- Clicks ------------------------------------------------------------

    fn on_action(&mut self, action: &str, arg: Option<&str>) {
        self.sfx(Sound::Click);
        match action {
            "home" => self.enter(View::KidHome),
            "go-check-in" => self.enter(View::CheckIn),
            "go-repair" => {
                if self.store.state().earth_state.needs_repair() {
                    self.enter(View::Repair);
                }
            }
            "go-upload" => self.enter(View::Upload),
            "go-story" => self.dispatch_and_follow(Action::StartStory),
            "go-dev" => self.enter(View::DevUnlock),
            "check-in-yes" => self.dispatch_and_follow(Action::CheckIn(CheckInChoice::Yes)),
            "check-in-shield" => self.dispatch_and_follow(Action::CheckIn(CheckInChoice::Shield)),
            "check-in-skip" => {
                if self.confirm("Are you sure you want to skip today? Earth will feel sick.") {
                    self.dispatch_and_follow(Action::CheckIn(CheckInChoice::Skip));
                }
            }
            "upload" => self.dispatch_and_follow(Action::StartUpload),
            "badge-continue" => self.enter(View::default_for(self.store.state().mode)),
            "repair-tap" => {
                if let Some(idx) = arg.and_then(|a| a.parse::<usize>().ok()) {
                    self.repair_tap(idx);
                }
            }
            "story-tap" => {
                if let Some(id) = arg.and_then(|a| a.parse::<u32>().ok()) {
                    self.story_tap(id);
                }
            }
            "story-next" => self.story_next(),
            "story-choice" => {
                if let Some(idx) = arg.and_then(|a| a.parse::<usize>().ok()) {
                    self.story_choice(idx);
                }
            }
            "dev-unlock" => self.unlock(),
            "approve-photo" => self.admin(Action::ApprovePhoto),
            "set-earth" => {
                if let Some(earth) = arg.and_then(render::parse_earth) {
                    self.admin(Action::SetEarthState(earth));
                }
            }
            "reset-shields" => self.admin(Action::ResetShields),
            "reset-photos" => self.admin(Action::ResetPhotos),
            "award-badge" => self.admin(Action::AwardBadge),
            "clear-data" => {
                if self.confirm("Are you sure you want to clear all data and reset to defaults?") {
                    self.admin(Action::ClearData);
                }
            }
            "exit-dev" => self.admin(Action::ExitDevMode),
            other => logging::warn(&format!("unknown action {other}")),
        }
    }

    fn unlock(&mut self) {
        let entered = self
            .doc
            .get_element_by_id("passcode")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        match self.dispatch(Action::UnlockDev { passcode: entered }) {
            Some(t) => self.follow(t),
            None => {
                self.screen = Screen::DevUnlock { error: true };
                self.render();
            }
        }
    }

    fn admin(&mut self, action: Action) {
        if self.store.state().mode != Mode::Dev {
            logging::warn("admin action outside dev mode ignored");
            return;
        }
        self.dispatch_and_follow(action);
    }

    // --- Repair ------------------------------------------------------------

    fn repair_tap(&mut self, idx: usize) {
        let event = match &mut self.screen {
            Screen::Repair(RepairGame::Tap(g)) => g.clean(idx),
            _ => return,
        };
        self.on_cleanup(event);
    }

    fn on_cleanup(&mut self, event: CleanupEvent) {
        match event {
            CleanupEvent::Ignored => {}
            CleanupEvent::Progress { .. } => {
                self.sfx(Sound::Success);
                self.render();
            }
            CleanupEvent::Completed => {
                self.stop_game_loop();
                self.render();
                if let Some(t) = self.dispatch(Action::RepairCompleted) {
                    self.later(REPAIR_RETURN_DELAY_MS, move |app| app.follow(t));
                }
            }
        }
    }

    // --- Dragging ----------------------------------------------------------

    fn on_grab(&mut self, id: u32, p: Point) {
        let sound = match &mut self.screen {
            Screen::Repair(RepairGame::Sorting(g)) => g.grab(id, p).then_some(Sound::Pickup),
            Screen::Saplings(g) => match g.grab(id, p) {
                Grab::Sapling => Some(Sound::Pickup),
                Grab::PowerUp => Some(Sound::Powerup),
                Grab::Ignored => None,
            },
            Screen::Story(pl) => pl.grab(id, p).then_some(Sound::Pickup),
            _ => None,
        };
        if let Some(sound) = sound {
            self.sfx(sound);
            self.render_field();
        }
    }

    fn on_drag(&mut self, p: Point) {
        let moved = match &mut self.screen {
            Screen::Repair(RepairGame::Sorting(g)) if g.held().is_some() => {
                g.drag_to(p);
                true
            }
            Screen::Saplings(g) if g.held().is_some() => {
                g.drag_to(p);
                true
            }
            Screen::Story(pl) if pl.is_holding() => {
                pl.drag_to(p);
                true
            }
            _ => false,
        };
        if moved {
            self.render_field();
        }
    }

    fn on_release(&mut self) {
        match self.screen {
            Screen::Repair(RepairGame::Sorting(_)) => self.release_trash(),
            Screen::Saplings(_) => self.release_sapling(),
            Screen::Story(_) => self.release_story_item(),
            _ => {}
        }
    }

    fn release_trash(&mut self) {
        let drop = match &mut self.screen {
            Screen::Repair(RepairGame::Sorting(g)) => g.release(),
            _ => return,
        };
        match drop {
            SortDrop::NothingHeld => {}
            SortDrop::Sorted(event) => self.on_cleanup(event),
            SortDrop::WrongBin(_) | SortDrop::Missed => {
                self.sfx(Sound::Wobble);
                self.render_field();
                self.later(800, |app| {
                    if let Screen::Repair(RepairGame::Sorting(g)) = &mut app.screen {
                        let returned: Vec<u32> = g.items().iter().filter(|i| i.returned).map(|i| i.id).collect();
                        for id in returned {
                            g.settle(id);
                        }
                        app.render_field();
                    }
                });
            }
        }
    }

    fn release_sapling(&mut self) {
        let drop = match &mut self.screen {
            Screen::Saplings(g) => g.release(),
            _ => return,
        };
        match drop {
            SaplingDrop::NothingHeld => {}
            SaplingDrop::Saved { bonus, completed, .. } => {
                self.sfx(if bonus > 0 { Sound::Badge } else { Sound::Success });
                self.render_field();
                if completed {
                    self.saplings_done();
                }
            }
            SaplingDrop::Wrong { .. } => {
                self.sfx(Sound::Wobble);
                self.render_field();
            }
        }
    }

    fn release_story_item(&mut self) {
        let drop = match &mut self.screen {
            Screen::Story(p) => p.release(),
            _ => return,
        };
        match drop {
            DropOutcome::NothingHeld => {}
            DropOutcome::Placed { done: true, .. } => {
                self.sfx(Sound::Success);
                self.stop_game_loop();
                self.render();
            }
            DropOutcome::Placed { done: false, .. } => {
                self.sfx(Sound::Success);
                self.render_field();
            }
            DropOutcome::WrongZone { .. } | DropOutcome::Missed => {
                self.sfx(Sound::Error);
                self.render_field();
                self.later(500, |app| {
                    if let Screen::Story(p) = &mut app.screen {
                        p.settle_all();
                        app.render_field();
                    }
                });
            }
        }
    }

    // --- Saplings ----------------------------------------------------------

    fn saplings_done(&mut self) {
        self.sfx(Sound::Win);
        self.tasks.spawn = None;
        self.later(SAPLING_CELEBRATION_MS, |app| app.dispatch_and_follow(Action::HabitGameCompleted));
    }

    // --- Story -------------------------------------------------------------

    fn story_tap(&mut self, id: u32) {
        let outcome = match &mut self.screen {
            Screen::Story(p) => p.tap(id),
            _ => return,
        };
        match outcome {
            TapOutcome::Ignored => {}
            TapOutcome::Collected { done: false } => {
                self.sfx(Sound::Success);
                self.render_field();
            }
            TapOutcome::Collected { done: true } | TapOutcome::Found => {
                self.sfx(Sound::Success);
                self.render();
            }
            TapOutcome::Wrong => {
                self.sfx(Sound::Error);
                self.render_field();
                self.later(800, |app| {
                    if let Screen::Story(p) = &mut app.screen {
                        p.stop_shaking();
                        app.render_field();
                    }
                });
            }
        }
    }

    fn story_next(&mut self) {
        let turn = match &mut self.screen {
            Screen::Story(p) => flow::turn_story_page(p, &mut self.store, now_ms(), &self.cfg),
            _ => return,
        };
        match turn {
            StoryTurn::Blocked => {}
            StoryTurn::Turned => {
                self.sfx(Sound::PageTurn);
                self.tasks = ScreenTasks::default();
                self.render();
                if let Err(e) = self.start_tasks(View::Story) {
                    logging::error(&format!("could not start story timers: {e:?}"));
                }
            }
            StoryTurn::Finished(outcome) => {
                self.sfx(Sound::Win);
                self.render();
                if let Some(t) = self.apply(outcome) {
                    self.later(STORY_FINISH_DELAY_MS, move |app| app.follow(t));
                }
            }
        }
    }

    fn story_choice(&mut self, idx: usize) {
        let picked = match &mut self.screen {
            Screen::Story(p) => p.choose(idx).is_some(),
            _ => return,
        };
        if picked {
            self.sfx(Sound::Success);
            self.render();
            self.later(CHOICE_FEEDBACK_MS, App::story_next);
        }
    }
}
