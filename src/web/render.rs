//! HTML for every screen, built as strings.
//!
//! Nothing here touches the DOM. Clickable elements carry `data-action`
//! (plus an optional `data-arg`), draggable items carry `data-item`, and each
//! play area is a `#play-area` box whose children are positioned in percent.
//! Animated screens re-render only the play area each frame.

use std::fmt::Write;

use crate::config::{GameConfig, MAX_SHIELDS, PHOTOS_PER_BADGE};
use crate::games::repair::{Bin, RepairGame, SortingCleanup, TAP_TRASH, TapCleanup};
use crate::games::saplings::{FallingKind, SaplingGame, TARGET_SCORE, Zone};
use crate::state::{AppState, EarthState, Mode};
use crate::story::player::Activity;
use crate::story::{InteractionKind, StoryPlayer};
use crate::timers::{cooldown_remaining, format_countdown};

pub const ROOT_ID: &str = "earthcare-root";
pub const PLAY_AREA_ID: &str = "play-area";

pub const STYLE: &str = "
#earthcare-root{font-family:system-ui,sans-serif;max-width:480px;margin:0 auto;padding:16px;text-align:center;color:#2d3436}
.card{background:#fff;border-radius:24px;padding:20px;box-shadow:0 6px 20px rgba(0,0,0,.12);margin-bottom:16px}
.btn{display:block;width:100%;margin:8px 0;padding:14px;border:0;border-radius:16px;font-size:18px;font-weight:700;cursor:pointer;background:#2ecc71;color:#fff}
.btn.secondary{background:#74b9ff}.btn.danger{background:#e17055}.btn:disabled{background:#b2bec3;cursor:not-allowed}
.link{background:none;border:0;color:#636e72;text-decoration:underline;cursor:pointer;margin-top:12px}
.earth{font-size:120px;line-height:1}.earth.Healthy{animation:float 3s ease-in-out infinite}
.earth.Damaged{filter:saturate(.5)}.earth.Critical{filter:grayscale(.8);animation:wobble .8s infinite}
.stats{display:flex;justify-content:space-around;font-weight:700;margin:12px 0}
#play-area{position:relative;height:60vh;max-height:520px;overflow:hidden;border-radius:20px;background:linear-gradient(#dff9fb,#c7ecee);touch-action:none;user-select:none}
.item{position:absolute;font-size:40px;cursor:grab;touch-action:none}
.item.held{transform:scale(1.2) rotate(5deg);pointer-events:none;filter:drop-shadow(0 5px 4px rgba(0,0,0,.3))}
.zone{position:absolute;display:flex;flex-direction:column;align-items:center;justify-content:center;font-size:32px;background:rgba(0,0,0,.08);border:2px dashed rgba(0,0,0,.2);border-radius:16px}
.zone small{font-size:11px;font-weight:700}
.hud{position:absolute;top:6px;right:8px;font-weight:700;background:rgba(255,255,255,.6);padding:2px 10px;border-radius:12px}
.wobble{animation:wobble .8s}.returning{transition:all .5s}.golden{filter:drop-shadow(0 0 8px gold)}
.progress{height:10px;background:rgba(0,0,0,.1);border-radius:6px;overflow:hidden}.progress>div{height:100%;background:#2ecc71}
.error{color:#d63031;font-weight:700}
@keyframes wobble{0%,100%{transform:rotate(0)}25%{transform:rotate(-8deg)}75%{transform:rotate(8deg)}}
@keyframes float{0%,100%{transform:translateY(0)}50%{transform:translateY(-8px)}}
";

/// Escape text for element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn button(action: &str, label: &str, class: &str, enabled: bool) -> String {
    let disabled = if enabled { "" } else { " disabled" };
    format!("<button class=\"btn {class}\" data-action=\"{action}\"{disabled}>{}</button>", escape(label))
}

fn button_arg(action: &str, arg: &str, label: &str, class: &str) -> String {
    format!(
        "<button class=\"btn {class}\" data-action=\"{action}\" data-arg=\"{}\">{}</button>",
        escape(arg),
        escape(label)
    )
}

fn back_link(label: &str) -> String {
    format!("<button class=\"link\" data-action=\"home\">{}</button>", escape(label))
}

fn positioned(left: f64, top: f64) -> String {
    format!("left:{left:.2}%;top:{top:.2}%")
}

fn boxed(x: f64, y: f64, w: f64, h: f64) -> String {
    format!("left:{x:.2}%;top:{y:.2}%;width:{w:.2}%;height:{h:.2}%")
}

pub fn earth_emoji(earth: EarthState) -> &'static str {
    match earth {
        EarthState::Healthy => "🌍",
        EarthState::Damaged => "🌎",
        EarthState::Critical => "🔥",
    }
}

fn earth_visual(earth: EarthState) -> String {
    format!(
        "<div class=\"earth {}\">{}</div><p><b>{}</b></p>",
        earth.label(),
        earth_emoji(earth),
        escape(earth.mood())
    )
}

fn shields(count: u32) -> String {
    (0..MAX_SHIELDS).map(|i| if i < count { "🛡️" } else { "▫️" }).collect()
}

/// Countdown placeholder refreshed once a second without a full re-render.
/// Buttons stay clickable while it runs; the action itself is refused with a
/// notice.
fn countdown(kind: &str, remaining: Option<u64>) -> String {
    match remaining {
        Some(ms) => format!("<p>Next in <span data-countdown=\"{kind}\">{}</span></p>", format_countdown(ms)),
        None => String::new(),
    }
}

/// Which cooldowns are currently running: (check-in, upload, story).
pub fn locks(st: &AppState, now: u64, cfg: &GameConfig) -> [Option<u64>; 3] {
    [
        cooldown_remaining(st.last_check_in_timestamp, now, cfg.check_in_cooldown_ms),
        cooldown_remaining(st.last_upload_timestamp, now, cfg.upload_cooldown_ms),
        cooldown_remaining(st.last_story_completion_timestamp, now, cfg.story_cooldown_ms),
    ]
}

pub const COUNTDOWN_KINDS: [&str; 3] = ["check-in", "upload", "story"];

// --- Kid screens -----------------------------------------------------------

pub fn kid_home(st: &AppState, now: u64, cfg: &GameConfig) -> String {
    let [check_in, _, story] = locks(st, now, cfg);
    let mut html = String::new();
    let _ = write!(html, "<div class=\"card\"><h1>EarthCare</h1>{}", earth_visual(st.earth_state));
    let _ = write!(
        html,
        "<div class=\"stats\"><span>🔥 {} day streak</span><span>{}</span><span>🏅 {}</span></div></div>",
        st.streak,
        shields(st.shields_remaining),
        st.badge_count
    );
    html.push_str("<div class=\"card\">");
    html.push_str(&button("go-check-in", "✅ Daily Check-In", "", true));
    html.push_str(&countdown(COUNTDOWN_KINDS[0], check_in));
    if st.earth_state.needs_repair() {
        html.push_str(&button("go-repair", "🛠️ Repair Earth", "danger", true));
    }
    html.push_str(&button("go-story", "📖 Eco Story", "secondary", true));
    if st.last_check_in_was_skip {
        html.push_str("<p>Keep your habit tomorrow to unlock a story!</p>");
    } else {
        html.push_str(&countdown(COUNTDOWN_KINDS[2], story));
    }
    html.push_str(&button("go-upload", "📸 Photo Mission", "secondary", true));
    html.push_str("</div><button class=\"link\" data-action=\"go-dev\">Grown-ups</button>");
    html
}

pub fn check_in(st: &AppState, now: u64, cfg: &GameConfig) -> String {
    let [lock, _, _] = locks(st, now, cfg);
    let mut html = String::from("<div class=\"card\"><h2>Did you do your eco habit today?</h2>");
    html.push_str(&button("check-in-yes", "🌱 Yes, I did it!", "", true));
    html.push_str(&button(
        "check-in-shield",
        &format!("🛡️ Use a shield ({} left)", st.shields_remaining),
        "secondary",
        true,
    ));
    html.push_str(&button("check-in-skip", "😔 Not today", "danger", true));
    html.push_str(&countdown(COUNTDOWN_KINDS[0], lock));
    html.push_str("</div>");
    html.push_str(&back_link("← Back to Home"));
    html
}

pub fn upload(st: &AppState, now: u64, cfg: &GameConfig) -> String {
    let [_, lock, _] = locks(st, now, cfg);
    let stars: String = (0..PHOTOS_PER_BADGE).map(|i| if i < st.approved_photos { "⭐" } else { "☆" }).collect();
    let mut html = String::from("<div class=\"card\"><h2>Photo Mission</h2>");
    let _ = write!(
        html,
        "<p>Take a photo of your eco habit and send it in!</p><p style=\"font-size:32px\">{stars}</p>\
         <p>{} of {PHOTOS_PER_BADGE} photos approved</p><p>🏅 {} badges · {}</p>",
        st.approved_photos,
        st.badge_count,
        escape(st.badge_title())
    );
    html.push_str(&button("upload", "📤 Upload Photo", "", true));
    html.push_str(&countdown(COUNTDOWN_KINDS[1], lock));
    html.push_str("</div>");
    html.push_str(&back_link("← Back to Home"));
    html
}

pub fn badge_awarded(st: &AppState) -> String {
    let mut html = String::from("<div class=\"card\"><div class=\"earth Healthy\">🏆</div><h2>Badge awarded!</h2>");
    let _ = write!(
        html,
        "<p>You are now <b>{}</b>!</p><p>Total badges: {}</p>",
        escape(st.badge_title()),
        st.badge_count
    );
    html.push_str(&button("badge-continue", "Yay! Continue", "", true));
    html.push_str("</div>");
    html
}

// --- Repair ----------------------------------------------------------------

pub fn repair(game: &RepairGame) -> String {
    let (done, target) = game.progress();
    let title = match game {
        RepairGame::Tap(_) => "Tap the trash to clean up Earth!",
        RepairGame::Sorting(_) => "Drag the trash into the right bin!",
    };
    let mut html = format!("<div class=\"card\"><h2>Repair Earth</h2><p>{title}</p>");
    let _ = write!(html, "<div id=\"{PLAY_AREA_ID}\">{}</div>", repair_field(game));
    if game.is_complete() {
        html.push_str("<h2>🎉 Earth is feeling better!</h2>");
    } else {
        let _ = write!(html, "<p>{done} / {target}</p>");
    }
    html.push_str("</div>");
    html.push_str(&back_link("← Back to Home"));
    html
}

pub fn repair_field(game: &RepairGame) -> String {
    match game {
        RepairGame::Tap(g) => tap_field(g),
        RepairGame::Sorting(g) => sorting_field(g),
    }
}

fn tap_field(g: &TapCleanup) -> String {
    let mut html = String::new();
    for (i, emoji) in TAP_TRASH.iter().enumerate() {
        if g.is_cleaned(i) {
            continue;
        }
        let p = TapCleanup::position(i);
        let _ = write!(
            html,
            "<div class=\"item\" data-action=\"repair-tap\" data-arg=\"{i}\" style=\"{}\">{emoji}</div>",
            positioned(p.x, p.y)
        );
    }
    let _ = write!(html, "<div class=\"hud\">{} / {}</div>", g.cleaned_count(), g.target());
    html
}

fn sorting_field(g: &SortingCleanup) -> String {
    let mut html = String::new();
    for bin in Bin::ALL {
        let r = bin.rect();
        let _ = write!(
            html,
            "<div class=\"zone\" style=\"{}\">{}<small>{}</small></div>",
            boxed(r.x, r.y, r.width, r.height),
            bin.emoji(),
            bin.name()
        );
    }
    for it in g.items() {
        let class = if it.returned { "item wobble" } else { "item" };
        let _ = write!(
            html,
            "<div class=\"{class}\" data-item=\"{}\" style=\"{}\">{}</div>",
            it.id,
            positioned(it.pos.x, it.pos.y),
            it.kind.emoji
        );
    }
    if let Some(h) = g.held() {
        let _ = write!(
            html,
            "<div class=\"item held\" style=\"{}\">{}</div>",
            positioned(h.pos.x, h.pos.y),
            h.item.kind.emoji
        );
    }
    let _ = write!(html, "<div class=\"hud\">Sorted: {} / {}</div>", g.sorted(), g.target());
    html
}

// --- Saplings --------------------------------------------------------------

pub fn saplings(game: &SaplingGame) -> String {
    let mut html = String::from(
        "<div class=\"card\"><h2>Save the Saplings!</h2><p>Drag each sapling to where it grows best.</p>",
    );
    let _ = write!(html, "<div id=\"{PLAY_AREA_ID}\">{}</div>", saplings_field(game));
    html.push_str("</div>");
    html
}

pub fn saplings_field(game: &SaplingGame) -> String {
    let mut html = String::new();
    for zone in Zone::ALL {
        let r = zone.rect();
        let (name, emoji) = game.zone_look(zone);
        let planted: String = game.planted(zone).concat();
        let _ = write!(
            html,
            "<div class=\"zone\" style=\"{}\">{emoji}<small>{}</small><small>{planted}</small></div>",
            boxed(r.x, r.y, r.width, r.height),
            escape(name)
        );
    }
    for it in game.items() {
        let (emoji, mut class) = match it.kind {
            FallingKind::WateringCan => ("💧", String::from("item")),
            FallingKind::Sapling(s) if s.golden => (s.kind.emoji(), String::from("item golden")),
            FallingKind::Sapling(s) => (s.kind.emoji(), String::from("item")),
        };
        if game.is_wobbling(it) {
            class.push_str(" wobble");
        }
        let _ = write!(
            html,
            "<div class=\"{class}\" data-item=\"{}\" style=\"{}\">{emoji}</div>",
            it.id,
            positioned(it.pos.x, it.pos.y)
        );
    }
    if let Some(h) = game.held() {
        let class = if h.item.golden { "item held golden" } else { "item held" };
        let _ = write!(
            html,
            "<div class=\"{class}\" style=\"{}\">{}</div>",
            positioned(h.pos.x, h.pos.y),
            h.item.kind.emoji()
        );
    }
    let _ = write!(html, "<div class=\"hud\">🌱 {} / {TARGET_SCORE}", game.score());
    if game.combo() >= 2 {
        let _ = write!(html, " · combo x{}", game.combo());
    }
    if game.is_slowed() {
        html.push_str(" · 💧 slow");
    }
    html.push_str("</div>");
    if game.is_complete() {
        html.push_str("<div class=\"hud\" style=\"top:40%;right:25%;font-size:24px\">🎉 All saplings saved!</div>");
    }
    html
}

// --- Story -----------------------------------------------------------------

pub fn story(player: &StoryPlayer) -> String {
    let (page, pages) = player.progress();
    let story = player.story();
    let pct = page as f64 / pages as f64 * 100.0;
    let mut html = String::from("<div class=\"card\">");
    let _ = write!(
        html,
        "<h2>{} {}</h2><div class=\"progress\"><div style=\"width:{pct:.0}%\"></div></div>",
        story.character,
        escape(story.title)
    );
    let _ = write!(html, "<div id=\"{PLAY_AREA_ID}\">{}</div>", story_field(player));
    if player.is_finished() {
        html.push_str("<h2>⭐ The End! ⭐</h2>");
    } else if player.awaiting_choice() {
        if let Some(choice) = player.page().choice.as_ref() {
            let _ = write!(html, "<p><b>{}</b></p>", escape(choice.prompt));
            for (i, opt) in choice.options.iter().enumerate() {
                html.push_str(&button_arg("story-choice", &i.to_string(), opt.text, ""));
            }
        }
    } else {
        let label = if player.is_last_page() { "Finish Story!" } else { "Next →" };
        html.push_str(&button("story-next", label, "secondary", player.can_advance()));
    }
    html.push_str("</div>");
    html.push_str(&back_link("← Back to Home"));
    html
}

pub fn story_field(player: &StoryPlayer) -> String {
    let page = player.page();
    let mut html = format!(
        "<div style=\"font-size:72px;margin-top:8px\">{}</div><p style=\"padding:0 12px\">{}</p>",
        page.image,
        escape(player.caption())
    );
    let Some(kind) = page.interaction.as_ref().map(|i| &i.kind) else {
        return html;
    };
    match (kind, player.activity()) {
        (InteractionKind::TapCollect { targets }, Activity::Tap { shaking, .. }) => {
            for t in targets.iter().filter(|t| !player.is_tapped(t.id)) {
                let class = if *shaking == Some(t.id) { "item wobble" } else { "item" };
                let _ = write!(
                    html,
                    "<div class=\"{class}\" data-action=\"story-tap\" data-arg=\"{}\" style=\"{}\">{}</div>",
                    t.id,
                    positioned(t.pos.x, t.pos.y),
                    t.emoji
                );
            }
        }
        (InteractionKind::DragDrop { emoji, zone, .. }, Activity::Drag { pos, held }) => {
            let r = zone.rect;
            let _ = write!(html, "<div class=\"zone\" style=\"{}\">{}</div>", boxed(r.x, r.y, r.width, r.height), zone.emoji);
            if !player.interaction_done() {
                let class = if held.is_some() { "item held" } else { "item" };
                let _ = write!(
                    html,
                    "<div class=\"{class}\" data-item=\"0\" style=\"{}\">{emoji}</div>",
                    positioned(pos.x, pos.y)
                );
            }
        }
        (InteractionKind::Sort { zones, .. }, Activity::Sort { items, held }) => {
            for z in zones.iter() {
                let r = z.rect;
                let _ = write!(
                    html,
                    "<div class=\"zone\" style=\"{}\">{}<small>{}</small></div>",
                    boxed(r.x, r.y, r.width, r.height),
                    z.emoji,
                    escape(z.name)
                );
            }
            for it in items {
                let mut class = String::from("item");
                if held.as_ref().is_some_and(|h| h.item.id == it.id) {
                    class.push_str(" held");
                } else if it.returning {
                    class.push_str(" returning");
                }
                let _ = write!(
                    html,
                    "<div class=\"{class}\" data-item=\"{}\" style=\"{}\">{}</div>",
                    it.id,
                    positioned(it.pos.x, it.pos.y),
                    it.emoji
                );
            }
        }
        (InteractionKind::CatchAndSort { zones, .. }, Activity::Catch { falling, held, .. }) => {
            for z in zones.iter() {
                let r = z.rect;
                let _ = write!(
                    html,
                    "<div class=\"zone\" style=\"{}\">{}<small>{}</small></div>",
                    boxed(r.x, r.y, r.width, r.height),
                    z.emoji,
                    escape(z.name)
                );
            }
            for it in falling {
                let _ = write!(
                    html,
                    "<div class=\"item\" data-item=\"{}\" style=\"{}\">{}</div>",
                    it.id,
                    positioned(it.pos.x, it.pos.y),
                    it.emoji
                );
            }
            if let Some(h) = held {
                let _ = write!(html, "<div class=\"item held\" style=\"{}\">{}</div>", positioned(h.pos.x, h.pos.y), h.item.emoji);
            }
            if let Some((caught, total)) = player.caught() {
                let _ = write!(html, "<div class=\"hud\">Caught: {caught} / {total}</div>");
            }
        }
        _ => {}
    }
    html
}

// --- Grown-up screens ------------------------------------------------------

pub fn dev_unlock(error: bool) -> String {
    let mut html = String::from(
        "<div class=\"card\"><h2>🔒 Grown-ups only</h2>\
         <input id=\"passcode\" type=\"password\" placeholder=\"Passcode\" autocomplete=\"off\" \
         style=\"width:100%;padding:12px;font-size:18px;border-radius:12px;border:1px solid #ccc\">",
    );
    if error {
        html.push_str("<p class=\"error\">Invalid passcode</p>");
    }
    html.push_str(&button("dev-unlock", "Unlock", "", true));
    html.push_str("</div>");
    html.push_str(&back_link("← Back"));
    html
}

pub fn dev_dashboard(st: &AppState) -> String {
    let mode = match st.mode {
        Mode::Dev => "dev",
        Mode::Kid => "kid",
    };
    let mut html = String::from("<div class=\"card\"><h2>Admin Dashboard</h2>");
    let _ = write!(
        html,
        "<p>Kid: <b>{}</b> · mode {mode}</p><p>Earth: {} {} · misses {} · streak {}</p>\
         <p>Shields {} / {MAX_SHIELDS} · photos {} / {PHOTOS_PER_BADGE} · badges {} ({})</p>",
        escape(&st.kid_name),
        earth_emoji(st.earth_state),
        st.earth_state.label(),
        st.consecutive_misses,
        st.streak,
        st.shields_remaining,
        st.approved_photos,
        st.badge_count,
        escape(st.badge_title())
    );
    html.push_str(&button("approve-photo", "📸 Approve Photo", "", true));
    for earth in EarthState::ALL {
        html.push_str(&button_arg("set-earth", earth.label(), &format!("Set Earth: {}", earth.label()), "secondary"));
    }
    html.push_str(&button("reset-shields", "🛡️ Reset Shields", "secondary", true));
    html.push_str(&button("reset-photos", "🔄 Reset Photos", "secondary", true));
    html.push_str(&button("award-badge", "🏅 Award Badge", "secondary", true));
    html.push_str(&button("clear-data", "🗑️ Clear All Data", "danger", true));
    html.push_str(&button("exit-dev", "Exit Dev Mode", "", true));
    html.push_str("</div>");
    html
}

pub fn parse_earth(label: &str) -> Option<EarthState> {
    EarthState::ALL.into_iter().find(|e| e.label() == label)
}
