//! Cooldown arithmetic plus cancellable browser timers.
//!
//! The pure helpers decide whether an action is allowed; the countdown text a
//! screen shows is only ever derived from them. The timer handles
//! ([`Interval`], [`Timeout`], [`FrameLoop`]) are owned by the active screen and
//! cancel themselves on drop, so a dismissed screen cannot keep ticking.

/// Milliseconds left in a cooldown window, or `None` if the action is allowed.
/// A clock that went backwards counts as "no time elapsed".
pub fn cooldown_remaining(last: Option<u64>, now: u64, window_ms: u64) -> Option<u64> {
    let last = last?;
    let elapsed = now.saturating_sub(last);
    if elapsed < window_ms { Some(window_ms - elapsed) } else { None }
}

/// `m:ss`, rounding partial seconds up so "0:00" is never shown while locked.
pub fn format_countdown(remaining_ms: u64) -> String {
    let secs = remaining_ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Wall-clock epoch milliseconds.
pub fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{FrameLoop, Interval, Timeout};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::window;

    /// Repeating `setInterval` task, cleared on drop.
    pub struct Interval {
        id: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl Interval {
        pub fn new(period_ms: i32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
            let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
            let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
            let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms,
            )?;
            Ok(Self { id, _closure: closure })
        }
    }

    impl Drop for Interval {
        fn drop(&mut self) {
            if let Some(w) = window() {
                w.clear_interval_with_handle(self.id);
            }
        }
    }

    /// One-shot `setTimeout` task, cleared on drop if it has not fired yet.
    pub struct Timeout {
        id: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl Timeout {
        pub fn new(delay_ms: i32, f: impl FnOnce() + 'static) -> Result<Self, JsValue> {
            let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
            let mut f = Some(f);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(f) = f.take() {
                    f();
                }
            }) as Box<dyn FnMut()>);
            let id = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )?;
            Ok(Self { id, _closure: closure })
        }
    }

    impl Drop for Timeout {
        fn drop(&mut self) {
            if let Some(w) = window() {
                w.clear_timeout_with_handle(self.id);
            }
        }
    }

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` loop. The callback receives the frame timestamp
    /// (ms, `performance.now()` clock). Dropping the handle cancels the pending
    /// frame and stops rescheduling.
    pub struct FrameLoop {
        alive: Rc<Cell<bool>>,
        pending: Rc<Cell<i32>>,
        _callback: FrameCallback,
    }

    impl FrameLoop {
        pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
            let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
            let alive = Rc::new(Cell::new(true));
            let pending = Rc::new(Cell::new(0));
            let f: FrameCallback = Rc::new(RefCell::new(None));
            let g = f.clone();
            let alive_cb = alive.clone();
            let pending_cb = pending.clone();
            let weak = Rc::downgrade(&f);
            *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
                if !alive_cb.get() {
                    return;
                }
                tick(ts);
                if !alive_cb.get() {
                    return;
                }
                let Some(cb) = weak.upgrade() else { return };
                if let (Some(w), Some(c)) = (window(), cb.borrow().as_ref()) {
                    if let Ok(id) = w.request_animation_frame(c.as_ref().unchecked_ref()) {
                        pending_cb.set(id);
                    }
                }
            }) as Box<dyn FnMut(f64)>));
            if let Some(c) = g.borrow().as_ref() {
                pending.set(win.request_animation_frame(c.as_ref().unchecked_ref())?);
            }
            Ok(Self { alive, pending, _callback: f })
        }
    }

    impl Drop for FrameLoop {
        fn drop(&mut self) {
            self.alive.set(false);
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(self.pending.get());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_window() {
        let window = 10 * 60 * 1000;
        assert_eq!(cooldown_remaining(None, 5, window), None);
        assert_eq!(cooldown_remaining(Some(1_000), 1_000, window), Some(window));
        assert_eq!(cooldown_remaining(Some(1_000), 1_000 + window - 1, window), Some(1));
        assert_eq!(cooldown_remaining(Some(1_000), 1_000 + window, window), None);
        // clock moved backwards
        assert_eq!(cooldown_remaining(Some(9_000), 1_000, window), Some(window));
    }

    #[test]
    fn countdown_text() {
        assert_eq!(format_countdown(600_000), "10:00");
        assert_eq!(format_countdown(59_001), "1:00");
        assert_eq!(format_countdown(1), "0:01");
        assert_eq!(format_countdown(0), "0:00");
    }
}
