//! Sound effects. Playback is fire-and-forget: any failure (autoplay policy,
//! missing codec, offline) is logged and never reaches the caller.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Click,
    Success,
    Error,
    Win,
    Pickup,
    PageTurn,
    Badge,
    Wobble,
    Powerup,
}

impl Sound {
    pub fn url(self) -> &'static str {
        match self {
            Sound::Click => "https://actions.google.com/sounds/v1/ui/button_press.mp3",
            Sound::Success => "https://actions.google.com/sounds/v1/positive/success.mp3",
            Sound::Error => "https://actions.google.com/sounds/v1/negative/failure.mp3",
            Sound::Win => "https://actions.google.com/sounds/v1/alarms/bugle_tune.mp3",
            Sound::Pickup => "https://actions.google.com/sounds/v1/impacts/light_object_fall_on_grass.mp3",
            Sound::PageTurn => "https://actions.google.com/sounds/v1/foley/page_turn.mp3",
            Sound::Badge => "https://actions.google.com/sounds/v1/magical/magic_chime.mp3",
            Sound::Wobble => "https://actions.google.com/sounds/v1/cartoon/wobble.mp3",
            Sound::Powerup => "https://actions.google.com/sounds/v1/magical/magic_spell.mp3",
        }
    }

    /// Relative loudness; multiplied with the configured master volume.
    pub fn gain(self) -> f64 {
        match self {
            Sound::Pickup | Sound::Click => 0.6,
            Sound::Win | Sound::Badge => 1.0,
            _ => 0.8,
        }
    }
}

/// Play a sound at `volume` (0.0..=1.0). No-op outside the browser.
pub fn play(sound: Sound, volume: f64) {
    #[cfg(target_arch = "wasm32")]
    browser::play(sound, volume);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (sound, volume);
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::Sound;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlAudioElement;

    thread_local! {
        // One handler for every playback promise; a closure per sound would
        // never be freed.
        static ON_REJECT: Closure<dyn FnMut(JsValue)> = Closure::wrap(Box::new(|err: JsValue| {
            crate::logging::warn(&format!("could not play sound: {err:?}"));
        }) as Box<dyn FnMut(JsValue)>);
    }

    pub fn play(sound: Sound, volume: f64) {
        let audio = match HtmlAudioElement::new_with_src(sound.url()) {
            Ok(a) => a,
            Err(e) => {
                crate::logging::warn(&format!("could not create audio for {sound:?}: {e:?}"));
                return;
            }
        };
        audio.set_volume((volume * sound.gain()).clamp(0.0, 1.0));
        match audio.play() {
            Ok(promise) => ON_REJECT.with(|on_reject| {
                let _ = promise.catch(on_reject);
            }),
            Err(e) => crate::logging::warn(&format!("error playing sound {sound:?}: {e:?}")),
        }
    }
}
