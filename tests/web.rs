// Browser tests (wasm-pack test --headless --firefox). Native `cargo test`
// compiles this file to nothing.
#![cfg(target_arch = "wasm32")]

use earthcare::audio::{self, Sound};
use earthcare::persist::{KeyValueStore, LocalStorage, Store};
use earthcare::{Action, CheckInChoice, GameConfig};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let key = "earthcareTestState";
    let cfg = GameConfig::default();
    let mut backend = LocalStorage::open().unwrap();
    backend.remove(key).unwrap();

    let mut store = Store::load(backend, key, 10);
    store.dispatch(Action::CheckIn(CheckInChoice::Skip), 1_000, &cfg).unwrap();

    let reloaded = Store::load(LocalStorage::open().unwrap(), key, 10);
    assert_eq!(reloaded.state().consecutive_misses, 1);

    store.dispatch(Action::ClearData, 2_000, &cfg).unwrap();
    assert!(LocalStorage::open().unwrap().get(key).unwrap().is_none());
}

#[wasm_bindgen_test]
fn app_mounts_into_the_page() {
    earthcare::start_app(Some(r#"{"storageKey":"earthcareMountTest","soundEnabled":false}"#.into())).unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc.get_element_by_id(earthcare::web::render::ROOT_ID).unwrap();
    assert!(root.inner_html().contains("data-action=\"go-check-in\""));
}

#[wasm_bindgen_test]
fn repeated_sounds_share_one_rejection_handler() {
    for _ in 0..200 {
        audio::play(Sound::Click, 0.0);
    }
}
