//! Console logging. Browser builds write to the devtools console; native
//! builds (tests, tooling) write to stderr.

#[cfg(target_arch = "wasm32")]
mod sink {
    use wasm_bindgen::JsValue;

    pub fn info(msg: &str) {
        web_sys::console::log_1(&JsValue::from_str(msg));
    }
    pub fn warn(msg: &str) {
        web_sys::console::warn_1(&JsValue::from_str(msg));
    }
    pub fn error(msg: &str) {
        web_sys::console::error_1(&JsValue::from_str(msg));
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod sink {
    pub fn info(msg: &str) {
        eprintln!("[earthcare] {msg}");
    }
    pub fn warn(msg: &str) {
        eprintln!("[earthcare] WARN {msg}");
    }
    pub fn error(msg: &str) {
        eprintln!("[earthcare] ERROR {msg}");
    }
}

pub fn info(msg: &str) {
    sink::info(msg);
}

pub fn warn(msg: &str) {
    sink::warn(msg);
}

pub fn error(msg: &str) {
    sink::error(msg);
}
