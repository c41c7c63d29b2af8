//! WASM bindings for the RuleCheck compliance form
//!
//! Form state lives in Rust (`rulecheck_core::Controller`); JavaScript only
//! forwards DOM events and paints the JSON view it gets back.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { RuleCheckApp } from './pkg/rulecheck_wasm.js';
//!
//! await init();
//!
//! const app = new RuleCheckApp();            // or new RuleCheckApp("https://checker.example.com")
//! app.checkHealth().then(render);            // fire-and-forget at startup
//!
//! input.onchange = (e) => app.selectFile(e.target.files[0]).then(render);
//! zone.ondragover = (e) => { e.preventDefault(); app.dragOver(); render(); };
//! zone.ondragleave = (e) => { e.preventDefault(); app.dragLeave(); render(); };
//! zone.ondrop = (e) => { e.preventDefault(); app.dropFiles(e.dataTransfer.files).then(render); };
//! ruleInput.oninput = (e) => { app.setRule(0, e.target.value); render(); };
//! submit.onclick = () => { const p = app.submit(); render(); p.then(render); };
//! reset.onclick = () => { app.reset(); render(); };
//!
//! function render() {
//!   const view = JSON.parse(app.getViewJson());
//!   results.innerHTML = app.renderResultsHtml();
//!   // ...
//! }
//! ```

pub mod app;
pub mod fetch_api;
pub mod html;

use wasm_bindgen::prelude::*;

pub use app::RuleCheckApp;
pub use fetch_api::FetchApi;
pub use html::{escape_html, render_results_html};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"RuleCheck WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
