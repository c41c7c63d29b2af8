//! The form session exported to JavaScript
//!
//! The controller sits in `Rc<RefCell<_>>` so async exports can update it
//! once their fetch resolves. Borrows are always released before an await.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Promise, Uint8Array};
use rulecheck_core::{
    ClientConfig, Controller, FileMeta, FormView, Phase, RuleSlot, SelectedFile, ValidationApi,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{File, FileList};

use crate::fetch_api::FetchApi;
use crate::html::render_results_html;

#[wasm_bindgen]
pub struct RuleCheckApp {
    controller: Rc<RefCell<Controller>>,
    api: Rc<FetchApi>,
}

/// Screen, read and offer a browser file. Resolves to whether it was accepted.
async fn offer_browser_file(controller: &RefCell<Controller>, file: File) -> Result<bool, JsValue> {
    let meta = FileMeta::new(file.name(), file.size() as u64, file.type_());

    // Screen on metadata first so a rejected 500 MB file is never read
    let resets = {
        let mut state = controller.borrow_mut();
        if state.screen_file(&meta).is_err() {
            return Ok(false);
        }
        state.reset_count()
    };

    let buffer = JsFuture::from(file.array_buffer()).await?;
    let contents = Uint8Array::new(&buffer).to_vec();

    // A reset during the read wins over the file
    let offered = controller
        .borrow_mut()
        .offer_file_if(resets, SelectedFile::new(meta, contents));
    Ok(offered.unwrap_or(false))
}

#[wasm_bindgen]
impl RuleCheckApp {
    /// Create a session talking to `api_base` (defaults to `http://localhost:5000`)
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>) -> Result<RuleCheckApp, JsValue> {
        let config = match api_base {
            Some(base) => ClientConfig::new(&base).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ClientConfig::default(),
        };

        Ok(Self {
            controller: Rc::new(RefCell::new(Controller::new())),
            api: Rc::new(FetchApi::new(config)),
        })
    }

    /// One-shot health check; resolves to the online flag
    #[wasm_bindgen(js_name = checkHealth)]
    pub fn check_health(&self) -> Promise {
        let controller = Rc::clone(&self.controller);
        let api = Rc::clone(&self.api);

        future_to_promise(async move {
            let online = api.check_health().await;
            controller.borrow_mut().set_server_online(online);
            Ok(JsValue::from_bool(online))
        })
    }

    /// File picked through the hidden `<input type="file">`
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file: Option<File>) -> Promise {
        let controller = Rc::clone(&self.controller);

        future_to_promise(async move {
            let accepted = match file {
                Some(file) => offer_browser_file(&controller, file).await?,
                None => false,
            };
            Ok(JsValue::from_bool(accepted))
        })
    }

    #[wasm_bindgen(js_name = dragOver)]
    pub fn drag_over(&self) {
        self.controller.borrow_mut().drag_over();
    }

    #[wasm_bindgen(js_name = dragLeave)]
    pub fn drag_leave(&self) {
        self.controller.borrow_mut().drag_leave();
    }

    /// Files dropped on the upload area; only the first one is considered
    #[wasm_bindgen(js_name = dropFiles)]
    pub fn drop_files(&self, files: Option<FileList>) -> Promise {
        self.controller.borrow_mut().drop_received();
        self.select_file(files.and_then(|list| list.get(0)))
    }

    /// Update rule `index` (0, 1 or 2)
    #[wasm_bindgen(js_name = setRule)]
    pub fn set_rule(&self, index: usize, text: &str) -> Result<(), JsValue> {
        let slot = RuleSlot::from_index(index)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid rule index: {}", index)))?;
        self.controller.borrow_mut().set_rule(slot, text);
        Ok(())
    }

    /// Submit the form. The phase switches to `submitting` before the
    /// returned promise is created; it resolves to whether results are shown.
    #[wasm_bindgen]
    pub fn submit(&self) -> Promise {
        let controller = Rc::clone(&self.controller);
        let api = Rc::clone(&self.api);
        let started = controller.borrow_mut().begin_submission();

        future_to_promise(async move {
            let ticket = match started {
                Ok(ticket) => ticket,
                Err(err) => {
                    web_sys::console::log_1(&format!("Submission blocked: {}", err).into());
                    return Ok(JsValue::from_bool(false));
                }
            };

            let outcome = api.validate(ticket.file(), ticket.rules()).await;
            let mut state = controller.borrow_mut();
            state.finish_submission(ticket, outcome);
            Ok(JsValue::from_bool(state.phase() == Phase::ShowingResults))
        })
    }

    #[wasm_bindgen]
    pub fn reset(&self) {
        self.controller.borrow_mut().reset();
    }

    #[wasm_bindgen(js_name = canSubmit)]
    pub fn can_submit(&self) -> bool {
        self.controller.borrow().can_submit()
    }

    /// Full form snapshot as JSON (see `rulecheck_core::FormView`)
    #[wasm_bindgen(js_name = getViewJson)]
    pub fn get_view_json(&self) -> Result<String, JsValue> {
        let view = FormView::from_controller(&self.controller.borrow());
        serde_json::to_string(&view)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize view: {}", e)))
    }

    /// Results panel markup, empty when there is nothing to show
    #[wasm_bindgen(js_name = renderResultsHtml)]
    pub fn render_results_html(&self) -> String {
        FormView::from_controller(&self.controller.borrow())
            .results
            .as_ref()
            .map(render_results_html)
            .unwrap_or_default()
    }
}
