//! Content script side of the probe
//!
//! Wraps a [`ContentSession`] over the live DOM and exposes it to the
//! extension's JavaScript glue:
//!
//! ```js
//! const script = new ContentScript("#FFFF00");
//! script.watchNavigation();
//! chrome.runtime.onMessage.addListener((message, _sender, sendResponse) => {
//!   const reply = script.handleMessage(JSON.stringify(message));
//!   if (reply !== undefined) sendResponse(JSON.parse(reply));
//! });
//! ```

pub mod console;
pub mod dom;

use std::{cell::RefCell, rc::Rc};

use tracing::{info, warn, Level};
use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::Event;
use wizard::{page::highlight::HighlightStyle, ContentSession};

use crate::dom::DomPage;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(Level::INFO);
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub struct ContentScript {
    session: Rc<RefCell<ContentSession<DomPage>>>,
}

#[wasm_bindgen]
impl ContentScript {
    /// `highlight_color` is the default for requests that carry none.
    #[wasm_bindgen(constructor)]
    pub fn new(highlight_color: Option<String>) -> Result<ContentScript, JsValue> {
        let page = DomPage::current().map_err(to_js_error)?;
        let style = HighlightStyle::default().with_color(highlight_color.as_deref());
        Ok(ContentScript {
            session: Rc::new(RefCell::new(ContentSession::new(page).with_style(style))),
        })
    }

    /// Handle one JSON request. Returns the JSON reply, if the request has one.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, message: &str) -> Result<Option<String>, JsValue> {
        self.session
            .borrow_mut()
            .handle_json(message)
            .map_err(to_js_error)
    }

    /// Drop the active highlight before the page unloads or navigates.
    #[wasm_bindgen(js_name = watchNavigation)]
    pub fn watch_navigation(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js_error("no window"))?;

        for event_name in ["pagehide", "beforeunload"] {
            let session = Rc::clone(&self.session);
            let on_leave = Closure::wrap(Box::new(move |_event: Event| {
                match session.try_borrow_mut() {
                    Ok(mut session) => session.on_navigation(),
                    Err(_) => warn!("Session busy during navigation, highlight left in place"),
                }
            }) as Box<dyn FnMut(_)>);

            window.add_event_listener_with_callback(event_name, on_leave.as_ref().unchecked_ref())?;
            on_leave.forget();
        }
        info!("Watching navigation to reset highlights");
        Ok(())
    }
}
