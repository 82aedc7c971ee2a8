use std::rc::Rc;
use std::sync::OnceLock;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlLinkElement};

use super::page::WebPage;
use super::ports::{ElmPorts, ElmSubscription};
use crate::bridge::{Listening, PixelBridge};
use crate::config::BridgeConfig;
use crate::error::{describe_js, BridgeError, Result};

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

/// Install the console logger. The logger can only be installed once, so the
/// first call fixes the level; later calls return that level unchanged.
pub fn init_logging(level: log::Level) -> log::Level {
    *LOG_LEVEL.get_or_init(|| {
        wasm_logger::init(wasm_logger::Config::new(level));
        level
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Add `<link rel="stylesheet" href=..>` to `<head>`. Returns false when the
/// page already links the same sheet.
pub fn attach_stylesheet(document: &Document, href: &str) -> Result<bool> {
    let links = document.get_elements_by_tag_name("link");
    for i in 0..links.length() {
        if let Some(link) = links.item(i).and_then(|e| e.dyn_into::<HtmlLinkElement>().ok()) {
            if link.rel() == "stylesheet" && link.get_attribute("href").as_deref() == Some(href) {
                return Ok(false);
            }
        }
    }

    let head = document
        .head()
        .ok_or_else(|| BridgeError::Host("document has no <head>".into()))?;
    let link = document
        .create_element("link")
        .map_err(|e| BridgeError::Host(describe_js(&e)))?
        .dyn_into::<HtmlLinkElement>()
        .map_err(|_| BridgeError::Host("created element is not a <link>".into()))?;
    link.set_rel("stylesheet");
    link.set_href(href);
    head.append_child(&link)
        .map_err(|e| BridgeError::Host(describe_js(&e)))?;
    Ok(true)
}

fn module_fn(module: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(module, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

/// Mount the application module into `container` and return its instance.
/// Supports both `module.embed(node)` and `module.init({ node })`.
pub fn mount(module: &JsValue, container: &Element) -> Result<JsValue> {
    if let Some(embed) = module_fn(module, "embed") {
        return embed
            .call1(module, container)
            .map_err(|e| BridgeError::Host(format!("embed failed: {}", describe_js(&e))));
    }

    let init = module_fn(module, "init").ok_or_else(|| {
        BridgeError::Host("application module has neither `embed` nor `init`".into())
    })?;
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("node"), container)
        .map_err(|e| BridgeError::Host(describe_js(&e)))?;
    init.call1(module, &options)
        .map_err(|e| BridgeError::Host(format!("init failed: {}", describe_js(&e))))
}

/// The mounted application plus the bridge answering its pixel requests
#[wasm_bindgen]
pub struct BridgeHandle {
    app: JsValue,
    listening: Option<Listening<ElmSubscription>>,
}

#[wasm_bindgen]
impl BridgeHandle {
    /// The embedded application instance
    #[wasm_bindgen(getter)]
    pub fn app(&self) -> JsValue {
        self.app.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.listening.is_some()
    }

    /// Unsubscribe from both request ports
    pub fn detach(&mut self) {
        if self.listening.take().is_some() {
            log::info!("pixel bridge detached");
        }
    }
}

/// Attach styling, mount the application and start answering its pixel
/// requests.
#[wasm_bindgen]
pub fn boot(module: JsValue, config: JsValue) -> std::result::Result<BridgeHandle, JsValue> {
    let config = BridgeConfig::from_js(&config)?;
    let requested = config.level()?;
    let level = init_logging(requested);
    if level != requested {
        log::warn!("logger already running at {}, ignoring log_level {}", level, requested);
    }

    let page = WebPage::current()?;
    let document = page.document().clone();

    if let Some(href) = &config.stylesheet {
        if attach_stylesheet(&document, href)? {
            log::debug!("attached stylesheet {}", href);
        }
    }

    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or_else(|| BridgeError::ElementNotFound {
            selector: format!("#{}", config.container_id),
        })?;
    let app = mount(&module, &container)?;
    log::info!("application mounted into #{}", config.container_id);

    let ports = Rc::new(ElmPorts::from_app(&app)?);
    let listening = PixelBridge::new(page, ports, &config).listen()?;

    Ok(BridgeHandle {
        app,
        listening: Some(listening),
    })
}
