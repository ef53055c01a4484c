use std::time::Duration;

use async_trait::async_trait;
use builder_core::{
    AddBlockDialogState, BuilderCommand, PreviewRasterizer, Raster, ScreenshotError,
    ScreenshotSize, Timer,
};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use shared_types::{EVENT_CLOSE_ADD_BLOCK, EVENT_OPEN_ADD_BLOCK};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlIFrameElement};

#[wasm_bindgen]
extern "C" {
    /// html2canvas, loaded by the host page as a global script
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Browser timer backed by `setTimeout`
pub struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// Rasterizes the body of a same-origin preview iframe through html2canvas.
pub struct IframeRasterizer {
    iframe_id: String,
}

impl IframeRasterizer {
    pub fn new(iframe_id: impl Into<String>) -> Self {
        Self {
            iframe_id: iframe_id.into(),
        }
    }

    fn preview_body(&self) -> Result<HtmlElement, ScreenshotError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(ScreenshotError::NoPreviewFrame)?;
        let iframe = document
            .get_element_by_id(&self.iframe_id)
            .and_then(|el| el.dyn_into::<HtmlIFrameElement>().ok())
            .ok_or(ScreenshotError::NoPreviewFrame)?;
        iframe
            .content_document()
            .and_then(|doc| doc.body())
            .ok_or(ScreenshotError::NoRenderableBody)
    }
}

#[async_trait(?Send)]
impl PreviewRasterizer for IframeRasterizer {
    async fn rasterize(&self, size: ScreenshotSize) -> Result<Raster, ScreenshotError> {
        let body = self.preview_body()?;
        let options = html2canvas_options(size)?;

        let promise = html2canvas(&body, &options).map_err(js_error)?;
        let canvas = JsFuture::from(promise)
            .await
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ScreenshotError::Rasterize("html2canvas did not return a canvas".into()))?;

        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return Err(ScreenshotError::Rasterize("html2canvas produced an empty canvas".into()));
        }

        let context = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| ScreenshotError::Rasterize("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ScreenshotError::Rasterize("unexpected canvas context".into()))?;
        let image = context
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(js_error)?;

        Ok(Raster {
            width: image.width(),
            height: image.height(),
            rgba: image.data().0,
        })
    }
}

fn html2canvas_options(size: ScreenshotSize) -> Result<JsValue, ScreenshotError> {
    let options = js_sys::Object::new();
    let entries: [(&str, JsValue); 8] = [
        ("useCORS", JsValue::TRUE),
        ("allowTaint", JsValue::TRUE),
        ("backgroundColor", JsValue::NULL),
        ("width", JsValue::from(size.width)),
        ("height", JsValue::from(size.height)),
        ("windowWidth", JsValue::from(size.width)),
        ("windowHeight", JsValue::from(size.height)),
        ("logging", JsValue::FALSE),
    ];
    for (key, value) in entries {
        js_sys::Reflect::set(&options, &JsValue::from_str(key), &value).map_err(js_error)?;
    }
    Ok(options.into())
}

fn js_error(value: JsValue) -> ScreenshotError {
    ScreenshotError::Rasterize(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

/// Bridges hosts that dispatch `OPEN_ADD_BLOCK` / `CLOSE_ADD_BLOCK` as
/// `CustomEvent`s on `window` into the dialog signal.
pub fn listen_for_builder_events(dialog: Signal<AddBlockDialogState>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    for event_name in [EVENT_OPEN_ADD_BLOCK, EVENT_CLOSE_ADD_BLOCK] {
        let mut dialog = dialog;
        let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let payload = event
                .dyn_ref::<web_sys::CustomEvent>()
                .map(|e| e.detail())
                .filter(|detail| !detail.is_undefined() && !detail.is_null())
                .and_then(|detail| js_sys::JSON::stringify(&detail).ok())
                .map(String::from)
                .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok());

            match BuilderCommand::from_event(event_name, payload.as_ref()) {
                Ok(command) => dialog.write().apply(&command),
                Err(e) => {
                    dioxus_logger::tracing::warn!("Ignoring builder event {}: {}", event_name, e)
                }
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) =
            window.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
        {
            dioxus_logger::tracing::warn!("Failed to listen for {}: {:?}", event_name, e);
            continue;
        }

        // Keep listener alive for app lifetime.
        callback.forget();
    }
}
