use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use super::js_error_message;
use crate::dom::Fetcher;
use crate::error::LoaderError;

/// Plain GET through `window.fetch`, relying on the browser's own timeout.
#[derive(Clone)]
pub struct WindowFetcher {
    window: Window,
}

impl WindowFetcher {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Fetcher for WindowFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, LoaderError> {
        let transport = |message: String| LoaderError::Transport {
            url: url.to_string(),
            message,
        };

        let value = JsFuture::from(self.window.fetch_with_str(url))
            .await
            .map_err(|e| transport(js_error_message(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| transport("fetch did not return a Response".to_string()))?;

        if !response.ok() {
            return Err(LoaderError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response
            .text()
            .map_err(|e| transport(js_error_message(&e)))?;
        let text = JsFuture::from(body)
            .await
            .map_err(|e| transport(js_error_message(&e)))?;

        text.as_string()
            .ok_or_else(|| transport("response body is not text".to_string()))
    }
}
