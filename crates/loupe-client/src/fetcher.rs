//! Cancellable source-context fetch.
//!
//! At most one `/source` request is ever in flight: starting a new one
//! aborts its predecessor, so the preview shown always matches the most
//! recent hover. A generation counter guards against a settled-but-stale
//! response applying after a newer request started.

use gloo::net::http::Request;
use wasm_bindgen_futures::spawn_local;
use web_sys::AbortController;

use loupe_core::SourceContext;

pub struct SourceContextFetcher {
    base_url: String,
    current: Option<AbortController>,
    generation: u64,
}

impl SourceContextFetcher {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            current: None,
            generation: 0,
        }
    }

    /// Aborts any in-flight request.
    pub fn cancel(&mut self) {
        if let Some(controller) = self.current.take() {
            controller.abort();
        }
    }

    /// True when `generation` is still the latest issued request.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Aborts the predecessor and reserves the next generation.
    fn begin(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    /// Starts a fetch for `file`/`line`. `on_done` receives the request's
    /// generation and the parsed context; a malformed or failed response
    /// is "no preview" (`None`), never an error.
    pub fn fetch(
        &mut self,
        file: &str,
        line: u32,
        on_done: impl FnOnce(u64, Option<SourceContext>) + 'static,
    ) {
        let generation = self.begin();
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(AbortController::signal);
        self.current = controller;

        let url = format!(
            "{}/source?file={}&line={}",
            self.base_url,
            urlencoding::encode(file),
            line
        );
        spawn_local(async move {
            let context = match Request::get(&url).abort_signal(signal.as_ref()).send().await {
                Ok(response) => response
                    .json::<Option<SourceContext>>()
                    .await
                    .ok()
                    .flatten(),
                // Aborted or unreachable; either way there is no preview.
                Err(_) => None,
            };
            on_done(generation, context);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_supersedes_predecessor() {
        let mut fetcher = SourceContextFetcher::new("http://localhost:5678".into());
        let first = fetcher.begin();
        let second = fetcher.begin();
        assert!(!fetcher.is_current(first));
        assert!(fetcher.is_current(second));
    }
}
