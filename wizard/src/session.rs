use tracing::{debug, warn};

use crate::{
    exchange::{decode_request, encode_response, ExchangeError, Request, Response},
    page::{
        analysis::analyze,
        document::PageMut,
        highlight::{HighlightEngine, HighlightState, HighlightStyle, HighlightTarget},
    },
};

/// One page and the highlight overlay living on it.
///
/// Requests are handled synchronously, one at a time. The engine is the only
/// thing that writes to the page.
pub struct ContentSession<P: PageMut> {
    page: P,
    engine: HighlightEngine<P::Node>,
    style: HighlightStyle,
}

impl<P: PageMut> ContentSession<P> {
    pub fn new(page: P) -> Self {
        Self {
            page,
            engine: HighlightEngine::new(),
            style: HighlightStyle::default(),
        }
    }

    /// Base style for highlights; a request's own color still wins.
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn state(&self) -> &HighlightState {
        self.engine.state()
    }

    pub fn highlighted_count(&self) -> usize {
        self.engine.highlighted_count()
    }

    pub fn into_page(self) -> P {
        self.page
    }

    pub fn handle(&mut self, request: Request) -> Option<Response> {
        match request {
            Request::Analyze => Some(match analyze(&self.page) {
                Ok(report) => Response::Report(report),
                Err(err) => {
                    warn!("Analysis failed: {}", err);
                    Response::Failure {
                        error: err.to_string(),
                    }
                }
            }),
            Request::HighlightColor {
                color,
                highlight_color,
            } => {
                self.highlight(HighlightTarget::Color(color), highlight_color.as_deref());
                None
            }
            Request::HighlightFont {
                font,
                highlight_color,
            } => {
                self.highlight(HighlightTarget::Font(font), highlight_color.as_deref());
                None
            }
            Request::RemoveHighlight => {
                self.engine.remove(&mut self.page);
                None
            }
            Request::Unsupported => {
                debug!("Ignoring unsupported request");
                None
            }
        }
    }

    /// Decode, handle, encode. `Ok(None)` means there is nothing to reply.
    pub fn handle_json(&mut self, message: &str) -> Result<Option<String>, ExchangeError> {
        let request = decode_request(message)?;
        self.handle(request)
            .map(|response| encode_response(&response))
            .transpose()
    }

    pub fn on_navigation(&mut self) {
        self.engine.on_navigation(&mut self.page);
    }

    fn highlight(&mut self, target: HighlightTarget, color: Option<&str>) {
        let style = self.style.clone().with_color(color);
        if let Err(err) = self.engine.apply(&mut self.page, target, &style) {
            warn!("Highlight failed: {}", err);
        }
    }
}
