//! In-memory render target.

use patterns_env::RenderTarget;

/// Keeps the last content it received.
#[derive(Debug, Clone, Default)]
pub struct RenderBuffer {
    content: Option<String>,
    renders: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current content, if anything was rendered.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns how many times content was set.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl RenderTarget for RenderBuffer {
    fn set_content(&mut self, html: &str) {
        self.content = Some(html.to_string());
        self.renders += 1;
    }
}
