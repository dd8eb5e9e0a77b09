//! Render target abstraction.

/// Destination for pre-rendered content (an HTML container in a browser, a
/// buffer in tests).
///
/// The harness only forwards strings here; it never parses or validates them.
pub trait RenderTarget {
    /// Replaces the target's content.
    fn set_content(&mut self, html: &str);
}

/// Render target that drops everything it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardTarget;

impl RenderTarget for DiscardTarget {
    fn set_content(&mut self, _html: &str) {}
}
