//! Terminal rendering of bus events.

use nu_ansi_term::{Color, Style};
use std::io::Write;

use crate::events::{BusError, EventReceiver, PageEvent, ToastKind};

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub info: Style,
    pub success: Style,
    pub error: Style,
    pub dim: Style,
    /// Emit ANSI escapes. Off when writing to a file or a test buffer.
    pub colored: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            info: Style::new().fg(Color::Cyan),
            success: Style::new().fg(Color::Green),
            error: Style::new().fg(Color::Red).bold(),
            dim: Style::new().dimmed(),
            colored: true,
        }
    }
}

impl RenderStyle {
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Writes toasts and counter updates to a terminal stream.
pub struct TerminalRenderer {
    style: RenderStyle,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_style(RenderStyle::default())
    }

    pub fn with_style(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Render one event as a single line.
    pub fn render(&self, out: &mut impl Write, event: &PageEvent) -> std::io::Result<()> {
        let line = match event {
            PageEvent::ShowToast(toast) => {
                let (prefix, style) = match toast.kind {
                    ToastKind::Info => ("•", self.style.info),
                    ToastKind::Success => ("✓", self.style.success),
                    ToastKind::Error => ("✗", self.style.error),
                };
                self.style.paint(style, &format!("{prefix} {}", toast.message))
            }
            PageEvent::UpdateCartCount(c) => self.counter("cart", c.count),
            PageEvent::UpdateWishlistCount(c) => self.counter("wishlist", c.count),
            PageEvent::UpdateComparisonCount(c) => self.counter("comparison", c.count),
            PageEvent::FilterNavigate(nav) => {
                self.style.paint(self.style.dim, &format!("→ {}", nav.url))
            }
        };
        writeln!(out, "{line}")
    }

    fn counter(&self, label: &str, count: u64) -> String {
        self.style.paint(self.style.dim, &format!("[{label}: {count}]"))
    }

    /// Render every event already waiting on `receiver`. Returns how many
    /// were written.
    pub fn drain(&self, out: &mut impl Write, receiver: &mut EventReceiver) -> std::io::Result<usize> {
        let mut rendered = 0;
        loop {
            match receiver.try_recv() {
                Ok(Some(event)) => {
                    self.render(out, &event)?;
                    rendered += 1;
                }
                Ok(None) | Err(BusError::Closed) => return Ok(rendered),
                Err(BusError::Lagged(n)) => {
                    tracing::warn!("Renderer skipped {} events", n);
                }
            }
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CountPayload;

    fn render(event: &PageEvent) -> String {
        let mut out = Vec::new();
        TerminalRenderer::with_style(RenderStyle::plain())
            .render(&mut out, event)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_toasts() {
        assert_eq!(render(&PageEvent::success("Added")), "✓ Added\n");
        assert_eq!(render(&PageEvent::error("Nope")), "✗ Nope\n");
    }

    #[test]
    fn test_render_counter() {
        let event = PageEvent::UpdateCartCount(CountPayload { count: 3 });
        assert_eq!(render(&event), "[cart: 3]\n");
    }

    #[test]
    fn test_drain_renders_tapped_events_in_order() {
        let bus = crate::events::EventBus::new();
        let mut tap = bus.tap();
        bus.emit(PageEvent::success("Added to cart"));
        bus.emit(PageEvent::UpdateCartCount(CountPayload { count: 2 }));

        let mut out = Vec::new();
        let rendered = TerminalRenderer::with_style(RenderStyle::plain())
            .drain(&mut out, &mut tap)
            .unwrap();

        assert_eq!(rendered, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "✓ Added to cart\n[cart: 2]\n");
    }

    #[test]
    fn test_colored_output_contains_escape() {
        let mut out = Vec::new();
        TerminalRenderer::new()
            .render(&mut out, &PageEvent::error("Nope"))
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\u{1b}["));
    }
}
