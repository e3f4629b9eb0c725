use portal_logger_core::Aabb;
use portal_logger_tracker::{BoxRenderer, Notifier, Rgba, ShapeMode};

/// One message sent to a [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Status message.
    Info(String),
    /// Error report.
    Error(String),
    /// Chat line.
    Chat {
        /// Prefix tag.
        prefix: String,
        /// Message text.
        message: String,
    },
}

/// Notifier that keeps everything it is sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    /// Notices in arrival order.
    pub notices: Vec<Notice>,
}

impl RecordingNotifier {
    /// Chat message texts, in order.
    pub fn chats(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Chat { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Error texts, in order.
    pub fn errors(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Info texts, in order.
    pub fn infos(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Info(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&mut self, message: &str) {
        self.notices.push(Notice::Info(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.notices.push(Notice::Error(message.to_string()));
    }

    fn chat(&mut self, prefix: &str, message: &str) {
        self.notices.push(Notice::Chat {
            prefix: prefix.to_string(),
            message: message.to_string(),
        });
    }
}

/// One box handed to a [`RecordingRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// World-space box.
    pub aabb: Aabb,
    /// Fill color.
    pub side: Rgba,
    /// Edge color.
    pub line: Rgba,
    /// Outline style.
    pub mode: ShapeMode,
}

/// Renderer that keeps every draw call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Draw calls in order.
    pub calls: Vec<DrawCall>,
}

impl BoxRenderer for RecordingRenderer {
    fn draw_box(&mut self, aabb: Aabb, side: Rgba, line: Rgba, mode: ShapeMode) {
        self.calls.push(DrawCall {
            aabb,
            side,
            line,
            mode,
        });
    }
}
