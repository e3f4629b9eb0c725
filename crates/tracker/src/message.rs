//! Human-readable portal messages.

use crate::{GeneralSettings, PortalId};

/// Tag prepended to entries into a portal already logged this session.
pub const REPEAT_TAG: &str = "(REPEAT)";

/// Message for walking into a portal.
///
/// Dimension and coordinates are included according to `settings`.
pub fn entry_message(portal: PortalId, repeat: bool, settings: &GeneralSettings) -> String {
    let mut message = String::new();
    if repeat {
        message.push_str(REPEAT_TAG);
        message.push(' ');
    }
    message.push_str("Portal entered");
    if settings.show_dimension {
        message.push_str(" in ");
        message.push_str(portal.dimension.display_name());
    }
    if settings.show_coordinates {
        message.push_str(" at ");
        message.push_str(&portal.pos.to_string());
    }
    message
}

/// Summary emitted after arriving in a different dimension.
pub fn teleport_message(from: PortalId, to: PortalId) -> String {
    format!(
        "Teleported from {} at {} to {} at {}",
        from.dimension, from.pos, to.dimension, to.pos
    )
}
