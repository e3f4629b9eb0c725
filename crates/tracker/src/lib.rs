#![warn(missing_docs)]
//! Portal visit tracking: catalog, persistence, journal and ESP render pass.
//!
//! [`PortalTracker`] is the module a host drives. It watches the player each
//! tick for portal entry/exit transitions, keeps a [`PortalCatalog`] of every
//! portal seen, writes it through to disk via [`CatalogStore`] and draws
//! outlines over remembered portals each frame.

mod catalog;
mod host;
mod journal;
mod message;
mod module;
mod persist;
mod render;
mod settings;
mod tracker;

pub use catalog::*;
pub use host::*;
pub use journal::*;
pub use message::*;
pub use module::*;
pub use persist::*;
pub use render::*;
pub use settings::*;
pub use tracker::*;
