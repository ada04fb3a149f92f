//! Render collaborator boundary
//!
//! Rendering is a pure consumer: it receives the frame's [`Snapshot`] and
//! never feeds anything back into the simulation except through input events.
//! Visual skins implement [`Renderer`]; the core only ever sees the trait.

use crate::sim::Snapshot;

/// Render collaborator capability
pub trait Renderer {
    /// Called once per displayed frame with the latest snapshot
    fn render(&mut self, snapshot: &Snapshot);
}

/// Renderer that draws nothing; the default for headless use and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &Snapshot) {}
}
