//! The drawing surface collaborator.
//!
//! In the host environment this is the CAD document's transactional model;
//! here it is a trait with the two operations the session relies on. Both
//! are assumed atomic at the granularity of one advance — the session is
//! single-threaded and synchronous, so the in-memory reference surface
//! satisfies that trivially.

use outline::Polyline;
use serde::Serialize;

/// Opaque reference to a polyline previously appended to a surface.
///
/// Handles are invalidated in bulk by [`DrawingSurface::clear_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Handle(u64);

/// External owner of persistent drawing state.
pub trait DrawingSurface {
    /// Atomically remove every primitive previously appended by this
    /// session.
    fn clear_all(&mut self);

    /// Append one polyline and return an opaque handle to it.
    fn append_polyline(&mut self, polyline: Polyline) -> Handle;
}

/// Reference surface backed by an ordered in-memory store.
///
/// Used by the CLI and by tests as a stand-in for a host document; the
/// polylines exist only for as long as the surface does.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    entries: Vec<(Handle, Polyline)>,
    next_handle: u64,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.entries.iter().map(|(_, polyline)| polyline)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.iter().any(|(h, _)| *h == handle)
    }

    /// Clone the currently resident polyline generation.
    pub fn snapshot(&self) -> Vec<Polyline> {
        self.polylines().cloned().collect()
    }
}

impl DrawingSurface for InMemorySurface {
    fn clear_all(&mut self) {
        self.entries.clear();
    }

    fn append_polyline(&mut self, polyline: Polyline) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, polyline));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outline::{Contour, ContourKind};

    fn polyline() -> Polyline {
        Polyline::from_contour(&Contour {
            points: vec![[0, 0], [5, 0], [5, 5]],
            kind: ContourKind::Outer,
            parent: None,
        })
    }

    #[test]
    fn handles_are_unique_across_clears() {
        let mut surface = InMemorySurface::new();
        let first = surface.append_polyline(polyline());
        surface.clear_all();
        let second = surface.append_polyline(polyline());
        assert_ne!(first, second);
        assert!(!surface.contains(first));
        assert!(surface.contains(second));
    }

    #[test]
    fn clear_all_removes_everything() {
        let mut surface = InMemorySurface::new();
        surface.append_polyline(polyline());
        surface.append_polyline(polyline());
        assert_eq!(surface.len(), 2);
        surface.clear_all();
        assert!(surface.is_empty());
    }

    #[test]
    fn snapshot_preserves_draw_order() {
        let mut surface = InMemorySurface::new();
        let mut short = polyline();
        short.vertices.truncate(2);
        surface.append_polyline(short.clone());
        surface.append_polyline(polyline());
        let snapshot = surface.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], short);
    }
}
