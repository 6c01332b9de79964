use crate::core::models::graph::MoleculeGraph;
use crate::engine::projection::{AtomMarker, BondSegment, Camera, Projector, RenderPrimitive};
use tracing::trace;

/// A drawing surface that consumes depth-ordered primitives.
///
/// [`render_frame`] calls `begin_frame` once, then `draw_bond`/`draw_atom` in painter's
/// order, then `end_frame`. Implementations decide what drawing means: recording,
/// writing vector markup, or forwarding to a canvas.
pub trait RenderPort {
    fn begin_frame(&mut self, _camera: &Camera, _primitive_count: usize) {}

    fn draw_bond(&mut self, segment: &BondSegment);

    fn draw_atom(&mut self, marker: &AtomMarker);

    fn end_frame(&mut self) {}
}

/// Projects `graph` and replays the primitives into `port`. Returns how many
/// primitives were drawn.
pub fn render_frame<P: RenderPort + ?Sized>(
    graph: &MoleculeGraph,
    camera: &Camera,
    projector: &Projector,
    view_scale: f64,
    port: &mut P,
) -> usize {
    let primitives = projector.project(graph, camera, view_scale);
    draw_primitives(&primitives, camera, port);
    trace!(primitives = primitives.len(), "Frame rendered.");
    primitives.len()
}

pub(crate) fn draw_primitives<P: RenderPort + ?Sized>(
    primitives: &[RenderPrimitive],
    camera: &Camera,
    port: &mut P,
) {
    port.begin_frame(camera, primitives.len());
    for primitive in primitives {
        match primitive {
            RenderPrimitive::Bond(segment) => port.draw_bond(segment),
            RenderPrimitive::Atom(marker) => port.draw_atom(marker),
        }
    }
    port.end_frame();
}

/// In-memory port that keeps the primitives of the last frame.
#[derive(Debug, Default, Clone)]
pub struct PrimitiveRecorder {
    primitives: Vec<RenderPrimitive>,
    frames: usize,
}

impl PrimitiveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[RenderPrimitive] {
        &self.primitives
    }

    /// Number of frames started so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_primitives(self) -> Vec<RenderPrimitive> {
        self.primitives
    }
}

impl RenderPort for PrimitiveRecorder {
    fn begin_frame(&mut self, _camera: &Camera, primitive_count: usize) {
        self.primitives.clear();
        self.primitives.reserve(primitive_count);
        self.frames += 1;
    }

    fn draw_bond(&mut self, segment: &BondSegment) {
        self.primitives.push(RenderPrimitive::Bond(segment.clone()));
    }

    fn draw_atom(&mut self, marker: &AtomMarker) {
        self.primitives.push(RenderPrimitive::Atom(marker.clone()));
    }
}
