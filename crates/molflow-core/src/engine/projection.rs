use crate::core::models::element::element_info_or_default;
use crate::core::models::graph::MoleculeGraph;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry::{perpendicular_2d, view_rotation};
use crate::engine::config::ProjectionConfig;
use nalgebra::{Point3, Vector2};
use serde::Serialize;

/// Viewer orientation in degrees. Yaw turns about the vertical axis, pitch tilts about
/// the horizontal axis afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Camera {
    pub pitch: f64,
    pub yaw: f64,
}

impl Camera {
    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self { pitch, yaw }
    }

    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomMarker {
    pub atom_index: usize,
    pub view_x: f64,
    pub view_y: f64,
    /// Rotated `z'`; larger is farther from the viewer.
    pub depth: f64,
    pub depth_factor: f64,
    pub element: String,
    pub radius: f64,
    pub opacity: f64,
}

/// One drawn line of a bond. Double and triple bonds produce several segments that
/// share `bond_index` and differ in `offset_index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondSegment {
    pub bond_index: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub depth: f64,
    pub stroke_width: f64,
    pub offset_index: i8,
    pub order: BondOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderPrimitive {
    Atom(AtomMarker),
    Bond(BondSegment),
}

impl RenderPrimitive {
    /// Painter's-order key.
    pub fn depth(&self) -> f64 {
        match self {
            RenderPrimitive::Atom(marker) => marker.depth,
            RenderPrimitive::Bond(segment) => segment.depth,
        }
    }

    pub fn as_atom(&self) -> Option<&AtomMarker> {
        match self {
            RenderPrimitive::Atom(marker) => Some(marker),
            RenderPrimitive::Bond(_) => None,
        }
    }

    pub fn as_bond(&self) -> Option<&BondSegment> {
        match self {
            RenderPrimitive::Bond(segment) => Some(segment),
            RenderPrimitive::Atom(_) => None,
        }
    }
}

const SINGLE_OFFSETS: &[i8] = &[0];
const DOUBLE_OFFSETS: &[i8] = &[-1, 1];
const TRIPLE_OFFSETS: &[i8] = &[-1, 0, 1];

struct ProjectedAtom {
    view: Vector2<f64>,
    depth: f64,
    factor: f64,
}

/// Rotates, projects and depth-orders a normalized graph into 2D draw primitives.
///
/// The projector never re-embeds and never validates its angles; non-finite camera
/// input propagates into non-finite coordinates.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    config: ProjectionConfig,
}

impl Projector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Projects every atom and bond of `graph` as seen from `camera`.
    ///
    /// Primitives come back in ascending depth order (far to near in the rotated frame
    /// read as painter's order). The sort is stable and bonds are emitted before atoms,
    /// so a bond never hides an atom at the same depth.
    pub fn project(
        &self,
        graph: &MoleculeGraph,
        camera: &Camera,
        view_scale: f64,
    ) -> Vec<RenderPrimitive> {
        let rotation = view_rotation(camera.pitch, camera.yaw);
        let projected: Vec<ProjectedAtom> = graph
            .atoms()
            .iter()
            .map(|atom| self.project_point(&(rotation * atom.position), view_scale))
            .collect();

        let mut primitives = Vec::with_capacity(graph.atom_count() + 3 * graph.bond_count());

        for (bond_index, bond) in graph.bonds().iter().enumerate() {
            let a = &projected[bond.from];
            let b = &projected[bond.to];
            let factor = (a.factor + b.factor) / 2.0;
            let depth = (a.depth + b.depth) / 2.0;
            let normal = perpendicular_2d(&a.view, &b.view);

            let (offsets, spacing) = match bond.order {
                BondOrder::Single => (SINGLE_OFFSETS, 0.0),
                BondOrder::Double => (DOUBLE_OFFSETS, self.config.double_bond_offset),
                BondOrder::Triple => (TRIPLE_OFFSETS, self.config.triple_bond_offset),
            };
            for &offset_index in offsets {
                let shift = normal * (f64::from(offset_index) * spacing * factor);
                let start = a.view + shift;
                let end = b.view + shift;
                primitives.push(RenderPrimitive::Bond(BondSegment {
                    bond_index,
                    x1: start.x,
                    y1: start.y,
                    x2: end.x,
                    y2: end.y,
                    depth,
                    stroke_width: self.config.bond_width * factor,
                    offset_index,
                    order: bond.order,
                }));
            }
        }

        for (atom_index, (atom, p)) in graph.atoms().iter().zip(&projected).enumerate() {
            let info = element_info_or_default(&atom.element);
            primitives.push(RenderPrimitive::Atom(AtomMarker {
                atom_index,
                view_x: p.view.x,
                view_y: p.view.y,
                depth: p.depth,
                depth_factor: p.factor,
                element: atom.element.clone(),
                radius: self.config.atom_radius * info.radius_factor * p.factor,
                opacity: (0.55 + 0.35 * p.factor).clamp(0.0, 1.0),
            }));
        }

        primitives.sort_by(|a, b| a.depth().total_cmp(&b.depth()));
        primitives
    }

    fn project_point(&self, rotated: &Point3<f64>, view_scale: f64) -> ProjectedAtom {
        let d = self.config.perspective_distance;
        let factor = d / (d + rotated.z);
        ProjectedAtom {
            view: Vector2::new(
                self.config.center_x + rotated.x * view_scale * factor,
                self.config.center_y - rotated.y * view_scale * factor,
            ),
            depth: rotated.z,
            factor,
        }
    }
}

/// Projects `graph` with the default projector (view centre at the origin).
pub fn project(
    graph: &MoleculeGraph,
    pitch_deg: f64,
    yaw_deg: f64,
    view_scale: f64,
) -> Vec<RenderPrimitive> {
    Projector::default().project(graph, &Camera::new(pitch_deg, yaw_deg), view_scale)
}
