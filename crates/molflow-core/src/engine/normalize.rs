use crate::core::models::graph::MoleculeGraph;
use crate::core::utils::geometry::BoundingBox;
use tracing::trace;

/// Length of the longest bounding-box axis after normalization.
pub const TARGET_EXTENT: f64 = 2.0;

/// Axis-aligned bounding box of every atom, or `None` for an empty graph.
pub fn bounding_box(graph: &MoleculeGraph) -> Option<BoundingBox> {
    BoundingBox::of_graph(graph)
}

/// Centres `graph` on the origin and scales it uniformly so its longest axis spans
/// exactly [`TARGET_EXTENT`]. A graph whose atoms all coincide is only translated.
pub fn normalize(graph: &mut MoleculeGraph) {
    let Some(bb) = bounding_box(graph) else {
        return;
    };
    let max_extent = bb.max_extent();
    let scale = if max_extent > 0.0 {
        TARGET_EXTENT / max_extent
    } else {
        1.0
    };
    let center = bb.center().coords;
    for atom in graph.atoms_mut() {
        atom.position = (atom.position - center) * scale;
    }
    trace!(scale, "Normalized layout.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::notation::parse;
    use crate::engine::embedding::embed;
    use nalgebra::Point3;

    const EPS: f64 = 1e-9;

    #[test]
    fn normalized_box_is_centred_with_unit_half_extent() {
        let mut graph = parse("CC(=O)OC1=CC=CC=C1C(=O)O");
        embed(&mut graph);
        normalize(&mut graph);

        let bb = bounding_box(&graph).unwrap();
        assert!((bb.max_extent() - 2.0).abs() < EPS);
        assert!(bb.center().coords.norm() < EPS);
    }

    #[test]
    fn scaling_is_uniform() {
        let mut graph = MoleculeGraph::new();
        graph.add_atom(Atom::with_position("C", Point3::new(0.0, 0.0, 0.0)));
        graph.add_atom(Atom::with_position("C", Point3::new(10.0, 4.0, 2.0)));
        normalize(&mut graph);

        assert!((graph.atoms()[0].position - Point3::new(-1.0, -0.4, -0.2)).norm() < EPS);
        assert!((graph.atoms()[1].position - Point3::new(1.0, 0.4, 0.2)).norm() < EPS);
    }

    #[test]
    fn single_atom_moves_to_the_origin_without_scaling() {
        let mut graph = MoleculeGraph::new();
        graph.add_atom(Atom::with_position("O", Point3::new(3.0, -2.0, 7.0)));
        normalize(&mut graph);
        assert_eq!(graph.atoms()[0].position, Point3::origin());
    }

    #[test]
    fn empty_graph_is_left_unchanged() {
        let mut graph = MoleculeGraph::new();
        normalize(&mut graph);
        assert!(graph.is_empty());
        assert!(bounding_box(&graph).is_none());
    }
}
