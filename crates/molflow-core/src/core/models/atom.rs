use super::element::{DEFAULT_ELEMENT, ElementInfo, element_info};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Represents an atom of a molecule graph: its element symbol and its 3D position.
///
/// Atoms created by the parser sit at the origin until the embedding engine assigns
/// coordinates. The serialized form is the flat `{ element, x, y, z }` record consumed
/// by downstream viewers and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AtomRecord", into = "AtomRecord")]
pub struct Atom {
    /// The element symbol (e.g., "C", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom in layout units.
    pub position: Point3<f64>,
}

#[derive(Serialize, Deserialize)]
struct AtomRecord {
    element: String,
    x: f64,
    y: f64,
    z: f64,
}

impl Atom {
    /// Creates a new `Atom` at the origin.
    ///
    /// An empty symbol falls back to Carbon, matching the parser's treatment of
    /// unrecognised atoms.
    pub fn new(element: &str) -> Self {
        Self::with_position(element, Point3::origin())
    }

    /// Creates a new `Atom` at the given position.
    pub fn with_position(element: &str, position: Point3<f64>) -> Self {
        let element = if element.is_empty() {
            DEFAULT_ELEMENT
        } else {
            element
        };
        Self {
            element: element.to_string(),
            position,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Looks up the static element data for this atom's symbol.
    ///
    /// Returns `None` for symbols missing from the element table; renderers fall back
    /// to Carbon styling in that case.
    pub fn info(&self) -> Option<&'static ElementInfo> {
        element_info(&self.element)
    }
}

impl From<AtomRecord> for Atom {
    fn from(r: AtomRecord) -> Self {
        Atom::with_position(&r.element, Point3::new(r.x, r.y, r.z))
    }
}

impl From<Atom> for AtomRecord {
    fn from(a: Atom) -> Self {
        Self {
            element: a.element,
            x: a.position.x,
            y: a.position.y,
            z: a.position.z,
        }
    }
}
