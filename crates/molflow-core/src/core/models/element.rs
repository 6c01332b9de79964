use phf::{Map, Set, phf_map, phf_set};

/// Symbol used for atoms whose element cannot be recognised.
pub const DEFAULT_ELEMENT: &str = "C";

/// Static display data for a chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    /// CPK colour as an `#rrggbb` hex string.
    pub color: &'static str,
    /// Marker radius relative to Carbon.
    pub radius_factor: f64,
}

macro_rules! element {
    ($symbol:literal, $name:literal, $color:literal, $radius:literal) => {
        ElementInfo {
            symbol: $symbol,
            name: $name,
            color: $color,
            radius_factor: $radius,
        }
    };
}

const CARBON: ElementInfo = element!("C", "Carbon", "#909090", 1.0);

static ELEMENTS: Map<&'static str, ElementInfo> = phf_map! {
    "H" => element!("H", "Hydrogen", "#ffffff", 0.65),
    "He" => element!("He", "Helium", "#d9ffff", 0.7),
    "Li" => element!("Li", "Lithium", "#cc80ff", 1.1),
    "Be" => element!("Be", "Beryllium", "#c2ff00", 1.0),
    "B" => element!("B", "Boron", "#ffb5b5", 0.95),
    "C" => CARBON,
    "N" => element!("N", "Nitrogen", "#3050f8", 0.95),
    "O" => element!("O", "Oxygen", "#ff0d0d", 0.95),
    "F" => element!("F", "Fluorine", "#90e050", 0.9),
    "Ne" => element!("Ne", "Neon", "#b3e3f5", 0.8),
    "Na" => element!("Na", "Sodium", "#ab5cf2", 1.2),
    "Mg" => element!("Mg", "Magnesium", "#8aff00", 1.15),
    "Al" => element!("Al", "Aluminium", "#bfa6a6", 1.15),
    "Si" => element!("Si", "Silicon", "#f0c8a0", 1.15),
    "P" => element!("P", "Phosphorus", "#ff8000", 1.1),
    "S" => element!("S", "Sulfur", "#ffff30", 1.1),
    "Cl" => element!("Cl", "Chlorine", "#1ff01f", 1.1),
    "Ar" => element!("Ar", "Argon", "#80d1e3", 1.0),
    "K" => element!("K", "Potassium", "#8f40d4", 1.3),
    "Ca" => element!("Ca", "Calcium", "#3dff00", 1.25),
    "Ti" => element!("Ti", "Titanium", "#bfc2c7", 1.2),
    "Cr" => element!("Cr", "Chromium", "#8a99c7", 1.2),
    "Mn" => element!("Mn", "Manganese", "#9c7ac7", 1.2),
    "Fe" => element!("Fe", "Iron", "#e06633", 1.2),
    "Co" => element!("Co", "Cobalt", "#f090a0", 1.2),
    "Ni" => element!("Ni", "Nickel", "#50d050", 1.2),
    "Cu" => element!("Cu", "Copper", "#c88033", 1.2),
    "Zn" => element!("Zn", "Zinc", "#7d80b0", 1.2),
    "Ga" => element!("Ga", "Gallium", "#c28f8f", 1.2),
    "Ge" => element!("Ge", "Germanium", "#668f8f", 1.2),
    "As" => element!("As", "Arsenic", "#bd80e3", 1.15),
    "Se" => element!("Se", "Selenium", "#ffa100", 1.15),
    "Br" => element!("Br", "Bromine", "#a62929", 1.2),
    "Kr" => element!("Kr", "Krypton", "#5cb8d1", 1.1),
    "Rb" => element!("Rb", "Rubidium", "#702eb0", 1.35),
    "Sr" => element!("Sr", "Strontium", "#00ff00", 1.3),
    "Ag" => element!("Ag", "Silver", "#c0c0c0", 1.25),
    "Sn" => element!("Sn", "Tin", "#668080", 1.25),
    "Sb" => element!("Sb", "Antimony", "#9e63b5", 1.25),
    "Te" => element!("Te", "Tellurium", "#d47a00", 1.25),
    "I" => element!("I", "Iodine", "#940094", 1.3),
    "Xe" => element!("Xe", "Xenon", "#429eb0", 1.2),
    "Cs" => element!("Cs", "Caesium", "#57178f", 1.4),
    "Ba" => element!("Ba", "Barium", "#00c900", 1.35),
    "Gd" => element!("Gd", "Gadolinium", "#45ffc7", 1.3),
    "Pt" => element!("Pt", "Platinum", "#d0d0e0", 1.25),
    "Au" => element!("Au", "Gold", "#ffd123", 1.25),
    "Hg" => element!("Hg", "Mercury", "#b8b8d0", 1.25),
    "Pb" => element!("Pb", "Lead", "#575961", 1.3),
    "Bi" => element!("Bi", "Bismuth", "#9e4fb5", 1.3),
};

// Two-letter symbols recognised outside brackets. Symbols whose second letter is an
// aromatic atom (Co, Sc, Sn, Zn, Mn, ...) are excluded so that e.g. `CSc1ccccc1` keeps
// reading as sulfur followed by an aromatic carbon.
static UNBRACKETED_TWO_LETTER: Set<&'static str> = phf_set! {
    "Cl", "Br", "Si", "Se", "Na", "Li", "Mg", "Al", "Ca", "Fe", "Cu", "Ni",
};

/// Returns the display data for `symbol`, if it is in the element table.
pub fn element_info(symbol: &str) -> Option<&'static ElementInfo> {
    ELEMENTS.get(symbol)
}

pub fn is_known_element(symbol: &str) -> bool {
    ELEMENTS.contains_key(symbol)
}

/// Whether `symbol` is a two-letter element the parser accepts without brackets.
pub fn is_unbracketed_two_letter(symbol: &str) -> bool {
    UNBRACKETED_TWO_LETTER.contains(symbol)
}

/// Case-folds a lowercase aromatic atom (`c`, `n`, `o`, `p`, `s`) to its element.
pub fn fold_aromatic(ch: char) -> Option<&'static str> {
    match ch {
        'c' => Some("C"),
        'n' => Some("N"),
        'o' => Some("O"),
        'p' => Some("P"),
        's' => Some("S"),
        _ => None,
    }
}

/// Display data for `symbol`, falling back to Carbon for unknown symbols.
pub fn element_info_or_default(symbol: &str) -> &'static ElementInfo {
    element_info(symbol).unwrap_or(&CARBON)
}
