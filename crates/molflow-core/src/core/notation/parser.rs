use super::warning::ParseWarning;
use crate::core::models::atom::Atom;
use crate::core::models::element::{
    DEFAULT_ELEMENT, fold_aromatic, is_known_element, is_unbracketed_two_letter,
};
use crate::core::models::graph::MoleculeGraph;
use crate::core::models::topology::BondOrder;
use std::collections::BTreeMap;

/// The outcome of a lenient parse: the graph that could be recovered plus every
/// warning raised along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub graph: MoleculeGraph,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A bond-order symbol read while the graph had no bond yet.
#[derive(Debug, Clone, Copy)]
struct PendingOrder {
    order: BondOrder,
    symbol: char,
    position: usize,
}

/// Single left-to-right scanner over structural notation.
///
/// State is the current atom, a stack of branch save points, the table of open
/// ring-closure labels and a bond-order symbol read before the first bond, if any.
pub(crate) struct NotationParser<'a> {
    chars: Vec<(usize, char)>,
    cursor: usize,
    input: &'a str,
    graph: MoleculeGraph,
    current: Option<usize>,
    branch_stack: Vec<Option<usize>>,
    ring_labels: BTreeMap<u8, usize>,
    pending_order: Option<PendingOrder>,
    warnings: Vec<ParseWarning>,
}

impl<'a> NotationParser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            cursor: 0,
            input,
            graph: MoleculeGraph::new(),
            current: None,
            branch_stack: Vec::new(),
            ring_labels: BTreeMap::new(),
            pending_order: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> ParseReport {
        while let Some((position, ch)) = self.next_char() {
            match ch {
                'A'..='Z' => self.read_organic_atom(position, ch),
                'a'..='z' => match fold_aromatic(ch) {
                    Some(element) => self.place_atom(element),
                    None => self.ignore(position, ch),
                },
                '[' => self.read_bracket_atom(position),
                '=' => self.set_bond_order(position, ch, BondOrder::Double),
                '#' => self.set_bond_order(position, ch, BondOrder::Triple),
                '0'..='9' => self.ring_label(position, ch as u8 - b'0'),
                '(' => self.branch_stack.push(self.current),
                ')' => match self.branch_stack.pop() {
                    Some(saved) => self.current = saved,
                    None => self
                        .warnings
                        .push(ParseWarning::UnmatchedBranchClose { position }),
                },
                '.' => {
                    self.current = None;
                    self.pending_order = None;
                }
                _ => self.ignore(position, ch),
            }
        }
        self.finish()
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.get(self.cursor).copied();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.cursor).map(|&(_, c)| c)
    }

    fn read_organic_atom(&mut self, position: usize, first: char) {
        if let Some(second) = self.peek_char().filter(char::is_ascii_lowercase) {
            let pair: String = [first, second].iter().collect();
            if is_unbracketed_two_letter(&pair) {
                self.cursor += 1;
                self.place_atom(&pair);
                return;
            }
        }

        let mut buffer = [0u8; 4];
        let symbol: &str = first.encode_utf8(&mut buffer);
        if is_known_element(symbol) {
            self.place_atom(symbol);
        } else {
            self.warnings.push(ParseWarning::UnknownElement {
                symbol: symbol.to_string(),
                position,
            });
            self.place_atom(DEFAULT_ELEMENT);
        }
    }

    /// Reads `[...]`: the first element symbol becomes the atom, everything else up to
    /// the closing bracket (hydrogen counts, charges, isotopes, chirality) is skipped.
    fn read_bracket_atom(&mut self, open_position: usize) {
        let start = self.cursor;
        let end = self.chars[start..]
            .iter()
            .position(|&(_, c)| c == ']')
            .map(|offset| start + offset);
        let body_end = end.unwrap_or(self.chars.len());
        self.cursor = end.map_or(body_end, |e| e + 1);

        if end.is_none() {
            self.warnings.push(ParseWarning::UnterminatedBracket {
                position: open_position,
            });
        }

        let body: String = self.chars[start..body_end].iter().map(|&(_, c)| c).collect();
        match bracket_symbol(&body) {
            Some(symbol) if is_known_element(&symbol) => self.place_atom(&symbol),
            Some(symbol) => {
                self.warnings.push(ParseWarning::UnknownElement {
                    symbol,
                    position: open_position,
                });
                self.place_atom(DEFAULT_ELEMENT);
            }
            None => self.warnings.push(ParseWarning::EmptyBracketAtom {
                position: open_position,
            }),
        }
    }

    fn place_atom(&mut self, element: &str) {
        let index = self.graph.add_atom(Atom::new(element));
        if let Some(previous) = self.current {
            self.connect(previous, index);
        }
        self.current = Some(index);
    }

    /// Creates a bond, consuming the pending bond-order symbol if there is one.
    fn connect(&mut self, from: usize, to: usize) {
        let order = self
            .pending_order
            .take()
            .map_or(BondOrder::Single, |p| p.order);
        let added = self.graph.add_bond(from, to, order);
        debug_assert!(added.is_ok(), "parser bonded invalid atoms: {:?}", added);
    }

    /// `=` and `#` rewrite the most recent bond. Before the first bond exists the symbol
    /// is held and applied to the bond created next, so `C=O` is still a double bond.
    fn set_bond_order(&mut self, position: usize, symbol: char, order: BondOrder) {
        match self.graph.last_bond_mut() {
            Some(bond) => bond.order = order,
            None => {
                self.pending_order = Some(PendingOrder {
                    order,
                    symbol,
                    position,
                })
            }
        }
    }

    fn ring_label(&mut self, position: usize, label: u8) {
        let Some(current) = self.current else {
            self.warnings
                .push(ParseWarning::RingLabelWithoutAtom { label, position });
            return;
        };

        match self.ring_labels.remove(&label) {
            None => {
                self.ring_labels.insert(label, current);
            }
            Some(opened) if opened == current => {
                self.warnings
                    .push(ParseWarning::SelfClosingRing { label, position });
            }
            Some(opened) => self.connect(opened, current),
        }
    }

    fn ignore(&mut self, position: usize, character: char) {
        self.warnings.push(ParseWarning::IgnoredCharacter {
            character,
            position,
        });
    }

    fn finish(mut self) -> ParseReport {
        if let Some(pending) = self.pending_order.take() {
            self.warnings.push(ParseWarning::BondOrderWithoutBond {
                symbol: pending.symbol,
                position: pending.position,
            });
        }
        for label in self.ring_labels.keys() {
            self.warnings.push(ParseWarning::UnclosedRing { label: *label });
        }
        if !self.branch_stack.is_empty() {
            self.warnings.push(ParseWarning::UnclosedBranch {
                count: self.branch_stack.len(),
            });
        }
        tracing::trace!(
            input = self.input,
            atoms = self.graph.atom_count(),
            bonds = self.graph.bond_count(),
            "Scanned structural notation."
        );
        ParseReport {
            graph: self.graph,
            warnings: self.warnings,
        }
    }
}

/// Extracts the element symbol from the body of a bracket atom.
fn bracket_symbol(body: &str) -> Option<String> {
    let mut chars = body.chars().skip_while(char::is_ascii_digit).peekable();
    let first = chars.next()?;

    if first.is_ascii_uppercase() {
        if let Some(&second) = chars.peek() {
            let pair: String = [first, second].iter().collect();
            if second.is_ascii_lowercase() && is_known_element(&pair) {
                return Some(pair);
            }
        }
        return Some(first.to_string());
    }

    match (first, chars.peek().copied()) {
        ('s', Some('e')) => Some("Se".to_string()),
        ('a', Some('s')) => Some("As".to_string()),
        ('b', _) => Some("B".to_string()),
        _ => fold_aromatic(first).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseReport {
        NotationParser::new(input).run()
    }

    fn elements(report: &ParseReport) -> Vec<&str> {
        report
            .graph
            .atoms()
            .iter()
            .map(|a| a.element.as_str())
            .collect()
    }

    fn bond_triples(report: &ParseReport) -> Vec<(usize, usize, u8)> {
        report
            .graph
            .bonds()
            .iter()
            .map(|b| (b.from, b.to, b.order.into()))
            .collect()
    }

    #[test]
    fn two_letter_halogens_are_single_atoms() {
        let report = parse("ClCBr");
        assert_eq!(elements(&report), vec!["Cl", "C", "Br"]);
        assert_eq!(bond_triples(&report), vec![(0, 1, 1), (1, 2, 1)]);
    }

    #[test]
    fn sulfur_followed_by_aromatic_carbon_is_not_scandium() {
        let report = parse("CSc1ccccc1");
        assert_eq!(&elements(&report)[..3], &["C", "S", "C"]);
        assert_eq!(report.graph.atom_count(), 8);
        assert_eq!(report.graph.bond_count(), 8);
    }

    #[test]
    fn aromatic_atoms_are_case_folded() {
        let report = parse("c1ccncc1");
        assert_eq!(elements(&report), vec!["C", "C", "C", "N", "C", "C"]);
        assert!(report.is_clean());
    }

    #[test]
    fn unknown_uppercase_symbols_become_carbon_with_a_warning() {
        let report = parse("CXO");
        assert_eq!(elements(&report), vec!["C", "C", "O"]);
        assert_eq!(
            report.warnings,
            vec![ParseWarning::UnknownElement {
                symbol: "X".to_string(),
                position: 1
            }]
        );
    }

    #[test]
    fn bond_order_symbols_rewrite_the_previous_bond() {
        let report = parse("CC=C");
        assert_eq!(bond_triples(&report), vec![(0, 1, 2), (1, 2, 1)]);

        let report = parse("CCC#N");
        assert_eq!(
            bond_triples(&report),
            vec![(0, 1, 1), (1, 2, 3), (2, 3, 1)]
        );
        assert!(report.is_clean());
    }

    #[test]
    fn bond_order_before_the_first_bond_applies_to_it() {
        assert_eq!(bond_triples(&parse("C=O")), vec![(0, 1, 2)]);
        assert_eq!(bond_triples(&parse("C#N")), vec![(0, 1, 3)]);
        assert_eq!(bond_triples(&parse("C=CC")), vec![(0, 1, 2), (1, 2, 1)]);
    }

    #[test]
    fn bond_order_before_ring_closure_rewrites_the_chain_bond() {
        let report = parse("C1CCCCC=1");
        assert_eq!(report.graph.bonds().last().map(|b| (b.from, b.to)), Some((0, 5)));
        assert_eq!(report.graph.bonds()[4].order, BondOrder::Double);
        assert_eq!(report.graph.bonds()[5].order, BondOrder::Single);
    }

    #[test]
    fn trailing_bond_symbol_rewrites_the_last_bond() {
        let report = parse("CC#");
        assert_eq!(bond_triples(&report), vec![(0, 1, 3)]);
        assert!(report.is_clean());
    }

    #[test]
    fn bond_order_symbol_without_bond_is_a_noop() {
        let report = parse("=C");
        assert_eq!(report.graph.atom_count(), 1);
        assert_eq!(report.graph.bond_count(), 0);
        assert!(matches!(
            report.warnings[0],
            ParseWarning::BondOrderWithoutBond { symbol: '=', .. }
        ));
    }

    #[test]
    fn branches_restore_the_branch_point() {
        let report = parse("CC(C)(C)O");
        assert_eq!(
            bond_triples(&report),
            vec![(0, 1, 1), (1, 2, 1), (1, 3, 1), (1, 4, 1)]
        );
    }

    #[test]
    fn bond_order_inside_branch_rewrites_the_bond_before_it() {
        let report = parse("CC(=O)O");
        assert_eq!(
            bond_triples(&report),
            vec![(0, 1, 2), (1, 2, 1), (1, 3, 1)]
        );
    }

    #[test]
    fn unmatched_close_paren_is_ignored() {
        let report = parse("C)C");
        assert_eq!(bond_triples(&report), vec![(0, 1, 1)]);
        assert_eq!(
            report.warnings,
            vec![ParseWarning::UnmatchedBranchClose { position: 1 }]
        );
    }

    #[test]
    fn unclosed_branch_is_reported() {
        let report = parse("CC(C");
        assert_eq!(report.graph.bond_count(), 2);
        assert_eq!(
            report.warnings,
            vec![ParseWarning::UnclosedBranch { count: 1 }]
        );
    }

    #[test]
    fn ring_labels_can_be_reused_after_closing() {
        let report = parse("C1CC1C1CC1");
        assert_eq!(report.graph.atom_count(), 6);
        assert!(bond_triples(&report).contains(&(0, 2, 1)));
        assert!(bond_triples(&report).contains(&(3, 5, 1)));
        assert!(report.is_clean());
    }

    #[test]
    fn self_closing_ring_label_is_skipped() {
        let report = parse("C11");
        assert_eq!(report.graph.bond_count(), 0);
        assert_eq!(
            report.warnings,
            vec![ParseWarning::SelfClosingRing {
                label: 1,
                position: 2
            }]
        );
    }

    #[test]
    fn ring_label_before_any_atom_is_ignored() {
        let report = parse("1CC");
        assert_eq!(report.graph.bond_count(), 1);
        assert!(matches!(
            report.warnings[0],
            ParseWarning::RingLabelWithoutAtom { label: 1, .. }
        ));
    }

    #[test]
    fn trailing_open_ring_label_creates_no_bond() {
        let report = parse("C1CC");
        assert_eq!(report.graph.bond_count(), 2);
        assert_eq!(report.warnings, vec![ParseWarning::UnclosedRing { label: 1 }]);
    }

    #[test]
    fn percent_labels_fall_back_to_single_digits() {
        let report = parse("C%12CC%12");
        assert_eq!(report.graph.atom_count(), 3);
        // '%' is ignored; labels 1 and 2 are both opened on atom 0 and closed on atom 2.
        assert_eq!(
            bond_triples(&report),
            vec![(0, 1, 1), (1, 2, 1), (0, 2, 1), (0, 2, 1)]
        );
        assert_eq!(report.graph.duplicate_bonds(), vec![(2, 3)]);
    }

    #[test]
    fn bracket_atoms_skip_hydrogens_charges_and_isotopes() {
        let report = parse("[NH4+]");
        assert_eq!(elements(&report), vec!["N"]);

        let report = parse("C[13CH2]O");
        assert_eq!(elements(&report), vec!["C", "C", "O"]);
        assert_eq!(report.graph.bond_count(), 2);
        assert!(report.is_clean());
    }

    #[test]
    fn bracket_atoms_accept_any_known_two_letter_symbol() {
        let report = parse("[Co][Sn][se]");
        assert_eq!(elements(&report), vec!["Co", "Sn", "Se"]);
    }

    #[test]
    fn digits_inside_brackets_are_not_ring_labels() {
        let report = parse("[2H]C");
        assert_eq!(elements(&report), vec!["H", "C"]);
        assert!(report.is_clean());
    }

    #[test]
    fn unterminated_bracket_consumes_rest_of_input() {
        let report = parse("C[O1CC");
        assert_eq!(elements(&report), vec!["C", "O"]);
        assert_eq!(
            report.warnings,
            vec![ParseWarning::UnterminatedBracket { position: 1 }]
        );
    }

    #[test]
    fn empty_bracket_creates_no_atom() {
        let report = parse("C[]C");
        assert_eq!(report.graph.atom_count(), 2);
        assert_eq!(report.graph.bond_count(), 1);
        assert!(matches!(
            report.warnings[0],
            ParseWarning::EmptyBracketAtom { position: 1 }
        ));
    }

    #[test]
    fn dot_separates_components() {
        let report = parse("[Na+].[Cl-]");
        assert_eq!(elements(&report), vec!["Na", "Cl"]);
        assert_eq!(report.graph.bond_count(), 0);
    }

    #[test]
    fn other_characters_are_ignored_with_warnings() {
        let report = parse("C/C=C\\C");
        assert_eq!(report.graph.atom_count(), 4);
        assert_eq!(
            bond_triples(&report),
            vec![(0, 1, 2), (1, 2, 1), (2, 3, 1)]
        );
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn only_structural_symbols_yield_empty_graph() {
        let report = parse("()=#");
        assert!(report.graph.is_empty());
        assert_eq!(report.graph.bond_count(), 0);
    }
}
