//! Subset construction: converting an NFA to a DFA.
//!
//! Epsilon closures of NFA node sets become DFA states, deduplicated by
//! content: the sorted member list is the map key, so two node sets with
//! the same members always coalesce regardless of discovery order. The
//! DFA's alphabet is the set of disjoint symbol classes refined from the
//! NFA's symbols, which guarantees that no two out-edges of a DFA state
//! overlap on any byte.

use crate::dfa::DfaModel;
use crate::nfa::NfaModel;
use crate::state::{StateId, StateSet};
use crate::symbol::{CharSet, Symbol, SymbolSet};
use indexmap::IndexMap;
use log::debug;

/// Convert an NFA to a DFA using the powerset construction.
pub fn subset_construction(nfa: &NfaModel) -> DfaModel {
    // Work on the normalized form: empty entry edge, live symbols only.
    let nfa = nfa.normalized();
    let classes = symbol_classes(nfa.symbols());

    let mut dfa = DfaModel::new();
    let mut state_ids: IndexMap<Vec<StateId>, StateId> = IndexMap::new();

    let start = StateSet::singleton(nfa.entry().tail, nfa.node_count());
    let initial_set = nfa.epsilon_closure(&start);
    let initial = dfa.add_state();
    dfa.set_initial(initial);
    if initial_set.contains(nfa.tail()) {
        dfa.mark_final(initial);
    }
    state_ids.insert(initial_set.to_vec(), initial);

    let mut worklist = vec![(initial_set, initial)];
    while let Some((node_set, dfa_state)) = worklist.pop() {
        for class in &classes {
            // A class lies entirely inside or outside every live symbol's
            // byte set, so one representative byte decides the whole class.
            let representative = class.iter().next().expect("classes are non-empty");
            let next_set = nfa.move_on_byte(&node_set, representative);
            if next_set.is_empty() {
                continue;
            }

            let key = next_set.to_vec();
            let next_state = match state_ids.get(&key) {
                Some(&existing) => existing,
                None => {
                    let fresh = dfa.add_state();
                    if next_set.contains(nfa.tail()) {
                        dfa.mark_final(fresh);
                    }
                    state_ids.insert(key, fresh);
                    worklist.push((next_set, fresh));
                    fresh
                }
            };
            dfa.add_edge(dfa_state, Symbol::Set(*class), next_state);
        }
    }

    debug!(
        "subset construction: {} nfa nodes -> {} dfa states over {} symbol classes",
        nfa.node_count(),
        dfa.state_count(),
        classes.len()
    );
    dfa
}

/// Refine the symbols' byte sets into pairwise-disjoint equivalence
/// classes such that every symbol is a union of classes.
///
/// Dead symbols contribute nothing; the returned classes are non-empty.
fn symbol_classes(symbols: &SymbolSet) -> Vec<CharSet> {
    let mut classes: Vec<CharSet> = Vec::new();
    for symbol in symbols {
        let mut rest = symbol.to_charset();
        if rest.is_empty() {
            continue;
        }
        let mut refined = Vec::with_capacity(classes.len() + 1);
        for &class in &classes {
            if !class.intersects(&rest) {
                refined.push(class);
                continue;
            }
            let mut overlap = class;
            overlap.intersect_with(&rest);
            // Split the class against the overlap; both differences are
            // computed by symmetric difference since overlap is a subset.
            let mut outside = class;
            outside.symmetric_difference_with(&overlap);
            if !outside.is_empty() {
                refined.push(outside);
            }
            refined.push(overlap);
            rest.symmetric_difference_with(&overlap);
        }
        if !rest.is_empty() {
            refined.push(rest);
        }
        classes = refined;
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn test_symbol_classes_are_disjoint_and_cover() {
        let mut symbols = SymbolSet::new();
        symbols.insert(Symbol::range(b'a', b'z'));
        symbols.insert(Symbol::Char(b'a'));
        symbols.insert(Symbol::range(b'x', b'~'));

        let classes = symbol_classes(&symbols);
        for (i, a) in classes.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &classes[i + 1..] {
                assert!(!a.intersects(b), "classes overlap: {a:?} and {b:?}");
            }
        }
        // Every symbol must be exactly a union of classes.
        for symbol in &symbols {
            let mut union = CharSet::new();
            for class in &classes {
                if class.intersects(&symbol.to_charset()) {
                    union.union_with(class);
                }
            }
            assert_eq!(union, symbol.to_charset());
        }
    }

    #[test]
    fn test_symbol_classes_skip_dead_symbols() {
        let mut symbols = SymbolSet::new();
        symbols.insert(Symbol::Set(CharSet::new()));
        assert!(symbol_classes(&symbols).is_empty());
    }

    #[test]
    fn test_dfa_edges_never_overlap() {
        // Char(a) and Range(a, z) overlap on 'a'; class refinement must
        // keep the DFA deterministic anyway.
        let regex = (Regex::range(b'a', b'z').kleene_plus()) | Regex::word("a0");
        let dfa = subset_construction(&regex.compile());

        for id in 0..dfa.state_count() as StateId {
            let edges = dfa.state(id).out_edges();
            for (i, lhs) in edges.iter().enumerate() {
                for rhs in &edges[i + 1..] {
                    assert!(
                        !lhs.symbol.to_charset().intersects(&rhs.symbol.to_charset()),
                        "state {id} has overlapping edges"
                    );
                }
            }
        }
        assert!(dfa.accepts(b"a"));
        assert!(dfa.accepts(b"az"));
        assert!(dfa.accepts(b"a0"));
        assert!(!dfa.accepts(b"0"));
    }

    #[test]
    fn test_node_sets_coalesce_by_content() {
        // (ab)* revisits the same closure after every "ab", so the DFA
        // needs exactly three states.
        let regex = Regex::word("ab").kleene();
        let dfa = subset_construction(&regex.compile());
        assert_eq!(dfa.state_count(), 3);
        assert!(dfa.accepts(b""));
        assert!(dfa.accepts(b"abab"));
        assert!(!dfa.accepts(b"aba"));
    }

    #[test]
    fn test_final_and_non_final_states_partition_the_dfa() {
        let regex = Regex::word("ab") | Regex::word("ac");
        let dfa = subset_construction(&regex.compile());

        let finals = dfa.final_states();
        let non_finals = dfa.non_final_states();
        assert_eq!(finals.len() + non_finals.len(), dfa.state_count());
        for state in finals.iter() {
            assert!(!non_finals.contains(state));
        }
        let initial = dfa.initial();
        assert!(finals.contains(initial) || non_finals.contains(initial));
    }

    #[test]
    fn test_dead_symbol_produces_no_edges() {
        let regex = Regex::predicate(|_| false) & Regex::word("x");
        let dfa = subset_construction(&regex.compile());
        assert_eq!(dfa.state_count(), 1);
        assert!(dfa.state(0).out_edges().is_empty());
        assert!(!dfa.accepts(b""));
        assert!(!dfa.accepts(b"x"));
    }
}
