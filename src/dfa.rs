//! DFA model, string recognition, and partition-refinement minimization.

use crate::state::{StateId, StateSet};
use crate::symbol::{Symbol, SymbolSet};
use indexmap::IndexMap;
use log::debug;
use std::collections::VecDeque;

/// A deterministic transition: a symbol and the state it leads to.
#[derive(Clone, Debug)]
pub struct DfaEdge {
    pub symbol: Symbol,
    pub next: StateId,
}

/// A DFA state owning its ordered list of outgoing edges.
///
/// After construction, no two outgoing edges accept a common byte.
#[derive(Clone, Debug, Default)]
pub struct DfaState {
    edges: Vec<DfaEdge>,
}

impl DfaState {
    pub fn out_edges(&self) -> &[DfaEdge] {
        &self.edges
    }
}

/// A deterministic finite automaton over a state arena.
///
/// Produced by [`subset_construction`](crate::subset_construction) or by
/// [`minimize`](DfaModel::minimize); immutable to consumers.
#[derive(Clone, Debug)]
pub struct DfaModel {
    states: Vec<DfaState>,
    initial: StateId,
    finals: StateSet,
    symbols: SymbolSet,
}

impl DfaModel {
    pub(crate) fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: 0,
            finals: StateSet::default(),
            symbols: SymbolSet::new(),
        }
    }

    pub(crate) fn add_state(&mut self) -> StateId {
        self.states.push(DfaState::default());
        (self.states.len() - 1) as StateId
    }

    pub(crate) fn set_initial(&mut self, state: StateId) {
        self.initial = state;
    }

    pub(crate) fn mark_final(&mut self, state: StateId) {
        self.finals.insert(state);
    }

    pub(crate) fn add_edge(&mut self, from: StateId, symbol: Symbol, next: StateId) {
        self.symbols.insert(symbol);
        self.states[from as usize].edges.push(DfaEdge { symbol, next });
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id as usize]
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state)
    }

    /// The accepting states.
    pub fn final_states(&self) -> &StateSet {
        &self.finals
    }

    /// The non-accepting states (arena complement of the final set).
    pub fn non_final_states(&self) -> StateSet {
        (0..self.states.len() as StateId)
            .filter(|&state| !self.finals.contains(state))
            .collect()
    }

    /// Every symbol appearing on some edge, in a fixed insertion order.
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Decide whether the DFA accepts `input`: walk the unique matching
    /// edge per byte, reject on a missing transition, accept iff the walk
    /// ends in a final state. Total.
    pub fn accepts(&self, input: &[u8]) -> bool {
        if self.states.is_empty() {
            return false;
        }
        let mut state = self.initial;
        for &byte in input {
            let edges = self.states[state as usize].out_edges();
            let Some(edge) = edges.iter().find(|edge| edge.symbol.accepts(byte)) else {
                return false;
            };
            state = edge.next;
        }
        self.finals.contains(state)
    }

    /// True iff no accepting state is reachable from the initial state.
    pub fn is_empty(&self) -> bool {
        if self.states.is_empty() || self.finals.is_empty() {
            return true;
        }
        self.reachable_states()
            .iter()
            .all(|state| !self.finals.contains(state))
    }

    fn reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.states.len());
        let mut queue = VecDeque::new();
        queue.push_back(self.initial);
        while let Some(state) = queue.pop_front() {
            if reachable.contains(state) {
                continue;
            }
            reachable.insert(state);
            for edge in self.states[state as usize].out_edges() {
                if !reachable.contains(edge.next) {
                    queue.push_back(edge.next);
                }
            }
        }
        reachable
    }

    /// The states and labeled edges as a plain graph, for debug rendering.
    pub fn to_graph(&self) -> (Vec<StateId>, Vec<(StateId, StateId, String)>) {
        let nodes = (0..self.states.len() as StateId).collect();
        let mut edges = Vec::new();
        for (id, state) in self.states.iter().enumerate() {
            for edge in state.out_edges() {
                edges.push((id as StateId, edge.next, format!("{:?}", edge.symbol)));
            }
        }
        (nodes, edges)
    }

    /// Precompute a dense dispatch table with one 256-entry row per state,
    /// trading memory for O(1) transitions.
    pub fn to_table(&self) -> DfaTable {
        let rows = self.states.len() + 1;
        let mut transitions = vec![DEAD_STATE; rows * TABLE_COLUMNS];
        let mut finals = StateSet::with_capacity(rows);
        for (id, state) in self.states.iter().enumerate() {
            let row = (id + 1) * TABLE_COLUMNS;
            for edge in state.out_edges() {
                for byte in edge.symbol.to_charset().iter() {
                    transitions[row + byte as usize] = edge.next + 1;
                }
            }
            if self.finals.contains(id as StateId) {
                finals.insert((id + 1) as StateId);
            }
        }
        let initial = if self.states.is_empty() {
            DEAD_STATE
        } else {
            self.initial + 1
        };
        DfaTable {
            transitions,
            finals,
            initial,
        }
    }

    /// The successor of `state` under `symbol` (content equality), if any.
    fn next_state(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.states[state as usize]
            .out_edges()
            .iter()
            .find(|edge| edge.symbol == *symbol)
            .map(|edge| edge.next)
    }

    /// Collapse behaviorally equivalent states into a minimal DFA.
    ///
    /// Moore-style partition refinement: reachable states start split by
    /// finality, then blocks are repeatedly subdivided by the signature of
    /// successor blocks over the symbol set in its fixed order, until a
    /// full pass makes no split. A fresh DFA is rebuilt from the blocks
    /// through one representative each; self-loops land back on the
    /// block's own fresh state.
    pub fn minimize(&self) -> DfaModel {
        if self.states.is_empty() {
            return DfaModel::new();
        }

        // Signature sentinel for a missing transition; also marks states
        // never placed in a block (unreachable ones).
        const NO_BLOCK: usize = usize::MAX;

        let reachable = self.reachable_states();
        let mut blocks: Vec<Vec<StateId>> = Vec::new();
        let mut block_of: Vec<usize> = vec![NO_BLOCK; self.states.len()];
        for wanted_final in [false, true] {
            let members: Vec<StateId> = reachable
                .iter()
                .filter(|&state| self.finals.contains(state) == wanted_final)
                .collect();
            if !members.is_empty() {
                for &state in &members {
                    block_of[state as usize] = blocks.len();
                }
                blocks.push(members);
            }
        }

        loop {
            let mut changed = false;
            let mut index = 0;
            while index < blocks.len() {
                // Singleton blocks cannot split.
                if blocks[index].len() > 1 {
                    let mut groups: IndexMap<Vec<usize>, Vec<StateId>> = IndexMap::new();
                    for &state in &blocks[index] {
                        let signature: Vec<usize> = self
                            .symbols
                            .iter()
                            .map(|symbol| match self.next_state(state, symbol) {
                                Some(target) => block_of[target as usize],
                                None => NO_BLOCK,
                            })
                            .collect();
                        groups.entry(signature).or_default().push(state);
                    }
                    if groups.len() > 1 {
                        changed = true;
                        let mut groups = groups.into_values();
                        blocks[index] = groups.next().unwrap();
                        for group in groups {
                            let fresh = blocks.len();
                            for &state in &group {
                                block_of[state as usize] = fresh;
                            }
                            blocks.push(group);
                        }
                    }
                }
                index += 1;
            }
            if !changed {
                break;
            }
        }

        let mut minimal = DfaModel::new();
        for _ in 0..blocks.len() {
            minimal.add_state();
        }
        minimal.set_initial(block_of[self.initial as usize] as StateId);
        for (index, block) in blocks.iter().enumerate() {
            // Finality and behavior are uniform across a block, so any
            // member serves as representative.
            let representative = block[0];
            if self.finals.contains(representative) {
                minimal.mark_final(index as StateId);
            }
            for symbol in &self.symbols {
                if let Some(target) = self.next_state(representative, symbol) {
                    minimal.add_edge(
                        index as StateId,
                        *symbol,
                        block_of[target as usize] as StateId,
                    );
                }
            }
        }

        debug!(
            "minimization: {} states -> {} blocks",
            self.states.len(),
            blocks.len()
        );
        minimal
    }
}

const TABLE_COLUMNS: usize = 256;

/// All rows map every byte into the dead state's own row.
const DEAD_STATE: StateId = 0;

/// A dense transition table built by [`DfaModel::to_table`].
///
/// Row 0 is a dead state trapping every byte; the model's states occupy
/// rows 1 onward. Recognition is a single indexed load per input byte.
#[derive(Clone, Debug)]
pub struct DfaTable {
    transitions: Vec<StateId>,
    finals: StateSet,
    initial: StateId,
}

impl DfaTable {
    /// Decide whether the table accepts `input`.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut state = self.initial;
        for &byte in input {
            state = self.transitions[state as usize * TABLE_COLUMNS + byte as usize];
            if state == DEAD_STATE {
                return false;
            }
        }
        self.finals.contains(state)
    }
}
