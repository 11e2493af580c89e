//! Regular-expression recognizer core.
//!
//! This crate implements the classical pipeline for regular-language
//! recognition over the 8-bit alphabet:
//! - A combinator surface for building expressions algebraically
//! - Thompson-style NFA construction
//! - Subset construction (NFA to DFA conversion) over disjoint symbol
//!   classes
//! - Moore-style partition-refinement DFA minimization
//! - Deterministic string recognition
//!
//! Each stage is a pure transformation producing a new immutable model:
//!
//! ```
//! use relang::{subset_construction, Regex};
//!
//! let regex = (Regex::word("ab") | Regex::word("ac")).kleene_plus();
//! let nfa = regex.compile();
//! let dfa = subset_construction(&nfa);
//! let minimal = dfa.minimize();
//!
//! assert!(minimal.accepts(b"abac"));
//! assert!(!minimal.accepts(b"abc"));
//! assert!(minimal.state_count() <= dfa.state_count());
//! ```

mod dfa;
mod nfa;
mod regex;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::{DfaEdge, DfaModel, DfaState, DfaTable};
pub use nfa::{NfaEdge, NfaModel, NfaNode};
pub use regex::Regex;
pub use state::{StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{CharSet, CharSetIter, Symbol, SymbolSet};
