//! cellgraph_engine - Cell identifiers, postfix formulas and graph helpers.

pub mod engine;
