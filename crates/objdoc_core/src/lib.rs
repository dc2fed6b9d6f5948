//! Public library API for marshalling plain-data object graphs to and from XML documents.

/// Type descriptors, document nodes, the recursive encoder/decoder, and file helpers.
pub mod marshal;
