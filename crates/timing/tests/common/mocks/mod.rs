//! Mock collaborators.

/// Mocked instruction fetch path.
pub mod fetch;
