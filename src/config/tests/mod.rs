//! Unit tests for harness configuration.
//!
//! - [`helpers`]: shared fixtures and composer helpers
//! - [`types_tests`]: defaults, TOML parsing and derived values
//! - [`layer_precedence_tests`]: `MergeComposer` layer ordering

mod helpers;
