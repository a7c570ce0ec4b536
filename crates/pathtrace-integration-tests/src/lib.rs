//! Cross-crate tests for the pathtrace workspace live in `tests/`.
