//! Internal test crate; all content lives in `tests/`.
