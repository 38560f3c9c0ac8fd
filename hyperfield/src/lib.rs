//! An N-dimensional Minesweeper engine.
//!
//! The library models the minefield itself: an arbitrary-dimensional
//! hyper-grid with optional per-axis toroidal wrap, a closed catalog of mine
//! variants, a composable hint pipeline and the state machine that governs
//! win/loss/pause transitions. Rendering, input devices and persistence are
//! left to frontends, which only ever call the mutators on [`game::Game`] and
//! read its derived values.

pub mod cell;
pub mod density;
pub mod game;
pub mod grid;
pub mod hint;
pub mod mine;
pub mod settings;
