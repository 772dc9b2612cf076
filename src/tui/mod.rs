//! TUI module for interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Screen, Action, Transition)
//! - `update`: Pure transitions (Screen, Action, &Session) → Transition
//! - `view`: Pure rendering to a ratatui Frame
//! - `theme`: Style constants
//! - `run`: Effects (terminal, key events, session dispatch, file output)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
