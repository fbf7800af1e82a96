//! taskflow - in-memory task board library
//!
//! This library provides the core of the taskflow CLI: task and category
//! stores that simulate network latency, and the pure functions that derive
//! what a task board shows from their contents.
//!
//! # Core Concepts
//!
//! - **Tasks**: title, category name, priority, due date, completion flag
//! - **Categories**: named labels; tasks reference them by name, not id
//! - **Stores**: async CRUD over in-memory collections with injected latency
//! - **Views**: filter, sort, completion rate, category counts, due flags
//! - **Board**: live state a front end renders and sends intents to
//!
//! # Module Organization
//!
//! - `board`: board state, intents, and the rendered view
//! - `category`: category records and store
//! - `cli`: command-line interface using clap
//! - `clock`: injectable wall clock
//! - `config`: configuration loading from `.taskflow.toml`
//! - `due`: due-date parsing and overdue/due-soon classification
//! - `error`: error types and result aliases
//! - `latency`: simulated store latency
//! - `output`: CLI output envelopes
//! - `seed`: initial store contents
//! - `store`: locked in-memory tables shared by the stores
//! - `task`: task records and store
//! - `view`: derived task views

pub mod board;
pub mod category;
pub mod cli;
pub mod clock;
pub mod config;
pub mod due;
pub mod error;
pub mod latency;
pub mod output;
pub mod seed;
pub mod store;
pub mod task;
pub mod view;

pub use error::{Error, Result};
