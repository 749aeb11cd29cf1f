//! This crate provides a to-do list manager.
//!
//! Tasks ([`Task`]) have a title, a category, optional dates, importance and urgency flags (that give them an
//! Eisenhower [`Priority`]) and a progress percentage.
//!
//! They live in a [`TaskStore`](store::TaskStore), an ordered list that is persisted into a key-value storage (see the
//! [`storage`] module) after every change, and that can be seeded once from an external source (see the [`seed`] module).
//!
//! User-facing apps should rather go through a [`TaskController`](controller::TaskController), that handles task forms
//! ([`TaskDraft`]s), makes sure nothing reaches the store before passing [validation](validation::validate), and asks
//! for confirmation before deleting tasks.

pub mod traits;

mod task;
pub use task::{Category, Task, TaskPatch};
pub mod draft;
pub use draft::{Field, FieldValue, TaskDraft};
pub mod validation;
pub use validation::{validate, ValidationErrors};
pub mod priority;
pub use priority::{priority, Priority};
mod error;
pub use error::TaskError;

pub mod storage;
pub mod store;
pub use store::TaskStore;
pub mod seed;
pub mod controller;
pub use controller::TaskController;

pub mod config;
pub mod utils;
pub mod mock_behaviour;
