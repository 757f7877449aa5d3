//! Statement execution module

pub mod executor;

pub use executor::{Executor, QueryResult};
