//! Controllers for viewing, creating and editing an application's storage
//! resources through a remote admin API.

pub mod error;
pub mod helpers;
pub mod models;
pub mod state;
pub mod store;
pub mod views;

pub use error::{Error, Result};
