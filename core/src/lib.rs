//! Core of swipedex: creature models, the remote fetch helper, the persisted
//! collection store, the swipe interaction controller and the browsing
//! session that ties them together. Nothing in here depends on a UI toolkit.

pub mod api;
pub mod error;
pub mod fetch;
pub mod models;
pub mod session;
pub mod storage;
pub mod swipe;

pub use error::{Error, Result};
