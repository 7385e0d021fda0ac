//! Application services: the post store, view state and their collaborators.

pub mod clock;
pub mod error;
pub mod filter;
pub mod form;
pub mod repos;
pub mod share;
pub mod store;
pub mod theme;
pub mod view;
