pub mod output;
pub mod views;
