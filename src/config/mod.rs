pub mod env;
pub mod log;

pub use env::{ENV, Env};
