/// Prefix command modules
mod setup;

pub use setup::{broadcast, setup};
