pub mod animator;
pub mod color;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod io;
pub mod paths;
pub mod scheduler;
pub mod settings;
pub mod timer;
pub mod types;
pub mod visual;

pub use error::{FlashbarError, Result};
