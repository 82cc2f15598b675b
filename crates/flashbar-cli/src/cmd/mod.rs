pub mod config;
pub mod flash;
pub mod run;
pub mod simulate;
pub mod status;
pub mod toggle;
