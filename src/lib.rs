pub mod cli;
pub mod core;
pub mod gui;
pub mod term;
