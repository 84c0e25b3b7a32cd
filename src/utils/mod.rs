//! Small helpers shared by the collectors and the display

pub mod command;
pub mod file;
pub mod parsing;
