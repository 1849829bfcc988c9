//! `cronstep` command-line front end over `cs-schedule`.

pub mod cli;
pub mod render;
