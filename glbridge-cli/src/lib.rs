//! `glbridge` command line: shader dump and trace replay.

pub mod commands;
pub mod report;
pub mod trace;
