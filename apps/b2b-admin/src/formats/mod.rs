//! File formats read and written by the commands

pub mod csv;
