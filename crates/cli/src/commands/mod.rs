//! CLI Commands

pub mod check;
pub mod menu;
pub mod tables;
