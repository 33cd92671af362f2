pub mod menu;
pub mod navigator;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod session;
pub mod surface;
pub mod theme;
