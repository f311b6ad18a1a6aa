pub mod commands;
pub mod run;
pub mod stages;
