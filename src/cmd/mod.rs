pub mod branch;
pub mod commit;
pub mod config;
pub mod prompt;
pub mod search;
pub mod status;
