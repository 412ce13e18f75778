pub mod branch;
pub mod commit;
pub mod search;
pub mod status;
