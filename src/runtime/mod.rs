pub mod deadline;
pub mod debounce;
