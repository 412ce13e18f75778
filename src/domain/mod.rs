pub mod branch;
pub mod commit;
pub mod issue;
pub mod issue_key;
pub mod jql;
