//! JQL strings used by the search commands.

use crate::domain::issue_key::is_issue_key;

const UNRESOLVED_TAIL: &str = "resolution = Unresolved ORDER BY updated DESC";

pub fn my_issues() -> String {
    "assignee=currentUser() AND resolution=Unresolved ORDER BY updated DESC".to_string()
}

/// The broadest query, used when a keyword search is rejected by JIRA.
pub fn unresolved() -> String {
    UNRESOLVED_TAIL.to_string()
}

pub fn keyword(keyword: &str) -> String {
    let escaped = keyword.trim().replace('"', "\\\"");
    let clause = if escaped.is_empty() {
        "assignee = currentUser()".to_string()
    } else if is_issue_key(&escaped) {
        format!("key = \"{escaped}\" OR key ~ \"{escaped}*\"")
    } else {
        format!("summary ~ \"{escaped}\"")
    };
    format!("({clause}) AND {UNRESOLVED_TAIL}")
}
