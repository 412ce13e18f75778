use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISSUE_KEY: Regex = Regex::new(r"[A-Z]+-\d+").unwrap();
    static ref EXACT_ISSUE_KEY: Regex = Regex::new(r"^[A-Z]+-\d+$").unwrap();
}

/// Returns the leftmost `PROJECT-NUMBER` token in a branch name.
pub fn extract_issue_key(branch_name: &str) -> Option<&str> {
    ISSUE_KEY.find(branch_name).map(|found| found.as_str())
}

/// True when the whole input is an issue key, e.g. `ABC-123`.
pub fn is_issue_key(input: &str) -> bool {
    EXACT_ISSUE_KEY.is_match(input)
}

/// Zero-pads the numeric part of an issue key to four digits.
///
/// Numbers of five or more digits are kept as-is. A key that does not
/// split on its first `-` into a project and an integer is returned
/// unchanged, so a malformed key never blocks branch creation.
pub fn pad_issue_key(key: &str) -> String {
    let Some((project, number)) = key.split_once('-') else {
        return key.to_string();
    };

    match number.parse::<u64>() {
        Ok(value) if value < 10_000 => format!("{project}-{value:04}"),
        Ok(value) => format!("{project}-{value}"),
        Err(_) => {
            log::warn!("issue number {number:?} is not numeric; keeping key {key}");
            key.to_string()
        }
    }
}
