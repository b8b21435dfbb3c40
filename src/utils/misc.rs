use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder regex");
}

/// Get EPOCH timestamp in seconds
pub fn get_epoch_ts() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// replace placeholder variables from the template text
/// placeholders are of patters {{variable}}; unknown ones are left untouched
pub fn replace_placeholders(s: &str, options: &HashMap<&str, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(s, |cap: &Captures| match options.get(&cap[1]) {
            Some(val) => val.clone(),
            None => cap[0].to_string(),
        })
        .into_owned()
}

/// Render the reminder text for one or more meals
pub fn render_reminder(template: &str, meals: &[&str]) -> String {
    let mut options = HashMap::new();
    options.insert("meal", meals.join(", "));
    replace_placeholders(template, &options)
}

/// Deterministic marker document id: `{date}_{meal with spaces as underscores}`
pub fn reminder_document_id(date_key: &str, meal: &str) -> String {
    format!("{}_{}", date_key, meal.replace(' ', "_"))
}

/// Read a boolean flag from the environment, accepting true/1/yes
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
