use crate::KatanaError;
use regex::Regex;
use std::sync::LazyLock;

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v(\d+)").expect("version token pattern is valid"));

/// Version number of the first `v<digits>` token in a file name.
/// Only the digits count: `v12b` is version 12.
pub fn version_from_file_name(name: &str) -> Result<u32, KatanaError> {
    VERSION_TOKEN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .ok_or_else(|| KatanaError::PatternNotFound(name.to_owned()))
}
