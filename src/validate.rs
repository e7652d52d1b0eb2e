//! First-name validation.
//!
//! Runs before any request is built: a rejected name never reaches the
//! completion service.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const EMPTY_NAME_MESSAGE: &str = "Please provide a non-empty first name.";
pub const INVALID_NAME_MESSAGE: &str =
    "Please enter a valid first name (letters, spaces, apostrophes or hyphens).";

/// ASCII letters, the accented Latin-1 and Latin Extended-A ranges, Latin
/// Extended Additional, plus space, hyphen and apostrophe.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿĀ-žḀ-ỿ '\-]+$").expect("name pattern is valid")
});

/// Why a candidate name was refused. Displays as the guidance shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Invalid,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::Empty => EMPTY_NAME_MESSAGE,
            Rejection::Invalid => INVALID_NAME_MESSAGE,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Trim `raw` and check it looks like a first name.
pub fn check_name(raw: &str) -> Result<&str, Rejection> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Rejection::Empty);
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(Rejection::Invalid);
    }
    Ok(name)
}
