//! Guess whether a program will block on standard input.
//!
//! This is a case-insensitive substring match, not a parser.  A token inside
//! a comment or string literal counts (false positive), and input read
//! through an alias or a helper such as `sys.stdin.read()`, `getchar()` or
//! `std::getline` does not (false negative).  The result only decides
//! whether the input slots are shown and sent; the program still runs
//! either way.

use crate::language::LanguageId;

/// Token whose presence marks a program as interactive.
fn input_token(language: LanguageId) -> &'static str {
    match language {
        LanguageId::Python => "input(",
        LanguageId::C => "scanf(",
        LanguageId::Cpp => "cin >>",
    }
}

/// Returns `true` if `source` looks like it reads from stdin.
///
/// Empty and whitespace-only sources never require input.
pub fn requires_input(source: &str, language: LanguageId) -> bool {
    if source.trim().is_empty() {
        return false;
    }
    source.to_lowercase().contains(input_token(language))
}
