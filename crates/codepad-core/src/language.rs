//! The closed set of supported languages and their immutable profiles.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A language the playground can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    /// Python 3.
    Python,
    /// C (GCC).
    C,
    /// C++ (GCC).
    Cpp,
}

impl LanguageId {
    /// Every language, in display order.
    pub const ALL: [LanguageId; 3] = [LanguageId::Python, LanguageId::C, LanguageId::Cpp];

    /// Position in [`LanguageId::ALL`].
    pub fn index(self) -> usize {
        match self {
            LanguageId::Python => 0,
            LanguageId::C => 1,
            LanguageId::Cpp => 2,
        }
    }

    /// Human-readable name for tabs and titles.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageId::Python => "Python",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
        }
    }

    /// Short identifier used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown language name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language `{0}` (expected python, c or cpp)")]
pub struct UnknownLanguage(pub String);

impl FromStr for LanguageId {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(LanguageId::Python),
            "c" => Ok(LanguageId::C),
            "cpp" | "c++" => Ok(LanguageId::Cpp),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// How the editor should treat the buffer.  C and C++ share a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Python source.
    Python,
    /// C-family source (C and C++).
    CFamily,
}

impl EditorMode {
    /// Label shown in the editor border.
    pub fn label(self) -> &'static str {
        match self {
            EditorMode::Python => "python",
            EditorMode::CFamily => "c/c++",
        }
    }

    /// Spaces inserted by the Tab key.
    pub fn indent_width(self) -> usize {
        match self {
            EditorMode::Python => 4,
            EditorMode::CFamily => 2,
        }
    }
}

/// Everything the playground needs to know about one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Which language this profile describes.
    pub id: LanguageId,
    /// Identifier the execution service uses to pick a compiler.
    pub engine_code: u32,
    /// Source loaded into the editor when the language is selected.
    pub default_template: &'static str,
    /// Editor behaviour for this language.
    pub editor_mode: EditorMode,
}

const PYTHON_TEMPLATE: &str = r#"print("Hello World")"#;

const C_TEMPLATE: &str = r#"#include <stdio.h>
int main() {
  printf("Hello World\n");
  return 0;
}"#;

const CPP_TEMPLATE: &str = r#"#include <iostream>
using namespace std;
int main() {
  cout << "Hello World" << endl;
  return 0;
}"#;

fn builtin_profiles() -> Vec<LanguageProfile> {
    vec![
        LanguageProfile {
            id: LanguageId::Python,
            engine_code: 71,
            default_template: PYTHON_TEMPLATE,
            editor_mode: EditorMode::Python,
        },
        LanguageProfile {
            id: LanguageId::C,
            engine_code: 50,
            default_template: C_TEMPLATE,
            editor_mode: EditorMode::CFamily,
        },
        LanguageProfile {
            id: LanguageId::Cpp,
            engine_code: 54,
            default_template: CPP_TEMPLATE,
            editor_mode: EditorMode::CFamily,
        },
    ]
}

/// Lookup table from [`LanguageId`] to [`LanguageProfile`].
///
/// Construction checks that every language has exactly one profile, which
/// makes [`profile`](Registry::profile) total.
#[derive(Debug, Clone)]
pub struct Registry {
    profiles: [LanguageProfile; 3],
}

impl Registry {
    /// Build a registry from an arbitrary list of profiles.
    pub fn new(profiles: impl IntoIterator<Item = LanguageProfile>) -> Result<Self, ConfigError> {
        let mut slots: [Option<LanguageProfile>; 3] = [None, None, None];
        for profile in profiles {
            let slot = &mut slots[profile.id.index()];
            if slot.is_some() {
                return Err(ConfigError::Duplicate(profile.id));
            }
            *slot = Some(profile);
        }

        let [python, c, cpp] = slots;
        let take = |slot: Option<LanguageProfile>, id| slot.ok_or(ConfigError::Missing(id));
        Ok(Self {
            profiles: [
                take(python, LanguageId::Python)?,
                take(c, LanguageId::C)?,
                take(cpp, LanguageId::Cpp)?,
            ],
        })
    }

    /// The built-in Python / C / C++ table.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(builtin_profiles())
    }

    /// Profile for `id`.
    pub fn profile(&self, id: LanguageId) -> &LanguageProfile {
        &self.profiles[id.index()]
    }

    /// All profiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageProfile> {
        self.profiles.iter()
    }
}
