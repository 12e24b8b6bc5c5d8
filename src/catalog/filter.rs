//! Composable package filters
//!
//! Each constructor binds its match criteria up front and returns a
//! [`Filter`]. A package is selected only when every filter in a set accepts
//! it, and an empty set accepts everything. Text comparisons ignore case.

use super::manifest::PackageManifest;
use crate::error::{PkgcatError, PkgcatResult};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

type Predicate = Box<dyn Fn(&PackageManifest) -> bool + Send + Sync>;

/// A predicate over a package with its parameters already bound
pub struct Filter {
    label: String,
    predicate: Predicate,
}

impl Filter {
    /// Wrap an arbitrary predicate. `label` shows up in debug output.
    pub fn new(
        label: impl Into<String>,
        predicate: impl Fn(&PackageManifest) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn matches(&self, pkg: &PackageManifest) -> bool {
        (self.predicate)(pkg)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("label", &self.label).finish()
    }
}

/// Check a package against every filter (logical AND)
pub fn matches_all(filters: &[Filter], pkg: &PackageManifest) -> bool {
    filters.iter().all(|f| f.matches(pkg))
}

/// Match package names against shell glob patterns (any pattern may match)
pub fn match_name_globs<I, S>(patterns: I) -> PkgcatResult<Filter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let patterns: Vec<String> = patterns
        .into_iter()
        .map(|p| p.as_ref().to_lowercase())
        .collect();
    let compiled = patterns
        .iter()
        .map(|p| compile_glob(p))
        .collect::<PkgcatResult<Vec<_>>>()?;

    Ok(Filter::new(format!("name glob {:?}", patterns), move |pkg| {
        let name = pkg.name().to_lowercase();
        compiled.iter().any(|re| re.is_match(&name))
    }))
}

/// Match package names against a single glob pattern
pub fn match_name(pattern: &str) -> PkgcatResult<Filter> {
    match_name_globs([pattern])
}

/// Match package names containing any of the given substrings
pub fn match_name_substrings<I, S>(needles: I) -> Filter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needles: Vec<String> = needles
        .into_iter()
        .map(|n| n.as_ref().to_lowercase())
        .collect();

    Filter::new(format!("name contains {:?}", needles), move |pkg| {
        let name = pkg.name().to_lowercase();
        needles.iter().any(|n| name.contains(n.as_str()))
    })
}

/// Match the catalog source identifier or its display name
pub fn match_catalog_source(needle: &str) -> Filter {
    let needle = needle.to_lowercase();

    Filter::new(format!("catalog source contains {:?}", needle), move |pkg| {
        pkg.status.catalog_source.to_lowercase().contains(&needle)
            || pkg
                .status
                .catalog_source_display_name
                .to_lowercase()
                .contains(&needle)
    })
}

/// Match the long description of any channel
pub fn match_description(needle: &str) -> Filter {
    let needle = needle.to_lowercase();

    Filter::new(format!("description contains {:?}", needle), move |pkg| {
        pkg.channels().iter().any(|c| {
            c.current_csv_desc
                .long_description
                .to_lowercase()
                .contains(&needle)
        })
    })
}

/// Match packages where any channel supports the named install mode
pub fn match_install_mode(mode: &str) -> Filter {
    let mode = mode.to_lowercase();

    Filter::new(format!("install mode {:?}", mode), move |pkg| {
        pkg.channels().iter().any(|c| {
            c.current_csv_desc
                .install_modes
                .iter()
                .any(|m| m.supported && m.mode_type.to_lowercase() == mode)
        })
    })
}

/// Match packages where any channel lists any of the given keywords exactly
pub fn match_keywords<I, S>(keywords: I) -> Filter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let wanted: HashSet<String> = keywords
        .into_iter()
        .map(|k| k.as_ref().to_lowercase())
        .collect();

    Filter::new(format!("keywords {:?}", wanted), move |pkg| {
        pkg.channels().iter().any(|c| {
            c.current_csv_desc
                .keywords
                .iter()
                .any(|k| wanted.contains(&k.to_lowercase()))
        })
    })
}

/// Match packages where any channel's `certified` annotation equals `certified`
pub fn match_certified(certified: bool) -> Filter {
    Filter::new(format!("certified = {}", certified), move |pkg| {
        pkg.channels().iter().any(|c| {
            c.current_csv_desc
                .annotations
                .get("certified")
                .and_then(|v| v.trim().to_ascii_lowercase().parse::<bool>().ok())
                == Some(certified)
        })
    })
}

/// Translate a shell glob into an anchored regex.
///
/// `*` and `?` never match `/`. Classes support ranges and `^`/`!` negation.
fn compile_glob(pattern: &str) -> PkgcatResult<Regex> {
    let invalid = |reason: &str| PkgcatError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '\\' => {
                let escaped = chars.next().ok_or_else(|| invalid("trailing backslash"))?;
                re.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
            }
            '[' => {
                re.push('[');
                if matches!(chars.peek(), Some('^') | Some('!')) {
                    chars.next();
                    re.push('^');
                }

                let mut members = 0;
                loop {
                    match chars.next() {
                        None => return Err(invalid("unterminated character class")),
                        Some(']') if members > 0 => break,
                        Some(']') => return Err(invalid("empty character class")),
                        Some('\\') => {
                            let escaped = chars
                                .next()
                                .ok_or_else(|| invalid("trailing backslash"))?;
                            push_class_member(&mut re, escaped);
                        }
                        Some('-') if members == 0 || chars.peek() == Some(&']') => {
                            return Err(invalid("dangling range in character class"))
                        }
                        Some('-') => re.push('-'),
                        Some(member) => push_class_member(&mut re, member),
                    }
                    members += 1;
                }
                re.push(']');
            }
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    re.push('$');
    Regex::new(&re).map_err(|e| invalid(&e.to_string()))
}

fn push_class_member(re: &mut String, c: char) {
    if c.is_ascii_punctuation() {
        re.push('\\');
    }
    re.push(c);
}
