use std::path::{Component, Path};

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumNamePatternMode, InstallError, SpecNamePredicate};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeNamePatternSeq {
    Suffix(Vec<String>),
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeNamePatternSeq {
    fn is_any_match(&self, value: &str) -> bool {
        match self {
            Self::Suffix(v) => v.iter().any(|p| value.ends_with(p.as_str())),
            Self::Literal(v) => v.iter().any(|p| value.contains(p.as_str())),
            Self::Glob(v) => v.iter().any(|p| p.is_match(value)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(value)),
        }
    }
}

/// Compiled form of [`SpecNamePredicate`].
#[derive(Debug, Clone)]
pub(crate) struct SpecNameMatcher {
    patterns_include: Option<TypeNamePatternSeq>,
    patterns_exclude: Option<TypeNamePatternSeq>,
}

impl SpecNameMatcher {
    pub(crate) fn from_predicate(predicate: &SpecNamePredicate) -> Result<Self, InstallError> {
        Ok(Self {
            patterns_include: _compile(&predicate.patterns_include, predicate.rule_pattern)?,
            patterns_exclude: _compile(&predicate.patterns_exclude, predicate.rule_pattern)?,
        })
    }

    /// An empty include list matches nothing.
    pub(crate) fn is_match(&self, name: &str) -> bool {
        let b_included = self
            .patterns_include
            .as_ref()
            .is_some_and(|p| p.is_any_match(name));
        let b_excluded = self
            .patterns_exclude
            .as_ref()
            .is_some_and(|p| p.is_any_match(name));
        b_included && !b_excluded
    }
}

fn _compile(
    patterns: &[String],
    rule_pattern: EnumNamePatternMode,
) -> Result<Option<TypeNamePatternSeq>, InstallError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumNamePatternMode::Suffix => Ok(Some(TypeNamePatternSeq::Suffix(patterns.to_vec()))),
        EnumNamePatternMode::Literal => Ok(Some(TypeNamePatternSeq::Literal(patterns.to_vec()))),
        EnumNamePatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let matcher = Glob::new(pattern)
                    .map_err(|e| InstallError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeNamePatternSeq::Glob(l_glob)))
        }
        EnumNamePatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(pattern).map_err(|e| InstallError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                l_regex.push(regex);
            }
            Ok(Some(TypeNamePatternSeq::Regex(l_regex)))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Single path segment: non-empty, no separators, not `.`/`..`.
pub(crate) fn is_single_segment(name: &str) -> bool {
    let mut iter_components = Path::new(name).components();
    matches!(
        (iter_components.next(), iter_components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Relative path made only of normal segments (empty is allowed).
pub(crate) fn is_contained_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{SpecNameMatcher, is_contained_relative, is_single_segment};
    use crate::spec::{EnumNamePatternMode, InstallError, SpecNamePredicate};

    fn matcher(
        patterns_include: &[&str],
        patterns_exclude: &[&str],
        rule_pattern: EnumNamePatternMode,
    ) -> SpecNameMatcher {
        let predicate = SpecNamePredicate {
            patterns_include: patterns_include.iter().map(|s| s.to_string()).collect(),
            patterns_exclude: patterns_exclude.iter().map(|s| s.to_string()).collect(),
            rule_pattern,
        };
        SpecNameMatcher::from_predicate(&predicate).expect("compile")
    }

    #[test]
    fn suffix_matches_header_extensions_only() {
        let m = matcher(&[".h", ".inl"], &[], EnumNamePatternMode::Suffix);
        assert!(m.is_match("vector3.h"));
        assert!(m.is_match("vector3.inl"));
        assert!(!m.is_match("vector3.cc"));
        assert!(!m.is_match("vector3.hpp"));
        assert!(!m.is_match("h"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let m = matcher(&["*.h"], &["pch_*"], EnumNamePatternMode::Glob);
        assert!(m.is_match("camera.h"));
        assert!(!m.is_match("pch_hdr.h"));
    }

    #[test]
    fn regex_mode_mirrors_header_expression() {
        let m = matcher(&[r"\.h$|\.inl$"], &[], EnumNamePatternMode::Regex);
        assert!(m.is_match("matrix4X4.inl"));
        assert!(!m.is_match("matrix4X4.inl.bak"));
    }

    #[test]
    fn empty_include_matches_nothing() {
        let m = matcher(&[], &[], EnumNamePatternMode::Suffix);
        assert!(!m.is_match("a.h"));
    }

    #[test]
    fn invalid_patterns_rejected() {
        for (pattern, rule_pattern) in [
            ("(", EnumNamePatternMode::Regex),
            ("[", EnumNamePatternMode::Glob),
        ] {
            let predicate = SpecNamePredicate {
                patterns_include: vec![pattern.to_string()],
                patterns_exclude: Vec::new(),
                rule_pattern,
            };
            let err = SpecNameMatcher::from_predicate(&predicate).expect_err("must fail");
            assert!(matches!(err, InstallError::InvalidPattern { .. }));
        }
    }

    #[test]
    fn segment_and_relative_path_checks() {
        assert!(is_single_segment("include"));
        assert!(!is_single_segment(""));
        assert!(!is_single_segment(".."));
        assert!(!is_single_segment("a/b"));
        assert!(is_contained_relative(Path::new("x86/lib")));
        assert!(!is_contained_relative(Path::new("../x86")));
        assert!(!is_contained_relative(Path::new("/abs")));
    }
}
