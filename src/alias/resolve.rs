// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Alias chain resolution.

use indexmap::{IndexMap, IndexSet};

use crate::error::ResolveError;

/// Follow alias references from `name` until an original is reached.
///
/// Returns the name of the original that ends the chain. Walks iteratively
/// and remembers every name on the chain, so cycles (including an alias that
/// names itself) fail with [`ResolveError::Cycle`] instead of looping.
///
/// ```
/// use emoji_dump::alias::resolve;
/// use indexmap::IndexMap;
///
/// let originals = IndexMap::from([("a".to_string(), "http://x/y.png".to_string())]);
/// let aliases = IndexMap::from([
///     ("b".to_string(), "a".to_string()),
///     ("c".to_string(), "b".to_string()),
/// ]);
/// assert_eq!(resolve("c", &originals, &aliases), Ok("a"));
/// ```
pub fn resolve<'a>(
    name: &str,
    originals: &'a IndexMap<String, String>,
    aliases: &'a IndexMap<String, String>,
) -> Result<&'a str, ResolveError> {
    let mut chain: IndexSet<&str> = IndexSet::new();
    let mut current = name;

    loop {
        if let Some((original, _)) = originals.get_key_value(current) {
            return Ok(original.as_str());
        }

        let Some(next) = aliases.get(current) else {
            return Err(ResolveError::NotFound {
                name: name.to_string(),
                missing: current.to_string(),
            });
        };

        if !chain.insert(current) {
            let mut names: Vec<String> = chain.iter().map(|s| s.to_string()).collect();
            names.push(current.to_string());
            return Err(ResolveError::Cycle { chain: names });
        }
        current = next.as_str();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_original_resolves_to_itself() {
        let originals = map(&[("a", "http://x/y.png")]);
        assert_eq!(resolve("a", &originals, &IndexMap::new()), Ok("a"));
    }

    #[test]
    fn test_chain_resolves_to_original() {
        let originals = map(&[("a", "http://x/y.png")]);
        let aliases = map(&[("b", "a"), ("c", "b")]);
        assert_eq!(resolve("c", &originals, &aliases), Ok("a"));
        assert_eq!(resolve("b", &originals, &aliases), Ok("a"));
    }

    #[test]
    fn test_two_name_cycle_terminates() {
        let aliases = map(&[("x", "y"), ("y", "x")]);
        let err = resolve("x", &IndexMap::new(), &aliases).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Cycle {
                chain: vec!["x".into(), "y".into(), "x".into()]
            }
        );
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let aliases = map(&[("me", "me")]);
        assert!(matches!(
            resolve("me", &IndexMap::new(), &aliases),
            Err(ResolveError::Cycle { .. })
        ));
    }

    #[test]
    fn test_cycle_reached_from_outside() {
        // tail -> x -> y -> x
        let aliases = map(&[("tail", "x"), ("x", "y"), ("y", "x")]);
        let err = resolve("tail", &IndexMap::new(), &aliases).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Cycle {
                chain: vec!["tail".into(), "x".into(), "y".into(), "x".into()]
            }
        );
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut aliases = IndexMap::new();
        for i in 0..100_000 {
            aliases.insert(format!("n{}", i), format!("n{}", i + 1));
        }
        let originals = map(&[("n100000", "http://x/end.png")]);
        assert_eq!(resolve("n0", &originals, &aliases), Ok("n100000"));
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let originals = map(&[("a", "http://x/y.png")]);
        let aliases = map(&[("b", "thumbsup")]);
        assert_eq!(
            resolve("b", &originals, &aliases),
            Err(ResolveError::NotFound {
                name: "b".into(),
                missing: "thumbsup".into()
            })
        );
    }
}
