//! Variable expansion for loaded values.
//!
//! Supports `${NAME}` syntax where `NAME` is one or more of `[A-Za-z0-9_]`.
//! Anything else starting with `$` is kept literally.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

use super::{LoadError, LoadedSet};

/// Resolves all `${NAME}` references in the set against the set itself.
///
/// References are resolved depth-first, so chained references resolve fully and
/// the result does not depend on the order keys are visited in. A substituted
/// value is scanned again until no reference is left, which resolves references
/// formed by joining replacement text with the text around it. Returns an error
/// if a reference names an unknown key or if references form a cycle. On error
/// the set is left unchanged.
pub fn expand(set: &mut LoadedSet) -> Result<(), LoadError> {
    let raw: BTreeMap<String, String> = set
        .iter()
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect();

    let mut resolver = Resolver {
        raw: &raw,
        resolved: HashMap::new(),
        stack: Vec::new(),
        in_progress: HashSet::new(),
    };
    for key in raw.keys() {
        resolver.resolve(key)?;
    }

    let mut resolved = resolver.resolved;
    for (key, entry) in set.entries_mut() {
        if let Some(value) = resolved.remove(key.as_str()) {
            entry.value = value;
        }
    }
    Ok(())
}

/// A key whose value is being expanded.
struct Frame<'a> {
    key: &'a str,
    value: String,
    passes: usize,
}

/// Resolves keys with an explicit work stack, so chain length is bounded by
/// memory rather than by the thread's stack.
struct Resolver<'a> {
    raw: &'a BTreeMap<String, String>,
    /// Fully expanded values. None of them contains a reference.
    resolved: HashMap<&'a str, String>,
    /// Keys whose resolution is in progress, outermost first.
    stack: Vec<Frame<'a>>,
    in_progress: HashSet<&'a str>,
}

impl<'a> Resolver<'a> {
    fn resolve(&mut self, root: &'a str) -> Result<(), LoadError> {
        if self.resolved.contains_key(root) {
            return Ok(());
        }

        self.push(root);
        while let Some(frame) = self.stack.last() {
            let pending = self.next_pending(frame)?;
            match pending {
                Some(name) => self.push(name),
                None => self.substitute_top()?,
            }
        }
        Ok(())
    }

    fn push(&mut self, key: &'a str) {
        let value = self.raw.get(key).cloned().unwrap_or_default();
        self.in_progress.insert(key);
        self.stack.push(Frame {
            key,
            value,
            passes: 0,
        });
    }

    /// Returns the first key referenced by `frame` that is not resolved yet.
    fn next_pending(&self, frame: &Frame<'a>) -> Result<Option<&'a str>, LoadError> {
        let raw = self.raw;
        for (_, name) in references(&frame.value) {
            let Some((declared, _)) = raw.get_key_value(name) else {
                return Err(LoadError::UndeclaredVariable {
                    name: name.to_string(),
                    key: frame.key.to_string(),
                });
            };
            if self.resolved.contains_key(declared.as_str()) {
                continue;
            }
            if self.in_progress.contains(declared.as_str()) {
                return Err(self.cycle(declared));
            }
            return Ok(Some(declared.as_str()));
        }
        Ok(None)
    }

    /// Replaces the references of the top frame, all of which are resolved.
    ///
    /// The frame is finished once its value holds no reference; otherwise it
    /// stays on the stack to be scanned again.
    fn substitute_top(&mut self) -> Result<(), LoadError> {
        let Some(mut frame) = self.stack.pop() else {
            return Ok(());
        };

        frame.value = substitute(&frame.value, &self.resolved);
        if references(&frame.value).next().is_none() {
            self.in_progress.remove(frame.key);
            self.resolved.insert(frame.key, frame.value);
            return Ok(());
        }

        frame.passes += 1;
        let key = frame.key;
        let exhausted = frame.passes > self.raw.len();
        self.stack.push(frame);
        if exhausted {
            return Err(self.cycle(key));
        }
        Ok(())
    }

    /// Builds the chain from the in-progress occurrence of `name` back to it.
    fn cycle(&self, name: &str) -> LoadError {
        let start = self
            .stack
            .iter()
            .position(|frame| frame.key == name)
            .unwrap_or(0);
        let mut chain: Vec<String> = self.stack[start..]
            .iter()
            .map(|frame| frame.key.to_string())
            .collect();
        chain.push(name.to_string());
        LoadError::CircularReference { chain }
    }
}

/// Replaces every `${NAME}` in `value` with its resolved value.
///
/// Names without a resolved value are kept literally.
fn substitute(value: &str, resolved: &HashMap<&str, String>) -> String {
    let mut result = String::with_capacity(value.len());
    let mut segment = 0;

    for (span, name) in references(value) {
        let Some(replacement) = resolved.get(name) else {
            continue;
        };
        result.push_str(&value[segment..span.start]);
        result.push_str(replacement);
        segment = span.end;
    }

    result.push_str(&value[segment..]);
    result
}

/// Yields every `${NAME}` in `value` with the byte range it occupies.
fn references(value: &str) -> References<'_> {
    References { value, pos: 0 }
}

struct References<'a> {
    value: &'a str,
    pos: usize,
}

impl<'a> Iterator for References<'a> {
    type Item = (Range<usize>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.value.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            self.pos += 1;
            if bytes[start] != b'$' || bytes.get(start + 1) != Some(&b'{') {
                continue;
            }

            let name_start = start + 2;
            let mut name_end = name_start;
            while bytes.get(name_end).is_some_and(|b| is_name_byte(*b)) {
                name_end += 1;
            }

            if name_end > name_start && bytes.get(name_end) == Some(&b'}') {
                self.pos = name_end + 1;
                return Some((start..self.pos, &self.value[name_start..name_end]));
            }
        }
        None
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::Entry;

    fn make_set(pairs: &[(&str, &str)]) -> LoadedSet {
        let mut set = LoadedSet::default();
        for (line, (key, value)) in pairs.iter().enumerate() {
            set.insert(Entry {
                key: key.to_string(),
                value: value.to_string(),
                annotation: None,
                source: None,
                line: line + 1,
            });
        }
        set
    }

    #[test]
    fn test_simple_reference() {
        let mut set = make_set(&[("HOST", "localhost"), ("URL", "http://${HOST}/api")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("URL"), Some("http://localhost/api"));
    }

    #[test]
    fn test_multiple_references() {
        let mut set = make_set(&[("X", "16"), ("Y", "abc"), ("BOTH", "${X} ${Y}")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("BOTH"), Some("16 abc"));
    }

    #[test]
    fn test_repeated_reference() {
        let mut set = make_set(&[("A", "x"), ("B", "${A}${A}-${A}")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("B"), Some("xx-x"));
    }

    #[test]
    fn test_chained_references() {
        let mut set = make_set(&[("C", "${B}!"), ("B", "${A} world"), ("A", "hello")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("C"), Some("hello world!"));
        assert_eq!(set.value("B"), Some("hello world"));
    }

    #[test]
    fn test_undeclared_variable() {
        let mut set = make_set(&[("URL", "${MISSING}/path")]);
        let result = expand(&mut set);
        assert!(matches!(
            result,
            Err(LoadError::UndeclaredVariable { ref name, ref key }) if name == "MISSING" && key == "URL"
        ));
        assert_eq!(set.value("URL"), Some("${MISSING}/path"));
    }

    #[test]
    fn test_self_reference() {
        let mut set = make_set(&[("A", "${A}")]);
        let result = expand(&mut set);
        assert!(matches!(
            result,
            Err(LoadError::CircularReference { ref chain }) if chain == &["A", "A"]
        ));
    }

    #[test]
    fn test_circular_reference() {
        let mut set = make_set(&[("A", "${B}"), ("B", "${C}"), ("C", "${A}")]);
        let result = expand(&mut set);
        assert!(matches!(
            result,
            Err(LoadError::CircularReference { ref chain }) if chain == &["A", "B", "C", "A"]
        ));
    }

    #[test]
    fn test_non_matching_patterns_are_literal() {
        let mut set = make_set(&[
            ("A", "value"),
            ("PLAIN", "$A and $ and $$"),
            ("EMPTY", "${}"),
            ("DASH", "${A-B}"),
            ("OPEN", "${A"),
        ]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("PLAIN"), Some("$A and $ and $$"));
        assert_eq!(set.value("EMPTY"), Some("${}"));
        assert_eq!(set.value("DASH"), Some("${A-B}"));
        assert_eq!(set.value("OPEN"), Some("${A"));
    }

    #[test]
    fn test_reference_formed_by_replacement_is_resolved() {
        let mut set = make_set(&[("OPEN", "${"), ("B", "x"), ("C", "${OPEN}B}")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("C"), Some("x"));
        assert_eq!(set.value("OPEN"), Some("${"));
    }

    #[test]
    fn test_inner_reference_names_outer_one() {
        let mut set = make_set(&[("A", "B"), ("B", "x"), ("NESTED", "${${A}}")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("NESTED"), Some("x"));

        let mut set = make_set(&[("A", "value"), ("NESTED", "${${A}}")]);
        let result = expand(&mut set);
        assert!(matches!(
            result,
            Err(LoadError::UndeclaredVariable { ref name, ref key }) if name == "value" && key == "NESTED"
        ));
    }

    #[test]
    fn test_cycle_formed_by_replacement() {
        let mut set = make_set(&[("OPEN", "${"), ("C", "${OPEN}C}")]);
        let result = expand(&mut set);
        assert!(matches!(
            result,
            Err(LoadError::CircularReference { ref chain }) if chain == &["C", "C"]
        ));
        assert_eq!(set.value("C"), Some("${OPEN}C}"));
    }

    #[test]
    fn test_long_chain_resolves() {
        const LEN: usize = 50_000;

        let mut set = LoadedSet::default();
        for i in 0..LEN {
            let value = if i + 1 == LEN {
                "end".to_string()
            } else {
                format!("${{K{:05}}}", i + 1)
            };
            set.insert(Entry {
                key: format!("K{i:05}"),
                value,
                annotation: None,
                source: None,
                line: i + 1,
            });
        }

        expand(&mut set).unwrap();
        assert_eq!(set.value("K00000"), Some("end"));
        assert_eq!(set.value("K25000"), Some("end"));
    }

    #[test]
    fn test_long_cycle_is_reported() {
        const LEN: usize = 50_000;

        let mut set = LoadedSet::default();
        for i in 0..LEN {
            set.insert(Entry {
                key: format!("K{i:05}"),
                value: format!("${{K{:05}}}", (i + 1) % LEN),
                annotation: None,
                source: None,
                line: i + 1,
            });
        }

        match expand(&mut set) {
            Err(LoadError::CircularReference { chain }) => {
                assert_eq!(chain.len(), LEN + 1);
                assert_eq!(chain.first().map(String::as_str), Some("K00000"));
                assert_eq!(chain.last().map(String::as_str), Some("K00000"));
            }
            other => panic!("expected CircularReference, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_to_empty_value() {
        let mut set = make_set(&[("EMPTY", ""), ("V", "[${EMPTY}]")]);
        expand(&mut set).unwrap();
        assert_eq!(set.value("V"), Some("[]"));
    }
}
