//! Citation specifications: what a tracked function cites, and how.
//!
//! A spec carries either a static key set, known entirely at registration,
//! or a dynamic citation function that decides per invocation which keys
//! were exercised. The registration target itself is described by a
//! [`TargetSpec`] with an explicitly declared arity, since parameter counts
//! cannot be introspected at runtime.

use std::collections::{BTreeMap, BTreeSet};

/// A set of citation keys.
pub type KeySet = BTreeSet<String>;

/// Mapping from signature label to the keys cited under that label.
///
/// The label is a short description of the call shape ("a=1"); ordered so
/// that call-signature labels come out deterministic.
pub type CiteMap = BTreeMap<String, KeySet>;

/// Union of all key sets across a mapping's values.
pub fn flatten_keys(map: &CiteMap) -> KeySet {
    map.values().flat_map(|keys| keys.iter().cloned()).collect()
}

/// A dynamic citation function.
///
/// `keys_for` computes, for one real invocation, which keys the call
/// exercised, keyed by signature label. `exhaustive` must return the union
/// of every mapping `keys_for` could ever produce, for any arguments; it is
/// called exactly once, at registration, to prove that every reachable key
/// exists in the bibliography. Exhaustiveness is the implementor's
/// responsibility - the checker verifies key existence, not branch coverage.
pub trait DynamicCite<A> {
    /// Qualified name, used in error messages.
    fn name(&self) -> &str;

    /// Declared parameter count; must equal the tracked target's arity.
    fn arity(&self) -> usize;

    /// Every label/key-set pair `keys_for` could ever produce.
    fn exhaustive(&self) -> CiteMap;

    /// The label/key-set pairs for one real invocation.
    fn keys_for(&self, args: &A) -> CiteMap;
}

/// A [`DynamicCite`] built from a pair of closures.
pub struct CiteFn<E, K> {
    name: String,
    arity: usize,
    exhaustive: E,
    keys_for: K,
}

impl<E, K> CiteFn<E, K> {
    pub fn new(name: impl Into<String>, arity: usize, exhaustive: E, keys_for: K) -> Self {
        Self {
            name: name.into(),
            arity,
            exhaustive,
            keys_for,
        }
    }
}

impl<A, E, K> DynamicCite<A> for CiteFn<E, K>
where
    E: Fn() -> CiteMap,
    K: Fn(&A) -> CiteMap,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn exhaustive(&self) -> CiteMap {
        (self.exhaustive)()
    }

    fn keys_for(&self, args: &A) -> CiteMap {
        (self.keys_for)(args)
    }
}

/// Declared parameter count of a registration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A plain function with a known, fixed parameter count.
    Fixed(usize),
    /// A target whose parameter count cannot be stated - native or variadic
    /// callables, constructors. Such targets cannot be tracked directly;
    /// wrap them in a plain function first.
    Opaque,
}

/// Describes a registration target: its qualified name and declared arity.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub name: String,
    pub arity: Arity,
}

impl TargetSpec {
    /// A plain function target with `arity` parameters.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity: Arity::Fixed(arity),
        }
    }

    /// A target whose parameter count cannot be stated. Registration of an
    /// opaque target always fails.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: Arity::Opaque,
        }
    }
}

/// What a tracked function cites.
///
/// Exactly one of the two forms must be supplied; a spec carrying both or
/// neither is rejected at registration. The spec is immutable once attached
/// to a target.
pub struct CiteSpec<A> {
    pub(crate) keys: Option<KeySet>,
    pub(crate) dynamic: Option<Box<dyn DynamicCite<A>>>,
}

impl<A> CiteSpec<A> {
    /// A spec with neither form. Invalid as-is; combine with `with_keys` or
    /// `with_dynamic`.
    pub fn empty() -> Self {
        Self {
            keys: None,
            dynamic: None,
        }
    }

    /// Static spec citing a single key.
    pub fn key(key: impl Into<String>) -> Self {
        Self::keys([key.into()])
    }

    /// Static spec citing a fixed key set.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::empty().with_keys(keys)
    }

    /// Dynamic spec driven by a citation function.
    pub fn dynamic(f: impl DynamicCite<A> + 'static) -> Self {
        Self::empty().with_dynamic(f)
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dynamic(mut self, f: impl DynamicCite<A> + 'static) -> Self {
        self.dynamic = Some(Box::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keys_unions_values() {
        let mut map = CiteMap::new();
        map.insert("a=1".into(), ["key1".to_string()].into());
        map.insert("b=1".into(), ["key1".to_string(), "key2".to_string()].into());
        let flat = flatten_keys(&map);
        assert_eq!(flat, ["key1".to_string(), "key2".to_string()].into());
    }

    #[test]
    fn test_flatten_keys_empty_map() {
        assert!(flatten_keys(&CiteMap::new()).is_empty());
    }

    #[test]
    fn test_cite_fn_delegates() {
        let f = CiteFn::new(
            "tests::cite",
            1,
            || {
                let mut m = CiteMap::new();
                m.insert("always".into(), ["key1".to_string()].into());
                m
            },
            |&(x,): &(i32,)| {
                let mut m = CiteMap::new();
                if x > 0 {
                    m.insert("always".into(), ["key1".to_string()].into());
                }
                m
            },
        );
        assert_eq!(f.name(), "tests::cite");
        assert_eq!(DynamicCite::<(i32,)>::arity(&f), 1);
        assert_eq!(DynamicCite::<(i32,)>::exhaustive(&f).len(), 1);
        assert!(f.keys_for(&(0,)).is_empty());
        assert_eq!(f.keys_for(&(3,)).len(), 1);
    }
}
