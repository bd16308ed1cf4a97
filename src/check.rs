//! Registration-time validation of citation specs.
//!
//! Every key a spec could ever produce must exist in the bibliography
//! before the spec may be attached to a target, so bad declarations fail at
//! load time rather than at first use.

use crate::bib::Bibliography;
use crate::cite::{Arity, CiteSpec, DynamicCite, KeySet, TargetSpec};
use crate::error::RegisterError;

/// Prove that `spec` is well-formed for `target` and that every key it
/// could produce exists in `store`. Runs exactly once, inside registration.
pub fn check_spec<A>(
    store: &Bibliography,
    target: &TargetSpec,
    spec: &CiteSpec<A>,
) -> Result<(), RegisterError> {
    let target_arity = match target.arity {
        Arity::Fixed(n) => n,
        Arity::Opaque => {
            return Err(RegisterError::UnwrappableTarget {
                target: target.name.clone(),
            })
        }
    };

    match (&spec.keys, &spec.dynamic) {
        (None, None) => Err(RegisterError::Configuration {
            target: target.name.clone(),
            supplied: "neither",
        }),
        (Some(_), Some(_)) => Err(RegisterError::Configuration {
            target: target.name.clone(),
            supplied: "both",
        }),
        (Some(keys), None) => check_static(store, target, keys),
        (None, Some(dynamic)) => check_dynamic(store, target, target_arity, dynamic.as_ref()),
    }
}

fn check_static(
    store: &Bibliography,
    target: &TargetSpec,
    keys: &KeySet,
) -> Result<(), RegisterError> {
    for key in keys {
        if !store.contains(key) {
            return Err(RegisterError::UnknownKey {
                key: key.clone(),
                signature: format!("{}()", target.name),
            });
        }
    }
    Ok(())
}

fn check_dynamic<A>(
    store: &Bibliography,
    target: &TargetSpec,
    target_arity: usize,
    dynamic: &dyn DynamicCite<A>,
) -> Result<(), RegisterError> {
    if dynamic.arity() != target_arity {
        return Err(RegisterError::SignatureMismatch {
            cite_fn: dynamic.name().to_string(),
            cite_arity: dynamic.arity(),
            target: target.name.clone(),
            target_arity,
        });
    }

    // Exhaustive probe: one call, flattened and checked key by key. Its
    // soundness is the citation function author's responsibility; only key
    // existence can be verified here.
    for (label, keys) in dynamic.exhaustive() {
        for key in keys {
            if !store.contains(&key) {
                return Err(RegisterError::UnknownKey {
                    key,
                    signature: format!("{}({})", target.name, label),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::{CiteFn, CiteMap};

    fn store() -> Bibliography {
        Bibliography::parse("@misc{key1, note = {x}}\n@misc{key2, note = {y}}").unwrap()
    }

    fn keys(list: &[&str]) -> KeySet {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn dynamic_spec(arity: usize, probe_keys: &'static [&'static str]) -> CiteSpec<(i32,)> {
        CiteSpec::dynamic(CiteFn::new(
            "tests::cite",
            arity,
            move || {
                let mut m = CiteMap::new();
                m.insert("probe".into(), keys(probe_keys));
                m
            },
            |_args: &(i32,)| CiteMap::new(),
        ))
    }

    #[test]
    fn test_static_known_keys_pass() {
        let spec: CiteSpec<()> = CiteSpec::keys(["key1", "key2"]);
        assert!(check_spec(&store(), &TargetSpec::new("f", 0), &spec).is_ok());
    }

    #[test]
    fn test_static_unknown_key_fails() {
        let spec: CiteSpec<()> = CiteSpec::key("missing");
        let err = check_spec(&store(), &TargetSpec::new("f", 0), &spec).unwrap_err();
        match err {
            RegisterError::UnknownKey { key, signature } => {
                assert_eq!(key, "missing");
                assert_eq!(signature, "f()");
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn test_neither_form_fails() {
        let spec: CiteSpec<()> = CiteSpec::empty();
        assert!(matches!(
            check_spec(&store(), &TargetSpec::new("f", 0), &spec),
            Err(RegisterError::Configuration {
                supplied: "neither",
                ..
            })
        ));
    }

    #[test]
    fn test_both_forms_fail() {
        let spec = dynamic_spec(1, &["key1"]).with_keys(["key1"]);
        assert!(matches!(
            check_spec(&store(), &TargetSpec::new("f", 1), &spec),
            Err(RegisterError::Configuration {
                supplied: "both",
                ..
            })
        ));
    }

    #[test]
    fn test_opaque_target_fails() {
        let spec: CiteSpec<()> = CiteSpec::key("key1");
        assert!(matches!(
            check_spec(&store(), &TargetSpec::opaque("libc::min"), &spec),
            Err(RegisterError::UnwrappableTarget { .. })
        ));
    }

    #[test]
    fn test_arity_mismatch_fails() {
        let spec = dynamic_spec(2, &["key1"]);
        let err = check_spec(&store(), &TargetSpec::new("f", 1), &spec).unwrap_err();
        match err {
            RegisterError::SignatureMismatch {
                cite_arity,
                target_arity,
                ..
            } => {
                assert_eq!(cite_arity, 2);
                assert_eq!(target_arity, 1);
            }
            other => panic!("expected SignatureMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_unknown_key_names_label() {
        let spec = dynamic_spec(1, &["ghost"]);
        let err = check_spec(&store(), &TargetSpec::new("f", 1), &spec).unwrap_err();
        match err {
            RegisterError::UnknownKey { key, signature } => {
                assert_eq!(key, "ghost");
                assert_eq!(signature, "f(probe)");
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_known_keys_pass() {
        let spec = dynamic_spec(1, &["key1", "key2"]);
        assert!(check_spec(&store(), &TargetSpec::new("f", 1), &spec).is_ok());
    }
}
