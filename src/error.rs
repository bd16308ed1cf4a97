//! Registration-time error taxonomy.

use thiserror::Error;

/// Errors raised while registering a citation spec against a target.
///
/// Every variant fires synchronously inside registration, before the target
/// can ever be called. Once registration succeeds, invocation never raises
/// an engine-originated error: a failing tracked call propagates its own
/// failure unmodified and records nothing.
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The spec supplied both or neither of its two forms.
    #[error(
        "citation spec for `{target}` must supply either a static key set \
         or a dynamic citation function, not {supplied}"
    )]
    Configuration {
        target: String,
        supplied: &'static str,
    },

    /// A key the spec could produce is absent from the bibliography.
    #[error("citation key {key:?} not in bibliography, but occurs for {signature}")]
    UnknownKey { key: String, signature: String },

    /// The dynamic citation function's parameter count does not match the
    /// tracked target's.
    #[error(
        "citation function `{cite_fn}` has {cite_arity} parameter(s) but tracked \
         function `{target}` has {target_arity}; the counts must match"
    )]
    SignatureMismatch {
        cite_fn: String,
        cite_arity: usize,
        target: String,
        target_arity: usize,
    },

    /// The target's parameter count is opaque (native, variadic, or a
    /// constructor), so neither the arity check nor the exhaustive probe
    /// can run.
    #[error("cannot track `{target}`: parameter count is opaque; wrap it in a plain function")]
    UnwrappableTarget { target: String },
}
