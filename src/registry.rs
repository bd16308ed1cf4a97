//! Registration and invocation tracking.
//!
//! A [`Registry`] owns the bibliography store handle and the citation log.
//! [`Registry::register`] validates a spec against a target, then hands back
//! a [`Tracked`] adapter that invokes the original function and records its
//! citations on every successful call.

use std::sync::{Arc, Mutex};

use crate::active;
use crate::bib::Bibliography;
use crate::check;
use crate::cite::{flatten_keys, CiteMap, CiteSpec, TargetSpec};
use crate::error::RegisterError;
use crate::log::CitationLog;

/// Binds citation specs to target functions and owns the citation log.
pub struct Registry {
    store: Arc<Bibliography>,
    log: Arc<Mutex<CitationLog>>,
    roster: Mutex<Vec<String>>,
}

impl Registry {
    pub fn new(store: Bibliography) -> Self {
        Self {
            store: Arc::new(store),
            log: Arc::new(Mutex::new(CitationLog::new())),
            roster: Mutex::new(Vec::new()),
        }
    }

    /// The bibliography the registry validates against.
    pub fn store(&self) -> &Bibliography {
        &self.store
    }

    /// Snapshot of the current citation log.
    pub fn citations(&self) -> CitationLog {
        self.log.lock().expect("citation log lock poisoned").clone()
    }

    /// Qualified names of every successfully registered target, in
    /// registration order.
    pub fn tracked_targets(&self) -> Vec<String> {
        self.roster.lock().expect("roster lock poisoned").clone()
    }

    /// Validate `spec` against `target` and wrap `func` for tracking.
    ///
    /// Every spec problem surfaces here, before the target can ever be
    /// called: an opaque target, a spec with both or neither form, an
    /// unknown key (static or reachable through the exhaustive probe), or a
    /// citation-function arity mismatch.
    ///
    /// The returned adapter holds its own handle to the registry's log; the
    /// caller may keep an independent reference to `func`'s source.
    pub fn register<F, A, R>(
        &self,
        target: TargetSpec,
        spec: CiteSpec<A>,
        func: F,
    ) -> Result<Tracked<F, A>, RegisterError>
    where
        F: Fn(&A) -> R,
    {
        check::check_spec(&self.store, &target, &spec)?;
        self.roster
            .lock()
            .expect("roster lock poisoned")
            .push(target.name.clone());
        Ok(Tracked {
            func,
            name: target.name,
            spec,
            log: Arc::clone(&self.log),
        })
    }

    /// BibTeX text for the minimal subset of entries exercised so far.
    pub fn active_bibliography(&self) -> String {
        let log = self.log.lock().expect("citation log lock poisoned");
        active::extract(&self.store, &log)
    }
}

/// Adapter around a tracked function, created by [`Registry::register`].
pub struct Tracked<F, A> {
    func: F,
    name: String,
    spec: CiteSpec<A>,
    log: Arc<Mutex<CitationLog>>,
}

impl<F, A> Tracked<F, A> {
    /// Qualified name the adapter records under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the tracked function and record its citations.
    pub fn call<R>(&self, args: A) -> R
    where
        F: Fn(&A) -> R,
    {
        let out = (self.func)(&args);
        self.record(&args);
        out
    }

    /// Invoke a fallible tracked function. An `Err` propagates unchanged
    /// and records nothing.
    pub fn try_call<T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(&A) -> Result<T, E>,
    {
        let out = (self.func)(&args);
        if out.is_ok() {
            self.record(&args);
        }
        out
    }

    fn record(&self, args: &A) {
        let cites: CiteMap = match (&self.spec.keys, &self.spec.dynamic) {
            // Static keys go under the single empty signature label.
            (Some(keys), None) => std::iter::once((String::new(), keys.clone())).collect(),
            (None, Some(dynamic)) => dynamic.keys_for(args),
            // register() enforces exactly one form.
            _ => unreachable!("spec validated at registration"),
        };

        let keys = flatten_keys(&cites);
        if keys.is_empty() {
            return;
        }

        let labels: Vec<&str> = cites.keys().map(String::as_str).collect();
        let label = format!("{}({})", self.name, labels.join(", "));

        // The lock spans the whole merge, so concurrent callers serialize
        // on the log instance.
        self.log
            .lock()
            .expect("citation log lock poisoned")
            .record(label, keys);
    }
}
