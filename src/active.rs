//! Active-bibliography extraction.
//!
//! An entry is active when at least one recorded call shape cited it. The
//! answer is re-derived from current log state on every call; nothing is
//! cached.

use crate::bib::Bibliography;
use crate::log::CitationLog;

/// Serialize the minimal subset of `store` that `log` marks as exercised.
///
/// An empty log yields empty text, never the full bibliography.
pub fn extract(store: &Bibliography, log: &CitationLog) -> String {
    if log.is_empty() {
        return String::new();
    }
    store.serialize(&log.used_keys())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::KeySet;

    fn store() -> Bibliography {
        Bibliography::parse("@misc{key1, note = {x}}\n@misc{key2, note = {y}}").unwrap()
    }

    fn keys(list: &[&str]) -> KeySet {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_log_yields_empty_text() {
        assert_eq!(extract(&store(), &CitationLog::new()), "");
    }

    #[test]
    fn test_extract_is_minimal() {
        let mut log = CitationLog::new();
        log.record("f()".into(), keys(&["key2"]));
        let text = extract(&store(), &log);
        assert!(text.contains("@misc{key2,"));
        assert!(!text.contains("key1"));
    }

    #[test]
    fn test_extract_rederives_from_current_state() {
        let store = store();
        let mut log = CitationLog::new();
        assert_eq!(extract(&store, &log), "");
        log.record("f()".into(), keys(&["key1"]));
        assert!(extract(&store, &log).contains("key1"));
    }
}
