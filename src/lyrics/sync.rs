use std::sync::LazyLock;

use regex::Regex;

/// Decides whether lyrics text is time-synchronized.
pub trait SyncPredicate {
    fn is_synchronized(&self, text: &str) -> bool;
}

impl<F> SyncPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn is_synchronized(&self, text: &str) -> bool {
        self(text)
    }
}

// Leading bracket tags ([ar:...], [offset:...]) may precede the timestamp.
static LRC_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:\[[^\]\[]*\])*?\[\d+:\d{2}(?:[.:]\d+)?\]")
        .inspect_err(|e| tracing::error!(error = %e, "LRC timestamp pattern rejected"))
        .ok()
});

/// LRC-style lines: `[mm:ss]`, `[mm:ss.xx]` or `[m:ss:xx]` prefixes.
///
/// One timestamped line is enough for the whole text to count.
#[derive(Debug, Default, Clone, Copy)]
pub struct LrcTimestamps;

impl SyncPredicate for LrcTimestamps {
    fn is_synchronized(&self, text: &str) -> bool {
        LRC_LINE.as_ref().is_some_and(|re| re.is_match(text))
    }
}
