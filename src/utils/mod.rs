use std::time::Instant;
use tracing::info;

/// Logs how long a CLI command took when it goes out of scope.
pub struct Timer {
    what: String,
    since: Instant,
}

impl Timer {
    pub fn start(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            since: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("{} took {:.2?}", self.what, self.since.elapsed());
    }
}

/// Format a count with thousands separators, the way SAFER prints them.
pub fn fmt_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Fraction of 1 as a percentage with one decimal: 0.136 → "13.6%".
pub fn fmt_pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
