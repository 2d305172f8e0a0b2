//! Last-call diagnostics carried by every adapter.
//!
//! Adapters record the method, the raw payload they sent and the raw
//! payload they got back after every exchange call. When an operation fails
//! the rendered record travels up inside the error, so failures deep in
//! exchange-specific code stay debuggable without exposing transport types.
//!
//! All three fields are replaced under one lock, so a rendered string never
//! mixes two concurrent requests.

use parking_lot::Mutex;

/// Snapshot of the most recent exchange call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugRecord {
    pub method: String,
    pub sent: Vec<u8>,
    pub received: Vec<u8>,
}

impl DebugRecord {
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        sent: impl Into<Vec<u8>>,
        received: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            method: method.into(),
            sent: sent.into(),
            received: received.into(),
        }
    }

    /// Human-readable one-liner.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "method: {}, rd: {}, sd: {}",
            self.method,
            String::from_utf8_lossy(&self.received),
            String::from_utf8_lossy(&self.sent),
        )
    }
}

/// Thread-safe holder of the last [`DebugRecord`].
#[derive(Debug, Default)]
pub struct Diagnostics {
    last: Mutex<DebugRecord>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record with a completed call.
    pub fn record(
        &self,
        method: impl Into<String>,
        sent: impl Into<Vec<u8>>,
        received: impl Into<Vec<u8>>,
    ) {
        self.store(DebugRecord::new(method, sent, received));
    }

    /// Replace the record with one built by the caller.
    ///
    /// Use this when the rendered record must also go into an error: format
    /// the local record first, then store it.
    pub fn store(&self, record: DebugRecord) {
        *self.last.lock() = record;
    }

    /// Copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> DebugRecord {
        self.last.lock().clone()
    }

    /// Render the current record.
    #[must_use]
    pub fn format_error(&self) -> String {
        self.last.lock().format()
    }

    /// Forget the last call.
    pub fn clear(&self) {
        *self.last.lock() = DebugRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn format_lists_all_three_parts() {
        let diagnostics = Diagnostics::new();
        diagnostics.record("GET /depth", "symbol=ETHBTC", r#"{"code":-1121}"#);

        assert_eq!(
            diagnostics.format_error(),
            r#"method: GET /depth, rd: {"code":-1121}, sd: symbol=ETHBTC"#
        );
    }

    #[test]
    fn empty_record_formats() {
        assert_eq!(Diagnostics::new().format_error(), "method: , rd: , sd: ");
    }

    #[test]
    fn concurrent_writers_never_interleave() {
        let diagnostics = Arc::new(Diagnostics::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let diagnostics = Arc::clone(&diagnostics);
                thread::spawn(move || {
                    for i in 0..500 {
                        let tag = format!("w{worker}-{i}");
                        diagnostics.record(
                            format!("m-{tag}"),
                            format!("s-{tag}"),
                            format!("r-{tag}"),
                        );
                        let snapshot = diagnostics.snapshot();
                        let method_tag = snapshot.method.trim_start_matches("m-").to_string();
                        assert_eq!(snapshot.sent, format!("s-{method_tag}").into_bytes());
                        assert_eq!(snapshot.received, format!("r-{method_tag}").into_bytes());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
