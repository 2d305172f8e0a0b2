use std::io::Write;

use tempfile::NamedTempFile;

pub use tradeport::testkit::config::{PAPER_TOML, UNREACHABLE_BINANCE_TOML};

pub fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("tradeport-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file.flush().expect("flush temp config");
    file
}
