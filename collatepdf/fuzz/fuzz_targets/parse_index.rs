#![no_main]

use collatepdf::config::Config;
use collatepdf::index::{Index, pretty_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Parsing never panics; directives that parse always apply and render.
    if let Ok(index) = Index::parse(&text) {
        let mut config = Config::default();
        config.apply_all(index.settings());
        let _ = config.validate();
        let _ = config.to_json();
    }

    for line in text.lines() {
        let _ = pretty_name(line, true);
    }
});
