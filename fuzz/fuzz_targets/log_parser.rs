#![no_main]

use casplot::parser::LogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed numbers must surface as errors, never as panics
        if let Ok(parser) = LogParser::new() {
            let _ = parser.parse_str("fuzz", input);
        }
    }
});
