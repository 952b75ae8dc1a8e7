#![no_main]
use libfuzzer_sys::fuzz_target;
use projup::{ProjectConverter, RewriteRules};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let rules = RewriteRules::default();
        let converter = ProjectConverter::new("Fuzz.csproj", &rules);
        if let Ok(once) = converter.convert_str(s) {
            // Output of a successful run must convert to itself
            let twice = converter.convert_str(&once);
            assert_eq!(twice.as_deref(), Ok(once.as_str()));
        }
    }
});
