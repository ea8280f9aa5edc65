#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    if let Ok(cfg) = insole_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A config that validates must map onto core types.
            let _ = insole_core::conversions::channels_from_config(&cfg.channels)
                .expect("validated channels convert");
            let _ = insole_core::conversions::curve_from_config(&cfg.curve, None);
        }
    }
});
