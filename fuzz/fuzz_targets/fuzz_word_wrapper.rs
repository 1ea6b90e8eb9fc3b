#![no_main]

use libfuzzer_sys::fuzz_target;
use wwcore::primitives::display_width;
use wwcore::{Spacing, WordWrapArgs, WordWrapper, WrapConfig, WrapError};

fuzz_target!(|data: &[u8]| {
    let Some((&width_byte, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 2048 {
        return;
    }

    let width = usize::from(width_byte);
    let configs = [
        WrapConfig::default(),
        WrapConfig::default().with_line_min_word_count(0),
        WrapConfig::default().with_split_words_between_lines(true),
    ];

    for config in configs {
        let Ok(mut wrapper) = WordWrapper::with_cell_width(config) else {
            return;
        };
        let args = WordWrapArgs::new(text, width).with_spacing(Spacing::none());

        match wrapper.wrap(&args) {
            Ok(wrapped) => {
                // A second call must come back identical from the cache.
                let again = wrapper.wrap(&args);
                assert_eq!(again.ok().as_deref(), Some(wrapped.as_str()));
                let _ = display_width(&wrapped);
            }
            // Width 0 and NUL bytes are rejected up front.
            Err(WrapError::InvalidArgs { .. }) => {
                assert!(width == 0 || text.contains('\0'));
            }
            Err(other) => panic!("unexpected wrap error: {other}"),
        }
    }
});
