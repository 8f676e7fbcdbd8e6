#![no_main]

use libfuzzer_sys::fuzz_target;

use ftdc_bson::decoder::{decode_document, DecodeMode};

// Fuzz target: BSON document decoder, both modes.
//
// Catches bugs in:
// - Size-field validation (undersized, oversized, negative)
// - Terminator checking at every nesting level
// - Element tag dispatch and skip lengths
// - Binary short-circuit slicing in FTDC mode
// - Timestamp expansion in FTDC mode
// - Deep nesting / stack handling
fuzz_target!(|data: &[u8]| {
    let _ = decode_document(data, DecodeMode::Standard);
    let _ = decode_document(data, DecodeMode::Ftdc);
});
