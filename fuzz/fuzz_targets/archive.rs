#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full archive decode pipeline.
//
// Walks every batch out of `decode_archive(data)` on arbitrary input.
// Catches bugs in:
// - Envelope size peeking and slicing
// - Envelope field extraction (_id, type, data)
// - Zlib inflation and the decompressed-size cap
// - Reference document parsing and metric flattening
// - Delta decoding and sample reconstruction
// - Iterator fusing after an error
fuzz_target!(|data: &[u8]| {
    for batch in ftdc_decoder::decode_archive(data) {
        if batch.is_err() {
            break;
        }
    }
});
