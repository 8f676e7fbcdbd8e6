#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ftdc_decoder::delta::{decode_deltas, integrate};
use ftdc_wire::reader::ByteReader;

// Fuzz target: delta stream decoding with arbitrary dimensions.
//
// Structured input keeps the metric/sample grid small enough to stay
// fast while the stream bytes remain fully arbitrary.
//
// Catches bugs in:
// - Zero-run accounting across metric boundaries
// - Overshooting runs at the end of the grid
// - Starvation detection (stream ends with slots unfilled)
// - Wrapping integration over bases
#[derive(Debug, Arbitrary)]
struct Input<'a> {
    num_metrics: u8,
    num_samples: u8,
    stream: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let num_metrics = usize::from(input.num_metrics);
    let num_samples = usize::from(input.num_samples);

    let mut r = ByteReader::new(input.stream);
    if let Ok(deltas) = decode_deltas(&mut r, num_metrics, num_samples) {
        let bases = vec![i64::MAX; num_metrics];
        let values = integrate(&deltas, &bases, num_samples);
        assert_eq!(values.len(), num_metrics * num_samples);
    }
});
