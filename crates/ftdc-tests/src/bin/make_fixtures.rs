//! Writes sample FTDC archives to disk for manual CLI runs.
//!
//! ```bash
//! cargo run --bin make_fixtures -p ftdc-tests -- [out_dir]
//! ```
//!
//! # Generated fixtures
//!
//! | File               | Contents                                        |
//! |--------------------|-------------------------------------------------|
//! | small.ftdc         | 1 metadata + 2 metrics chunks, 4 metrics x 5    |
//! | counters.ftdc      | 60 chunks of monotonically increasing counters  |
//! | truncated.ftdc     | counters.ftdc cut mid-envelope (invalid input)  |

use std::path::PathBuf;

use ftdc_tests::fixture;

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("target/fixtures"), PathBuf::from);
    std::fs::create_dir_all(&out_dir).expect("create fixture directory");

    let small = fixture::archive(&[
        fixture::metadata_envelope(1_615_774_908_000),
        fixture::metrics_envelope(
            1_615_774_918_000,
            &[
                ("start", 1_615_774_918_000),
                ("serverStatus.opcounters.insert", 0),
                ("serverStatus.opcounters.query", 100),
                ("serverStatus.connections.current", 12),
            ],
            &[
                vec![1_000, 1_000, 1_000, 1_000, 1_000],
                vec![3, 5, 2, 0, 7],
                vec![40, 38, 0, 0, 45],
                vec![0, 1, 0, -1, 0],
            ],
        ),
        fixture::metrics_envelope(
            1_615_774_923_000,
            &[
                ("start", 1_615_774_923_000),
                ("serverStatus.opcounters.insert", 17),
                ("serverStatus.opcounters.query", 223),
                ("serverStatus.connections.current", 12),
            ],
            &[
                vec![1_000; 5],
                vec![4, 4, 4, 4, 4],
                vec![0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0],
            ],
        ),
    ]);
    write(&out_dir, "small.ftdc", &small);

    let mut envelopes = vec![fixture::metadata_envelope(0)];
    for c in 0..60i64 {
        envelopes.push(fixture::metrics_envelope(
            c * 1_000,
            &[("uptime", c * 10), ("ops", c * 300)],
            &[vec![1; 10], vec![30; 10]],
        ));
    }
    let counters = fixture::archive(&envelopes);
    write(&out_dir, "counters.ftdc", &counters);

    let truncated = &counters[..counters.len() - 40];
    write(&out_dir, "truncated.ftdc", truncated);
}

fn write(dir: &std::path::Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    println!("{}  ({} bytes)", path.display(), bytes.len());
}
