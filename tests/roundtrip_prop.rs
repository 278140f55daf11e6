use std::fs;

use proptest::collection::vec;
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // For any carrier bytes and any non-empty ordered list of payloads,
    // decode(encode(...)) returns the same files in the same order with
    // identical bytes.
    #[test]
    fn round_trip_preserves_every_payload(
        carrier in vec(any::<u8>(), 0..1024),
        payloads in vec(vec(any::<u8>(), 0..512), 1..6),
    ) {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let carrier_path = work.path().join("carrier.bin");
        fs::write(&carrier_path, &carrier).unwrap();

        let mut payload_paths = Vec::new();
        for (i, bytes) in payloads.iter().enumerate() {
            let path = work.path().join(format!("payload_{i}.bin"));
            fs::write(&path, bytes).unwrap();
            payload_paths.push(path);
        }

        let combined = stegtail::embed(
            &carrier_path,
            &payload_paths,
            work.path(),
            "combined.bin",
        ).unwrap();
        let written = stegtail::extract(&combined, out.path(), |_| false).unwrap();

        prop_assert_eq!(written.len(), payloads.len());
        for (path, expected) in written.iter().zip(&payloads) {
            prop_assert_eq!(&fs::read(path).unwrap(), expected);
        }
    }
}
