#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary streams may be rejected, but must never panic. Whatever decodes must re-encode to
// a stream that decodes to the same bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(decoded) = fgk_codec::decode(data) {
        let encoded = fgk_codec::encode(&decoded).expect("failed to encode data!");
        assert_eq!(fgk_codec::decode(&encoded).ok(), Some(decoded));
    }
});
