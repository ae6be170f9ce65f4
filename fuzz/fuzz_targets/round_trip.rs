#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = fgk_codec::encode(data).expect("failed to encode data!");
    let decoded = fgk_codec::decode(&encoded).expect("failed to decode data!");

    assert_eq!(data, decoded.as_slice());
});
