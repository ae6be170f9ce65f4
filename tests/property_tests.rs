use fgk_codec::bitstream_io::{BigEndian, BitWriter};
use fgk_codec::{decode, encode, Encoder};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_round_trip(input in prop::collection::vec(any::<u8>(), 0..2048)) {
        let encoded = encode(&input).unwrap();
        prop_assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_round_trip_small_alphabet(
        input in prop::collection::vec(0..4u8, 0..2048),
    ) {
        let encoded = encode(&input).unwrap();
        prop_assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_header_and_padding(input in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut bitwriter = BitWriter::endian(Vec::new(), BigEndian);
        let mut encoder = Encoder::new();
        encoder.encode_all(input.iter().copied(), &mut bitwriter).unwrap();

        let encoded = encode(&input).unwrap();
        let pad = encoded[0] & 0x7f;
        prop_assert_eq!(encoded[0] & 0x80, 0x80);
        prop_assert!(pad < 8);
        prop_assert_eq!(
            encoded.len() as u64 * 8,
            8 + encoder.bits_written() + u64::from(pad)
        );
    }

    #[test]
    fn test_tree_tracks_input(input in prop::collection::vec(0..64u8, 0..512)) {
        let mut bitwriter = BitWriter::endian(Vec::new(), BigEndian);
        let mut encoder = Encoder::new();
        encoder.encode_all(input.iter().copied(), &mut bitwriter).unwrap();

        let tree = encoder.tree();
        let mut distinct = input.clone();
        distinct.sort_unstable();
        distinct.dedup();

        prop_assert!(tree.validate().is_ok());
        prop_assert_eq!(tree.total_weight(), input.len() as u64);
        prop_assert_eq!(tree.leaf_count(), distinct.len());
    }

    #[test]
    fn test_deterministic(input in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(encode(&input).unwrap(), encode(&input).unwrap());
    }

    #[test]
    fn test_garbage_never_panics(stream in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&stream);
    }
}
