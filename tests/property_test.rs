//! Property-based tests using proptest
//!
//! Round-trip and stream-scanning invariants over randomly generated inputs.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use bytewrap::{decode_list, encode_list, next_wrap, unwrap, wrap, TypeKind, Value, Wrap};
use proptest::prelude::*;

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer64),
        any::<i32>().prop_map(Value::Integer32),
        any::<i16>().prop_map(Value::Integer16),
        any::<u16>().prop_map(Value::Char),
        any::<u32>().prop_map(|b| Value::Float32(f32::from_bits(b))),
        any::<u64>().prop_map(|b| Value::Float64(f64::from_bits(b))),
        any::<bool>().prop_map(Value::Boolean),
        prop::collection::vec(any::<u8>(), 0..600).prop_map(|b| Value::Bytes(Bytes::from(b))),
        ".{0,80}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn prop_f64_bits_round_trip(bits in any::<u64>()) {
        let v = f64::from_bits(bits);
        let back: f64 = unwrap(&wrap(&v).unwrap()).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn prop_f32_bits_round_trip(bits in any::<u32>()) {
        let v = f32::from_bits(bits);
        let back: f32 = unwrap(&wrap(&v).unwrap()).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn prop_string_round_trip(s in ".{0,300}") {
        let back: String = unwrap(&wrap(&s).unwrap()).unwrap();
        prop_assert_eq!(back, s);
    }

    #[test]
    fn prop_bytes_round_trip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        let back: Bytes = unwrap(&bytewrap::wrap_bytes(&data).unwrap()).unwrap();
        prop_assert_eq!(&back[..], &data[..]);
    }

    #[test]
    fn prop_i32_list_round_trip(items in prop::collection::vec(any::<i32>(), 0..200)) {
        let back: Vec<i32> = unwrap(&wrap(&items).unwrap()).unwrap();
        prop_assert_eq!(back, items);
    }

    #[test]
    fn prop_string_list_round_trip(items in prop::collection::vec(".{0,20}", 0..50)) {
        let back: Vec<String> = unwrap(&wrap(&items).unwrap()).unwrap();
        prop_assert_eq!(back, items);
    }

    #[test]
    fn prop_map_round_trip(map in prop::collection::hash_map(".{0,10}", any::<i64>(), 0..50)) {
        let back: HashMap<String, i64> = unwrap(&wrap(&map).unwrap()).unwrap();
        prop_assert_eq!(back, map);
    }

    #[test]
    fn prop_dynamic_list_round_trip(items in prop::collection::vec(any::<i16>(), 0..100)) {
        let values: Vec<Value> = items.into_iter().map(Value::from).collect();
        let bytes = encode_list(&values, TypeKind::Integer16).unwrap();
        prop_assert_eq!(decode_list(&bytes, TypeKind::Integer16).unwrap(), values);
    }

    #[test]
    fn prop_stream_scan_recovers_every_wrap(values in prop::collection::vec(scalar_value(), 0..40)) {
        let mut stream = BytesMut::new();
        let mut parts = Vec::new();
        for v in &values {
            let mut part = BytesMut::new();
            v.wrap(&mut part).unwrap();
            stream.extend_from_slice(&part);
            parts.push(part.freeze());
        }

        let mut offset = 0;
        let mut count = 0;
        while offset < stream.len() {
            let range = next_wrap(&stream, offset).unwrap();
            prop_assert_eq!(&stream[range.clone()], &parts[count][..]);
            let decoded: Value = unwrap(&stream[range.clone()]).unwrap();
            prop_assert_eq!(&decoded, &values[count]);
            offset = range.end;
            count += 1;
        }
        prop_assert_eq!(offset, stream.len());
        prop_assert_eq!(count, values.len());
    }
}
