use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use bytewrap::{decode_value, next_wrap, unwrap, wrap, wrap_len, wraps, Value, Wrap, WrapError};

fn mixed_wraps() -> Vec<Bytes> {
    let mut map = HashMap::new();
    map.insert("k".to_string(), 9i64);
    vec![
        wrap(&42i64).unwrap(),
        wrap("stream").unwrap(),
        wrap(&true).unwrap(),
        wrap(&vec![1.5f32, 2.5]).unwrap(),
        wrap(&Bytes::from(vec![7u8; 400])).unwrap(),
        wrap(&map).unwrap(),
        wrap(&(-3i16)).unwrap(),
        wrap("").unwrap(),
    ]
}

#[test]
fn test_next_wrap_walks_whole_stream() {
    let parts = mixed_wraps();
    let stream: Vec<u8> = parts.iter().flat_map(|p| p.iter().copied()).collect();

    let mut offset = 0;
    let mut found = Vec::new();
    while offset < stream.len() {
        let range = next_wrap(&stream, offset).unwrap();
        found.push(stream[range.clone()].to_vec());
        offset = range.end;
    }
    assert_eq!(offset, stream.len());
    assert_eq!(found.len(), parts.len());
    for (a, b) in found.iter().zip(&parts) {
        assert_eq!(&a[..], &b[..]);
    }
}

#[test]
fn test_iterator_yields_original_wraps() {
    let parts = mixed_wraps();
    let mut writer = BytesMut::new();
    for p in &parts {
        writer.extend_from_slice(p);
    }
    let stream = writer.freeze();

    let found: Vec<&[u8]> = wraps(&stream).collect::<Result<_, _>>().unwrap();
    assert_eq!(found.len(), parts.len());
    for (a, b) in found.iter().zip(&parts) {
        assert_eq!(*a, &b[..]);
    }
}

#[test]
fn test_sequential_decode_of_record() {
    // a caller-defined record: id, name, tags
    let mut writer = BytesMut::new();
    7i32.wrap(&mut writer).unwrap();
    "widget".wrap(&mut writer).unwrap();
    vec!["a".to_string(), "b".to_string()].wrap(&mut writer).unwrap();
    let record = writer.freeze();

    let mut it = wraps(&record);
    let id: i32 = unwrap(it.next().unwrap().unwrap()).unwrap();
    let name: String = unwrap(it.next().unwrap().unwrap()).unwrap();
    let tags: Vec<String> = unwrap(it.next().unwrap().unwrap()).unwrap();
    assert!(it.next().is_none());
    assert_eq!((id, name.as_str(), tags.len()), (7, "widget", 2));
}

#[test]
fn test_decode_value_over_stream() {
    let values = vec![
        Value::Integer64(1),
        Value::Text("two".into()),
        Value::Float64(3.0),
        Value::Bytes(Bytes::from_static(b"4")),
        Value::Char(5),
    ];
    let mut writer = BytesMut::new();
    for v in &values {
        v.wrap(&mut writer).unwrap();
    }
    let decoded: Vec<Value> = wraps(&writer)
        .map(|w| decode_value(w.unwrap()).unwrap())
        .collect();
    assert_eq!(decoded, values);
}

#[test]
fn test_wrap_len_matches_each_part() {
    for part in mixed_wraps() {
        assert_eq!(wrap_len(&part).unwrap(), part.len());
    }
}

#[test]
fn test_scanner_failure_terminates_stream() {
    let mut stream = wrap(&1i32).unwrap().to_vec();
    stream.push(200);
    stream.extend_from_slice(&wrap(&2i32).unwrap());

    let results: Vec<_> = wraps(&stream).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(WrapError::InvalidDescriptor(200))));
}

#[test]
fn test_truncated_stream() {
    let mut stream = wrap("truncate me").unwrap().to_vec();
    stream.truncate(5);
    assert!(matches!(
        next_wrap(&stream, 0),
        Err(WrapError::LengthMismatch { expected: 13, actual: 5 })
    ));
}
