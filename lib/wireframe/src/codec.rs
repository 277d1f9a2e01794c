//! Primitive wire encoding shared by the reliable and datagram channels.
//!
//! Every value on the wire is big-endian. Strings carry a 1-byte length
//! prefix, maps and sequences a 4-byte length prefix. Collection lengths
//! are capped well below what a corrupt or hostile prefix could claim so a
//! bogus header cannot force an unbounded allocation.

use crate::error::{ErrorType, NetworkError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io::{Read, Write};

pub const MAX_COLLECTION_LEN: u32 = 1 << 20;
pub const MAX_STRING_LEN: usize = 255;

#[inline]
pub fn read_string<R: Read>(r: &mut R) -> Result<String, NetworkError> {
    let len = r.read_u8()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

#[inline]
pub fn write_string<W: Write>(w: &mut W, value: &str) -> Result<(), NetworkError> {
    let bytes = value.as_bytes();
    if bytes.len() > MAX_STRING_LEN {
        return Err(NetworkError::Fatal(ErrorType::StringTooLong(bytes.len())));
    }
    w.write_u8(bytes.len() as u8)?;
    w.write_all(bytes)?;
    Ok(())
}

#[inline]
fn check_len(len: u32) -> Result<usize, NetworkError> {
    if len > MAX_COLLECTION_LEN {
        return Err(NetworkError::Fatal(ErrorType::CollectionTooLarge(len as usize)));
    }
    Ok(len as usize)
}

pub fn read_seq<R, T>(
    r: &mut R,
    mut read_elem: impl FnMut(&mut R) -> Result<T, NetworkError>,
) -> Result<Vec<T>, NetworkError>
where
    R: Read,
{
    let len = check_len(r.read_u32::<BigEndian>()?)?;
    let mut out = Vec::with_capacity(len.min(1024));
    for _ in 0..len {
        out.push(read_elem(r)?);
    }
    Ok(out)
}

pub fn write_seq<W, T>(
    w: &mut W,
    items: &[T],
    mut write_elem: impl FnMut(&mut W, &T) -> Result<(), NetworkError>,
) -> Result<(), NetworkError>
where
    W: Write,
{
    if items.len() as u64 > MAX_COLLECTION_LEN as u64 {
        return Err(NetworkError::Fatal(ErrorType::CollectionTooLarge(items.len())));
    }
    w.write_u32::<BigEndian>(items.len() as u32)?;
    for item in items {
        write_elem(w, item)?;
    }
    Ok(())
}

pub fn read_map<R, K, V>(
    r: &mut R,
    mut read_key: impl FnMut(&mut R) -> Result<K, NetworkError>,
    mut read_value: impl FnMut(&mut R) -> Result<V, NetworkError>,
) -> Result<BTreeMap<K, V>, NetworkError>
where
    R: Read,
    K: Ord,
{
    let len = check_len(r.read_u32::<BigEndian>()?)?;
    let mut out = BTreeMap::new();
    for _ in 0..len {
        let key = read_key(r)?;
        let value = read_value(r)?;
        out.insert(key, value);
    }
    Ok(out)
}

pub fn write_map<W, K, V>(
    w: &mut W,
    map: &BTreeMap<K, V>,
    mut write_key: impl FnMut(&mut W, &K) -> Result<(), NetworkError>,
    mut write_value: impl FnMut(&mut W, &V) -> Result<(), NetworkError>,
) -> Result<(), NetworkError>
where
    W: Write,
    K: Ord,
{
    if map.len() as u64 > MAX_COLLECTION_LEN as u64 {
        return Err(NetworkError::Fatal(ErrorType::CollectionTooLarge(map.len())));
    }
    w.write_u32::<BigEndian>(map.len() as u32)?;
    for (key, value) in map.iter() {
        write_key(w, key)?;
        write_value(w, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "bomberperson").unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string(&mut cursor).unwrap(), "bomberperson");
    }

    #[test]
    fn test_string_empty() {
        let mut buf = Vec::new();
        write_string(&mut buf, "").unwrap();
        assert_eq!(buf, vec![0u8]);
    }

    #[test]
    fn test_string_too_long_fails_loudly() {
        let value = "x".repeat(256);
        let mut buf = Vec::new();
        let err = write_string(&mut buf, &value).unwrap_err();
        assert!(matches!(err, NetworkError::Fatal(ErrorType::StringTooLong(256))));
    }

    #[test]
    fn test_seq_roundtrip() {
        let mut buf = Vec::new();
        let items: Vec<u16> = vec![1, 2, 3, 4];
        write_seq(&mut buf, &items, |w, v| Ok(w.write_u16::<BigEndian>(*v)?)).unwrap();
        let mut cursor = Cursor::new(buf);
        let decoded = read_seq(&mut cursor, |r| Ok(r.read_u16::<BigEndian>()?)).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_map_roundtrip_ascending_keys() {
        let mut map = BTreeMap::new();
        map.insert(3u8, "c".to_string());
        map.insert(1u8, "a".to_string());
        map.insert(2u8, "b".to_string());

        let mut buf = Vec::new();
        write_map(
            &mut buf,
            &map,
            |w, k| Ok(w.write_u8(*k)?),
            |w, v| write_string(w, v),
        )
        .unwrap();

        // key 1 ("a") must be written before key 3 ("c")
        assert_eq!(buf[4], 1);

        let mut cursor = Cursor::new(buf);
        let decoded = read_map(
            &mut cursor,
            |r| Ok(r.read_u8()?),
            |r| read_string(r),
        )
        .unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn test_collection_too_large_rejected() {
        let mut buf = Vec::new();
        buf.write_u32::<BigEndian>(MAX_COLLECTION_LEN + 1).unwrap();
        let mut cursor = Cursor::new(buf);
        let err = read_seq(&mut cursor, |r| Ok(r.read_u8()?)).unwrap_err();
        assert!(matches!(err, NetworkError::Fatal(ErrorType::CollectionTooLarge(_))));
    }
}
