//! BCS payloads returned by `devInspect` calls.

use crate::error::DecodeError;
use serde::Deserialize;
use suitrump_domain::type_tag::normalize_type_string;

/// `0x1::type_name::TypeName` as laid out in BCS.
#[derive(Debug, Deserialize)]
struct TypeNameBcs {
    name: String,
}

fn malformed(type_tag: &str, err: impl std::fmt::Display) -> DecodeError {
    DecodeError::Malformed {
        type_tag: type_tag.to_string(),
        reason: err.to_string(),
    }
}

/// Reads a Move string.
///
/// Properly encoded strings carry a ULEB128 length prefix. Some callers hand
/// over bare character codes instead; those are read byte by byte.
pub fn read_string(bytes: &[u8]) -> String {
    match bcs::from_bytes::<String>(bytes) {
        Ok(s) => s,
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Reads a `bool`: a single byte, nonzero is true.
pub fn read_bool(bytes: &[u8]) -> Result<bool, DecodeError> {
    match bytes {
        [b] => Ok(*b != 0),
        _ => Err(malformed("bool", format!("expected 1 byte, got {}", bytes.len()))),
    }
}

/// Reads a 32-byte address as `0x`-prefixed hex.
pub fn read_address(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.len() != 32 {
        return Err(malformed(
            "address",
            format!("expected 32 bytes, got {}", bytes.len()),
        ));
    }
    Ok(to_hex(bytes))
}

/// Reads a length-prefixed `vector<u8>`.
pub fn read_byte_vector(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    bcs::from_bytes::<Vec<u8>>(bytes).map_err(|e| malformed("vector<u8>", e))
}

/// Reads a `vector<TypeName>` into canonical type strings.
pub fn read_type_names(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    let names = bcs::from_bytes::<Vec<TypeNameBcs>>(bytes)
        .map_err(|e| malformed("vector<0x1::type_name::TypeName>", e))?;
    Ok(names
        .into_iter()
        .map(|t| normalize_type_string(&t.name))
        .collect())
}

/// Reads a single `TypeName`.
pub fn read_type_name(bytes: &[u8]) -> Result<String, DecodeError> {
    let name = bcs::from_bytes::<TypeNameBcs>(bytes)
        .map_err(|e| malformed("0x1::type_name::TypeName", e))?;
    Ok(normalize_type_string(&name.name))
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ULEB128 length prefix followed by the bytes.
    fn prefixed(data: &[u8]) -> Vec<u8> {
        let mut out = vec![data.len() as u8];
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_read_string_with_prefix() {
        assert_eq!(read_string(&prefixed(b"TRUMP")), "TRUMP");
    }

    #[test]
    fn test_read_string_bare_codes() {
        assert_eq!(read_string(b"SUI"), "SUI");
    }

    #[test]
    fn test_read_bool() {
        assert!(read_bool(&[1]).unwrap());
        assert!(read_bool(&[7]).unwrap());
        assert!(!read_bool(&[0]).unwrap());
        assert!(read_bool(&[]).is_err());
        assert!(read_bool(&[1, 0]).is_err());
    }

    #[test]
    fn test_read_address() {
        let mut bytes = [0u8; 32];
        bytes[31] = 2;
        let addr = read_address(&bytes).unwrap();
        assert_eq!(addr.len(), 66);
        assert!(addr.ends_with("02"));
        assert!(read_address(&bytes[..20]).is_err());
    }

    #[test]
    fn test_read_type_names() {
        let names = [
            "0000000000000000000000000000000000000000000000000000000000000002::sui::SUI",
            "0000000000000000000000000000000000000000000000000000000000000abc::trump::TRUMP",
        ];
        let mut bytes = vec![names.len() as u8];
        for name in names {
            bytes.extend(prefixed(name.as_bytes()));
        }
        let parsed = read_type_names(&bytes).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].starts_with("0x"));
        assert!(parsed[0].ends_with("::sui::SUI"));
        assert!(parsed[1].ends_with("::trump::TRUMP"));
    }

    #[test]
    fn test_read_byte_vector() {
        assert_eq!(read_byte_vector(&[3, 9, 8, 7]).unwrap(), vec![9, 8, 7]);
        assert!(read_byte_vector(&[3, 9]).is_err());
    }
}
