//! Sanitizers that derive a replacement value from the original one.

use dbsan_core::DumpValue;

const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Re-derives a stable, anonymized UUIDv4 from the original value using
/// [`dbsan_session::hash_text`]. The nil UUID (with or without dashes) maps
/// to itself rather than being rehashed, matching the common convention
/// that a nil foreign key should stay nil after sanitization.
pub fn sanitize_uuid4(value: DumpValue) -> DumpValue {
    let DumpValue::Text(s) = value else {
        return value;
    };
    if s.is_empty() {
        return DumpValue::Text(s);
    }
    if s.replace('-', "") == NIL_UUID.replace('-', "") {
        return DumpValue::Text(NIL_UUID.to_string());
    }

    let digest = dbsan_session::hash_text(&s);
    let hex32 = &digest[..32];
    let mut bytes = [0u8; 16];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex32[i * 2..i * 2 + 2], 16).expect("hex digest bytes");
    }
    // Force RFC 4122 version 4 / variant bits, mirroring how a hex digest
    // is coerced into a version-4 UUID regardless of its actual randomness.
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;

    DumpValue::Text(uuid::Uuid::from_bytes(bytes).to_string())
}
