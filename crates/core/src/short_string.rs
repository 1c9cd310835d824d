//! Felt short strings - ASCII text of at most 31 bytes packed big-endian into one field element
//!
//! Player names travel this way both in snapshots and in `spawn`/`rename` calldata.

use crate::error::ShortStringError;

/// Longest text that fits in one felt
pub const MAX_SHORT_STRING_LEN: usize = 31;

/// Encode `text` as a `0x`-prefixed lowercase hex felt
///
/// ```
/// use grimblock_core::short_string::encode_short_string;
///
/// assert_eq!(encode_short_string("bob").unwrap(), "0x626f62");
/// assert_eq!(encode_short_string("").unwrap(), "0x0");
/// ```
pub fn encode_short_string(text: &str) -> Result<String, ShortStringError> {
    if let Some(ch) = text.chars().find(|c| !c.is_ascii()) {
        return Err(ShortStringError::NonAscii(ch));
    }
    if text.len() > MAX_SHORT_STRING_LEN {
        return Err(ShortStringError::TooLong {
            len: text.len(),
            max: MAX_SHORT_STRING_LEN,
        });
    }
    if text.is_empty() {
        return Ok("0x0".to_string());
    }
    let mut out = String::with_capacity(2 + text.len() * 2);
    out.push_str("0x");
    for b in text.bytes() {
        out.push_str(&format!("{b:02x}"));
    }
    Ok(out)
}

/// Decode a hex felt (with or without `0x`) back into text; zero decodes to `""`
pub fn decode_short_string(felt: &str) -> Result<String, ShortStringError> {
    let trimmed = felt.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .trim_start_matches('0');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ShortStringError::InvalidHex(felt.to_string()));
    }
    if digits.is_empty() {
        return Ok(String::new());
    }

    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let len = padded.len() / 2;
    if len > MAX_SHORT_STRING_LEN {
        return Err(ShortStringError::TooLong {
            len,
            max: MAX_SHORT_STRING_LEN,
        });
    }

    let mut text = String::with_capacity(len);
    for i in 0..len {
        let byte = u8::from_str_radix(&padded[i * 2..i * 2 + 2], 16)
            .map_err(|_| ShortStringError::InvalidHex(felt.to_string()))?;
        if !byte.is_ascii() {
            return Err(ShortStringError::NonAscii(byte as char));
        }
        text.push(byte as char);
    }
    Ok(text)
}
