//! Fixed-width base-36 section offsets codec.
//!
//! The index stores section start positions as one string of fixed-width
//! base-36 tokens, one per section plus a trailing sentinel equal to the
//! rule text's byte length. The width is a constant of the bundled
//! database format, not something inferred from the data.

use crate::error::{Error, Result};

/// Token width of the offsets encoding, in base-36 digits.
///
/// Four digits address rule texts up to 36^4 - 1 bytes. Loaders validate
/// the token count against the section indices the database references.
pub const TOKEN_WIDTH: usize = 4;

const MAX_OFFSET: usize = 36usize.pow(TOKEN_WIDTH as u32) - 1;

/// Decode an offsets string into section start positions.
///
/// The decoded sequence is non-decreasing; the final entry is the
/// end-sentinel. Fails on a length that is not a multiple of
/// [`TOKEN_WIDTH`], a non-base-36 token, or a decreasing value.
pub fn decode_offsets(encoded: &str) -> Result<Vec<usize>> {
    if !encoded.is_ascii() || encoded.len() % TOKEN_WIDTH != 0 {
        return Err(Error::OffsetLength(encoded.len()));
    }

    let mut offsets = Vec::with_capacity(encoded.len() / TOKEN_WIDTH);
    let mut previous = 0usize;

    for (i, token) in encoded.as_bytes().chunks(TOKEN_WIDTH).enumerate() {
        // from_str_radix accepts signs and uppercase; the format allows
        // neither, so gate on the digit alphabet first.
        if !token
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        {
            return Err(Error::OffsetToken(
                String::from_utf8_lossy(token).into_owned(),
            ));
        }
        let token_str = std::str::from_utf8(token)
            .map_err(|_| Error::OffsetToken(String::from_utf8_lossy(token).into_owned()))?;
        let value = usize::from_str_radix(token_str, 36)
            .map_err(|_| Error::OffsetToken(token_str.to_string()))?;

        if value < previous {
            return Err(Error::OffsetOrder(i));
        }
        previous = value;
        offsets.push(value);
    }

    Ok(offsets)
}

/// Encode section start positions into an offsets string.
///
/// Inverse of [`decode_offsets`]; used by the index generator and by
/// round-trip tests.
pub fn encode_offsets(offsets: &[usize]) -> Result<String> {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut out = String::with_capacity(offsets.len() * TOKEN_WIDTH);
    for &offset in offsets {
        if offset > MAX_OFFSET {
            return Err(Error::OffsetOverflow(offset));
        }
        let mut token = [b'0'; TOKEN_WIDTH];
        let mut rest = offset;
        for slot in token.iter_mut().rev() {
            *slot = DIGITS[rest % 36];
            rest /= 36;
        }
        for b in token {
            out.push(b as char);
        }
    }
    Ok(out)
}
