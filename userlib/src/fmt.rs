//! Integer and string conversions for command-line arguments.

use alloc::string::{String, ToString};

/// Parse the leading decimal digits of `s`.
///
/// Parsing stops at the first non-digit, so `"12ab"` gives 12 and `""`
/// gives 0. Never fails; values past `i32::MAX` wrap.
pub fn parse_int(s: &str) -> i32 {
    s.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(i32::from(digit - b'0'))
        })
}

/// Decimal representation of `x`.
pub fn int_to_string(x: i32) -> String {
    x.to_string()
}
