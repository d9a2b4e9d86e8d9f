// North American Braille ASCII codec

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The 64-cell table indexed by the six-dot bit pattern of a braille char.
const TABLE: &[u8; 64] = b" A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

static REVERSE: Lazy<HashMap<u8, u8>> = Lazy::new(|| {
    TABLE
        .iter()
        .enumerate()
        .map(|(dots, &ch)| (ch, dots as u8))
        .collect()
});

/// Convert Unicode braille to Braille ASCII.
///
/// Eight-dot cells are folded onto their six-dot pattern; characters outside
/// the braille block pass through unchanged.
pub fn unicode_to_ascii(unicode: &str) -> String {
    unicode
        .chars()
        .map(|c| {
            let code = c as u32;
            if (0x2800..=0x28FF).contains(&code) {
                TABLE[((code - 0x2800) & 0x3F) as usize] as char
            } else {
                c
            }
        })
        .collect()
}

/// Convert Braille ASCII back to Unicode braille.
///
/// Lowercase letters are read as their uppercase cells; characters without a
/// cell pass through unchanged.
pub fn ascii_to_unicode(ascii: &str) -> String {
    ascii
        .chars()
        .map(|c| {
            if !c.is_ascii() {
                return c;
            }
            match REVERSE.get(&(c as u8).to_ascii_uppercase()) {
                Some(&dots) => char::from_u32(0x2800 + dots as u32).unwrap_or(c),
                None => c,
            }
        })
        .collect()
}
