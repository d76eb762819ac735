pub mod result_ext;

use std::fmt::Write as _;

/// Uppercase hex with a space between each byte, `D1 01 07`
pub fn hex_spaced(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let mut out = String::with_capacity(bytes.len() * 3);

    for (index, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if index > 0 {
            out.push(' ');
        }

        // hex output is always ascii
        out.push(pair[0] as char);
        out.push(pair[1] as char);
    }

    out
}

/// Render a raw memory image one page per line, `Page 4: 03 0B D1 01`
///
/// A trailing partial page is rendered with the bytes it has. A `page_size`
/// of 0 is treated as 1
pub fn hex_pages(bytes: &[u8], page_size: usize) -> String {
    let mut out = String::new();

    for (page, chunk) in bytes.chunks(page_size.max(1)).enumerate() {
        let _ = writeln!(out, "Page {page}: {}", hex_spaced(chunk));
    }

    out
}
