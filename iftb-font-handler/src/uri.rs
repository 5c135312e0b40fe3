// Copyright 2024-2025 Monotype Imaging Inc.
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Chunk URI templates.
//!
//! The IFTB table's URI strings are templates over the chunk index: `$d`
//! for `d` in 1..=8 expands to the d-th least-significant hex digit of the
//! index (lowercase, from its 8-digit zero-padded rendering), and `$$` is
//! a literal dollar sign. Any other escape is a malformed template.

use crate::error::FontIoError;

/// Renders a chunk URI from a template and a chunk index.
///
/// ```
/// use iftb_font_handler::uri::render_chunk_uri;
///
/// assert_eq!(render_chunk_uri("a/$2$1.bin", 0x0f).unwrap(), "a/0f.bin");
/// assert_eq!(render_chunk_uri("$$root/x", 7).unwrap(), "$root/x");
/// ```
pub fn render_chunk_uri(
    template: &str,
    index: u32,
) -> Result<String, FontIoError> {
    let hex = format!("{index:08x}");
    let digits = hex.as_bytes();
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '$' {
            rendered.push(c);
            continue;
        }
        match chars.next() {
            Some('$') => rendered.push('$'),
            Some(d @ '1'..='8') => {
                let place = d as usize - '0' as usize;
                rendered.push(digits[8 - place] as char);
            }
            Some(other) => return Err(FontIoError::BadUriTemplate(other)),
            None => return Err(FontIoError::UnterminatedUriTemplate),
        }
    }
    Ok(rendered)
}

/// The number of hex digits needed to render any chunk index below
/// `chunk_count`; what a packager should size its `$d` placeholders to.
pub fn hex_digits_for_chunk_count(chunk_count: u32) -> u32 {
    if chunk_count == 0 {
        return 1;
    }
    let bits = 32 - chunk_count.leading_zeros();
    (bits + 3) / 4
}

#[cfg(test)]
#[path = "uri_test.rs"]
mod tests;
