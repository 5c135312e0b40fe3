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

//! Brotli codec for chunk payloads.

use super::CompressionError;

/// Compresses a chunk payload with brotli.
pub fn compress_chunk(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut compressed = Vec::new();
    let params = ::brotli::enc::BrotliEncoderParams::default();
    ::brotli::BrotliCompress(
        &mut std::io::Cursor::new(data),
        &mut compressed,
        &params,
    )?;
    Ok(compressed)
}

/// Decompresses a fetched chunk payload.
pub fn decompress_chunk(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decompressed = Vec::new();
    ::brotli::BrotliDecompress(
        &mut std::io::Cursor::new(data),
        &mut decompressed,
    )?;
    Ok(decompressed)
}

#[cfg(test)]
#[path = "brotli_test.rs"]
mod tests;
