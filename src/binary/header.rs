// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Artifact header and footer structures.
//!
//! The header is 16 bytes of fixed-size fields, parsed before anything else.
//! It says which format version wrote the file and how long the compressed
//! payload and its decompressed JSON are, so a reader can refuse oversized
//! or truncated files before allocating anything.
//!
//! The footer is 8 bytes: a CRC32 over header + payload, then a magic number
//! ("TFSD", the header magic reversed). If the footer is wrong, something got
//! corrupted or truncated. Don't decompress it.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "DSFT" in ASCII (header)
pub const MAGIC: [u8; 4] = *b"DSFT";

/// Footer magic: "TFSD" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = *b"TFSD";

/// Current format version. Bump whenever the decoded JSON shape changes.
pub const VERSION: u8 = 1;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum artifact size on disk: 256 MiB
pub const MAX_ARTIFACT_SIZE: usize = 256 * 1024 * 1024;

/// Maximum decompressed payload: 1 GiB
pub const MAX_RAW_SIZE: usize = 1024 * 1024 * 1024;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const BROTLI: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_brotli(mut self) -> Self {
        self.0 |= Self::BROTLI;
        self
    }

    pub fn is_brotli(self) -> bool {
        self.0 & Self::BROTLI != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Artifact header (16 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub version: u8,
    pub flags: FormatFlags,
    /// Length of the payload as stored (compressed).
    pub payload_len: u32,
    /// Length of the payload after decompression.
    pub raw_len: u32,
}

impl ArtifactHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 2 (reserved) + 2*4 (u32s) = 16
    pub const SIZE: usize = 16;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        w.write_all(&[self.flags.0])?;
        w.write_all(&[0u8; 2])?; // reserved
        w.write_all(&self.payload_len.to_le_bytes())?;
        w.write_all(&self.raw_len.to_le_bytes())?;
        Ok(())
    }

    /// Read and check the magic. Version checking is left to the caller so
    /// `inspect` can still describe files from other versions.
    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected DSFT, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 12]; // 16 - 4 (magic)
        r.read_exact(&mut buf)?;

        Ok(Self {
            version: buf[0],
            flags: FormatFlags(buf[1]),
            // buf[2..4] is reserved
            payload_len: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            raw_len: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }

    /// Total artifact size implied by this header.
    pub fn total_size(&self) -> usize {
        Self::SIZE + self.payload_len as usize + ArtifactFooter::SIZE
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFooter {
    /// CRC32 of header + payload (everything before footer)
    pub crc32: u32,
}

impl ArtifactFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    /// Read the footer from the last 8 bytes of `bytes`.
    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;

        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected TFSD, got {:?}", magic),
            ));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}
