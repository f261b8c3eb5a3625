//! Test fixtures for tagfix tests.
//!
//! Builds minimal but valid audio files (MP3, FLAC, M4A) and PNG images in
//! memory so tests never depend on binary files checked into the repo.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{png_bytes, silent_flac};
//!
//! #[test]
//! fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let path = silent_flac(dir.path(), "song.flac");
//!     crate::tags::write_cover(&path, &png_bytes(500, 500), "image/png").unwrap();
//! }
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Seconds of audio every fixture claims to hold
pub const FIXTURE_SECONDS: u32 = 180;

const SAMPLE_RATE: u32 = 44_100;

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Encode an RGB image of the given size as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("Failed to encode PNG");
    out
}

// ============================================================================
// MP3
// ============================================================================

/// A run of silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz).
fn mpeg_frames(count: usize) -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    frame.repeat(count)
}

/// Untagged MP3 of silence.
pub fn silent_mp3(dir: &Path, name: &str) -> PathBuf {
    write_fixture(dir, name, &mpeg_frames(100))
}

fn syncsafe(n: usize) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

/// MP3 whose ID3v2.4 tag carries a SYLT frame and no USLT frame.
pub fn synced_frame_mp3(dir: &Path, name: &str) -> PathBuf {
    let mut sylt = vec![0x03]; // UTF-8
    sylt.extend_from_slice(b"eng");
    sylt.extend_from_slice(&[0x02, 0x01]); // milliseconds, lyrics
    sylt.push(0x00); // empty content descriptor
    sylt.extend_from_slice(b"Hello\0");
    sylt.extend_from_slice(&1000u32.to_be_bytes());

    let mut frame = b"SYLT".to_vec();
    frame.extend_from_slice(&syncsafe(sylt.len()));
    frame.extend_from_slice(&[0x00, 0x00]);
    frame.extend_from_slice(&sylt);

    let mut bytes = b"ID3".to_vec();
    bytes.extend_from_slice(&[0x04, 0x00, 0x00]);
    bytes.extend_from_slice(&syncsafe(frame.len()));
    bytes.extend_from_slice(&frame);
    bytes.extend_from_slice(&mpeg_frames(100));
    write_fixture(dir, name, &bytes)
}

// ============================================================================
// FLAC
// ============================================================================

/// STREAMINFO payload: stereo, 16-bit, 44.1 kHz, 180 s.
fn streaminfo() -> Vec<u8> {
    let total_samples = SAMPLE_RATE * FIXTURE_SECONDS;

    let mut info = vec![0x10, 0x00, 0x10, 0x00]; // block sizes
    info.extend_from_slice(&[0x00; 6]); // frame sizes unknown
    // 20 bits sample rate, 3 bits channels-1, 5 bits bps-1, 36 bits samples
    info.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0]);
    info.extend_from_slice(&total_samples.to_be_bytes());
    info.extend_from_slice(&[0x00; 16]); // MD5
    info
}

fn flac_block(kind: u8, last: bool, payload: &[u8]) -> Vec<u8> {
    let flag = if last { 0x80 } else { 0x00 };
    let len = (payload.len() as u32).to_be_bytes();
    let mut out = vec![flag | kind, len[1], len[2], len[3]];
    out.extend_from_slice(payload);
    out
}

/// FLAC laid out the way encoders write it: STREAMINFO, then PADDING.
pub fn silent_flac(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&flac_block(0, false, &streaminfo()));
    bytes.extend_from_slice(&flac_block(1, true, &[0u8; 1024]));
    write_fixture(dir, name, &bytes)
}

/// FLAC whose only metadata block is STREAMINFO, with no room for tags.
pub fn bare_streaminfo_flac(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&flac_block(0, true, &streaminfo()));
    write_fixture(dir, name, &bytes)
}

// ============================================================================
// M4A
// ============================================================================

fn atom(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn atoms(kind: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    atom(kind, &children.concat())
}

const IDENTITY_MATRIX: [u32; 9] = [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000];

fn matrix() -> Vec<u8> {
    IDENTITY_MATRIX
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect()
}

fn mvhd() -> Vec<u8> {
    let mut p = vec![0u8; 12]; // version/flags, creation, modification
    p.extend_from_slice(&1000u32.to_be_bytes());
    p.extend_from_slice(&(1000 * FIXTURE_SECONDS).to_be_bytes());
    p.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate
    p.extend_from_slice(&0x0100u16.to_be_bytes()); // volume
    p.extend_from_slice(&[0u8; 10]);
    p.extend_from_slice(&matrix());
    p.extend_from_slice(&[0u8; 24]);
    p.extend_from_slice(&2u32.to_be_bytes()); // next track id
    atom(b"mvhd", &p)
}

fn tkhd() -> Vec<u8> {
    let mut p = vec![0x00, 0x00, 0x00, 0x07];
    p.extend_from_slice(&[0u8; 8]);
    p.extend_from_slice(&1u32.to_be_bytes()); // track id
    p.extend_from_slice(&[0u8; 4]);
    p.extend_from_slice(&(1000 * FIXTURE_SECONDS).to_be_bytes());
    p.extend_from_slice(&[0u8; 8]);
    p.extend_from_slice(&[0u8; 4]); // layer, alternate group
    p.extend_from_slice(&0x0100u16.to_be_bytes());
    p.extend_from_slice(&[0u8; 2]);
    p.extend_from_slice(&matrix());
    p.extend_from_slice(&[0u8; 8]); // width, height
    atom(b"tkhd", &p)
}

fn mdhd() -> Vec<u8> {
    let mut p = vec![0u8; 12];
    p.extend_from_slice(&SAMPLE_RATE.to_be_bytes());
    p.extend_from_slice(&(SAMPLE_RATE * FIXTURE_SECONDS).to_be_bytes());
    p.extend_from_slice(&0x55C4u16.to_be_bytes()); // "und"
    p.extend_from_slice(&[0u8; 2]);
    atom(b"mdhd", &p)
}

fn hdlr() -> Vec<u8> {
    let mut p = vec![0u8; 8];
    p.extend_from_slice(b"soun");
    p.extend_from_slice(&[0u8; 12]);
    p.push(0);
    atom(b"hdlr", &p)
}

/// AAC-LC, stereo, 44.1 kHz, 128 kbps
fn esds() -> Vec<u8> {
    let decoder_specific = [0x05, 0x02, 0x12, 0x10];
    let mut decoder_config = vec![0x40, 0x15, 0x00, 0x00, 0x00];
    decoder_config.extend_from_slice(&128_000u32.to_be_bytes());
    decoder_config.extend_from_slice(&128_000u32.to_be_bytes());
    decoder_config.extend_from_slice(&decoder_specific);

    let mut es = vec![0x00, 0x01, 0x00];
    es.push(0x04);
    es.push(decoder_config.len() as u8);
    es.extend_from_slice(&decoder_config);
    es.extend_from_slice(&[0x06, 0x01, 0x02]);

    let mut p = vec![0u8; 4];
    p.push(0x03);
    p.push(es.len() as u8);
    p.extend_from_slice(&es);
    atom(b"esds", &p)
}

fn stsd() -> Vec<u8> {
    let mut entry = vec![0u8; 6];
    entry.extend_from_slice(&1u16.to_be_bytes()); // data reference index
    entry.extend_from_slice(&[0u8; 8]);
    entry.extend_from_slice(&2u16.to_be_bytes()); // channels
    entry.extend_from_slice(&16u16.to_be_bytes()); // sample size
    entry.extend_from_slice(&[0u8; 4]);
    entry.extend_from_slice(&(SAMPLE_RATE << 16).to_be_bytes());
    entry.extend_from_slice(&esds());

    let mut p = vec![0u8; 4];
    p.extend_from_slice(&1u32.to_be_bytes());
    p.extend_from_slice(&atom(b"mp4a", &entry));
    atom(b"stsd", &p)
}

/// Untagged M4A (AAC-LC sample description, 180 s, no audio samples).
pub fn silent_m4a(dir: &Path, name: &str) -> PathBuf {
    let mut ftyp = b"M4A ".to_vec();
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"M4A mp42isom");

    let empty_table = [0u8; 8];
    let stbl = atoms(
        b"stbl",
        &[
            stsd(),
            atom(b"stts", &empty_table),
            atom(b"stsc", &empty_table),
            atom(b"stsz", &[0u8; 12]),
            atom(b"stco", &empty_table),
        ],
    );
    let minf = atoms(b"minf", &[atom(b"smhd", &[0u8; 8]), stbl]);
    let mdia = atoms(b"mdia", &[mdhd(), hdlr(), minf]);
    let trak = atoms(b"trak", &[tkhd(), mdia]);
    let moov = atoms(b"moov", &[mvhd(), trak]);

    let bytes = [atom(b"ftyp", &ftyp), moov, atom(b"mdat", &[0u8; 16])].concat();
    write_fixture(dir, name, &bytes)
}

// ============================================================================
// Non-audio
// ============================================================================

/// Plain text behind an audio extension.
pub fn non_audio_file(dir: &Path, name: &str) -> PathBuf {
    let text = "This is a plain text file pretending to be audio.\n".repeat(40);
    write_fixture(dir, name, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_bytes_decode() {
        let png = png_bytes(12, 7);
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    #[test]
    fn test_fixtures_written() {
        let dir = tempfile::tempdir().unwrap();
        for path in [
            silent_mp3(dir.path(), "a.mp3"),
            silent_flac(dir.path(), "b.flac"),
            bare_streaminfo_flac(dir.path(), "f.flac"),
            silent_m4a(dir.path(), "c.m4a"),
            synced_frame_mp3(dir.path(), "d.mp3"),
            non_audio_file(dir.path(), "e.mp3"),
        ] {
            assert!(path.metadata().unwrap().len() > 0);
        }
    }

    #[test]
    fn test_syncsafe() {
        assert_eq!(syncsafe(0x7F), [0, 0, 0, 0x7F]);
        assert_eq!(syncsafe(0x80), [0, 0, 1, 0]);
    }
}
