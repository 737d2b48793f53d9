//! Zeile Codec - compressed binary container for [`StoryIr`].
//!
//! # Layout
//!
//! ```text
//! offset 0   "ZIR"         custom magic, replaces the first 3 LZ4 magic bytes
//! offset 3   0x18          last LZ4 magic byte, kept
//! offset 4   u64 LE        metadata word; low byte = locale tag
//! offset 12  ...           LZ4 frame descriptor and blocks
//! end - 4    "ZIR$"        custom end marker, replaces the LZ4 end mark
//! ```
//!
//! The payload is the bincode encoding of the action list in its flat
//! pre-order form (see [`MAX_NESTING`]), fed to the LZ4 frame encoder in
//! 1024-byte pages. Apart from the patched markers and the spliced metadata
//! word the compressed bytes are a standard LZ4 frame. The uncompressed
//! payload may not exceed [`MAX_PLAIN_LEN`] bytes.

mod error;
mod wire;

use std::io::{Read, Write};

use lz4_flex::frame::{BlockSize, FrameDecoder, FrameEncoder, FrameInfo};
use tracing::debug;
use zeile_ir::{Locale, StoryIr};

pub use error::CodecError;
pub use wire::MAX_NESTING;

use wire::WireAction;

/// Replaces the leading bytes of the LZ4 frame magic.
pub const HEADER_MAGIC: [u8; 3] = *b"ZIR";

/// Replaces the LZ4 end mark.
pub const END_MARKER: [u8; 4] = *b"ZIR$";

/// Size of the chunks handed to the compressor.
pub const PAGE_SIZE: usize = 1024;

/// Largest uncompressed payload either direction accepts.
pub const MAX_PLAIN_LEN: usize = 16 * 1024 * 1024;

const LZ4_MAGIC: [u8; 4] = 0x184D_2204_u32.to_le_bytes();
const LZ4_END_MARK: [u8; 4] = [0; 4];
const METADATA_OFFSET: usize = 4;
const METADATA_LEN: usize = 8;

/// Magic, metadata word and end marker.
pub const MIN_CONTAINER_LEN: usize = METADATA_OFFSET + METADATA_LEN + END_MARKER.len();

/// Encode a story into a container.
///
/// Floats are stored bit for bit, so a NaN survives the trip but the
/// decoded story then compares unequal to the original under `==`.
#[tracing::instrument(level = "debug", skip_all, fields(actions = ir.actions().len()))]
pub fn encode(ir: &StoryIr) -> Result<Vec<u8>, CodecError> {
    let flat = wire::flatten(ir.actions())?;
    let plain = bincode::serialize(&flat).map_err(CodecError::Serialize)?;
    if plain.len() > MAX_PLAIN_LEN {
        return Err(CodecError::PayloadTooLarge {
            limit: MAX_PLAIN_LEN,
        });
    }

    let container = frame(&plain, ir.locale())?;
    debug!(
        plain = plain.len(),
        encoded = container.len(),
        "encoded story container"
    );
    Ok(container)
}

/// Compress `plain` and wrap it in the container markers.
fn frame(plain: &[u8], locale: Locale) -> Result<Vec<u8>, CodecError> {
    let info = FrameInfo::new().block_size(BlockSize::Max64KB);
    let mut encoder = FrameEncoder::with_frame_info(info, Vec::new());
    for page in plain.chunks(PAGE_SIZE) {
        encoder.write_all(page).map_err(CodecError::Compress)?;
    }
    let frame = encoder
        .finish()
        .map_err(|e| CodecError::Compress(e.into()))?;

    let mut container = Vec::with_capacity(frame.len() + METADATA_LEN);
    container.extend_from_slice(&HEADER_MAGIC);
    container.extend_from_slice(&frame[HEADER_MAGIC.len()..METADATA_OFFSET]);
    container.extend_from_slice(&metadata_word(locale).to_le_bytes());
    container.extend_from_slice(&frame[METADATA_OFFSET..frame.len() - LZ4_END_MARK.len()]);
    container.extend_from_slice(&END_MARKER);
    Ok(container)
}

/// Decode a container produced by [`encode`].
///
/// See [`encode`] for how NaN floats compare after the trip.
#[tracing::instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<StoryIr, CodecError> {
    if !bytes.starts_with(&HEADER_MAGIC) {
        return Err(CodecError::MissingHeaderMagic);
    }
    if bytes.len() < MIN_CONTAINER_LEN {
        return Err(CodecError::Truncated { len: bytes.len() });
    }
    if !bytes.ends_with(&END_MARKER) {
        return Err(CodecError::MissingEndMarker);
    }

    let mut word = [0; METADATA_LEN];
    word.copy_from_slice(&bytes[METADATA_OFFSET..METADATA_OFFSET + METADATA_LEN]);
    let tag = word[0];
    let locale = Locale::from_tag(tag).ok_or(CodecError::UnknownLocale { tag })?;

    let payload = &bytes[METADATA_OFFSET + METADATA_LEN..bytes.len() - END_MARKER.len()];
    let mut frame = Vec::with_capacity(payload.len() + LZ4_MAGIC.len() + LZ4_END_MARK.len());
    frame.extend_from_slice(&LZ4_MAGIC);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&LZ4_END_MARK);

    let mut plain = Vec::new();
    FrameDecoder::new(frame.as_slice())
        .take(MAX_PLAIN_LEN as u64 + 1)
        .read_to_end(&mut plain)
        .map_err(CodecError::Decompress)?;
    if plain.len() > MAX_PLAIN_LEN {
        return Err(CodecError::PayloadTooLarge {
            limit: MAX_PLAIN_LEN,
        });
    }
    let flat: Vec<WireAction> = bincode::deserialize(&plain).map_err(CodecError::Deserialize)?;
    let actions = wire::unflatten(flat)?;

    debug!(actions = actions.len(), "decoded story container");
    Ok(StoryIr::from_parts(locale, actions))
}

/// Whether `bytes` starts and ends like a container. Does not validate the
/// payload.
pub fn is_container(bytes: &[u8]) -> bool {
    bytes.len() >= MIN_CONTAINER_LEN
        && bytes.starts_with(&HEADER_MAGIC)
        && bytes.ends_with(&END_MARKER)
}

fn metadata_word(locale: Locale) -> u64 {
    u64::from(locale.tag())
}

#[cfg(test)]
mod tests;
