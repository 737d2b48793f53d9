//! Codec failures.

use thiserror::Error;

/// Why a container could not be written or read.
///
/// Decoding fails closed: any of these means no actions were produced.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("missing header magic `ZIR`")]
    MissingHeaderMagic,

    #[error("missing end marker `ZIR$`")]
    MissingEndMarker,

    #[error("container truncated: {len} bytes, need at least {min}", min = crate::MIN_CONTAINER_LEN)]
    Truncated { len: usize },

    #[error("unknown locale tag {tag}")]
    UnknownLocale { tag: u8 },

    #[error("failed to serialize story actions: {0}")]
    Serialize(#[source] bincode::Error),

    #[error("failed to compress story actions: {0}")]
    Compress(#[source] std::io::Error),

    #[error("failed to decompress payload: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to deserialize story actions: {0}")]
    Deserialize(#[source] bincode::Error),

    #[error("actions nest deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("payload ends inside a blocking or forked action list")]
    UnterminatedList,

    #[error("uncompressed payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
}
