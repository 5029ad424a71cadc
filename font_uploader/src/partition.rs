//! Payload partitioning
//!
//! The payload is cut into `count` contiguous pieces of `len / count`
//! characters each, with the last piece absorbing the remainder. The
//! contract stores partitions by index, so these boundaries must not change.

use crate::error::{Result, UploadError};
use serde::Serialize;

/// Partition count used by the font contracts
pub const DEFAULT_PARTITION_COUNT: usize = 5;

/// One ordered slice of the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Partition<'a> {
    pub index: usize,
    pub content: &'a str,
}

impl Partition<'_> {
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Split `payload` into `count` ordered partitions
///
/// Lengths are counted in characters. Payloads shorter than `count` give
/// empty leading partitions, and an empty payload gives `count` empty ones.
pub fn partition(payload: &str, count: usize) -> Result<Vec<Partition<'_>>> {
    if count == 0 {
        return Err(UploadError::InvalidInput(
            "partition count must be at least 1".to_string(),
        ));
    }

    let size = payload.chars().count() / count;
    let mut partitions = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let end = if index + 1 == count {
            payload.len()
        } else {
            byte_offset(payload, (index + 1) * size)
        };
        partitions.push(Partition {
            index,
            content: &payload[start..end],
        });
        start = end;
    }
    Ok(partitions)
}

fn byte_offset(payload: &str, char_pos: usize) -> usize {
    if payload.is_ascii() {
        return char_pos.min(payload.len());
    }
    payload
        .char_indices()
        .nth(char_pos)
        .map(|(offset, _)| offset)
        .unwrap_or(payload.len())
}
