//! Record supplier over one file's bytes.

use bytes::Bytes;
use rand::Rng;
use std::borrow::Cow;
use std::iter::FusedIterator;
use thiserror::Error;

/// Reasons [`ChunkSupplier::sample`] has nothing to offer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("Supplier was not split into lines; there is no population to sample")]
    Unsplit,

    #[error("Supplier holds no records")]
    Empty,
}

/// Derived record stream for a single file.
///
/// Built once from a byte buffer and a split flag; the record set never
/// changes afterwards. Sequential consumption through [`Iterator::next`] is
/// single-pass, while [`ChunkSupplier::sample`] ignores the cursor and can be
/// called any number of times.
#[derive(Debug, Clone)]
pub struct ChunkSupplier {
    records: Vec<Bytes>,
    split: bool,
    cursor: usize,
}

impl ChunkSupplier {
    pub fn new(bytes: impl Into<Bytes>, split: bool) -> Self {
        let bytes = bytes.into();
        let records = if split {
            split_lines(&bytes)
        } else {
            vec![bytes]
        };
        Self {
            records,
            split,
            cursor: 0,
        }
    }

    /// Number of records, independent of how many were consumed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    pub fn records(&self) -> &[Bytes] {
        &self.records
    }

    /// Records not yet returned by `next`.
    pub fn remaining(&self) -> usize {
        self.records.len().saturating_sub(self.cursor)
    }

    /// Uniformly pick one record from the full record set.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Bytes, SampleError> {
        if !self.split {
            return Err(SampleError::Unsplit);
        }
        if self.records.is_empty() {
            return Err(SampleError::Empty);
        }
        let idx = rng.random_range(0..self.records.len());
        Ok(self.records[idx].clone())
    }
}

impl Iterator for ChunkSupplier {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        let record = self.records.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkSupplier {}

impl FusedIterator for ChunkSupplier {}

/// Split on `\n` / `\r\n`. Valid UTF-8 input is sliced without copying.
fn split_lines(bytes: &Bytes) -> Vec<Bytes> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    Bytes::new()
                } else {
                    bytes.slice_ref(line.as_bytes())
                }
            })
            .collect(),
        Cow::Owned(text) => text
            .lines()
            .map(|line| Bytes::copy_from_slice(line.as_bytes()))
            .collect(),
    }
}
