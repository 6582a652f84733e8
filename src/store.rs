//! Files grouped by size, hashed only once a size is seen twice.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::mem;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::hasher::{Digest, hash_file};

/// All files of one exact size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeBucket {
    /// Only one file of this size so far; it has not been hashed.
    Pending(PathBuf),
    /// Two or more files of this size, grouped by digest in first-seen order.
    Hashed(BTreeMap<Digest, Vec<PathBuf>>),
}

#[derive(Debug, Default)]
pub struct SizeBucketStore {
    buckets: BTreeMap<u64, SizeBucket>,
    hashed_files: usize,
}

impl SizeBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path` under `size`, hashing with [`hash_file`] when needed.
    pub fn insert(&mut self, path: PathBuf, size: u64) -> Result<()> {
        self.insert_with(path, size, hash_file)
    }

    /// Records `path` under `size` using `hash` to compute digests.
    ///
    /// The first file of a size is parked as pending. The second one
    /// promotes the bucket: both files are hashed and the pending file moves
    /// into the digest map ahead of the newcomer. Later files are hashed on
    /// their own.
    pub fn insert_with<F>(&mut self, path: PathBuf, size: u64, mut hash: F) -> Result<()>
    where
        F: FnMut(&Path, u64) -> Result<Digest>,
    {
        let bucket = match self.buckets.entry(size) {
            Entry::Vacant(slot) => {
                slot.insert(SizeBucket::Pending(path));
                return Ok(());
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if let SizeBucket::Pending(first) = bucket {
            let digest = hash(first.as_path(), size)?;
            self.hashed_files += 1;
            let first = mem::take(first);
            *bucket = SizeBucket::Hashed(BTreeMap::from([(digest, vec![first])]));
        }

        let digest = hash(&path, size)?;
        self.hashed_files += 1;
        if let SizeBucket::Hashed(by_digest) = bucket {
            by_digest.entry(digest).or_default().push(path);
        }
        Ok(())
    }

    /// Buckets in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &SizeBucket)> {
        self.buckets.iter().map(|(size, bucket)| (*size, bucket))
    }

    pub fn get(&self, size: u64) -> Option<&SizeBucket> {
        self.buckets.get(&size)
    }

    /// Number of distinct file sizes seen.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// How many hash computations the store has requested.
    pub fn hashed_files(&self) -> usize {
        self.hashed_files
    }
}
