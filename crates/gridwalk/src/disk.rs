//! Disk map compaction.
//!
//! A disk map is a string of digits alternating between file lengths and
//! free-space lengths. File IDs count up from 0 in map order, one per file
//! entry (zero-length files included). A laid-out disk is a vector of blocks
//! holding `Some(file_id)` or `None` for free space.

use tracing::debug;

use crate::error::{Error, Result};

/// A contiguous run of blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start: usize,
    pub len: usize,
}

impl Extent {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskMap {
    /// Extent of file `id` at index `id`
    files: Vec<Extent>,
    /// Free spans, ordered by start
    free: Vec<Extent>,
    size: usize,
}

impl DiskMap {
    /// Parse the digit string. Non-blank lines are concatenated.
    pub fn parse<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files = Vec::new();
        let mut free = Vec::new();
        let mut size = 0;
        let mut is_file = true;

        for (index, line) in lines.into_iter().enumerate() {
            for (col, c) in line.as_ref().trim().chars().enumerate() {
                let len = c.to_digit(10).ok_or_else(|| {
                    Error::format(
                        index + 1,
                        format!("unexpected character {:?} at column {}", c, col + 1),
                    )
                })? as usize;
                let extent = Extent { start: size, len };
                if is_file {
                    files.push(extent);
                } else if len > 0 {
                    free.push(extent);
                }
                size += len;
                is_file = !is_file;
            }
        }

        if files.is_empty() {
            return Err(Error::format(1, "empty disk map"));
        }
        Ok(Self { files, free, size })
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total number of blocks, free space included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Blocks as laid out by the map.
    pub fn blocks(&self) -> Vec<Option<usize>> {
        layout(&self.files, self.size)
    }

    /// Move single blocks from the end of the disk into the leftmost free
    /// block until there are no gaps between file blocks.
    pub fn compact_blocks(&self) -> Vec<Option<usize>> {
        let mut blocks = self.blocks();
        let mut left = 0;
        let mut right = blocks.len();

        loop {
            while left < right && blocks[left].is_some() {
                left += 1;
            }
            while left < right && blocks[right - 1].is_none() {
                right -= 1;
            }
            if left >= right {
                break;
            }
            blocks.swap(left, right - 1);
        }

        blocks
    }

    /// Move whole files, highest ID first, each at most once, into the
    /// leftmost free span to their left that can hold them.
    pub fn compact_files(&self) -> Vec<Option<usize>> {
        let mut files = self.files.clone();
        let mut free = self.free.clone();
        let mut moved = 0;

        for file in files.iter_mut().rev() {
            if file.len == 0 {
                continue;
            }
            let target = free
                .iter_mut()
                .take_while(|span| span.start < file.start)
                .find(|span| span.len >= file.len);
            if let Some(span) = target {
                file.start = span.start;
                span.start += file.len;
                span.len -= file.len;
                moved += 1;
            }
        }

        debug!("moved {} of {} files", moved, files.len());
        layout(&files, self.size)
    }
}

fn layout(files: &[Extent], size: usize) -> Vec<Option<usize>> {
    let mut blocks = vec![None; size];
    for (id, file) in files.iter().enumerate() {
        blocks[file.start..file.end()].fill(Some(id));
    }
    blocks
}

/// Sum of block position times file ID over the occupied blocks.
pub fn checksum(blocks: &[Option<usize>]) -> u64 {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(pos, id)| id.map(|id| pos as u64 * id as u64))
        .sum()
}
