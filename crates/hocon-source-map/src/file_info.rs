//! Line index for offset lookups

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Line-break index over a source text
///
/// Stores the byte offset of every newline so that converting an offset
/// into a (row, column) pair is a binary search instead of a rescan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character in the file
    line_breaks: Vec<usize>,

    /// Total length of the file in bytes
    total_length: usize,
}

impl FileInformation {
    /// Build the index by scanning `content` once.
    ///
    /// # Example
    ///
    /// ```
    /// use hocon_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("a = 1\nb = 2");
    /// assert_eq!(info.line_count(), 2);
    /// ```
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .char_indices()
            .filter_map(|(idx, ch)| if ch == '\n' { Some(idx) } else { None })
            .collect();

        FileInformation {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset into a `Location`.
    ///
    /// `content` must be the text this index was built from; it is used to
    /// count characters (not bytes) for the column. Returns `None` when the
    /// offset is past the end of the text or not on a char boundary.
    ///
    /// # Example
    ///
    /// ```
    /// use hocon_source_map::FileInformation;
    ///
    /// let text = "hello\nwörld";
    /// let info = FileInformation::new(text);
    /// let loc = info.offset_to_location(9, text).unwrap();
    /// assert_eq!(loc.row, 1);
    /// assert_eq!(loc.column, 2);
    /// ```
    pub fn offset_to_location(&self, offset: usize, content: &str) -> Option<Location> {
        if offset > self.total_length || !content.is_char_boundary(offset) {
            return None;
        }

        // A newline belongs to the line it terminates.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };

        let line_start = if row == 0 {
            0
        } else {
            self.line_breaks[row - 1] + 1
        };

        let column = content.get(line_start..offset)?.chars().count();

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Get the total length of the file in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Get the number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
