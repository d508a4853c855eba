//! Source information attached to parsed values

use crate::types::{FileId, Range};
use serde::{Deserialize, Serialize};

/// Where a value or token came from: a file and a range inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// The file this range belongs to
    pub file_id: FileId,
    /// The range in that file
    pub range: Range,
}

impl Default for SourceInfo {
    fn default() -> Self {
        SourceInfo::new(FileId(0), Range::default())
    }
}

impl SourceInfo {
    pub fn new(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn loc(offset: usize, row: usize, column: usize) -> Location {
        Location {
            offset,
            row,
            column,
        }
    }

    #[test]
    fn test_default_is_empty() {
        let info = SourceInfo::default();
        assert_eq!(info.file_id, FileId(0));
        assert!(info.range.is_empty());
    }

    #[test]
    fn test_source_info_serialization() {
        let info = SourceInfo::new(
            FileId(2),
            Range {
                start: loc(4, 0, 4),
                end: loc(9, 0, 9),
            },
        );
        let json = serde_json::to_string(&info).unwrap();
        let deserialized: SourceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }
}
