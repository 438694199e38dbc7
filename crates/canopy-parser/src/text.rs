/// Maps byte offsets to line/column positions.
///
/// Built once per input. Lines are separated by `\n`; a preceding `\r`
/// belongs to the terminator, not to a column of its own line's content,
/// but columns are plain byte offsets so it counts like any other byte.
#[derive(Debug)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub(crate) fn new(input: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, &b) in input.iter().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: input.len(),
        }
    }

    /// 1-based line and 0-based byte column for `offset`. `None` when the
    /// offset lies beyond the input (one past the end is still valid, so
    /// end-of-input errors resolve).
    pub(crate) fn line_col(&self, offset: usize) -> Option<(usize, usize)> {
        if offset > self.len {
            return None;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Some((line + 1, offset - self.line_starts[line]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maps_offsets_to_lines_and_columns() {
        let lines = LineIndex::new(b"ab\ncd\n\ne");
        assert_eq!(lines.line_col(0), Some((1, 0)));
        assert_eq!(lines.line_col(2), Some((1, 2)));
        assert_eq!(lines.line_col(3), Some((2, 0)));
        assert_eq!(lines.line_col(4), Some((2, 1)));
        assert_eq!(lines.line_col(6), Some((3, 0)));
        assert_eq!(lines.line_col(7), Some((4, 0)));
        assert_eq!(lines.line_col(8), Some((4, 1)));
        assert_eq!(lines.line_col(9), None);
    }

    #[test]
    fn empty_input_still_maps_offset_zero() {
        let lines = LineIndex::new(b"");
        assert_eq!(lines.line_col(0), Some((1, 0)));
        assert_eq!(lines.line_col(1), None);
    }
}
