use std::collections::HashMap;

/// Splits a text line on tabs or runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    let mut flush = |current: &mut String| {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    };

    for ch in trimmed.chars() {
        if ch == '\t' {
            flush(&mut current);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                flush(&mut current);
            } else {
                current.push(' ');
            }
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }
    flush(&mut current);

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn modal_width(rows: &[Vec<String>]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}

#[cfg(test)]
mod tests {
    use super::{modal_width, soft_split_line_into_cells, split_line_into_cells};

    #[test]
    fn splits_double_space_separated_cells() {
        let cells = split_line_into_cells("Net revenue  1,204.50  980.10");
        assert_eq!(cells, vec!["Net revenue", "1,204.50", "980.10"]);
    }

    #[test]
    fn splits_tab_separated_cells() {
        let cells = split_line_into_cells("A\tB\tC");
        assert_eq!(cells, vec!["A", "B", "C"]);
    }

    #[test]
    fn blank_line_has_no_cells() {
        assert!(split_line_into_cells("   ").is_empty());
    }

    #[test]
    fn soft_splits_single_space_cells() {
        let cells = soft_split_line_into_cells("Item Qty Price");
        assert_eq!(cells, vec!["Item", "Qty", "Price"]);
    }

    #[test]
    fn detects_modal_width() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["1".to_string(), "2".to_string()],
            vec!["x".to_string()],
        ];
        assert_eq!(modal_width(&rows), 2);
    }
}
