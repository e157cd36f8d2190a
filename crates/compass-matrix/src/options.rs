use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ExtractError;

/// 1-based page ranges, sorted and merged. Ranges are never expanded into
/// individual pages, so `1-4294967295` costs the same as `1-3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<RangeInclusive<u32>>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(&page))
    }
}

fn merge_ranges(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_by_key(|range| *range.start());

    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if *range.start() <= last.end().saturating_add(1) => {
                if range.end() > last.end() {
                    *last = *last.start()..=*range.end();
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn parse_page(text: &str) -> Result<u32, ExtractError> {
    let text = text.trim();
    let page = text
        .parse::<u32>()
        .map_err(|_| ExtractError::InvalidPageSelection(format!("'{text}' is not a page number")))?;
    if page == 0 {
        return Err(ExtractError::InvalidPageSelection(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

fn parse_range(part: &str) -> Result<RangeInclusive<u32>, ExtractError> {
    let (first, last) = part.split_once('-').unwrap_or((part, part));
    let (first, last) = (parse_page(first)?, parse_page(last)?);
    if last < first {
        return Err(ExtractError::InvalidPageSelection(format!(
            "'{part}' ends before it starts"
        )));
    }
    Ok(first..=last)
}

impl FromStr for PageSelection {
    type Err = ExtractError;

    /// Parses comma-separated pages and ranges such as `2-4, 9`.
    fn from_str(selection: &str) -> Result<Self, Self::Err> {
        let ranges = selection
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_range)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.is_empty() {
            return Err(ExtractError::InvalidPageSelection(
                "no pages given".to_string(),
            ));
        }

        Ok(Self {
            ranges: merge_ranges(ranges),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Only these pages are read; `None` reads the whole document.
    pub pages: Option<PageSelection>,
    /// Fewest cells a line needs to count as a table row.
    pub min_cols: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            min_cols: 2,
        }
    }
}
