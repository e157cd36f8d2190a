use std::fmt;

/// Something the extractor worked around rather than failed on.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractWarning {
    /// Rows disagree on width. The table is kept exactly as extracted.
    RaggedTable {
        page: u32,
        rows: usize,
        confidence: f32,
    },
    /// Page text held no table; these were found in whole-document text.
    DocumentTextFallback { tables: usize },
    NoTablesDetected,
}

impl ExtractWarning {
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::RaggedTable { page, .. } => Some(*page),
            Self::DocumentTextFallback { .. } | Self::NoTablesDetected => None,
        }
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedTable {
                page,
                rows,
                confidence,
            } => write!(
                f,
                "page {page}: {rows}-row table has uneven row widths (confidence {confidence:.2})"
            ),
            Self::DocumentTextFallback { tables } => write!(
                f,
                "no table in page text; {tables} table(s) found in document-level text"
            ),
            Self::NoTablesDetected => f.write_str("no table rows detected"),
        }
    }
}
