/// Ordered cells of one extracted table row. Widths are not uniform.
pub type Row = Vec<String>;

/// Every row of every detected table, in page order then detection order.
pub type TableData = Vec<Row>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedTable {
    pub page: u32,
    pub rows: Vec<Row>,
    pub confidence: f32,
}
