//! Fixed-width sales record parser
//!
//! Turns one physical line of a `.dat` file into a [`RawItem`]. Every field
//! lives at a fixed character range described by a [`RecordLayout`]; slices
//! are trimmed and numeric fields must parse cleanly or the whole line is
//! rejected.
//!
//! # Format
//!
//! ```text
//! 0001Brigadeiro Gourmet  ...  0007Maria Clara  ...  0021000200.002025-01-10
//! |id ||name (54)        ...  |id ||name (50) ...  |qty||unit(9)||date (11)|
//! ```
//!
//! Offsets count characters, not bytes, so accented names keep every later
//! field in place.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use datfeed_common::{RawClient, RawItem, RawProduct};

// ============================================================================
// Errors
// ============================================================================

/// Why a single line could not become a [`RawItem`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line_number}: too short ({length} characters, at least {required} required)")]
    TooShort {
        line_number: usize,
        length: usize,
        required: usize,
    },

    #[error("line {line_number}: invalid {field} '{value}'")]
    InvalidNumber {
        line_number: usize,
        field: &'static str,
        value: String,
    },
}

impl ParseError {
    pub fn line_number(&self) -> usize {
        match self {
            ParseError::TooShort { line_number, .. }
            | ParseError::InvalidNumber { line_number, .. } => *line_number,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Half-open character range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub start: usize,
    pub end: usize,
}

impl FieldSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn width(&self) -> usize {
        self.end - self.start
    }
}

/// Character offsets of every field for one file format version
///
/// Different format versions are different layouts; a line is always read
/// against exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub product_id: FieldSpan,
    pub product_name: FieldSpan,
    pub client_id: FieldSpan,
    pub client_name: FieldSpan,
    pub quantity_sold: FieldSpan,
    pub unit_value: FieldSpan,
    pub sale_date: FieldSpan,
}

impl RecordLayout {
    /// Layout of the production `.dat` sales export
    pub const CANONICAL: RecordLayout = RecordLayout {
        product_id: FieldSpan::new(0, 4),
        product_name: FieldSpan::new(4, 58),
        client_id: FieldSpan::new(58, 62),
        client_name: FieldSpan::new(62, 112),
        quantity_sold: FieldSpan::new(112, 116),
        unit_value: FieldSpan::new(116, 125),
        sale_date: FieldSpan::new(125, 136),
    };

    fn spans(&self) -> [FieldSpan; 7] {
        [
            self.product_id,
            self.product_name,
            self.client_id,
            self.client_name,
            self.quantity_sold,
            self.unit_value,
            self.sale_date,
        ]
    }

    /// Shortest line that holds every field
    pub fn min_line_len(&self) -> usize {
        self.spans().iter().map(|span| span.end).max().unwrap_or(0)
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::CANONICAL
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Layout-bound line parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthParser {
    layout: RecordLayout,
}

impl FixedWidthParser {
    pub fn new(layout: RecordLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Parse one line into a [`RawItem`]
    ///
    /// `line_number` is only used to label errors. Characters past the last
    /// field are ignored.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<RawItem, ParseError> {
        let chars: Vec<char> = line.chars().collect();
        let required = self.layout.min_line_len();

        if chars.len() < required {
            return Err(ParseError::TooShort {
                line_number,
                length: chars.len(),
                required,
            });
        }

        let slice = |span: FieldSpan| -> String {
            chars[span.start..span.end]
                .iter()
                .collect::<String>()
                .trim()
                .to_string()
        };

        let product_id = parse_number::<i64>(slice(self.layout.product_id), "product id", line_number)?;
        let client_id = parse_number::<i64>(slice(self.layout.client_id), "client id", line_number)?;
        let quantity_sold =
            parse_number::<i64>(slice(self.layout.quantity_sold), "quantity sold", line_number)?;
        let unit_value =
            parse_number::<Decimal>(slice(self.layout.unit_value), "unit value", line_number)?;

        Ok(RawItem {
            sale_date: slice(self.layout.sale_date),
            quantity_sold,
            product: RawProduct {
                id: product_id,
                name: slice(self.layout.product_name),
                unit_value,
            },
            client: RawClient {
                id: client_id,
                name: slice(self.layout.client_name),
            },
        })
    }
}

/// Parse one line with the canonical layout
pub fn parse_line(line: &str, line_number: usize) -> Result<RawItem, ParseError> {
    FixedWidthParser::default().parse_line(line, line_number)
}

fn parse_number<T: FromStr>(
    value: String,
    field: &'static str,
    line_number: usize,
) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|_| ParseError::InvalidNumber {
        line_number,
        field,
        value,
    })
}
