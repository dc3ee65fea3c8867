//! End-to-end parsing tests over whole files

#![allow(clippy::unwrap_used, clippy::expect_used)]

use datfeed_ingest::parser::{FieldSpan, FixedWidthParser, RecordLayout};
use datfeed_ingest::{ingest, IngestionCoordinator, ParseError};
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;

fn sale_line(
    product_id: u32,
    product: &str,
    client_id: u32,
    client: &str,
    quantity: u32,
    unit: &str,
    date: &str,
) -> String {
    format!(
        "{:0>4}{:<54}{:0>4}{:<50}{:0>4}{:0>9}{:<11}",
        product_id, product, client_id, client, quantity, unit, date
    )
}

#[test]
fn test_brigadeiro_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "{}",
        sale_line(1, "Brigadeiro Gourmet", 7, "Maria Clara", 21, "200.00", "2025-01-10")
    )
    .unwrap();

    let bytes = std::fs::read(file.path()).unwrap();
    let result = ingest(&bytes).unwrap();

    assert_eq!(result.records_processed, 1);
    let record = &result.records[0];
    assert_eq!(record.id, "dat-1");
    assert_eq!(record.product_name, "Brigadeiro Gourmet");
    assert_eq!(record.customer_name, "Maria Clara");
    assert_eq!(record.quantity, 21);
    assert_eq!(record.total_value, Decimal::from_str("4200.00").unwrap());
}

#[test]
fn test_counts_match_valid_and_invalid_lines() {
    let lines = [
        sale_line(1, "Bolo de Cenoura", 1, "Ana", 2, "35.00", "2025-01-01"),
        "0002Torta".to_string(),
        sale_line(3, "Pão de Mel", 2, "Bruno", 10, "4.25", "2025-01-02"),
        String::new(),
        sale_line(4, "Quindim", 3, "Carla", 1, "abc", "2025-01-03"),
        sale_line(5, "Cocada", 4, "Davi", 7, "3.10", "2025-01-04"),
    ];
    let content = lines.join("\n");

    let result = ingest(content.as_bytes()).unwrap();

    assert_eq!(result.records_processed, 3);
    assert_eq!(result.rejected_lines.len(), 2);
    assert_eq!(result.records_rejected, 2);

    let rejected: Vec<usize> = result.rejected_lines.iter().map(|r| r.line_number).collect();
    assert_eq!(rejected, vec![2, 5]);
    assert!(result.rejected_lines[1].reason.contains("unit value"));

    for record in &result.records {
        assert_eq!(record.total_value, Decimal::from(record.quantity) * record.unit_value);
    }
    assert_eq!(result.records[2].id, "dat-3");
    assert_eq!(result.records[2].total_value, Decimal::from_str("21.70").unwrap());
}

#[test]
fn test_windows_line_endings() {
    let content = format!(
        "{}\r\n{}\r\n",
        sale_line(1, "Bolo", 1, "Ana", 1, "1.00", "2025-01-01"),
        sale_line(2, "Torta", 2, "Rui", 2, "2.00", "2025-01-02")
    );
    let result = ingest(content.as_bytes()).unwrap();
    assert_eq!(result.records_processed, 2);
    assert_eq!(result.records[1].sale_date, "2025-01-02");
}

#[test]
fn test_whitespace_only_file() {
    let result = ingest(b"\n\n   \n").unwrap();
    assert_eq!(result.records_processed, 0);
    assert_eq!(result.records_rejected, 0);
}

#[test]
fn test_reingesting_yields_equal_records() {
    let content = (1..=5)
        .map(|i| sale_line(i, "Brownie", i, "Cliente", i, "9.99", "2025-03-01"))
        .collect::<Vec<_>>()
        .join("\n");

    let first = ingest(content.as_bytes()).unwrap();
    let second = ingest(content.as_bytes()).unwrap();

    assert_eq!(first.records.len(), 5);
    for (a, b) in first.records.iter().zip(&second.records) {
        assert!(a.same_sale(b));
    }
}

#[test]
fn test_layout_variant_is_distinct() {
    // Same data written with client id at [54, 58): not valid canonical input
    let variant = RecordLayout {
        product_id: FieldSpan::new(0, 4),
        product_name: FieldSpan::new(4, 54),
        client_id: FieldSpan::new(54, 58),
        client_name: FieldSpan::new(58, 108),
        quantity_sold: FieldSpan::new(108, 112),
        unit_value: FieldSpan::new(112, 121),
        sale_date: FieldSpan::new(121, 132),
    };
    let line = format!(
        "{:0>4}{:<50}{:0>4}{:<50}{:0>4}{:0>9}{:<11}",
        1, "Brigadeiro", 7, "Maria", 3, "2.00", "2025-01-10"
    );

    let variant_result = IngestionCoordinator::with_parser(FixedWidthParser::new(variant))
        .ingest_str(&line);
    assert_eq!(variant_result.records_processed, 1);
    assert_eq!(variant_result.records[0].client_id, Some(7));

    let canonical = datfeed_ingest::parse_line(&line, 1).unwrap_err();
    assert!(matches!(canonical, ParseError::TooShort { length: 132, .. }));
}
