//! CSV parsing for catalog sources.

use std::io::Read;

use crate::error::LoadError;
use crate::model::Item;

/// Columns every catalog source must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Name",
    "Tags",
    "ReviewCount",
    "Brand",
    "ImageURL",
    "Rating",
];

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    tags: usize,
    review_count: usize,
    brand: usize,
    image_url: usize,
    rating: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column,
                    available: headers.iter().map(str::to_string).collect(),
                })
        };

        let mut positions = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(column)?;
        }
        let [name, tags, review_count, brand, image_url, rating] = positions;

        Ok(Self {
            name,
            tags,
            review_count,
            brand,
            image_url,
            rating,
        })
    }
}

pub(crate) fn read_items(reader: impl Read, source: &str) -> Result<Vec<Item>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Unreadable {
            source_name: source.to_string(),
            message: format!("failed to read header row: {e}"),
        })?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index as u64 + 1;
        let record = record.map_err(|e| record_error(source, &headers, row, &e))?;
        items.push(parse_row(&record, columns, row)?);
    }

    Ok(items)
}

fn record_error(
    source: &str,
    headers: &csv::StringRecord,
    row: u64,
    error: &csv::Error,
) -> LoadError {
    match error.kind() {
        csv::ErrorKind::Io(e) => LoadError::Unreadable {
            source_name: source.to_string(),
            message: format!("failed to read row {row}: {e}"),
        },
        csv::ErrorKind::Utf8 { err, .. } => LoadError::MalformedRow {
            row,
            column: headers
                .get(err.field())
                .map_or_else(|| format!("<field {}>", err.field()), str::to_string),
            message: "field is not valid UTF-8".to_string(),
        },
        _ => LoadError::MalformedRow {
            row,
            column: "<record>".to_string(),
            message: error.to_string(),
        },
    }
}

fn parse_row(record: &csv::StringRecord, columns: Columns, row: u64) -> Result<Item, LoadError> {
    let field = |position: usize| record.get(position).unwrap_or_default();

    Ok(Item::new(field(columns.name), field(columns.tags))
        .with_review_count(parse_review_count(field(columns.review_count), row)?)
        .with_brand(field(columns.brand))
        .with_image_url(field(columns.image_url))
        .with_rating(parse_rating(field(columns.rating), row)?))
}

/// Accepts plain integers and integral floats (`"12.0"`), since cleaned
/// exports often store counts as floats. Empty means zero.
#[allow(clippy::float_cmp, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn parse_review_count(raw: &str, row: u64) -> Result<u64, LoadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(count) = raw.parse::<u64>() {
        return Ok(count);
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value <= u64::MAX as f64 =>
        {
            Ok(value as u64)
        }
        _ => Err(LoadError::MalformedRow {
            row,
            column: "ReviewCount".to_string(),
            message: format!("expected a non-negative whole number, got {raw:?}"),
        }),
    }
}

fn parse_rating(raw: &str, row: u64) -> Result<f64, LoadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LoadError::MalformedRow {
            row,
            column: "Rating".to_string(),
            message: format!("expected a number, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name,Tags,ReviewCount,Brand,ImageURL,Rating\n";

    fn read(csv: &str) -> Result<Vec<Item>, LoadError> {
        read_items(csv.as_bytes(), "inline")
    }

    #[test]
    fn test_read_items() {
        let csv = format!(
            "{HEADER}Red Shoe,red shoe leather,12,Acme,https://img/1.jpg,4.5\n\
             Blue Shoe,blue shoe leather,3.0,Acme,https://img/2.jpg,3\n"
        );
        let items = read(&csv).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Red Shoe");
        assert_eq!(items[0].tags, "red shoe leather");
        assert_eq!(items[0].review_count, 12);
        assert_eq!(items[0].brand, "Acme");
        assert_eq!(items[0].image_url, "https://img/1.jpg");
        assert!((items[0].rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(items[1].review_count, 3);
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let csv = "ProdID,Rating,Brand,Tags,Category,Name,ImageURL,ReviewCount\n\
                   p-1,4.0,Acme,\"soft, cotton\",Shirts,Tee,https://img/t.jpg,7\n";
        let items = read(csv).unwrap();

        assert_eq!(items[0].name, "Tee");
        assert_eq!(items[0].tags, "soft, cotton");
        assert_eq!(items[0].review_count, 7);
    }

    #[test]
    fn test_empty_fields_default() {
        let csv = format!("{HEADER}Blank,,,,,\n");
        let items = read(&csv).unwrap();

        assert_eq!(items[0].tags, "");
        assert_eq!(items[0].review_count, 0);
        assert!(items[0].rating.abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Name,Tags,ReviewCount,Brand,Rating\nA,b,1,c,2\n";
        match read(csv) {
            Err(LoadError::MissingColumn { column, available }) => {
                assert_eq!(column, "ImageURL");
                assert_eq!(available.len(), 5);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_review_count_names_row_and_column() {
        let csv = format!("{HEADER}A,a,1,x,u,1\nB,b,lots,x,u,1\n");
        match read(&csv) {
            Err(LoadError::MalformedRow { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "ReviewCount");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_review_count_rejected() {
        let csv = format!("{HEADER}A,a,1.5,x,u,1\n");
        assert!(matches!(read(&csv), Err(LoadError::MalformedRow { row: 1, .. })));
    }

    #[test]
    fn test_malformed_rating() {
        let csv = format!("{HEADER}A,a,1,x,u,great\n");
        match read(&csv) {
            Err(LoadError::MalformedRow { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "Rating");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row() {
        let csv = format!("{HEADER}A,a,1,x,u,1\nB,b,1\n");
        assert!(matches!(read(&csv), Err(LoadError::MalformedRow { row: 2, .. })));
    }

    #[test]
    fn test_columns_follow_required_list() {
        let header = csv::StringRecord::from(REQUIRED_COLUMNS.to_vec());
        let columns = Columns::locate(&header).unwrap();
        assert_eq!(columns.name, 0);
        assert_eq!(columns.rating, REQUIRED_COLUMNS.len() - 1);

        let trimmed = csv::StringRecord::from(vec![
            " Rating", "ImageURL ", "Brand", "ReviewCount", "Tags", "Name",
        ]);
        let columns = Columns::locate(&trimmed).unwrap();
        assert_eq!(columns.name, 5);
        assert_eq!(columns.rating, 0);
    }

    #[test]
    fn test_invalid_utf8_names_the_column() {
        let mut csv = format!("{HEADER}A,a,1,x,u,1\nB,").into_bytes();
        csv.extend_from_slice(b"bad \xff tags,1,x,u,1\n");

        match read_items(csv.as_slice(), "inline") {
            Err(LoadError::MalformedRow { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Tags");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    /// Serves `data` once, then fails every further read.
    struct BrokenStream {
        data: Option<&'static [u8]>,
    }

    impl Read for BrokenStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(std::io::Error::other("connection reset")),
            }
        }
    }

    #[test]
    fn test_io_error_mid_stream_names_source_and_row() {
        let stream = BrokenStream {
            data: Some(b"Name,Tags,ReviewCount,Brand,ImageURL,Rating\nA,a,1,x,u,1\n"),
        };

        match read_items(stream, "feed.csv") {
            Err(LoadError::Unreadable {
                source_name,
                message,
            }) => {
                assert_eq!(source_name, "feed.csv");
                assert!(message.contains("row 2"));
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only() {
        assert!(read(HEADER).unwrap().is_empty());
    }
}
