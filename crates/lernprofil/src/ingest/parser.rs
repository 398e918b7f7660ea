use super::normalizer::{normalize_code, normalize_header};
use crate::scoring::RawRating;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ResponseRecord {
    pub(crate) code: String,
    pub(crate) rating: RawRating,
    pub(crate) line: u64,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ResponseRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers.clone());

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row: ResponseRow = record.deserialize(Some(&headers))?;
        if row.item_code.is_empty() {
            continue;
        }

        records.push(ResponseRecord {
            code: normalize_code(&row.item_code),
            rating: parse_rating(row.rating.as_deref()),
            line: record.position().map_or(0, csv::Position::line),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    item_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Keeps the most specific type the text supports; never coerces text to numbers.
pub(crate) fn parse_rating(value: Option<&str>) -> RawRating {
    let Some(raw) = value.map(str::trim) else {
        return RawRating::Null;
    };

    if let Ok(integer) = raw.parse::<i128>() {
        return RawRating::Integer(integer);
    }

    if let Ok(decimal) = raw.parse::<f64>() {
        return RawRating::Decimal(decimal);
    }

    RawRating::Text(raw.to_string())
}
