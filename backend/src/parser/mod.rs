//! CSV to JSON parser with encoding and delimiter auto-detection.
//!
//! Each data row becomes a JSON object keyed by header. Cells are trimmed
//! strings; nothing campaign-specific happens here.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{CsvError, CsvResult};

const UTF8_BOM: char = '\u{feff}';

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records as JSON objects
    pub records: Vec<Value>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Valid UTF-8 always wins; the detected legacy encoding is only used
/// when the bytes are not UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    match encoding.to_lowercase().as_str() {
        // encoding_rs folds ISO-8859-1 into its Windows-1252 superset.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()
        }
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into JSON objects with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use campgen::csv_to_json;
///
/// let csv = "ASIN,Bid\nB0ABC12345,1.5";
/// let rows = csv_to_json(csv, ',').unwrap();
///
/// assert_eq!(rows[0]["ASIN"], "B0ABC12345");
/// assert_eq!(rows[0]["Bid"], "1.5");
/// ```
pub fn csv_to_json(csv: &str, delimiter: char) -> CsvResult<Vec<Value>> {
    Ok(parse_str(csv, delimiter, "utf-8".to_string())?.records)
}

/// Parse CSV text with an explicit delimiter and return metadata.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter_byte = u8::try_from(delimiter)
        .map_err(|_| CsvError::parse(1, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::parse(1, format!("Cannot read header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            CsvError::parse(line, e.to_string())
        })?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = record.get(i).map(str::trim).unwrap_or("");
            obj.insert(header.clone(), Value::String(value.to_string()));
        }

        records.push(Value::Object(obj));
    }

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = if std::str::from_utf8(bytes).is_ok() {
        "utf-8".to_string()
    } else {
        detect_encoding(bytes)
    };
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(content.trim_start_matches(UTF8_BOM));

    parse_str(&content, delimiter, encoding)
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "ASIN,Bid\nB0ABC12345,1.5\nB0XYZ98765,2";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ASIN"], "B0ABC12345");
        assert_eq!(rows[0]["Bid"], "1.5");
        assert_eq!(rows[1]["Bid"], "2");
    }

    #[test]
    fn test_quoted_values_keep_delimiter() {
        let csv = "Keyword Text,SKU\n\"mouse, wireless\",S1";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows[0]["Keyword Text"], "mouse, wireless");
        assert_eq!(rows[0]["SKU"], "S1");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "a,b\n1,2\n\n,\n3,4\n";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_short_rows_padded_and_extra_ignored() {
        let csv = "a;b;c\n1;;3\n4\n5;6;7;8";
        let rows = csv_to_json(csv, ';').unwrap();

        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[1]["a"], "4");
        assert_eq!(rows[1]["c"], "");
        assert_eq!(rows[2]["c"], "7");
        assert_eq!(rows[2].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_headers_trimmed() {
        let result = parse_str(" ASIN , Bid \nB0ABC12345,1", ',', "utf-8".into()).unwrap();
        assert_eq!(result.headers, vec!["ASIN", "Bid"]);
        assert_eq!(result.records[0]["Bid"], "1");
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(csv_to_json("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = "\u{feff}ASIN,SKU\nB0ABC12345,S1".as_bytes();
        let result = parse_bytes_auto(bytes).unwrap();
        assert_eq!(result.headers[0], "ASIN");
        assert_eq!(result.records[0]["ASIN"], "B0ABC12345");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "ASIN;Bid\nB0ABC12345;1\nB0XYZ98765;2";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["ASIN", "Bid"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_file_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "ASIN,SKU\nB0ABC12345,S1\n").unwrap();

        let result = parse_csv_file_auto(&path).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.delimiter, ',');
    }
}
