use crate::errors::SummarizeError;

/// Renders every CSV record, header included, as a comma separated line.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, SummarizeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut lines = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let cells: Vec<String> = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).trim().to_string())
            .collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        lines.push(cells.join(", "));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rows_with_quoted_fields() {
        let csv = b"region,revenue\nNorth,\"1,200\"\nSouth,950\n";
        let text = extract(csv).unwrap();
        assert_eq!(text, "region, revenue\nNorth, 1,200\nSouth, 950");
    }

    #[test]
    fn tolerates_ragged_rows() {
        let text = extract(b"a,b,c\n1\n2,3\n").unwrap();
        assert_eq!(text, "a, b, c\n1\n2, 3");
    }
}
