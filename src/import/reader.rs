use super::target::CallTarget;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Parse the text of an uploaded phone list.
///
/// The first line is treated as a header when it contains `id`. Blank lines
/// and lines without a number are skipped. A missing id becomes `id-<line>`,
/// where `<line>` is the 0-based line index in the file. Fields past the
/// fourth are ignored; quoting and embedded commas are not supported.
/// Ids are not checked for uniqueness: a generated `id-<line>` can equal an
/// id written in the file, and such targets then share one call record.
pub fn parse_phone_list(content: &str) -> Vec<CallTarget> {
    let lines: Vec<&str> = content.split('\n').collect();

    let start = match lines.first() {
        Some(first) if first.contains("id") => 1,
        _ => 0,
    };

    let mut targets = Vec::new();

    for (index, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let id = fields.next().map(str::trim).unwrap_or_default();
        let number = fields.next().map(str::trim).unwrap_or_default();
        let name = non_empty(fields.next());
        let notes = non_empty(fields.next());

        if number.is_empty() {
            debug!("Skipping line {}: no number", index);
            continue;
        }

        let id = if id.is_empty() {
            format!("id-{}", index)
        } else {
            id.to_string()
        };

        targets.push(CallTarget {
            id,
            number: number.to_string(),
            name,
            notes,
        });
    }

    targets
}

/// Read a phone list from disk and parse it
pub async fn import_file(path: impl AsRef<Path>) -> Result<Vec<CallTarget>> {
    let path = path.as_ref();
    info!("Importing phone list: {}", path.display());

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read phone list {}", path.display()))?;

    let targets = parse_phone_list(&content);
    info!("Imported {} numbers from {}", targets.len(), path.display());

    Ok(targets)
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_skipped() {
        let targets = parse_phone_list("id,number,name,notes\n1,555-0100,Alice,\n2,555-0200,,");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "1");
        assert_eq!(targets[0].number, "555-0100");
        assert_eq!(targets[0].name.as_deref(), Some("Alice"));
        assert_eq!(targets[0].notes, None);
        assert_eq!(targets[1].id, "2");
        assert_eq!(targets[1].name, None);
    }

    #[test]
    fn test_no_header() {
        let targets = parse_phone_list("a,555-0100\nb,555-0200");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "a");
    }

    #[test]
    fn test_missing_number_dropped() {
        let targets = parse_phone_list("1,,Bob,\n2,555-0200,Carol,call back\n3");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "2");
        assert_eq!(targets[0].notes.as_deref(), Some("call back"));
    }

    #[test]
    fn test_missing_id_synthesized_per_line() {
        let targets = parse_phone_list(",555-0100\n\n,555-0200");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "id-0");
        assert_eq!(targets[1].id, "id-2");
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let targets = parse_phone_list("id,number\r\n 7 , 555-0300 , Dan \r\n");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "7");
        assert_eq!(targets[0].number, "555-0300");
        assert_eq!(targets[0].name.as_deref(), Some("Dan"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_phone_list("").is_empty());
    }
}
