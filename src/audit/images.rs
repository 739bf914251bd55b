//! Image-resolution auditing over the image-listing tool.

use crate::error::{Error, Result};
use crate::model::{Document, ImageAudit, ImageRecord};
use crate::options::AuditOptions;
use crate::tool::ToolRunner;

/// Number of whitespace-separated columns per listing line.
const FIELD_COUNT: usize = 16;

/// Lines of table header preceding the records.
const HEADER_LINES: usize = 2;

/// Audits the print resolution of every embedded image.
pub struct ImageAuditor<'a> {
    runner: &'a ToolRunner,
    options: &'a AuditOptions,
}

impl<'a> ImageAuditor<'a> {
    /// Create an auditor over the given runner and options.
    pub fn new(runner: &'a ToolRunner, options: &'a AuditOptions) -> Self {
        Self { runner, options }
    }

    /// List and judge every embedded image of a document.
    ///
    /// A nonzero tool exit or empty listing yields an empty result set so
    /// the batch continues with the next document. Tool spawn failures and
    /// timeouts propagate for the engine to record per-document.
    pub fn audit_document(&self, document: &Document) -> Result<Vec<ImageAudit>> {
        let materialized = self.runner.materialize(document)?;
        let path = materialized.path().to_string_lossy().into_owned();
        let output = self.runner.run(&self.options.image_tool, &["-list", path.as_str()])?;
        if !output.success() {
            log::warn!(
                "{} exited with {:?} for {}: {}",
                self.options.image_tool,
                output.status,
                document.filename,
                output.stderr.trim()
            );
            return Ok(Vec::new());
        }
        Ok(parse_listing(&output.stdout)
            .into_iter()
            .map(|image| {
                let good = image.meets_resolution(self.options.min_ppi);
                ImageAudit { image, good }
            })
            .collect())
    }
}

/// Parse the full tool listing, discarding exactly the table header and
/// its separator line.
///
/// Malformed lines are skipped with a warning, uniformly: one unparseable
/// row must not cost the whole document its audit.
pub fn parse_listing(stdout: &str) -> Vec<ImageRecord> {
    stdout
        .trim()
        .lines()
        .skip(HEADER_LINES)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping image listing line: {e}");
                None
            }
        })
        .collect()
}

/// Parse one listing line into exactly [`FIELD_COUNT`] columns.
pub fn parse_line(line: &str) -> Result<ImageRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != FIELD_COUNT {
        return Err(Error::MalformedToolOutput(format!(
            "expected {FIELD_COUNT} fields, got {} in {line:?}",
            parts.len()
        )));
    }
    Ok(ImageRecord {
        page: number(parts[0], "page")?,
        index: number(parts[1], "num")?,
        kind: parts[2].to_string(),
        width: number(parts[3], "width")?,
        height: number(parts[4], "height")?,
        color_space: parts[5].to_string(),
        components: number(parts[6], "comp")?,
        bits_per_component: number(parts[7], "bpc")?,
        encoding: parts[8].to_string(),
        interpolated: flag(parts[9], "interp")?,
        object: number(parts[10], "object")?,
        object_id: number(parts[11], "ID")?,
        x_ppi: number(parts[12], "x-ppi")?,
        y_ppi: number(parts[13], "y-ppi")?,
        size: parts[14].to_string(),
        ratio: parts[15].to_string(),
    })
}

fn number(value: &str, column: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::MalformedToolOutput(format!("column {column}: {value:?} is not a number")))
}

fn flag(value: &str, column: &str) -> Result<bool> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(Error::MalformedToolOutput(format!(
            "column {column}: {other:?} is not yes/no"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
--------------------------------------------------------------------------------------------
   1     0 image     420   520  rgb     3   8  image  no         7  0   432   432  100K  16%
   2     1 image    1200   800  cmyk    4   8  jpeg   yes       12  0   150   300   45K  11%";

    #[test]
    fn test_parse_line() {
        let record =
            parse_line("1 0 image 420 520 rgb 3 8 image no 7 0 432 432 100K 16%").unwrap();
        assert_eq!(record.page, 1);
        assert_eq!(record.width, 420);
        assert_eq!(record.height, 520);
        assert_eq!(record.x_ppi, 432);
        assert_eq!(record.y_ppi, 432);
        assert!(!record.interpolated);
        assert!(record.meets_resolution(300));
    }

    #[test]
    fn test_parse_listing_skips_header() {
        let records = parse_listing(LISTING);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].object, 7);
        assert_eq!(records[1].color_space, "cmyk");
        assert!(records[1].interpolated);
        assert!(!records[1].meets_resolution(300));
    }

    #[test]
    fn test_parse_listing_empty_output() {
        assert!(parse_listing("").is_empty());
        assert!(parse_listing("header only\n-----\n").is_empty());
    }

    #[test]
    fn test_malformed_line_is_skipped_uniformly() {
        let listing = format!("{LISTING}\n   3     2 image 420 520 rgb 3 8 image no 9 0 300\n");
        let records = parse_listing(&listing);
        // The 13-field line is dropped; the two good rows survive.
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_line_rejects_wrong_field_count() {
        let err = parse_line("1 0 image").unwrap_err();
        assert!(matches!(err, Error::MalformedToolOutput(_)));
    }

    #[test]
    fn test_parse_line_rejects_bad_flag() {
        let err =
            parse_line("1 0 image 420 520 rgb 3 8 image maybe 7 0 432 432 100K 16%").unwrap_err();
        assert!(err.to_string().contains("yes/no"));
    }
}
