//! Line format for ride history files
//!
//! Each data line carries six fields in a fixed order:
//! name, age, gender, visitor id, ticket type, season pass flag.
//!
//! A field that contains the delimiter has every delimiter replaced by `;`
//! before writing, and every `;` is turned back into the delimiter on
//! reading. This is lossy for values that already contained `;`.
//!
//! Text fields are kept byte for byte, surrounding spaces included. Records
//! that cannot be written as a single data line (a line break in any field,
//! or a name that would start the line with `#`) are refused by
//! [`check_encodable`] instead of being written.

use crate::ride::error::{RecoveryStrategy, RideError, RideResult};
use crate::types::VisitorRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Character substituted for the delimiter inside field values
pub const ESCAPE_CHAR: char = ';';

/// Prefix marking a comment line
pub const COMMENT_PREFIX: char = '#';

/// Number of fields in a data line
pub const FIELD_COUNT: usize = 6;

/// Field names in file order
pub const FIELD_NAMES: [&str; FIELD_COUNT] =
    ["Name", "Age", "Gender", "VisitorID", "TicketType", "HasSeasonPass"];

/// Age substituted when an imported age is outside the valid range
pub const DEFAULT_AGE: i32 = 25;

/// Inclusive range of ages accepted on import
pub const VALID_AGES: std::ops::RangeInclusive<i32> = 0..=150;

/// Name substituted for an empty imported name
pub const UNKNOWN_VISITOR_NAME: &str = "Unknown Visitor";

/// Options shared by export and import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    delimiter: char,
}

impl CodecOptions {
    /// Options with a custom field delimiter
    ///
    /// The escape character, the comment prefix and line breaks cannot be
    /// used as delimiters.
    pub fn new(delimiter: char) -> RideResult<Self> {
        if delimiter == ESCAPE_CHAR
            || delimiter == COMMENT_PREFIX
            || delimiter == '\n'
            || delimiter == '\r'
        {
            return Err(RideError::invalid_input(format!(
                "'{}' cannot be used as a field delimiter",
                delimiter.escape_default()
            )));
        }
        Ok(Self { delimiter })
    }

    /// The field delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

/// Replace every delimiter in a field value with the escape character
pub fn escape_field(value: &str, delimiter: char) -> String {
    value.replace(delimiter, &ESCAPE_CHAR.to_string())
}

/// Turn escape characters back into the delimiter
pub fn unescape_field(value: &str, delimiter: char) -> String {
    value.replace(ESCAPE_CHAR, &delimiter.to_string())
}

/// Refuse a visitor whose line would not read back as the same record
pub fn check_encodable(visitor: &VisitorRecord) -> RideResult<()> {
    let text_fields = [
        ("name", &visitor.name),
        ("gender", &visitor.gender),
        ("visitor id", &visitor.visitor_id),
        ("ticket type", &visitor.ticket_type),
    ];
    for (field, value) in text_fields {
        if value.contains(['\n', '\r']) {
            return Err(RideError::invalid_input(format!(
                "visitor '{}': {} contains a line break",
                visitor.visitor_id.escape_debug(),
                field
            )));
        }
    }

    if visitor.name.trim_start().starts_with(COMMENT_PREFIX) {
        return Err(RideError::invalid_input(format!(
            "visitor '{}': name starting with '{}' would be read as a comment",
            visitor.visitor_id, COMMENT_PREFIX
        )));
    }
    Ok(())
}

/// Render a visitor as one data line, without the line terminator
///
/// Call [`check_encodable`] first; this function does not refuse anything.
pub fn encode_record(visitor: &VisitorRecord, options: &CodecOptions) -> String {
    let delimiter = options.delimiter;
    let fields = [
        escape_field(&visitor.name, delimiter),
        visitor.age.to_string(),
        escape_field(&visitor.gender, delimiter),
        escape_field(&visitor.visitor_id, delimiter),
        escape_field(&visitor.ticket_type, delimiter),
        visitor.has_season_pass.to_string(),
    ];
    fields.join(&delimiter.to_string())
}

/// Header comment documenting the field order
pub fn format_comment(options: &CodecOptions) -> String {
    format!("{} Format: {}", COMMENT_PREFIX, FIELD_NAMES.join(&options.delimiter.to_string()))
}

/// Whether a line carries no record
pub fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX)
}

/// Why a line was dropped during import
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// Fewer than six fields
    #[error("line {line}: expected 6 fields, found {found}")]
    TooFewFields {
        /// Line number in the file, starting at 1
        line: usize,
        /// Fields present on the line
        found: usize,
    },

    /// The age field is not an integer
    #[error("line {line}: age '{value}' is not a number")]
    InvalidAge {
        /// Line number in the file, starting at 1
        line: usize,
        /// Raw age text
        value: String,
    },

    /// The line is not valid UTF-8
    #[error("line {line}: not valid UTF-8")]
    InvalidEncoding {
        /// Line number in the file, starting at 1
        line: usize,
    },
}

impl MalformedRecord {
    /// Line the problem was found on
    pub fn line(&self) -> usize {
        match self {
            MalformedRecord::TooFewFields { line, .. }
            | MalformedRecord::InvalidAge { line, .. }
            | MalformedRecord::InvalidEncoding { line } => *line,
        }
    }

    /// How this problem is recovered
    pub fn recovery(&self) -> RecoveryStrategy {
        RecoveryStrategy::Skip
    }
}

/// A field that was repaired with a default while keeping the line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldIssue {
    /// Age outside the valid range, replaced with `DEFAULT_AGE`
    AgeOutOfRange(i32),
    /// Season pass flag not `true`/`false`, read as `false`
    InvalidSeasonPass(String),
    /// Empty name, replaced with `UNKNOWN_VISITOR_NAME`
    EmptyName,
    /// Empty visitor id, replaced with a placeholder built from the line number
    EmptyVisitorId(String),
    /// More than six fields; the extras were ignored
    ExtraFields(usize),
}

impl FieldIssue {
    /// How this issue is recovered
    pub fn recovery(&self) -> RecoveryStrategy {
        RecoveryStrategy::UseDefaults
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::AgeOutOfRange(age) => {
                write!(f, "age {} out of range, using {}", age, DEFAULT_AGE)
            }
            FieldIssue::InvalidSeasonPass(value) => {
                write!(f, "season pass '{}' is not a boolean, using false", value)
            }
            FieldIssue::EmptyName => write!(f, "empty name, using '{}'", UNKNOWN_VISITOR_NAME),
            FieldIssue::EmptyVisitorId(placeholder) => {
                write!(f, "empty visitor id, using '{}'", placeholder)
            }
            FieldIssue::ExtraFields(count) => write!(f, "{} extra field(s) ignored", count),
        }
    }
}

/// A visitor decoded from one line, with any repairs applied
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// The visitor
    pub visitor: VisitorRecord,
    /// Repairs made while decoding
    pub issues: Vec<FieldIssue>,
}

/// Placeholder visitor id for an imported line without one
pub fn placeholder_visitor_id(line: usize) -> String {
    format!("IMPORTED-{:04}", line)
}

fn parse_season_pass(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Decode a single standalone line, such as a visitor given on the command line
///
/// Repairs are applied silently; a line that would be skipped during import
/// is returned as a `MalformedRecord` error.
pub fn decode_line(text: &str, options: &CodecOptions) -> RideResult<VisitorRecord> {
    let decoded = decode_record(text, 1, options)?;
    for issue in &decoded.issues {
        debug!("Repaired visitor field: {}", issue);
    }
    Ok(decoded.visitor)
}

/// Decode one data line
///
/// `line` is the 1-based line number, used for diagnostics and for the
/// placeholder visitor id. Structural problems and unparseable ages reject
/// the line; every other problem is repaired and reported in `issues`.
pub fn decode_record(
    text: &str,
    line: usize,
    options: &CodecOptions,
) -> Result<DecodedRecord, MalformedRecord> {
    let delimiter = options.delimiter;
    let fields: Vec<String> =
        text.split(delimiter).map(|field| unescape_field(field, delimiter)).collect();

    if fields.len() < FIELD_COUNT {
        return Err(MalformedRecord::TooFewFields { line, found: fields.len() });
    }

    let mut issues = Vec::new();
    if fields.len() > FIELD_COUNT {
        issues.push(FieldIssue::ExtraFields(fields.len() - FIELD_COUNT));
    }

    let mut age: i32 = fields[1]
        .trim()
        .parse()
        .map_err(|_| MalformedRecord::InvalidAge { line, value: fields[1].clone() })?;
    if !VALID_AGES.contains(&age) {
        issues.push(FieldIssue::AgeOutOfRange(age));
        age = DEFAULT_AGE;
    }

    let has_season_pass = parse_season_pass(fields[5].trim()).unwrap_or_else(|| {
        issues.push(FieldIssue::InvalidSeasonPass(fields[5].clone()));
        false
    });

    let mut name = fields[0].clone();
    if name.is_empty() {
        issues.push(FieldIssue::EmptyName);
        name = UNKNOWN_VISITOR_NAME.to_string();
    }

    let mut visitor_id = fields[3].clone();
    if visitor_id.is_empty() {
        visitor_id = placeholder_visitor_id(line);
        issues.push(FieldIssue::EmptyVisitorId(visitor_id.clone()));
    }

    Ok(DecodedRecord {
        visitor: VisitorRecord {
            name,
            age,
            gender: fields[2].clone(),
            visitor_id,
            ticket_type: fields[4].clone(),
            has_season_pass,
        },
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_record() {
        let visitor = VisitorRecord::new("Mike Wilson", 32, "Male", "V2001", "Family Pass", false);
        assert_eq!(
            encode_record(&visitor, &CodecOptions::default()),
            "Mike Wilson,32,Male,V2001,Family Pass,false"
        );
    }

    #[test]
    fn test_encode_escapes_delimiter() {
        let visitor = VisitorRecord::new("Wilson, Mike", 32, "Male", "V2001", "Family Pass", true);
        assert_eq!(
            encode_record(&visitor, &CodecOptions::default()),
            "Wilson; Mike,32,Male,V2001,Family Pass,true"
        );

        let pipe = CodecOptions::new('|').unwrap();
        let visitor = VisitorRecord::new("A|B", 32, "Male", "V1", "General", false);
        assert_eq!(encode_record(&visitor, &pipe), "A;B|32|Male|V1|General|false");
    }

    #[test]
    fn test_invalid_delimiters() {
        assert!(CodecOptions::new(';').is_err());
        assert!(CodecOptions::new('#').is_err());
        assert!(CodecOptions::new('\n').is_err());
        assert_eq!(CodecOptions::new('\t').unwrap().delimiter(), '\t');
    }

    #[test]
    fn test_decode_valid_line() {
        let decoded =
            decode_record("Emma Davis, 25 ,Female,V2002,Season Pass,TRUE", 4, &CodecOptions::default())
                .unwrap();
        assert_eq!(
            decoded.visitor,
            VisitorRecord::new("Emma Davis", 25, "Female", "V2002", "Season Pass", true)
        );
        assert!(decoded.issues.is_empty());
    }

    #[test]
    fn test_decode_unescapes_delimiter() {
        let decoded =
            decode_record("Wilson; Mike,32,Male,V2001,Family Pass,false", 1, &CodecOptions::default())
                .unwrap();
        assert_eq!(decoded.visitor.name, "Wilson, Mike");
    }

    #[test]
    fn test_decode_rejects_structural_problems() {
        let options = CodecOptions::default();
        assert_eq!(
            decode_record("Amy,25,Female", 7, &options),
            Err(MalformedRecord::TooFewFields { line: 7, found: 3 })
        );
        let error = decode_record("Amy,twenty,Female,V1,General,false", 8, &options).unwrap_err();
        assert!(matches!(error, MalformedRecord::InvalidAge { line: 8, .. }));
        assert_eq!(error.line(), 8);
    }

    #[test]
    fn test_decode_repairs_fields() {
        let decoded =
            decode_record(",200,Female,,General,maybe", 12, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.visitor.name, UNKNOWN_VISITOR_NAME);
        assert_eq!(decoded.visitor.age, DEFAULT_AGE);
        assert_eq!(decoded.visitor.visitor_id, "IMPORTED-0012");
        assert!(!decoded.visitor.has_season_pass);
        assert_eq!(decoded.issues.len(), 4);
        assert!(decoded.issues.iter().all(|i| i.recovery() == RecoveryStrategy::UseDefaults));
    }

    #[test]
    fn test_decode_negative_age_is_clamped() {
        let decoded = decode_record("Amy,-3,Female,V1,General,false", 1, &CodecOptions::default())
            .unwrap();
        assert_eq!(decoded.visitor.age, DEFAULT_AGE);
        assert_eq!(decoded.issues, vec![FieldIssue::AgeOutOfRange(-3)]);
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let decoded = decode_record("Amy,30,Female,V1,General,true,extra", 1, &CodecOptions::default())
            .unwrap();
        assert!(decoded.visitor.has_season_pass);
        assert_eq!(decoded.issues, vec![FieldIssue::ExtraFields(1)]);
    }

    #[test]
    fn test_ignorable_lines() {
        assert!(is_ignorable(""));
        assert!(is_ignorable("   "));
        assert!(is_ignorable("# Export Date: today"));
        assert!(!is_ignorable("Amy,30,Female,V1,General,true"));
    }

    #[test]
    fn test_decode_keeps_surrounding_spaces() {
        let visitor = VisitorRecord::new(" Amy ", 30, "Female ", " V1", "General  ", false);
        let options = CodecOptions::default();
        let line = encode_record(&visitor, &options);

        let decoded = decode_record(&line, 1, &options).unwrap();
        assert_eq!(decoded.visitor, visitor);
        assert!(decoded.issues.is_empty());
    }

    #[test]
    fn test_check_encodable() {
        let ok = VisitorRecord::new("Amy #1", 30, "Female", "V1", "General", false);
        assert!(check_encodable(&ok).is_ok());

        let comment_like = VisitorRecord::new("#1 Fan", 30, "Female", "V1", "General", false);
        assert!(matches!(check_encodable(&comment_like), Err(RideError::InvalidInput(_))));

        let indented = VisitorRecord::new("  # Fan", 30, "Female", "V1", "General", false);
        assert!(check_encodable(&indented).is_err());

        let broken = VisitorRecord::new("Amy", 30, "Female", "V1", "Gen\r\neral", false);
        assert!(matches!(check_encodable(&broken), Err(RideError::InvalidInput(_))));
    }

    #[test]
    fn test_decode_line() {
        let options = CodecOptions::default();
        let visitor = decode_line("Amy,30,Female,V1,General,true", &options).unwrap();
        assert_eq!(visitor, VisitorRecord::new("Amy", 30, "Female", "V1", "General", true));

        // Repairs still apply
        let repaired = decode_line(",30,Female,,General,true", &options).unwrap();
        assert_eq!(repaired.name, UNKNOWN_VISITOR_NAME);
        assert_eq!(repaired.visitor_id, "IMPORTED-0001");

        match decode_line("Amy,thirty", &options) {
            Err(RideError::MalformedRecord(MalformedRecord::TooFewFields { line: 1, found: 2 })) => {}
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
        assert!(matches!(
            decode_line("Amy,thirty,Female,V1,General,true", &options),
            Err(RideError::MalformedRecord(MalformedRecord::InvalidAge { .. }))
        ));
    }

    #[test]
    fn test_format_comment() {
        assert_eq!(
            format_comment(&CodecOptions::default()),
            "# Format: Name,Age,Gender,VisitorID,TicketType,HasSeasonPass"
        );
    }
}
