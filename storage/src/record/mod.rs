//! Encode and decode records as delimited lines of text.
//!
//! A file managed by [crate::file::Store] begins with a header line naming each field. That
//! header becomes a [Schema] and every later line is interpreted positionally against it: the
//! first value belongs to the first field name, the second to the second, and so on. A [Codec]
//! pairs a [Schema] with the delimiter and terminator of a file and converts between lines and
//! any type implementing [Record].
//!
//! # Limitations
//!
//! Values are neither quoted nor escaped. A value containing the delimiter or the line
//! terminator will not survive a round-trip (and will corrupt the line it is written to). Callers
//! are expected to validate values before they reach the codec.

mod student;

pub use student::Student;

use std::{collections::HashMap, marker::PhantomData};
use thiserror::Error;

/// Unique, non-negative identifier of a record.
pub type PrimaryKey = u64;

/// Errors that can occur when encoding or decoding records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed record: expected {0} fields, found {1}")]
    MalformedRecord(usize, usize),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid field {0}: {1}")]
    InvalidField(String, String),
    #[error("empty schema")]
    EmptySchema,
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),
}

/// Ordered field names shared by every line of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Create a [Schema] from an ordered list of field names.
    ///
    /// Names must be unique and the list must not be empty.
    pub fn new<I, S>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() || fields.iter().all(|field| field.is_empty()) {
            return Err(Error::EmptySchema);
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return Err(Error::DuplicateField(field.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// Parse a header line (with or without its terminator).
    pub fn parse(line: &str, delimiter: char, terminator: u8) -> Result<Self, Error> {
        let line = strip_terminator(line, terminator);
        Self::new(line.split(delimiter))
    }

    /// Render the header line (without a terminator).
    pub fn encode(&self, delimiter: char) -> String {
        self.fields.join(&delimiter.to_string())
    }

    /// Field names in file order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields in each line.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields (never true for a constructed [Schema]).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Values of a single decoded line, addressed by field name.
pub struct Fields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    /// Get the raw value of `name`.
    pub fn get(&self, name: &str) -> Result<&'a str, Error> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingField(name.to_string()))
    }
}

/// A typed record that can be stored in a delimited file.
pub trait Record: Sized {
    /// Field names in the order used when creating a new file.
    const FIELDS: &'static [&'static str];

    /// The primary key of the record.
    fn key(&self) -> PrimaryKey;

    /// The string form of the field called `name`, if the record has such a field.
    fn field(&self, name: &str) -> Option<String>;

    /// Build a record from the named values of a decoded line.
    fn from_fields(fields: &Fields<'_>) -> Result<Self, Error>;

    /// The [Schema] of a new file holding this record type.
    fn schema() -> Schema {
        Schema {
            fields: Self::FIELDS.iter().map(|field| field.to_string()).collect(),
        }
    }
}

/// Converts records of type `R` to and from lines.
#[derive(Clone, Debug)]
pub struct Codec<R: Record> {
    schema: Schema,
    delimiter: char,
    terminator: u8,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Codec<R> {
    /// Create a new [Codec].
    pub fn new(schema: Schema, delimiter: char, terminator: u8) -> Self {
        Self {
            schema,
            delimiter,
            terminator,
            _record: PhantomData,
        }
    }

    /// The [Schema] driving field order.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Serialize `record` in schema order. The returned line is not terminated.
    pub fn encode(&self, record: &R) -> Result<String, Error> {
        let mut values = Vec::with_capacity(self.schema.len());
        for name in self.schema.fields() {
            let value = record
                .field(name)
                .ok_or_else(|| Error::MissingField(name.clone()))?;
            values.push(value);
        }
        Ok(values.join(&self.delimiter.to_string()))
    }

    /// Parse a line (with or without its terminator) into a record.
    pub fn decode(&self, line: &str) -> Result<R, Error> {
        let line = strip_terminator(line, self.terminator);
        let values: Vec<&str> = line.split(self.delimiter).collect();
        if values.len() != self.schema.len() {
            return Err(Error::MalformedRecord(self.schema.len(), values.len()));
        }
        let values = self
            .schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(values)
            .collect();
        R::from_fields(&Fields { values })
    }
}

/// Remove a single trailing `terminator`, if present.
fn strip_terminator(line: &str, terminator: u8) -> &str {
    line.strip_suffix(terminator as char).unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_macros::test_traced;

    fn student(record_id: PrimaryKey) -> Student {
        Student {
            record_id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            birthday_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
        }
    }

    fn codec() -> Codec<Student> {
        Codec::new(Student::schema(), ',', b'\n')
    }

    #[test_traced]
    fn test_codec_round_trip() {
        let codec = codec();
        for record_id in [0, 1, 42, u64::MAX] {
            let record = student(record_id);
            let line = codec.encode(&record).unwrap();
            assert!(!line.ends_with('\n'));
            assert_eq!(codec.decode(&line).unwrap(), record);
        }
    }

    #[test_traced]
    fn test_codec_encode_schema_order() {
        let schema =
            Schema::new(["birthday_date", "last_name", "record_id", "first_name"]).unwrap();
        let codec = Codec::<Student>::new(schema, ';', b'\n');
        let line = codec.encode(&student(7)).unwrap();
        assert_eq!(line, "1815-12-10;Lovelace;7;Ada");
        assert_eq!(codec.decode(&line).unwrap(), student(7));
    }

    #[test_traced]
    fn test_codec_strips_single_terminator() {
        let codec = codec();
        let record = codec.decode("1,A,B,2000-01-01\n").unwrap();
        assert_eq!(record.record_id, 1);
        assert_eq!(record.first_name, "A");
        assert_eq!(record.last_name, "B");
        assert_eq!(
            record.birthday_date,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );

        // Only one terminator is removed, so a blank line remains malformed
        assert_eq!(
            codec.decode("\n").unwrap_err(),
            Error::MalformedRecord(4, 1)
        );
    }

    #[test_traced]
    fn test_codec_field_count_mismatch() {
        let codec = codec();
        assert_eq!(
            codec.decode("1,A,B").unwrap_err(),
            Error::MalformedRecord(4, 3)
        );
        assert_eq!(
            codec.decode("1,A,B,2000-01-01,extra").unwrap_err(),
            Error::MalformedRecord(4, 5)
        );

        // Delimiters inside values are not escaped
        let mut record = student(3);
        record.first_name = "Ada,Augusta".to_string();
        let line = codec.encode(&record).unwrap();
        assert_eq!(
            codec.decode(&line).unwrap_err(),
            Error::MalformedRecord(4, 5)
        );
    }

    #[test_traced]
    fn test_codec_invalid_values() {
        let codec = codec();
        assert!(matches!(
            codec.decode("-1,A,B,2000-01-01"),
            Err(Error::InvalidField(field, _)) if field == "record_id"
        ));
        assert!(matches!(
            codec.decode("1,A,B,2000-13-01"),
            Err(Error::InvalidField(field, _)) if field == "birthday_date"
        ));
    }

    #[test_traced]
    fn test_codec_unknown_schema_field() {
        let schema = Schema::new(["record_id", "first_name", "nickname"]).unwrap();
        let codec = Codec::<Student>::new(schema, ',', b'\n');
        assert_eq!(
            codec.encode(&student(1)).unwrap_err(),
            Error::MissingField("nickname".to_string())
        );
        assert_eq!(
            codec.decode("1,A,B").unwrap_err(),
            Error::MissingField("last_name".to_string())
        );
    }

    #[test_traced]
    fn test_schema_parse() {
        let schema = Schema::parse("record_id,first_name,last_name,birthday_date\n", ',', b'\n')
            .unwrap();
        assert_eq!(schema, Student::schema());
        assert_eq!(schema.len(), 4);
        assert_eq!(
            schema.encode(','),
            "record_id,first_name,last_name,birthday_date"
        );

        assert_eq!(Schema::parse("\n", ',', b'\n'), Err(Error::EmptySchema));
        assert_eq!(
            Schema::parse("a,b,a\n", ',', b'\n'),
            Err(Error::DuplicateField("a".to_string()))
        );
    }
}
