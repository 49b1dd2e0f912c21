use super::{Error, Fields, PrimaryKey, Record};
use chrono::NaiveDate;

/// Format of `birthday_date` (ISO-8601 calendar date).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A student, identified by the number of their record book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    pub record_id: PrimaryKey,
    pub first_name: String,
    pub last_name: String,
    pub birthday_date: NaiveDate,
}

impl Record for Student {
    const FIELDS: &'static [&'static str] =
        &["record_id", "first_name", "last_name", "birthday_date"];

    fn key(&self) -> PrimaryKey {
        self.record_id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "record_id" => Some(self.record_id.to_string()),
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            "birthday_date" => Some(self.birthday_date.format(DATE_FORMAT).to_string()),
            _ => None,
        }
    }

    fn from_fields(fields: &Fields<'_>) -> Result<Self, Error> {
        let record_id = fields
            .get("record_id")?
            .parse()
            .map_err(|err| Error::InvalidField("record_id".into(), format!("{err}")))?;
        let first_name = fields.get("first_name")?.to_string();
        let last_name = fields.get("last_name")?.to_string();
        let birthday_date = NaiveDate::parse_from_str(fields.get("birthday_date")?, DATE_FORMAT)
            .map_err(|err| Error::InvalidField("birthday_date".into(), format!("{err}")))?;
        Ok(Self {
            record_id,
            first_name,
            last_name,
            birthday_date,
        })
    }
}
