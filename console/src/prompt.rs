use chrono::NaiveDate;
use roster_storage::record::PrimaryKey;
use std::io::{self, BufRead, Write};

/// Reads validated answers from `input`, writing questions and hints to `output`.
///
/// Every method re-asks until the answer is valid and returns `None` once `input` is exhausted.
pub struct Prompt<I: BufRead, O: Write> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Prompt<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Where questions are written.
    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }

    /// Ask `question` and read one line (without its line ending).
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Ask for a record book number.
    pub fn record_id(&mut self) -> io::Result<Option<PrimaryKey>> {
        loop {
            let Some(answer) = self.ask("Enter record book number: ")? else {
                return Ok(None);
            };
            match answer.trim().parse() {
                Ok(record_id) => return Ok(Some(record_id)),
                Err(_) => writeln!(self.output, "Invalid number, enter a non-negative integer")?,
            }
        }
    }

    /// Ask for a name made of letters only (`label` is e.g. "first name").
    pub fn name(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            let Some(answer) = self.ask(&format!("Enter student {label}: "))? else {
                return Ok(None);
            };
            if is_name(&answer) {
                return Ok(Some(answer));
            }
            writeln!(self.output, "The {label} may only contain letters")?;
        }
    }

    /// Ask for a birthday formatted as `YYYY-MM-DD`.
    pub fn birthday(&mut self) -> io::Result<Option<NaiveDate>> {
        loop {
            let Some(answer) = self.ask("Enter student birthday (YYYY-MM-DD): ")? else {
                return Ok(None);
            };
            match NaiveDate::parse_from_str(answer.trim(), "%Y-%m-%d") {
                Ok(date) => return Ok(Some(date)),
                Err(_) => writeln!(self.output, "Invalid date format")?,
            }
        }
    }
}

/// Whether `value` is a non-empty run of letters (in any alphabet).
fn is_name(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_macros::test_traced;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(prompt: &mut Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompt.output().clone()).unwrap()
    }

    #[test_traced]
    fn test_prompt_record_id_retries() {
        let mut prompt = prompt("abc\n-4\n 17 \n");
        assert_eq!(prompt.record_id().unwrap(), Some(17));
        let output = written(&mut prompt);
        assert_eq!(
            output.matches("Invalid number, enter a non-negative integer").count(),
            2
        );
        assert_eq!(output.matches("Enter record book number: ").count(), 3);
    }

    #[test_traced]
    fn test_prompt_name_letters_only() {
        let mut prompt = prompt("Ada1\n\nAda,Lovelace\nАда\r\n");
        assert_eq!(prompt.name("first name").unwrap(), Some("Ада".to_string()));
        let output = written(&mut prompt);
        assert_eq!(
            output
                .matches("The first name may only contain letters")
                .count(),
            3
        );
    }

    #[test_traced]
    fn test_prompt_birthday() {
        let mut prompt = prompt("01.02.2000\n2000-02-30\n2000-02-29\n");
        assert_eq!(
            prompt.birthday().unwrap(),
            NaiveDate::from_ymd_opt(2000, 2, 29)
        );
        assert_eq!(written(&mut prompt).matches("Invalid date format").count(), 2);
    }

    #[test_traced]
    fn test_prompt_end_of_input() {
        let mut prompt = prompt("nope\n");
        assert_eq!(prompt.record_id().unwrap(), None);
        assert_eq!(prompt.name("last name").unwrap(), None);
        assert_eq!(prompt.birthday().unwrap(), None);
    }
}
