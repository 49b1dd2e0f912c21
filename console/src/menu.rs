use crate::prompt::Prompt;
use roster_storage::{
    access::{self, Access},
    record::Student,
};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Errors that end the console session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("access error: {0}")]
    Access(#[from] access::Error),
}

/// Show the menu and handle choices until the user exits or input ends.
///
/// Duplicate and missing records are reported to the user. Any other storage error ends the
/// session.
pub fn run<I: BufRead, O: Write>(
    access: &mut dyn Access<Student>,
    prompt: &mut Prompt<I, O>,
) -> Result<(), Error> {
    loop {
        writeln!(prompt.output(), "Choose an action:")?;
        writeln!(prompt.output(), "1. Add student")?;
        writeln!(prompt.output(), "2. Find student by record book number")?;
        writeln!(prompt.output(), "3. Exit")?;
        let Some(choice) = prompt.ask(">> ")? else {
            return Ok(());
        };
        let finished = match choice.trim() {
            "1" => add_student(access, prompt)?,
            "2" => find_student(access, prompt)?,
            "3" => return Ok(()),
            _ => {
                writeln!(prompt.output(), "No such option\n")?;
                false
            }
        };
        if finished {
            return Ok(());
        }
    }
}

/// Ask for a new student and add it. Returns `true` if input ended.
fn add_student<I: BufRead, O: Write>(
    access: &mut dyn Access<Student>,
    prompt: &mut Prompt<I, O>,
) -> Result<bool, Error> {
    let Some(record_id) = prompt.record_id()? else {
        return Ok(true);
    };
    let Some(first_name) = prompt.name("first name")? else {
        return Ok(true);
    };
    let Some(last_name) = prompt.name("last name")? else {
        return Ok(true);
    };
    let Some(birthday_date) = prompt.birthday()? else {
        return Ok(true);
    };
    let student = Student {
        record_id,
        first_name,
        last_name,
        birthday_date,
    };

    match access.add_record(&student) {
        Ok(()) => writeln!(prompt.output(), "Added!\n")?,
        Err(access::Error::DuplicateRecordId(_)) => writeln!(
            prompt.output(),
            "A student with this record book number already exists!\n"
        )?,
        Err(access::Error::KeyTooLarge(_, max_key)) => writeln!(
            prompt.output(),
            "Record book numbers may not exceed {max_key}!\n"
        )?,
        Err(err) => return Err(err.into()),
    }
    Ok(false)
}

/// Ask for a record book number and show the matching student. Returns `true` if input ended.
fn find_student<I: BufRead, O: Write>(
    access: &dyn Access<Student>,
    prompt: &mut Prompt<I, O>,
) -> Result<bool, Error> {
    let Some(record_id) = prompt.record_id()? else {
        return Ok(true);
    };
    writeln!(prompt.output())?;

    match access.get_record(record_id) {
        Ok(student) => {
            writeln!(prompt.output(), "Student found")?;
            writeln!(
                prompt.output(),
                "{} {} {} (born {})",
                student.record_id,
                student.first_name,
                student.last_name,
                student.birthday_date
            )?;
        }
        Err(access::Error::RecordNotFound(_)) => {
            debug!(record_id, "student not found");
            writeln!(prompt.output(), "Student not found")?;
        }
        Err(err) => return Err(err.into()),
    }
    writeln!(prompt.output())?;
    Ok(false)
}
