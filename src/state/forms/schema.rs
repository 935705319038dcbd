//! Declarative field constraints and subset validation

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Local};
use regex::Regex;

use super::field::Field;

/// Candidate values keyed by field; absent keys count as empty
pub type FieldValues = BTreeMap<Field, String>;

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_DIGITS: usize = 10;
const MIN_APPLICANT_AGE: i32 = 18;
const EARLIEST_BIRTH_YEAR: i32 = 1900;
const EARLIEST_HIRE_YEAR: i32 = 1950;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Field-level error messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the entries for `fields` with whatever `other` reports for them
    pub fn replace_for(&mut self, fields: &[Field], other: ValidationErrors) {
        for field in fields {
            self.0.remove(field);
        }
        self.0.extend(other.0);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate the given subset of fields against `values`.
///
/// Every invalid field gets exactly one message. Fields outside `fields`
/// are never inspected, so the same call gates a single step or the
/// whole form.
pub fn validate_subset(fields: &[Field], values: &FieldValues) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in fields {
        let value = values.get(field).map(String::as_str).unwrap_or("");
        if let Err(message) = validate_field(*field, value) {
            errors.insert(*field, message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a single value, returning the user-facing message on failure
pub fn validate_field(field: Field, value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if field == Field::Phone && !has_phone_characters_only(value) {
        return Err(PHONE_CHARACTERS_MESSAGE);
    }
    let ok = match field {
        Field::FullName => value.chars().count() >= MIN_NAME_CHARS,
        Field::Email => EMAIL_RE.is_match(value),
        Field::Phone => value.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS,
        Field::City | Field::Province => !value.is_empty(),
        Field::Note => true,
        Field::Category
        | Field::PensionProvider
        | Field::PensionKind
        | Field::EmployerSector
        | Field::ContractKind
        | Field::EmployerSize
        | Field::ExistingLoans => field
            .options()
            .iter()
            .any(|option| option.eq_ignore_ascii_case(value)),
        Field::NetIncome | Field::RequestedAmount => parse_amount(value).is_some_and(|a| a > 0.0),
        Field::BirthYear => parse_year(value).is_some_and(|y| {
            (EARLIEST_BIRTH_YEAR..=current_year() - MIN_APPLICANT_AGE).contains(&y)
        }),
        Field::HireYear => {
            parse_year(value).is_some_and(|y| (EARLIEST_HIRE_YEAR..=current_year()).contains(&y))
        }
    };
    if ok {
        Ok(())
    } else {
        Err(message_for(field))
    }
}

fn message_for(field: Field) -> &'static str {
    match field {
        Field::FullName => "Il nome e cognome devono contenere almeno 2 caratteri",
        Field::Email => "Inserisci un indirizzo email valido",
        Field::Phone => "Il numero di telefono deve contenere almeno 10 cifre",
        Field::City => "Inserisci la città in cui risiedi",
        Field::Province => "Inserisci la provincia",
        Field::Category => "Seleziona se sei pensionato o dipendente",
        Field::NetIncome | Field::RequestedAmount => "Inserisci un importo valido",
        Field::BirthYear => "Inserisci un anno di nascita valido",
        Field::HireYear => "Inserisci un anno di assunzione valido",
        _ => "Seleziona un'opzione",
    }
}

const PHONE_CHARACTERS_MESSAGE: &str =
    "Il numero di telefono può contenere solo cifre, spazi e i simboli + - . / ( )";

/// Digits plus the usual separators
fn has_phone_characters_only(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')' | '/'))
}

/// Parse an amount in Italian notation: `.` groups thousands, `,` marks decimals
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '€' | ' ' | '.'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_year(value: &str) -> Option<i32> {
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn current_year() -> i32 {
    Local::now().year()
}
