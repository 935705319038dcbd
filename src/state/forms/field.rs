//! Form field identifiers

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Every field the lead form can collect.
///
/// Contact fields are shared by both applicant categories; the detail
/// fields only exist while the matching category is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    City,
    Province,
    Category,
    Note,
    PensionProvider,
    PensionKind,
    EmployerSector,
    ContractKind,
    EmployerSize,
    HireYear,
    NetIncome,
    BirthYear,
    ExistingLoans,
    RequestedAmount,
}

/// Returned when a field name coming from the shell is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl Field {
    pub const ALL: [Field; 17] = [
        Field::FullName,
        Field::Email,
        Field::Phone,
        Field::City,
        Field::Province,
        Field::Category,
        Field::Note,
        Field::PensionProvider,
        Field::PensionKind,
        Field::EmployerSector,
        Field::ContractKind,
        Field::EmployerSize,
        Field::HireYear,
        Field::NetIncome,
        Field::BirthYear,
        Field::ExistingLoans,
        Field::RequestedAmount,
    ];

    /// Fields collected on the first step
    pub const CONTACT: [Field; 3] = [Field::FullName, Field::Email, Field::Phone];

    /// Key used in the submission payload
    pub fn key(&self) -> &'static str {
        match self {
            Self::FullName => "nomeCognome",
            Self::Email => "email",
            Self::Phone => "telefono",
            Self::City => "citta",
            Self::Province => "provincia",
            Self::Category => "categoria",
            Self::Note => "domande",
            Self::PensionProvider => "entePensionistico",
            Self::PensionKind => "tipoPensione",
            Self::EmployerSector => "settore",
            Self::ContractKind => "contratto",
            Self::EmployerSize => "dimensioneAzienda",
            Self::HireYear => "annoAssunzione",
            Self::NetIncome => "redditoNetto",
            Self::BirthYear => "annoNascita",
            Self::ExistingLoans => "finanziamentiInCorso",
            Self::RequestedAmount => "importoRichiesto",
        }
    }

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Nome e cognome",
            Self::Email => "Email",
            Self::Phone => "Numero di telefono",
            Self::City => "Città di residenza",
            Self::Province => "Provincia",
            Self::Category => "Sei pensionato o dipendente?",
            Self::Note => "Domande o informazioni aggiuntive",
            Self::PensionProvider => "Ente pensionistico",
            Self::PensionKind => "Tipo di pensione",
            Self::EmployerSector => "Settore del datore di lavoro",
            Self::ContractKind => "Tipo di contratto",
            Self::EmployerSize => "Numero di dipendenti dell'azienda",
            Self::HireYear => "Anno di assunzione",
            Self::NetIncome => "Reddito netto mensile (€)",
            Self::BirthYear => "Anno di nascita",
            Self::ExistingLoans => "Hai finanziamenti in corso?",
            Self::RequestedAmount => "Importo richiesto (€)",
        }
    }

    /// Accepted values for selector fields, empty for free text
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Category => &["pensionato", "dipendente"],
            Self::PensionProvider => &["inps", "ex-inpdap", "altro"],
            Self::PensionKind => &["vecchiaia", "anticipata", "invalidita", "reversibilita"],
            Self::EmployerSector => &["pubblico", "statale", "privato"],
            Self::ContractKind => &["indeterminato", "determinato"],
            Self::EmployerSize => &["1-15", "16-50", "51-250", "oltre-250"],
            Self::ExistingLoans => &["si", "no"],
            _ => &[],
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Note)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Note)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the payload key (case-insensitive) or a snake_case alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Some(field) = Field::ALL
            .iter()
            .find(|f| f.key().eq_ignore_ascii_case(wanted))
        {
            return Ok(*field);
        }
        let field = match wanted.to_ascii_lowercase().as_str() {
            "full_name" | "name" => Self::FullName,
            "phone" => Self::Phone,
            "city" => Self::City,
            "province" | "region" => Self::Province,
            "category" => Self::Category,
            "note" => Self::Note,
            "pension_provider" => Self::PensionProvider,
            "pension_kind" => Self::PensionKind,
            "employer_sector" => Self::EmployerSector,
            "contract_kind" => Self::ContractKind,
            "employer_size" => Self::EmployerSize,
            "hire_year" => Self::HireYear,
            "net_income" => Self::NetIncome,
            "birth_year" => Self::BirthYear,
            "existing_loans" => Self::ExistingLoans,
            "requested_amount" => Self::RequestedAmount,
            _ => return Err(UnknownField(s.to_string())),
        };
        Ok(field)
    }
}
