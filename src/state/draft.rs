//! The in-progress form record and its category-dependent data

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::forms::{Field, FieldValues};

/// Fields of the closing sub-step, shared by both categories
const LOCATION_STEP: &[Field] = &[Field::City, Field::Province, Field::Note];

static RETIREE_SCHEDULE: [&[Field]; 6] = [
    &[Field::PensionProvider],
    &[Field::PensionKind],
    &[Field::NetIncome],
    &[Field::BirthYear],
    &[Field::ExistingLoans],
    LOCATION_STEP,
];

static EMPLOYEE_SCHEDULE: [&[Field]; 9] = [
    &[Field::EmployerSector],
    &[Field::ContractKind],
    &[Field::EmployerSize],
    &[Field::HireYear],
    &[Field::NetIncome],
    &[Field::BirthYear],
    &[Field::ExistingLoans],
    &[Field::RequestedAmount],
    LOCATION_STEP,
];

/// Sub-step shown before a category has been picked
const CATEGORY_PICKER: &[Field] = &[Field::Category];

/// Provisional total while no category is chosen
pub const PROVISIONAL_TOTAL_STEPS: u8 = 2;

/// Applicant classification that selects the sub-flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "PENSIONATO")]
    Retiree,
    #[serde(rename = "DIPENDENTE")]
    Employee,
}

impl Category {
    /// Parse a selector value; Italian and English names are accepted
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pensionato" | "retiree" => Some(Self::Retiree),
            "dipendente" | "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Value sent in the `categoria` payload field
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Retiree => "PENSIONATO",
            Self::Employee => "DIPENDENTE",
        }
    }

    /// Value as it appears in the selector
    pub fn selector_value(&self) -> &'static str {
        match self {
            Self::Retiree => "pensionato",
            Self::Employee => "dipendente",
        }
    }

    /// Fields asked on each sub-step, in order
    pub fn schedule(&self) -> &'static [&'static [Field]] {
        match self {
            Self::Retiree => &RETIREE_SCHEDULE,
            Self::Employee => &EMPLOYEE_SCHEDULE,
        }
    }

    pub fn final_sub_step(&self) -> u8 {
        self.schedule().len() as u8
    }

    /// Contact step plus every sub-step
    pub fn total_steps(&self) -> u8 {
        1 + self.final_sub_step()
    }

    /// Every detail field this category collects, excluding the shared location step
    pub fn detail_fields(&self) -> impl Iterator<Item = Field> {
        self.schedule()
            .iter()
            .flat_map(|step| step.iter().copied())
            .filter(|f| !LOCATION_STEP.contains(f))
    }

    /// Fields that must validate before the draft can be submitted
    pub fn required_fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Field::CONTACT.to_vec();
        fields.push(Field::Category);
        fields.extend(self.schedule().iter().flat_map(|step| step.iter().copied()));
        fields
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector_value())
    }
}

/// Contact details collected on the first step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Answers of the retiree sub-flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetireeDetails {
    pub step: u8,
    pub pension_provider: String,
    pub pension_kind: String,
    pub net_income: String,
    pub birth_year: String,
    pub existing_loans: String,
}

impl Default for RetireeDetails {
    fn default() -> Self {
        Self {
            step: 1,
            pension_provider: String::new(),
            pension_kind: String::new(),
            net_income: String::new(),
            birth_year: String::new(),
            existing_loans: String::new(),
        }
    }
}

/// Answers of the employee sub-flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDetails {
    pub step: u8,
    pub employer_sector: String,
    pub contract_kind: String,
    pub employer_size: String,
    pub hire_year: String,
    pub net_income: String,
    pub birth_year: String,
    pub existing_loans: String,
    pub requested_amount: String,
}

impl Default for EmployeeDetails {
    fn default() -> Self {
        Self {
            step: 1,
            employer_sector: String::new(),
            contract_kind: String::new(),
            employer_size: String::new(),
            hire_year: String::new(),
            net_income: String::new(),
            birth_year: String::new(),
            existing_loans: String::new(),
            requested_amount: String::new(),
        }
    }
}

/// Category-dependent state; at most one category is ever live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryData {
    #[default]
    Unselected,
    Retiree(RetireeDetails),
    Employee(EmployeeDetails),
}

impl CategoryData {
    /// Initial sub-state for a category
    pub fn initial(category: Category) -> Self {
        match category {
            Category::Retiree => Self::Retiree(RetireeDetails::default()),
            Category::Employee => Self::Employee(EmployeeDetails::default()),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Unselected => None,
            Self::Retiree(_) => Some(Category::Retiree),
            Self::Employee(_) => Some(Category::Employee),
        }
    }

    /// Sub-step within the category flow; the category picker counts as 1
    pub fn step(&self) -> u8 {
        match self {
            Self::Unselected => 1,
            Self::Retiree(d) => d.step,
            Self::Employee(d) => d.step,
        }
    }

    pub fn set_step(&mut self, step: u8) {
        match self {
            Self::Unselected => {}
            Self::Retiree(d) => d.step = step,
            Self::Employee(d) => d.step = step,
        }
    }

    pub fn is_final_step(&self) -> bool {
        self.category()
            .is_some_and(|c| self.step() >= c.final_sub_step())
    }

    /// Fields asked on the current sub-step
    pub fn step_fields(&self) -> &'static [Field] {
        match self.category() {
            None => CATEGORY_PICKER,
            Some(category) => {
                let schedule = category.schedule();
                let index = usize::from(self.step().max(1)) - 1;
                schedule[index.min(schedule.len() - 1)]
            }
        }
    }

    fn value(&self, field: Field) -> Option<&str> {
        let value = match (self, field) {
            (Self::Retiree(d), Field::PensionProvider) => &d.pension_provider,
            (Self::Retiree(d), Field::PensionKind) => &d.pension_kind,
            (Self::Retiree(d), Field::NetIncome) => &d.net_income,
            (Self::Retiree(d), Field::BirthYear) => &d.birth_year,
            (Self::Retiree(d), Field::ExistingLoans) => &d.existing_loans,
            (Self::Employee(d), Field::EmployerSector) => &d.employer_sector,
            (Self::Employee(d), Field::ContractKind) => &d.contract_kind,
            (Self::Employee(d), Field::EmployerSize) => &d.employer_size,
            (Self::Employee(d), Field::HireYear) => &d.hire_year,
            (Self::Employee(d), Field::NetIncome) => &d.net_income,
            (Self::Employee(d), Field::BirthYear) => &d.birth_year,
            (Self::Employee(d), Field::ExistingLoans) => &d.existing_loans,
            (Self::Employee(d), Field::RequestedAmount) => &d.requested_amount,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        let value = match (self, field) {
            (Self::Retiree(d), Field::PensionProvider) => &mut d.pension_provider,
            (Self::Retiree(d), Field::PensionKind) => &mut d.pension_kind,
            (Self::Retiree(d), Field::NetIncome) => &mut d.net_income,
            (Self::Retiree(d), Field::BirthYear) => &mut d.birth_year,
            (Self::Retiree(d), Field::ExistingLoans) => &mut d.existing_loans,
            (Self::Employee(d), Field::EmployerSector) => &mut d.employer_sector,
            (Self::Employee(d), Field::ContractKind) => &mut d.contract_kind,
            (Self::Employee(d), Field::EmployerSize) => &mut d.employer_size,
            (Self::Employee(d), Field::HireYear) => &mut d.hire_year,
            (Self::Employee(d), Field::NetIncome) => &mut d.net_income,
            (Self::Employee(d), Field::BirthYear) => &mut d.birth_year,
            (Self::Employee(d), Field::ExistingLoans) => &mut d.existing_loans,
            (Self::Employee(d), Field::RequestedAmount) => &mut d.requested_amount,
            _ => return None,
        };
        Some(value)
    }
}

/// The mutable working record of one form session
#[derive(Debug, Clone)]
pub struct FormDraft {
    /// Correlates log lines of one session; never sent
    pub id: Uuid,
    pub personal: PersonalInfo,
    pub category_data: CategoryData,
    pub city: String,
    pub province: String,
    pub note: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            personal: PersonalInfo::default(),
            category_data: CategoryData::Unselected,
            city: String::new(),
            province: String::new(),
            note: String::new(),
            submitted_at: None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.category_data.category()
    }

    /// Current value of a field, `None` when the field is not live
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::FullName => Some(&self.personal.full_name),
            Field::Email => Some(&self.personal.email),
            Field::Phone => Some(&self.personal.phone),
            Field::City => Some(&self.city),
            Field::Province => Some(&self.province),
            Field::Note => Some(&self.note),
            Field::Category => self.category().map(|c| c.selector_value()),
            _ => self.category_data.value(field),
        }
    }

    /// Store a plain field value.
    ///
    /// Returns false when the field has no slot in the live category; the
    /// category selector itself is not set here.
    pub fn set_value(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::FullName => &mut self.personal.full_name,
            Field::Email => &mut self.personal.email,
            Field::Phone => &mut self.personal.phone,
            Field::City => &mut self.city,
            Field::Province => &mut self.province,
            Field::Note => &mut self.note,
            Field::Category => return false,
            _ => match self.category_data.value_mut(field) {
                Some(slot) => slot,
                None => return false,
            },
        };
        *slot = value;
        true
    }

    /// Snapshot of every live field, for the validator
    pub fn values(&self) -> FieldValues {
        Field::ALL
            .iter()
            .filter_map(|f| self.value(*f).map(|v| (*f, v.to_string())))
            .collect()
    }

    /// Detail answers of the live category as (payload key, trimmed value)
    pub fn detail_answers(&self) -> Vec<(&'static str, String)> {
        match self.category() {
            None => Vec::new(),
            Some(category) => category
                .detail_fields()
                .filter_map(|f| self.value(f).map(|v| (f.key(), v.trim().to_string())))
                .collect(),
        }
    }
}

impl Default for FormDraft {
    fn default() -> Self {
        Self::new()
    }
}
