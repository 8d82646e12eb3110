//! Field rules of the product form.
//!
//! Rules are evaluated on the raw string value of a control. Length rules do
//! not fire on an empty value; `Required` reports that case on its own.

use crate::date::parse_iso_date;

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Minimum number of characters.
    MinLength(usize),
    /// Maximum number of characters.
    MaxLength(usize),
    /// Value must be a `YYYY-MM-DD` date.
    IsoDate,
}

impl Rule {
    /// Evaluate the rule against `value`.
    pub fn check(&self, value: &str) -> Option<FieldError> {
        let length = value.chars().count();
        match *self {
            Rule::Required if value.is_empty() => Some(FieldError::Required),
            Rule::MinLength(required) if length > 0 && length < required => {
                Some(FieldError::MinLength { required, actual: length })
            }
            Rule::MaxLength(required) if length > required => {
                Some(FieldError::MaxLength { required, actual: length })
            }
            Rule::IsoDate if !value.is_empty() && parse_iso_date(value).is_err() => {
                Some(FieldError::InvalidDate)
            }
            _ => None,
        }
    }
}

/// Why a field is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { required: usize, actual: usize },
    MaxLength { required: usize, actual: usize },
    InvalidDate,
    /// The backend already holds a product with this identifier.
    IdExists,
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldError::Required => f.write_str("This field is required!"),
            FieldError::MinLength { required, .. } => write!(f, "Minimum {required} characters"),
            FieldError::MaxLength { required, .. } => write!(f, "Maximum {required} characters"),
            FieldError::InvalidDate => f.write_str("Invalid date"),
            FieldError::IdExists => f.write_str("ID already exists!"),
        }
    }
}

/// The controls of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Name,
    Description,
    Logo,
    DateRelease,
    DateRevision,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::Description,
        Field::Logo,
        Field::DateRelease,
        Field::DateRevision,
    ];

    /// Wire / control name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Description => "description",
            Field::Logo => "logo",
            Field::DateRelease => "date_release",
            Field::DateRevision => "date_revision",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Logo => "Logo",
            Field::DateRelease => "Release date",
            Field::DateRevision => "Revision date",
        }
    }

    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Field::Id => &[Rule::Required, Rule::MinLength(3), Rule::MaxLength(10)],
            Field::Name => &[Rule::Required, Rule::MinLength(5), Rule::MaxLength(100)],
            Field::Description => &[Rule::Required, Rule::MinLength(10), Rule::MaxLength(200)],
            Field::Logo => &[Rule::Required],
            Field::DateRelease => &[Rule::Required, Rule::IsoDate],
            // Derived; never edited directly.
            Field::DateRevision => &[],
        }
    }

    /// All rule violations for `value`, in rule order.
    pub fn check(&self, value: &str) -> Vec<FieldError> {
        self.rules().iter().filter_map(|rule| rule.check(value)).collect()
    }
}

impl core::str::FromStr for Field {
    type Err = finprod_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| finprod_core::DomainError::validation(format!("unknown field '{s}'")))
    }
}
