use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Constants;
use crate::structure::registration::{Material, RegistrationRequest};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name pattern"));

static ROLL_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid roll number pattern"));

// Unanchored at the end on purpose: "2nd Year CSE" is accepted.
static YEAR_OF_STUDY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(1st|2nd|3rd|4th|5th|[0-9]+)[a-z]*\s*Year").expect("valid year pattern")
});

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s()\-]{10,15}$").expect("valid phone pattern"));

/// Submitted fields in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    RollNumber,
    Department,
    YearOfStudy,
    Email,
    Phone,
    SelectedMaterial,
    IdeaDescription,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::RollNumber,
        Field::Department,
        Field::YearOfStudy,
        Field::Email,
        Field::Phone,
        Field::SelectedMaterial,
        Field::IdeaDescription,
    ];

    /// Wire name of the field
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::RollNumber => "rollNumber",
            Field::Department => "department",
            Field::YearOfStudy => "yearOfStudy",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::SelectedMaterial => "selectedMaterial",
            Field::IdeaDescription => "ideaDescription",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }

    fn required_message(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} is required", first.to_ascii_uppercase(), chars.as_str()),
            None => "Field is required".to_string(),
        }
    }
}

pub struct ValidationRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static Lazy<Regex>>,
    pub message: &'static str,
}

/// Rule table; `selectedMaterial` is a membership check and has no entry
pub fn rule_for(field: Field) -> Option<ValidationRule> {
    let rule = match field {
        Field::Name => ValidationRule {
            required: true,
            min_length: Some(2),
            max_length: Some(100),
            pattern: Some(&NAME_PATTERN),
            message: "Name must be 2-100 characters and contain only letters",
        },
        Field::RollNumber => ValidationRule {
            required: true,
            min_length: Some(3),
            max_length: Some(50),
            pattern: Some(&ROLL_NUMBER_PATTERN),
            message: "Roll number must be at least 3 characters (alphanumeric only)",
        },
        Field::Department => ValidationRule {
            required: true,
            min_length: Some(2),
            max_length: Some(100),
            pattern: None,
            message: "Department must be 2-100 characters",
        },
        Field::YearOfStudy => ValidationRule {
            required: true,
            min_length: None,
            max_length: None,
            pattern: Some(&YEAR_OF_STUDY_PATTERN),
            message: "Please enter a valid year (e.g., \"1st Year\", \"2nd Year\", \"3rd Year\")",
        },
        Field::Email => ValidationRule {
            required: true,
            min_length: None,
            max_length: None,
            pattern: Some(&EMAIL_PATTERN),
            message: "Please enter a valid email address",
        },
        Field::Phone => ValidationRule {
            required: true,
            min_length: None,
            max_length: None,
            pattern: Some(&PHONE_PATTERN),
            message: "Phone number must be 10-15 digits (country code optional)",
        },
        Field::IdeaDescription => ValidationRule {
            required: false,
            min_length: None,
            max_length: Some(Constants::IDEA_DESCRIPTION_MAX_LENGTH),
            pattern: None,
            message: "Idea description must be 140 characters or less",
        },
        Field::SelectedMaterial => return None,
    };
    Some(rule)
}

pub const INVALID_MATERIAL_MESSAGE: &str = "Please select a valid material type";

/// Field-to-message map that keeps insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(Field, String)>);

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = message,
            None => self.0.push((field, message)),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, message)| message.as_str())
    }

    /// Headline error reported to the submitter
    pub fn first(&self) -> Option<(Field, &str)> {
        self.0.first().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: ValidationErrors,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(field: Field, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.insert(field, message);
        ValidationResult { errors }
    }
}

/// Validate one field value; the result carries at most one error, keyed by `field`
pub fn validate_field(field: Field, value: Option<&str>) -> ValidationResult {
    let Some(rule) = rule_for(field) else {
        return validate_material(value);
    };

    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return if rule.required {
            ValidationResult::fail(field, field.required_message())
        } else {
            ValidationResult::default()
        };
    }

    if let Some(min) = rule.min_length {
        if trimmed.chars().count() < min {
            return ValidationResult::fail(field, rule.message);
        }
    }

    if let Some(max) = rule.max_length {
        if value.unwrap_or_default().chars().count() > max {
            return ValidationResult::fail(field, rule.message);
        }
    }

    if let Some(pattern) = rule.pattern {
        if !pattern.is_match(trimmed) {
            return ValidationResult::fail(field, rule.message);
        }
    }

    ValidationResult::default()
}

/// Validate a field addressed by its wire name; unknown names always pass
pub fn validate_named_field(name: &str, value: Option<&str>) -> ValidationResult {
    match Field::from_name(name) {
        Some(field) => validate_field(field, value),
        None => ValidationResult::default(),
    }
}

fn validate_material(value: Option<&str>) -> ValidationResult {
    match value {
        None => ValidationResult::fail(
            Field::SelectedMaterial,
            Field::SelectedMaterial.required_message(),
        ),
        Some(raw) if raw.trim().is_empty() => ValidationResult::fail(
            Field::SelectedMaterial,
            Field::SelectedMaterial.required_message(),
        ),
        Some(raw) if Material::from_id(raw).is_none() => {
            ValidationResult::fail(Field::SelectedMaterial, INVALID_MATERIAL_MESSAGE)
        }
        Some(_) => ValidationResult::default(),
    }
}

pub fn field_value(request: &RegistrationRequest, field: Field) -> Option<&str> {
    let value = match field {
        Field::Name => &request.name,
        Field::RollNumber => &request.roll_number,
        Field::Department => &request.department,
        Field::YearOfStudy => &request.year_of_study,
        Field::Email => &request.email,
        Field::Phone => &request.phone,
        Field::SelectedMaterial => &request.selected_material,
        Field::IdeaDescription => &request.idea_description,
    };
    value.as_deref()
}

/// Validate every field of a submission, collecting all failures in declaration order
pub fn validate_form(request: &RegistrationRequest) -> ValidationResult {
    let mut errors = ValidationErrors::default();
    for field in Field::ALL {
        let result = validate_field(field, field_value(request, field));
        for (failed, message) in result.errors.iter() {
            errors.insert(failed, message);
        }
    }
    ValidationResult { errors }
}
