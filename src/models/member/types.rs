use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::report::postcode;

pub const GENDERS: &[&str] = &["Male", "Female", "Non-binary", "Other", "Prefer not to say"];

pub const ETHNICITIES: &[&str] = &[
    "White British",
    "White Other",
    "Mixed",
    "Asian or Asian British",
    "Black or Black British",
    "Arab",
    "Other",
    "Prefer not to say",
];

pub const SEXUAL_ORIENTATIONS: &[&str] = &[
    "Heterosexual",
    "Gay",
    "Lesbian",
    "Bisexual",
    "Other",
    "Prefer not to say",
];

pub const EMPLOYMENT_STATUSES: &[&str] = &[
    "Employed",
    "Self-employed",
    "Unemployed",
    "Student",
    "Retired",
    "Unable to work",
    "Prefer not to say",
];

/// Suggested condition tags. Free text is still accepted.
pub const CONDITION_SUGGESTIONS: &[&str] = &[
    "Autism Spectrum Disorder",
    "ADHD",
    "Learning Disability",
    "Mental Health Condition",
    "Physical Disability",
    "Sensory Impairment",
];

/// Oldest accepted birth year, relative to the current year.
const MAX_AGE: i32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_month: Option<i32>,
    pub birth_year: Option<i32>,
    pub ethnicity: Option<String>,
    pub sexual_orientation: Option<String>,
    pub employment_status: Option<String>,
    pub postcode: Option<String>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member row for list views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberListItem {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub postcode: Option<String>,
    pub condition_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberPage {
    pub items: Vec<MemberListItem>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Create/update payload for a member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_month: Option<i32>,
    pub birth_year: Option<i32>,
    pub ethnicity: Option<String>,
    pub sexual_orientation: Option<String>,
    pub employment_status: Option<String>,
    pub postcode: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Cleaned values ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_month: Option<i32>,
    pub birth_year: Option<i32>,
    pub ethnicity: Option<String>,
    pub sexual_orientation: Option<String>,
    pub employment_status: Option<String>,
    pub postcode: Option<String>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl MemberRequest {
    /// Validation errors for this payload; empty when it can be saved.
    pub fn validate(&self, current_year: i32) -> Vec<String> {
        let mut errors: Vec<String> = [
            validate::validate_required(&self.first_name, "First name", 100),
            validate::validate_optional(&self.last_name, "Last name", 100),
            validate::validate_optional(&self.address, "Address", 500),
            validate::validate_optional(&self.phone, "Phone", 40),
            validate::validate_optional_email(&self.email),
            validate::validate_choice(self.gender.as_deref(), "Gender", GENDERS),
            validate::validate_choice(self.ethnicity.as_deref(), "Ethnicity", ETHNICITIES),
            validate::validate_choice(
                self.sexual_orientation.as_deref(),
                "Sexual orientation",
                SEXUAL_ORIENTATIONS,
            ),
            validate::validate_choice(
                self.employment_status.as_deref(),
                "Employment status",
                EMPLOYMENT_STATUSES,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        if let Some(m) = self.birth_month {
            if !(1..=12).contains(&m) {
                errors.push("Birth month must be between 1 and 12".to_string());
            }
        }
        if let Some(y) = self.birth_year {
            if y > current_year || y < current_year - MAX_AGE {
                errors.push(format!(
                    "Birth year must be between {} and {current_year}",
                    current_year - MAX_AGE
                ));
            }
        }
        errors
    }

    /// Trim fields and fill the postcode from the address when it is blank.
    pub fn into_new_member(self) -> NewMember {
        let postcode = postcode::resolve(self.postcode.as_deref(), Some(&self.address));
        NewMember {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            gender: clean(&self.gender),
            birth_month: self.birth_month,
            birth_year: self.birth_year,
            ethnicity: clean(&self.ethnicity),
            sexual_orientation: clean(&self.sexual_orientation),
            employment_status: clean(&self.employment_status),
            postcode,
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}
