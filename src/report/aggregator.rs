//! Monthly attendance aggregation.
//!
//! Turns the members who attended at least once in a month into per-category
//! counts. Every member is counted once per category no matter how many
//! sessions they attended; each of their distinct condition tags counts once
//! under `disabilities`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::buckets::BucketMap;
use super::demographics::{age_group_for, bucket_label};
use super::period::ReportPeriod;
use super::postcode;
use super::source::{AttendanceSource, AttendingMember};
use crate::errors::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub genders: BucketMap,
    pub age_groups: BucketMap,
    pub ethnicities: BucketMap,
    pub disabilities: BucketMap,
    pub sexual_orientations: BucketMap,
    pub employment_status: BucketMap,
    pub postcodes: BucketMap,
    pub locations: BucketMap,
}

/// Aggregated counts for one month. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    pub month: u32,
    pub year: i32,
    pub stats: ReportStats,
}

/// Report categories in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Gender,
    AgeGroups,
    Ethnicity,
    MedicalConditions,
    SexualOrientation,
    EmploymentStatus,
    Postcodes,
    Location,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Gender,
        Category::AgeGroups,
        Category::Ethnicity,
        Category::MedicalConditions,
        Category::SexualOrientation,
        Category::EmploymentStatus,
        Category::Postcodes,
        Category::Location,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Gender => "Gender",
            Category::AgeGroups => "Age Groups",
            Category::Ethnicity => "Ethnicity",
            Category::MedicalConditions => "Medical Conditions",
            Category::SexualOrientation => "Sexual Orientation",
            Category::EmploymentStatus => "Employment Status",
            Category::Postcodes => "Postcodes",
            Category::Location => "Location",
        }
    }
}

impl ReportStats {
    pub fn get(&self, category: Category) -> &BucketMap {
        match category {
            Category::Gender => &self.genders,
            Category::AgeGroups => &self.age_groups,
            Category::Ethnicity => &self.ethnicities,
            Category::MedicalConditions => &self.disabilities,
            Category::SexualOrientation => &self.sexual_orientations,
            Category::EmploymentStatus => &self.employment_status,
            Category::Postcodes => &self.postcodes,
            Category::Location => &self.locations,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    fn tally(&mut self, member: &AttendingMember, today: NaiveDate) {
        self.genders.increment(bucket_label(member.gender.as_deref()));
        self.ethnicities.increment(bucket_label(member.ethnicity.as_deref()));
        self.sexual_orientations
            .increment(bucket_label(member.sexual_orientation.as_deref()));
        self.employment_status
            .increment(bucket_label(member.employment_status.as_deref()));

        if let Some(group) = age_group_for(member.birth_month, member.birth_year, today) {
            self.age_groups.increment(group);
        }

        if let Some(code) = postcode::resolve(member.postcode.as_deref(), member.address.as_deref()) {
            self.postcodes.increment(&code);
            self.locations.increment(postcode::region_for(&code));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for condition in &member.conditions {
            let tag = condition.trim();
            if !tag.is_empty() && seen.insert(tag) {
                self.disabilities.increment(tag);
            }
        }
    }
}

impl AggregationReport {
    pub fn empty(period: &ReportPeriod) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
            stats: ReportStats::default(),
        }
    }

    /// Number of distinct attendees in the report.
    pub fn attendee_count(&self) -> u64 {
        self.stats.genders.total()
    }
}

/// Aggregate already-fetched members. Rows repeating a member id are ignored.
pub fn aggregate(period: &ReportPeriod, members: &[AttendingMember], today: NaiveDate) -> AggregationReport {
    let mut report = AggregationReport::empty(period);
    let mut counted: HashSet<i64> = HashSet::with_capacity(members.len());

    for member in members {
        if !counted.insert(member.member_id) {
            log::debug!("Skipping repeated row for member {}", member.member_id);
            continue;
        }
        report.stats.tally(member, today);
    }

    log::debug!(
        "Aggregated {} attendees for {}",
        counted.len(),
        period.label()
    );
    report
}

/// Build the report for `period`, computing ages as of `today`.
pub async fn generate_monthly_report_at<S: AttendanceSource>(
    source: &S,
    period: &ReportPeriod,
    today: NaiveDate,
) -> Result<AggregationReport, AppError> {
    let members = source
        .fetch_attending_members_with_conditions(period.start(), period.end())
        .await?;
    Ok(aggregate(period, &members, today))
}

/// Build the report for a month, computing ages as of the current UTC date.
pub async fn generate_monthly_report<S: AttendanceSource>(
    source: &S,
    month: u32,
    year: i32,
) -> Result<AggregationReport, AppError> {
    let period = ReportPeriod::new(month, year)?;
    generate_monthly_report_at(source, &period, Utc::now().date_naive()).await
}
