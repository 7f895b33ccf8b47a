//! # Profile Module
//!
//! Roles, domain categories, and the role-specific profile records.
//!
//! ## Record Shapes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PROFILE RECORDS                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  users/{id}          UserRecord                                         │
//! │                      { name, email, userType, createdAt, authProvider } │
//! │                      Role-independent; consulted on every sign-in to    │
//! │                      recover the chosen role.                           │
//! │                                                                         │
//! │  startups/{id}       ProfileRecord::Startup                             │
//! │                      { name, domain, description, fundingNeeded,        │
//! │                        stage, location, website, teamSize, email }      │
//! │                                                                         │
//! │  investors/{id}      ProfileRecord::Investor                            │
//! │                      { name, interestedDomains, investmentRange,        │
//! │                        investmentStages, location, about, email }       │
//! │                                                                         │
//! │  students/{id}       ProfileRecord::Student                             │
//! │                      { name, email, mobile, college, course, cgpa,      │
//! │                        specialization }                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one record exists per (identity, role) pair; the presence of that
//! record is the sole "onboarding complete" signal. Records are validated at
//! the boundary before any write, and writes are whole-record replacements.

use serde::{Deserialize, Serialize};

use crate::auth::Provider;
use crate::error::{Error, Result};

/// The three roles a visitor can sign up as
///
/// Chosen once per browsing session before authentication and persisted in
/// durable local prefs; the copy stored inside the `users/{id}` record is
/// authoritative once it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A startup seeking investment
    Startup,
    /// An investor looking for startups
    Investor,
    /// A student enrolling in programs
    Student,
}

impl Role {
    /// Convert to the string stored in prefs and user records
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Startup => "startup",
            Role::Investor => "investor",
            Role::Student => "student",
        }
    }

    /// Parse from a stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "startup" => Some(Role::Startup),
            "investor" => Some(Role::Investor),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// The store collection holding this role's profile records
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Startup => "startups",
            Role::Investor => "investors",
            Role::Student => "students",
        }
    }

    /// The dashboard path for this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Startup => "/startup-dashboard",
            Role::Investor => "/investor-dashboard",
            Role::Student => "/student-dashboard",
        }
    }

    /// The role on the other side of the matching rule, if any
    ///
    /// Students do not participate in matching.
    pub fn counterpart(&self) -> Option<Role> {
        match self {
            Role::Startup => Some(Role::Investor),
            Role::Investor => Some(Role::Startup),
            Role::Student => None,
        }
    }
}

/// Business domain categories
///
/// Matching compares the stored strings exactly, so the serialized names
/// here are the canonical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    /// Stored as "Technology"
    #[serde(rename = "Technology")]
    Technology,
    /// Stored as "Healthcare"
    #[serde(rename = "Healthcare")]
    Healthcare,
    /// Stored as "Finance"
    #[serde(rename = "Finance")]
    Finance,
    /// Stored as "Education"
    #[serde(rename = "Education")]
    Education,
    /// Stored as "E-commerce"
    #[serde(rename = "E-commerce")]
    ECommerce,
}

impl Domain {
    /// Canonical stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Technology => "Technology",
            Domain::Healthcare => "Healthcare",
            Domain::Finance => "Finance",
            Domain::Education => "Education",
            Domain::ECommerce => "E-commerce",
        }
    }

    /// Parse from a stored string (case-sensitive)
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Technology" => Ok(Domain::Technology),
            "Healthcare" => Ok(Domain::Healthcare),
            "Finance" => Ok(Domain::Finance),
            "Education" => Ok(Domain::Education),
            "E-commerce" => Ok(Domain::ECommerce),
            other => Err(Error::UnknownDomain(other.to_string())),
        }
    }
}

/// Investment range buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentRange {
    /// Up to $50,000
    #[serde(rename = "0-50k")]
    UpTo50k,
    /// $50,000 to $200,000
    #[serde(rename = "50k-200k")]
    To200k,
    /// $200,000 to $1,000,000
    #[serde(rename = "200k-1m")]
    To1m,
    /// Above $1,000,000
    #[serde(rename = "1m+")]
    Above1m,
}

/// Startup maturity stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartupStage {
    /// Idea stage, nothing built yet
    #[serde(rename = "Idea")]
    Idea,
    /// Minimum viable product shipped
    #[serde(rename = "MVP")]
    Mvp,
    /// First users or revenue
    #[serde(rename = "Early Traction")]
    EarlyTraction,
    /// Scaling an established product
    #[serde(rename = "Growth")]
    Growth,
}

/// Role-independent record at `users/{id}`
///
/// Written once at signup (or on first federated sign-in) and read on every
/// identity change to recover the chosen role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// The role chosen at signup
    pub user_type: Role,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// Which credential mechanism created the account
    pub auth_provider: Provider,
}

/// A role-specific profile record, tagged by role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileRecord {
    /// A startup's profile
    #[serde(rename_all = "camelCase")]
    Startup {
        /// Startup name
        name: String,
        /// Single-select business domain
        domain: Domain,
        /// What the startup does
        description: String,
        /// Funding sought, free-form amount
        funding_needed: String,
        /// Current maturity stage
        stage: StartupStage,
        /// Where the startup operates
        location: String,
        /// Public website
        website: String,
        /// Team headcount, free-form
        team_size: String,
        /// Contact email
        email: String,
    },
    /// An investor's profile
    #[serde(rename_all = "camelCase")]
    Investor {
        /// Investor name
        name: String,
        /// Domains the investor will look at (at least one)
        interested_domains: Vec<Domain>,
        /// Ticket size bucket
        investment_range: InvestmentRange,
        /// Stages the investor invests at
        investment_stages: Vec<StartupStage>,
        /// Where the investor operates
        location: String,
        /// Short bio
        about: String,
        /// Contact email
        email: String,
    },
    /// A student's profile
    #[serde(rename_all = "camelCase")]
    Student {
        /// Full name
        name: String,
        /// Email address
        email: String,
        /// Mobile number
        mobile: String,
        /// College attended
        college: String,
        /// Course enrolled in
        course: String,
        /// Grade point average (0.0 to 10.0)
        cgpa: String,
        /// Chosen specialization track
        specialization: String,
    },
}

impl ProfileRecord {
    /// The role this record belongs to
    pub fn role(&self) -> Role {
        match self {
            ProfileRecord::Startup { .. } => Role::Startup,
            ProfileRecord::Investor { .. } => Role::Investor,
            ProfileRecord::Student { .. } => Role::Student,
        }
    }

    /// The profile's display name
    pub fn name(&self) -> &str {
        match self {
            ProfileRecord::Startup { name, .. }
            | ProfileRecord::Investor { name, .. }
            | ProfileRecord::Student { name, .. } => name,
        }
    }

    /// The startup's single domain, if this is a startup record
    pub fn domain(&self) -> Option<Domain> {
        match self {
            ProfileRecord::Startup { domain, .. } => Some(*domain),
            _ => None,
        }
    }

    /// The investor's interest set, if this is an investor record
    pub fn interested_domains(&self) -> Option<&[Domain]> {
        match self {
            ProfileRecord::Investor {
                interested_domains, ..
            } => Some(interested_domains),
            _ => None,
        }
    }

    /// Validate the record before it crosses the store boundary
    ///
    /// Rejects empty required fields, investors with no interest domains,
    /// and student CGPAs outside 0..=10.
    pub fn validate(&self) -> Result<()> {
        match self {
            ProfileRecord::Startup {
                name,
                description,
                funding_needed,
                location,
                email,
                ..
            } => {
                require(name, "name")?;
                require(description, "description")?;
                require(funding_needed, "funding needed")?;
                require(location, "location")?;
                require(email, "email")?;
            }
            ProfileRecord::Investor {
                name,
                interested_domains,
                location,
                email,
                ..
            } => {
                require(name, "name")?;
                require(location, "location")?;
                require(email, "email")?;
                if interested_domains.is_empty() {
                    return Err(Error::ProfileValidation(
                        "select at least one interested domain".into(),
                    ));
                }
            }
            ProfileRecord::Student {
                name,
                email,
                mobile,
                college,
                course,
                cgpa,
                ..
            } => {
                require(name, "name")?;
                require(email, "email")?;
                require(mobile, "mobile")?;
                require(college, "college")?;
                require(course, "course")?;
                let parsed: f32 = cgpa.trim().parse().map_err(|_| {
                    Error::ProfileValidation(format!("cgpa is not a number: {}", cgpa))
                })?;
                if !(0.0..=10.0).contains(&parsed) {
                    return Err(Error::ProfileValidation(format!(
                        "cgpa out of range: {}",
                        cgpa
                    )));
                }
            }
        }
        Ok(())
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ProfileValidation(format!("{} is required", field)));
    }
    Ok(())
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Shared profile fixtures for tests across the crate
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn startup_profile(name: &str, domain: Domain) -> ProfileRecord {
        ProfileRecord::Startup {
            name: name.to_string(),
            domain,
            description: "We build things".to_string(),
            funding_needed: "250000".to_string(),
            stage: StartupStage::Mvp,
            location: "Bengaluru".to_string(),
            website: "https://example.com".to_string(),
            team_size: "4".to_string(),
            email: "founders@example.com".to_string(),
        }
    }

    pub(crate) fn investor_profile(name: &str, domains: Vec<Domain>) -> ProfileRecord {
        ProfileRecord::Investor {
            name: name.to_string(),
            interested_domains: domains,
            investment_range: InvestmentRange::To200k,
            investment_stages: vec![StartupStage::Idea, StartupStage::Mvp],
            location: "Mumbai".to_string(),
            about: "Early-stage angel".to_string(),
            email: "angel@example.com".to_string(),
        }
    }

    pub(crate) fn student_profile(name: &str) -> ProfileRecord {
        ProfileRecord::Student {
            name: name.to_string(),
            email: "student@example.com".to_string(),
            mobile: "9999999999".to_string(),
            college: "IIT".to_string(),
            course: "CSE".to_string(),
            cgpa: "8.7".to_string(),
            specialization: "AI/ML".to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::fixtures::{investor_profile, startup_profile};
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Startup, Role::Investor, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_role_counterparts() {
        assert_eq!(Role::Startup.counterpart(), Some(Role::Investor));
        assert_eq!(Role::Investor.counterpart(), Some(Role::Startup));
        assert_eq!(Role::Student.counterpart(), None);
    }

    #[test]
    fn test_domain_strings_are_exact() {
        assert_eq!(Domain::ECommerce.as_str(), "E-commerce");
        assert!(Domain::parse("e-commerce").is_err());
        assert_eq!(Domain::parse("Technology").unwrap(), Domain::Technology);
    }

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let record = startup_profile("Acme", Domain::Technology);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["role"], "startup");
        assert_eq!(value["domain"], "Technology");
        assert!(value.get("fundingNeeded").is_some());
        assert!(value.get("teamSize").is_some());
    }

    #[test]
    fn test_investor_needs_a_domain() {
        let record = investor_profile("Angel", vec![]);
        let err = record.validate().unwrap_err();
        assert!(matches!(err, Error::ProfileValidation(_)));

        let record = investor_profile("Angel", vec![Domain::Finance]);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_student_cgpa_bounds() {
        let mut record = ProfileRecord::Student {
            name: "Dev".to_string(),
            email: "dev@example.com".to_string(),
            mobile: "9999999999".to_string(),
            college: "IIT".to_string(),
            course: "CSE".to_string(),
            cgpa: "8.7".to_string(),
            specialization: "AI/ML".to_string(),
        };
        assert!(record.validate().is_ok());

        if let ProfileRecord::Student { cgpa, .. } = &mut record {
            *cgpa = "11".to_string();
        }
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_empty_required_field_rejected() {
        let record = ProfileRecord::Startup {
            name: "".to_string(),
            domain: Domain::Finance,
            description: "x".to_string(),
            funding_needed: "1".to_string(),
            stage: StartupStage::Idea,
            location: "x".to_string(),
            website: "".to_string(),
            team_size: "1".to_string(),
            email: "a@b.c".to_string(),
        };
        assert!(matches!(
            record.validate(),
            Err(Error::ProfileValidation(_))
        ));
    }
}
