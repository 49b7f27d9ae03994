use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    Available,
    Busy,
    OnLeave,
}

/// Profile record for a team member, persisted in `team-members.json`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
}

impl crate::store::Record for TeamMember {
    const COLLECTION: &'static str = "team-members";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl TeamMember {
    /// Bare profile with no optional fields filled in.
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
            availability: Availability::Available,
            team_id: None,
            join_date: None,
            phone: None,
            emergency_contact: None,
            address: None,
            city: None,
            state: None,
            zipcode: None,
            employee_id: None,
            department: None,
            employment_type: None,
            skills: None,
            education: None,
            experience: None,
            certifications: None,
        }
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Profile payload used both to create a member and to update one. On
/// update, absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub availability: Option<Availability>,
    pub team_id: Option<u64>,
    pub join_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    #[serde(default, deserialize_with = "crate::models::lenient_years")]
    #[schema(value_type = Option<u32>, example = 5)]
    pub experience: Option<u32>,
    pub certifications: Option<String>,
}

impl TeamMemberUpdate {
    /// Drops every field only an admin may change.
    pub fn without_admin_fields(self) -> Self {
        Self {
            employee_id: None,
            join_date: None,
            department: None,
            employment_type: None,
            role: None,
            name: None,
            email: None,
            ..self
        }
    }

    pub fn apply_to(self, member: &mut TeamMember) {
        let Self {
            name,
            email,
            role,
            availability,
            team_id,
            join_date,
            phone,
            emergency_contact,
            address,
            city,
            state,
            zipcode,
            employee_id,
            department,
            employment_type,
            skills,
            education,
            experience,
            certifications,
        } = self;

        if let Some(name) = name {
            member.name = name;
        }
        if let Some(email) = email {
            member.email = email;
        }
        if let Some(role) = role {
            member.role = role;
        }
        if let Some(availability) = availability {
            member.availability = availability;
        }

        macro_rules! overwrite {
            ($target:ident; $($field:ident),* $(,)?) => {
                $(if $field.is_some() { $target.$field = $field; })*
            };
        }

        overwrite!(
            member;
            team_id,
            join_date,
            phone,
            emergency_contact,
            address,
            city,
            state,
            zipcode,
            employee_id,
            department,
            employment_type,
            skills,
            education,
            experience,
            certifications,
        );
    }
}
