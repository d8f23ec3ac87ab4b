// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain and API Data Models
//!
//! ## Principals
//!
//! Admins, coaches and members share one lookup shape (identifier, password
//! hash, role-specific fields) and live in disjoint storage partitions. They
//! are modelled as the closed [`Principal`] variant so that gates can stay
//! generic over the kind while storage partitioning stays explicit.
//!
//! Principal records hold password hashes and are never serialized to
//! clients; handlers convert them into the `*Profile` views below.
//!
//! ## Records
//!
//! - **Sessions**: scheduled coaching sessions
//! - **Announcements**: admin broadcasts shown to members
//! - **Registration forms**: enrolment paperwork, one per member

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// =============================================================================
// Principals
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coach {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub joining_date: Option<DateTime<Utc>>,
    /// Payment due date. Only admin operations write it, and it is not
    /// recomputed as time passes.
    pub due_date: Option<DateTime<Utc>>,
    pub inactive: bool,
}

/// Due date derived from a joining date: one calendar month later, same
/// time of day. Day-of-month overflow clamps to the last day of the target
/// month (Jan 31 → Feb 29 in a leap year).
pub fn due_date_for(joining_date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    joining_date.checked_add_months(Months::new(1))
}

impl Member {
    /// Set or clear the joining date, re-deriving the due date from it.
    pub fn set_joining_date(&mut self, joining_date: Option<DateTime<Utc>>) {
        self.joining_date = joining_date;
        self.due_date = joining_date.and_then(due_date_for);
    }
}

/// Field-level change to a stored member. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password_hash: Option<String>,
    /// Re-derives the due date; `Some(None)` clears both.
    pub joining_date: Option<Option<DateTime<Utc>>>,
    /// Applied after `joining_date`, so an explicit due date wins.
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub inactive: Option<bool>,
}

impl MemberPatch {
    pub fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(mobile) = self.mobile {
            member.mobile = mobile;
        }
        if let Some(password_hash) = self.password_hash {
            member.password_hash = password_hash;
        }
        if let Some(joining_date) = self.joining_date {
            member.set_joining_date(joining_date);
        }
        if let Some(due_date) = self.due_date {
            member.due_date = due_date;
        }
        if let Some(inactive) = self.inactive {
            member.inactive = inactive;
        }
    }
}

/// Any authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Admin(Admin),
    Coach(Coach),
    Member(Member),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Admin(a) => a.id,
            Principal::Coach(c) => c.id,
            Principal::Member(m) => m.id,
        }
    }

    /// Role, which is also the storage partition.
    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(_) => Role::Admin,
            Principal::Coach(_) => Role::Coach,
            Principal::Member(_) => Role::Member,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Principal::Admin(a) => &a.password_hash,
            Principal::Coach(c) => &c.password_hash,
            Principal::Member(m) => &m.password_hash,
        }
    }

    pub fn into_member(self) -> Option<Member> {
        match self {
            Principal::Member(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_coach(self) -> Option<Coach> {
        match self {
            Principal::Coach(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_admin(self) -> Option<Admin> {
        match self {
            Principal::Admin(a) => Some(a),
            _ => None,
        }
    }
}

// =============================================================================
// Profiles (client-facing views, no password hashes)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name.clone(),
            email: admin.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoachProfile {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&Coach> for CoachProfile {
    fn from(coach: &Coach) -> Self {
        Self {
            id: coach.id,
            name: coach.name.clone(),
            mobile: coach.mobile.clone(),
            created_at: coach.created_at,
            is_active: coach.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
    pub joining_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub inactive: bool,
}

impl From<&Member> for MemberProfile {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            mobile: member.mobile.clone(),
            created_at: member.created_at,
            joining_date: member.joining_date,
            due_date: member.due_date,
            inactive: member.inactive,
        }
    }
}

/// Profile of whichever principal kind logged in.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PrincipalProfile {
    Admin(AdminProfile),
    Coach(CoachProfile),
    Member(MemberProfile),
}

impl From<&Principal> for PrincipalProfile {
    fn from(principal: &Principal) -> Self {
        match principal {
            Principal::Admin(a) => PrincipalProfile::Admin(a.into()),
            Principal::Coach(c) => PrincipalProfile::Coach(c.into()),
            Principal::Member(m) => PrincipalProfile::Member(m.into()),
        }
    }
}

// =============================================================================
// Account requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub password: String,
}

/// Member and coach login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MobileLoginRequest {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal: PrincipalProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCoachRequest {
    pub name: String,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoachRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// `null` clears both the joining date and the derived due date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJoiningDateRequest {
    pub joining_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDueDateRequest {
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInactiveStatusRequest {
    pub is_inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// A scheduled coaching session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub max_students: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub coach_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub max_students: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub max_students: Option<u32>,
}

// =============================================================================
// Announcements
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Admin that published it
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
}

// =============================================================================
// Registration Forms
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParentDetails {
    pub name: String,
    pub contact_no: String,
    pub occupation: String,
}

/// Enrolment form. Dates are kept as the strings the paper form carries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub id: Uuid,
    pub form_no: String,
    pub date: String,
    pub reference: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub residence_address: String,
    pub contact_no: String,
    pub email: String,
    pub education: String,
    pub school_college: String,
    pub aadhaar_no: String,
    pub whatsapp: String,
    pub parent_details: ParentDetails,
    pub member_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub form_no: String,
    pub date: String,
    #[serde(default)]
    pub reference: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub residence_address: String,
    pub contact_no: String,
    pub email: String,
    pub education: String,
    pub school_college: String,
    pub aadhaar_no: String,
    pub whatsapp: String,
    pub parent_details: ParentDetails,
    pub member_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationRequest {
    pub form_no: Option<String>,
    pub date: Option<String>,
    pub reference: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub residence_address: Option<String>,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub education: Option<String>,
    pub school_college: Option<String>,
    pub aadhaar_no: Option<String>,
    pub whatsapp: Option<String>,
    pub parent_details: Option<ParentDetails>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::auth::password::hash_password;
    use chrono::TimeZone;

    pub fn member(mobile: &str, email: &str, password: &str) -> Member {
        Member {
            id: Uuid::new_v4(),
            name: "Test Member".to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            joining_date: None,
            due_date: None,
            inactive: false,
        }
    }

    pub fn coach(mobile: &str, password: &str) -> Coach {
        Coach {
            id: Uuid::new_v4(),
            name: "Test Coach".to_string(),
            mobile: mobile.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            is_active: true,
        }
    }

    pub fn admin(email: &str, password: &str) -> Admin {
        Admin {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
        }
    }
}
