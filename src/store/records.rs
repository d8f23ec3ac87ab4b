// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for sessions, announcements and registration forms.
//!
//! Methods are synchronous; `AppState` wraps the store in a
//! `tokio::sync::RwLock`. Referential checks against principals (coach of a
//! session, member of a registration) happen in the handlers, which own the
//! `PrincipalStore` handle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::models::{
    Announcement, CreateAnnouncementRequest, CreateRegistrationRequest, CreateSessionRequest,
    RegistrationForm, Session, UpdateRegistrationRequest, UpdateSessionRequest,
};

#[derive(Default)]
pub struct RecordStore {
    sessions: HashMap<Uuid, Session>,
    announcements: Vec<Announcement>,
    registrations: HashMap<Uuid, RegistrationForm>,
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Sessions
    // ---------------------------------------------------------------------

    pub fn create_session(&mut self, request: CreateSessionRequest, now: DateTime<Utc>) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            coach_id: request.coach_id,
            title: request.title,
            description: request.description,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            venue: request.venue,
            max_students: request.max_students,
            created_at: now,
            updated_at: now,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    pub fn session(&self, id: Uuid) -> StoreResult<Session> {
        self.sessions.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    /// All sessions, ordered by date then start time.
    pub fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));
        sessions
    }

    pub fn sessions_by_coach(&self, coach_id: Uuid) -> Vec<Session> {
        self.list_sessions()
            .into_iter()
            .filter(|s| s.coach_id == coach_id)
            .collect()
    }

    pub fn update_session(
        &mut self,
        id: Uuid,
        request: UpdateSessionRequest,
        now: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let session = self.sessions.get_mut(&id).ok_or(StoreError::NotFound)?;
        apply(&mut session.title, request.title);
        apply(&mut session.description, request.description);
        apply(&mut session.date, request.date);
        apply(&mut session.start_time, request.start_time);
        apply(&mut session.end_time, request.end_time);
        apply(&mut session.venue, request.venue);
        apply(&mut session.max_students, request.max_students);
        session.updated_at = now;
        Ok(session.clone())
    }

    pub fn delete_session(&mut self, id: Uuid) -> StoreResult<()> {
        self.sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    // ---------------------------------------------------------------------
    // Announcements
    // ---------------------------------------------------------------------

    pub fn create_announcement(
        &mut self,
        request: CreateAnnouncementRequest,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Announcement {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: request.title,
            content: request.content,
            created_by,
            created_at: now,
        };
        self.announcements.push(announcement.clone());
        announcement
    }

    /// Newest first.
    pub fn list_announcements(&self) -> Vec<Announcement> {
        let mut announcements = self.announcements.clone();
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        announcements
    }

    // ---------------------------------------------------------------------
    // Registration forms
    // ---------------------------------------------------------------------

    /// At most one form per member.
    pub fn create_registration(
        &mut self,
        request: CreateRegistrationRequest,
        now: DateTime<Utc>,
    ) -> StoreResult<RegistrationForm> {
        if self
            .registrations
            .values()
            .any(|r| r.member_id == request.member_id)
        {
            return Err(StoreError::AlreadyExists(format!(
                "registration for member {} already exists",
                request.member_id
            )));
        }

        let form = RegistrationForm {
            id: Uuid::new_v4(),
            form_no: request.form_no,
            date: request.date,
            reference: request.reference,
            full_name: request.full_name,
            date_of_birth: request.date_of_birth,
            residence_address: request.residence_address,
            contact_no: request.contact_no,
            email: request.email,
            education: request.education,
            school_college: request.school_college,
            aadhaar_no: request.aadhaar_no,
            whatsapp: request.whatsapp,
            parent_details: request.parent_details,
            member_id: request.member_id,
            created_at: now,
            updated_at: now,
        };
        self.registrations.insert(form.id, form.clone());
        Ok(form)
    }

    pub fn registration(&self, id: Uuid) -> StoreResult<RegistrationForm> {
        self.registrations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub fn list_registrations(&self) -> Vec<RegistrationForm> {
        let mut forms: Vec<RegistrationForm> = self.registrations.values().cloned().collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        forms
    }

    pub fn update_registration(
        &mut self,
        id: Uuid,
        request: UpdateRegistrationRequest,
        now: DateTime<Utc>,
    ) -> StoreResult<RegistrationForm> {
        let form = self.registrations.get_mut(&id).ok_or(StoreError::NotFound)?;
        apply(&mut form.form_no, request.form_no);
        apply(&mut form.date, request.date);
        apply(&mut form.reference, request.reference);
        apply(&mut form.full_name, request.full_name);
        apply(&mut form.date_of_birth, request.date_of_birth);
        apply(&mut form.residence_address, request.residence_address);
        apply(&mut form.contact_no, request.contact_no);
        apply(&mut form.email, request.email);
        apply(&mut form.education, request.education);
        apply(&mut form.school_college, request.school_college);
        apply(&mut form.aadhaar_no, request.aadhaar_no);
        apply(&mut form.whatsapp, request.whatsapp);
        apply(&mut form.parent_details, request.parent_details);
        form.updated_at = now;
        Ok(form.clone())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::ParentDetails;

    pub fn session_request(coach_id: Uuid) -> CreateSessionRequest {
        CreateSessionRequest {
            coach_id,
            title: "Net practice".to_string(),
            description: "Batting against pace".to_string(),
            date: "2024-02-20".to_string(),
            start_time: "07:00".to_string(),
            end_time: "09:00".to_string(),
            venue: "Ground B".to_string(),
            max_students: 12,
        }
    }

    pub fn registration_request(member_id: Uuid) -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            form_no: "F-001".to_string(),
            date: "2024-01-15".to_string(),
            reference: String::new(),
            full_name: "Test Member".to_string(),
            date_of_birth: "2010-05-04".to_string(),
            residence_address: "12 Pavilion Road".to_string(),
            contact_no: "9000000001".to_string(),
            email: "m@example.com".to_string(),
            education: "Grade 8".to_string(),
            school_college: "City School".to_string(),
            aadhaar_no: "123412341234".to_string(),
            whatsapp: "9000000001".to_string(),
            parent_details: ParentDetails {
                name: "Parent".to_string(),
                contact_no: "9000000002".to_string(),
                occupation: "Engineer".to_string(),
            },
            member_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 13, 9, 0, 0).unwrap()
    }

    #[test]
    fn session_partial_update_keeps_other_fields() {
        let mut store = RecordStore::new();
        let created = store.create_session(fixtures::session_request(Uuid::new_v4()), now());

        let later = now() + Duration::hours(1);
        let updated = store
            .update_session(
                created.id,
                UpdateSessionRequest {
                    venue: Some("Indoor nets".to_string()),
                    ..Default::default()
                },
                later,
            )
            .unwrap();

        assert_eq!(updated.venue, "Indoor nets");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn sessions_by_coach_filters() {
        let mut store = RecordStore::new();
        let coach = Uuid::new_v4();
        store.create_session(fixtures::session_request(coach), now());
        store.create_session(fixtures::session_request(Uuid::new_v4()), now());

        assert_eq!(store.list_sessions().len(), 2);
        assert_eq!(store.sessions_by_coach(coach).len(), 1);
    }

    #[test]
    fn delete_missing_session_is_not_found() {
        let mut store = RecordStore::new();
        assert_eq!(store.delete_session(Uuid::new_v4()), Err(StoreError::NotFound));
    }

    #[test]
    fn announcements_newest_first() {
        let mut store = RecordStore::new();
        let admin = Uuid::new_v4();
        let request = |title: &str| CreateAnnouncementRequest {
            title: title.to_string(),
            content: "body".to_string(),
        };
        store.create_announcement(request("old"), admin, now());
        store.create_announcement(request("new"), admin, now() + Duration::days(1));

        let titles: Vec<String> = store.list_announcements().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn one_registration_per_member() {
        let mut store = RecordStore::new();
        let member = Uuid::new_v4();
        store
            .create_registration(fixtures::registration_request(member), now())
            .unwrap();
        assert!(matches!(
            store.create_registration(fixtures::registration_request(member), now()),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn registration_update_replaces_parent_details() {
        let mut store = RecordStore::new();
        let form = store
            .create_registration(fixtures::registration_request(Uuid::new_v4()), now())
            .unwrap();

        let mut parent = form.parent_details.clone();
        parent.occupation = "Teacher".to_string();
        let updated = store
            .update_registration(
                form.id,
                UpdateRegistrationRequest {
                    parent_details: Some(parent.clone()),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(updated.parent_details, parent);
        assert_eq!(updated.full_name, form.full_name);
    }
}
