// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage
//!
//! - [`PrincipalStore`] is the seam between the auth core and whatever
//!   document store holds admins, coaches and members. Callers only
//!   distinguish [`StoreError::NotFound`] from every other failure.
//! - [`InMemoryStore`] is the bundled implementation, three disjoint
//!   partitions behind one lock.
//! - [`RecordStore`] holds sessions, announcements and registration forms.

pub mod principals;
pub mod records;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::Role;
use crate::models::{Member, MemberPatch, Principal};

pub use principals::InMemoryStore;
pub use records::RecordStore;

/// Storage error type.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the requested key
    #[error("not found")]
    NotFound,
    /// A unique field or key is already taken
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// Any other storage failure
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields that are unique within a principal partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// Admins and members
    Email,
    /// Coaches and members
    Mobile,
}

impl UniqueField {
    /// The field's value on `principal`, if that kind carries it.
    pub fn value_of(self, principal: &Principal) -> Option<&str> {
        match (self, principal) {
            (UniqueField::Email, Principal::Admin(a)) => Some(&a.email),
            (UniqueField::Email, Principal::Member(m)) => Some(&m.email),
            (UniqueField::Mobile, Principal::Coach(c)) => Some(&c.mobile),
            (UniqueField::Mobile, Principal::Member(m)) => Some(&m.mobile),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Mobile => "mobile",
        }
    }
}

/// Lookup and persistence of principals, partitioned by [`Role`].
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_by_id(&self, kind: Role, id: Uuid) -> StoreResult<Principal>;

    async fn find_by_unique_field(
        &self,
        kind: Role,
        field: UniqueField,
        value: &str,
    ) -> StoreResult<Principal>;

    async fn list_all(&self, kind: Role) -> StoreResult<Vec<Principal>>;

    /// Insert a new principal into its partition.
    async fn insert(&self, principal: Principal) -> StoreResult<()>;

    /// Replace an existing principal.
    async fn update(&self, principal: Principal) -> StoreResult<()>;

    /// Apply `patch` to the stored member atomically and return the result.
    ///
    /// Only the fields set in the patch are written, so concurrent patches
    /// touching different fields never undo each other.
    async fn update_member(&self, id: Uuid, patch: MemberPatch) -> StoreResult<Member>;

    async fn remove(&self, kind: Role, id: Uuid) -> StoreResult<()>;
}
