// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory principal store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{PrincipalStore, StoreError, StoreResult, UniqueField};
use crate::auth::{password::hash_password, Role};
use crate::models::{Admin, Member, MemberPatch, Principal};

const UNIQUE_FIELDS: [UniqueField; 2] = [UniqueField::Email, UniqueField::Mobile];

#[derive(Default)]
pub struct InMemoryStore {
    partitions: RwLock<HashMap<Role, BTreeMap<Uuid, Principal>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default admin unless an admin with `email` already exists.
    ///
    /// Returns `true` when a new admin was created.
    pub async fn seed_admin(&self, email: &str, password: &str) -> StoreResult<bool> {
        match self
            .find_by_unique_field(Role::Admin, UniqueField::Email, email)
            .await
        {
            Ok(_) => {
                info!(%email, "Default admin already exists");
                return Ok(false);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let password_hash =
            hash_password(password).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.insert(Principal::Admin(Admin {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: email.to_string(),
            password_hash,
        }))
        .await?;
        info!(%email, "Default admin created");
        Ok(true)
    }
}

/// Reject `candidate` if another principal in the partition shares one of
/// its unique field values.
fn check_unique(partition: &BTreeMap<Uuid, Principal>, candidate: &Principal) -> StoreResult<()> {
    for field in UNIQUE_FIELDS {
        let Some(value) = field.value_of(candidate) else {
            continue;
        };
        let taken = partition
            .values()
            .any(|p| p.id() != candidate.id() && field.value_of(p) == Some(value));
        if taken {
            return Err(StoreError::AlreadyExists(format!(
                "{} {} already exists",
                candidate.role(),
                field.name()
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl PrincipalStore for InMemoryStore {
    async fn find_by_id(&self, kind: Role, id: Uuid) -> StoreResult<Principal> {
        self.partitions
            .read()
            .await
            .get(&kind)
            .and_then(|partition| partition.get(&id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_unique_field(
        &self,
        kind: Role,
        field: UniqueField,
        value: &str,
    ) -> StoreResult<Principal> {
        self.partitions
            .read()
            .await
            .get(&kind)
            .and_then(|partition| {
                partition
                    .values()
                    .find(|p| field.value_of(p) == Some(value))
            })
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_all(&self, kind: Role) -> StoreResult<Vec<Principal>> {
        Ok(self
            .partitions
            .read()
            .await
            .get(&kind)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, principal: Principal) -> StoreResult<()> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(principal.role()).or_default();
        if partition.contains_key(&principal.id()) {
            return Err(StoreError::AlreadyExists(format!(
                "{} {}",
                principal.role(),
                principal.id()
            )));
        }
        check_unique(partition, &principal)?;
        partition.insert(principal.id(), principal);
        Ok(())
    }

    async fn update(&self, principal: Principal) -> StoreResult<()> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions
            .get_mut(&principal.role())
            .filter(|partition| partition.contains_key(&principal.id()))
            .ok_or(StoreError::NotFound)?;
        check_unique(partition, &principal)?;
        partition.insert(principal.id(), principal);
        Ok(())
    }

    async fn update_member(&self, id: Uuid, patch: MemberPatch) -> StoreResult<Member> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions
            .get_mut(&Role::Member)
            .ok_or(StoreError::NotFound)?;
        let mut member = partition
            .get(&id)
            .cloned()
            .and_then(Principal::into_member)
            .ok_or(StoreError::NotFound)?;

        patch.apply(&mut member);
        let candidate = Principal::Member(member);
        check_unique(partition, &candidate)?;
        partition.insert(id, candidate.clone());
        candidate.into_member().ok_or(StoreError::NotFound)
    }

    async fn remove(&self, kind: Role, id: Uuid) -> StoreResult<()> {
        self.partitions
            .write()
            .await
            .get_mut(&kind)
            .and_then(|partition| partition.remove(&id))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
