use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::{RegistrationStore, StoreError};
use crate::structure::registration::Registration;

#[derive(Default)]
struct Tables {
    by_id: HashMap<String, Registration>,
    roll_numbers: HashMap<String, String>,
    emails: HashMap<String, String>,
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn insert(&self, registration: Registration) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if tables.roll_numbers.contains_key(&registration.roll_number) {
            return Err(StoreError::DuplicateRollNumber);
        }
        if tables.emails.contains_key(&registration.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if tables.by_id.contains_key(&registration.id) {
            return Err(StoreError::DuplicateId);
        }

        tables
            .roll_numbers
            .insert(registration.roll_number.clone(), registration.id.clone());
        tables
            .emails
            .insert(registration.email.clone(), registration.id.clone());
        tables.by_id.insert(registration.id.clone(), registration);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, StoreError> {
        Ok(self.tables.read().await.by_id.get(id).cloned())
    }

    async fn find_by_roll_number(
        &self,
        roll_number: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roll_numbers
            .get(roll_number)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.tables.read().await.by_id.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::registration::{Material, RegistrationStatus};
    use chrono::Utc;
    use std::sync::Arc;

    fn registration(id: &str, roll_number: &str, email: &str) -> Registration {
        Registration {
            id: id.to_string(),
            name: "Jane Doe".to_string(),
            roll_number: roll_number.to_string(),
            department: "CS".to_string(),
            year_of_study: "2nd Year".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            selected_material: Material::Thread,
            idea_description: String::new(),
            registered_at: Utc::now(),
            status: RegistrationStatus::Registered,
            client_identifier: "1.2.3.4".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_lookup() {
        let store = MemoryStore::new();
        store
            .insert(registration("NP2024-00001", "CS045", "jane@x.edu"))
            .await
            .unwrap();

        let by_roll = store.find_by_roll_number("CS045").await.unwrap().unwrap();
        assert_eq!(by_roll.id, "NP2024-00001");
        let by_email = store.find_by_email("jane@x.edu").await.unwrap().unwrap();
        assert_eq!(by_email.roll_number, "CS045");
        assert!(store.find_by_id("NP2024-00001").await.unwrap().is_some());
        assert!(store.find_by_email("other@x.edu").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_each_uniqueness_key() {
        let store = MemoryStore::new();
        store
            .insert(registration("NP2024-00001", "CS045", "jane@x.edu"))
            .await
            .unwrap();

        assert_eq!(
            store.insert(registration("NP2024-00002", "CS045", "new@x.edu")).await,
            Err(StoreError::DuplicateRollNumber)
        );
        assert_eq!(
            store.insert(registration("NP2024-00003", "CS046", "jane@x.edu")).await,
            Err(StoreError::DuplicateEmail)
        );
        assert_eq!(
            store.insert(registration("NP2024-00001", "CS047", "third@x.edu")).await,
            Err(StoreError::DuplicateId)
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn roll_number_conflict_wins_over_email() {
        let store = MemoryStore::new();
        store
            .insert(registration("NP2024-00001", "CS045", "jane@x.edu"))
            .await
            .unwrap();
        assert_eq!(
            store.insert(registration("NP2024-00001", "CS045", "jane@x.edu")).await,
            Err(StoreError::DuplicateRollNumber)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_admit_one_per_key() {
        let store = Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let id = format!("NP2024-{n:05}");
                    let email = format!("u{n}@x.edu");
                    store.insert(registration(&id, "CS045", &email)).await
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
