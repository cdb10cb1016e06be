//! Repositories for the user and listing collections.

use std::sync::Arc;

use settle_core::error::SettleError;
use settle_core::types::{Listing, TransactionType, User};

use crate::collection::Collection;
use crate::keys;
use crate::store::KeyValueStore;

/// Repository for registered users.
pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            users: Collection::new(store, keys::USERS),
        }
    }

    pub fn list(&self) -> Result<Vec<User>, SettleError> {
        self.users.load()
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>, SettleError> {
        Ok(self.users.load()?.into_iter().find(|u| u.id == id))
    }

    /// Add a user. Emails are unique, as in the sign-up form.
    pub fn insert(&self, user: User) -> Result<(), SettleError> {
        self.users.update(|users| {
            if users.iter().any(|u| u.email == user.email) {
                return Err(SettleError::Storage(format!(
                    "User with email {} already exists",
                    user.email
                )));
            }
            users.push(user);
            Ok(())
        })
    }

    pub fn is_empty(&self) -> Result<bool, SettleError> {
        Ok(self.users.load()?.is_empty())
    }
}

/// Repository for property listings.
pub struct ListingRepository {
    listings: Collection<Listing>,
}

impl ListingRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            listings: Collection::new(store, keys::LISTINGS),
        }
    }

    /// Every listing regardless of approval status.
    pub fn list(&self) -> Result<Vec<Listing>, SettleError> {
        self.listings.load()
    }

    /// Listings visible to buyers, in stored order.
    pub fn approved(&self) -> Result<Vec<Listing>, SettleError> {
        Ok(self
            .listings
            .load()?
            .into_iter()
            .filter(Listing::is_approved)
            .collect())
    }

    pub fn approved_by_transaction(
        &self,
        transaction_type: TransactionType,
    ) -> Result<Vec<Listing>, SettleError> {
        Ok(self
            .approved()?
            .into_iter()
            .filter(|l| l.transaction_type == transaction_type)
            .collect())
    }

    pub fn insert(&self, listing: Listing) -> Result<(), SettleError> {
        self.listings.push(listing)
    }

    pub fn is_empty(&self) -> Result<bool, SettleError> {
        Ok(self.listings.load()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use settle_core::types::{ListingStatus, PropertyType, UserRole};

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test".to_string(),
            email: email.to_string(),
            phone: None,
            role: UserRole::Buyer,
            verified: false,
            created_at: Utc::now(),
        }
    }

    fn listing(id: &str, tx: TransactionType, status: ListingStatus) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            description: String::new(),
            property_type: PropertyType::House,
            transaction_type: tx,
            price: 1_000_000,
            area: 1000,
            bedrooms: None,
            bathrooms: None,
            location: "Sector 45, Gurgaon".to_string(),
            owner_id: "seller-1".to_string(),
            status,
            featured: false,
            submitted_at: Utc::now(),
            approved_at: None,
        }
    }

    #[test]
    fn test_user_insert_and_find() {
        let repo = UserRepository::new(store());
        assert!(repo.is_empty().unwrap());
        repo.insert(user("buyer-1", "buyer@demo.com")).unwrap();
        let found = repo.find_by_id("buyer-1").unwrap().unwrap();
        assert_eq!(found.email, "buyer@demo.com");
        assert!(repo.find_by_id("nobody").unwrap().is_none());
    }

    #[test]
    fn test_user_duplicate_email_rejected() {
        let repo = UserRepository::new(store());
        repo.insert(user("a", "same@demo.com")).unwrap();
        assert!(repo.insert(user("b", "same@demo.com")).is_err());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_approved_filters_pending_and_rejected() {
        let repo = ListingRepository::new(store());
        repo.insert(listing("1", TransactionType::Sale, ListingStatus::Approved))
            .unwrap();
        repo.insert(listing("2", TransactionType::Sale, ListingStatus::Pending))
            .unwrap();
        repo.insert(listing("3", TransactionType::Rent, ListingStatus::Rejected))
            .unwrap();
        repo.insert(listing("4", TransactionType::Rent, ListingStatus::Approved))
            .unwrap();

        assert_eq!(repo.list().unwrap().len(), 4);
        let ids: Vec<String> = repo.approved().unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(
            repo.approved_by_transaction(TransactionType::Rent)
                .unwrap()
                .len(),
            1
        );
    }
}
