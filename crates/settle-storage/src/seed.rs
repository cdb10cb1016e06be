//! Demo accounts and sample listings for a fresh store.

use chrono::{Duration, Utc};
use tracing::info;

use settle_core::error::SettleError;
use settle_core::types::{
    Listing, ListingStatus, PropertyType, TransactionType, User, UserRole,
};

use crate::repository::{ListingRepository, UserRepository};

/// What [`seed_demo_data`] wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub listings: usize,
}

/// Populate empty user and listing collections. Non-empty collections are
/// left untouched, so calling this on every startup is safe.
pub fn seed_demo_data(
    users: &UserRepository,
    listings: &ListingRepository,
) -> Result<SeedReport, SettleError> {
    let mut report = SeedReport::default();

    if users.is_empty()? {
        for user in demo_users() {
            users.insert(user)?;
            report.users += 1;
        }
    }

    if listings.is_empty()? {
        for listing in sample_listings() {
            listings.insert(listing)?;
            report.listings += 1;
        }
    }

    if report.users > 0 || report.listings > 0 {
        info!(
            users = report.users,
            listings = report.listings,
            "Seeded demo data"
        );
    }

    Ok(report)
}

fn demo_users() -> Vec<User> {
    let now = Utc::now();
    vec![
        User {
            id: "admin-1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@settlespace.com".to_string(),
            phone: Some("+91-9999999999".to_string()),
            role: UserRole::Admin,
            verified: true,
            created_at: now,
        },
        User {
            id: "seller-1".to_string(),
            name: "Demo Seller".to_string(),
            email: "seller@demo.com".to_string(),
            phone: Some("+91-9876543210".to_string()),
            role: UserRole::Seller,
            verified: true,
            created_at: now,
        },
        User {
            id: "buyer-1".to_string(),
            name: "Demo Buyer".to_string(),
            email: "buyer@demo.com".to_string(),
            phone: Some("+91-9876543211".to_string()),
            role: UserRole::Buyer,
            verified: true,
            created_at: now,
        },
    ]
}

fn sample_listings() -> Vec<Listing> {
    let now = Utc::now();
    let days_ago = |d: i64| now - Duration::days(d);

    vec![
        Listing {
            id: "prop-1".to_string(),
            title: "Luxury 3BHK Apartment in Bandra West".to_string(),
            description: "Spacious 3BHK apartment with sea view and modern amenities.".to_string(),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionType::Sale,
            price: 25_000_000,
            area: 1200,
            bedrooms: Some(3),
            bathrooms: Some(2),
            location: "Bandra West, Mumbai".to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: true,
            submitted_at: days_ago(1),
            approved_at: Some(now),
        },
        Listing {
            id: "prop-2".to_string(),
            title: "2BHK Modern Apartment in Koramangala".to_string(),
            description: "Well-designed 2BHK apartment with excellent connectivity.".to_string(),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionType::Rent,
            price: 35_000,
            area: 800,
            bedrooms: Some(2),
            bathrooms: Some(2),
            location: "Koramangala, Bangalore".to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: true,
            submitted_at: days_ago(2),
            approved_at: Some(days_ago(1)),
        },
        Listing {
            id: "prop-3".to_string(),
            title: "Independent House in Sector 45, Gurgaon".to_string(),
            description: "Spacious 4BHK independent house with garden and parking.".to_string(),
            property_type: PropertyType::House,
            transaction_type: TransactionType::Sale,
            price: 18_000_000,
            area: 2400,
            bedrooms: Some(4),
            bathrooms: Some(3),
            location: "Sector 45, Gurgaon".to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: true,
            submitted_at: days_ago(3),
            approved_at: Some(days_ago(2)),
        },
        Listing {
            id: "prop-4".to_string(),
            title: "Commercial Office Space in Connaught Place".to_string(),
            description: "Prime commercial office space in the heart of Delhi.".to_string(),
            property_type: PropertyType::Commercial,
            transaction_type: TransactionType::Rent,
            price: 80_000,
            area: 1500,
            bedrooms: None,
            bathrooms: None,
            location: "Connaught Place, Delhi".to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: false,
            submitted_at: days_ago(4),
            approved_at: Some(days_ago(3)),
        },
        Listing {
            id: "prop-5".to_string(),
            title: "Luxury Villa with Pool in Whitefield".to_string(),
            description: "Stunning 5BHK villa with private swimming pool.".to_string(),
            property_type: PropertyType::Villa,
            transaction_type: TransactionType::Sale,
            price: 45_000_000,
            area: 3500,
            bedrooms: Some(5),
            bathrooms: Some(4),
            location: "Whitefield, Bangalore".to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Pending,
            featured: false,
            submitted_at: now - Duration::hours(12),
            approved_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn repos() -> (UserRepository, ListingRepository) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (
            UserRepository::new(Arc::clone(&store)),
            ListingRepository::new(store),
        )
    }

    #[test]
    fn test_seed_empty_store() {
        let (users, listings) = repos();
        let report = seed_demo_data(&users, &listings).unwrap();
        assert_eq!(report, SeedReport { users: 3, listings: 5 });
        assert!(users.find_by_id("buyer-1").unwrap().is_some());
        // The villa is still awaiting approval.
        assert_eq!(listings.approved().unwrap().len(), 4);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (users, listings) = repos();
        seed_demo_data(&users, &listings).unwrap();
        let second = seed_demo_data(&users, &listings).unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(users.list().unwrap().len(), 3);
        assert_eq!(listings.list().unwrap().len(), 5);
    }
}
