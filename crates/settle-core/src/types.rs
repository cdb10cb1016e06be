use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// Account role. Serialized the way the marketplace stores it (`userType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Buyer,
    Seller,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Buyer => write!(f, "buyer"),
            UserRole::Seller => write!(f, "seller"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(UserRole::Buyer),
            "seller" => Ok(UserRole::Seller),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

/// A registered marketplace user. Password material is never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "userType")]
    pub role: UserRole,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Listings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Commercial,
    Plot,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Apartment => write!(f, "apartment"),
            PropertyType::House => write!(f, "house"),
            PropertyType::Villa => write!(f, "villa"),
            PropertyType::Commercial => write!(f, "commercial"),
            PropertyType::Plot => write!(f, "plot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Rent,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Sale => write!(f, "sale"),
            TransactionType::Rent => write!(f, "rent"),
        }
    }
}

/// Admin approval state of a listing. Only `Approved` listings are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Pending => write!(f, "pending"),
            ListingStatus::Approved => write!(f, "approved"),
            ListingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A property listing as stored in the `settlespace_properties` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub property_type: PropertyType,
    pub transaction_type: TransactionType,
    /// Whole rupees. Monthly rent for rental listings.
    pub price: u64,
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub bathrooms: Option<u8>,
    pub location: String,
    pub owner_id: String,
    pub status: ListingStatus,
    #[serde(default)]
    pub featured: bool,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn is_approved(&self) -> bool {
        self.status == ListingStatus::Approved
    }

    /// Case-insensitive substring match on the location field.
    pub fn is_in(&self, place: &str) -> bool {
        self.location
            .to_lowercase()
            .contains(&place.to_lowercase())
    }

    /// Human-readable price: `₹35,000/month`, `₹2.50 Cr`, `₹18.00 L`.
    pub fn display_price(&self) -> String {
        match self.transaction_type {
            TransactionType::Rent => format!("₹{}/month", format_inr(self.price)),
            TransactionType::Sale if self.price >= 10_000_000 => {
                format!("₹{:.2} Cr", self.price as f64 / 10_000_000.0)
            }
            TransactionType::Sale if self.price >= 100_000 => {
                format!("₹{:.2} L", self.price as f64 / 100_000.0)
            }
            TransactionType::Sale => format!("₹{}", format_inr(self.price)),
        }
    }
}

/// Format an amount with Indian digit grouping (`2,50,00,000`).
///
/// The last three digits form one group; the rest are grouped in pairs.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Page context
// =============================================================================

/// The screen a user is looking at when they talk to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageContext {
    #[default]
    Home,
    Listings,
    ListingDetail,
    Dashboard,
    Other(String),
}

impl PageContext {
    /// Map a page file name (`properties.html`) or short name (`listings`).
    pub fn from_page_name(name: &str) -> Self {
        let name = name.trim().trim_start_matches('/');
        match name {
            "" | "index.html" | "home" => PageContext::Home,
            "properties.html" | "listings" => PageContext::Listings,
            "property_detail.html" | "listing" | "listing_detail" => PageContext::ListingDetail,
            "seller_dashboard.html" | "dashboard" => PageContext::Dashboard,
            other => PageContext::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageContext::Home => write!(f, "homepage"),
            PageContext::Listings => write!(f, "listings"),
            PageContext::ListingDetail => write!(f, "listing detail"),
            PageContext::Dashboard => write!(f, "seller dashboard"),
            PageContext::Other(name) => write!(f, "{}", name),
        }
    }
}
