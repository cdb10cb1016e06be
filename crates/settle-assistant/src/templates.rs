//! Fixed reply texts and the pure rule-table renderer.

use settle_core::types::{format_inr, Listing, PageContext, TransactionType};

use crate::intent::{City, Intent};

/// Appended to a reply whenever an escalation offer is armed.
pub const OFFER: &str =
    "Would you like me to connect you with our admin for personalized assistance?";

/// Reply to an accepted offer.
pub const ESCALATED_ACK: &str =
    "Great! I've notified our admin. They will contact you shortly for personalized assistance.";

/// Reply when something inside the assistant failed.
pub const TROUBLE: &str = "I'm having trouble connecting right now. Would you like me to connect you with our admin for immediate assistance?";

const PRICE_GUIDE: &str = "Property prices vary by location. Mumbai: ₹8,000-25,000/sq ft, Bangalore: ₹4,000-12,000/sq ft. Browse by budget.";

const UNKNOWN: &str = "I can help with property search, pricing, and platform features.";

/// A rendered rule-table reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub link: Option<String>,
}

impl Rendered {
    fn new(text: String, link: Option<&str>) -> Self {
        Self {
            text,
            link: link.map(str::to_string),
        }
    }
}

/// Render the reply for `intent`. `listings` must already be limited to
/// approved listings. A city named alongside buy or rent narrows the count
/// and the link, never the wording.
pub fn render(intent: &Intent, user_name: &str, listings: &[Listing]) -> Rendered {
    match intent {
        Intent::Greeting => Rendered::new(
            format!(
                "Hi {}! How can I help you find your perfect property today?",
                user_name
            ),
            None,
        ),
        Intent::Buy { city } => {
            let n = count(listings, TransactionType::Sale, *city);
            Rendered::new(
                format!(
                    "We have {} properties for sale! Browse Properties to find your dream home.",
                    n
                ),
                Some(&listings_link(Some(TransactionType::Sale), *city)),
            )
        }
        Intent::Rent { city } => {
            let n = count(listings, TransactionType::Rent, *city);
            Rendered::new(
                format!(
                    "{} rental properties available! View Rentals to find your perfect place.",
                    n
                ),
                Some(&listings_link(Some(TransactionType::Rent), *city)),
            )
        }
        Intent::City(city) => {
            let matches: Vec<&Listing> = listings.iter().filter(|l| l.is_in(city.name())).collect();
            match matches.first() {
                Some(first) => Rendered::new(
                    format!(
                        "Found {} properties in {}! Like \"{}\" in {} for ₹{}. See all {} properties.",
                        matches.len(),
                        city,
                        first.title,
                        first.location,
                        format_inr(first.price),
                        city
                    ),
                    Some(&listings_link(None, Some(*city))),
                ),
                None => Rendered::new(
                    format!(
                        "We don't have any listings in {} right now. Browse Properties to see what's available elsewhere.",
                        city
                    ),
                    Some("/properties"),
                ),
            }
        }
        Intent::PriceQuery => Rendered::new(PRICE_GUIDE.to_string(), Some("/properties")),
        Intent::Unknown => Rendered::new(UNKNOWN.to_string(), None),
    }
}

/// Greeting shown when the chat opens on `page`.
pub fn welcome(user_name: &str, page: &PageContext) -> String {
    let tail = match page {
        PageContext::Home => {
            "I can help you find properties, answer questions about real estate, or guide you through our platform."
        }
        PageContext::Listings => {
            "I can help you find specific properties, explain details, or suggest similar options."
        }
        PageContext::ListingDetail => {
            "I can provide more details about this property or help you with the inquiry process."
        }
        PageContext::Dashboard => {
            "I can help you manage your listings or answer questions about selling on our platform."
        }
        PageContext::Other(_) => "How can I assist you today?",
    };
    format!(
        "Hi {}! I'm your SettleSpace AI assistant. {}",
        user_name, tail
    )
}

/// `text` followed by the offer sentence.
pub fn with_offer(text: &str) -> String {
    format!("{}\n\n{}", text.trim_end(), OFFER)
}

fn count(listings: &[Listing], kind: TransactionType, city: Option<City>) -> usize {
    listings
        .iter()
        .filter(|l| l.transaction_type == kind)
        .filter(|l| city.map_or(true, |c| l.is_in(c.name())))
        .count()
}

fn listings_link(kind: Option<TransactionType>, city: Option<City>) -> String {
    let mut params = Vec::new();
    if let Some(kind) = kind {
        params.push(format!("type={}", kind));
    }
    if let Some(city) = city {
        params.push(format!("location={}", city.slug()));
    }
    if params.is_empty() {
        "/properties".to_string()
    } else {
        format!("/properties?{}", params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use settle_core::types::{ListingStatus, PropertyType};

    fn listing(id: &str, location: &str, kind: TransactionType, price: u64) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            description: String::new(),
            property_type: PropertyType::Apartment,
            transaction_type: kind,
            price,
            area: 1000,
            bedrooms: Some(2),
            bathrooms: Some(2),
            location: location.to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: false,
            submitted_at: Utc::now(),
            approved_at: None,
        }
    }

    fn catalogue() -> Vec<Listing> {
        vec![
            listing("a", "Bandra West, Mumbai", TransactionType::Sale, 25_000_000),
            listing("b", "Koramangala, Bangalore", TransactionType::Rent, 35_000),
            listing("c", "Sector 45, Gurgaon", TransactionType::Sale, 18_000_000),
        ]
    }

    #[test]
    fn test_greeting_uses_name() {
        let r = render(&Intent::Greeting, "Demo Buyer", &[]);
        assert_eq!(
            r.text,
            "Hi Demo Buyer! How can I help you find your perfect property today?"
        );
        assert_eq!(r.link, None);
    }

    #[test]
    fn test_buy_counts_sale_listings() {
        let r = render(&Intent::Buy { city: None }, "x", &catalogue());
        assert_eq!(
            r.text,
            "We have 2 properties for sale! Browse Properties to find your dream home."
        );
        assert_eq!(r.link.as_deref(), Some("/properties?type=sale"));
    }

    #[test]
    fn test_rent_in_city_with_no_matches_counts_zero() {
        let r = render(
            &Intent::Rent {
                city: Some(City::Mumbai),
            },
            "x",
            &catalogue(),
        );
        assert_eq!(
            r.text,
            "0 rental properties available! View Rentals to find your perfect place."
        );
        assert_eq!(
            r.link.as_deref(),
            Some("/properties?type=rent&location=mumbai")
        );
    }

    #[test]
    fn test_city_scoped_counts_keep_generic_wording() {
        let rent = render(
            &Intent::Rent {
                city: Some(City::Bangalore),
            },
            "x",
            &catalogue(),
        );
        assert_eq!(
            rent.text,
            "1 rental properties available! View Rentals to find your perfect place."
        );

        let buy = render(
            &Intent::Buy {
                city: Some(City::Gurgaon),
            },
            "x",
            &catalogue(),
        );
        assert_eq!(
            buy.text,
            "We have 1 properties for sale! Browse Properties to find your dream home."
        );
        assert_eq!(
            buy.link.as_deref(),
            Some("/properties?type=sale&location=gurgaon")
        );
    }

    #[test]
    fn test_city_with_matches_quotes_first_listing() {
        let r = render(&Intent::City(City::Mumbai), "x", &catalogue());
        assert_eq!(
            r.text,
            "Found 1 properties in Mumbai! Like \"Listing a\" in Bandra West, Mumbai for ₹2,50,00,000. See all Mumbai properties."
        );
        assert_eq!(r.link.as_deref(), Some("/properties?location=mumbai"));
    }

    #[test]
    fn test_city_without_matches() {
        let r = render(&Intent::City(City::Delhi), "x", &catalogue());
        assert!(r.text.starts_with("We don't have any listings in Delhi right now."));
    }

    #[test]
    fn test_price_and_unknown() {
        assert!(render(&Intent::PriceQuery, "x", &[])
            .text
            .contains("Mumbai: ₹8,000-25,000/sq ft"));
        let unknown = render(&Intent::Unknown, "x", &[]);
        assert_eq!(
            unknown.text,
            "I can help with property search, pricing, and platform features."
        );
    }

    #[test]
    fn test_welcome_per_page() {
        assert_eq!(
            welcome("Asha", &PageContext::Home),
            "Hi Asha! I'm your SettleSpace AI assistant. I can help you find properties, answer questions about real estate, or guide you through our platform."
        );
        assert!(welcome("Asha", &PageContext::Listings).ends_with("suggest similar options."));
        assert!(welcome("Asha", &PageContext::Other("about.html".into()))
            .ends_with("How can I assist you today?"));
    }

    #[test]
    fn test_with_offer() {
        assert_eq!(
            with_offer("Not sure.  "),
            format!("Not sure.\n\n{}", OFFER)
        );
    }
}
