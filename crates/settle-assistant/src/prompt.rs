//! Bounded prompt for the remote completion model.

use settle_core::types::{format_inr, Listing, PageContext, User};

use crate::types::ConversationTurn;

/// Inputs to [`build_prompt`]. Slices are taken as given; callers trim them
/// to the configured turn and listing budgets.
pub struct PromptContext<'a> {
    pub user: &'a User,
    pub page: &'a PageContext,
    pub history: &'a [&'a ConversationTurn],
    pub listings: &'a [Listing],
    pub message: &'a str,
}

/// Render the prompt. At most `max_turns` history turns and `max_listings`
/// listings are included, the newest turns and the first listings.
pub fn build_prompt(ctx: &PromptContext<'_>, max_turns: usize, max_listings: usize) -> String {
    let skip = ctx.history.len().saturating_sub(max_turns);
    let history = ctx.history[skip..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.text))
        .collect::<Vec<_>>()
        .join("\n");

    let listings = ctx
        .listings
        .iter()
        .take(max_listings)
        .map(|l| {
            format!(
                "Property: {} - {} - {} - ₹{} - {}",
                l.title,
                l.location,
                l.property_type,
                format_inr(l.price),
                l.transaction_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are SettleSpace AI assistant for Indian real estate. Keep responses SHORT (2-3 sentences max).

CONVERSATION HISTORY:
{history}

CURRENT USER: {name} ({role})
CURRENT PAGE: {page}

AVAILABLE PROPERTIES:
{listings}

GUIDELINES:
- Keep responses concise and helpful
- When user wants to buy/rent, point them to Browse Properties
- For specific properties, mention exact details (price, location, type)
- If you don't know something, say so and offer to connect them with our admin
- Use Indian currency (₹) and local terms
- Be conversational and remember previous context

USER MESSAGE: \"{message}\"

Provide a helpful, SHORT response:",
        history = history,
        name = ctx.user.name,
        role = ctx.user.role,
        page = ctx.page,
        listings = listings,
        message = ctx.message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use settle_core::types::{ListingStatus, PropertyType, TransactionType, UserRole};

    fn user() -> User {
        User {
            id: "buyer-1".into(),
            name: "Demo Buyer".into(),
            email: "buyer@demo.com".into(),
            phone: None,
            role: UserRole::Buyer,
            verified: true,
            created_at: Utc::now(),
        }
    }

    fn listing(i: usize) -> Listing {
        Listing {
            id: format!("prop-{}", i),
            title: format!("Flat {}", i),
            description: String::new(),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionType::Sale,
            price: 12_345_678,
            area: 900,
            bedrooms: None,
            bathrooms: None,
            location: "Whitefield, Bangalore".into(),
            owner_id: "seller-1".into(),
            status: ListingStatus::Approved,
            featured: false,
            submitted_at: Utc::now(),
            approved_at: None,
        }
    }

    #[test]
    fn test_prompt_is_bounded() {
        let turns: Vec<ConversationTurn> = (0..10)
            .map(|i| ConversationTurn::user(format!("turn-{}", i)))
            .collect();
        let refs: Vec<&ConversationTurn> = turns.iter().collect();
        let listings: Vec<Listing> = (0..8).map(listing).collect();
        let user = user();

        let prompt = build_prompt(
            &PromptContext {
                user: &user,
                page: &PageContext::Listings,
                history: &refs,
                listings: &listings,
                message: "any flats?",
            },
            6,
            5,
        );

        assert_eq!(prompt.matches("user: turn-").count(), 6);
        assert!(!prompt.contains("turn-3"));
        assert!(prompt.contains("user: turn-4"));
        assert!(prompt.contains("user: turn-9"));
        assert_eq!(prompt.matches("Property: ").count(), 5);
        assert!(!prompt.contains("Flat 5"));
    }

    #[test]
    fn test_prompt_carries_context() {
        let user = user();
        let listings = vec![listing(1)];
        let prompt = build_prompt(
            &PromptContext {
                user: &user,
                page: &PageContext::Home,
                history: &[],
                listings: &listings,
                message: "hello",
            },
            6,
            5,
        );
        assert!(prompt.contains("CURRENT USER: Demo Buyer (buyer)"));
        assert!(prompt.contains("CURRENT PAGE: homepage"));
        assert!(prompt.contains(
            "Property: Flat 1 - Whitefield, Bangalore - apartment - ₹1,23,45,678 - sale"
        ));
        assert!(prompt.contains("USER MESSAGE: \"hello\""));
    }
}
