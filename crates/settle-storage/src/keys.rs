//! Well-known keys of the logical collections.

/// Registered users (`Vec<User>`).
pub const USERS: &str = "settlespace_users";

/// All listings, any approval status (`Vec<Listing>`).
pub const LISTINGS: &str = "settlespace_properties";

/// The shared operator mailbox of escalation requests.
pub const MAILBOX: &str = "admin_notifications";

/// Rolling conversation history of one user.
pub fn chat_history(user_id: &str) -> String {
    format!("settlespace_chat_{}", user_id)
}

/// Set by the assistant once the user has filed an escalation.
pub fn escalation_filed(user_id: &str) -> String {
    format!("admin_chat_{}", user_id)
}

/// Set by the operator when they accept a user's escalation.
pub fn operator_engaged(user_id: &str) -> String {
    format!("admin_chat_active_{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_user_keys() {
        assert_eq!(chat_history("buyer-1"), "settlespace_chat_buyer-1");
        assert_eq!(escalation_filed("buyer-1"), "admin_chat_buyer-1");
        assert_eq!(operator_engaged("buyer-1"), "admin_chat_active_buyer-1");
    }
}
