use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// A dispute raised against an order. Unread issues block escrow release.
    Issue,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub order_id: String,
    pub user_id: String,
    pub r#type: NotificationType,
    /// Required: a record without it can never match a `read = false` lookup.
    pub read: bool,
}

impl Notification {
    pub fn issue(order_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            user_id: user_id.into(),
            r#type: NotificationType::Issue,
            read: false,
        }
    }
}
