use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    /// Per-device push tokens. Appended on device opt-in; individual tokens
    /// are pruned when a push send reports them invalid or unregistered.
    #[serde(default)]
    pub fcm_tokens: Vec<String>,
    pub last_active_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Agent,
    #[default]
    Viewer,
}

/// Capability bits (u64 bitfield). Route guards check capabilities rather
/// than comparing role names.
pub mod capabilities {
    pub const MANAGE_USERS: u64 = 1 << 0;
    pub const MANAGE_INVENTORY: u64 = 1 << 1;
    pub const MANAGE_SUPPLIERS: u64 = 1 << 2;
    pub const MANAGE_OFFERS: u64 = 1 << 3;
    pub const PUBLISH_OFFERS: u64 = 1 << 4;
    pub const MANAGE_BOOKINGS: u64 = 1 << 5;
    pub const CONFIRM_BOOKINGS: u64 = 1 << 6;
    pub const VIEW_REPORTS: u64 = 1 << 7;

    pub const ALL: u64 = (1 << 8) - 1;

    pub fn has(mask: u64, cap: u64) -> bool {
        mask & cap == cap
    }
}

impl Role {
    pub fn capabilities(self) -> u64 {
        use capabilities::*;
        match self {
            Role::SuperAdmin | Role::Admin => ALL,
            Role::Manager => {
                MANAGE_INVENTORY
                    | MANAGE_SUPPLIERS
                    | MANAGE_OFFERS
                    | PUBLISH_OFFERS
                    | MANAGE_BOOKINGS
                    | CONFIRM_BOOKINGS
                    | VIEW_REPORTS
            }
            Role::Agent => MANAGE_BOOKINGS | CONFIRM_BOOKINGS | VIEW_REPORTS,
            Role::Viewer => VIEW_REPORTS,
        }
    }

    pub fn has_capability(self, cap: u64) -> bool {
        capabilities::has(self.capabilities(), cap)
    }
}

fn bool_true() -> bool {
    true
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
