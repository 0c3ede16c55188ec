use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub code: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    pub created_by: ObjectId,
    pub updated_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Supplier {
    pub const COLLECTION: &'static str = "suppliers";
}
