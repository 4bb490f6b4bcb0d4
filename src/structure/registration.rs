use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recyclable material a participant builds their pot from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    PlasticBottles,
    Thread,
    Shoes,
    MetalCans,
    Cardboard,
    Other,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::PlasticBottles,
        Material::Thread,
        Material::Shoes,
        Material::MetalCans,
        Material::Cardboard,
        Material::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Material::PlasticBottles => "plastic_bottles",
            Material::Thread => "thread",
            Material::Shoes => "shoes",
            Material::MetalCans => "metal_cans",
            Material::Cardboard => "cardboard",
            Material::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Material::PlasticBottles => "Plastic Bottles",
            Material::Thread => "Thread/Yarn",
            Material::Shoes => "Old Shoes",
            Material::MetalCans => "Metal Cans",
            Material::Cardboard => "Cardboard",
            Material::Other => "Other Materials",
        }
    }

    /// Exact match on the wire id, no trimming or case folding
    pub fn from_id(id: &str) -> Option<Material> {
        Material::ALL.into_iter().find(|material| material.id() == id)
    }
}

/// Raw submission as received; nothing here is trusted until validated
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub year_of_study: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub selected_material: Option<String>,
    pub idea_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub year_of_study: String,
    pub email: String,
    pub phone: String,
    pub selected_material: Material,
    pub idea_description: String,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub client_identifier: String,
}

/// Payload of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: &'static str,
    pub name: &'static str,
}

impl From<Material> for MaterialResponse {
    fn from(material: Material) -> Self {
        MaterialResponse {
            id: material.id(),
            name: material.display_name(),
        }
    }
}
