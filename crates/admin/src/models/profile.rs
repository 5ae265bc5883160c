//! Administrator profile and dashboard figures.

use serde::{Deserialize, Serialize};

use bookshelf_core::Price;

/// The logged-in administrator.
///
/// Cached in the session under `adminProfile`, so unlike the other UI
/// records it round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

impl AdminProfile {
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: u64,
    pub total_authors: u64,
    pub total_packs: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub low_stock_books: u64,
    pub total_revenue: Price,
}

/// One bucket of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    pub label: String,
    pub orders: u64,
    pub revenue: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_profile_json_shape() {
        let profile = AdminProfile {
            username: "admin".to_string(),
            first_name: "Nour".to_string(),
            last_name: "Kaci".to_string(),
            email: "nour@bookshelf.dz".to_string(),
            phone: None,
            picture_url: None,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Nour");

        let back: AdminProfile = serde_json::from_value(serde_json::json!({
            "username": "admin",
            "firstName": "Nour",
            "lastName": "Kaci",
            "email": "nour@bookshelf.dz"
        }))
        .unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let profile = AdminProfile {
            username: "admin".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "a@b.dz".to_string(),
            phone: None,
            picture_url: None,
        };
        assert_eq!(profile.display_name(), "admin");
    }
}
