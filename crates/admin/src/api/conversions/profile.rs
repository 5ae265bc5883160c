use bookshelf_core::forms::{ImageSelection, PasswordForm, ProfileForm};

use super::{AssetUrls, non_blank};
use crate::api::wire::{
    AdminProfileDto, DashboardStatsDto, PasswordPayload, ProfilePayload, SalesPointDto,
};
use crate::models::{AdminProfile, DashboardStats, SalesPoint};

/// Backend profile -> UI profile. A stored picture is served from the
/// profile picture endpoint, cache-busted.
#[must_use]
pub fn profile_from_wire(dto: AdminProfileDto, urls: &AssetUrls<'_>) -> AdminProfile {
    AdminProfile {
        username: dto.username,
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        phone: dto.phone.as_deref().and_then(non_blank),
        picture_url: dto.picture_url.map(|_| urls.profile_picture()),
    }
}

impl From<&ProfileForm> for ProfilePayload {
    fn from(form: &ProfileForm) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: non_blank(&form.phone),
        }
    }
}

impl From<&AdminProfile> for ProfileForm {
    fn from(profile: &AdminProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            picture: profile
                .picture_url
                .clone()
                .map_or(ImageSelection::Empty, ImageSelection::Existing),
        }
    }
}

impl From<&PasswordForm> for PasswordPayload {
    fn from(form: &PasswordForm) -> Self {
        Self {
            current_password: form.current_password.clone(),
            new_password: form.new_password.clone(),
            confirm_password: form.confirm_password.clone(),
        }
    }
}

impl From<DashboardStatsDto> for DashboardStats {
    fn from(dto: DashboardStatsDto) -> Self {
        Self {
            total_books: dto.total_books,
            total_authors: dto.total_authors,
            total_packs: dto.total_packs,
            total_orders: dto.total_orders,
            pending_orders: dto.pending_orders,
            low_stock_books: dto.low_stock_books,
            total_revenue: dto.total_revenue,
        }
    }
}

impl From<SalesPointDto> for SalesPoint {
    fn from(dto: SalesPointDto) -> Self {
        Self {
            label: dto.label,
            orders: dto.orders,
            revenue: dto.revenue,
        }
    }
}
