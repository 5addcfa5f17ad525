//! Who may do what to a listing.
//!
//! Every ownership and role rule for listings lives here, so handlers ask
//! one question instead of comparing ids and roles inline.

use uuid::Uuid;

use crate::backend::auth::users::Role;
use crate::backend::middleware::AuthenticatedUser;
use crate::shared::Listing;

/// A user's standing towards one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// May view only
    ReadOnly,
    /// Created the listing
    Owner,
    /// Admin acting on someone else's listing
    Moderator,
}

impl Access {
    pub fn can_edit(self) -> bool {
        matches!(self, Access::Owner)
    }

    pub fn can_delete(self) -> bool {
        matches!(self, Access::Owner | Access::Moderator)
    }
}

pub fn listing_access(user: &AuthenticatedUser, listing: &Listing) -> Access {
    if listing.owner_id == user.user_id {
        Access::Owner
    } else if user.is_admin() {
        Access::Moderator
    } else {
        Access::ReadOnly
    }
}

/// Which listings a user's "my listings" view covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    All,
    Seller(Uuid),
    Nothing,
}

pub fn listing_scope(user: &AuthenticatedUser) -> ListingScope {
    match user.role {
        Role::Admin => ListingScope::All,
        Role::Vendor => ListingScope::Seller(user.user_id),
        Role::Customer => ListingScope::Nothing,
    }
}
