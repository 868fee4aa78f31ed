//! Route definitions for the listing API.
//!
//! Item routes take the listing id and return an owned path; collection
//! routes are plain constants.

use popstore_model::ListingId;

pub mod listing {
    use super::ListingId;

    pub const LIST: &str = "/post/list";
    pub const POPULAR: &str = "/post/good/list";

    pub fn detail(id: ListingId) -> String {
        format!("/post/detail/{id}")
    }

    /// Detail fetch that also bumps the view counter server-side.
    pub fn views(id: ListingId) -> String {
        format!("/post/detail/views/{id}")
    }
}

pub mod like {
    use super::ListingId;

    pub fn count(id: ListingId) -> String {
        format!("/post/likes/{id}")
    }

    /// POST adds the viewer's like, DELETE removes it.
    pub fn toggle(id: ListingId) -> String {
        format!("/post/like/{id}")
    }
}

pub mod favorite {
    use super::ListingId;

    pub fn check(id: ListingId) -> String {
        format!("/favorite/check/{id}")
    }

    pub fn add(id: ListingId) -> String {
        format!("/favorite/add/{id}")
    }

    pub fn remove(id: ListingId) -> String {
        format!("/favorite/remove/{id}")
    }
}

pub mod member {
    pub const LOGIN: &str = "/member/login";
}

/// Public web page for a listing, used as the share link.
pub fn listing_page(web_base_url: &str, id: ListingId) -> String {
    format!("{}/popup/{id}", web_base_url.trim_end_matches('/'))
}
