//! Owner and group name resolution
//!
//! Lookups never fail: an id with no entry in the user or group database
//! is displayed as its decimal value.

use std::cell::RefCell;
use std::collections::HashMap;

use uzers::{get_group_by_gid, get_user_by_uid};

thread_local! {
    static OWNER_CACHE: RefCell<HashMap<u32, String>> = RefCell::new(HashMap::new());
    static GROUP_CACHE: RefCell<HashMap<u32, String>> = RefCell::new(HashMap::new());
}

/// Resolves a uid to a user name, falling back to the numeric id.
pub fn user_name(uid: u32) -> String {
    OWNER_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .entry(uid)
            .or_insert_with(|| {
                get_user_by_uid(uid)
                    .map(|u| u.name().to_string_lossy().into_owned())
                    .unwrap_or_else(|| uid.to_string())
            })
            .clone()
    })
}

/// Resolves a gid to a group name, falling back to the numeric id.
pub fn group_name(gid: u32) -> String {
    GROUP_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .entry(gid)
            .or_insert_with(|| {
                get_group_by_gid(gid)
                    .map(|g| g.name().to_string_lossy().into_owned())
                    .unwrap_or_else(|| gid.to_string())
            })
            .clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Far outside any allocated range in CI images and containers.
    const UNMAPPED_ID: u32 = 3_999_999_999;

    #[test]
    fn test_unmapped_uid_falls_back_to_number() {
        assert_eq!(user_name(UNMAPPED_ID), "3999999999");
    }

    #[test]
    fn test_unmapped_gid_falls_back_to_number() {
        assert_eq!(group_name(UNMAPPED_ID), "3999999999");
    }

    #[test]
    fn test_lookup_is_stable_across_calls() {
        let uid = uzers::get_current_uid();
        assert_eq!(user_name(uid), user_name(uid));
        assert!(!user_name(uid).is_empty());
    }
}
