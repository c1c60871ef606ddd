//! Pure merge helpers for locally cached admin listings
//!
//! Screens keep the last fetched list and fold each mutation's server
//! response back into it instead of re-fetching. These are plain
//! old-list-plus-result-to-new-list functions so the merge rules can be
//! tested without a network.

use crate::types::{GroupDetail, GroupRef, Permission, UserDetail, UserProfile};

/// Anything addressable by the server-issued integer id
pub trait HasId {
    fn id(&self) -> i64;
}

impl HasId for UserProfile {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for UserDetail {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for GroupRef {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for GroupDetail {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Permission {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Fold a created or updated record into the list: replaces the entry with
/// the same id in place, appends when the id is new.
pub fn upserted<T: HasId>(list: Vec<T>, item: T) -> Vec<T> {
    let mut list = list;
    match list.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => list[index] = item,
        None => list.push(item),
    }
    list
}

/// Drop a deleted record from the list; unknown ids leave it untouched.
pub fn without<T: HasId>(list: Vec<T>, id: i64) -> Vec<T> {
    list.into_iter().filter(|item| item.id() != id).collect()
}
