pub mod badge;
pub mod collection;
pub mod follow;
pub mod journal;
pub mod read;
pub mod recommendation;
pub mod user;
pub mod user_read;

pub use badge::{Badge, EarnedBadge};
pub use collection::{Collection, CollectionPatch, NewCollection};
pub use follow::Follow;
pub use journal::{Journal, JournalPatch, NewJournal};
pub use read::{NewRead, Read, Review};
pub use recommendation::{NewRecommendation, Recommendation, RecommendationPatch};
pub use user::{NewUser, User, UserPatch};
pub use user_read::{NewUserRead, UserRead, UserReadPatch};

use chrono::NaiveDate;

/// Partial-update semantics for PATCH bodies: a field is applied only when it
/// was supplied, and strings only when non-empty.
pub trait Merge<T> {
    fn merge_into(self, target: &mut T);
}

impl Merge<String> for Option<String> {
    fn merge_into(self, target: &mut String) {
        if let Some(value) = self.filter(|v| !v.is_empty()) {
            *target = value;
        }
    }
}

impl Merge<Option<String>> for Option<String> {
    fn merge_into(self, target: &mut Option<String>) {
        if let Some(value) = self.filter(|v| !v.is_empty()) {
            *target = Some(value);
        }
    }
}

impl Merge<Option<i32>> for Option<i32> {
    fn merge_into(self, target: &mut Option<i32>) {
        if self.is_some() {
            *target = self;
        }
    }
}

impl Merge<Option<NaiveDate>> for Option<NaiveDate> {
    fn merge_into(self, target: &mut Option<NaiveDate>) {
        if self.is_some() {
            *target = self;
        }
    }
}
