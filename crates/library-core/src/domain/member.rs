use crate::ids::MemberId;
use crate::store::Keyed;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership tiers and the lending terms attached to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    Basic,
    Premium,
    Student,
    Faculty,
}

impl MembershipType {
    /// Concurrent active loans allowed.
    pub const fn max_books(self) -> u32 {
        match self {
            Self::Basic => 3,
            Self::Premium => 5,
            Self::Student => 4,
            Self::Faculty => 10,
        }
    }

    pub const fn loan_duration_days(self) -> i64 {
        match self {
            Self::Basic | Self::Student => 14,
            Self::Premium => 21,
            Self::Faculty => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Premium => "Premium",
            Self::Student => "Student",
            Self::Faculty => "Faculty",
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub membership_date: NaiveDate,
    pub membership_type: MembershipType,
    pub active: bool,
}

impl Member {
    /// New members start active.
    pub fn new(
        member_id: impl Into<MemberId>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        membership_date: NaiveDate,
        membership_type: MembershipType,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            membership_date,
            membership_type,
            active: true,
        }
    }

    pub fn can_borrow_more(&self, active_loans: usize) -> bool {
        active_loans < self.membership_type.max_books() as usize
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.member_id == other.member_id
    }
}

impl Eq for Member {}

impl Keyed for Member {
    fn key(&self) -> &str {
        self.member_id.as_str()
    }
}

/// Registration payload. `membership_date` falls back to the library's today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub membership_type: MembershipType,
    #[serde(default)]
    pub membership_date: Option<NaiveDate>,
}

impl NewMember {
    pub fn into_member(self, today: NaiveDate) -> Member {
        Member::new(
            self.member_id,
            self.name,
            self.email,
            self.phone_number,
            self.membership_date.unwrap_or(today),
            self.membership_type,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub membership_type: MembershipType,
}
