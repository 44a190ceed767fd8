use tracing::{debug, info};

use crate::domain::{Member, MemberUpdate};
use crate::error::LibraryError;
use crate::ids::{EntityKind, MemberId};
use crate::store::Registry;
use crate::validation;

#[derive(Debug, Default)]
pub struct MemberService {
    members: Registry<Member>,
}

impl MemberService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, member: Member) -> Result<&Member, LibraryError> {
        validation::validate_not_empty(member.member_id.as_str(), "Member ID")?;
        validate_contact(&member.name, &member.email, &member.phone_number)?;

        match self.members.insert(member) {
            Ok(stored) => {
                info!(
                    member_id = %stored.member_id,
                    membership = %stored.membership_type,
                    "member registered"
                );
                Ok(stored)
            }
            Err(rejected) => {
                debug!(member_id = %rejected.member_id, "duplicate member id rejected");
                Err(LibraryError::invalid(format!(
                    "Member already registered with ID: {}",
                    rejected.member_id
                )))
            }
        }
    }

    pub fn find(&self, member_id: &MemberId) -> Result<&Member, LibraryError> {
        self.members
            .get(member_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Member, member_id.as_str()))
    }

    pub fn contains(&self, member_id: &MemberId) -> bool {
        self.members.contains(member_id.as_str())
    }

    pub fn update(
        &mut self,
        member_id: &MemberId,
        update: MemberUpdate,
    ) -> Result<&Member, LibraryError> {
        validate_contact(&update.name, &update.email, &update.phone_number)?;

        let member = self
            .members
            .get_mut(member_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Member, member_id.as_str()))?;
        member.name = update.name;
        member.email = update.email;
        member.phone_number = update.phone_number;
        member.membership_type = update.membership_type;

        info!(%member_id, "member updated");
        Ok(member)
    }

    /// Soft delete: the record and its loan history stay.
    pub fn deactivate(&mut self, member_id: &MemberId) -> Result<&Member, LibraryError> {
        let member = self
            .members
            .get_mut(member_id.as_str())
            .ok_or_else(|| LibraryError::not_found(EntityKind::Member, member_id.as_str()))?;
        member.active = false;

        info!(%member_id, "member deactivated");
        Ok(member)
    }

    pub fn active(&self) -> Vec<&Member> {
        self.members.iter().filter(|member| member.active).collect()
    }

    pub fn all(&self) -> Vec<&Member> {
        self.members.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn validate_contact(name: &str, email: &str, phone_number: &str) -> Result<(), LibraryError> {
    validation::validate_not_empty(name, "Name")?;
    validation::validate_email(email)?;
    validation::validate_phone_number(phone_number)
}
