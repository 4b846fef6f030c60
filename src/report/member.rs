use super::{Report, ReportSection, ReportTable};
use crate::types::{Member, Organization};
use crate::utils::format_hours;

/// Active members of an organization with their contact details and balance
pub struct MemberReport<'a> {
    organization: &'a Organization,
    members: &'a [Member],
}

impl<'a> MemberReport<'a> {
    /// Create a report over `members`, in the order given
    pub fn new(organization: &'a Organization, members: &'a [Member]) -> Self {
        Self {
            organization,
            members,
        }
    }
}

impl Report for MemberReport<'_> {
    fn slug(&self) -> &'static str {
        "members"
    }

    fn organization(&self) -> &Organization {
        self.organization
    }

    fn table(&self) -> ReportTable {
        let rows = self
            .members
            .iter()
            .map(|member| {
                vec![
                    member.member_uid.to_string(),
                    member.username.clone(),
                    member.email.clone(),
                    member.phone.clone().unwrap_or_default(),
                    member.alt_phone.clone().unwrap_or_default(),
                    format_hours(member.balance_secs),
                ]
            })
            .collect();

        ReportTable {
            title: format!("{} - Members", self.organization.name),
            headers: ["ID", "Name", "Email", "Phone", "Alt. phone", "Balance"]
                .map(String::from)
                .to_vec(),
            sections: vec![ReportSection {
                heading: None,
                rows,
            }],
        }
    }
}
