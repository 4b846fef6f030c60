use super::{Report, ReportSection, ReportTable};
use crate::types::{Organization, Transfer};
use crate::utils::format_hours;

/// Every transfer of an organization
pub struct TransferReport<'a> {
    organization: &'a Organization,
    transfers: &'a [Transfer],
}

impl<'a> TransferReport<'a> {
    /// Create a report over `transfers`, in the order given
    pub fn new(organization: &'a Organization, transfers: &'a [Transfer]) -> Self {
        Self {
            organization,
            transfers,
        }
    }
}

impl Report for TransferReport<'_> {
    fn slug(&self) -> &'static str {
        "transfers"
    }

    fn organization(&self) -> &Organization {
        self.organization
    }

    fn table(&self) -> ReportTable {
        let rows = self
            .transfers
            .iter()
            .map(|transfer| {
                vec![
                    transfer.created_at.format("%Y-%m-%d").to_string(),
                    transfer.source.to_string(),
                    transfer.destination.to_string(),
                    transfer.reason.clone().unwrap_or_default(),
                    format_hours(transfer.amount_secs),
                ]
            })
            .collect();

        ReportTable {
            title: format!("{} - Transfers", self.organization.name),
            headers: ["Date", "From", "To", "Reason", "Amount"]
                .map(String::from)
                .to_vec(),
            sections: vec![ReportSection {
                heading: None,
                rows,
            }],
        }
    }
}
