use super::{Report, ReportSection, ReportTable};
use crate::collection::PostGroups;
use crate::types::{Organization, PostKind};

/// Offers or inquiries of an organization, one section per category
pub struct PostReport<'a> {
    organization: &'a Organization,
    groups: &'a PostGroups,
    kind: Option<PostKind>,
}

impl<'a> PostReport<'a> {
    /// Create a report over already grouped posts of `kind`
    pub fn new(organization: &'a Organization, groups: &'a PostGroups, kind: PostKind) -> Self {
        Self {
            organization,
            groups,
            kind: Some(kind),
        }
    }

    /// Report for a post type that is not recognised
    ///
    /// Keeps the post columns but is titled and named generically.
    pub fn unknown_kind(organization: &'a Organization, groups: &'a PostGroups) -> Self {
        Self {
            organization,
            groups,
            kind: None,
        }
    }
}

impl Report for PostReport<'_> {
    fn slug(&self) -> &'static str {
        match self.kind {
            Some(PostKind::Offer) => "offers",
            Some(PostKind::Inquiry) => "inquiries",
            None => "posts",
        }
    }

    fn organization(&self) -> &Organization {
        self.organization
    }

    fn table(&self) -> ReportTable {
        let sections = self
            .groups
            .groups()
            .iter()
            .map(|(category, posts)| ReportSection {
                heading: Some(category.name.to_uppercase()),
                rows: posts
                    .iter()
                    .map(|post| {
                        vec![
                            post.title.clone(),
                            format!("{} ({})", post.author.username, post.author.member_uid),
                            post.tags.join(", "),
                            post.description.clone().unwrap_or_default(),
                        ]
                    })
                    .collect(),
            })
            .collect();

        ReportTable {
            title: format!(
                "{} - {}",
                self.organization.name,
                self.kind.map_or("Posts", |kind| kind.plural_label())
            ),
            headers: ["Title", "Member", "Tags", "Description"]
                .map(String::from)
                .to_vec(),
            sections,
        }
    }
}
