//! The views every tenant starts with.
//!
//! `PRESETS` is data: adding a shipped view means adding an entry. Filters
//! and sorts are kept as wire JSON so they read exactly like what a client
//! would persist, and are validated against the registry when built.

use serde::Serialize;

use crate::catalog::{ColumnType as C, PropertyRegistry, TableId, TableViewType};
use crate::query::{decode_filter, SortSpec};
use crate::views::{
    validate_definition, ColumnView, SeedOutcome, TableViewDefinition, ViewDefinitionStore,
    ViewError,
};

/// Replaced by the requesting user's id in owner-scoped preset filters.
pub const USER_PLACEHOLDER: &str = "$USER_ID";

#[derive(Debug, Clone, Copy)]
pub struct PresetColumn {
    pub column_type: C,
    pub visible: bool,
}

const fn shown(column_type: C) -> PresetColumn {
    PresetColumn {
        column_type,
        visible: true,
    }
}

const fn hidden(column_type: C) -> PresetColumn {
    PresetColumn {
        column_type,
        visible: false,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PresetLayout {
    Grid(&'static [PresetColumn]),
    /// Named buckets over one column; each bucket holds a wire filter.
    Board {
        column_type: C,
        buckets: &'static [(&'static str, &'static str)],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub table_id: TableId,
    pub view_type: TableViewType,
    pub name: &'static str,
    pub icon: &'static str,
    pub order: i32,
    pub layout: PresetLayout,
    /// Wire filter; empty for none.
    pub filter: &'static str,
    /// Wire sort; empty for none.
    pub sort: &'static str,
}

const BY_LAST_TOUCHPOINT: &str = r#"{"id": "ORGANIZATIONS_LAST_TOUCHPOINT", "desc": true}"#;

const ACCOUNT_COLUMNS: &[PresetColumn] = &[
    shown(C::OrganizationsAvatar),
    shown(C::OrganizationsName),
    shown(C::OrganizationsWebsite),
    shown(C::OrganizationsRelationship),
    shown(C::OrganizationsRenewalLikelihood),
    shown(C::OrganizationsRenewalDate),
    shown(C::OrganizationsOnboardingStatus),
    shown(C::OrganizationsForecastArr),
    shown(C::OrganizationsOwner),
    shown(C::OrganizationsLastTouchpoint),
];

const ALL_ORGANIZATION_COLUMNS: &[PresetColumn] = &[
    shown(C::OrganizationsAvatar),
    shown(C::OrganizationsName),
    shown(C::OrganizationsWebsite),
    shown(C::OrganizationsRelationship),
    shown(C::OrganizationsRenewalLikelihood),
    shown(C::OrganizationsRenewalDate),
    shown(C::OrganizationsOnboardingStatus),
    shown(C::OrganizationsForecastArr),
    shown(C::OrganizationsOwner),
    shown(C::OrganizationsContactCount),
    shown(C::OrganizationsStage),
    shown(C::OrganizationsLastTouchpoint),
];

const LEAD_COLUMNS: &[PresetColumn] = &[
    shown(C::OrganizationsAvatar),
    shown(C::OrganizationsName),
    shown(C::OrganizationsWebsite),
    shown(C::OrganizationsSocials),
    shown(C::OrganizationsCreatedDate),
    shown(C::OrganizationsLastTouchpointDate),
    shown(C::OrganizationsLeadSource),
    shown(C::OrganizationsEmployeeCount),
    shown(C::OrganizationsYearFounded),
    shown(C::OrganizationsIndustry),
    shown(C::OrganizationsCity),
    shown(C::OrganizationsIsPublic),
    shown(C::OrganizationsStage),
    shown(C::OrganizationsLinkedinFollowerCount),
    shown(C::OrganizationsTags),
];

const TARGET_COLUMNS: &[PresetColumn] = &[
    shown(C::OrganizationsAvatar),
    shown(C::OrganizationsName),
    shown(C::OrganizationsWebsite),
    shown(C::OrganizationsSocials),
    shown(C::OrganizationsCreatedDate),
    shown(C::OrganizationsLastTouchpoint),
    shown(C::OrganizationsLeadSource),
    shown(C::OrganizationsEmployeeCount),
    shown(C::OrganizationsYearFounded),
    shown(C::OrganizationsIndustry),
    shown(C::OrganizationsCity),
    shown(C::OrganizationsIsPublic),
    shown(C::OrganizationsStage),
    shown(C::OrganizationsLinkedinFollowerCount),
    shown(C::OrganizationsTags),
    shown(C::OrganizationsContactCount),
];

const CHURN_COLUMNS: &[PresetColumn] = &[
    shown(C::OrganizationsAvatar),
    shown(C::OrganizationsName),
    shown(C::OrganizationsChurnDate),
    shown(C::OrganizationsLtv),
];

const RENEWAL_COLUMNS: &[PresetColumn] = &[
    shown(C::RenewalsAvatar),
    shown(C::RenewalsName),
    shown(C::RenewalsRenewalDate),
    shown(C::RenewalsForecastArr),
    shown(C::RenewalsRenewalLikelihood),
    shown(C::RenewalsOwner),
    shown(C::RenewalsLastTouchpoint),
];

const UPCOMING_INVOICE_COLUMNS: &[PresetColumn] = &[
    shown(C::InvoicesInvoicePreview),
    shown(C::InvoicesContract),
    shown(C::InvoicesBillingCycle),
    shown(C::InvoicesIssueDate),
    shown(C::InvoicesDueDate),
    shown(C::InvoicesAmount),
    shown(C::InvoicesInvoiceStatus),
    hidden(C::InvoicesIssueDatePast),
    hidden(C::InvoicesPaymentStatus),
];

const PAST_INVOICE_COLUMNS: &[PresetColumn] = &[
    shown(C::InvoicesInvoiceNumber),
    shown(C::InvoicesContract),
    shown(C::InvoicesBillingCycle),
    shown(C::InvoicesIssueDatePast),
    shown(C::InvoicesDueDate),
    shown(C::InvoicesAmount),
    shown(C::InvoicesPaymentStatus),
    hidden(C::InvoicesIssueDate),
    hidden(C::InvoicesInvoiceStatus),
];

const CONTACT_COLUMNS: &[PresetColumn] = &[
    shown(C::ContactsAvatar),
    shown(C::ContactsName),
    shown(C::ContactsOrganization),
    shown(C::ContactsEmails),
    shown(C::ContactsPhoneNumbers),
    shown(C::ContactsLinkedin),
    shown(C::ContactsCountry),
    shown(C::ContactsCity),
    shown(C::ContactsPersona),
    shown(C::ContactsLastInteraction),
    hidden(C::ContactsSkills),
    hidden(C::ContactsSchools),
    hidden(C::ContactsLanguages),
    shown(C::ContactsTimeInCurrentRole),
    hidden(C::ContactsExperience),
    shown(C::ContactsLinkedinFollowerCount),
    shown(C::ContactsJobTitle),
];

const OPPORTUNITY_BUCKETS: &[(&str, &str)] = &[
    (
        "Identified",
        r#"{"AND":[{"filter":{"property":"OPPORTUNITIES_STAGE","value":"IDENTIFIED","operation":"EQ"}}]}"#,
    ),
    (
        "Qualified",
        r#"{"AND":[{"filter":{"property":"OPPORTUNITIES_STAGE","value":"QUALIFIED","operation":"EQ"}}]}"#,
    ),
    (
        "Committed",
        r#"{"AND":[{"filter":{"property":"OPPORTUNITIES_STAGE","value":"COMMITTED","operation":"EQ"}}]}"#,
    ),
    (
        "Won",
        r#"{"AND":[{"filter":{"property":"OPPORTUNITIES_STAGE","value":"CLOSED_WON","operation":"EQ"}}]}"#,
    ),
    (
        "Lost",
        r#"{"AND":[{"filter":{"property":"OPPORTUNITIES_STAGE","value":"CLOSED_LOST","operation":"EQ"}}]}"#,
    ),
];

pub static PRESETS: &[Preset] = &[
    Preset {
        table_id: TableId::Contacts,
        view_type: TableViewType::Contacts,
        name: "Contacts",
        icon: "HeartHand",
        order: 0,
        layout: PresetLayout::Grid(CONTACT_COLUMNS),
        filter: "",
        sort: "",
    },
    Preset {
        table_id: TableId::MonthlyRenewals,
        view_type: TableViewType::Renewals,
        name: "Monthly renewals",
        icon: "ClockFastForward",
        order: 1,
        layout: PresetLayout::Grid(RENEWAL_COLUMNS),
        filter: r#"{"AND":[{"filter":{"property":"RENEWAL_CYCLE","value":"MONTHLY","operation":"EQ","includeEmpty":false}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::Customers,
        view_type: TableViewType::Organizations,
        name: "Customers",
        icon: "CheckHeart",
        order: 1,
        layout: PresetLayout::Grid(ACCOUNT_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"RELATIONSHIP","value":["CUSTOMER"]}}]}"#,
        sort: BY_LAST_TOUCHPOINT,
    },
    Preset {
        table_id: TableId::ContactsForTargetOrganizations,
        view_type: TableViewType::Contacts,
        name: "Target contacts",
        icon: "Target04",
        order: 2,
        layout: PresetLayout::Grid(CONTACT_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"CONTACTS_ORGANIZATION_STAGE","value":"TARGET"}},{"filter":{"includeEmpty":false,"operation":"EQ","property":"CONTACTS_ORGANIZATION_RELATIONSHIP","value":"PROSPECT"}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::QuarterlyRenewals,
        view_type: TableViewType::Renewals,
        name: "Quarterly renewals",
        icon: "ClockFastForward",
        order: 2,
        layout: PresetLayout::Grid(RENEWAL_COLUMNS),
        filter: r#"{"AND":[{"filter":{"property":"RENEWAL_CYCLE","value":"QUARTERLY","operation":"EQ","includeEmpty":false}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::AnnualRenewals,
        view_type: TableViewType::Renewals,
        name: "Annual renewals",
        icon: "ClockFastForward",
        order: 3,
        layout: PresetLayout::Grid(RENEWAL_COLUMNS),
        filter: r#"{"AND":[{"filter":{"property":"RENEWAL_CYCLE","value":"ANNUALLY","operation":"EQ","includeEmpty":false}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::Leads,
        view_type: TableViewType::Organizations,
        name: "Leads",
        icon: "SwitchHorizontal01",
        order: 3,
        layout: PresetLayout::Grid(LEAD_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"STAGE","value":["LEAD"]}}]}"#,
        sort: BY_LAST_TOUCHPOINT,
    },
    Preset {
        table_id: TableId::UpcomingInvoices,
        view_type: TableViewType::Invoices,
        name: "Upcoming",
        icon: "InvoiceUpcoming",
        order: 4,
        layout: PresetLayout::Grid(UPCOMING_INVOICE_COLUMNS),
        filter: r#"{"AND":[{"filter":{"property":"INVOICE_PREVIEW","value":true}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::Nurture,
        view_type: TableViewType::Organizations,
        name: "Targets",
        icon: "HeartHand",
        order: 4,
        layout: PresetLayout::Grid(TARGET_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"STAGE","value":["TARGET"]}},{"filter":{"includeEmpty":false,"operation":"EQ","property":"RELATIONSHIP","value":["PROSPECT"]}}]}"#,
        sort: BY_LAST_TOUCHPOINT,
    },
    Preset {
        table_id: TableId::PastInvoices,
        view_type: TableViewType::Invoices,
        name: "Past",
        icon: "InvoiceCheck",
        order: 5,
        layout: PresetLayout::Grid(PAST_INVOICE_COLUMNS),
        filter: r#"{"AND":[{"filter":{"property":"INVOICE_DRY_RUN","value":false}}]}"#,
        sort: "",
    },
    Preset {
        table_id: TableId::Organizations,
        view_type: TableViewType::Organizations,
        name: "All orgs",
        icon: "Building07",
        order: 5,
        layout: PresetLayout::Grid(ALL_ORGANIZATION_COLUMNS),
        filter: "",
        sort: BY_LAST_TOUCHPOINT,
    },
    Preset {
        table_id: TableId::Churn,
        view_type: TableViewType::Organizations,
        name: "Churn",
        icon: "BrokenHeart",
        order: 5,
        layout: PresetLayout::Grid(CHURN_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"RELATIONSHIP","value":["FORMER_CUSTOMER"]}}]}"#,
        sort: r#"{"id": "ORGANIZATIONS_CHURN_DATE", "desc": true}"#,
    },
    Preset {
        table_id: TableId::MyPortfolio,
        view_type: TableViewType::Organizations,
        name: "My portfolio",
        icon: "Briefcase01",
        order: 6,
        layout: PresetLayout::Grid(ACCOUNT_COLUMNS),
        filter: r#"{"AND":[{"filter":{"includeEmpty":false,"operation":"EQ","property":"OWNER_ID","value":["$USER_ID"]}}]}"#,
        sort: BY_LAST_TOUCHPOINT,
    },
    Preset {
        table_id: TableId::Opportunities,
        view_type: TableViewType::Opportunities,
        name: "Opportunities",
        icon: "CoinsStacked01",
        order: 7,
        layout: PresetLayout::Board {
            column_type: C::OpportunitiesStage,
            buckets: OPPORTUNITY_BUCKETS,
        },
        filter: "",
        sort: "",
    },
];

impl Preset {
    /// Materialises the preset for one tenant (and user, for owner-scoped
    /// tables) and validates the result.
    pub fn build(
        &self,
        registry: &PropertyRegistry,
        tenant: &str,
        user_id: Option<&str>,
    ) -> Result<TableViewDefinition, ViewError> {
        let table = registry
            .table(self.table_id)
            .map_err(|e| ViewError::Invalid(e.into()))?;
        let owner = if table.is_owner_scoped() {
            Some(user_id.ok_or(ViewError::OwnerRequired(self.table_id))?.to_string())
        } else {
            None
        };

        let mut def = TableViewDefinition::new(tenant, owner.clone(), self.view_type, self.table_id, self.name);
        def.icon = self.icon.to_string();
        def.order = self.order;
        def.is_preset = true;
        def.columns = self.columns(registry)?;

        if !self.filter.is_empty() {
            let mut filter = decode_filter(self.table_id, self.filter)?;
            if let Some(owner) = owner.as_deref() {
                filter.substitute(USER_PLACEHOLDER, owner);
            }
            def.default_filter = Some(filter);
        }
        if !self.sort.is_empty() {
            let spec = SortSpec::from_wire_str(self.table_id, self.sort)?;
            def.default_sort = spec.fields().first().copied();
        }

        validate_definition(&def, registry)?;
        Ok(def)
    }

    fn columns(&self, registry: &PropertyRegistry) -> Result<Vec<ColumnView>, ViewError> {
        match self.layout {
            PresetLayout::Grid(columns) => columns
                .iter()
                .map(|c| {
                    let column = registry
                        .resolve(self.table_id, c.column_type)
                        .map_err(|e| ViewError::Invalid(e.into()))?;
                    Ok(ColumnView::new(c.column_type, column.default_width, c.visible))
                })
                .collect(),
            PresetLayout::Board {
                column_type,
                buckets,
            } => {
                let width = registry
                    .resolve(self.table_id, column_type)
                    .map_err(|e| ViewError::Invalid(e.into()))?
                    .default_width;
                buckets
                    .iter()
                    .map(|(name, filter)| {
                        let filter = decode_filter(self.table_id, filter)?;
                        Ok(ColumnView::bucket(column_type, width, *name, filter))
                    })
                    .collect()
            }
        }
    }
}

/// Presets that apply to a requester: owner-scoped ones need a user.
pub fn applicable<'a>(
    registry: &'a PropertyRegistry,
    user_id: Option<&'a str>,
) -> impl Iterator<Item = &'static Preset> + 'a {
    PRESETS.iter().filter(move |p| {
        user_id.is_some()
            || registry
                .table(p.table_id)
                .map(|t| !t.is_owner_scoped())
                .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedReport {
    pub created: Vec<TableId>,
    pub refreshed: Vec<TableId>,
    pub unchanged: Vec<TableId>,
    pub failed: Vec<(TableId, String)>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Creates or refreshes every applicable preset. A preset that fails is
/// logged and reported; the rest are still seeded.
pub async fn seed<S: ViewDefinitionStore + ?Sized>(
    store: &S,
    registry: &PropertyRegistry,
    tenant: &str,
    user_id: Option<&str>,
) -> SeedReport {
    let mut report = SeedReport::default();
    for preset in applicable(registry, user_id) {
        let outcome = match preset.build(registry, tenant, user_id) {
            Ok(def) => store.seed(def).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(SeedOutcome::Created) => report.created.push(preset.table_id),
            Ok(SeedOutcome::Refreshed) => report.refreshed.push(preset.table_id),
            Ok(SeedOutcome::Unchanged) => report.unchanged.push(preset.table_id),
            Err(e) => {
                log::warn!("Failed to seed {} for tenant {}: {}", preset.table_id, tenant, e);
                report.failed.push((preset.table_id, e.to_string()));
            }
        }
    }
    log::info!(
        "Seeded presets for tenant {}: {} created, {} refreshed, {} unchanged, {} failed",
        tenant,
        report.created.len(),
        report.refreshed.len(),
        report.unchanged.len(),
        report.failed.len()
    );
    report
}
