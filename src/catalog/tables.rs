//! The versioned registry table: one `TableDefinition` per `TableId`.
//!
//! Adding a queryable entity type means adding one entry to `TABLES`.

use super::column::{BaseCondition, BaseValue, ColumnDefinition, TableDefinition, ValueType};
use super::graph_path::{GraphPath, Hop};
use super::identifiers::{ColumnType as C, TableId, TableViewType};
use crate::predicate::FilterOperation;

use ValueType::*;

const fn own(column: C, property: &'static str, value_type: ValueType) -> ColumnDefinition {
    ColumnDefinition::new(column, GraphPath::own(property), value_type)
}

const fn via(
    column: C,
    hops: &'static [Hop],
    property: &'static str,
    value_type: ValueType,
) -> ColumnDefinition {
    ColumnDefinition::new(column, GraphPath::via(hops, property), value_type)
}

// ---- hops -------------------------------------------------------------------

const ORG_TENANT: &[Hop] = &[Hop::outgoing("ORGANIZATION_BELONGS_TO_TENANT", "Tenant")];
const CONTACT_TENANT: &[Hop] = &[Hop::outgoing("CONTACT_BELONGS_TO_TENANT", "Tenant")];
const INVOICE_TENANT: &[Hop] = &[Hop::outgoing("INVOICE_BELONGS_TO_TENANT", "Tenant")];
const USER_TENANT: &[Hop] = &[Hop::outgoing("USER_BELONGS_TO_TENANT", "Tenant")];
const OPPORTUNITY_TENANT: &[Hop] = &[
    Hop::incoming("HAS_OPPORTUNITY", "Organization"),
    Hop::outgoing("ORGANIZATION_BELONGS_TO_TENANT", "Tenant"),
];

const OWNER: &[Hop] = &[Hop::incoming("OWNS", "User")];
const TAGGED: &[Hop] = &[Hop::outgoing("TAGGED", "Tag")];
const LOCATED: &[Hop] = &[Hop::outgoing("ASSOCIATED_WITH", "Location")];
const SOCIAL: &[Hop] = &[Hop::outgoing("HAS", "Social")];
const OPPORTUNITY_ORG: &[Hop] = &[Hop::incoming("HAS_OPPORTUNITY", "Organization")];
const INVOICE_CONTRACT: &[Hop] = &[Hop::incoming("HAS_INVOICE", "Contract")];
const CONTACT_ORG: &[Hop] = &[
    Hop::outgoing("WORKS_AS", "JobRole"),
    Hop::outgoing("ROLE_IN", "Organization"),
];
const CONTACT_EMAIL: &[Hop] = &[Hop::outgoing("HAS", "Email")];
const CONTACT_PHONE: &[Hop] = &[Hop::outgoing("HAS", "PhoneNumber")];
const CONTACT_JOB: &[Hop] = &[Hop::outgoing("WORKS_AS", "JobRole")];
const USER_EMAIL: &[Hop] = &[Hop::outgoing("HAS", "Email")];

// ---- base conditions --------------------------------------------------------

const NOT_TENANT_ORGANIZATION: BaseCondition = BaseCondition {
    path: GraphPath::own("tenantOrganization"),
    value_type: Boolean,
    operation: FilterOperation::Neq,
    value: BaseValue::Bool(true),
    include_empty: true,
};

const NOT_HIDDEN: BaseCondition = BaseCondition {
    path: GraphPath::own("hide"),
    value_type: Boolean,
    operation: FilterOperation::Eq,
    value: BaseValue::Bool(false),
    include_empty: true,
};

const ORGANIZATION_BASE: &[BaseCondition] = &[NOT_HIDDEN, NOT_TENANT_ORGANIZATION];
const BILLABLE_BASE: &[BaseCondition] = &[NOT_TENANT_ORGANIZATION];

const RENEWAL_BASE: &[BaseCondition] = &[BaseCondition {
    path: GraphPath::own("internalType"),
    value_type: String,
    operation: FilterOperation::Eq,
    value: BaseValue::Str("RENEWAL"),
    include_empty: false,
}];

const PIPELINE_BASE: &[BaseCondition] = &[BaseCondition {
    path: GraphPath::own("internalType"),
    value_type: String,
    operation: FilterOperation::Eq,
    value: BaseValue::Str("NBO"),
    include_empty: false,
}];

// ---- columns ----------------------------------------------------------------

static ORGANIZATION_COLUMNS: &[ColumnDefinition] = &[
    own(C::OrganizationsAvatar, "logoUrl", String).display_only(),
    own(C::OrganizationsName, "name", String).width(200),
    own(C::OrganizationsWebsite, "website", String),
    own(C::OrganizationsRelationship, "relationship", String),
    own(C::OrganizationsStage, "stage", String),
    own(C::OrganizationsRenewalLikelihood, "derivedRenewalLikelihood", String),
    own(C::OrganizationsRenewalDate, "derivedNextRenewalAt", Date),
    own(C::OrganizationsOnboardingStatus, "onboardingStatus", String),
    own(C::OrganizationsForecastArr, "renewalForecastArr", Float),
    via(C::OrganizationsOwner, OWNER, "name", String),
    via(C::OrganizationsOwnerId, OWNER, "id", String).hidden(),
    own(C::OrganizationsLastTouchpoint, "lastTouchpointAt", Date),
    own(C::OrganizationsLastTouchpointDate, "lastTouchpointAt", Date).hidden(),
    own(C::OrganizationsChurnDate, "derivedChurnedAt", Date),
    own(C::OrganizationsLtv, "derivedLtv", Float),
    via(C::OrganizationsSocials, SOCIAL, "url", String).unsortable(),
    own(C::OrganizationsCreatedDate, "createdAt", Date),
    own(C::OrganizationsLeadSource, "leadSource", String),
    own(C::OrganizationsEmployeeCount, "employees", Integer),
    own(C::OrganizationsYearFounded, "yearFounded", Integer),
    own(C::OrganizationsIndustry, "industry", String),
    via(C::OrganizationsCity, LOCATED, "locality", String),
    via(C::OrganizationsHeadquarters, LOCATED, "countryCodeA2", String),
    own(C::OrganizationsIsPublic, "isPublic", Boolean),
    via(C::OrganizationsLinkedinFollowerCount, SOCIAL, "followersCount", Integer),
    via(C::OrganizationsTags, TAGGED, "name", String).unsortable(),
    own(C::OrganizationsContactCount, "contactCount", Integer),
];

static BILLABLE_ORGANIZATION_COLUMNS: &[ColumnDefinition] = &[
    own(C::OrganizationsName, "name", String).width(200),
    own(C::OrganizationsHidden, "hide", Boolean).hidden(),
];

static RENEWAL_COLUMNS: &[ColumnDefinition] = &[
    via(C::RenewalsAvatar, OPPORTUNITY_ORG, "logoUrl", String).display_only(),
    via(C::RenewalsName, OPPORTUNITY_ORG, "name", String).width(200),
    own(C::RenewalsRenewalDate, "renewedAt", Date),
    own(C::RenewalsForecastArr, "amount", Float),
    own(C::RenewalsRenewalLikelihood, "renewalLikelihood", String),
    via(C::RenewalsOwner, OWNER, "name", String),
    via(C::RenewalsLastTouchpoint, OPPORTUNITY_ORG, "lastTouchpointAt", Date),
    own(C::RenewalCycle, "renewalCycle", String).hidden(),
];

static INVOICE_COLUMNS: &[ColumnDefinition] = &[
    own(C::InvoicesInvoicePreview, "number", String).display_only(),
    own(C::InvoicesInvoiceNumber, "number", String),
    via(C::InvoicesContract, INVOICE_CONTRACT, "name", String),
    own(C::InvoicesBillingCycle, "billingCycle", String),
    own(C::InvoicesIssueDate, "issuedDate", Date),
    own(C::InvoicesIssueDatePast, "issuedDate", Date),
    own(C::InvoicesDueDate, "dueDate", Date),
    own(C::InvoicesAmount, "totalAmount", Float),
    own(C::InvoicesInvoiceStatus, "status", String),
    own(C::InvoicesPaymentStatus, "paymentStatus", String),
    own(C::InvoicePreview, "preview", Boolean).hidden(),
    own(C::InvoiceDryRun, "dryRun", Boolean).hidden(),
];

static CONTACT_COLUMNS: &[ColumnDefinition] = &[
    own(C::ContactsAvatar, "profilePhotoUrl", String).display_only(),
    own(C::ContactsName, "name", String).width(200),
    via(C::ContactsOrganization, CONTACT_ORG, "name", String),
    via(C::ContactsEmails, CONTACT_EMAIL, "email", String).unsortable(),
    via(C::ContactsPhoneNumbers, CONTACT_PHONE, "e164", String).unsortable(),
    own(C::ContactsLinkedin, "linkedInUrl", String),
    via(C::ContactsCountry, LOCATED, "country", String),
    via(C::ContactsRegion, LOCATED, "region", String),
    via(C::ContactsCity, LOCATED, "locality", String),
    via(C::ContactsPersona, TAGGED, "name", String).unsortable(),
    own(C::ContactsLastInteraction, "lastInteractionAt", Date),
    own(C::ContactsSkills, "skills", StringList).unsortable(),
    own(C::ContactsSchools, "schools", StringList).unsortable(),
    own(C::ContactsLanguages, "languages", StringList).unsortable(),
    via(C::ContactsTimeInCurrentRole, CONTACT_JOB, "startedAt", Date),
    own(C::ContactsExperience, "experienceYears", Integer),
    own(C::ContactsLinkedinFollowerCount, "linkedInFollowerCount", Integer),
    via(C::ContactsJobTitle, CONTACT_JOB, "jobTitle", String),
    via(C::ContactsOrganizationStage, CONTACT_ORG, "stage", String).hidden(),
    via(C::ContactsOrganizationRelationship, CONTACT_ORG, "relationship", String).hidden(),
];

static OPPORTUNITY_COLUMNS: &[ColumnDefinition] = &[
    own(C::OpportunitiesName, "name", String).width(200),
    via(C::OpportunitiesOrganization, OPPORTUNITY_ORG, "name", String),
    own(C::OpportunitiesStage, "externalStage", String),
    own(C::OpportunitiesEstimatedArr, "maxAmount", Float),
    via(C::OpportunitiesOwner, OWNER, "name", String),
    own(C::OpportunitiesTimeInStage, "stageUpdatedAt", Date),
    own(C::OpportunitiesCreatedDate, "createdAt", Date),
    own(C::OpportunitiesNextStep, "nextSteps", String).unsortable(),
];

static USER_COLUMNS: &[ColumnDefinition] = &[
    own(C::UsersName, "name", String).width(200),
    via(C::UsersEmail, USER_EMAIL, "email", String),
    own(C::UsersRoles, "roles", StringList).unsortable(),
    own(C::UsersCreatedDate, "createdAt", Date),
];

// ---- tables -----------------------------------------------------------------

const fn organizations(table_id: TableId) -> TableDefinition {
    TableDefinition {
        table_id,
        view_type: TableViewType::Organizations,
        root_label: "Organization",
        tenant_path: GraphPath::via(ORG_TENANT, "name"),
        owner_path: None,
        base_conditions: ORGANIZATION_BASE,
        columns: ORGANIZATION_COLUMNS,
    }
}

const fn renewals(table_id: TableId) -> TableDefinition {
    TableDefinition {
        table_id,
        view_type: TableViewType::Renewals,
        root_label: "Opportunity",
        tenant_path: GraphPath::via(OPPORTUNITY_TENANT, "name"),
        owner_path: None,
        base_conditions: RENEWAL_BASE,
        columns: RENEWAL_COLUMNS,
    }
}

const fn invoices(table_id: TableId) -> TableDefinition {
    TableDefinition {
        table_id,
        view_type: TableViewType::Invoices,
        root_label: "Invoice",
        tenant_path: GraphPath::via(INVOICE_TENANT, "name"),
        owner_path: None,
        base_conditions: &[],
        columns: INVOICE_COLUMNS,
    }
}

const fn contacts(table_id: TableId) -> TableDefinition {
    TableDefinition {
        table_id,
        view_type: TableViewType::Contacts,
        root_label: "Contact",
        tenant_path: GraphPath::via(CONTACT_TENANT, "name"),
        owner_path: None,
        base_conditions: &[],
        columns: CONTACT_COLUMNS,
    }
}

pub(crate) static TABLES: &[TableDefinition] = &[
    organizations(TableId::Organizations),
    organizations(TableId::Customers),
    TableDefinition {
        owner_path: Some(GraphPath::via(OWNER, "id")),
        ..organizations(TableId::MyPortfolio)
    },
    organizations(TableId::Leads),
    organizations(TableId::Nurture),
    organizations(TableId::Churn),
    TableDefinition {
        base_conditions: BILLABLE_BASE,
        columns: BILLABLE_ORGANIZATION_COLUMNS,
        ..organizations(TableId::BillableOrganizations)
    },
    contacts(TableId::Contacts),
    contacts(TableId::ContactsForTargetOrganizations),
    TableDefinition {
        table_id: TableId::Opportunities,
        view_type: TableViewType::Opportunities,
        root_label: "Opportunity",
        tenant_path: GraphPath::via(OPPORTUNITY_TENANT, "name"),
        owner_path: None,
        base_conditions: PIPELINE_BASE,
        columns: OPPORTUNITY_COLUMNS,
    },
    renewals(TableId::MonthlyRenewals),
    renewals(TableId::QuarterlyRenewals),
    renewals(TableId::AnnualRenewals),
    invoices(TableId::UpcomingInvoices),
    invoices(TableId::PastInvoices),
    TableDefinition {
        table_id: TableId::Users,
        view_type: TableViewType::Users,
        root_label: "User",
        tenant_path: GraphPath::via(USER_TENANT, "name"),
        owner_path: None,
        base_conditions: &[],
        columns: USER_COLUMNS,
    },
];
