//! Stable identifiers for tables, view groupings and columns.

use crate::wire_enum;

wire_enum! {
    /// One queryable view of an entity type.
    pub enum TableId {
        Organizations => "ORGANIZATIONS",
        Customers => "CUSTOMERS",
        MyPortfolio => "MY_PORTFOLIO",
        Leads => "LEADS",
        Nurture => "NURTURE",
        Churn => "CHURN",
        Contacts => "CONTACTS",
        ContactsForTargetOrganizations => "CONTACTS_FOR_TARGET_ORGANIZATIONS",
        Opportunities => "OPPORTUNITIES",
        MonthlyRenewals => "MONTHLY_RENEWALS",
        QuarterlyRenewals => "QUARTERLY_RENEWALS",
        AnnualRenewals => "ANNUAL_RENEWALS",
        UpcomingInvoices => "UPCOMING_INVOICES",
        PastInvoices => "PAST_INVOICES",
        Users => "USERS",
        BillableOrganizations => "BILLABLE_ORGANIZATIONS",
    }
}

wire_enum! {
    /// Grouping of tables that render the same entity type.
    pub enum TableViewType {
        Organizations => "ORGANIZATIONS",
        Contacts => "CONTACTS",
        Opportunities => "OPPORTUNITIES",
        Renewals => "RENEWALS",
        Invoices => "INVOICES",
        Users => "USERS",
    }
}

wire_enum! {
    /// A displayable, filterable or sortable property of some table.
    ///
    /// The short aliases are spellings found in filters persisted by older
    /// clients; they are accepted on input and always written back canonical.
    pub enum ColumnType {
        // organizations
        OrganizationsAvatar => "ORGANIZATIONS_AVATAR",
        OrganizationsName => "ORGANIZATIONS_NAME" | "NAME",
        OrganizationsWebsite => "ORGANIZATIONS_WEBSITE" | "WEBSITE",
        OrganizationsRelationship => "ORGANIZATIONS_RELATIONSHIP" | "RELATIONSHIP",
        OrganizationsStage => "ORGANIZATIONS_STAGE" | "STAGE",
        OrganizationsRenewalLikelihood => "ORGANIZATIONS_RENEWAL_LIKELIHOOD",
        OrganizationsRenewalDate => "ORGANIZATIONS_RENEWAL_DATE",
        OrganizationsOnboardingStatus => "ORGANIZATIONS_ONBOARDING_STATUS",
        OrganizationsForecastArr => "ORGANIZATIONS_FORECAST_ARR",
        OrganizationsOwner => "ORGANIZATIONS_OWNER",
        OrganizationsOwnerId => "ORGANIZATIONS_OWNER_ID" | "OWNER_ID",
        OrganizationsLastTouchpoint => "ORGANIZATIONS_LAST_TOUCHPOINT",
        OrganizationsLastTouchpointDate => "ORGANIZATIONS_LAST_TOUCHPOINT_DATE",
        OrganizationsChurnDate => "ORGANIZATIONS_CHURN_DATE",
        OrganizationsLtv => "ORGANIZATIONS_LTV",
        OrganizationsSocials => "ORGANIZATIONS_SOCIALS",
        OrganizationsCreatedDate => "ORGANIZATIONS_CREATED_DATE",
        OrganizationsLeadSource => "ORGANIZATIONS_LEAD_SOURCE",
        OrganizationsEmployeeCount => "ORGANIZATIONS_EMPLOYEE_COUNT" | "EMPLOYEE_COUNT",
        OrganizationsYearFounded => "ORGANIZATIONS_YEAR_FOUNDED" | "YEAR_FOUNDED",
        OrganizationsIndustry => "ORGANIZATIONS_INDUSTRY" | "INDUSTRY",
        OrganizationsCity => "ORGANIZATIONS_CITY",
        OrganizationsHeadquarters => "ORGANIZATIONS_HEADQUARTERS" | "COUNTRY_A2",
        OrganizationsIsPublic => "ORGANIZATIONS_IS_PUBLIC" | "IS_PUBLIC",
        OrganizationsLinkedinFollowerCount => "ORGANIZATIONS_LINKEDIN_FOLLOWER_COUNT" | "LINKEDIN_FOLLOWER_COUNT",
        OrganizationsTags => "ORGANIZATIONS_TAGS" | "TAGS",
        OrganizationsContactCount => "ORGANIZATIONS_CONTACT_COUNT",
        OrganizationsHidden => "ORGANIZATIONS_HIDDEN",

        // renewals
        RenewalsAvatar => "RENEWALS_AVATAR",
        RenewalsName => "RENEWALS_NAME",
        RenewalsRenewalDate => "RENEWALS_RENEWAL_DATE",
        RenewalsForecastArr => "RENEWALS_FORECAST_ARR",
        RenewalsRenewalLikelihood => "RENEWALS_RENEWAL_LIKELIHOOD",
        RenewalsOwner => "RENEWALS_OWNER",
        RenewalsLastTouchpoint => "RENEWALS_LAST_TOUCHPOINT",
        RenewalCycle => "RENEWAL_CYCLE",

        // invoices
        InvoicesInvoicePreview => "INVOICES_INVOICE_PREVIEW",
        InvoicesInvoiceNumber => "INVOICES_INVOICE_NUMBER",
        InvoicesContract => "INVOICES_CONTRACT",
        InvoicesBillingCycle => "INVOICES_BILLING_CYCLE",
        InvoicesIssueDate => "INVOICES_ISSUE_DATE",
        InvoicesIssueDatePast => "INVOICES_ISSUE_DATE_PAST",
        InvoicesDueDate => "INVOICES_DUE_DATE",
        InvoicesAmount => "INVOICES_AMOUNT",
        InvoicesInvoiceStatus => "INVOICES_INVOICE_STATUS",
        InvoicesPaymentStatus => "INVOICES_PAYMENT_STATUS",
        InvoicePreview => "INVOICE_PREVIEW",
        InvoiceDryRun => "INVOICE_DRY_RUN",

        // contacts
        ContactsAvatar => "CONTACTS_AVATAR",
        ContactsName => "CONTACTS_NAME",
        ContactsOrganization => "CONTACTS_ORGANIZATION",
        ContactsEmails => "CONTACTS_EMAILS",
        ContactsPhoneNumbers => "CONTACTS_PHONE_NUMBERS",
        ContactsLinkedin => "CONTACTS_LINKEDIN",
        ContactsCountry => "CONTACTS_COUNTRY",
        ContactsRegion => "CONTACTS_REGION",
        ContactsCity => "CONTACTS_CITY",
        ContactsPersona => "CONTACTS_PERSONA",
        ContactsLastInteraction => "CONTACTS_LAST_INTERACTION",
        ContactsSkills => "CONTACTS_SKILLS",
        ContactsSchools => "CONTACTS_SCHOOLS",
        ContactsLanguages => "CONTACTS_LANGUAGES",
        ContactsTimeInCurrentRole => "CONTACTS_TIME_IN_CURRENT_ROLE",
        ContactsExperience => "CONTACTS_EXPERIENCE",
        ContactsLinkedinFollowerCount => "CONTACTS_LINKEDIN_FOLLOWER_COUNT",
        ContactsJobTitle => "CONTACTS_JOB_TITLE",
        ContactsOrganizationStage => "CONTACTS_ORGANIZATION_STAGE",
        ContactsOrganizationRelationship => "CONTACTS_ORGANIZATION_RELATIONSHIP",

        // opportunities
        OpportunitiesName => "OPPORTUNITIES_NAME",
        OpportunitiesOrganization => "OPPORTUNITIES_ORGANIZATION",
        OpportunitiesStage => "OPPORTUNITIES_STAGE",
        OpportunitiesEstimatedArr => "OPPORTUNITIES_ESTIMATED_ARR",
        OpportunitiesOwner => "OPPORTUNITIES_OWNER",
        OpportunitiesTimeInStage => "OPPORTUNITIES_TIME_IN_STAGE",
        OpportunitiesCreatedDate => "OPPORTUNITIES_CREATED_DATE",
        OpportunitiesNextStep => "OPPORTUNITIES_NEXT_STEP",

        // users
        UsersName => "USERS_NAME",
        UsersEmail => "USERS_EMAIL",
        UsersRoles => "USERS_ROLES",
        UsersCreatedDate => "USERS_CREATED_DATE",
    }
}
