use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the employee submitting requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Human-facing reference assigned to a stored request (`SIRW-2025-0001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestReference(pub String);

/// Lifecycle status tracked for a remote work request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Escalated,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Escalated => "escalated",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Only terminal, honoured requests consume the annual allowance.
    pub const fn counts_toward_allowance(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Completed)
    }
}

/// Role categories excluded from SIRW by policy (Permanent Establishment and
/// related risks). Declaration order is the fixed order used when listing
/// matched categories in rule output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    FrontlineCustomerFacing,
    OnsiteRequired,
    LegalRestrictions,
    CommercialSales,
    Procurement,
    SeniorExecutive,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 6] = [
        RoleCategory::FrontlineCustomerFacing,
        RoleCategory::OnsiteRequired,
        RoleCategory::LegalRestrictions,
        RoleCategory::CommercialSales,
        RoleCategory::Procurement,
        RoleCategory::SeniorExecutive,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            RoleCategory::FrontlineCustomerFacing => "frontline_customer_facing",
            RoleCategory::OnsiteRequired => "onsite_required",
            RoleCategory::LegalRestrictions => "legal_restrictions",
            RoleCategory::CommercialSales => "commercial_sales",
            RoleCategory::Procurement => "procurement",
            RoleCategory::SeniorExecutive => "senior_executive",
        }
    }

    /// Label interpolated into user-facing rule messages.
    pub const fn description(self) -> &'static str {
        match self {
            RoleCategory::FrontlineCustomerFacing => "frontline or customer-facing role",
            RoleCategory::OnsiteRequired => "role that must be performed on-site",
            RoleCategory::LegalRestrictions => {
                "role with legal restrictions preventing remote work abroad"
            }
            RoleCategory::CommercialSales => {
                "commercial/sales role with contract signing authority"
            }
            RoleCategory::Procurement => "procurement role with contract signing authority",
            RoleCategory::SeniorExecutive => "senior executive leadership role",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.token() == token.trim())
    }
}

/// Normalized, immutable inputs consumed by the rule set.
///
/// `is_sales_role` is the legacy contract-signing-authority flag retained for
/// older callers; it and `ineligible_role_categories` are independent signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub has_right_to_work: bool,
    #[serde(default)]
    pub is_sales_role: bool,
    #[serde(default)]
    pub ineligible_role_categories: BTreeSet<RoleCategory>,
    pub duration_days: u32,
    pub home_country: String,
    pub destination_country: String,
}

/// Malformed context detected before any rule runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("home country must not be empty")]
    EmptyHomeCountry,
    #[error("destination country must not be empty")]
    EmptyDestinationCountry,
}

impl EvaluationContext {
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.home_country.trim().is_empty() {
            return Err(ContextError::EmptyHomeCountry);
        }
        if self.destination_country.trim().is_empty() {
            return Err(ContextError::EmptyDestinationCountry);
        }
        Ok(())
    }
}

/// Inbound wizard submission, prior to intake validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SirwSubmission {
    pub employee: EmployeeId,
    pub home_country: String,
    pub destination_country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub has_right_to_work: bool,
    #[serde(default)]
    pub is_sales_role: bool,
    #[serde(default)]
    pub ineligible_role_categories: BTreeSet<RoleCategory>,
    pub manager_name: String,
    pub manager_email: String,
    #[serde(default)]
    pub is_exception_request: bool,
    #[serde(default)]
    pub exception_reason: Option<String>,
}
