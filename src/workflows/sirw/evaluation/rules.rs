use serde::{Deserialize, Serialize};

use super::config::PolicyConfig;
use super::AssessmentFlag;
use crate::workflows::sirw::countries;
use crate::workflows::sirw::domain::EvaluationContext;

/// How a rule failure affects the overall outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failure unconditionally forces rejection.
    Block,
    /// Failure forces escalation to human review, never rejection.
    Warn,
    /// Never affects the outcome.
    Info,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Block => "block",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }
}

/// One rule's evaluation, preserved verbatim in the audit trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub name: String,
    pub passed: bool,
    pub reason: String,
    pub severity: Severity,
    /// Machine-readable token attached to failures, merged into the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<AssessmentFlag>,
}

impl RuleVerdict {
    fn pass(rule: ComplianceRule, reason: String) -> Self {
        Self {
            name: rule.name().to_string(),
            passed: true,
            reason,
            severity: Severity::Info,
            flag: None,
        }
    }

    fn fail(rule: ComplianceRule, reason: String, flag: AssessmentFlag) -> Self {
        Self {
            name: rule.name().to_string(),
            passed: false,
            reason,
            severity: rule.severity(),
            flag: Some(flag),
        }
    }
}

/// Internal failure raised while evaluating a rule. The engine converts these
/// into synthetic warn verdicts instead of propagating them, so an assessment
/// always completes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule input unavailable: {0}")]
    InputUnavailable(String),
}

/// The fixed rule vocabulary. Registration order lives in
/// [`REGISTERED_RULES`]; each variant is a pure function of the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceRule {
    BlockedCountry,
    RightToWork,
    IneligibleRole,
    DurationLimit,
    ConsecutiveDays,
    SameCountry,
}

/// Evaluation order: destination first, then legal eligibility, then the
/// numeric limits, then informational checks.
pub const REGISTERED_RULES: [ComplianceRule; 6] = [
    ComplianceRule::BlockedCountry,
    ComplianceRule::RightToWork,
    ComplianceRule::IneligibleRole,
    ComplianceRule::DurationLimit,
    ComplianceRule::ConsecutiveDays,
    ComplianceRule::SameCountry,
];

impl ComplianceRule {
    pub const fn name(self) -> &'static str {
        match self {
            ComplianceRule::BlockedCountry => "Blocked Country Check",
            ComplianceRule::RightToWork => "Right to Work",
            ComplianceRule::IneligibleRole => "Role Eligibility Check",
            ComplianceRule::DurationLimit => "Duration Limit",
            ComplianceRule::ConsecutiveDays => "Consecutive Days Limit",
            ComplianceRule::SameCountry => "Same Country Check",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            ComplianceRule::SameCountry => Severity::Info,
            _ => Severity::Block,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ComplianceRule::BlockedCountry => {
                "Destination must not be under sanctions or without a company legal entity."
            }
            ComplianceRule::RightToWork => {
                "Employee must hold the legal right to work in the destination country."
            }
            ComplianceRule::IneligibleRole => {
                "Roles creating Permanent Establishment or other policy risk are not eligible."
            }
            ComplianceRule::DurationLimit => {
                "A single trip must not exceed the maximum workday allowance."
            }
            ComplianceRule::ConsecutiveDays => {
                "The annual allowance cannot be taken as one continuous block."
            }
            ComplianceRule::SameCountry => {
                "Notes when the destination equals the home country; informational only."
            }
        }
    }

    pub fn evaluate(
        self,
        context: &EvaluationContext,
        policy: &PolicyConfig,
    ) -> Result<RuleVerdict, RuleError> {
        match self {
            ComplianceRule::BlockedCountry => Ok(evaluate_blocked_country(self, context)),
            ComplianceRule::RightToWork => Ok(evaluate_right_to_work(self, context)),
            ComplianceRule::IneligibleRole => Ok(evaluate_ineligible_role(self, context)),
            ComplianceRule::DurationLimit => Ok(evaluate_duration(self, context, policy)),
            ComplianceRule::ConsecutiveDays => Ok(evaluate_consecutive(self, context, policy)),
            ComplianceRule::SameCountry => Ok(evaluate_same_country(self, context)),
        }
    }
}

fn evaluate_blocked_country(rule: ComplianceRule, context: &EvaluationContext) -> RuleVerdict {
    let classification = countries::classify(&context.destination_country);
    match (classification.reason, classification.message) {
        (Some(reason), Some(message)) => RuleVerdict::fail(
            rule,
            format!("{message} (Policy Appendix A)."),
            AssessmentFlag::from_block_reason(reason),
        ),
        _ => RuleVerdict::pass(
            rule,
            format!(
                "{} is an eligible destination for SIRW.",
                context.destination_country
            ),
        ),
    }
}

fn evaluate_right_to_work(rule: ComplianceRule, context: &EvaluationContext) -> RuleVerdict {
    if context.has_right_to_work {
        return RuleVerdict::pass(
            rule,
            format!(
                "Employee has right to work in {}.",
                context.destination_country
            ),
        );
    }
    RuleVerdict::fail(
        rule,
        format!(
            "Employee does not have right to work in {}. Remote work cannot be approved \
             without valid work authorisation (Policy Section 4.1.3).",
            context.destination_country
        ),
        AssessmentFlag::NoRightToWork,
    )
}

fn evaluate_ineligible_role(rule: ComplianceRule, context: &EvaluationContext) -> RuleVerdict {
    // Legacy contract-signing-authority flag, kept for older callers.
    if context.is_sales_role {
        return RuleVerdict::fail(
            rule,
            "Employee has contract signing authority which may create Permanent \
             Establishment risk. Sales and commercial roles with contract signing \
             authority are not eligible for SIRW (Policy Section 4.1.1)."
                .to_string(),
            AssessmentFlag::RoleIneligible,
        );
    }

    if !context.ineligible_role_categories.is_empty() {
        // BTreeSet iteration yields the fixed policy order, not input order.
        let flagged: Vec<&str> = context
            .ineligible_role_categories
            .iter()
            .map(|category| category.description())
            .collect();
        return RuleVerdict::fail(
            rule,
            format!(
                "Employee is in an ineligible role category: {}. SIRW is not available \
                 for this role type (Policy Section 4.1.1).",
                flagged.join(", ")
            ),
            AssessmentFlag::RoleIneligible,
        );
    }

    RuleVerdict::pass(rule, "Employee role is eligible for SIRW.".to_string())
}

fn evaluate_duration(
    rule: ComplianceRule,
    context: &EvaluationContext,
    policy: &PolicyConfig,
) -> RuleVerdict {
    let max_days = policy.max_single_trip_days;
    if context.duration_days <= max_days {
        return RuleVerdict::pass(
            rule,
            format!(
                "Duration of {} days is within the {max_days}-day limit.",
                context.duration_days
            ),
        );
    }
    RuleVerdict::fail(
        rule,
        format!(
            "Duration of {} days exceeds the maximum allowed {max_days} days for \
             short-term remote work. Please shorten your request or apply for a \
             permanent transfer (Policy Section 4.1.2).",
            context.duration_days
        ),
        AssessmentFlag::ExceedsDurationLimit,
    )
}

fn evaluate_consecutive(
    rule: ComplianceRule,
    context: &EvaluationContext,
    policy: &PolicyConfig,
) -> RuleVerdict {
    let max_consecutive = policy.max_consecutive_workdays;
    if context.duration_days <= max_consecutive {
        return RuleVerdict::pass(
            rule,
            format!(
                "Duration of {} days is within the {max_consecutive}-day consecutive limit.",
                context.duration_days
            ),
        );
    }
    RuleVerdict::fail(
        rule,
        format!(
            "Duration of {} consecutive days exceeds the maximum allowed \
             {max_consecutive} consecutive workdays. The {}-day annual allowance cannot \
             be taken as a single continuous block. Please shorten your request or split \
             into multiple trips (Policy Section 4.1.2).",
            context.duration_days, policy.annual_days_allowed
        ),
        AssessmentFlag::ExceedsConsecutiveLimit,
    )
}

fn evaluate_same_country(rule: ComplianceRule, context: &EvaluationContext) -> RuleVerdict {
    if context
        .home_country
        .eq_ignore_ascii_case(&context.destination_country)
    {
        return RuleVerdict::pass(
            rule,
            format!(
                "Working from home country ({}). This may not require cross-border \
                 compliance review.",
                context.home_country
            ),
        );
    }
    RuleVerdict::pass(
        rule,
        format!(
            "Cross-border remote work from {} to {}.",
            context.home_country, context.destination_country
        ),
    )
}
