//! Ordered rule evaluation and outcome aggregation.

mod config;
mod rules;

pub use config::PolicyConfig;
pub use rules::{ComplianceRule, RuleError, RuleVerdict, Severity, REGISTERED_RULES};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::countries::BlockReason;
use super::domain::{ContextError, EvaluationContext};

/// Final disposition of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentOutcome {
    Approved,
    Rejected,
    Escalated,
}

impl AssessmentOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentOutcome::Approved => "approved",
            AssessmentOutcome::Rejected => "rejected",
            AssessmentOutcome::Escalated => "escalated",
        }
    }
}

/// Machine-readable tokens attached to rule failures and caller-level checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentFlag {
    SanctionedCountry,
    NoEntityCountry,
    NoRightToWork,
    RoleIneligible,
    ExceedsDurationLimit,
    ExceedsConsecutiveLimit,
    ExceedsAnnualLimit,
    ExceptionRequested,
}

impl AssessmentFlag {
    pub const fn token(self) -> &'static str {
        match self {
            AssessmentFlag::SanctionedCountry => "sanctioned_country",
            AssessmentFlag::NoEntityCountry => "no_entity_country",
            AssessmentFlag::NoRightToWork => "no_right_to_work",
            AssessmentFlag::RoleIneligible => "role_ineligible",
            AssessmentFlag::ExceedsDurationLimit => "exceeds_duration_limit",
            AssessmentFlag::ExceedsConsecutiveLimit => "exceeds_consecutive_limit",
            AssessmentFlag::ExceedsAnnualLimit => "exceeds_annual_limit",
            AssessmentFlag::ExceptionRequested => "exception_requested",
        }
    }

    pub const fn from_block_reason(reason: BlockReason) -> Self {
        match reason {
            BlockReason::Sanctions => AssessmentFlag::SanctionedCountry,
            BlockReason::NoEntity => AssessmentFlag::NoEntityCountry,
        }
    }
}

/// Complete, immutable outcome of one assessment. Ownership passes to the
/// caller, which persists it alongside the request record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub outcome: AssessmentOutcome,
    pub reason: String,
    /// One verdict per registered rule, in registration order.
    pub rules: Vec<RuleVerdict>,
    /// Mirrors `reason` when escalated; callers may overwrite it with richer
    /// operational detail. Empty otherwise.
    pub escalation_note: String,
    pub flags: Vec<AssessmentFlag>,
}

/// Read-only reflection of a registered rule for documentation and UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

/// Runs the registered rules against a context and aggregates the verdicts.
///
/// The engine holds no mutable state; independent assessments may run
/// concurrently on separate contexts.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    policy: PolicyConfig,
    rules: Vec<ComplianceRule>,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl ComplianceEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            policy,
            rules: REGISTERED_RULES.to_vec(),
        }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Evaluate every registered rule and aggregate the outcome.
    ///
    /// All rules run even after a blocking failure so the trace is complete
    /// for audit. A rule that errors internally is recorded as a synthetic
    /// warn verdict, which forces escalation rather than a silent pass or a
    /// hard failure.
    pub fn assess(&self, context: &EvaluationContext) -> Result<AssessmentResult, ContextError> {
        self.assess_with(context, ComplianceRule::evaluate)
    }

    /// Evaluation loop with the per-rule evaluator injected, so the
    /// error-to-escalation conversion can be driven directly in tests.
    pub(crate) fn assess_with<F>(
        &self,
        context: &EvaluationContext,
        mut evaluate: F,
    ) -> Result<AssessmentResult, ContextError>
    where
        F: FnMut(ComplianceRule, &EvaluationContext, &PolicyConfig) -> Result<RuleVerdict, RuleError>,
    {
        context.validate()?;

        info!(
            home = %context.home_country,
            destination = %context.destination_country,
            duration_days = context.duration_days,
            right_to_work = context.has_right_to_work,
            "running compliance assessment"
        );

        let mut verdicts = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let verdict = match evaluate(*rule, context, &self.policy) {
                Ok(verdict) => verdict,
                Err(err) => {
                    error!(rule = rule.name(), %err, "rule evaluation failed");
                    escalation_verdict(rule.name(), &err)
                }
            };
            verdicts.push(verdict);
        }

        let result = resolve(context, verdicts);
        info!(outcome = result.outcome.label(), "compliance assessment complete");
        Ok(result)
    }

    pub fn rules_summary(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|rule| RuleSummary {
                name: rule.name(),
                severity: rule.severity(),
                description: rule.description(),
            })
            .collect()
    }
}

/// Synthetic verdict standing in for a rule that failed to evaluate.
pub(crate) fn escalation_verdict(rule_name: &str, err: &RuleError) -> RuleVerdict {
    RuleVerdict {
        name: rule_name.to_string(),
        passed: false,
        reason: format!("Error evaluating rule: {err}"),
        severity: Severity::Warn,
        flag: None,
    }
}

/// Apply the outcome precedence: any blocking failure rejects, else any
/// warning escalates, else the request is approved.
pub(crate) fn resolve(context: &EvaluationContext, verdicts: Vec<RuleVerdict>) -> AssessmentResult {
    let mut flags = Vec::new();
    for verdict in &verdicts {
        if let Some(flag) = verdict.flag {
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }
    }

    let blocking: Vec<&RuleVerdict> = verdicts
        .iter()
        .filter(|verdict| !verdict.passed && verdict.severity == Severity::Block)
        .collect();
    let warnings: Vec<&RuleVerdict> = verdicts
        .iter()
        .filter(|verdict| !verdict.passed && verdict.severity == Severity::Warn)
        .collect();

    let (outcome, reason) = if !blocking.is_empty() {
        let reasons: Vec<&str> = blocking.iter().map(|verdict| verdict.reason.as_str()).collect();
        (AssessmentOutcome::Rejected, reasons.join(" | "))
    } else if !warnings.is_empty() {
        let reasons: Vec<&str> = warnings.iter().map(|verdict| verdict.reason.as_str()).collect();
        (
            AssessmentOutcome::Escalated,
            format!("Manual review required. {}", reasons.join(" | ")),
        )
    } else {
        (
            AssessmentOutcome::Approved,
            format!(
                "All compliance checks passed. Remote work in {} for {} days is approved.",
                context.destination_country, context.duration_days
            ),
        )
    };

    let escalation_note = if outcome == AssessmentOutcome::Escalated {
        reason.clone()
    } else {
        String::new()
    };

    AssessmentResult {
        outcome,
        reason,
        rules: verdicts,
        escalation_note,
        flags,
    }
}
