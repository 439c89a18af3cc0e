//! Household profile data structures

use serde::{Deserialize, Serialize};

use crate::allocation::AssetAllocation;
use crate::assumptions::RetirementDefaults;
use crate::error::{PlanningError, ValidationIssue};
use crate::goals::FinancialGoal;
use crate::ledger::ProjectPlan;

fn default_current_age() -> u32 {
    45
}

/// Retirement parameters for the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProfile {
    #[serde(default = "default_current_age")]
    pub current_age: u32,

    /// Should exceed `current_age`; equal or lower means already retired.
    /// Unset ages take the configured planning defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_age: Option<u32>,

    /// Must exceed the retirement age
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy: Option<u32>,

    /// Annual income wanted in retirement
    #[serde(default)]
    pub desired_retirement_income: f64,

    #[serde(default)]
    pub social_security_estimate: f64,

    #[serde(default)]
    pub pension_income: f64,

    #[serde(default)]
    pub current_retirement_savings: f64,
}

impl Default for RetirementProfile {
    fn default() -> Self {
        Self {
            current_age: default_current_age(),
            retirement_age: None,
            life_expectancy: None,
            desired_retirement_income: 0.0,
            social_security_estimate: 0.0,
            pension_income: 0.0,
            current_retirement_savings: 0.0,
        }
    }
}

impl RetirementProfile {
    /// Fill unset ages from the planning defaults
    pub fn with_defaults(&self, defaults: &RetirementDefaults) -> Self {
        Self {
            retirement_age: Some(self.retirement_age.unwrap_or(defaults.retirement_age)),
            life_expectancy: Some(self.life_expectancy.unwrap_or(defaults.life_expectancy)),
            ..self.clone()
        }
    }

    /// Retirement age, falling back to the built-in default when unset
    pub fn retirement_age(&self) -> u32 {
        self.retirement_age
            .unwrap_or_else(|| RetirementDefaults::default().retirement_age)
    }

    pub fn life_expectancy(&self) -> u32 {
        self.life_expectancy
            .unwrap_or_else(|| RetirementDefaults::default().life_expectancy)
    }

    /// Years until retirement (0 once retired)
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age().saturating_sub(self.current_age)
    }

    pub fn is_retired(&self) -> bool {
        self.current_age >= self.retirement_age()
    }

    /// Life expectancy, forced past the retirement age when inconsistent
    pub fn effective_life_expectancy(&self) -> u32 {
        self.life_expectancy().max(self.retirement_age() + 1)
    }

    /// Years the portfolio has to fund
    pub fn retirement_years(&self) -> u32 {
        self.effective_life_expectancy() - self.retirement_age()
    }

    /// Guaranteed income sources (social security + pension)
    pub fn guaranteed_income(&self) -> f64 {
        self.social_security_estimate.max(0.0) + self.pension_income.max(0.0)
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let (retirement_age, life_expectancy) = (self.retirement_age(), self.life_expectancy());
        if retirement_age <= self.current_age {
            issues.push(ValidationIssue::warning(
                "retirement.retirement_age",
                format!(
                    "retirement age {} is not after current age {}; treating as retired",
                    retirement_age, self.current_age
                ),
            ));
        }
        if life_expectancy <= retirement_age {
            issues.push(ValidationIssue::invalid(
                "retirement.life_expectancy",
                format!(
                    "life expectancy {} must exceed retirement age {}",
                    life_expectancy, retirement_age
                ),
            ));
        }
        for (field, value) in [
            ("retirement.desired_retirement_income", self.desired_retirement_income),
            ("retirement.social_security_estimate", self.social_security_estimate),
            ("retirement.pension_income", self.pension_income),
            ("retirement.current_retirement_savings", self.current_retirement_savings),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ValidationIssue::invalid(field, format!("{} must be >= 0", value)));
            }
        }
        issues
    }
}

/// Tax-advantaged account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Traditional401k,
    Roth401k,
    Plan403b,
    Plan457,
    TraditionalIra,
    RothIra,
    SepIra,
    SimpleIra,
    Hsa,
    Plan529,
}

impl AccountType {
    /// Parse the labels used by the profile store
    pub fn from_label(label: &str) -> Result<Self, PlanningError> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "401k" | "traditional401k" => Ok(AccountType::Traditional401k),
            "roth401k" => Ok(AccountType::Roth401k),
            "403b" => Ok(AccountType::Plan403b),
            "457" | "457b" => Ok(AccountType::Plan457),
            "ira" | "traditionalira" => Ok(AccountType::TraditionalIra),
            "roth" | "rothira" => Ok(AccountType::RothIra),
            "sep" | "sepira" => Ok(AccountType::SepIra),
            "simple" | "simpleira" => Ok(AccountType::SimpleIra),
            "hsa" => Ok(AccountType::Hsa),
            "529" => Ok(AccountType::Plan529),
            _ => Err(PlanningError::UnknownLabel {
                kind: "AccountType",
                value: label.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Traditional401k => "401(k)",
            AccountType::Roth401k => "Roth 401(k)",
            AccountType::Plan403b => "403(b)",
            AccountType::Plan457 => "457(b)",
            AccountType::TraditionalIra => "IRA",
            AccountType::RothIra => "Roth IRA",
            AccountType::SepIra => "SEP IRA",
            AccountType::SimpleIra => "SIMPLE IRA",
            AccountType::Hsa => "HSA",
            AccountType::Plan529 => "529",
        }
    }

    /// Whether an employer match can apply
    pub fn is_employer_plan(&self) -> bool {
        matches!(
            self,
            AccountType::Traditional401k
                | AccountType::Roth401k
                | AccountType::Plan403b
                | AccountType::Plan457
                | AccountType::SimpleIra
        )
    }
}

/// A tax-advantaged account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxAdvantagedAccount {
    pub account_type: AccountType,
    pub label: String,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    pub annual_contribution: f64,
    /// Annual contribution limit; a contribution above it is flagged, not rejected
    #[serde(default)]
    pub max_contribution: f64,
    /// Annual employer match in dollars
    #[serde(default)]
    pub employer_match: Option<f64>,
}

impl TaxAdvantagedAccount {
    /// Remaining room under the annual limit
    pub fn unused_capacity(&self) -> f64 {
        (self.max_contribution - self.annual_contribution).max(0.0)
    }

    pub fn is_over_limit(&self) -> bool {
        self.max_contribution > 0.0 && self.annual_contribution > self.max_contribution
    }

    /// Contribution below `multiple × match` is treated as leaving match on the table
    pub fn misses_employer_match(&self, multiple: f64) -> bool {
        match self.employer_match {
            Some(m) if m > 0.0 && self.account_type.is_employer_plan() => {
                self.annual_contribution < multiple * m
            }
            _ => false,
        }
    }

    pub fn validate(&self, index: usize) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.is_over_limit() {
            issues.push(ValidationIssue::warning(
                format!("accounts[{}].annual_contribution", index),
                format!(
                    "{} contribution {:.0} exceeds the {:.0} limit",
                    self.label, self.annual_contribution, self.max_contribution
                ),
            ));
        }
        if self.current_balance < 0.0 || self.annual_contribution < 0.0 {
            issues.push(ValidationIssue::invalid(
                format!("accounts[{}]", index),
                format!("{} has a negative balance or contribution", self.label),
            ));
        }
        issues
    }
}

/// A monthly spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub label: String,
    pub monthly_amount: f64,
    /// Display color, carried through for the chart renderer
    #[serde(default)]
    pub color: String,
}

/// Parse a free-text currency string such as "$1,234.56" or "-$250".
/// Everything except digits, '.' and '-' is stripped; unparseable input is 0.
pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    // Accounting-style "(1,200)" means negative
    let negative = text.trim().starts_with('(') && text.trim().ends_with(')');
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative { -value.abs() } else { value }
        }
        _ => {
            log::warn!("could not parse currency value {:?}, using 0", text);
            0.0
        }
    }
}

/// Balances as supplied by the client profile store (free-text currency)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holdings {
    #[serde(default)]
    pub deposits: String,
    #[serde(default)]
    pub credit: String,
    #[serde(default)]
    pub mortgage: String,
    #[serde(default)]
    pub investments: String,
}

impl Holdings {
    pub fn deposits_value(&self) -> f64 {
        parse_currency(&self.deposits)
    }

    pub fn credit_value(&self) -> f64 {
        parse_currency(&self.credit).abs()
    }

    pub fn mortgage_value(&self) -> f64 {
        parse_currency(&self.mortgage).abs()
    }

    pub fn investments_value(&self) -> f64 {
        parse_currency(&self.investments)
    }

    pub fn total_assets(&self) -> f64 {
        self.deposits_value() + self.investments_value()
    }

    /// Assets minus debts (credit and mortgage balances count as owed)
    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.credit_value() - self.mortgage_value()
    }
}

/// Risk tolerance label from the profile store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Case-insensitive; unknown labels fall back to Moderate
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        if lower.contains("conservative") || lower == "low" {
            RiskProfile::Conservative
        } else if lower.contains("aggressive") || lower.contains("growth") || lower == "high" {
            RiskProfile::Aggressive
        } else {
            if !lower.is_empty() && !lower.contains("moderate") && !lower.contains("balanced") {
                log::warn!("unknown risk profile {:?}, assuming moderate", label);
            }
            RiskProfile::Moderate
        }
    }

    /// Default target allocation when the profile carries none
    pub fn default_target_allocation(&self) -> AssetAllocation {
        match self {
            RiskProfile::Conservative => AssetAllocation::new(40.0, 45.0, 10.0, 5.0, 0.0),
            RiskProfile::Moderate => AssetAllocation::new(60.0, 30.0, 5.0, 5.0, 0.0),
            RiskProfile::Aggressive => AssetAllocation::new(80.0, 12.0, 3.0, 5.0, 0.0),
        }
    }
}

/// Everything the planning core knows about one household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(default)]
    pub client_name: String,

    /// Gross annual household income
    #[serde(default)]
    pub annual_income: f64,

    #[serde(default)]
    pub holdings: Holdings,

    /// Free-text risk label as supplied by the profile store
    #[serde(default)]
    pub risk_profile: String,

    #[serde(default)]
    pub retirement: RetirementProfile,

    #[serde(default)]
    pub goals: Vec<FinancialGoal>,

    #[serde(default)]
    pub accounts: Vec<TaxAdvantagedAccount>,

    #[serde(default)]
    pub current_allocation: AssetAllocation,

    #[serde(default)]
    pub target_allocation: Option<AssetAllocation>,

    #[serde(default)]
    pub expenses: Vec<ExpenseCategory>,

    #[serde(default)]
    pub projects: Vec<ProjectPlan>,
}

impl ClientProfile {
    pub fn risk(&self) -> RiskProfile {
        RiskProfile::from_label(&self.risk_profile)
    }

    /// Explicit target allocation, or the risk profile's default
    pub fn effective_target_allocation(&self) -> AssetAllocation {
        self.target_allocation
            .unwrap_or_else(|| self.risk().default_target_allocation())
    }

    pub fn net_worth(&self) -> f64 {
        self.holdings.net_worth()
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.monthly_amount.max(0.0)).sum()
    }

    pub fn monthly_income(&self) -> f64 {
        self.annual_income.max(0.0) / 12.0
    }

    /// Share of monthly income not spent, in percent, clamped to [-100, 100].
    /// Zero income yields 0.
    pub fn savings_rate(&self) -> f64 {
        let income = self.monthly_income();
        if income <= 0.0 {
            return 0.0;
        }
        ((income - self.monthly_expenses()) / income * 100.0).clamp(-100.0, 100.0)
    }

    /// Annual amount available to save (never negative)
    pub fn annual_savings(&self) -> f64 {
        (self.annual_income.max(0.0) - 12.0 * self.monthly_expenses()).max(0.0)
    }

    /// Functional update: replace the goal list
    pub fn with_goals(&self, goals: Vec<FinancialGoal>) -> Self {
        Self {
            goals,
            ..self.clone()
        }
    }

    /// Functional update: replace the current allocation
    pub fn with_current_allocation(&self, allocation: AssetAllocation) -> Self {
        Self {
            current_allocation: allocation,
            ..self.clone()
        }
    }

    /// Functional update: replace the retirement parameters
    pub fn with_retirement(&self, retirement: RetirementProfile) -> Self {
        Self {
            retirement,
            ..self.clone()
        }
    }

    /// Functional update: insert or replace a project (matched by id)
    pub fn with_project(&self, project: ProjectPlan) -> Self {
        let mut projects = self.projects.clone();
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => projects.push(project),
        }
        Self {
            projects,
            ..self.clone()
        }
    }

    /// Non-fatal validation of the whole profile
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = self.retirement.validate();

        if !self.annual_income.is_finite() || self.annual_income < 0.0 {
            issues.push(ValidationIssue::invalid("annual_income", "income must be >= 0"));
        }
        if self.current_allocation != AssetAllocation::default() {
            issues.extend(self.current_allocation.validate("current_allocation"));
        }
        if let Some(target) = &self.target_allocation {
            issues.extend(target.validate("target_allocation"));
        }
        for (i, account) in self.accounts.iter().enumerate() {
            issues.extend(account.validate(i));
        }
        for goal in &self.goals {
            issues.extend(goal.validate());
        }
        for project in &self.projects {
            issues.extend(project.validate());
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.56"), 1234.56);
        assert_eq!(parse_currency("USD 250,000"), 250_000.0);
        assert_eq!(parse_currency("-$75"), -75.0);
        assert_eq!(parse_currency("(1,200)"), -1200.0);
        assert_eq!(parse_currency(""), 0.0);
        assert_eq!(parse_currency("n/a"), 0.0);
        assert_eq!(parse_currency("1.2.3"), 0.0);
    }

    #[test]
    fn test_net_worth_from_holdings() {
        let holdings = Holdings {
            deposits: "$25,000".into(),
            credit: "$3,500".into(),
            mortgage: "$210,000".into(),
            investments: "$480,000.50".into(),
        };
        assert_abs_diff_eq!(holdings.net_worth(), 291_500.50, epsilon = 1e-6);
    }

    #[test]
    fn test_savings_rate() {
        let mut profile = ClientProfile {
            annual_income: 120_000.0,
            ..Default::default()
        };
        profile.expenses = vec![
            ExpenseCategory { label: "Housing".into(), monthly_amount: 4_000.0, color: String::new() },
            ExpenseCategory { label: "Food".into(), monthly_amount: 2_000.0, color: String::new() },
        ];
        // 10,000 a month in, 6,000 out
        assert_abs_diff_eq!(profile.savings_rate(), 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(profile.annual_savings(), 48_000.0, epsilon = 1e-9);

        profile.annual_income = 0.0;
        assert_eq!(profile.savings_rate(), 0.0);
        assert_eq!(profile.annual_savings(), 0.0);
    }

    #[test]
    fn test_retirement_defaults_from_json() {
        let profile: RetirementProfile = serde_json::from_str(r#"{"current_age": 50}"#).unwrap();
        assert_eq!(profile.retirement_age, None);
        assert_eq!(profile.retirement_age(), 65);
        assert_eq!(profile.life_expectancy(), 90);
        assert_eq!(profile.years_to_retirement(), 15);
        assert!(profile.validate().is_empty());
    }

    #[test]
    fn test_configured_defaults_fill_unset_ages() {
        let profile: RetirementProfile = serde_json::from_str(r#"{"current_age": 50}"#).unwrap();
        let defaults = RetirementDefaults {
            retirement_age: 67,
            life_expectancy: 95,
            ..RetirementDefaults::default()
        };
        let resolved = profile.with_defaults(&defaults);
        assert_eq!(resolved.years_to_retirement(), 17);
        assert_eq!(resolved.retirement_years(), 28);

        // explicit ages win
        let explicit = RetirementProfile { retirement_age: Some(62), ..profile };
        assert_eq!(explicit.with_defaults(&defaults).retirement_age(), 62);
        assert_eq!(explicit.with_defaults(&defaults).life_expectancy(), 95);
    }

    #[test]
    fn test_retirement_validation() {
        let profile = RetirementProfile {
            current_age: 70,
            retirement_age: Some(65),
            life_expectancy: Some(60),
            ..Default::default()
        };
        let issues = profile.validate();
        assert_eq!(issues.len(), 2);
        assert_eq!(profile.effective_life_expectancy(), 66);
        assert_eq!(profile.years_to_retirement(), 0);
        assert!(profile.is_retired());
    }

    #[test]
    fn test_account_checks() {
        let account = TaxAdvantagedAccount {
            account_type: AccountType::Traditional401k,
            label: "Employer 401(k)".into(),
            current_balance: 90_000.0,
            annual_contribution: 6_000.0,
            max_contribution: 23_000.0,
            employer_match: Some(4_000.0),
        };
        assert_abs_diff_eq!(account.unused_capacity(), 17_000.0);
        assert!(!account.is_over_limit());
        assert!(account.misses_employer_match(2.0));

        let ira = TaxAdvantagedAccount { account_type: AccountType::RothIra, ..account.clone() };
        assert!(!ira.misses_employer_match(2.0));

        let over = TaxAdvantagedAccount { annual_contribution: 24_000.0, ..account };
        assert!(over.is_over_limit());
        assert_eq!(over.validate(0).len(), 1);
    }

    #[test]
    fn test_account_type_labels() {
        assert_eq!(AccountType::from_label("401k").unwrap(), AccountType::Traditional401k);
        assert_eq!(AccountType::from_label("Roth IRA").unwrap(), AccountType::RothIra);
        assert_eq!(AccountType::from_label("Roth").unwrap(), AccountType::RothIra);
        assert!(AccountType::from_label("pension-ish").is_err());
    }

    #[test]
    fn test_risk_profile_labels() {
        assert_eq!(RiskProfile::from_label("Conservative"), RiskProfile::Conservative);
        assert_eq!(RiskProfile::from_label("AGGRESSIVE GROWTH"), RiskProfile::Aggressive);
        assert_eq!(RiskProfile::from_label("balanced"), RiskProfile::Moderate);
        assert_eq!(RiskProfile::from_label("unknown"), RiskProfile::Moderate);
        for risk in [RiskProfile::Conservative, RiskProfile::Moderate, RiskProfile::Aggressive] {
            assert!(risk.default_target_allocation().is_valid());
        }
    }
}
