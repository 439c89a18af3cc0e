//! Load client profiles (JSON) and expense / account exports (CSV)

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;

use super::{AccountType, ClientProfile, ExpenseCategory, TaxAdvantagedAccount};
use crate::error::{PlanningError, Result};
use crate::goals::LifeEvent;

/// Load a single client profile from a JSON file
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<ClientProfile> {
    let file = File::open(path)?;
    load_profile_from_reader(BufReader::new(file))
}

/// Load a single client profile from any reader
pub fn load_profile_from_reader<R: Read>(reader: R) -> Result<ClientProfile> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a book of client profiles (a JSON array)
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<ClientProfile>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Load detected life events (a JSON array) as supplied by the event detector
pub fn load_life_events<P: AsRef<Path>>(path: P) -> Result<Vec<LifeEvent>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Raw CSV row for an expense export
#[derive(Debug, serde::Deserialize)]
struct ExpenseRow {
    #[serde(rename = "Category")]
    label: String,
    #[serde(rename = "MonthlyAmount")]
    monthly_amount: String,
    #[serde(rename = "Color", default)]
    color: String,
}

impl ExpenseRow {
    fn to_expense(self) -> ExpenseCategory {
        ExpenseCategory {
            label: self.label,
            monthly_amount: super::parse_currency(&self.monthly_amount),
            color: self.color,
        }
    }
}

/// Load expense categories from a CSV export
pub fn load_expenses<P: AsRef<Path>>(path: P) -> Result<Vec<ExpenseCategory>> {
    load_expenses_from_reader(File::open(path)?)
}

/// Load expense categories from any reader
pub fn load_expenses_from_reader<R: Read>(reader: R) -> Result<Vec<ExpenseCategory>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut expenses = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ExpenseRow = result?;
        expenses.push(row.to_expense());
    }

    Ok(expenses)
}

/// Raw CSV row for an account export
#[derive(Debug, serde::Deserialize)]
struct AccountRow {
    #[serde(rename = "Type")]
    account_type: String,
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Balance")]
    balance: String,
    #[serde(rename = "AnnualContribution")]
    annual_contribution: String,
    #[serde(rename = "MaxContribution")]
    max_contribution: String,
    #[serde(rename = "EmployerMatch", default)]
    employer_match: String,
}

impl AccountRow {
    fn to_account(self) -> Result<TaxAdvantagedAccount> {
        let account_type = AccountType::from_label(&self.account_type)?;
        let employer_match = if self.employer_match.trim().is_empty() {
            None
        } else {
            Some(super::parse_currency(&self.employer_match))
        };

        if self.label.trim().is_empty() {
            return Err(PlanningError::invalid("label", "account label is empty"));
        }

        Ok(TaxAdvantagedAccount {
            account_type,
            label: self.label,
            current_balance: super::parse_currency(&self.balance),
            annual_contribution: super::parse_currency(&self.annual_contribution),
            max_contribution: super::parse_currency(&self.max_contribution),
            employer_match,
        })
    }
}

/// Load tax-advantaged accounts from a CSV export
pub fn load_accounts<P: AsRef<Path>>(path: P) -> Result<Vec<TaxAdvantagedAccount>> {
    load_accounts_from_reader(File::open(path)?)
}

/// Load tax-advantaged accounts from any reader
pub fn load_accounts_from_reader<R: Read>(reader: R) -> Result<Vec<TaxAdvantagedAccount>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut accounts = Vec::new();

    for result in csv_reader.deserialize() {
        let row: AccountRow = result?;
        accounts.push(row.to_account()?);
    }

    Ok(accounts)
}
