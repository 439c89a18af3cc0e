//! Household profile data structures and loaders

mod data;
pub mod loader;

pub use data::{
    parse_currency, AccountType, ClientProfile, ExpenseCategory, Holdings, RetirementProfile,
    RiskProfile, TaxAdvantagedAccount,
};
pub use loader::{
    load_accounts, load_expenses, load_life_events, load_profile, load_profile_from_reader, load_profiles,
};
