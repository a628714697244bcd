//! # MedLink Billing
//!
//! Placeholder billing-account logic. Accounts are not persisted; every request is
//! answered with a synthesized identifier and the `ACTIVE` status.

use chrono::{DateTime, Utc};

/// Prefix of every synthesized account identifier.
pub const ACCOUNT_ID_PREFIX: &str = "acc-";

/// Lifecycle status of a billing account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied details for a new billing account. Not validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountRequest {
    pub patient_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingAccount {
    pub account_id: String,
    pub status: AccountStatus,
}

/// Builds the account identifier for a request handled at `at`.
///
/// The suffix is the Unix time in milliseconds, so identifiers are only unique
/// per millisecond within one process.
pub fn account_id_at(at: DateTime<Utc>) -> String {
    format!("{ACCOUNT_ID_PREFIX}{}", at.timestamp_millis())
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BillingAccountService;

impl BillingAccountService {
    pub fn new() -> Self {
        Self
    }

    /// Opens a billing account for `request`. Never fails.
    pub fn create_account(&self, request: &AccountRequest) -> BillingAccount {
        self.create_account_at(request, Utc::now())
    }

    pub fn create_account_at(&self, request: &AccountRequest, at: DateTime<Utc>) -> BillingAccount {
        tracing::info!(
            patient_id = %request.patient_id,
            name = %request.name,
            email = %request.email,
            "received billing account creation request"
        );

        BillingAccount {
            account_id: account_id_at(at),
            status: AccountStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn account_id_uses_epoch_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(account_id_at(at), "acc-1700000000123");
    }

    #[test]
    fn accounts_start_active() {
        let account = BillingAccountService::new().create_account(&AccountRequest::default());
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.status.to_string(), "ACTIVE");
        assert!(account.account_id.starts_with(ACCOUNT_ID_PREFIX));
        assert!(account.account_id[ACCOUNT_ID_PREFIX.len()..]
            .parse::<i64>()
            .is_ok());
    }

    #[test]
    fn request_fields_do_not_affect_the_account() {
        let at = Utc.timestamp_millis_opt(42).unwrap();
        let service = BillingAccountService::new();
        let a = service.create_account_at(&AccountRequest::default(), at);
        let b = service.create_account_at(
            &AccountRequest {
                patient_id: "p-1".into(),
                name: "Zed".into(),
                email: "zed@example.com".into(),
            },
            at,
        );
        assert_eq!(a, b);
    }
}
