use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Key of an account held by the ledger, assigned in opening order from 1.
pub type AccountId = i32;

/// A request to move `value` from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: Uuid,
    created_at: DateTime<Utc>,
    source: AccountId,
    target: AccountId,
    value: Decimal,
}

impl Transaction {
    pub fn new(
        id: Uuid,
        created_at: DateTime<Utc>,
        source: AccountId,
        target: AccountId,
        value: Decimal,
    ) -> Self {
        Self {
            id,
            created_at,
            source,
            target,
            value,
        }
    }

    /// A fresh transaction stamped with a random id and the current time.
    pub fn transfer(source: AccountId, target: AccountId, value: Decimal) -> Self {
        Self::new(Uuid::new_v4(), Utc::now(), source, target, value)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source(&self) -> AccountId {
        self.source
    }

    pub fn target(&self) -> AccountId {
        self.target
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}
