//! Authenticated session value object.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::account::{Account, AccountId};

/// The current authenticated identity.
///
/// A projection of the [`Account`] safe to hand to clients: it never carries
/// the credential hash. Created at successful login or registration and
/// destroyed at logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Owning account identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub account_id: AccountId,
    /// Login email.
    #[schema(example = "demo@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Demo")]
    pub name: String,
}

impl Session {
    /// Project an account into its session shape.
    pub fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.id(),
            email: account.email().as_ref().to_owned(),
            name: account.name().as_ref().to_owned(),
        }
    }

    /// The account id as a plain UUID, for adapters.
    pub const fn account_uuid(&self) -> &Uuid {
        self.account_id.as_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountName, Email};
    use crate::domain::password::PasswordHash;
    use chrono::Utc;

    #[test]
    fn projection_drops_the_credential() {
        let account = Account::new(
            AccountId::random(),
            Email::new("demo@example.com").expect("valid email"),
            AccountName::new("Demo").expect("valid name"),
            PasswordHash::from_phc_string("$argon2id$stub"),
            Utc::now(),
        );
        let session = Session::for_account(&account);
        assert_eq!(session.email, "demo@example.com");
        assert_eq!(session.name, "Demo");
        let json = serde_json::to_string(&session).expect("serialise session");
        assert!(!json.contains("argon2id"));
    }
}
