//! ValidateEmailHandler - Command handler confirming a user's email.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::internal;
use crate::application::UnitOfWork;
use crate::domain::foundation::{AuthError, ErrorDetail, Outcome};
use crate::domain::user::{UserError, UserId};
use crate::ports::{TokenService, TransactionFactory};

/// Command carrying the token from a validation link.
#[derive(Debug, Clone)]
pub struct ValidateEmailCommand {
    pub token: String,
}

/// Handler for validating emails.
///
/// Validating an already-validated email succeeds without a write.
pub struct ValidateEmailHandler {
    transactions: Arc<dyn TransactionFactory>,
    tokens: Arc<dyn TokenService>,
}

impl ValidateEmailHandler {
    pub fn new(transactions: Arc<dyn TransactionFactory>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            transactions,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: ValidateEmailCommand) -> Outcome<UserId> {
        let claims = self.tokens.verify(&cmd.token).map_err(rejected_token)?;
        let user_id = UserId::from_uuid(claims.user_id);

        let mut uow = UnitOfWork::new(self.transactions.clone());
        uow.start_transaction().await.map_err(internal)?;

        match Self::apply(&mut uow, &user_id).await {
            Ok(changed) => {
                if changed {
                    info!(user_id = %user_id, "Email validated");
                } else {
                    debug!(user_id = %user_id, "Email was already validated");
                }
                Ok(user_id)
            }
            Err(detail) => {
                if let Err(e) = uow.rollback().await {
                    warn!(error = %e, "Rollback after failed email validation also failed");
                }
                Err(detail)
            }
        }
    }

    async fn apply(uow: &mut UnitOfWork, user_id: &UserId) -> Outcome<bool> {
        let mut user = uow
            .users()
            .get_by_id(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| ErrorDetail::from(UserError::NotFound))?;

        let changed = user.validate_email();
        if changed {
            uow.users().update(&user).await.map_err(internal)?;
        }
        uow.commit().await.map_err(internal)?;
        Ok(changed)
    }
}

fn rejected_token(err: AuthError) -> ErrorDetail {
    if err.requires_reauthentication() {
        debug!(error = %err, "Rejected validation token");
        return UserError::InvalidToken.into();
    }
    ErrorDetail::internal(format!("Token verification failed: {}", err))
}
