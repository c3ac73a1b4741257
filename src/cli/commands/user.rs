use anyhow::Result;

use crate::api::SignupRequest;
use crate::api::validation::validate_signup;
use crate::config::Config;
use crate::services::UserError;
use crate::state::SharedState;

/// Same checks as `POST /api/users`, minus the HTTP round trip.
pub async fn cmd_create_user(config: Config, request: SignupRequest) -> Result<()> {
    let new_user = match validate_signup(request) {
        Ok(new_user) => new_user,
        Err(errors) => {
            println!("User not created: {errors}");
            return Ok(());
        }
    };

    let shared = SharedState::new(config).await?;

    match shared.user_service.signup(new_user).await {
        Ok(user) => {
            println!(
                "Created user {} <{}> (id {})",
                user.username, user.email, user.id
            );
            Ok(())
        }
        Err(UserError::Validation(errors)) => {
            println!("User not created: {errors}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
