//! Team membership operations.

use serde_json::json;
use tracing::debug;

use fabops_core::Result;

use crate::client::GraphqlClient;
use crate::lookup;
use crate::queries;

/// Resolve a team by name and a user by email, then add the user to the team.
pub async fn add_user_to_team(
    client: &GraphqlClient,
    team_name: &str,
    user_email: &str,
) -> Result<()> {
    let team_id = lookup::team_id_by_name(client, team_name).await?;
    let user_id = lookup::user_id_by_email(client, user_email).await?;
    debug!(%team_id, %user_id, "adding user to team");

    let variables = json!({"input": {
        "teamId": team_id.to_value(),
        "userId": user_id.to_value(),
    }});
    client.execute(queries::ADD_USER_TO_TEAM, variables).await?;
    Ok(())
}
