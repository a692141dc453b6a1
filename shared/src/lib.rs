pub mod email;
pub mod invites;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_sesv2::Client as SesClient;

/// Shared AWS clients, built once per Lambda runtime and handed to handlers.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub ses_client: SesClient,
}

impl AppState {
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            dynamo_client: DynamoClient::new(&config),
            ses_client: SesClient::new(&config),
        }
    }
}
