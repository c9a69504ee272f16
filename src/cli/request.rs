use crate::{
    cli::{client, spinner},
    error,
    error::ClientError,
    spotify::{browse::BrowseArgs, request::RequestArgs, resources::Resource, search::SearchArgs},
    success,
    types::ApiResponse,
};

pub async fn get(resource: &str, args: RequestArgs) {
    let resource: Resource = match resource.parse() {
        Ok(resource) => resource,
        Err(e) => error!("{}", e),
    };

    let client = client();
    let pb = spinner("Fetching from Spotify...");
    let result = client.get(resource, &args).await;
    pb.finish_and_clear();

    report(result);
}

pub async fn search(args: SearchArgs) {
    let client = client();
    let pb = spinner("Searching the catalog...");
    let result = client.search(&args).await;
    pb.finish_and_clear();

    report(result);
}

pub async fn browse(args: BrowseArgs) {
    let client = client();
    let pb = spinner("Browsing the catalog...");
    let result = client.browse(&args).await;
    pb.finish_and_clear();

    report(result);
}

/// Reads player state, or runs `action` (next, previous, queue) when given.
pub async fn player(
    action: Option<String>,
    player_obj: Option<String>,
    uri: Option<String>,
    device_id: Option<String>,
) {
    let client = client();
    let pb = spinner("Talking to the player...");
    let result = match &action {
        Some(action) => {
            client
                .post_player(action, uri.as_deref(), device_id.as_deref())
                .await
        }
        None => client.get_player(player_obj.as_deref()).await,
    };
    pb.finish_and_clear();

    report(result);
}

fn report(result: Result<ApiResponse, ClientError>) {
    let response = match result.and_then(ApiResponse::error_for_status) {
        Ok(response) => response,
        Err(e) => error!("Request failed. Err: {}", e),
    };

    if response.body.trim().is_empty() {
        success!("{} -> {}", response.url, response.status);
        return;
    }

    match response
        .json()
        .and_then(|json| serde_json::to_string_pretty(&json))
    {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", response.body),
    }
}
