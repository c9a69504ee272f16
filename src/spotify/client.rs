use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::Endpoints,
    error::{AuthError, ClientError},
    spotify::{
        auth::{AuthorizationCodeProvider, ClientCredentialsProvider, TokenProvider},
        browse::{self, BrowseArgs},
        http::{HttpExecutor, HttpRequest, ReqwestExecutor},
        request::{self, RequestArgs},
        resources::Resource,
        search::{self, SearchArgs},
    },
    types::{ApiErrorEnvelope, ApiResponse, Credentials, Method, RequestDescriptor, Token},
};

/// Catalog client: validates a request, makes sure a token is available and
/// dispatches through the executor.
///
/// Responses come back verbatim, whatever their status. Use
/// [`ApiResponse::error_for_status`] to turn API failures into errors.
pub struct ApiClient<E: HttpExecutor = ReqwestExecutor> {
    provider: Box<dyn TokenProvider>,
    executor: Arc<E>,
    api_url: String,
}

impl ApiClient<ReqwestExecutor> {
    /// Picks the authorization-code grant when the credentials carry a code or
    /// a refresh token, the client-credentials grant otherwise.
    pub fn from_credentials(credentials: Credentials, endpoints: &Endpoints) -> Self {
        let executor = Arc::new(ReqwestExecutor::new());
        if credentials.has_user_grant() {
            Self::authorization_code(credentials, endpoints, executor)
        } else {
            Self::client_credentials(credentials, endpoints, executor)
        }
    }
}

impl<E: HttpExecutor + 'static> ApiClient<E> {
    pub fn client_credentials(credentials: Credentials, endpoints: &Endpoints, executor: Arc<E>) -> Self {
        let provider =
            ClientCredentialsProvider::new(credentials, &endpoints.token_url, executor.clone());
        Self::with_provider(Box::new(provider), executor, &endpoints.api_url)
    }

    pub fn authorization_code(credentials: Credentials, endpoints: &Endpoints, executor: Arc<E>) -> Self {
        let provider =
            AuthorizationCodeProvider::new(credentials, &endpoints.token_url, executor.clone());
        Self::with_provider(Box::new(provider), executor, &endpoints.api_url)
    }

    pub fn with_provider(
        provider: Box<dyn TokenProvider>,
        executor: Arc<E>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            executor,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn provider(&self) -> &dyn TokenProvider {
        self.provider.as_ref()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn get(&self, resource: Resource, args: &RequestArgs) -> Result<ApiResponse, ClientError> {
        let descriptor = request::build(Method::Get, resource, args)?;
        self.execute(descriptor).await
    }

    pub async fn post(&self, resource: Resource, args: &RequestArgs) -> Result<ApiResponse, ClientError> {
        let descriptor = request::build(Method::Post, resource, args)?;
        self.execute(descriptor).await
    }

    pub async fn search(&self, args: &SearchArgs) -> Result<ApiResponse, ClientError> {
        let descriptor = search::build(args)?;
        self.execute(descriptor).await
    }

    pub async fn browse(&self, args: &BrowseArgs) -> Result<ApiResponse, ClientError> {
        let descriptor = browse::build(args)?;
        self.execute(descriptor).await
    }

    /// Sends an already validated descriptor.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<ApiResponse, ClientError> {
        let token = self.valid_token().await?;
        let url = descriptor.url(&self.api_url);

        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", token.value()),
        )];
        let body = match &descriptor.body {
            Some(body) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(body.to_string())
            }
            None => None,
        };

        debug!(method = %descriptor.method, url = %url, "dispatching request");
        let response = self
            .executor
            .send(HttpRequest {
                method: descriptor.method,
                url: url.clone(),
                headers,
                body,
            })
            .await?;
        debug!(status = response.status, url = %url, "response received");

        Ok(ApiResponse {
            url,
            status: response.status,
            body: response.body,
        })
    }

    /// Authenticates when no token is held yet, refreshes when it is about
    /// to expire.
    async fn valid_token(&self) -> Result<Token, AuthError> {
        let token = self.provider.current_token();
        if token.is_empty() {
            return self.provider.authenticate().await;
        }
        if self.provider.is_expired() {
            return self.provider.refresh().await;
        }
        Ok(token)
    }

    /// `albums/<id>[/tracks]` or a batch lookup for comma-joined ids.
    pub async fn get_albums(
        &self,
        ids: &str,
        album_obj: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<ApiResponse, ClientError> {
        let args = with_sub_object(RequestArgs::new().id_list(ids), album_obj).page(limit, offset);
        self.get(Resource::Albums, &args).await
    }

    pub async fn get_artists(
        &self,
        ids: &str,
        artist_obj: Option<&str>,
        include_groups: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<ApiResponse, ClientError> {
        let mut args =
            with_sub_object(RequestArgs::new().id_list(ids), artist_obj).page(limit, offset);
        if let Some(groups) = include_groups {
            args = args.param("include_groups", groups);
        }
        self.get(Resource::Artists, &args).await
    }

    pub async fn get_tracks(&self, ids: &str, track_obj: Option<&str>) -> Result<ApiResponse, ClientError> {
        let args = with_sub_object(RequestArgs::new().id_list(ids), track_obj);
        self.get(Resource::Tracks, &args).await
    }

    pub async fn get_episodes(&self, ids: &str) -> Result<ApiResponse, ClientError> {
        self.get(Resource::Episodes, &RequestArgs::new().id_list(ids))
            .await
    }

    pub async fn get_shows(&self, ids: &str, show_obj: &str) -> Result<ApiResponse, ClientError> {
        let args = RequestArgs::new().id_list(ids).sub_object(show_obj);
        self.get(Resource::Shows, &args).await
    }

    /// Own playlists, a user's playlists, or one playlist by id. Combining
    /// more than one of these is rejected.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_playlists(
        &self,
        own: bool,
        user_id: Option<&str>,
        playlist_id: Option<&str>,
        playlist_obj: Option<&str>,
        fields: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<ApiResponse, ClientError> {
        let mut args = RequestArgs::new().own(own).page(limit, offset);
        if let Some(user_id) = user_id {
            args = args.user(user_id);
        }
        if let Some(playlist_id) = playlist_id {
            args = args.id_list(playlist_id);
        }
        if let Some(fields) = fields {
            args = args.param("fields", fields);
        }
        let args = with_sub_object(args, playlist_obj);
        self.get(Resource::Playlists, &args).await
    }

    /// `me` when `own` is set, `users/<user_id>` otherwise.
    pub async fn get_profile(&self, own: bool, user_id: Option<&str>) -> Result<ApiResponse, ClientError> {
        let mut args = RequestArgs::new().own(own);
        if let Some(user_id) = user_id {
            args = args.id_list(user_id);
        }
        self.get(Resource::Profile, &args).await
    }

    pub async fn get_player(&self, player_obj: Option<&str>) -> Result<ApiResponse, ClientError> {
        let args = with_sub_object(RequestArgs::new(), player_obj);
        self.get(Resource::Player, &args).await
    }

    /// `next`, `previous` or `queue` (the latter needs `uri`).
    pub async fn post_player(
        &self,
        action: &str,
        uri: Option<&str>,
        device_id: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let mut args = RequestArgs::new().action(action);
        if let Some(uri) = uri {
            args = args.param("uri", uri);
        }
        if let Some(device_id) = device_id {
            args = args.param("device_id", device_id);
        }
        self.post(Resource::Player, &args).await
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        public: bool,
    ) -> Result<ApiResponse, ClientError> {
        let mut body = json!({ "name": name, "public": public });
        if let Some(description) = description {
            body["description"] = Value::String(description.to_string());
        }

        let args = RequestArgs::new().user(user_id).body(body);
        self.post(Resource::Playlists, &args).await
    }

    pub async fn add_playlist_tracks(
        &self,
        playlist_id: &str,
        uris: &[&str],
        position: Option<u32>,
    ) -> Result<ApiResponse, ClientError> {
        let mut args = RequestArgs::new()
            .id(playlist_id)
            .action("tracks")
            .param("uris", uris.join(","));
        if let Some(position) = position {
            args = args.param("position", position.to_string());
        }
        self.post(Resource::Playlists, &args).await
    }
}

fn with_sub_object(args: RequestArgs, sub_object: Option<&str>) -> RequestArgs {
    match sub_object {
        Some(sub_object) => args.sub_object(sub_object),
        None => args,
    }
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Passes 2xx responses through and turns anything else into
    /// [`ClientError::Api`], reading the `{"error": {...}}` envelope when
    /// present.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            return Ok(self);
        }

        let message = serde_json::from_str::<ApiErrorEnvelope>(&self.body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_default();

        Err(ClientError::Api {
            status: self.status,
            reason: status_reason(self.status),
            message,
            url: self.url,
        })
    }
}

/// Short description of the status codes the Web API documents.
pub fn status_reason(status: u16) -> &'static str {
    match status {
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unexpected Status",
    }
}
