//! Tenant check, user lookup, token issue and personnel profile.

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceId;
use crate::client::ApiClient;
use crate::response::ApiResponse;

/// Company a username belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserCheck {
    #[serde(rename = "id_empresa")]
    pub company_id: ChoiceId,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "empresa")]
    pub company_id: ChoiceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenReply {
    pub access: String,
}

/// Person record linked to the authenticated user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonnelProfile {
    pub id: ChoiceId,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Succeeds when the bound domain names an existing tenant.
pub async fn check_domain(client: &ApiClient) -> ApiResponse<()> {
    client
        .get::<serde_json::Value>("/dominio/", &[])
        .await
        .map(|_| ())
}

pub async fn check_username(client: &ApiClient, username: &str) -> ApiResponse<UserCheck> {
    client
        .get("/usuario/check/", &[("username", username.to_string())])
        .await
}

pub async fn obtain_token(client: &ApiClient, request: &TokenRequest<'_>) -> ApiResponse<TokenReply> {
    client.post("/token/", request).await
}

/// Needs the bearer token to be set.
pub async fn current_personnel(client: &ApiClient) -> ApiResponse<PersonnelProfile> {
    client.get("/personal/me/", &[]).await
}
