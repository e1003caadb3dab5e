//! UAA token and user endpoints.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use cf_config::UaaClientConfig;

use super::{endpoint_url, send};
use crate::connection::Connection;
use crate::connection::Request;
use crate::error::Result;
use crate::models::{NewUser, TokenResponse, UaaUser, UserList};
use crate::token::TokenPair;

fn token_request(
    uaa_url: &Url,
    client: &UaaClientConfig,
    form: &[(&str, &str)],
) -> Result<Request> {
    let url = endpoint_url(uaa_url, &["oauth", "token"])?;
    let client_secret = client.client_secret.expose_secret();

    let mut pairs: Vec<(&str, &str)> = form.to_vec();
    pairs.push(("client_id", client.client_id.as_str()));
    pairs.push(("client_secret", client_secret));

    Ok(Request::post(url)
        .form_body(&pairs)
        .basic_auth(client.client_id.clone(), client.client_secret.clone())
        .decode_json())
}

/// `grant_type=password`: log in with a username and password.
pub async fn password_grant(
    connection: &dyn Connection,
    uaa_url: &Url,
    client: &UaaClientConfig,
    username: &str,
    password: &SecretString,
) -> Result<TokenPair> {
    let request = token_request(
        uaa_url,
        client,
        &[
            ("grant_type", "password"),
            ("username", username),
            ("password", password.expose_secret()),
        ],
    )?;
    let response = send(connection, request).await?;
    Ok(response.json::<TokenResponse>()?.into())
}

/// `grant_type=refresh_token`: exchange a refresh token for a new token pair.
pub async fn refresh_token_grant(
    connection: &dyn Connection,
    uaa_url: &Url,
    client: &UaaClientConfig,
    refresh_token: &SecretString,
) -> Result<TokenPair> {
    let request = token_request(
        uaa_url,
        client,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
        ],
    )?;
    let response = send(connection, request).await?;
    Ok(response.json::<TokenResponse>()?.into())
}

/// `POST /Users`.
pub async fn create_user(
    connection: &dyn Connection,
    uaa_url: &Url,
    username: &str,
    password: Option<&SecretString>,
    origin: &str,
) -> Result<UaaUser> {
    let url = endpoint_url(uaa_url, &["Users"])?;
    let body = NewUser::new(username, password.map(|p| p.expose_secret()), origin);
    let request = Request::post(url).json_body(&body)?.decode_json();
    send(connection, request).await?.json()
}

/// `GET /Users?filter=userName eq "<username>"`, optionally restricted to one origin.
pub async fn list_users(
    connection: &dyn Connection,
    uaa_url: &Url,
    username: &str,
    origin: Option<&str>,
) -> Result<Vec<UaaUser>> {
    let mut filter = format!("userName eq {}", scim_quote(username));
    if let Some(origin) = origin {
        filter.push_str(&format!(" and origin eq {}", scim_quote(origin)));
    }

    let mut url = endpoint_url(uaa_url, &["Users"])?;
    url.query_pairs_mut().append_pair("filter", &filter);

    let list: UserList = send(connection, Request::get(url).decode_json()).await?.json()?;
    Ok(list.resources)
}

/// Quote a SCIM filter string literal.
fn scim_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
