//! Container networking policy endpoints.

use url::Url;

use super::{endpoint_url, send};
use crate::connection::{Connection, Request};
use crate::error::Result;
use crate::models::{Policy, PolicyList};

const POLICIES_PATH: &[&str] = &["networking", "v1", "external", "policies"];

/// `GET /networking/v1/external/policies`, filtered to `app_guids` when given.
pub async fn list_policies(
    connection: &dyn Connection,
    networking_url: &Url,
    app_guids: &[String],
) -> Result<Vec<Policy>> {
    let mut url = endpoint_url(networking_url, POLICIES_PATH)?;
    if !app_guids.is_empty() {
        url.query_pairs_mut().append_pair("id", &app_guids.join(","));
    }

    let list: PolicyList = send(connection, Request::get(url).decode_json()).await?.json()?;
    Ok(list.policies)
}

/// `POST /networking/v1/external/policies`.
pub async fn create_policies(
    connection: &dyn Connection,
    networking_url: &Url,
    policies: Vec<Policy>,
) -> Result<()> {
    let url = endpoint_url(networking_url, POLICIES_PATH)?;
    let request = Request::post(url).json_body(&PolicyList { policies })?;
    send(connection, request).await?;
    Ok(())
}

/// `POST /networking/v1/external/policies/delete`.
///
/// Deleting the same policies twice has the same effect as once.
pub async fn remove_policies(
    connection: &dyn Connection,
    networking_url: &Url,
    policies: Vec<Policy>,
) -> Result<()> {
    let mut segments = POLICIES_PATH.to_vec();
    segments.push("delete");
    let url = endpoint_url(networking_url, &segments)?;
    let request = Request::post(url)
        .json_body(&PolicyList { policies })?
        .idempotent(true);
    send(connection, request).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ports;
    use crate::testing::FakeConnection;

    fn networking_url() -> Url {
        Url::parse("https://api.example.com").unwrap()
    }

    fn policy() -> Policy {
        Policy::new("appA", "appB", "tcp", Ports { start: 8080, end: 8090 })
    }

    #[tokio::test]
    async fn test_list_policies_filters_by_id() {
        let fake = FakeConnection::new();
        fake.push_json(200, serde_json::json!({"total_policies": 1, "policies": [policy()]}));

        let policies = list_policies(&fake, &networking_url(), &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(policies, vec![policy()]);
        assert_eq!(fake.attempts()[0].url.query(), Some("id=a%2Cb"));
    }

    #[tokio::test]
    async fn test_remove_policies_posts_to_delete() {
        let fake = FakeConnection::new();
        fake.push_response(200, Default::default(), Vec::new());

        remove_policies(&fake, &networking_url(), vec![policy()]).await.unwrap();

        let attempt = &fake.attempts()[0];
        assert_eq!(attempt.url.path(), "/networking/v1/external/policies/delete");
        let body: PolicyList = serde_json::from_slice(attempt.body.as_deref().unwrap()).unwrap();
        assert_eq!(body.policies, vec![policy()]);
    }

    #[tokio::test]
    async fn test_create_policies_is_not_marked_idempotent() {
        let fake = FakeConnection::new();
        fake.push_response(200, Default::default(), Vec::new());

        create_policies(&fake, &networking_url(), vec![policy()]).await.unwrap();
        assert_eq!(fake.attempts()[0].method, reqwest::Method::POST);
    }
}
