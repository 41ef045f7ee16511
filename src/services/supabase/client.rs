use std::{fmt, time::Duration};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use super::error::{SupabaseError, SupabaseResult};
use super::types::{AuthUser, Credentials, Game, GameFields, Session, User, UserFields};

const GAMES: &str = "games";
const USERS: &str = "users";

/// Thin reqwest wrapper around one Supabase project.
///
/// - Cheap to clone (reqwest::Client is an Arc inside)
/// - REST calls authenticate with the anon key; admin calls with the service-role key
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: Url,
    anon_key: String,
    service_role_key: Option<String>,
    http: reqwest::Client,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url.as_str())
            .field("service_role_key_set", &self.service_role_key.is_some())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(
        base_url: Url,
        anon_key: impl Into<String>,
        service_role_key: Option<String>,
        timeout: Duration,
    ) -> SupabaseResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
            service_role_key,
            http,
        })
    }

    // ---- games -------------------------------------------------------------

    pub async fn list_games(&self) -> SupabaseResult<Vec<Game>> {
        let req = self.rest(Method::GET, GAMES, None)?;
        self.send_json(req).await
    }

    pub async fn get_game(&self, id: &str) -> SupabaseResult<Game> {
        let req = self.rest(Method::GET, GAMES, Some(id))?;
        first_row(self.send_json(req).await?, "game")
    }

    pub async fn create_game(&self, fields: &GameFields) -> SupabaseResult<Game> {
        let req = self
            .rest(Method::POST, GAMES, None)?
            .header("Prefer", "return=representation")
            .json(fields);

        let rows: Vec<Game> = self.send_json(req).await?;
        rows.into_iter().next().ok_or(SupabaseError::EmptyResponse)
    }

    pub async fn update_game(&self, id: &str, fields: &GameFields) -> SupabaseResult<Game> {
        let req = self
            .rest(Method::PATCH, GAMES, Some(id))?
            .header("Prefer", "return=representation")
            .json(fields);

        first_row(self.send_json(req).await?, "game")
    }

    pub async fn delete_game(&self, id: &str) -> SupabaseResult<()> {
        let req = self
            .rest(Method::DELETE, GAMES, Some(id))?
            .header("Prefer", "return=representation");

        let deleted: Vec<Value> = self.send_json(req).await?;
        if deleted.is_empty() {
            return Err(SupabaseError::NotFound { resource: "game" });
        }
        Ok(())
    }

    // ---- public.users -----------------------------------------------------

    pub async fn get_user(&self, id: &str) -> SupabaseResult<User> {
        let req = self.rest(Method::GET, USERS, Some(id))?;
        first_row(self.send_json(req).await?, "user")
    }

    pub async fn update_user(&self, id: &str, fields: &UserFields) -> SupabaseResult<User> {
        let req = self
            .rest(Method::PATCH, USERS, Some(id))?
            .header("Prefer", "return=representation")
            .json(fields);

        first_row(self.send_json(req).await?, "user")
    }

    pub async fn delete_user_row(&self, id: &str) -> SupabaseResult<()> {
        let req = self.rest(Method::DELETE, USERS, Some(id))?;
        self.send(req).await.map(|_| ())
    }

    // ---- auth -------------------------------------------------------------

    pub async fn sign_up(&self, email: &str, password: &str) -> SupabaseResult<AuthUser> {
        let req = self
            .auth(Method::POST, &["signup"])?
            .json(&Credentials { email, password });

        // With email confirmation on, Supabase returns the user at top level;
        // with auto-confirm it is wrapped as `{ "user": {...}, "session": {...} }`.
        let body: Value = self.send_json(req).await?;
        let user = match body {
            Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
                map.remove("user").unwrap_or(Value::Null)
            }
            other => other,
        };
        Ok(serde_json::from_value(user)?)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> SupabaseResult<Session> {
        let req = self
            .auth(Method::POST, &["token"])?
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password });

        match self.send_json(req).await {
            Err(SupabaseError::Status { status, .. })
                if StatusCode::from_u16(status).is_ok_and(|s| s.is_client_error()) =>
            {
                Err(SupabaseError::InvalidCredentials)
            }
            other => other,
        }
    }

    pub async fn admin_update_user_email(&self, id: &str, email: &str) -> SupabaseResult<()> {
        let req = self
            .admin(Method::PUT, &["admin", "users", id])?
            .json(&json!({ "email": email }));
        self.send(req).await.map(|_| ())
    }

    pub async fn admin_delete_user(&self, id: &str) -> SupabaseResult<()> {
        let req = self.admin(Method::DELETE, &["admin", "users", id])?;
        self.send(req).await.map(|_| ())
    }

    /// Fails with `ServiceRoleMissing` when no service-role key is configured.
    ///
    /// Handlers that pair a REST write with an admin call check this first so
    /// the write never goes out alone.
    pub fn require_admin(&self) -> SupabaseResult<&str> {
        self.service_role_key
            .as_deref()
            .ok_or(SupabaseError::ServiceRoleMissing)
    }

    // ---- plumbing ---------------------------------------------------------

    fn endpoint(&self, segments: &[&str]) -> SupabaseResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn rest(
        &self,
        method: Method,
        table: &str,
        id: Option<&str>,
    ) -> SupabaseResult<RequestBuilder> {
        let mut url = self.endpoint(&["rest", "v1", table])?;
        if let Some(id) = id {
            url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        }

        Ok(self.keyed(method, url, &self.anon_key))
    }

    fn auth(&self, method: Method, path: &[&str]) -> SupabaseResult<RequestBuilder> {
        let mut segments = vec!["auth", "v1"];
        segments.extend_from_slice(path);
        let url = self.endpoint(&segments)?;

        Ok(self.http.request(method, url).header("apikey", &self.anon_key))
    }

    fn admin(&self, method: Method, path: &[&str]) -> SupabaseResult<RequestBuilder> {
        let key = self.require_admin()?;

        let mut segments = vec!["auth", "v1"];
        segments.extend_from_slice(path);
        let url = self.endpoint(&segments)?;

        Ok(self.keyed(method, url, key))
    }

    fn keyed(&self, method: Method, url: Url, key: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key)
    }

    async fn send(&self, req: RequestBuilder) -> SupabaseResult<String> {
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().path().to_string();
        let body = res.text().await?;

        tracing::debug!(%status, path = %url, "supabase response");

        if !status.is_success() {
            return Err(SupabaseError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> SupabaseResult<T> {
        let body = self.send(req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn first_row<T>(rows: Vec<T>, resource: &'static str) -> SupabaseResult<T> {
    rows.into_iter()
        .next()
        .ok_or(SupabaseError::NotFound { resource })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer, service_role: Option<&str>) -> SupabaseClient {
        SupabaseClient::new(
            Url::parse(&server.uri()).unwrap(),
            "anon",
            service_role.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_games_sends_anon_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/games"))
            .and(header("apikey", "anon"))
            .and(header("authorization", "Bearer anon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Chess", "difficulty_level": 3},
                {"id": 2, "title": "Go"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let games = client(&server, None).await.list_games().await.unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].title, "Chess");
        assert_eq!(games[1].id, "2");
    }

    #[tokio::test]
    async fn get_game_filters_by_id_and_maps_empty_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/games"))
            .and(query_param("id", "eq.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "title": "Chess"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/games"))
            .and(query_param("id", "eq.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client(&server, None).await;

        assert_eq!(client.get_game("7").await.unwrap().title, "Chess");
        assert!(matches!(
            client.get_game("8").await,
            Err(SupabaseError::NotFound { resource: "game" })
        ));
    }

    #[tokio::test]
    async fn id_filter_is_query_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/games"))
            .and(query_param("id", "eq.1&select=*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server, None).await.get_game("1&select=*").await;
        assert!(matches!(result, Err(SupabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn create_game_asks_for_representation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/games"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!({"title": "Chess", "difficulty_level": 2})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"id": "g1", "title": "Chess", "difficulty_level": 2}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let fields = GameFields {
            title: Some("Chess".into()),
            difficulty: Some(2),
            ..Default::default()
        };
        let game = client(&server, None)
            .await
            .create_game(&fields)
            .await
            .unwrap();

        assert_eq!(game.id, "g1");
    }

    #[tokio::test]
    async fn create_game_with_empty_representation_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/games"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = client(&server, None)
            .await
            .create_game(&GameFields::default())
            .await;
        assert!(matches!(result, Err(SupabaseError::EmptyResponse)));
    }

    #[tokio::test]
    async fn delete_game_without_rows_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/games"))
            .and(query_param("id", "eq.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = client(&server, None).await.delete_game("9").await;
        assert!(matches!(result, Err(SupabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn upstream_failure_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/games"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        match client(&server, None).await.list_games().await {
            Err(SupabaseError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_up_unwraps_user_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(header("apikey", "anon"))
            .and(body_json(json!({"email": "a@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": "u1", "email": "a@example.com"},
                "session": null
            })))
            .mount(&server)
            .await;

        let user = client(&server, None)
            .await
            .sign_up("a@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn sign_up_accepts_top_level_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "u2", "email": "b@example.com"})),
            )
            .mount(&server)
            .await;

        let user = client(&server, None)
            .await
            .sign_up("b@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(user.id, "u2");
    }

    #[tokio::test]
    async fn password_grant_maps_client_errors_to_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let result = client(&server, None)
            .await
            .sign_in_with_password("a@example.com", "wrong")
            .await;
        assert!(matches!(result, Err(SupabaseError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn password_grant_returns_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "token_type": "bearer"
            })))
            .mount(&server)
            .await;

        let session = client(&server, None)
            .await
            .sign_in_with_password("a@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(session.access_token, "at");
        assert_eq!(session.refresh_token, "rt");
    }

    #[tokio::test]
    async fn admin_calls_require_service_role_key() {
        let server = MockServer::start().await;

        let result = client(&server, None).await.admin_delete_user("u1").await;
        assert!(matches!(result, Err(SupabaseError::ServiceRoleMissing)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_calls_use_service_role_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/v1/admin/users/u1"))
            .and(header("apikey", "service"))
            .and(header("authorization", "Bearer service"))
            .and(body_json(json!({"email": "new@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("service"))
            .await
            .admin_update_user_email("u1", "new@example.com")
            .await
            .unwrap();
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = SupabaseClient::new(
            Url::parse("http://localhost:54321/proxy").unwrap(),
            "anon",
            None,
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            client.endpoint(&["rest", "v1", "games"]).unwrap().as_str(),
            "http://localhost:54321/proxy/rest/v1/games"
        );
    }

    #[test]
    fn debug_output_hides_keys() {
        let client = SupabaseClient::new(
            Url::parse("http://localhost:54321").unwrap(),
            "anon-secret",
            Some("service-secret".into()),
            Duration::from_secs(1),
        )
        .unwrap();
        let printed = format!("{client:?}");

        assert!(!printed.contains("anon-secret"));
        assert!(!printed.contains("service-secret"));
    }
}
