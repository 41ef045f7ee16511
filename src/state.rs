/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - auth: HMAC access-token verifier, supabase: outbound client
 * - Cloned per request (everything inside is Arc / cheap to clone)
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, supabase::SupabaseClient};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub supabase: SupabaseClient,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, supabase: SupabaseClient) -> Self {
        Self { auth, supabase }
    }

    #[cfg(test)]
    pub fn for_tests(secret: &str, supabase_url: &str) -> Self {
        Self::for_tests_with_service_role(secret, supabase_url, Some("service"))
    }

    #[cfg(test)]
    pub fn for_tests_with_service_role(
        secret: &str,
        supabase_url: &str,
        service_role_key: Option<&str>,
    ) -> Self {
        let supabase = SupabaseClient::new(
            url::Url::parse(supabase_url).expect("test supabase url"),
            "anon",
            service_role_key.map(str::to_string),
            std::time::Duration::from_secs(5),
        )
        .expect("test supabase client");

        Self::new(Arc::new(AuthService::new(secret, None)), supabase)
    }
}
