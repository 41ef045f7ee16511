/*
 * Responsibility
 * - Public interface of the middleware layer
 * - http::apply / cors::apply at the app level, auth::access::apply on secured routes
 */
pub mod auth;
pub mod cors;
pub mod http;
