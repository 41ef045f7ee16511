/*
 * Responsibility
 * - Process-level services built once at startup and shared through AppState
 */
pub mod auth;
pub mod supabase;
