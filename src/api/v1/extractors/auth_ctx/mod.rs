/*!
 * 認証コンテキスト extractor
 *
 * 責務:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - axum 依存のコードは core、型そのものは types に置く
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
