/*
 * Responsibility
 * - handler から見た認証済みリクエストのコンテキスト
 * - authorization middleware が 1 リクエストにつき最大 1 回 extensions に入れる。
 *   無ければ匿名リクエスト
 *
 * Notes
 * - token の decode と identity の lookup は middleware / services の責務
 * - ownership の判定は `user_name` を比較する (services::auth::policy 参照)
 */
use uuid::Uuid;

use crate::services::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub user_name: String,
    pub role: Role,
    /// `ROLE_<NAME>` strings, for clients that expect authority lists
    pub authorities: Vec<String>,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, user_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            role,
            authorities: vec![role.authority()],
        }
    }

    pub fn roles(&self) -> &[Role] {
        std::slice::from_ref(&self.role)
    }
}
