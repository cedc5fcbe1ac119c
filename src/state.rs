/*
 * Responsibility
 * - Router に束ねる共有コンテキスト (AppState)
 * - Clone は安い: 中身はすべて Arc か安価な Clone
 */
use std::sync::Arc;

use crate::repos::store::{OrderRepo, UserRepo};
use crate::services::auth::{Authenticator, PasswordService, TokenCodec};
use crate::services::id_codec::IdCodec;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub orders: Arc<dyn OrderRepo>,
    pub passwords: Arc<PasswordService>,
    pub auth: Arc<Authenticator>,
    pub id_codec: IdCodec,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepo>,
        orders: Arc<dyn OrderRepo>,
        passwords: Arc<PasswordService>,
        tokens: Arc<TokenCodec>,
        id_codec: IdCodec,
    ) -> Self {
        let auth = Arc::new(Authenticator::new(
            users.clone(),
            passwords.clone(),
            tokens,
        ));

        Self {
            users,
            orders,
            passwords,
            auth,
            id_codec,
        }
    }
}
