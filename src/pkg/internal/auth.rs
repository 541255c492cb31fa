use sqlx::{prelude::FromRow, PgPool};

use crate::prelude::Result;

/// Authenticated uploader identity. Session issuance lives outside this
/// service; only the token-to-user resolution happens here.
#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub company_id: String,
    pub email: String,
    pub name: String,
}

impl User {
    pub async fn from_session_token(pool: &PgPool, token: &str) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT user_id, company_id, email, name FROM users WHERE session_token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?)
    }
}
