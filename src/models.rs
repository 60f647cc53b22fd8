use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Deserialize)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub role_id: u8,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub email: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
