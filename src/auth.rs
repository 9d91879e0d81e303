use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub user_id: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub fn generate_jwt(user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();
    let claims = Claims {
        sub: user.username.clone(),
        role: user.role.clone(),
        user_id: user.id.clone(),
        exp: (now + chrono::Duration::days(2)).timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_jwt(req: &HttpRequest) -> Result<Claims, actix_web::Error> {
    let token = req
        .cookie("access_token")
        .ok_or_else(|| {
            log::error!("No access_token cookie found in request to {}", req.path());
            actix_web::error::ErrorUnauthorized("Token tidak ditemukan")
        })?
        .value()
        .to_string();

    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        log::error!("JWT verification failed: {:?}", e);
        actix_web::error::ErrorUnauthorized(format!("Invalid or expired token: {}", e))
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn jwt_roundtrip_keeps_identity_and_role() {
        std::env::set_var("JWT_SECRET", "rahasia-test");

        let user = User {
            id: "u-1".into(),
            username: "budi".into(),
            password: "$2b$12$abcdefghijklmnopqrstuv".into(),
            role: "admin".into(),
            is_active: true,
            created_at: Utc::now(),
        };

        let token = generate_jwt(&user).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"rahasia-test"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "budi");
        assert_eq!(data.claims.user_id, "u-1");
        assert!(data.claims.is_admin());
    }
}
