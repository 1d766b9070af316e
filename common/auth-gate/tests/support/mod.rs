use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

#[derive(Serialize)]
pub struct TestClaims {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl TestClaims {
    pub fn expiring_in(lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: "u1".to_string(),
            email: "e@x.com".to_string(),
            roles: Vec::new(),
            admin: false,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|role| role.to_string()).collect();
        self
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn sign(&self, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign token")
    }
}
