use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::utils;

/// Login gagal per alamat IP. Setelah ambang ini login wajib
/// menyertakan token CAPTCHA yang valid.
pub const CAPTCHA_THRESHOLD: u32 = 3;

const MIN_SCORE: f64 = 0.5;

#[derive(Default)]
pub struct LoginAttempts {
    counts: Mutex<HashMap<String, u32>>,
}

impl LoginAttempts {
    pub fn count(&self, ip: &str) -> u32 {
        self.counts
            .lock()
            .map(|map| map.get(ip).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn record_failure(&self, ip: &str) -> u32 {
        match self.counts.lock() {
            Ok(mut map) => {
                let entry = map.entry(ip.to_string()).or_insert(0);
                *entry += 1;
                *entry
            }
            Err(_) => 0,
        }
    }

    pub fn reset(&self, ip: &str) {
        if let Ok(mut map) = self.counts.lock() {
            map.remove(ip);
        }
    }

    pub fn requires_captcha(&self, ip: &str) -> bool {
        self.count(ip) >= CAPTCHA_THRESHOLD
    }
}

#[derive(Debug, Deserialize)]
pub struct CaptchaPayload {
    pub token: String,
}

/// Nilai token lewat reCAPTCHA Enterprise assessment. Valid bila token
/// sah dan skor risikonya di atas ambang.
pub async fn assess_token(token: &str) -> Result<bool, String> {
    let api_key = std::env::var("RECAPTCHA_SECRET")
        .map_err(|_| "RECAPTCHA_SECRET tidak diset".to_string())?;
    let site_key = std::env::var("RECAPTCHA_SITE_KEY")
        .map_err(|_| "RECAPTCHA_SITE_KEY tidak diset".to_string())?;
    let project_id = std::env::var("RECAPTCHA_PROJECT_ID")
        .map_err(|_| "RECAPTCHA_PROJECT_ID tidak diset".to_string())?;

    let url = format!(
        "https://recaptchaenterprise.googleapis.com/v1/projects/{}/assessments?key={}",
        project_id, api_key
    );
    let body = json!({
        "event": {
            "token": token,
            "expectedAction": "LOGIN",
            "siteKey": site_key,
        }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("Gagal menghubungi layanan CAPTCHA: {}", e))?;
    let assessment: Value = response
        .json()
        .await
        .map_err(|e| format!("Respons CAPTCHA tidak valid: {}", e))?;

    let valid = assessment
        .pointer("/tokenProperties/valid")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let score = assessment
        .pointer("/riskAnalysis/score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Ok(valid && score > MIN_SCORE)
}

#[post("/api/validate-captcha")]
pub async fn validate_captcha(
    req: HttpRequest,
    attempts: web::Data<LoginAttempts>,
    payload: web::Json<CaptchaPayload>,
) -> HttpResponse {
    if payload.token.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Token CAPTCHA wajib diisi",
        }));
    }

    match assess_token(&payload.token).await {
        Ok(true) => {
            let ip = client_ip(&req);
            attempts.reset(&ip);
            HttpResponse::Ok().json(json!({ "success": true }))
        }
        Ok(false) => HttpResponse::Ok().json(json!({ "success": false })),
        Err(e) => {
            log::error!("[API CAPTCHA ERROR] {}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": e,
            }))
        }
    }
}

pub fn client_ip(req: &HttpRequest) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !forwarded.is_empty() {
        return utils::format_ip(forwarded);
    }
    let peer = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();
    utils::format_ip(&peer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_escalate_then_reset() {
        let attempts = LoginAttempts::default();
        assert!(!attempts.requires_captcha("10.0.0.1"));

        for _ in 0..CAPTCHA_THRESHOLD {
            attempts.record_failure("10.0.0.1");
        }
        assert!(attempts.requires_captcha("10.0.0.1"));
        assert!(!attempts.requires_captcha("10.0.0.2"));

        attempts.reset("10.0.0.1");
        assert_eq!(attempts.count("10.0.0.1"), 0);
    }
}
