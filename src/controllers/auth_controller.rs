use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{post, web, HttpRequest, HttpResponse};
use bcrypt::verify;
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::generate_jwt;
use crate::controllers::captcha_controller::{assess_token, client_ip, LoginAttempts};
use crate::models::user::{LoginPayload, User};

#[post("/api/auth/login")]
pub async fn login(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    attempts: web::Data<LoginAttempts>,
    payload: web::Json<LoginPayload>,
) -> HttpResponse {
    if payload.username.is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Username dan password wajib diisi",
        }));
    }

    let ip = client_ip(&req);

    // Setelah beberapa kali gagal dari IP yang sama, login harus
    // membawa token CAPTCHA yang lolos penilaian.
    if attempts.requires_captcha(&ip) {
        let Some(token) = payload.captcha_token.as_deref().filter(|t| !t.is_empty()) else {
            return HttpResponse::Forbidden().json(json!({
                "code": -1,
                "message": "CAPTCHA diperlukan",
                "captcha_required": true,
            }));
        };
        match assess_token(token).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Forbidden().json(json!({
                    "code": -1,
                    "message": "Verifikasi CAPTCHA gagal",
                    "captcha_required": true,
                }));
            }
            Err(e) => {
                log::error!("[API AUTH ERROR] captcha: {}", e);
                return HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e,
                }));
            }
        }
    }

    let user = match sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username = ? AND is_active = TRUE",
    )
    .bind(&payload.username)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(user) => user,
        Err(e) => {
            log::error!("[API AUTH ERROR] lookup: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    };

    let Some(user) = user else {
        let total = attempts.record_failure(&ip);
        log::info!("Login gagal untuk '{}' dari {} ({}x)", payload.username, ip, total);
        return HttpResponse::Unauthorized().json(json!({
            "code": -1,
            "message": "Username atau password salah",
            "captcha_required": attempts.requires_captcha(&ip),
        }));
    };

    match verify(&payload.password, &user.password) {
        Ok(true) => {}
        Ok(false) => {
            let total = attempts.record_failure(&ip);
            log::info!("Login gagal untuk '{}' dari {} ({}x)", user.username, ip, total);
            return HttpResponse::Unauthorized().json(json!({
                "code": -1,
                "message": "Username atau password salah",
                "captcha_required": attempts.requires_captcha(&ip),
            }));
        }
        Err(e) => {
            log::error!("[API AUTH ERROR] verify: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": "Gagal memverifikasi password",
            }));
        }
    }

    let token = match generate_jwt(&user) {
        Ok(token) => token,
        Err(e) => {
            log::error!("[API AUTH ERROR] jwt: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": "Gagal membuat token",
            }));
        }
    };

    attempts.reset(&ip);

    let cookie = Cookie::build("access_token", token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(2))
        .finish();

    HttpResponse::Ok().cookie(cookie).json(json!({
        "code": 0,
        "content": user,
        "message": "Login berhasil",
    }))
}

#[post("/api/auth/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build("access_token", "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(json!({
        "code": 0,
        "message": "Logout berhasil",
    }))
}
