use actix_web::{post, web, HttpRequest, HttpResponse};
use bcrypt::{hash, DEFAULT_COST};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::auth::verify_jwt;
use crate::models::user::{NewUser, User};
use crate::query::{self, ListParams, ListQuery};

const SEARCH_COLUMNS: &[&str] = &["username", "role"];
const SORT_COLUMNS: &[&str] = &["created_at", "username", "role"];
const UPDATE_COLUMNS: &[&str] = &["username", "password", "role", "is_active"];

#[post("/api/user")]
pub async fn user(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    params: web::Json<Value>,
) -> HttpResponse {
    let claims = match verify_jwt(&req) {
        Ok(claims) => claims,
        Err(e) => {
            return HttpResponse::Unauthorized().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    };
    if !claims.is_admin() {
        return HttpResponse::Forbidden().json(json!({
            "code": -1,
            "message": "Hanya admin yang boleh mengelola user",
        }));
    }

    let params = params.into_inner();
    let action = params
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("READ")
        .to_string();

    match action.as_str() {
        "CREATE" => create(pool.get_ref(), params).await,
        "READ" => read(pool.get_ref(), params).await,
        "UPDATE" => update(pool.get_ref(), params).await,
        "DELETE" => delete(pool.get_ref(), params).await,
        other => HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": format!("Unknown action: {}", other),
        })),
    }
}

async fn fetch_by_id(pool: &MySqlPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn create(pool: &MySqlPool, params: Value) -> HttpResponse {
    let input: NewUser = match serde_json::from_value(params) {
        Ok(input) => input,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };
    if input.username.is_empty() || input.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Username dan password wajib diisi",
        }));
    }

    let hashed = match hash(&input.password, DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            log::error!("[API USER ERROR] hash: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": "Gagal memproses password",
            }));
        }
    };

    let id = Uuid::new_v4().to_string();
    let result = sqlx::query(
        "INSERT INTO users (id, username, password, role, is_active) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.username)
    .bind(&hashed)
    .bind(&input.role)
    .bind(input.is_active)
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::error!("[API USER ERROR] create: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_by_id(pool, &id).await {
        Ok(row) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": row.map(|r| vec![r]),
            "message": "User created successfully",
        })),
        Err(e) => {
            log::error!("[API USER ERROR] fetch after create: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn read(pool: &MySqlPool, params: Value) -> HttpResponse {
    let list: ListParams = match serde_json::from_value(params) {
        Ok(list) => list,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    let (offset, limit) = list.bounds();
    let (sort_col, ascending) = list.order(SORT_COLUMNS);

    let mut q = ListQuery::new();
    if let Some(search) = &list.search {
        q.search(search, SEARCH_COLUMNS);
    }

    let count_sql = q.count_sql("users");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in q.binds() {
        count_query = count_query.bind(bind);
    }
    let count = match count_query.fetch_one(pool).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("[API USER ERROR] count: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let page_sql = q.page_sql("*", "users", &sort_col, ascending);
    let mut data_query = sqlx::query_as::<_, User>(&page_sql);
    for bind in q.binds() {
        data_query = data_query.bind(bind);
    }
    data_query = data_query.bind(limit).bind(offset);

    match data_query.fetch_all(pool).await {
        Ok(results) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": { "count": count, "results": results },
            "message": "Users fetched successfully",
        })),
        Err(e) => {
            log::error!("[API USER ERROR] read: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn update(pool: &MySqlPool, params: Value) -> HttpResponse {
    let Some(obj) = params.as_object() else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Payload tidak valid",
        }));
    };
    let Some(id) = obj.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for update",
        }));
    };

    // Password baru di-hash ulang sebelum masuk SET clause.
    let mut data = obj.clone();
    if let Some(Value::String(plain)) = data.get("password") {
        if plain.is_empty() {
            data.remove("password");
        } else {
            match hash(plain, DEFAULT_COST) {
                Ok(hashed) => {
                    data.insert("password".to_string(), Value::String(hashed));
                }
                Err(e) => {
                    log::error!("[API USER ERROR] hash: {}", e);
                    return HttpResponse::InternalServerError().json(json!({
                        "code": -1,
                        "message": "Gagal memproses password",
                    }));
                }
            }
        }
    }

    let (set, binds) = query::update_set(UPDATE_COLUMNS, &data);
    if set.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Tidak ada kolom untuk diupdate",
        }));
    }

    let sql = format!("UPDATE users SET {} WHERE id = ?", set);
    let mut update_query = sqlx::query(&sql);
    for bind in &binds {
        update_query = update_query.bind(bind);
    }
    update_query = update_query.bind(id);

    match update_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => match fetch_by_id(pool, id).await {
            Ok(row) => HttpResponse::Ok().json(json!({
                "code": 0,
                "content": row.map(|r| vec![r]),
                "message": "User updated successfully",
            })),
            Err(e) => {
                log::error!("[API USER ERROR] fetch after update: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                    "content": null,
                }))
            }
        },
        Err(e) => {
            log::error!("[API USER ERROR] update: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn delete(pool: &MySqlPool, params: Value) -> HttpResponse {
    let Some(id) = params
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for deletion",
        }));
    };

    match sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
    {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "code": 0,
            "message": "User deleted successfully",
        })),
        Err(e) => {
            log::error!("[API USER ERROR] delete: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}
