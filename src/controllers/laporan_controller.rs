use std::collections::HashMap;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::verify_jwt;
use crate::models::absensi::{AbsensiResponse, AbsensiWithPersonel};
use crate::models::pendidikan::Pendidikan;
use crate::models::penanganan::Penanganan;
use crate::models::personel::Personel;
use crate::report::{self, ReportTable};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct LaporanParams {
    #[serde(rename = "type")]
    pub kind: String,
}

#[post("/api/laporan")]
pub async fn laporan(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    params: web::Json<LaporanParams>,
) -> HttpResponse {
    if let Err(response) = require_admin(&req) {
        return response;
    }

    match build_table(pool.get_ref(), &params.kind).await {
        Ok(Some(table)) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": table,
            "message": "Laporan generated successfully",
        })),
        Ok(None) => HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": format!("Unknown report type: {}", params.kind),
        })),
        Err(e) => {
            log::error!("[API LAPORAN ERROR] {}: {}", params.kind, e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

#[get("/api/laporan/download")]
pub async fn laporan_download(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    params: web::Query<LaporanParams>,
) -> HttpResponse {
    if let Err(response) = require_admin(&req) {
        return response;
    }

    let table = match build_table(pool.get_ref(), &params.kind).await {
        Ok(Some(table)) => table,
        Ok(None) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Unknown report type: {}", params.kind),
            }));
        }
        Err(e) => {
            log::error!("[API LAPORAN ERROR] {}: {}", params.kind, e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let bytes = match report::to_xlsx(&table) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("[API LAPORAN ERROR] xlsx: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    };

    let filename = format!(
        "laporan-{}-{}.xlsx",
        params.kind,
        Utc::now().format("%Y%m%d")
    );
    HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes)
}

fn require_admin(req: &HttpRequest) -> Result<(), HttpResponse> {
    let claims = verify_jwt(req).map_err(|e| {
        HttpResponse::Unauthorized().json(json!({
            "code": -1,
            "message": e.to_string(),
        }))
    })?;
    if !claims.is_admin() {
        return Err(HttpResponse::Forbidden().json(json!({
            "code": -1,
            "message": "Hanya admin yang boleh mengakses laporan",
        })));
    }
    Ok(())
}

async fn build_table(pool: &MySqlPool, kind: &str) -> Result<Option<ReportTable>, sqlx::Error> {
    match kind {
        "absensi" => {
            let rows = sqlx::query_as::<_, AbsensiWithPersonel>(
                "SELECT a.id, a.personel_id, a.tanggal, a.jam_datang, a.jam_pulang, a.status, \
                 a.qr_code, a.created_at, p.nama AS personel_nama, p.nrp AS personel_nrp, \
                 p.pangkat AS personel_pangkat, p.jabatan AS personel_jabatan \
                 FROM absensi a JOIN personel p ON p.id = a.personel_id \
                 ORDER BY a.tanggal ASC, p.nama ASC",
            )
            .fetch_all(pool)
            .await?;
            let list: Vec<AbsensiResponse> = rows.into_iter().map(AbsensiResponse::from).collect();
            Ok(Some(report::absensi_table(&list)))
        }
        "personel" => {
            let personel = sqlx::query_as::<_, Personel>("SELECT * FROM personel ORDER BY nama ASC")
                .fetch_all(pool)
                .await?;

            let mut by_personel: HashMap<String, Vec<Pendidikan>> = HashMap::new();
            for pendidikan in sqlx::query_as::<_, Pendidikan>(
                "SELECT * FROM pendidikan_personel ORDER BY tahun_mulai ASC",
            )
            .fetch_all(pool)
            .await?
            {
                by_personel
                    .entry(pendidikan.personel_id.clone())
                    .or_default()
                    .push(pendidikan);
            }

            let list: Vec<(Personel, Vec<Pendidikan>)> = personel
                .into_iter()
                .map(|p| {
                    let pendidikan = by_personel.remove(&p.id).unwrap_or_default();
                    (p, pendidikan)
                })
                .collect();
            Ok(Some(report::personel_table(&list)))
        }
        "lp-li" => {
            let list = sqlx::query_as::<_, Penanganan>(
                "SELECT * FROM penanganan_lp_li ORDER BY tanggal ASC",
            )
            .fetch_all(pool)
            .await?;
            Ok(Some(report::lp_li_table(&list)))
        }
        _ => Ok(None),
    }
}
