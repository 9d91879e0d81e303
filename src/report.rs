//! Penyusun tabel laporan cetak: header (dengan span dan warna) + body,
//! dipakai untuk konfigurasi print di klien dan untuk export Excel.

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use serde::Serialize;

use crate::models::absensi::AbsensiResponse;
use crate::models::pendidikan::Pendidikan;
use crate::models::penanganan::Penanganan;
use crate::models::personel::Personel;

const HEADER_FILL: &str = "FEE685";

#[derive(Debug, Clone, Serialize)]
pub struct HeaderCell {
    pub content: String,
    #[serde(rename = "colSpan", skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u16>,
    #[serde(rename = "rowSpan", skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl HeaderCell {
    fn filled(content: &str) -> Self {
        HeaderCell {
            content: content.to_string(),
            col_span: None,
            row_span: None,
            fill: Some(HEADER_FILL.to_string()),
        }
    }

    fn plain(content: &str) -> Self {
        HeaderCell {
            content: content.to_string(),
            col_span: None,
            row_span: None,
            fill: None,
        }
    }

    fn rows(mut self, n: u16) -> Self {
        self.row_span = Some(n);
        self
    }

    fn cols(mut self, n: u16) -> Self {
        self.col_span = Some(n);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ReportTable {
    pub header: Vec<Vec<HeaderCell>>,
    pub rows: Vec<Vec<String>>,
}

pub fn absensi_table(list: &[AbsensiResponse]) -> ReportTable {
    let header = vec![
        vec![
            HeaderCell::filled("No").rows(2),
            HeaderCell::filled("NAMA").rows(2),
            HeaderCell::filled("PANGKAT / NRP").rows(2),
            HeaderCell::filled("JABATAN").rows(2),
            HeaderCell::filled("JAM KEHADIRAN").cols(2),
            HeaderCell::filled("TANDA TANGAN").cols(2),
        ],
        vec![
            HeaderCell::plain("DATANG"),
            HeaderCell::plain("PULANG"),
            HeaderCell::plain("DATANG"),
            HeaderCell::plain("PULANG"),
        ],
    ];

    let rows = list
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let jam = |t: Option<chrono::NaiveDateTime>| {
                t.map(|t| t.format("%Y-%m-%d\n%H:%M").to_string())
                    .unwrap_or_default()
            };
            vec![
                (i + 1).to_string(),
                a.personel.nama.clone(),
                format!("{}\n{}", a.personel.pangkat, a.personel.nrp),
                a.personel.jabatan.clone(),
                jam(a.jam_datang),
                jam(a.jam_pulang),
                String::new(),
                String::new(),
            ]
        })
        .collect();

    ReportTable { header, rows }
}

pub fn personel_table(list: &[(Personel, Vec<Pendidikan>)]) -> ReportTable {
    let header = vec![vec![
        HeaderCell::filled("No"),
        HeaderCell::filled("NAMA"),
        HeaderCell::filled("PANGKAT / NRP"),
        HeaderCell::filled("JABATAN"),
        HeaderCell::filled("PENDIDIKAN UMUM"),
        HeaderCell::filled("PENDIDIKAN KEPOLISIAN"),
        HeaderCell::filled("PENDIDIKAN KEJURUAN"),
        HeaderCell::filled("PENYIDIK / PENYIDIK PEMBANTU"),
        HeaderCell::filled("ADA / TIDAK ADA SKEP"),
        HeaderCell::filled("SERTIFIKASI / BELUM SERTIFIKASI"),
    ]];

    let jurusan = |pendidikan: &[Pendidikan], jenis: &str| {
        pendidikan
            .iter()
            .filter(|p| p.jenis.eq_ignore_ascii_case(jenis))
            .map(|p| format!("{} {}", p.nama_sekolah, p.tahun_mulai))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let rows = list
        .iter()
        .enumerate()
        .map(|(i, (p, pendidikan))| {
            vec![
                (i + 1).to_string(),
                p.nama.clone(),
                format!("{}\n{}", p.pangkat, p.nrp),
                p.jabatan.clone(),
                jurusan(pendidikan, "umum"),
                jurusan(pendidikan, "kepolisian"),
                jurusan(pendidikan, "kejuruan"),
                if p.is_detective {
                    "Penyidik".to_string()
                } else {
                    "Penyidik Pembantu".to_string()
                },
                p.skep.clone().unwrap_or_default(),
                if p.certified.is_some() {
                    "Sudah".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    ReportTable { header, rows }
}

pub fn lp_li_table(list: &[Penanganan]) -> ReportTable {
    let header = vec![vec![
        HeaderCell::filled("No"),
        HeaderCell::filled("LAPORAN POLISI"),
        HeaderCell::filled("URAIAN"),
        HeaderCell::filled("HAMBATAN"),
        HeaderCell::filled("RTL"),
        HeaderCell::filled("PERKEMBANGAN / KETERANGAN"),
    ]];

    let names = |v: &Option<sqlx::types::Json<Vec<String>>>| {
        v.as_ref()
            .map(|j| j.0.join(", "))
            .unwrap_or_default()
    };

    let rows = list
        .iter()
        .enumerate()
        .map(|(i, lp)| {
            vec![
                (i + 1).to_string(),
                format!(
                    "{}, tanggal {}\n\n({})",
                    lp.nomor,
                    tanggal_panjang(lp.tanggal.date()),
                    lp.judul
                ),
                format!(
                    "Kronologis:\n{}\n\nPersangkaan Pasal:\n{}\n\nTerlapor:\n{}\n\nPelapor:\n{}\n\nSaksi:\n{}",
                    lp.kronologis.clone().unwrap_or_default(),
                    names(&lp.pasal),
                    names(&lp.terlapor),
                    names(&lp.pelapor),
                    names(&lp.saksi),
                ),
                lp.catatan_hambatan.clone().unwrap_or_default(),
                lp.rtl.clone().unwrap_or_default(),
                lp.keterangan.clone().unwrap_or_default(),
            ]
        })
        .collect();

    ReportTable { header, rows }
}

/// Format "2 Mei 2024" (bulan bahasa Indonesia).
pub fn tanggal_panjang(tanggal: chrono::NaiveDate) -> String {
    use chrono::Datelike;
    const BULAN: [&str; 12] = [
        "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli",
        "Agustus", "September", "Oktober", "November", "Desember",
    ];
    format!(
        "{} {} {}",
        tanggal.day(),
        BULAN[tanggal.month0() as usize],
        tanggal.year()
    )
}

/// Penempatan sel header pada grid: span menggeser kolom baris berikutnya.
/// Hasil: (row, col, row_span, col_span) per sel, urutan per baris.
pub fn layout_header(header: &[Vec<HeaderCell>]) -> Vec<Vec<(u32, u16, u16, u16)>> {
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut placed = Vec::new();

    for (r, row) in header.iter().enumerate() {
        if occupied.len() <= r {
            occupied.resize_with(r + 1, Vec::new);
        }
        let mut cells = Vec::new();
        let mut col: usize = 0;
        for cell in row {
            while occupied[r].get(col).copied().unwrap_or(false) {
                col += 1;
            }
            let cspan = cell.col_span.unwrap_or(1).max(1);
            let rspan = cell.row_span.unwrap_or(1).max(1);

            for rr in r..r + rspan as usize {
                if occupied.len() <= rr {
                    occupied.resize_with(rr + 1, Vec::new);
                }
                for cc in col..col + cspan as usize {
                    if occupied[rr].len() <= cc {
                        occupied[rr].resize(cc + 1, false);
                    }
                    occupied[rr][cc] = true;
                }
            }

            cells.push((r as u32, col as u16, rspan, cspan));
            col += cspan as usize;
        }
        placed.push(cells);
    }

    placed
}

/// Tulis tabel laporan menjadi workbook xlsx di memori.
pub fn to_xlsx(table: &ReportTable) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x00FE_E685))
        .set_text_wrap();
    let plain_header_format = Format::new().set_bold().set_text_wrap();
    let body_format = Format::new().set_text_wrap();

    let placed = layout_header(&table.header);
    let mut header_rows = 0u32;

    for (row_cells, placed_cells) in table.header.iter().zip(&placed) {
        for (cell, &(r, c, rspan, cspan)) in row_cells.iter().zip(placed_cells) {
            let fmt = if cell.fill.is_some() {
                &header_format
            } else {
                &plain_header_format
            };
            if rspan > 1 || cspan > 1 {
                sheet.merge_range(
                    r,
                    c,
                    r + rspan as u32 - 1,
                    c + cspan - 1,
                    &cell.content,
                    fmt,
                )?;
            } else {
                sheet.write_string_with_format(r, c, &cell.content, fmt)?;
            }
            header_rows = header_rows.max(r + rspan as u32);
        }
    }

    for (i, row) in table.rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            sheet.write_string_with_format(
                header_rows + i as u32,
                j as u16,
                value,
                &body_format,
            )?;
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::absensi::PersonelBrief;
    use chrono::{NaiveDate, Utc};

    fn absensi(nama: &str) -> AbsensiResponse {
        let hari = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        AbsensiResponse {
            id: "a-1".into(),
            personel_id: "p-1".into(),
            tanggal: hari,
            jam_datang: hari.and_hms_opt(7, 0, 0),
            jam_pulang: hari.and_hms_opt(15, 0, 0),
            status: Some("Hadir".into()),
            qr_code: None,
            created_at: Utc::now(),
            personel: PersonelBrief {
                id: "p-1".into(),
                nama: nama.into(),
                nrp: "12345".into(),
                pangkat: "Bripka".into(),
                jabatan: "Penyidik".into(),
            },
            lama_kerja: Some("8:00".into()),
        }
    }

    #[test]
    fn absensi_header_spans_lay_out_second_row_after_rowspans() {
        let table = absensi_table(&[absensi("Budi")]);
        let placed = layout_header(&table.header);

        // Baris kedua mulai di kolom 4 (empat kolom pertama rowSpan 2).
        assert_eq!(placed[1][0], (1, 4, 1, 1));
        assert_eq!(placed[1][3], (1, 7, 1, 1));
        // JAM KEHADIRAN menempati kolom 4-5 pada baris pertama.
        assert_eq!(placed[0][4], (0, 4, 1, 2));
    }

    #[test]
    fn absensi_rows_have_eight_columns() {
        let table = absensi_table(&[absensi("Budi"), absensi("Sari")]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == 8));
        assert_eq!(table.rows[0][1], "Budi");
        assert_eq!(table.rows[1][0], "2");
    }

    #[test]
    fn personel_rows_group_pendidikan_by_jenis() {
        let p = Personel {
            id: "p-1".into(),
            nama: "Budi".into(),
            nrp: "12345".into(),
            pangkat: "Bripka".into(),
            jabatan: "Penyidik".into(),
            is_detective: true,
            skep: Some("skep.pdf".into()),
            certified: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let pendidikan = vec![
            Pendidikan {
                id: "e-1".into(),
                personel_id: "p-1".into(),
                jenis: "Umum".into(),
                nama_sekolah: "SMA 1".into(),
                tahun_mulai: 2001,
                tahun_selesai: Some(2004),
                created_at: Utc::now(),
            },
            Pendidikan {
                id: "e-2".into(),
                personel_id: "p-1".into(),
                jenis: "Kepolisian".into(),
                nama_sekolah: "SPN Lido".into(),
                tahun_mulai: 2006,
                tahun_selesai: None,
            created_at: Utc::now(),
            },
        ];

        let table = personel_table(&[(p, pendidikan)]);
        let row = &table.rows[0];
        assert_eq!(row[4], "SMA 1 2001");
        assert_eq!(row[5], "SPN Lido 2006");
        assert_eq!(row[6], "");
        assert_eq!(row[7], "Penyidik");
        assert_eq!(row[8], "skep.pdf");
        assert_eq!(row[9], "");
    }

    #[test]
    fn tanggal_panjang_uses_indonesian_months() {
        let t = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap();
        assert_eq!(tanggal_panjang(t), "17 Agustus 2024");
    }

    #[test]
    fn xlsx_export_produces_nonempty_workbook() {
        let table = absensi_table(&[absensi("Budi")]);
        let bytes = to_xlsx(&table).unwrap();
        // Minimal: zip container xlsx yang valid diawali "PK".
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }
}
