pub mod absensi;
pub mod pendidikan;
pub mod penanganan;
pub mod personel;
pub mod user;
