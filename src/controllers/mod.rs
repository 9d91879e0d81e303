pub mod absensi_controller;
pub mod auth_controller;
pub mod captcha_controller;
pub mod laporan_controller;
pub mod lp_li_controller;
pub mod pendidikan_controller;
pub mod personel_controller;
pub mod user_controller;
