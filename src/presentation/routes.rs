use crate::presentation::auth::{login, login_page, logout, register, register_page};
use crate::presentation::handlers::{
    add_comment, add_doctor, appointment_page, doctor_form_page, doctor_list, health_check, home,
    news_detail, news_form_page, news_list, publish_news, request_appointment,
};
use actix_web::web;

/// Registers every route of the portal.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health_check))
        .route("/berita_acara", web::get().to(news_list))
        .service(
            web::resource("/berita/{id}")
                .route(web::get().to(news_detail))
                .route(web::post().to(add_comment)),
        )
        .service(
            web::resource("/tambah_berita")
                .route(web::get().to(news_form_page))
                .route(web::post().to(publish_news)),
        )
        .route("/jadwal_dokter", web::get().to(doctor_list))
        .service(
            web::resource("/tambah_dokter")
                .route(web::get().to(doctor_form_page))
                .route(web::post().to(add_doctor)),
        )
        .service(
            web::resource("/buat_janji")
                .route(web::get().to(appointment_page))
                .route(web::post().to(request_appointment)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(login_page))
                .route(web::post().to(login)),
        )
        .service(
            web::resource("/register")
                .route(web::get().to(register_page))
                .route(web::post().to(register)),
        )
        .route("/logout", web::get().to(logout));
}
