use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rst_portal::application::bootstrap::bootstrap;
use rst_portal::data::doctor_repository::SqliteDoctorRepository;
use rst_portal::data::news_repository::SqliteNewsRepository;
use rst_portal::domain::hospital::{APPOINTMENT_STATUS_PENDING, NewsForm};
use rst_portal::domain::user::Credentials;
use rst_portal::infrastructure::config::AppConfig;
use rst_portal::presentation::handlers::AppState;
use rst_portal::presentation::middleware::{RequestTracing, SESSION_COOKIE, SessionMiddleware};
use rst_portal::presentation::routes::configure;

macro_rules! setup_test {
    () => {{
        let (state, _) = AppState::initialize(AppConfig::in_memory()).await.unwrap();
        let state = web::Data::new(state);

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(SessionMiddleware)
                .wrap(RequestTracing)
                .configure(configure),
        )
        .await;

        (app, state)
    }};
}

// Registers and logs in a staff user through the service, returning the
// session cookie a browser would hold.
macro_rules! staff_cookie {
    ($state:expr) => {{
        let credentials = Credentials {
            username: "staf".to_string(),
            password: "rahasia".to_string(),
        };
        $state.auth.register_user(credentials.clone()).await.unwrap();
        let session = $state.auth.login(credentials).await.unwrap();
        actix_web::cookie::Cookie::new(SESSION_COOKIE, session.token)
    }};
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).unwrap()
}

async fn count(state: &AppState, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(&state.pool)
        .await
        .unwrap()
}

async fn comment_count(state: &AppState, news_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE news_id = ?")
        .bind(news_id)
        .fetch_one(&state.pool)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_bootstrap_seeds_exactly_once() {
    let (_app, state) = setup_test!();

    // initialize() already ran bootstrap once
    bootstrap(
        &state.pool,
        &SqliteNewsRepository::new(state.pool.clone()),
        &SqliteDoctorRepository::new(state.pool.clone()),
    )
    .await
    .unwrap();

    assert_eq!(count(&state, "SELECT COUNT(*) FROM news").await, 2);
    assert_eq!(count(&state, "SELECT COUNT(*) FROM doctors").await, 4);
}

#[actix_web::test]
async fn test_home_shows_latest_news() {
    let (app, _state) = setup_test!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));

    let body = body_text(resp).await;
    assert!(body.contains("Peresmian Ruang Operasi Baru"));
    assert!(body.contains(r#"href="/login""#));
}

#[actix_web::test]
async fn test_news_list_newest_first() {
    let (app, state) = setup_test!();
    state
        .news
        .publish(NewsForm {
            title: "Donor Darah Bulan Ini".to_string(),
            body: "Kegiatan donor darah".to_string(),
            image_url: String::new(),
        })
        .await
        .unwrap();

    let req = test::TestRequest::get().uri("/berita_acara").to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    let newest = body.find("Donor Darah Bulan Ini").unwrap();
    let seeded = body.find("Penyuluhan Kesehatan Jantung").unwrap();
    assert!(newest < seeded);
}

#[actix_web::test]
async fn test_news_detail_and_not_found() {
    let (app, _state) = setup_test!();

    let req = test::TestRequest::get().uri("/berita/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Penyuluhan Kesehatan Jantung"));

    let req = test::TestRequest::get().uri("/berita/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_increments_only_target_news() {
    let (app, state) = setup_test!();
    let before_first = comment_count(&state, 1).await;
    let before_second = comment_count(&state, 2).await;

    let req = test::TestRequest::post()
        .uri("/berita/1")
        .set_form(&[("nama", "Andi"), ("isi", "Informasi yang bermanfaat")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/berita/1");

    assert_eq!(comment_count(&state, 1).await, before_first + 1);
    assert_eq!(comment_count(&state, 2).await, before_second);

    let req = test::TestRequest::get().uri("/berita/1").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Informasi yang bermanfaat"));
}

#[actix_web::test]
async fn test_comment_on_missing_news() {
    let (app, state) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/berita/999")
        .set_form(&[("nama", "Andi"), ("isi", "Halo")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(count(&state, "SELECT COUNT(*) FROM comments").await, 0);
}

#[actix_web::test]
async fn test_empty_comment_is_rejected() {
    let (app, state) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/berita/1")
        .set_form(&[("nama", "Andi")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("required"));
    assert_eq!(comment_count(&state, 1).await, 0);
}

#[actix_web::test]
async fn test_publish_news_when_logged_in() {
    let (app, state) = setup_test!();
    let cookie = staff_cookie!(state);

    let req = test::TestRequest::post()
        .uri("/tambah_berita")
        .cookie(cookie)
        .set_form(&[
            ("judul", "Khitanan Massal"),
            ("konten", "Khitanan massal gratis untuk warga"),
            ("gambar", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/berita_acara");

    let image: Option<String> =
        sqlx::query_scalar("SELECT image_url FROM news WHERE title = 'Khitanan Massal'")
            .fetch_one(&state.pool)
            .await
            .unwrap();
    assert!(image.is_none());
}

#[actix_web::test]
async fn test_publish_news_missing_title_reshows_form() {
    let (app, state) = setup_test!();
    let cookie = staff_cookie!(state);

    let req = test::TestRequest::post()
        .uri("/tambah_berita")
        .cookie(cookie)
        .set_form(&[("konten", "Tanpa judul")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Tanpa judul"));
    assert_eq!(count(&state, "SELECT COUNT(*) FROM news").await, 2);
}

#[actix_web::test]
async fn test_add_doctor_when_logged_in() {
    let (app, state) = setup_test!();
    let cookie = staff_cookie!(state);

    let req = test::TestRequest::post()
        .uri("/tambah_dokter")
        .cookie(cookie)
        .set_form(&[
            ("nama", "dr. Rina Saraswati, Sp.N"),
            ("spesialis", "Saraf"),
            ("jadwal", "Rabu (08.00 - 12.00)"),
            ("foto", "https://example.com/rina.jpg"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/jadwal_dokter");

    let req = test::TestRequest::get().uri("/jadwal_dokter").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("dr. Rina Saraswati, Sp.N"));
    assert_eq!(count(&state, "SELECT COUNT(*) FROM doctors").await, 5);
}

#[actix_web::test]
async fn test_appointment_status_is_server_assigned() {
    let (app, state) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/buat_janji")
        .set_form(&[
            ("nama_pasien", "Siti Aminah"),
            ("no_hp", "081234567890"),
            ("keluhan", "Pusing dan mual"),
            ("dokter_id", "1"),
            ("tanggal", "Senin, 6 Mei"),
            ("status", "approved"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/buat_janji?sukses=1");

    let status: String = sqlx::query_scalar("SELECT status FROM appointments WHERE doctor_id = 1")
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(status, APPOINTMENT_STATUS_PENDING);
    assert_eq!(
        state
            .doctors
            .appointments_for_doctor(1)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[actix_web::test]
async fn test_appointment_for_unknown_doctor_is_rejected() {
    let (app, state) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/buat_janji")
        .set_form(&[
            ("nama_pasien", "Siti"),
            ("no_hp", "0812"),
            ("keluhan", "Demam"),
            ("dokter_id", "77"),
            ("tanggal", "Besok"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("does not exist"));
    assert_eq!(count(&state, "SELECT COUNT(*) FROM appointments").await, 0);
}

#[actix_web::test]
async fn test_appointment_form_preselects_doctor() {
    let (app, _state) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/buat_janji?dokter_id=2")
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains(r#"<option value="2" selected>"#));

    let req = test::TestRequest::get()
        .uri("/buat_janji?dokter_id=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_text(resp).await.contains(" selected>"));

    let req = test::TestRequest::get()
        .uri("/buat_janji?sukses=1")
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("pending confirmation"));
}

#[actix_web::test]
async fn test_doctor_list_shows_appointments_to_staff_only() {
    let (app, state) = setup_test!();
    let cookie = staff_cookie!(state);

    let req = test::TestRequest::post()
        .uri("/buat_janji")
        .set_form(&[
            ("nama_pasien", "Joko Widodo"),
            ("no_hp", "0813"),
            ("keluhan", "Kontrol mata"),
            ("dokter_id", "4"),
            ("tanggal", "Kamis"),
        ])
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/jadwal_dokter").to_request();
    let anonymous = body_text(test::call_service(&app, req).await).await;
    assert!(anonymous.contains("dr. Linda Kusuma, Sp.M"));
    assert!(!anonymous.contains("Joko Widodo"));

    let req = test::TestRequest::get()
        .uri("/jadwal_dokter")
        .cookie(cookie)
        .to_request();
    let staff = body_text(test::call_service(&app, req).await).await;
    assert!(staff.contains("Joko Widodo"));
}

#[actix_web::test]
async fn test_health_check() {
    let (app, _state) = setup_test!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
    assert_eq!(body["request_id"], request_id);
}
