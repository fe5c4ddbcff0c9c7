//! Server-rendered pages. Every interpolated value goes through [`escape`].

use crate::domain::hospital::{
    Appointment, AppointmentForm, Comment, CommentForm, Doctor, DoctorForm, News, NewsForm,
};
use crate::presentation::middleware::AuthenticatedUser;

const SITE_NAME: &str = "RST Slamet Riyadi";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&AuthenticatedUser>, content: &str) -> String {
    let account = match user {
        Some(user) => format!(
            r#"<a href="/tambah_berita">Publish news</a> <a href="/tambah_dokter">Add doctor</a> <span class="user">{}</span> <a href="/logout">Logout</a>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/login">Login</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head><meta charset="utf-8"><title>{title} | {site}</title></head>
<body>
<nav><a href="/">{site}</a> <a href="/berita_acara">News</a> <a href="/jadwal_dokter">Doctors</a> <a href="/buat_janji">Appointment</a> {account}</nav>
<main>
<h1>{title}</h1>
{content}
</main>
</body>
</html>"#,
        title = escape(title),
        site = SITE_NAME,
        account = account,
        content = content,
    )
}

fn alert(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<p class="alert">{}</p>"#, escape(m)))
        .unwrap_or_default()
}

fn news_card(out: &mut String, news: &News) {
    out.push_str(r#"<article class="news">"#);
    if let Some(image) = &news.image_url {
        out.push_str(&format!(r#"<img src="{}" alt="">"#, escape(image)));
    }
    out.push_str(&format!(
        r#"<h2><a href="/berita/{id}">{title}</a></h2><time>{date}</time><p>{body}</p></article>"#,
        id = news.id,
        title = escape(&news.title),
        date = news.published_at.format("%d %B %Y"),
        body = escape(&news.body),
    ));
}

pub fn home(user: Option<&AuthenticatedUser>, latest: &[News]) -> String {
    let mut content = String::from(
        r#"<p>Welcome to the RST Slamet Riyadi hospital information portal.</p><h2>Latest news</h2>"#,
    );
    if latest.is_empty() {
        content.push_str("<p>No news yet.</p>");
    }
    for news in latest {
        news_card(&mut content, news);
    }
    layout("Home", user, &content)
}

pub fn news_list(user: Option<&AuthenticatedUser>, news: &[News]) -> String {
    let mut content = String::new();
    if news.is_empty() {
        content.push_str("<p>No news yet.</p>");
    }
    for item in news {
        news_card(&mut content, item);
    }
    layout("News", user, &content)
}

pub fn news_detail(
    user: Option<&AuthenticatedUser>,
    news: &News,
    comments: &[Comment],
    error: Option<&str>,
    form: &CommentForm,
) -> String {
    let mut content = String::new();
    if let Some(image) = &news.image_url {
        content.push_str(&format!(r#"<img src="{}" alt="">"#, escape(image)));
    }
    content.push_str(&format!(
        r#"<time>{}</time><p>{}</p><h2>Comments ({})</h2>"#,
        news.published_at.format("%d %B %Y %H:%M"),
        escape(&news.body),
        comments.len()
    ));
    for comment in comments {
        content.push_str(&format!(
            r#"<div class="comment"><strong>{}</strong> <time>{}</time><p>{}</p></div>"#,
            escape(&comment.sender),
            comment.created_at.format("%d %B %Y %H:%M"),
            escape(&comment.body)
        ));
    }
    content.push_str(&format!(
        r#"{alert}<form method="post" action="/berita/{id}">
<label>Name <input name="nama" value="{sender}"></label>
<label>Comment <textarea name="isi">{body}</textarea></label>
<button type="submit">Send</button>
</form>"#,
        alert = alert(error),
        id = news.id,
        sender = escape(&form.sender),
        body = escape(&form.body),
    ));
    layout(&news.title, user, &content)
}

pub fn news_form(user: Option<&AuthenticatedUser>, error: Option<&str>, form: &NewsForm) -> String {
    let content = format!(
        r#"{alert}<form method="post" action="/tambah_berita">
<label>Title <input name="judul" value="{title}"></label>
<label>Content <textarea name="konten">{body}</textarea></label>
<label>Image URL <input name="gambar" value="{image}"></label>
<button type="submit">Publish</button>
</form>"#,
        alert = alert(error),
        title = escape(&form.title),
        body = escape(&form.body),
        image = escape(&form.image_url),
    );
    layout("Publish news", user, &content)
}

/// Appointment lists are only rendered for logged-in staff.
pub fn doctor_list(
    user: Option<&AuthenticatedUser>,
    doctors: &[(Doctor, Vec<Appointment>)],
) -> String {
    let mut content = String::new();
    if doctors.is_empty() {
        content.push_str("<p>No doctors yet.</p>");
    }
    for (doctor, appointments) in doctors {
        content.push_str(r#"<article class="doctor">"#);
        if let Some(photo) = &doctor.photo_url {
            content.push_str(&format!(r#"<img src="{}" alt="">"#, escape(photo)));
        }
        content.push_str(&format!(
            r#"<h2>{name}</h2><p class="specialty">{specialty}</p><p class="schedule">{schedule}</p><a href="/buat_janji?dokter_id={id}">Make an appointment</a>"#,
            name = escape(&doctor.name),
            specialty = escape(&doctor.specialty),
            schedule = escape(&doctor.schedule),
            id = doctor.id,
        ));
        if user.is_some() {
            content.push_str(&format!(
                r#"<h3>Appointment requests ({})</h3><ul>"#,
                appointments.len()
            ));
            for appointment in appointments {
                content.push_str(&format!(
                    r#"<li>{} ({}), {}: {} [{}]</li>"#,
                    escape(&appointment.patient_name),
                    escape(&appointment.phone),
                    escape(&appointment.requested_date),
                    escape(&appointment.complaint),
                    escape(&appointment.status),
                ));
            }
            content.push_str("</ul>");
        }
        content.push_str("</article>");
    }
    layout("Doctor schedule", user, &content)
}

pub fn doctor_form(
    user: Option<&AuthenticatedUser>,
    error: Option<&str>,
    form: &DoctorForm,
) -> String {
    let content = format!(
        r#"{alert}<form method="post" action="/tambah_dokter">
<label>Name <input name="nama" value="{name}"></label>
<label>Specialty <input name="spesialis" value="{specialty}"></label>
<label>Schedule <input name="jadwal" value="{schedule}"></label>
<label>Photo URL <input name="foto" value="{photo}"></label>
<button type="submit">Save</button>
</form>"#,
        alert = alert(error),
        name = escape(&form.name),
        specialty = escape(&form.specialty),
        schedule = escape(&form.schedule),
        photo = escape(&form.photo_url),
    );
    layout("Add doctor", user, &content)
}

pub fn appointment_form(
    user: Option<&AuthenticatedUser>,
    doctors: &[Doctor],
    selected: Option<i64>,
    error: Option<&str>,
    submitted: bool,
    form: &AppointmentForm,
) -> String {
    let mut options = String::from(r#"<option value="">Choose a doctor</option>"#);
    for doctor in doctors {
        options.push_str(&format!(
            r#"<option value="{id}"{sel}>{name} ({specialty})</option>"#,
            id = doctor.id,
            sel = if selected == Some(doctor.id) { " selected" } else { "" },
            name = escape(&doctor.name),
            specialty = escape(&doctor.specialty),
        ));
    }

    let confirmation = if submitted {
        r#"<p class="success">Your appointment request has been received and is pending confirmation.</p>"#
    } else {
        ""
    };

    let content = format!(
        r#"{confirmation}{alert}<form method="post" action="/buat_janji">
<label>Patient name <input name="nama_pasien" value="{patient}"></label>
<label>Phone <input name="no_hp" value="{phone}"></label>
<label>Doctor <select name="dokter_id">{options}</select></label>
<label>Date <input name="tanggal" value="{date}"></label>
<label>Complaint <textarea name="keluhan">{complaint}</textarea></label>
<button type="submit">Request appointment</button>
</form>"#,
        confirmation = confirmation,
        alert = alert(error),
        patient = escape(&form.patient_name),
        phone = escape(&form.phone),
        options = options,
        date = escape(&form.requested_date),
        complaint = escape(&form.complaint),
    );
    layout("Request an appointment", user, &content)
}

fn credentials_form(action: &str, button: &str, error: Option<&str>, username: &str) -> String {
    format!(
        r#"{alert}<form method="post" action="{action}">
<label>Username <input name="username" value="{username}"></label>
<label>Password <input type="password" name="password"></label>
<button type="submit">{button}</button>
</form>"#,
        alert = alert(error),
        action = action,
        username = escape(username),
        button = button,
    )
}

pub fn login(user: Option<&AuthenticatedUser>, error: Option<&str>, username: &str) -> String {
    let mut content = credentials_form("/login", "Login", error, username);
    content.push_str(r#"<p>No account yet? <a href="/register">Register</a></p>"#);
    layout("Login", user, &content)
}

pub fn register(user: Option<&AuthenticatedUser>, error: Option<&str>, username: &str) -> String {
    let content = credentials_form("/register", "Register", error, username);
    layout("Register", user, &content)
}

pub fn error_page(status: u16, message: &str) -> String {
    layout(
        &format!("Error {}", status),
        None,
        &format!(r#"<p>{}</p><a href="/">Back to home</a>"#, escape(message)),
    )
}
