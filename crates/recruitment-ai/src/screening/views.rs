//! Server-rendered single-page form.

use std::fmt::Write;

use super::encoding::Categorical;
use super::profile::{
    CandidateProfile, CITY_DEVELOPMENT_INDEX, EXPERIENCE_YEARS, LAST_NEW_JOB_YEARS,
    TRAINING_HOURS,
};
use super::session::Verdict;

pub const PAGE_TITLE: &str = "Candidate Recruitment Prediction";

/// Message block rendered above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Verdict(Verdict),
    Error(String),
}

impl Banner {
    fn css_class(&self) -> &'static str {
        match self {
            Banner::Verdict(Verdict::Accepted) => "banner success",
            Banner::Verdict(Verdict::NotAccepted) | Banner::Error(_) => "banner error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Banner::Verdict(verdict) => verdict.message(),
            Banner::Error(message) => message,
        }
    }
}

pub fn render_page(profile: &CandidateProfile, banner: Option<&Banner>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{PAGE_TITLE}</h1>\n\
         <p>Enter the candidate's details to predict whether they will be accepted.</p>\n"
    );

    html.push_str("<form method=\"post\" action=\"/predict\">\n");
    select(&mut html, "Candidate location", profile.city);
    slider(
        &mut html,
        "city_development_index",
        "City Development Index (0.0 - 1.0)",
        profile.city_development_index,
        *CITY_DEVELOPMENT_INDEX.start(),
        *CITY_DEVELOPMENT_INDEX.end(),
        0.01,
    );
    select(&mut html, "Gender", profile.gender);
    select(&mut html, "Relevant experience", profile.relevant_experience);
    select(&mut html, "University enrollment", profile.enrolled_university);
    select(&mut html, "Education level", profile.education_level);
    select(&mut html, "Major discipline", profile.major_discipline);
    slider(
        &mut html,
        "experience",
        "Work experience (years)",
        f64::from(profile.experience),
        f64::from(*EXPERIENCE_YEARS.start()),
        f64::from(*EXPERIENCE_YEARS.end()),
        1.0,
    );
    select(&mut html, "Last company size", profile.company_size);
    select(&mut html, "Last company type", profile.company_type);
    slider(
        &mut html,
        "last_new_job",
        "Years since last job change",
        f64::from(profile.last_new_job),
        f64::from(*LAST_NEW_JOB_YEARS.start()),
        f64::from(*LAST_NEW_JOB_YEARS.end()),
        1.0,
    );
    let _ = write!(
        html,
        "<label>Training hours\n<input type=\"number\" name=\"training_hours\" \
         min=\"{}\" max=\"{}\" step=\"1\" value=\"{}\" required></label>\n",
        TRAINING_HOURS.start(),
        TRAINING_HOURS.end(),
        profile.training_hours
    );
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(banner) = banner {
        let _ = writeln!(
            html,
            "<div class=\"{}\" role=\"status\">{}</div>",
            banner.css_class(),
            escape_html(banner.text())
        );
    }

    html.push_str(
        "<hr>\n<footer><small>Recruitment outcome predictor. Verdicts come from a \
         pre-trained classifier and are advisory only.</small></footer>\n</body>\n</html>\n",
    );
    html
}

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto}\
label{display:block;margin:.75rem 0}select,input{display:block;width:100%}\
.banner{padding:.75rem;margin:1rem 0;border-radius:4px}\
.success{background:#e6f4ea}.error{background:#fce8e6}";

fn select<T: Categorical>(html: &mut String, title: &str, selected: T) {
    let name = T::FIELD.name();
    let _ = writeln!(html, "<label>{title}\n<select name=\"{name}\">");
    for option in T::all() {
        let label = escape_html(option.label());
        let marker = if *option == selected { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{label}\"{marker}>{label}</option>");
    }
    html.push_str("</select></label>\n");
}

fn slider(html: &mut String, name: &str, title: &str, value: f64, min: f64, max: f64, step: f64) {
    let _ = writeln!(
        html,
        "<label>{title}\n<input type=\"range\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"{step}\" value=\"{value}\" oninput=\"this.nextElementSibling.value=this.value\">\
         <output>{value}</output></label>"
    );
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
