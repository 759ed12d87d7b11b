//! HTML rendering for the search form, results, history, and case list.
//!
//! Pages are plain strings built from a shared layout. Every value that came
//! from user input or storage goes through [`escape`].

use std::fmt::Write;

use caseview_core::{
    CASE_TYPES, CaseDetails, CaseRecord, CaseTable, MIN_FILING_YEAR, Outcome, Query, QueryStatus,
};
use caseview_source::Court;
use chrono::NaiveDate;

use crate::search::SearchReport;

const STYLE: &str = "body{font-family:sans-serif;max-width:56rem;margin:2rem auto;padding:0 1rem}\
nav a{margin-right:1rem}table{border-collapse:collapse;width:100%}\
td,th{border:1px solid #ccc;padding:.4rem;text-align:left;vertical-align:top}\
.flash{background:#fdecea;border:1px solid #f5c2c0;padding:.6rem}\
.ok{color:#1e7b34}.failed{color:#b02a37}.pending{color:#8a6d00}";

const NOT_AVAILABLE: &str = "Not available";

/// Navigation options shared by every page.
#[derive(Debug, Clone, Copy)]
pub struct Nav {
    /// Whether the static case list is served.
    pub cases: bool,
}

// ── Public API ──

/// The search form, with any pending flash message.
pub fn index_page(nav: Nav, flash: Option<&str>, courts: &[Court], max_year: i32) -> String {
    let mut body = String::new();
    if let Some(message) = flash {
        let _ = write!(body, "<p class=\"flash\">{}</p>", escape(message));
    }

    body.push_str("<form method=\"post\" action=\"/search\">\n<p><label>Case Type <select name=\"case_type\">");
    body.push_str("<option value=\"\">Select case type</option>");
    for t in CASE_TYPES {
        let _ = write!(
            body,
            "<option value=\"{code}\">{code} - {desc}</option>",
            code = t.code,
            desc = t.description
        );
    }
    body.push_str("</select></label></p>\n");
    body.push_str("<p><label>Case Number <input name=\"case_number\" type=\"text\"></label></p>\n");
    let _ = write!(
        body,
        "<p><label>Filing Year <input name=\"filing_year\" type=\"number\" min=\"{MIN_FILING_YEAR}\" max=\"{max_year}\"></label></p>\n"
    );
    body.push_str("<p><button type=\"submit\">Search</button></p>\n</form>\n");

    if !courts.is_empty() {
        body.push_str("<h2>Supported courts</h2>\n<ul>");
        for court in courts {
            let _ = write!(
                body,
                "<li><a href=\"{url}\">{name}</a> ({status})</li>",
                url = escape(court.url),
                name = escape(court.name),
                status = escape(court.status)
            );
        }
        body.push_str("</ul>\n");
    }

    if nav.cases {
        body.push_str("<p>Not sure what to search for? <a href=\"/cases\">Browse the available cases</a>.</p>\n");
    }

    layout("Case Lookup", nav, &body)
}

/// Result of one search: found, not found, or failed.
pub fn results_page(nav: Nav, report: &SearchReport) -> String {
    let query = &report.query;
    let mut body = String::new();
    let _ = write!(
        body,
        "<p>Searched for <strong>{}</strong> on {} ({})</p>\n",
        escape(&query.key.to_string()),
        query.queried_at.format("%Y-%m-%d %H:%M:%S UTC"),
        status_badge(query.status),
    );

    match &report.outcome {
        Outcome::Success(found) => {
            body.push_str("<h2>Case found</h2>\n");
            let details = report
                .result
                .as_ref()
                .map(|r| &r.details)
                .unwrap_or(&found.details);
            details_table(&mut body, details);
            if let Some(record) = &found.record {
                record_table(&mut body, record);
            }
        }
        Outcome::NotFound => {
            body.push_str("<h2>Case not found</h2>\n");
            let _ = write!(
                body,
                "<p>No case matching {} is available.</p>\n",
                escape(&query.key.to_string())
            );
            if nav.cases {
                body.push_str("<p><a href=\"/cases\">See the cases that can be looked up</a>.</p>\n");
            }
        }
        Outcome::Failure(failure) => {
            body.push_str("<h2>Case lookup failed</h2>\n");
            let _ = write!(body, "<p class=\"flash\">{}</p>\n", escape(&failure.reason));
            if let Some(source) = &failure.source {
                let _ = write!(body, "<p>Attempted source: {}</p>\n", escape(source));
            }
            if let Some(reference) = &failure.reference {
                let _ = write!(body, "<p>Case reference: {}</p>\n", escape(reference));
            }
        }
    }

    body.push_str("<p><a href=\"/\">New search</a></p>\n");
    layout("Search Results", nav, &body)
}

/// Recent queries, newest first.
pub fn history_page(nav: Nav, queries: &[Query]) -> String {
    let mut body = String::new();
    if queries.is_empty() {
        body.push_str("<p>No searches yet.</p>\n");
        return layout("Search History", nav, &body);
    }

    body.push_str(
        "<table>\n<tr><th>When</th><th>Case Type</th><th>Case Number</th><th>Filing Year</th>\
         <th>Source</th><th>Status</th><th>Error</th></tr>\n",
    );
    for q in queries {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            q.queried_at.format("%Y-%m-%d %H:%M:%S"),
            escape(&q.key.case_type),
            escape(&q.key.case_number),
            q.key.filing_year,
            escape(q.source.as_deref().unwrap_or("")),
            status_badge(q.status),
            escape(q.error_message.as_deref().unwrap_or("")),
        );
    }
    body.push_str("</table>\n");
    layout("Search History", nav, &body)
}

/// The full static case table.
pub fn cases_page(nav: Nav, table: &CaseTable) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<p>{} cases available for lookup.</p>", table.len());
    body.push_str(
        "<table>\n<tr><th>Case Type</th><th>Case Number</th><th>Filing Year</th><th>Parties</th>\
         <th>Citation</th><th>Significance</th></tr>\n",
    );
    for record in table.iter() {
        let details = &record.details;
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} v. {}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.key.case_type),
            escape(&record.key.case_number),
            record.key.filing_year,
            escape(details.petitioner_name.as_deref().unwrap_or("")),
            escape(details.respondent_name.as_deref().unwrap_or("")),
            escape(&record.citation),
            escape(&record.significance),
        );
    }
    body.push_str("</table>\n");
    layout("Available Cases", nav, &body)
}

pub fn not_found_page(nav: Nav) -> String {
    layout(
        "Page Not Found",
        nav,
        "<p>The page you asked for does not exist.</p>\n<p><a href=\"/\">Back to search</a></p>\n",
    )
}

/// The 500 page. Rendered without the case-list link, since a panicking
/// handler leaves no state to decide it from.
pub fn error_page() -> String {
    layout(
        "Something Went Wrong",
        Nav { cases: false },
        "<p>An unexpected error occurred. Please try again.</p>\n<p><a href=\"/\">Back to search</a></p>\n",
    )
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

// ── Helpers ──

fn layout(title: &str, nav: Nav, body: &str) -> String {
    let cases_link = if nav.cases {
        "<a href=\"/cases\">Available Cases</a>"
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{STYLE}</style></head>\n<body>\n<nav><a href=\"/\">Search</a><a href=\"/history\">History</a>{cases_link}</nav>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

fn status_badge(status: QueryStatus) -> String {
    let class = match status {
        QueryStatus::Success => "ok",
        QueryStatus::Failed => "failed",
        QueryStatus::Pending => "pending",
    };
    format!("<span class=\"{class}\">{status}</span>")
}

fn details_table(body: &mut String, d: &CaseDetails) {
    body.push_str("<table>\n");
    row(body, "Petitioner", d.petitioner_name.as_deref());
    row(body, "Respondent", d.respondent_name.as_deref());
    row(body, "Filing Date", date(d.filing_date).as_deref());
    row(body, "Next Hearing", date(d.next_hearing_date).as_deref());
    row(body, "Status", d.case_status.as_deref());
    row(body, "Judge / Bench", d.judge_name.as_deref());
    if !d.document_links.is_empty() {
        body.push_str("<tr><th>Documents</th><td><ul>");
        for link in &d.document_links {
            let link = escape(link);
            let _ = write!(body, "<li><a href=\"{link}\">{link}</a></li>");
        }
        body.push_str("</ul></td></tr>\n");
    }
    body.push_str("</table>\n");
}

fn record_table(body: &mut String, r: &CaseRecord) {
    body.push_str("<h2>About this case</h2>\n<table>\n");
    row(body, "Court", Some(&r.court_name));
    row(body, "Citation", Some(&r.citation));
    row(body, "Decision Date", date(r.decision_date).as_deref());
    row(body, "Significance", Some(&r.significance));
    row(
        body,
        "Judgment PDF",
        Some(if r.pdf_available { "Available" } else { NOT_AVAILABLE }),
    );
    body.push_str("</table>\n");
}

fn row(body: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(
        body,
        "<tr><th>{label}</th><td>{}</td></tr>",
        escape(value.unwrap_or(NOT_AVAILABLE))
    );
}

fn date(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%d %B %Y").to_string())
}
