//! Loading payload files and rendering form progress as text.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context};

use intake_core::completion::missing_required;
use intake_core::{DatePart, Field, FormData, FormSession, Section};

/// Read a payload file into form data, reporting the exact path of any bad value.
pub fn load_form_data(path: &Path) -> anyhow::Result<FormData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&text);
    serde_path_to_error::deserialize(de).map_err(|e| {
        anyhow::anyhow!(
            "{}: invalid value at '{}': {}",
            path.display(),
            e.path(),
            e.inner()
        )
    })
}

/// Apply one `key=value` override to the session.
///
/// Keys are field keys (`serviceUser.firstName`), date parts
/// (`serviceUser.dateOfBirth.day`) or `consent`.
pub fn apply_override(session: &mut FormSession, assignment: &str) -> anyhow::Result<()> {
    let Some((key, value)) = assignment.split_once('=') else {
        bail!("override '{assignment}' must look like key=value");
    };
    let key = key.trim();

    if key == "consent" {
        let consent: bool = value
            .trim()
            .parse()
            .with_context(|| format!("consent must be true or false, got '{value}'"))?;
        session.set_consent(consent)?;
        return Ok(());
    }

    if let Ok(field) = key.parse::<Field>() {
        session.set_text(field, value)?;
        return Ok(());
    }

    let (field_key, part) = key
        .rsplit_once('.')
        .with_context(|| format!("unknown form field: {key}"))?;
    let field: Field = field_key.parse()?;
    let part: DatePart = part
        .parse()
        .with_context(|| format!("unknown form field: {key}"))?;
    session.set_date_part(field, part, value)?;
    Ok(())
}

/// Multi-line progress report for a session.
pub fn render_status(session: &FormSession) -> String {
    let status = session.status();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Progress: {}/{} required fields ({}%)",
        status.completed,
        status.total_required,
        status.progress_percent()
    );
    let _ = writeln!(out, "Current: {}", session.current_section());

    for section in Section::ALL {
        let mark = if status.section_complete(section) { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] {section}");
        if !status.section_complete(section) {
            let missing = missing_required(section, session.data(), session.errors());
            let labels: Vec<&str> = missing.iter().map(|f| f.key()).collect();
            let _ = writeln!(out, "    missing: {}", labels.join(", "));
        }
    }

    let mark = if status.consent_complete { "x" } else { " " };
    let _ = writeln!(out, "[{mark}] Consent");

    if !session.errors().is_empty() {
        let _ = writeln!(out, "Warnings:");
        for (field, message) in session.errors() {
            let _ = writeln!(out, "  {field}: {message}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn loads_complete_fixture() {
        let data = load_form_data(&fixture("complete.json")).expect("fixture");
        let session = FormSession::from_data(data);
        assert!(session.status().is_submittable());

        let report = render_status(&session);
        assert!(report.starts_with("Progress: 24/24 required fields (100%)"));
        assert!(!report.contains("missing:"));
        assert!(!report.contains("Warnings:"));
    }

    #[test]
    fn partial_fixture_lists_missing_and_warnings() {
        let data = load_form_data(&fixture("partial.json")).expect("fixture");
        let session = FormSession::from_data(data);

        let report = render_status(&session);
        assert!(report.contains("Progress: 2/24"), "{report}");
        assert!(report.contains("serviceUser.firstName: First name must be at least 3"));
        assert!(report.contains("serviceUser.email: Please enter a valid email address"));
        assert!(report.contains("[ ] Section 1: Service User Details"));
        assert!(report.contains("[ ] Consent"));
    }

    #[test]
    fn reports_path_of_bad_values() {
        let dir = std::env::temp_dir().join(format!("intake-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"serviceUserDetails":{"dateOfBirth":{"day":5}}}"#)
            .expect("write");

        let err = load_form_data(&path).expect_err("day must be a string");
        assert!(
            err.to_string()
                .contains("serviceUserDetails.dateOfBirth.day"),
            "{err}"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn overrides_cover_text_date_and_consent() {
        let mut session = FormSession::new();
        apply_override(&mut session, "serviceUser.firstName=Jane").expect("text");
        apply_override(&mut session, "serviceUser.dateOfBirth.year=1950").expect("date");
        apply_override(&mut session, "consent=true").expect("consent");

        assert_eq!(session.data().service_user_details.first_name, "Jane");
        assert_eq!(session.data().service_user_details.date_of_birth.year, "1950");
        assert!(session.data().consent);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut session = FormSession::new();
        assert!(apply_override(&mut session, "serviceUser.firstName").is_err());
        assert!(apply_override(&mut session, "serviceUser.shoeSize=9").is_err());
        assert!(apply_override(&mut session, "serviceUser.dateOfBirth=1950").is_err());
        assert!(apply_override(&mut session, "serviceUser.firstName.day=1").is_err());
        assert!(apply_override(&mut session, "consent=maybe").is_err());
    }
}
