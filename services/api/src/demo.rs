use crate::infra::build_context;
use chrono::NaiveDate;
use legatepro::auth::service::Credentials;
use legatepro::config::AppConfig;
use legatepro::error::AppError;
use legatepro::estates::domain::{DecedentProfile, NewEstate};
use legatepro::finance::domain::NewInvoice;
use legatepro::records::domain::{DocumentCategory, NewDocument, NewTask};
use serde_json::json;

/// Seed an estate end to end and print the resulting readiness plan.
pub(crate) async fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ctx = build_context(&config);

    let session = ctx
        .auth
        .register(Credentials {
            email: "demo-executor@example.com".to_string(),
            password: "demo-password-123".to_string(),
        })
        .map_err(demo_failure)?;
    let user = session.user.id;

    let estate = ctx
        .estates
        .create(
            user,
            NewEstate {
                decedent: DecedentProfile {
                    full_name: "Edith Crane".to_string(),
                    date_of_death: NaiveDate::from_ymd_opt(2026, 3, 14),
                    case_reference: Some("PR-2026-00412".to_string()),
                    court: Some("Polk County Probate".to_string()),
                },
            },
        )
        .map_err(demo_failure)?;

    ctx.records
        .create_document(
            user,
            estate.id,
            NewDocument {
                label: "Certified death certificate".to_string(),
                category: DocumentCategory::DeathCertificate,
                location: Some("drive://estates/crane/death-cert.pdf".to_string()),
                tags: vec!["vital-records".to_string()],
                is_sensitive: true,
                file: Default::default(),
            },
        )
        .map_err(demo_failure)?;

    ctx.records
        .create_task(
            user,
            estate.id,
            NewTask {
                title: "File the will with the probate court".to_string(),
                details: None,
                due_on: NaiveDate::from_ymd_opt(2026, 4, 1),
            },
        )
        .map_err(demo_failure)?;

    ctx.finance
        .create_invoice(
            user,
            estate.id,
            NewInvoice {
                amount: json!(350.00),
                counterparty: "Clerk of Court".to_string(),
                issued_on: NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date"),
                due_on: None,
            },
        )
        .map_err(demo_failure)?;

    let plan = ctx
        .readiness
        .plan(user, estate.id, false)
        .await
        .map_err(demo_failure)?;

    println!("Estate: {} ({})", estate.decedent.full_name, estate.id);
    println!("Readiness: {}/100 - {}", plan.score, plan.summary);
    for signal in &plan.signals {
        println!("  signal: {}", signal.detail);
    }
    for step in &plan.steps {
        println!("  [{}] {} - {}", step.priority, step.title, step.rationale);
    }

    Ok(())
}

fn demo_failure(err: impl std::fmt::Display) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}
