//! Interactive report entry.

use anyhow::{bail, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use fastman_client::resources::{maintenance, Checklist, Variable};
use fastman_client::ApiResponse;
use fastman_forms::reports::{
    ChecklistReport, FailureReport, ProductionReport, VariableReadingReport, WorkOrderExecution,
};
use fastman_forms::{
    submit, CascadeDriver, LevelStatus, ReportForm, SelectionForm, Session, SubmissionContext,
    SubmitError,
};
use tracing::{info, warn};

use crate::context::{AppContext, Tone};
use crate::ReportKind;

pub async fn run(ctx: &mut AppContext, kind: ReportKind) -> Result<()> {
    let session = ctx.require_session().await?;
    let ctx = &*ctx;
    match kind {
        ReportKind::Failure => fill_and_submit(ctx, &session, FailureReport::new()).await,
        ReportKind::Production => fill_and_submit(ctx, &session, ProductionReport::new()).await,
        ReportKind::Reading => fill_and_submit(ctx, &session, VariableReadingReport::new()).await,
        ReportKind::Checklist => fill_and_submit(ctx, &session, ChecklistReport::new()).await,
        ReportKind::WorkOrder => {
            let report = WorkOrderExecution::new(session.personnel_id);
            fill_and_submit(ctx, &session, report).await
        }
    }
}

async fn fill_and_submit<F: ReportForm>(ctx: &AppContext, session: &Session, mut report: F) -> Result<()> {
    let driver = CascadeDriver::new(&ctx.client);
    ctx.say(Tone::Heading, format!("New {} report", report.name()));
    driver.mount(report.selection_mut()).await;

    loop {
        fill_levels(ctx, &driver, report.selection_mut()).await?;
        fill_texts(ctx, report.selection_mut())?;
        print_summary(report.selection());

        if !ctx.confirm("Submit?", true)? {
            if ctx.confirm("Edit the report?", true)? {
                continue;
            }
            ctx.say(Tone::Info, "Discarded");
            return Ok(());
        }

        match submit(&ctx.client, &report, &SubmissionContext::now(session)).await {
            Ok(created) => {
                info!(report = report.name(), id = created.id, "Report submitted");
                let reference = created.code.unwrap_or_else(|| format!("#{}", created.id));
                ctx.say(Tone::Success, format!("Submitted {}", reference));
                report.selection_mut().clear_all();
                return Ok(());
            }
            Err(e @ (SubmitError::Validation { .. } | SubmitError::InvalidField { .. })) => {
                ctx.say(Tone::Warning, e.to_string());
            }
            Err(SubmitError::Remote(message)) => {
                warn!(report = report.name(), error = %message, "Report rejected by server");
                ctx.say(Tone::Warning, format!("Server rejected the report: {}", message));
                if !ctx.confirm("Edit and retry?", true)? {
                    return Ok(());
                }
            }
        }
    }
}

async fn fill_levels(ctx: &AppContext, driver: &CascadeDriver<'_>, form: &mut SelectionForm) -> Result<()> {
    let levels: Vec<_> = form
        .levels()
        .iter()
        .map(|l| (l.key(), l.label(), l.is_required()))
        .collect();

    'levels: for (key, label, required) in levels {
        loop {
            match form.status(key).cloned() {
                Some(LevelStatus::Ready) => break,
                // Parent left empty on purpose
                Some(LevelStatus::Idle) if !required => continue 'levels,
                Some(LevelStatus::Error(message)) => {
                    ctx.say(Tone::Warning, format!("{}: {}", label, message));
                    if !ctx.confirm("Retry?", true)? {
                        bail!("{} could not be loaded", label);
                    }
                    driver.refresh(form, key).await?;
                }
                _ => bail!("{} is not loaded", label),
            }
        }

        let options = form.options(key);
        if options.is_empty() {
            if required {
                bail!("No options available for {}", label);
            }
            continue;
        }

        let mut labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let offset = usize::from(!required);
        if !required {
            labels.insert(0, "(none)");
        }
        let current = form
            .selected(key)
            .and_then(|id| options.iter().position(|o| o.id == id))
            .map(|i| i + offset)
            .unwrap_or(0);

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .items(&labels)
            .default(current)
            .interact()?;

        match choice.checked_sub(offset) {
            Some(index) => {
                let id = options[index].id;
                driver.select(form, key, id).await?;
                show_details(ctx, form, key).await;
            }
            None => form.clear(key)?,
        }
    }
    Ok(())
}

fn fill_texts(ctx: &AppContext, form: &mut SelectionForm) -> Result<()> {
    let theme = ColorfulTheme::default();
    for field in form.texts().to_vec() {
        let value: String = Input::with_theme(&theme)
            .with_prompt(field.label)
            .with_initial_text(form.text(field.key))
            .allow_empty(!field.required)
            .interact_text()?;
        form.set_text(field.key, value)?;
    }
    Ok(())
}

/// Extra context for records that carry more than a label.
async fn show_details(ctx: &AppContext, form: &SelectionForm, key: &str) {
    if let Some(checklist) = form.selected_record::<Checklist>(key) {
        match maintenance::checklist_items(&ctx.client, checklist.id).await {
            ApiResponse::Success(items) => {
                for item in items {
                    println!("  {}. {}", item.order, item.description);
                }
            }
            ApiResponse::Failure(message) => {
                ctx.say(Tone::Warning, format!("Checklist items unavailable: {}", message))
            }
        }
    } else if let Some(variable) = form.selected_record::<Variable>(key) {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
        let range = format!(
            "Range {} to {} {}",
            bound(variable.min),
            bound(variable.max),
            variable.unit.as_deref().unwrap_or("")
        );
        ctx.say(Tone::Info, range);
    }
}

fn print_summary(form: &SelectionForm) {
    println!();
    for level in form.levels() {
        let value = level
            .selected_entry()
            .map(|e| e.label.as_str())
            .unwrap_or("-");
        println!("  {:<20} {}", style(level.label()).dim(), value);
    }
    for field in form.texts() {
        let value = form.text(field.key);
        println!(
            "  {:<20} {}",
            style(field.label).dim(),
            if value.is_empty() { "-" } else { value }
        );
    }
}
