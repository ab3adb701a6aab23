use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cli::config::AppConfig;
use crate::designer::session::{DesignerSession, GestureOutcome};
use crate::element::element_model::{Attributes, ElementId, ElementTypeTag, SequentialIds};
use crate::element::registry::{ElementRegistry, RenderContext};
use crate::error::DesignerError;
use crate::form::stats::FormStats;
use crate::form::submission::{columns, validate_submission};
use crate::gesture::gesture_model::DragToken;
use crate::persistence::file_store::FileFormStore;
use crate::persistence::http_store::HttpFormStore;
use crate::persistence::repository::FormRepository;
use crate::report::console::{format_console_report, format_document};
use crate::script::runner::{ScriptRunner, load_scripts};
use crate::trace::logger::TraceLogger;

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Everything a subcommand needs, resolved once from CLI + config.
pub struct CommandContext {
    pub config: AppConfig,
    pub registry: Arc<ElementRegistry>,
    pub verbose: u8,
}

impl CommandContext {
    pub fn new(config: AppConfig, registry: Arc<ElementRegistry>, verbose: u8) -> Self {
        Self {
            config,
            registry,
            verbose,
        }
    }

    pub fn file_store(&self) -> CmdResult<FileFormStore> {
        Ok(FileFormStore::open(&self.config.store.dir)?)
    }

    /// Content repository for the configured backend.
    pub fn repository(&self) -> CmdResult<Box<dyn FormRepository>> {
        match self.config.store.backend.as_str() {
            "http" => {
                let endpoint = self
                    .config
                    .store
                    .endpoint
                    .as_deref()
                    .ok_or("store.endpoint is required for the http backend")?;
                let store = HttpFormStore::new(
                    endpoint,
                    self.config.store.timeout_ms,
                    self.config.store.retries,
                )?
                .with_backoff(Duration::from_millis(self.config.store.backoff_ms));
                Ok(Box::new(store))
            }
            "file" => Ok(Box::new(self.file_store()?)),
            other => Err(format!("unknown store backend '{}' (expected file or http)", other).into()),
        }
    }

    /// Open a session on a form with its saved content loaded.
    pub fn open_session(&self, repo: &dyn FormRepository, form: u64) -> CmdResult<DesignerSession> {
        let mut session = DesignerSession::new(form.to_string(), Arc::clone(&self.registry));
        if let Some(path) = &self.config.designer.trace_file {
            session = session.with_tracer(TraceLogger::new(path));
        }
        session.load(repo)?;

        if self.config.designer.id_strategy == "sequential" {
            let ids = SequentialIds::after(&session.snapshot().elements);
            session = session.with_ids(ids);
        }
        Ok(session)
    }
}

// ============================================================================
// Form lifecycle
// ============================================================================

pub fn cmd_create(ctx: &CommandContext, name: &str, description: &str) -> CmdResult {
    let form = ctx.file_store()?.create_form(name, description)?;
    println!("Created form {} ({})", form.id, form.name);
    Ok(())
}

pub fn cmd_list(ctx: &CommandContext) -> CmdResult {
    let forms = ctx.file_store()?.list_forms()?;
    if forms.is_empty() {
        println!("No forms yet.");
        return Ok(());
    }

    for form in &forms {
        let status = if form.published { "published" } else { "draft" };
        println!(
            "  [{}] {} — {} ({} visits, {} submissions)",
            form.id, form.name, status, form.visits, form.submissions
        );
    }
    Ok(())
}

pub fn cmd_palette(ctx: &CommandContext) -> CmdResult {
    for (tag, label) in ctx.registry.palette() {
        println!("  {:<12} {}", tag, label);
    }
    Ok(())
}

pub fn cmd_show(ctx: &CommandContext, form: u64) -> CmdResult {
    let repo = ctx.repository()?;
    let session = ctx.open_session(repo.as_ref(), form)?;
    print!("{}", format_document(&session.snapshot(), &ctx.registry));
    Ok(())
}

pub fn cmd_publish(ctx: &CommandContext, form: u64) -> CmdResult {
    let record = ctx.file_store()?.publish_form(form)?;
    println!("Published form {}. Share link: /submit/{}", record.id, record.share_url);
    Ok(())
}

/// Fill in a published form the way the public submission page does.
///
/// Form records and counters live in the local store; the content comes from
/// the configured backend, which is where the designer saved it.
pub fn cmd_submit(ctx: &CommandContext, share_url: &str, raw_values: &[String]) -> CmdResult {
    let store = ctx.file_store()?;
    let form = store.record_visit(share_url)?;
    let elements = ctx.repository()?.load_document(&form.id.to_string())?;

    let mut values = BTreeMap::new();
    for raw in raw_values {
        let (id, value) = split_pair(raw)?;
        values.insert(id.to_string(), value.to_string());
    }

    let invalid = validate_submission(&elements, &values, &ctx.registry)?;
    if !invalid.is_empty() {
        let ids: Vec<&str> = invalid.iter().map(ElementId::as_str).collect();
        return Err(format!("invalid values for: {}", ids.join(", ")).into());
    }

    store.submit(share_url, values)?;
    println!("Submission recorded.");
    Ok(())
}

pub fn cmd_stats(ctx: &CommandContext, form: Option<u64>) -> CmdResult {
    let store = ctx.file_store()?;

    let stats = match form {
        Some(id) => {
            let record = store.get_form(id)?;
            let elements = ctx.repository()?.load_document(&id.to_string())?;
            let cols = columns(&elements, &ctx.registry);
            let submissions = store.submissions(id)?;

            println!("Form {}: {}", record.id, record.name);
            let header: Vec<String> = cols.iter().map(|c| c.label.to_uppercase()).collect();
            println!("  {} | SUBMITTED AT (ms)", header.join(" | "));
            for sub in &submissions {
                let row: Vec<&str> = cols
                    .iter()
                    .map(|c| sub.values.get(c.id.as_str()).map(String::as_str).unwrap_or(""))
                    .collect();
                println!("  {} | {}", row.join(" | "), sub.created_at_ms);
            }
            FormStats::for_form(&record)
        }
        None => FormStats::aggregate(&store.list_forms()?),
    };

    println!("Total visits:      {}", stats.visits);
    println!("Total submissions: {}", stats.submissions);
    println!("Submission rate:   {:.1}%", stats.submission_rate);
    println!("Bounce rate:       {:.1}%", stats.bounce_rate);
    Ok(())
}

// ============================================================================
// Editing: every change goes through a designer session and is saved
// ============================================================================

/// Drop a palette button on the canvas or on one half of an element.
pub fn cmd_add(
    ctx: &CommandContext,
    form: u64,
    element_type: &str,
    before: Option<&str>,
    after: Option<&str>,
) -> CmdResult {
    let repo = ctx.repository()?;
    let mut session = ctx.open_session(repo.as_ref(), form)?;

    let dragged = DragToken::palette(ElementTypeTag::new(element_type));
    let target = drop_target(before, after).unwrap_or(DragToken::DropArea);

    let outcome = finish_gesture(&mut session, dragged, target)?;
    if session.is_dirty() {
        session.save(repo.as_ref())?;
    }
    report_outcome(ctx, &session, &outcome);
    Ok(())
}

/// Drag an element's handle onto the top or bottom half of another.
pub fn cmd_move(
    ctx: &CommandContext,
    form: u64,
    element: &str,
    before: Option<&str>,
    after: Option<&str>,
) -> CmdResult {
    let repo = ctx.repository()?;
    let mut session = ctx.open_session(repo.as_ref(), form)?;

    let target = drop_target(before, after).ok_or("move needs --before or --after")?;
    let outcome = finish_gesture(&mut session, DragToken::element(element), target)?;
    if session.is_dirty() {
        session.save(repo.as_ref())?;
    }
    report_outcome(ctx, &session, &outcome);
    Ok(())
}

pub fn cmd_remove(ctx: &CommandContext, form: u64, element: &str) -> CmdResult {
    let repo = ctx.repository()?;
    let mut session = ctx.open_session(repo.as_ref(), form)?;
    session.remove_element(&ElementId::new(element))?;
    if session.is_dirty() {
        session.save(repo.as_ref())?;
        println!("Removed {}", element);
    } else {
        println!("No element {} on form {}", element, form);
    }
    Ok(())
}

pub fn cmd_set(ctx: &CommandContext, form: u64, element: &str, raw_attrs: &[String]) -> CmdResult {
    let repo = ctx.repository()?;
    let mut session = ctx.open_session(repo.as_ref(), form)?;
    let id = ElementId::new(element);

    let mut changes = Attributes::new();
    for raw in raw_attrs {
        let (key, value) = split_pair(raw)?;
        changes.insert(key.to_string(), parse_value(value));
    }

    session.select(&id)?;
    let doc = session.edit_attributes(&id, changes)?;
    session.save(repo.as_ref())?;

    if let Some(el) = doc.get(&id) {
        let behavior = ctx.registry.get(&el.element_type)?;
        println!("{}", behavior.render(el, RenderContext::Properties).to_text());
    }
    Ok(())
}

pub fn cmd_run(ctx: &CommandContext, script_path: &str) -> CmdResult<bool> {
    let scripts = load_scripts(script_path)?;

    if scripts.is_empty() {
        eprintln!("No design scripts found at: {}", script_path);
        return Ok(true);
    }

    if ctx.verbose > 0 {
        eprintln!("Running {} design scripts...", scripts.len());
    }

    let results: Vec<_> = scripts
        .iter()
        .map(|script| ScriptRunner::run(script, Arc::clone(&ctx.registry)))
        .collect();

    print!("{}", format_console_report(script_path, &results));
    Ok(results.iter().all(|r| r.passed))
}

// ============================================================================
// Helpers
// ============================================================================

fn drop_target(before: Option<&str>, after: Option<&str>) -> Option<DragToken> {
    match (before, after) {
        (Some(id), _) => Some(DragToken::top_of(id)),
        (None, Some(id)) => Some(DragToken::bottom_of(id)),
        (None, None) => None,
    }
}

fn finish_gesture(
    session: &mut DesignerSession,
    dragged: DragToken,
    target: DragToken,
) -> Result<GestureOutcome, DesignerError> {
    session.drag_start(dragged);
    session.drag_over(Some(target));
    session.drop_tracked()
}

fn report_outcome(ctx: &CommandContext, session: &DesignerSession, outcome: &GestureOutcome) {
    match outcome {
        GestureOutcome::NoOp => println!("Nothing to do: the drop target does not accept this element."),
        GestureOutcome::Dropped(reason) => println!("Gesture dropped: {}", reason),
        other => println!("Done: {}", other),
    }
    if ctx.verbose > 0 {
        print!("{}", format_document(&session.snapshot(), &ctx.registry));
    }
}

/// `key=value` with the value possibly empty.
pub fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

/// JSON literals (`true`, `42`, `"x"`) as JSON, anything else as a string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
