use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::element::element_model::ElementInstance;
use crate::error::{DesignerError, Result};
use crate::form::form_model::{FormRecord, Submission, now_ms};
use crate::persistence::repository::FormRepository;
use crate::persistence::wire::{from_wire, to_wire};

/// Forms kept as JSON files in one directory:
/// `form-<id>.json` per form and `submissions-<id>.jsonl` per form.
#[derive(Debug, Clone)]
pub struct FileFormStore {
    dir: PathBuf,
}

impl FileFormStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| DesignerError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create_form(&self, name: &str, description: &str) -> Result<FormRecord> {
        let next_id = self
            .list_forms()?
            .iter()
            .map(|f| f.id)
            .max()
            .unwrap_or(0)
            + 1;
        let form = FormRecord::new(next_id, name, description);
        self.write_form(&form)?;
        info!(form_id = form.id, name, "form created");
        Ok(form)
    }

    /// All forms, newest first.
    pub fn list_forms(&self) -> Result<Vec<FormRecord>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| DesignerError::io(&self.dir, e))?;

        let mut forms = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DesignerError::io(&self.dir, e))?.path();
            let is_form = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("form-") && n.ends_with(".json"))
                .unwrap_or(false);
            if is_form {
                forms.push(read_form(&path)?);
            }
        }

        forms.sort_by(|a, b| {
            b.created_at_ms
                .cmp(&a.created_at_ms)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(forms)
    }

    pub fn get_form(&self, id: u64) -> Result<FormRecord> {
        let path = self.form_path(id);
        if !path.exists() {
            return Err(DesignerError::FormNotFound(id.to_string()));
        }
        read_form(&path)
    }

    pub fn publish_form(&self, id: u64) -> Result<FormRecord> {
        let mut form = self.get_form(id)?;
        form.published = true;
        self.write_form(&form)?;
        info!(form_id = id, share_url = %form.share_url, "form published");
        Ok(form)
    }

    pub fn find_by_share_url(&self, share_url: &str) -> Result<FormRecord> {
        self.list_forms()?
            .into_iter()
            .find(|f| f.share_url == share_url)
            .ok_or_else(|| DesignerError::FormNotFound(share_url.to_string()))
    }

    /// Count one visit of the public submission page.
    pub fn record_visit(&self, share_url: &str) -> Result<FormRecord> {
        let mut form = self.find_by_share_url(share_url)?;
        form.visits += 1;
        self.write_form(&form)?;
        Ok(form)
    }

    /// Content for the public submission page. Counts as a visit.
    pub fn content_by_share_url(&self, share_url: &str) -> Result<Vec<ElementInstance>> {
        from_wire(&self.record_visit(share_url)?.content)
    }

    /// Record a submission. Only published forms accept them.
    pub fn submit(&self, share_url: &str, values: BTreeMap<String, String>) -> Result<Submission> {
        let mut form = self.find_by_share_url(share_url)?;
        if !form.published {
            return Err(DesignerError::FormNotPublished(share_url.to_string()));
        }

        let submission = Submission {
            form_id: form.id,
            created_at_ms: now_ms(),
            values,
        };
        let line = serde_json::to_string(&submission)
            .map_err(|e| DesignerError::json("serialize submission", e))?;

        let path = self.submissions_path(form.id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DesignerError::io(&path, e))?;
        writeln!(file, "{}", line).map_err(|e| DesignerError::io(&path, e))?;

        form.submissions += 1;
        self.write_form(&form)?;
        debug!(form_id = form.id, "submission recorded");
        Ok(submission)
    }

    pub fn submissions(&self, id: u64) -> Result<Vec<Submission>> {
        let path = self.submissions_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path).map_err(|e| DesignerError::io(&path, e))?;
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(|e| DesignerError::json("parse submission", e)))
            .collect()
    }

    fn form_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("form-{}.json", id))
    }

    fn submissions_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("submissions-{}.jsonl", id))
    }

    /// Write to a sibling temp file, then rename over the record.
    fn write_form(&self, form: &FormRecord) -> Result<()> {
        let path = self.form_path(form.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(form)
            .map_err(|e| DesignerError::json(format!("serialize form {}", form.id), e))?;
        fs::write(&tmp, json).map_err(|e| DesignerError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| DesignerError::io(&path, e))
    }
}

fn read_form(path: &Path) -> Result<FormRecord> {
    let raw = fs::read_to_string(path).map_err(|e| DesignerError::io(path, e))?;
    serde_json::from_str(&raw)
        .map_err(|e| DesignerError::json(format!("parse {}", path.display()), e))
}

fn parse_form_id(form_id: &str) -> Result<u64> {
    form_id
        .parse()
        .map_err(|_| DesignerError::FormNotFound(form_id.to_string()))
}

impl FormRepository for FileFormStore {
    fn load_document(&self, form_id: &str) -> Result<Vec<ElementInstance>> {
        let form = self.get_form(parse_form_id(form_id)?)?;
        from_wire(&form.content)
    }

    fn save_document(&self, form_id: &str, elements: &[ElementInstance]) -> Result<()> {
        let mut form = self.get_form(parse_form_id(form_id)?)?;
        if form.published {
            return Err(DesignerError::FormPublished(form.id));
        }
        form.content = to_wire(elements)?;
        self.write_form(&form)?;
        info!(form_id = form.id, elements = elements.len(), "form content saved");
        Ok(())
    }
}
