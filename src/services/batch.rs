use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::ToolError;
use crate::services::render::{RenderReport, RenderService, RenderTargets};

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<RenderReport>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// PNG files directly inside `dir`, sorted by name
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ToolError::io(dir, e))?;
    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ToolError::io(dir, e))?.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Renders many files in parallel.
///
/// Every image gets its own pipeline run; the shared [`RenderService`] is
/// only read, so renders do not interact.
pub struct BatchService<'a> {
    service: &'a RenderService,
    out_dir: PathBuf,
    previews: bool,
}

impl<'a> BatchService<'a> {
    pub fn new(service: &'a RenderService, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            out_dir: out_dir.into(),
            previews: false,
        }
    }

    /// Also write `<name>.preview.png` next to every frame
    pub fn previews(mut self, enabled: bool) -> Self {
        self.previews = enabled;
        self
    }

    /// Output paths for one input: `<out_dir>/<stem>.bin` and the preview
    fn targets_for(&self, input: &Path) -> (PathBuf, RenderTargets) {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        let output = self.out_dir.join(format!("{stem}.bin"));
        let targets = RenderTargets {
            preview: self
                .previews
                .then(|| self.out_dir.join(format!("{stem}.preview.png"))),
            adjusted: None,
        };
        (output, targets)
    }

    /// Render every input. A failing image is recorded and does not stop
    /// the others.
    ///
    /// Inputs whose frame file would collide with an earlier input's (such
    /// as `a.png` and `a.PNG`) are recorded as failures instead of racing
    /// for the same file. Names are compared case-insensitively.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<BatchReport, ToolError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| ToolError::io(&self.out_dir, e))?;

        let mut report = BatchReport::default();
        let mut claimed: HashMap<String, &Path> = HashMap::new();
        let mut jobs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let (output, targets) = self.targets_for(input);
            match claimed.entry(output.to_string_lossy().to_lowercase()) {
                Entry::Occupied(first) => {
                    let reason = format!(
                        "{} is already written for {}",
                        output.display(),
                        first.get().display()
                    );
                    tracing::warn!(input = %input.display(), %reason, "Skipping duplicate");
                    report.failed.push((input.clone(), reason));
                }
                Entry::Vacant(slot) => {
                    slot.insert(input.as_path());
                    jobs.push((input, output, targets));
                }
            }
        }

        let results: Vec<(PathBuf, Result<RenderReport, ToolError>)> = jobs
            .par_iter()
            .map(|(input, output, targets)| {
                (
                    input.to_path_buf(),
                    self.service.render_file(input, output, targets),
                )
            })
            .collect();

        for (input, result) in results {
            match result {
                Ok(rendered) => report.rendered.push(rendered),
                Err(e) => {
                    tracing::warn!(input = %input.display(), %e, "Render failed");
                    report.failed.push((input, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}
