//! Application orchestration for one generate (and optional export) run.

use crate::controller::{Controller, FormState};
use crate::export::{export_record, ExportSink, FileExportSink};
use crate::generator::{GeneratorClient, GeneratorService};
use crate::models::{Config, PowerLevel};
use crate::render::{self, FormView};
use crate::Result;
use clap::ValueEnum;
use tracing::{info, warn};

/// How a finished run is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Form status followed by the character as terminal text.
    #[default]
    Text,
    /// Standalone HTML page with the form and character.
    Html,
    /// The exported JSON record only.
    Json,
}

/// Raw form inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub yokai_type: String,
    pub power_level: PowerLevel,
    pub element: String,
    pub export: bool,
}

/// Final form state of a run plus where the export landed, if anywhere.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: FormState,
    pub exported_to: Option<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.state.character().is_some() && self.state.error().is_none()
    }
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub generator: Box<dyn GeneratorService>,
    pub sink: Box<dyn ExportSink>,
}

/// Wires the controller to a generation service and an export sink.
pub struct App {
    controller: Controller,
    sink: Box<dyn ExportSink>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            controller: Controller::new(services.generator),
            sink: services.sink,
        }
    }

    /// Construct an app from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        info!("Generation endpoint: {}", config.api_url);
        match config.request_timeout {
            Some(timeout) => info!("Request timeout: {}s", timeout.as_secs()),
            None => info!("Request timeout: none"),
        }

        let generator = GeneratorClient::new(config.api_url.clone(), config.request_timeout)?;
        let sink = FileExportSink::new(config.export_dir.clone());

        Ok(Self::with_services(AppServices {
            generator: Box::new(generator),
            sink: Box::new(sink),
        }))
    }

    /// Fill in the form, generate once, and export when asked to.
    ///
    /// Generation failures are recorded in the returned state rather than
    /// returned as errors; only export delivery can fail the run.
    pub async fn run(&self, request: RunRequest) -> Result<RunReport> {
        self.controller.set_yokai_type(request.yokai_type);
        self.controller.set_power_level(request.power_level);
        self.controller.set_element(request.element);

        let exported_to = match self.controller.generate().await {
            Ok(character) if request.export => {
                let artifact = export_record(&character)?;
                Some(self.sink.deliver(&artifact).await?)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Generation did not produce a character: {}", e);
                None
            }
        };

        Ok(RunReport {
            state: self.controller.snapshot(),
            exported_to,
        })
    }
}

/// Render a finished run in the requested format.
pub fn render_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    let form = FormView::from_state(&report.state);
    let mut out = match format {
        OutputFormat::Text => {
            let mut out = render::render_status(&form);
            if let Some(character) = &form.character {
                out.push_str("\n\n");
                out.push_str(&render::render_character(character));
            }
            out
        }
        OutputFormat::Html => render::render_page(&form),
        OutputFormat::Json => match report.state.character() {
            Some(character) => String::from_utf8_lossy(&export_record(character)?.contents).into_owned(),
            None => String::new(),
        },
    };

    if let Some(path) = &report.exported_to {
        if format == OutputFormat::Text {
            out.push_str(&format!("\n📥 Exported to {}\n", path));
        }
    }
    Ok(out)
}
