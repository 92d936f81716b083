//! stlview - view a binary STL mesh in the terminal
//!
//! Controls:
//!   - WASD / Arrow Keys: Rotate the mesh
//!   - E: Roll
//!   - Tab / Shift-Tab: Pick a control
//!   - + / - (or ] / [): Step the control
//!   - R: Reset the control to its initial value
//!   - P: Toggle perspective / orthographic projection
//!   - Q/ESC: Quit

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stlview_core::{ControlPanel, ParameterName, Renderer, StlDecoder, ViewerConfig};
use stlview_terminal::{log_filter, TerminalApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stlview", version, about = "Interactive terminal viewer for binary STL meshes")]
struct Cli {
    /// Binary STL file to display
    #[arg(required_unless_present_any = ["print_controls", "print_config"])]
    path: Option<PathBuf>,

    /// TOML file with initial control positions
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial mesh color (CSS color name)
    #[arg(long)]
    color: Option<String>,

    /// Initial opacity level (0-20, value = level * 0.05)
    #[arg(long, value_name = "LEVEL")]
    opacity: Option<usize>,

    /// Initial ambient lighting level (0-20)
    #[arg(long, value_name = "LEVEL")]
    ambient: Option<usize>,

    /// Initial diffuse lighting level (0-20)
    #[arg(long, value_name = "LEVEL")]
    diffuse: Option<usize>,

    /// Initial roughness level (0-20)
    #[arg(long, value_name = "LEVEL")]
    roughness: Option<usize>,

    /// Initial specular lighting level (0-20)
    #[arg(long, value_name = "LEVEL")]
    specular: Option<usize>,

    /// Reject triangles with a nonzero attribute byte count
    #[arg(long)]
    strict: bool,

    /// Print every control's selectable values and exit
    #[arg(long)]
    print_controls: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ViewerConfig::default(),
        };

        if let Some(color) = &self.color {
            config.color = color.clone();
        }
        let levels = [
            (ParameterName::Opacity, self.opacity),
            (ParameterName::Ambient, self.ambient),
            (ParameterName::Diffuse, self.diffuse),
            (ParameterName::Roughness, self.roughness),
            (ParameterName::Specular, self.specular),
        ];
        for (name, level) in levels {
            if let Some(level) = level {
                config.set_level(name, level);
            }
        }

        config.validate().context("invalid initial control values")?;
        Ok(config)
    }
}

fn print_controls(panel: &ControlPanel) {
    for binding in panel.bindings() {
        let labels = binding.labels();
        println!(
            "{} ({}): {} values, initial {}",
            binding.parameter().title(),
            binding.parameter().render_path(),
            labels.len(),
            binding.current_label()
        );
        println!("  {}", labels.join(" "));
    }
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.viewer_config()?;
    let panel = ControlPanel::from_config(&config).context("failed to build controls")?;

    if cli.print_config {
        print!("{}", config.to_toml_string().context("failed to encode config")?);
        return Ok(());
    }
    if cli.print_controls {
        print_controls(&panel);
        return Ok(());
    }

    let path = cli.path.context("no STL file given")?;
    let decoder = if cli.strict {
        StlDecoder::strict()
    } else {
        StlDecoder::new()
    };
    let mesh = decoder
        .load(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        policy = ?decoder.policy(),
        "decoded mesh"
    );

    let initial = panel.initial_updates();
    let mut app = TerminalApp::new(panel).context("failed to query terminal size")?;
    app.load_mesh(Arc::new(mesh));
    for update in &initial {
        app.apply_update(update);
    }
    app.run().context("terminal error")?;

    Ok(())
}
