use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mahatools::grid::{A4_PRINTABLE, QuantityChoice, SizePreset};
use mahatools::imaging::{RustBackend, encode_jpeg};
use mahatools::invoice::{Invoice, ItemDraft};
use mahatools::passport::{PassportSettings, PassportTool};
use mahatools::resume::{ResumeField, ResumeMirror};
use mahatools::{compress, config, output, render};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Passport sheet form fields shared by `passport` and `grid`.
///
/// Anything left out comes from the `[passport]` section of config.toml.
#[derive(clap::Args, Clone)]
struct SheetArgs {
    /// Print size: indian, stamp, visa, pan or custom
    #[arg(long)]
    preset: Option<SizePreset>,

    /// Custom photo width in mm (implies --preset custom when no preset is given)
    #[arg(long, allow_hyphen_values = true)]
    width_mm: Option<String>,

    /// Custom photo height in mm (implies --preset custom when no preset is given)
    #[arg(long, allow_hyphen_values = true)]
    height_mm: Option<String>,

    /// Space between photos in mm; negative or non-numeric means 0
    #[arg(long, allow_hyphen_values = true)]
    gap_mm: Option<String>,

    /// Copies: max, custom, 4, 6, 8, 10 or 12
    #[arg(long)]
    quantity: Option<QuantityChoice>,

    /// Copies when --quantity custom (implies --quantity custom when no quantity is given)
    #[arg(long, allow_hyphen_values = true)]
    custom_quantity: Option<String>,
}

impl SheetArgs {
    fn settings(&self, base: &config::PassportConfig) -> PassportSettings {
        let mut settings = PassportSettings::from_config(base);
        let custom_size = self.width_mm.is_some() || self.height_mm.is_some();
        match self.preset {
            Some(preset) => settings.preset = preset,
            None if custom_size => settings.preset = SizePreset::Custom,
            None => {}
        }
        if let Some(w) = &self.width_mm {
            settings.custom_width = w.clone();
        }
        if let Some(h) = &self.height_mm {
            settings.custom_height = h.clone();
        }
        if let Some(gap) = &self.gap_mm {
            settings.gap = gap.clone();
        }
        match (self.quantity, &self.custom_quantity) {
            (Some(choice), _) => settings.quantity = choice,
            (None, Some(_)) => settings.quantity = QuantityChoice::Custom,
            (None, None) => {}
        }
        if let Some(n) = &self.custom_quantity {
            settings.custom_quantity = n.clone();
        }
        settings
    }
}

#[derive(Parser)]
#[command(name = "mahatools")]
#[command(about = "Offline passport photos, invoices, resumes and image compression")]
#[command(long_about = "\
Offline passport photos, invoices, resumes and image compression

Tools:

  passport   crop a photo to 3.5:4.5 and tile it onto an A4 sheet (JPEG + optional HTML)
  grid       show how many photos fit, without a photo
  compress   scale images to 60% and re-encode as JPEG (files and directories)
  invoice    build a bill from line items, print it, optionally write HTML/JSON
  resume     fill a biodata preview; empty fields show placeholders

Settings are read from config.toml in --config-dir (default: current
directory) and can be overridden per run with flags.

Set RUST_LOG (e.g. RUST_LOG=mahatools=debug) or pass -v for diagnostics.

Run 'mahatools gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Make a printable passport photo sheet from one photo
    Passport {
        /// Source photo (jpg, png, tiff, webp)
        photo: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Output JPEG (default: export.file_name from config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also write an HTML preview (and the cropped photo next to it)
        #[arg(long)]
        html: Option<PathBuf>,

        /// Raster scale over 96 px/inch
        #[arg(long)]
        scale: Option<f64>,

        /// JPEG quality 1-100
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Compute the sheet layout only
    Grid {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Print the full arrangement as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compress images (60% size, JPEG quality 0.7)
    Compress {
        /// Image files and/or directories (walked recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write all outputs here instead of next to each source
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Build an invoice from line items
    Invoice {
        /// Client name for the bill header
        #[arg(long, default_value = "")]
        client: String,

        /// Line item as "description,quantity,price" (repeatable)
        #[arg(long = "item", value_name = "DESC,QTY,PRICE")]
        items: Vec<String>,

        /// Invoice date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Currency symbol (default: invoice.currency from config)
        #[arg(long)]
        currency: Option<String>,

        /// Write an HTML invoice
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the invoice as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fill the resume preview
    Resume {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        job: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        education: String,
        #[arg(long, default_value = "")]
        experience: String,

        /// Write an HTML preview
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let load_config = || config::load_config(&cli.config_dir);

    match cli.command {
        Command::Passport {
            photo,
            sheet,
            output: out,
            html,
            scale,
            quality,
        } => {
            let tools_config = load_config()?;
            let settings = sheet.settings(&tools_config.passport);
            let mut export = tools_config.export.clone();
            if let Some(scale) = scale {
                export.scale = scale;
            }
            if let Some(quality) = quality {
                export.quality = quality;
            }

            let bytes = std::fs::read(&photo)?;
            let preset = settings.preset;
            let mut tool = PassportTool::new(RustBackend::new(), RustBackend::new(), settings);
            tool.capture(Some(bytes))?;
            let Some(sheet) = tool.sheet().cloned() else {
                return Err("no photo was captured".into());
            };
            output::print_grid_summary(preset, &sheet);

            if let Some(encoded) = tool.export_jpeg(&export)? {
                let target = out.unwrap_or_else(|| PathBuf::from(&export.file_name));
                std::fs::write(&target, &encoded.bytes)?;
                println!("{}", output::format_saved_image(&target, &encoded));
            }

            if let (Some(html_path), Some(photo)) = (html, tool.photo()) {
                let photo_path = preview_photo_path(&html_path);
                std::fs::write(&photo_path, encode_jpeg(photo.image(), export.jpeg_quality())?)?;
                let src = photo_path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                std::fs::write(
                    &html_path,
                    render::render_grid_page(&sheet, &src).into_string(),
                )?;
                info!(path = %html_path.display(), "passport: HTML preview written");
                println!("Saved {}", html_path.display());
            }
        }
        Command::Grid { sheet, json } => {
            let tools_config = load_config()?;
            let settings = sheet.settings(&tools_config.passport);
            let grid = settings.sheet(A4_PRINTABLE);
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                output::print_grid_summary(settings.preset, &grid);
            }
        }
        Command::Compress { paths, output_dir } => {
            let tools_config = load_config()?;
            let inputs = compress::collect_inputs(&paths)?;
            init_thread_pool(&tools_config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_compress_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let summary = compress::compress_batch(&inputs, output_dir.as_deref(), Some(tx))?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_batch_summary(&summary);
        }
        Command::Invoice {
            client,
            items,
            date,
            currency,
            output: out,
            json,
        } => {
            let tools_config = load_config()?;
            let currency = currency.unwrap_or(tools_config.invoice.currency);
            let date_format = tools_config.invoice.date_format;
            let mut invoice = match date {
                Some(date) => Invoice::new(date),
                None => Invoice::today(),
            };
            invoice.set_client(&client);
            for spec in &items {
                let mut draft = ItemDraft::from_spec(spec);
                if let Err(e) = draft.submit(&mut invoice) {
                    eprintln!("Skipped \"{}\": {}", spec, e);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&invoice)?);
            } else {
                output::print_invoice(&invoice, &currency, &date_format);
            }
            if let Some(path) = out {
                let page = render::render_invoice_page(&invoice, &currency, &date_format);
                std::fs::write(&path, page.into_string())?;
                info!(path = %path.display(), "invoice: HTML written");
            }
        }
        Command::Resume {
            name,
            job,
            contact,
            address,
            education,
            experience,
            output: out,
        } => {
            let mut mirror = ResumeMirror::new();
            for (field, text) in [
                (ResumeField::Name, name),
                (ResumeField::Job, job),
                (ResumeField::Contact, contact),
                (ResumeField::Address, address),
                (ResumeField::Education, education),
                (ResumeField::Experience, experience),
            ] {
                mirror.edit(field, &text);
            }
            output::print_resume(mirror.view());
            if let Some(path) = out {
                std::fs::write(&path, render::render_resume_page(mirror.view()).into_string())?;
                info!(path = %path.display(), "resume: HTML written");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` enables debug output for this crate.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "mahatools=debug"
    } else {
        "mahatools=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// `sheet.html` → `sheet-photo.jpg` in the same directory.
fn preview_photo_path(html_path: &Path) -> PathBuf {
    let stem = html_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preview".to_string());
    html_path.with_file_name(format!("{stem}-photo.jpg"))
}
