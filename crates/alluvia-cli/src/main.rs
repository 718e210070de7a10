use alluvia::{
    Align, ColorScheme, EdgeColorMode, Frame, PanelOptions, PanelOutput, ValueDisplay, Viewport,
    render_panel,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    BadFlag(String),
    Io(std::io::Error),
    Csv { line: usize, message: String },
    Panel(alluvia::PanelError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::BadFlag(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Csv { line, message } => write!(f, "CSV error on line {line}: {message}"),
            CliError::Panel(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<alluvia::PanelError> for CliError {
    fn from(value: alluvia::PanelError) -> Self {
        Self::Panel(value)
    }
}

const USAGE: &str = "\
Usage: alluvia-cli [OPTIONS] [INPUT.csv]

Reads `source,target,value` CSV rows (stdin when INPUT is omitted or `-`)
and writes a Sankey SVG document.

Options:
  -o, --output <FILE>           write the SVG here instead of stdout
      --width <PX>              viewport width (default 640)
      --height <PX>             viewport height (default 480)
      --align <POLICY>          justify | left | right | center
      --color-scheme <NAME>     Tableau10, Category10, Accent, Dark2, Paired,
                                Pastel1, Pastel2, Set1, Set2, Set3
      --edge-color <MODE>       path | input | output | none
      --display-values <MODE>   none | total | percentage | both
      --node-width <PX>         node rectangle width (default 15)
      --node-padding <PX>       vertical gap between nodes (default 20)
      --iterations <N>          relaxation passes (default 6)
  -h, --help                    print this help
";

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    width: Option<f64>,
    height: Option<f64>,
    options: PanelOptions,
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("alluvia-cli: {err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), CliError> {
    let args = parse_args(std::env::args().skip(1))?;

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let frame = Frame::from_rows(parse_csv_rows(&text)?);
    let viewport = Viewport::new(args.width.unwrap_or(640.0), args.height.unwrap_or(480.0));
    let svg = match render_panel(&frame, &args.options, viewport)? {
        PanelOutput::Chart { svg, .. } => svg,
        PanelOutput::NoData { svg } => svg,
    };

    match &args.output {
        Some(path) => std::fs::write(path, svg)?,
        None => println!("{svg}"),
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, CliError> {
    let mut out = CliArgs::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &'static str| -> Result<String, CliError> {
            args.next()
                .ok_or_else(|| CliError::BadFlag(format!("{flag} expects a value")))
        };
        match arg.as_str() {
            "-h" | "--help" => return Err(CliError::Usage(USAGE)),
            "-o" | "--output" => out.output = Some(PathBuf::from(value("--output")?)),
            "--width" => out.width = Some(parse_px("--width", &value("--width")?)?),
            "--height" => out.height = Some(parse_px("--height", &value("--height")?)?),
            "--align" => out.options.align = parse_align(&value("--align")?)?,
            "--color-scheme" => {
                out.options.color_scheme = parse_color_scheme(&value("--color-scheme")?)?;
            }
            "--edge-color" => out.options.edge_color = parse_edge_color(&value("--edge-color")?)?,
            "--display-values" => {
                out.options.display_values = parse_display_values(&value("--display-values")?)?;
            }
            "--node-width" => {
                out.options.node_width = parse_px("--node-width", &value("--node-width")?)?;
            }
            "--node-padding" => {
                out.options.node_padding = parse_px("--node-padding", &value("--node-padding")?)?;
            }
            "--iterations" => {
                let raw = value("--iterations")?;
                out.options.iterations = raw.parse().map_err(|_| {
                    CliError::BadFlag(format!("--iterations expects an integer, got `{raw}`"))
                })?;
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::BadFlag(format!("unknown flag `{other}`")));
            }
            path => {
                if out.input.is_some() {
                    return Err(CliError::Usage(USAGE));
                }
                out.input = Some(PathBuf::from(path));
            }
        }
    }
    Ok(out)
}

fn parse_px(flag: &str, raw: &str) -> Result<f64, CliError> {
    raw.parse()
        .map_err(|_| CliError::BadFlag(format!("{flag} expects a number, got `{raw}`")))
}

fn parse_align(raw: &str) -> Result<Align, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "justify" => Ok(Align::Justify),
        "left" => Ok(Align::Left),
        "right" => Ok(Align::Right),
        "center" => Ok(Align::Center),
        _ => Err(CliError::BadFlag(format!("unknown align policy `{raw}`"))),
    }
}

fn parse_color_scheme(raw: &str) -> Result<ColorScheme, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "tableau10" => Ok(ColorScheme::Tableau10),
        "category10" => Ok(ColorScheme::Category10),
        "accent" => Ok(ColorScheme::Accent),
        "dark2" => Ok(ColorScheme::Dark2),
        "paired" => Ok(ColorScheme::Paired),
        "pastel1" => Ok(ColorScheme::Pastel1),
        "pastel2" => Ok(ColorScheme::Pastel2),
        "set1" => Ok(ColorScheme::Set1),
        "set2" => Ok(ColorScheme::Set2),
        "set3" => Ok(ColorScheme::Set3),
        _ => Err(CliError::BadFlag(format!("unknown color scheme `{raw}`"))),
    }
}

fn parse_edge_color(raw: &str) -> Result<EdgeColorMode, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "path" => Ok(EdgeColorMode::Path),
        "input" => Ok(EdgeColorMode::Input),
        "output" => Ok(EdgeColorMode::Output),
        "none" => Ok(EdgeColorMode::None),
        _ => Err(CliError::BadFlag(format!("unknown edge color mode `{raw}`"))),
    }
}

fn parse_display_values(raw: &str) -> Result<ValueDisplay, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "none" => Ok(ValueDisplay::None),
        "total" => Ok(ValueDisplay::Total),
        "percentage" => Ok(ValueDisplay::Percentage),
        "both" => Ok(ValueDisplay::Both),
        _ => Err(CliError::BadFlag(format!(
            "unknown display-values mode `{raw}`"
        ))),
    }
}

/// `source,target,value` rows; quoted fields may contain commas and use
/// doubled quotes as escapes. Blank lines and `#` comments are skipped.
fn parse_csv_rows(text: &str) -> Result<Vec<(String, String, f64)>, CliError> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = split_csv_line(trimmed).map_err(|message| CliError::Csv {
            line: line_no,
            message,
        })?;
        let [source, target, value] = fields.as_slice() else {
            return Err(CliError::Csv {
                line: line_no,
                message: format!("expected 3 fields, got {}", fields.len()),
            });
        };
        let value: f64 = value.trim().parse().map_err(|_| CliError::Csv {
            line: line_no,
            message: format!("`{value}` is not a number"),
        })?;
        rows.push((source.trim().to_string(), target.trim().to_string(), value));
    }
    Ok(rows)
}

fn split_csv_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    loop {
        match chars.peek().copied() {
            Some('"') => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            field.push('"');
                        }
                        Some('"') => break,
                        Some(ch) => field.push(ch),
                        None => return Err("unterminated quoted field".to_string()),
                    }
                }
            }
            Some(',') => {
                chars.next();
                fields.push(std::mem::take(&mut field));
            }
            Some(ch) => {
                chars.next();
                field.push(ch);
            }
            None => {
                fields.push(field);
                return Ok(fields);
            }
        }
    }
}
