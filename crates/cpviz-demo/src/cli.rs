#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand to keep the binary lean. `CPVIZ_DEMO_*` environment
//! variables provide defaults that explicit flags override.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
cpviz-demo: render a ceteris paribus plot to SVG

USAGE:
    cpviz-demo --profiles=PATH --observations=PATH [OPTIONS]

INPUT:
    --profiles=PATH      JSON array of profile rows (_ids_, _label_, _vname_, _yhat_, ...)
    --observations=PATH  JSON array of observation rows (_ids_, _label_, _yhat_, _y_, ...)
    --options=PATH       JSON options document (variables, color, add_table, ...)
    --variables=A,B      Plot these variables (overrides the options file)

OUTPUT:
    --out=PATH           Write the SVG here instead of stdout
    --resize=WxH         Resize the viewport before export
    --hover=ID:MODEL     Highlight one observation as if hovered on its profile
    --table-hover=ID:MODEL
                         Highlight one observation as if hovered in the table

OTHER:
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    CPVIZ_DEMO_OPTIONS   Default for --options
    CPVIZ_DEMO_OUT       Default for --out
    RUST_LOG             Log filter (default: warn)";

/// Which highlight to apply before export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hover {
    Profile { id: String, model: String },
    TableRow { id: String, model: String },
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Opts {
    pub profiles: Option<PathBuf>,
    pub observations: Option<PathBuf>,
    pub options: Option<PathBuf>,
    pub variables: Option<Vec<String>>,
    pub out: Option<PathBuf>,
    pub resize: Option<(f64, f64)>,
    pub hover: Option<Hover>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render(Opts),
    Help,
    Version,
}

/// A malformed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    Invalid { flag: &'static str, value: String },
    Missing(&'static str),
    Unknown(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { flag, value } => write!(f, "invalid {flag} value: {value}"),
            Self::Missing(flag) => write!(f, "missing required {flag}"),
            Self::Unknown(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a malformed command line.
    pub fn parse() -> Self {
        let mut defaults = Self::default();
        if let Ok(val) = env::var("CPVIZ_DEMO_OPTIONS") {
            defaults.options = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("CPVIZ_DEMO_OUT") {
            defaults.out = Some(PathBuf::from(val));
        }
        match parse_args(defaults, env::args().skip(1)) {
            Ok(Command::Render(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("cpviz-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parse `args` on top of `opts`.
pub fn parse_args(
    mut opts: Opts,
    args: impl IntoIterator<Item = String>,
) -> Result<Command, CliError> {
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => {
                if let Some(val) = other.strip_prefix("--profiles=") {
                    opts.profiles = Some(PathBuf::from(val));
                } else if let Some(val) = other.strip_prefix("--observations=") {
                    opts.observations = Some(PathBuf::from(val));
                } else if let Some(val) = other.strip_prefix("--options=") {
                    opts.options = Some(PathBuf::from(val));
                } else if let Some(val) = other.strip_prefix("--variables=") {
                    let names: Vec<String> = val
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                    if names.is_empty() {
                        return Err(CliError::Invalid {
                            flag: "--variables",
                            value: val.to_string(),
                        });
                    }
                    opts.variables = Some(names);
                } else if let Some(val) = other.strip_prefix("--out=") {
                    opts.out = Some(PathBuf::from(val));
                } else if let Some(val) = other.strip_prefix("--resize=") {
                    opts.resize = Some(parse_size(val).ok_or_else(|| CliError::Invalid {
                        flag: "--resize",
                        value: val.to_string(),
                    })?);
                } else if let Some(val) = other.strip_prefix("--hover=") {
                    let (id, model) = parse_key(val).ok_or_else(|| CliError::Invalid {
                        flag: "--hover",
                        value: val.to_string(),
                    })?;
                    opts.hover = Some(Hover::Profile { id, model });
                } else if let Some(val) = other.strip_prefix("--table-hover=") {
                    let (id, model) = parse_key(val).ok_or_else(|| CliError::Invalid {
                        flag: "--table-hover",
                        value: val.to_string(),
                    })?;
                    opts.hover = Some(Hover::TableRow { id, model });
                } else {
                    return Err(CliError::Unknown(other.to_string()));
                }
            }
        }
    }
    if opts.profiles.is_none() {
        return Err(CliError::Missing("--profiles"));
    }
    if opts.observations.is_none() {
        return Err(CliError::Missing("--observations"));
    }
    Ok(Command::Render(opts))
}

/// `800x600` → `(800.0, 600.0)`.
fn parse_size(val: &str) -> Option<(f64, f64)> {
    let (w, h) = val.split_once(['x', 'X'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0).then_some((w, h))
}

/// `17:lm` → `("17", "lm")`. The model label may itself contain colons.
fn parse_key(val: &str) -> Option<(String, String)> {
    let (id, model) = val.split_once(':')?;
    (!id.is_empty() && !model.is_empty()).then(|| (id.to_string(), model.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn minimal_command_line() {
        let cmd = parse_args(
            Opts::default(),
            args(&["--profiles=p.json", "--observations=o.json"]),
        )
        .unwrap();
        let Command::Render(opts) = cmd else {
            panic!("expected render");
        };
        assert_eq!(opts.profiles, Some(PathBuf::from("p.json")));
        assert_eq!(opts.observations, Some(PathBuf::from("o.json")));
        assert_eq!(opts.out, None);
    }

    #[test]
    fn every_flag() {
        let cmd = parse_args(
            Opts::default(),
            args(&[
                "--profiles=p.json",
                "--observations=o.json",
                "--options=opts.json",
                "--variables=age, income",
                "--out=plot.svg",
                "--resize=1024x768",
                "--table-hover=7:lm:v2",
            ]),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::Render(Opts {
                profiles: Some("p.json".into()),
                observations: Some("o.json".into()),
                options: Some("opts.json".into()),
                variables: Some(vec!["age".into(), "income".into()]),
                out: Some("plot.svg".into()),
                resize: Some((1024.0, 768.0)),
                hover: Some(Hover::TableRow {
                    id: "7".into(),
                    model: "lm:v2".into()
                }),
            })
        );
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(
            parse_args(Opts::default(), args(&["--bogus=1", "-h"])),
            Err(CliError::Unknown("--bogus=1".into()))
        );
        assert_eq!(parse_args(Opts::default(), args(&["-h"])), Ok(Command::Help));
        assert_eq!(
            parse_args(Opts::default(), args(&["--version"])),
            Ok(Command::Version)
        );
    }

    #[test]
    fn missing_inputs_are_reported() {
        assert_eq!(
            parse_args(Opts::default(), args(&["--observations=o.json"])),
            Err(CliError::Missing("--profiles"))
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (arg, flag) in [
            ("--resize=wide", "--resize"),
            ("--resize=0x10", "--resize"),
            ("--hover=17", "--hover"),
            ("--variables=,", "--variables"),
        ] {
            let err = parse_args(Opts::default(), args(&[arg])).unwrap_err();
            assert!(matches!(err, CliError::Invalid { flag: f, .. } if f == flag), "{arg}");
        }
    }

    #[test]
    fn help_mentions_every_flag() {
        for flag in ["--profiles", "--observations", "--options", "--resize", "--hover"] {
            assert!(HELP_TEXT.contains(flag), "{flag}");
        }
        assert!(!VERSION.is_empty());
    }
}
