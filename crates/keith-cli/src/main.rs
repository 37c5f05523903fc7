use keith_interactive::{
    Action, ConstraintMode, Diagram, Direction, DragSession, Feedback, InteractiveOptions, Layer,
    Node, Point, Rect, get_layers_padded,
};
use serde::Serialize;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Keith(keith_interactive::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Keith(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<keith_interactive::Error> for CliError {
    fn from(value: keith_interactive::Error) -> Self {
        Self::Keith(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Infer,
    Layers,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    mode: Option<ConstraintMode>,
    config: Option<String>,
    node: Option<String>,
    to: Option<Point>,
    level: Option<String>,
}

#[derive(Serialize)]
struct InferOut<'a> {
    method: Option<String>,
    action: &'a Action,
    feedback: &'a Feedback,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerOut<'a> {
    index: usize,
    members: Vec<&'a str>,
    band: Layer,
    bounds: Rect,
}

#[derive(Serialize)]
struct LayersOut<'a> {
    parent: Option<&'a str>,
    direction: Direction,
    layers: Vec<LayerOut<'a>>,
}

fn usage() -> &'static str {
    "keith-cli\n\
\n\
USAGE:\n\
  keith-cli [infer] [--mode relative|absolute] [--config <json>] [--pretty] --node <id> --to <x>,<y> [<path>|-]\n\
  keith-cli layers [--level <parent-id>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph snapshot is read from stdin.\n\
  - infer drags <id> to <x>,<y>, drops it there and prints the action a client would send.\n\
  - --config takes InteractiveOptions as JSON; --mode overrides its mode.\n\
  - layers prints the layer bands of the root level, or of the children of --level.\n\
  - Set KEITH_LOG (e.g. KEITH_LOG=debug) to trace the inference on stderr.\n\
"
}

fn parse_point(s: &str) -> Option<Point> {
    let (x, y) = s.split_once(',')?;
    let x = x.trim().parse::<f64>().ok()?;
    let y = y.trim().parse::<f64>().ok()?;
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "infer" => args.command = Command::Infer,
            "layers" => args.command = Command::Layers,
            "--pretty" => args.pretty = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.mode = Some(
                    mode.parse::<ConstraintMode>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--config" => {
                let Some(config) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(config.clone());
            }
            "--node" => {
                let Some(node) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.node = Some(node.clone());
            }
            "--to" => {
                let Some(to) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.to = Some(parse_point(to).ok_or(CliError::Usage(usage()))?);
            }
            "--level" => {
                let Some(level) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.level = Some(level.clone());
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            other => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(other.to_string());
            }
        }
    }

    if matches!(args.command, Command::Infer) && (args.node.is_none() || args.to.is_none()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_options(args: &Args) -> Result<InteractiveOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(json) => InteractiveOptions::from_json(json)?,
        None => InteractiveOptions::default(),
    };
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    Ok(options)
}

fn run_infer(args: &Args, diagram: Diagram) -> Result<(), CliError> {
    let (Some(node), Some(to)) = (args.node.as_deref(), args.to) else {
        return Err(CliError::Usage(usage()));
    };
    let options = load_options(args)?;
    debug!(node, x = to.x, y = to.y, mode = ?options.mode, "replaying drag");

    let mut session = DragSession::new(diagram, options);
    session.begin(node)?;
    let feedback = session.pointer_move(to)?;
    let action = session.release()?;

    write_json(
        &InferOut {
            method: action.method(),
            action: &action,
            feedback: &feedback,
        },
        args.pretty,
    )
}

fn run_layers(args: &Args, diagram: &Diagram) -> Result<(), CliError> {
    let level = diagram
        .level(args.level.as_deref())
        .ok_or_else(|| keith_interactive::Error::UnknownLevel {
            parent: args.level.clone().unwrap_or_default(),
        })?;

    let nodes: Vec<&Node> = level.graph.node_labels().collect();
    let direction = nodes.first().map(|n| n.direction).unwrap_or_default();
    let options = load_options(args)?;
    let bands = get_layers_padded(&nodes, direction, options.single_layer_padding);

    let layers = bands
        .into_iter()
        .enumerate()
        .map(|(index, band)| LayerOut {
            index,
            members: nodes
                .iter()
                .filter(|n| n.layer_id == index)
                .map(|n| n.id.as_str())
                .collect(),
            band,
            bounds: band.to_rect(),
        })
        .collect();

    write_json(
        &LayersOut {
            parent: level.parent.as_deref(),
            direction,
            layers,
        },
        args.pretty,
    )
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let diagram = Diagram::from_json(&text)?;
    match args.command {
        Command::Infer => run_infer(&args, diagram),
        Command::Layers => run_layers(&args, &diagram),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KEITH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("keith-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn infer_requires_node_and_target() {
        assert!(matches!(
            parse_args(&argv(&["infer", "--node", "a"])),
            Err(CliError::Usage(_))
        ));
        let args = parse_args(&argv(&["--node", "a", "--to", "1.5, -2", "g.json"])).unwrap();
        assert!(matches!(args.command, Command::Infer));
        assert_eq!(args.to, Some(Point::new(1.5, -2.0)));
        assert_eq!(args.input.as_deref(), Some("g.json"));
    }

    #[test]
    fn malformed_values_are_usage_errors() {
        for bad in [
            &["--node", "a", "--to", "1"][..],
            &["--node", "a", "--to", "1,2", "--mode", "sideways"][..],
            &["layers", "--bogus"][..],
            &["layers", "a.json", "b.json"][..],
        ] {
            assert!(matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))));
        }
    }

    #[test]
    fn mode_overrides_the_config() {
        let args = parse_args(&argv(&[
            "--node",
            "a",
            "--to",
            "0,0",
            "--config",
            r#"{"mode":"absolute","singleLayerPadding":4}"#,
            "--mode",
            "relative",
        ]))
        .unwrap();
        let options = load_options(&args).unwrap();
        assert_eq!(options.mode, ConstraintMode::Relative);
        assert_eq!(options.single_layer_padding, 4.0);
    }
}
