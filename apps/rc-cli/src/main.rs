mod error;
mod prefs;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rc_core::{Parameterized, PortId, QuantityKind, UnitNormalizer, UnitRegistry};
use rc_fluids::{BackendRegistry, FluidState, Property, StateVar};
use rc_project::{CycleDocument, build, load_json, load_yaml};
use rc_solver::{CycleResults, SolveProgressEvent, SolveStatus, solve_with_progress};
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::prefs::DisplayPreferences;

const STATE_PROPERTIES: [Property; 6] = [
    Property::Pressure,
    Property::Temperature,
    Property::Enthalpy,
    Property::Entropy,
    Property::Density,
    Property::Quality,
];

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(about = "refcycle CLI - vapor-compression cycle solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a cycle document and build its graph
    Validate {
        /// Path to the cycle document (YAML, or JSON by extension)
        document: PathBuf,
    },
    /// Solve a cycle document
    Solve {
        /// Path to the cycle document (YAML, or JSON by extension)
        document: PathBuf,
        /// Display unit preferences (YAML map of quantity kind to unit)
        #[arg(long)]
        units: Option<PathBuf>,
        /// Override the document's pass budget
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Write the solved port states to a CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// List registered units, for one quantity kind or all of them
    Units {
        /// Quantity kind, e.g. pressure or specific_enthalpy
        kind: Option<String>,
    },
    /// List the refrigerants known to the property backends
    Refrigerants,
    /// Evaluate a refrigerant state from two properties, e.g. --p "250 kPa" --q 1
    State {
        refrigerant: String,
        #[arg(long)]
        p: Option<String>,
        #[arg(long)]
        t: Option<String>,
        #[arg(long)]
        h: Option<String>,
        #[arg(long)]
        s: Option<String>,
        #[arg(long)]
        q: Option<String>,
        /// Display unit preferences
        #[arg(long)]
        units: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { document } => cmd_validate(&document),
        Commands::Solve {
            document,
            units,
            max_iterations,
            export,
        } => cmd_solve(&document, units.as_deref(), max_iterations, export.as_deref()),
        Commands::Units { kind } => cmd_units(kind.as_deref()),
        Commands::Refrigerants => cmd_refrigerants(),
        Commands::State {
            refrigerant,
            p,
            t,
            h,
            s,
            q,
            units,
        } => {
            let inputs = [
                (Property::Pressure, p),
                (Property::Temperature, t),
                (Property::Enthalpy, h),
                (Property::Entropy, s),
                (Property::Quality, q),
            ];
            cmd_state(&refrigerant, &inputs, units.as_deref())
        }
    }
}

fn backends() -> BackendRegistry {
    #[cfg(feature = "coolprop")]
    {
        let mut reg = BackendRegistry::new();
        reg.register(std::sync::Arc::new(rc_fluids::CoolPropBackend::new()));
        reg.register(std::sync::Arc::new(rc_fluids::ReferenceBackend::new()));
        reg
    }
    #[cfg(not(feature = "coolprop"))]
    BackendRegistry::with_reference()
}

fn load_document(path: &Path) -> CliResult<CycleDocument> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let doc = if is_json {
        load_json(path)?
    } else {
        load_yaml(path)?
    };
    Ok(doc)
}

fn load_preferences(path: Option<&Path>, registry: &UnitRegistry) -> CliResult<DisplayPreferences> {
    match path {
        Some(path) => DisplayPreferences::load(path, registry),
        None => Ok(DisplayPreferences::default()),
    }
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating cycle document: {}", path.display());
    let doc = load_document(path)?;
    let backends = backends();
    let built = build(&doc, &backends)?;
    built.problem(&backends)?.validate()?;

    println!("✓ Document is valid");
    for circuit in built.graph.circuits() {
        println!(
            "  {} - {} ({} components)",
            circuit.name,
            circuit.refrigerant,
            circuit.components.len()
        );
    }
    Ok(())
}

fn cmd_solve(
    path: &Path,
    units: Option<&Path>,
    max_iterations: Option<usize>,
    export: Option<&Path>,
) -> CliResult<()> {
    let norm = UnitNormalizer::global();
    let registry = norm.registry();
    let prefs = load_preferences(units, registry)?;

    let start = Instant::now();
    let doc = load_document(path)?;
    let backends = backends();
    let built = build(&doc, &backends)?;
    let problem = built.problem(&backends)?;
    let mut config = built.solver;
    if let Some(n) = max_iterations {
        config = config.with_max_iterations(n);
    }
    let build_time = start.elapsed().as_secs_f64();

    println!("Solving: {}", doc.name);
    let start = Instant::now();
    let outcome = solve_with_progress(&problem, &config, None, &mut |event| {
        render_progress(&event)
    })?;
    let solve_time = start.elapsed().as_secs_f64();
    clear_progress_line();
    info!(status = %outcome.status, iterations = outcome.iterations, "solve finished");

    if outcome.status != SolveStatus::Converged {
        println!(
            "✗ {} after {} passes (residual {:.3e})",
            outcome.status, outcome.iterations, outcome.residual
        );
        return Err(CliError::NotConverged(outcome.status.to_string()));
    }
    println!(
        "✓ Converged after {} passes (residual {:.3e})",
        outcome.iterations, outcome.residual
    );
    println!("  Build: {build_time:.3}s  Solve: {solve_time:.3}s");

    let results = CycleResults::from_solution(&problem, &outcome.solution)?;

    println!("\nCycle:");
    for (name, q) in results.figures_in(&norm, |kind| prefs.unit_for(kind, registry))? {
        println!("  {name:<22} {q:.4}");
    }

    println!("\nComponents:");
    for summary in results.summaries() {
        println!("  {} ({})", summary.name, summary.kind);
        for (spec, _) in summary.parameters().iter() {
            let unit = prefs.unit_for(spec.kind, registry);
            if let Some(q) = norm.get_parameter(summary, spec.name, unit)? {
                println!("    {:<20} {q:.4}", spec.name);
            }
        }
    }

    println!("\nStates:");
    let mut csv = String::from("component,port,pressure_pa,temperature_k,enthalpy_j_per_kg,quality\n");
    for comp in built.graph.components() {
        let labelled = port_labels("inlet", comp.inlets()).chain(port_labels("outlet", comp.outlets()));
        for (label, is_outlet, port) in labelled {
            let Some(state) = results.port_state(port) else {
                continue;
            };
            if is_outlet {
                println!(
                    "  {:<24} {}",
                    format!("{} {label}", comp.name),
                    describe(state, &prefs, registry)?
                );
            }
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                comp.name,
                label,
                state.pressure().value,
                state.temperature().value,
                state.enthalpy(),
                state.quality().map(|x| x.to_string()).unwrap_or_default()
            ));
        }
    }

    if let Some(path) = export {
        std::fs::write(path, csv)?;
        println!("\n✓ Exported port states to {}", path.display());
    }
    Ok(())
}

fn cmd_units(kind: Option<&str>) -> CliResult<()> {
    let registry = UnitNormalizer::global().registry();
    let kinds: Vec<QuantityKind> = match kind {
        Some(name) => vec![
            QuantityKind::parse(name)
                .ok_or_else(|| CliError::Usage(format!("Unknown quantity kind '{name}'")))?,
        ],
        None => registry.kinds().collect(),
    };

    for kind in kinds {
        let canonical = registry.canonical_unit(kind)?;
        let units: Vec<&str> = registry.units(kind)?.iter().map(|u| u.as_str()).collect();
        println!("{kind} (canonical {canonical}): {}", units.join(", "));
    }
    Ok(())
}

fn cmd_refrigerants() -> CliResult<()> {
    for (backend, refrigerant) in backends().catalog() {
        println!("  {refrigerant:<12} [{backend}]");
    }
    Ok(())
}

fn cmd_state(
    refrigerant: &str,
    inputs: &[(Property, Option<String>)],
    units: Option<&Path>,
) -> CliResult<()> {
    let registry = UnitNormalizer::global().registry();
    let prefs = load_preferences(units, registry)?;

    let vars = inputs
        .iter()
        .filter_map(|(property, text)| text.as_deref().map(|t| (*property, t)))
        .map(|(property, text)| -> CliResult<StateVar> {
            let q = rc_core::Quantity::parse(text, property.kind(), registry)?;
            Ok(StateVar::from_quantity(property, &q, registry)?)
        })
        .collect::<CliResult<Vec<_>>>()?;
    let [a, b] = vars.as_slice() else {
        return Err(CliError::Usage(format!(
            "Exactly two of --p, --t, --h, --s, --q are required, got {}",
            vars.len()
        )));
    };

    let backends = backends();
    let id = backends.resolve(refrigerant)?;
    let state = backends.backend(&id)?.state_from_two(&id, *a, *b)?;

    println!("{id}: {}", state.phase());
    for property in STATE_PROPERTIES {
        if let Some(q) = state.quantity(property, registry)? {
            let q = q.convert_to(registry, prefs.unit_for(property.kind(), registry))?;
            println!("  {:<12} {q:.4}", property.as_str());
        }
    }
    Ok(())
}

/// `inlet`, `outlet` for single ports; `inlet1`, `inlet2`, ... otherwise.
fn port_labels<'c>(
    side: &'static str,
    ports: &'c [PortId],
) -> impl Iterator<Item = (String, bool, PortId)> + 'c {
    let numbered = ports.len() > 1;
    ports.iter().enumerate().map(move |(i, &port)| {
        let label = if numbered {
            format!("{side}{}", i + 1)
        } else {
            side.to_string()
        };
        (label, side == "outlet", port)
    })
}

fn describe(state: &FluidState, prefs: &DisplayPreferences, registry: &UnitRegistry) -> CliResult<String> {
    let mut line = String::new();
    for property in [Property::Pressure, Property::Temperature, Property::Enthalpy] {
        if let Some(q) = state.quantity(property, registry)? {
            let q = q.convert_to(registry, prefs.unit_for(property.kind(), registry))?;
            line.push_str(&format!("{}={q:.2}  ", property.as_str()));
        }
    }
    match state.quality() {
        Some(x) => line.push_str(&format!("x={x:.3}")),
        None => line.push_str(&state.phase().to_string()),
    }
    Ok(line)
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(80));
    let _ = io::stdout().flush();
}

fn render_progress(event: &SolveProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    print!(
        "\r{} pass={:<5} residual={:.3e}",
        spinner[event.iteration % spinner.len()],
        event.iteration,
        event.residual
    );
    let _ = io::stdout().flush();
}
