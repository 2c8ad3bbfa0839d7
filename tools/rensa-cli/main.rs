use clap::Parser;
use rensa::prelude::*;
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These structs match the editor's single-file export (one object holding both
// arrays) and are only used here for conversion. The library itself speaks the
// two-array storage format, see `GraphDefinition::from_editor_json`.

#[derive(Deserialize)]
struct RawWorkflow {
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    data: RawNodeData,
}

#[derive(Default, Deserialize)]
struct RawNodeData {
    #[serde(default)]
    label: String,
}

#[derive(Deserialize)]
struct RawEdge {
    source: String,
    target: String,
    #[serde(default, alias = "sourceHandle")]
    source_handle: Option<String>,
}

// --- Converter Implementation ---
// This implements the conversion from the raw export model to rensa's
// canonical GraphDefinition.

impl IntoGraph for RawWorkflow {
    fn into_graph(self) -> std::result::Result<GraphDefinition, GraphParseError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw_node| NodeDefinition {
                id: raw_node.id,
                kind: NodeKind::from_type(&raw_node.node_type),
                label: raw_node.data.label,
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|raw_edge| EdgeDefinition {
                source: raw_edge.source,
                target: raw_edge.target,
                source_handle: raw_edge.source_handle,
            })
            .collect();

        Ok(GraphDefinition { nodes, edges })
    }
}

/// A workflow graph compilation CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow export JSON file (an object with `nodes` and `edges`)
    workflow_path: Option<String>,

    /// Workflow id, used as the middle part of sub-chain ids
    #[arg(short, long, default_value = "workflow")]
    workflow_id: String,

    /// Optional path to write the compiled artifact to
    #[arg(short, long)]
    output: Option<String>,

    /// Print the inline expression only, without splitting per LLM node
    #[arg(long)]
    inline: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rensa=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.human {
        run_interactive();
    } else {
        run_non_interactive(cli);
    }
}

fn run_compilation(workflow_path: String, workflow_id: String, output: Option<String>, inline: bool) {
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let workflow_json = fs::read_to_string(&workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workflow file '{}': {}",
            &workflow_path, e
        ))
    });
    let load_duration = load_start.elapsed();

    // --- 2. Parsing and Conversion ---
    let raw_workflow: RawWorkflow = serde_json::from_str(&workflow_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse workflow JSON: {}", e)));

    let graph = raw_workflow
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert workflow to graph: {}", e)));

    println!(
        "Loaded workflow '{}': {} nodes, {} edges",
        workflow_id,
        graph.nodes.len(),
        graph.edges.len()
    );

    // --- 3. Validation ---
    let compiler = WorkflowCompiler::builder(workflow_id, graph).build();
    let report = compiler.validate();
    if !report.is_valid() {
        println!("\nThe graph has structural problems; branches may be truncated:");
        for message in report.messages() {
            println!("  warning: {}", message);
        }
    }

    // --- 4. Compilation ---
    println!("\nStarting workflow compilation...");
    let compile_start = Instant::now();

    if inline {
        let expression = compiler
            .compile()
            .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
        let compile_duration = compile_start.elapsed();

        println!("Compilation successful in {:?}", compile_duration);
        println!("\n--- Inline Expression ---");
        println!("{}", expression);

        print_summary(load_duration, compile_duration, total_start.elapsed());
        return;
    }

    let compiled = compiler
        .split()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    let compile_duration = compile_start.elapsed();

    println!(
        "Compilation successful! {} sub-chain(s) generated in {:?}",
        compiled.sub_chains.len(),
        compile_duration
    );

    // --- 5. Results ---
    println!("\n--- Main Chain ---");
    println!("{}", compiled.main_expression);

    for chain in &compiled.sub_chains {
        println!("\n--- Sub-Chain {} ---", chain.chain_id);
        println!("{}", chain.expression);
        println!(
            "  -> Rooted at LLM node '{}', {} member node(s)",
            chain.llm_node_id,
            chain.member_node_ids.len()
        );
    }

    // --- 6. Artifact ---
    if let Some(output_path) = output {
        compiled.save(&output_path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to save artifact to '{}': {}", output_path, e))
        });
        println!("\nSaved compiled artifact to '{}'", output_path);
    }

    print_summary(load_duration, compile_duration, total_start.elapsed());
}

fn print_summary(
    load_duration: std::time::Duration,
    compile_duration: std::time::Duration,
    total_duration: std::time::Duration,
) {
    println!("\n--- Performance Summary ---");
    println!("File Loading:         {:?}", load_duration);
    println!("Compilation:          {:?}", compile_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_duration);
    println!();
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let workflow_path = cli.workflow_path.unwrap_or_else(|| {
        exit_with_error("Workflow path is required in non-interactive mode.");
    });

    run_compilation(workflow_path, cli.workflow_id, cli.output, cli.inline);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    println!("--- Rensa Interactive Mode ---");

    let workflow_path = prompt_for_input("Enter workflow export path", Some("data/workflow.json"));
    let workflow_id = prompt_for_input("Enter workflow id", Some("workflow"));
    let output_str = prompt_for_input("Enter artifact output path (optional)", None);

    let output = if output_str.is_empty() {
        None
    } else {
        Some(output_str)
    };

    let inline = loop {
        println!("\nPlease select a compilation mode:");
        println!("  1: Split (one sub-chain per LLM node, resumable)");
        println!("  2: Inline (single expression)");
        let choice_str = prompt_for_input("Enter choice", Some("1"));

        match choice_str.trim() {
            "1" => break false,
            "2" => break true,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };

    run_compilation(workflow_path, workflow_id, output, inline);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    io::stdout().flush().unwrap();

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
