use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate random workflow graph exports for rensa
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// The number of nodes on the main spine (including the start node)
    #[arg(long, default_value_t = 12)]
    nodes: usize,

    /// Place an LLM node every N spine positions
    #[arg(long, default_value_t = 4)]
    llm_every: usize,

    /// Seed for deterministic output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating workflow graph ({} spine nodes)...", cli.nodes);

    let workflow = generate_workflow(&mut rng, cli.nodes, cli.llm_every);
    let json_output = serde_json::to_string_pretty(&workflow)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved workflow to '{}'",
        cli.output
    );

    Ok(())
}

/// Generates one editor-style export: a linear spine with branch stubs.
///
/// Condition nodes fork into a dead-end leaf on their false handle, intent
/// nodes fan out into one or two extra leaves. The spine itself always runs
/// through to the last node, so the graph stays connected.
fn generate_workflow(rng: &mut StdRng, spine_len: usize, llm_every: usize) -> Value {
    let mut nodes: Vec<Value> = Vec::new();
    let mut edges: Vec<Value> = Vec::new();
    let mut leaf_count = 0usize;
    let mut llm_count = 0usize;
    let mut branch_count = 0usize;

    let kinds: Vec<&str> = (0..spine_len)
        .map(|i| spine_kind(rng, i, llm_every))
        .collect();

    for (i, kind) in kinds.iter().enumerate() {
        if *kind == "llm" {
            llm_count += 1;
        }
        nodes.push(node_json(rng, &spine_id(i), kind, i));

        // The spine edge, except from the terminal node.
        let has_successor = i + 1 < spine_len;
        match *kind {
            "condition" => {
                if has_successor {
                    edges.push(edge_json(&spine_id(i), &spine_id(i + 1), Some("true")));
                }
                let leaf = push_leaf(rng, &mut nodes, &mut leaf_count);
                edges.push(edge_json(&spine_id(i), &leaf, Some("false")));
                branch_count += 1;
            }
            "intent" => {
                if has_successor {
                    edges.push(edge_json(&spine_id(i), &spine_id(i + 1), Some("intent_0")));
                }
                let arms = rng.random_range(1..=2);
                for arm in 1..=arms {
                    let leaf = push_leaf(rng, &mut nodes, &mut leaf_count);
                    edges.push(edge_json(
                        &spine_id(i),
                        &leaf,
                        Some(&format!("intent_{}", arm)),
                    ));
                }
                branch_count += 1;
            }
            _ => {
                if has_successor {
                    edges.push(edge_json(&spine_id(i), &spine_id(i + 1), None));
                }
            }
        }
    }

    println!("-> Generated {} LLM node(s).", llm_count);
    println!(
        "-> Generated {} branching node(s) with {} leaf node(s).",
        branch_count, leaf_count
    );

    json!({ "nodes": nodes, "edges": edges })
}

fn spine_kind(rng: &mut StdRng, index: usize, llm_every: usize) -> &'static str {
    if index == 0 {
        return "start";
    }
    if llm_every > 0 && index % llm_every == 0 {
        return "llm";
    }
    match rng.random_range(0..6u32) {
        0 => "condition",
        1 => "intent",
        2 => "knowledge",
        3 => "handoff",
        _ => "reply",
    }
}

fn spine_id(index: usize) -> String {
    format!("n{}", index)
}

/// Appends a dead-end reply node and returns its id.
fn push_leaf(rng: &mut StdRng, nodes: &mut Vec<Value>, leaf_count: &mut usize) -> String {
    *leaf_count += 1;
    let id = format!("leaf_{}", leaf_count);
    nodes.push(node_json(rng, &id, "reply", 1000 + *leaf_count));
    id
}

fn node_json(rng: &mut StdRng, id: &str, kind: &str, position: usize) -> Value {
    // Position and size mimic the editor export; the compiler ignores them.
    json!({
        "id": id,
        "type": kind,
        "data": { "label": format!("{} {}", kind, position) },
        "position": {
            "x": (position as f64) * 220.0,
            "y": rng.random_range(0.0..400.0),
        },
    })
}

fn edge_json(source: &str, target: &str, handle: Option<&str>) -> Value {
    match handle {
        Some(handle) => json!({
            "id": format!("e_{}_{}", source, target),
            "source": source,
            "target": target,
            "sourceHandle": handle,
        }),
        None => json!({
            "id": format!("e_{}_{}", source, target),
            "source": source,
            "target": target,
        }),
    }
}
