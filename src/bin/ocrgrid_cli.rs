//! CLI tool for ocrgrid - applies grid corrections and outputs JSON
//!
//! Usage:
//!   ocrgrid_cli <grid.json>                           # Validate, output grid JSON
//!   ocrgrid_cli <table.json> --ocr [page]             # Import extractor output
//!   ocrgrid_cli <grid.json> column 2 180              # Column 2 rendered 180px wide
//!   ocrgrid_cli <grid.json> edge right 900            # Right outer edge at 900px
//!   ocrgrid_cli <grid.json> rows 0:40,40:95,95:130    # Re-measured row bounds (px)
//!   ocrgrid_cli <grid.json> --config cfg.json --display -o out.json

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use ocrgrid::{Edge, EditorConfig, Grid, ResizeSession, RowBounds};

const USAGE: &str = "Usage: ocrgrid_cli <input.json> [--ocr [page]] [--config cfg.json] \
[column <i> <width_px> | edge <left|right> <px> | rows <t:b,...>]... [--display] [-o output.json]";

enum Op {
    Column(usize, f64),
    Edge(Edge, f64),
    Rows(Vec<RowBounds>),
}

struct Args {
    input: String,
    ocr_page: Option<usize>,
    config: Option<String>,
    ops: Vec<Op>,
    display: bool,
    output: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let input = args.get(1).ok_or(USAGE)?.clone();
    let mut parsed = Args {
        input,
        ocr_page: None,
        config: None,
        ops: Vec::new(),
        display: false,
        output: None,
    };

    let mut i = 2;
    while i < args.len() {
        let next = move |offset: usize| arg_at(args, i, offset);
        match args[i].as_str() {
            "--ocr" => {
                let page = args.get(i + 1).and_then(|p| p.parse::<usize>().ok());
                parsed.ocr_page = Some(page.unwrap_or(0));
                if page.is_some() {
                    i += 1;
                }
            }
            "--config" => {
                parsed.config = Some(next(1)?.clone());
                i += 1;
            }
            "--display" => parsed.display = true,
            "-o" => {
                parsed.output = Some(next(1)?.clone());
                i += 1;
            }
            "column" => {
                let index: usize = next(1)?
                    .parse()
                    .map_err(|e| format!("bad column index: {e}"))?;
                let width: f64 = next(2)?
                    .parse()
                    .map_err(|e| format!("bad column width: {e}"))?;
                parsed.ops.push(Op::Column(index, width));
                i += 2;
            }
            "edge" => {
                let edge: Edge = next(1)?.parse()?;
                let position: f64 = next(2)?
                    .parse()
                    .map_err(|e| format!("bad edge position: {e}"))?;
                parsed.ops.push(Op::Edge(edge, position));
                i += 2;
            }
            "rows" => {
                parsed.ops.push(Op::Rows(parse_rows(next(1)?)?));
                i += 1;
            }
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
        i += 1;
    }
    Ok(parsed)
}

fn arg_at(args: &[String], i: usize, offset: usize) -> Result<&String, String> {
    args.get(i + offset)
        .ok_or_else(|| format!("missing value after '{}'", args[i]))
}

fn parse_rows(list: &str) -> Result<Vec<RowBounds>, String> {
    list.split(',')
        .map(|pair| {
            let (top, bottom) = pair
                .split_once(':')
                .ok_or_else(|| format!("row bounds '{pair}' must be top:bottom"))?;
            let top: f64 = top
                .trim()
                .parse()
                .map_err(|e| format!("bad row top '{top}': {e}"))?;
            let bottom: f64 = bottom
                .trim()
                .parse()
                .map_err(|e| format!("bad row bottom '{bottom}': {e}"))?;
            Ok(RowBounds::new(top, bottom))
        })
        .collect()
}

fn run(args: &Args) -> Result<String, String> {
    let data = fs::read_to_string(&args.input)
        .map_err(|e| format!("Error reading {}: {}", args.input, e))?;

    let grid = match args.ocr_page {
        Some(page) => Grid::from_ocr_json(&data, page),
        None => serde_json::from_str::<Grid>(&data).map_err(Into::into),
    }
    .map_err(|e| format!("Error loading grid: {e}"))?;

    let config = match &args.config {
        Some(path) => {
            EditorConfig::from_file(path).map_err(|e| format!("Error in config {path}: {e}"))?
        }
        None => EditorConfig::default(),
    };

    let mut session = ResizeSession::new(grid, config).map_err(|e| e.to_string())?;

    for op in &args.ops {
        let result = match op {
            Op::Column(index, width) => session
                .begin_column_resize(*index)
                .and_then(|()| session.commit_column_resize(*width).map(|_| ())),
            Op::Edge(edge, position) => session
                .begin_edge_resize(*edge)
                .and_then(|()| session.commit_edge_resize(*position).map(|_| ())),
            Op::Rows(bounds) => session
                .begin_row_resize()
                .and_then(|()| session.commit_row_resize(bounds).map(|_| ())),
        };
        if let Err(e) = result {
            session.cancel_resize();
            return Err(format!("Error applying operation: {e}"));
        }
    }

    let json = if args.display {
        serde_json::to_string_pretty(&session.display_layout())
    } else {
        serde_json::to_string_pretty(session.grid())
    };
    json.map_err(|e| format!("Error serializing JSON: {e}"))
}

fn main() {
    let argv: Vec<String> = env::args().collect();

    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let json = match run(&args) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Output
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
