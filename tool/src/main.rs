//! `canvas-tool`: command-line access to Phaser canvas scenes.
//!
//! Exit codes: 0 when every file is clean, 1 when problems were reported,
//! 2 when a file could not be read or written.

mod args;
mod project;

use std::process::ExitCode;

use clap::Parser;
use phaser_canvas_core::{CanvasModel, CanvasResult, Prefab, ProjectContext};
use serde_json::{Map, Value};

use args::{Args, Command};
use project::Project;

const CANVAS_EXTENSION: &str = "canvas";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let project = Project::open(&args.project);
    let ctx = ProjectContext::new(&project.catalog, &project.vfs);

    match run(&args.command, &ctx) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{}: {e}", project.config.project.name);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the command found nothing to report.
fn run(command: &Command, ctx: &ProjectContext<'_>) -> CanvasResult<bool> {
    match command {
        Command::Check { files } => {
            let mut clean = true;
            for file in canvas_files(files, ctx)? {
                clean &= check(&file, ctx)?;
            }
            Ok(clean)
        }
        Command::Dump { file, json } => {
            let mut model = CanvasModel::load(file, ctx)?;
            if *json {
                let snapshot = model.to_json(false, ctx)?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                dump(&model);
            }
            Ok(true)
        }
        Command::Resave { file } => {
            let mut model = CanvasModel::load(file, ctx)?;
            model.save(file, ctx)?;
            Ok(true)
        }
        Command::Instantiate { prefab, x, y } => {
            let mut info = Map::new();
            if let Some(x) = x {
                info.insert("x".into(), Value::from(*x));
            }
            if let Some(y) = y {
                info.insert("y".into(), Value::from(*y));
            }
            let data = Prefab::new(prefab.as_str()).new_instance(ctx, Some(&info))?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(true)
        }
    }
}

/// Expands folders among `inputs` into the canvas files below them.
fn canvas_files(inputs: &[String], ctx: &ProjectContext<'_>) -> CanvasResult<Vec<String>> {
    let mut files = Vec::new();
    for input in inputs {
        if ctx.vfs().exists(input) {
            files.push(input.clone());
            continue;
        }
        let found = ctx.vfs().find_files(input, CANVAS_EXTENSION)?;
        if found.is_empty() {
            log::warn!("No canvas files in {input}");
        }
        files.extend(found);
    }
    Ok(files)
}

fn check(file: &str, ctx: &ProjectContext<'_>) -> CanvasResult<bool> {
    let model = CanvasModel::load(file, ctx)?;
    let problems = model.validate();
    for problem in &problems {
        match problem.node.and_then(|id| model.world().label(id)) {
            Some(label) => println!("{file}: {problem} [{label}]"),
            None => println!("{file}: {problem}"),
        }
    }
    Ok(problems.is_empty())
}

fn dump(model: &CanvasModel) {
    let world = model.world();
    println!("{} ({})", model.doc_type(), world.len() - 1);
    world.walk(world.root(), |id, node| {
        let indent = "  ".repeat(world.depth(id));
        println!("{indent}{} ({}, {})", node.label(), node.base.x, node.base.y);
    });
}
