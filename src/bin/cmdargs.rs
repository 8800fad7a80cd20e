// src/bin/cmdargs.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use cmdargs::cli::Cli;
use cmdargs::config;
use cmdargs::core::dispatch;
use cmdargs::core::help;
use cmdargs::core::parser_manager::ParserManager;
use cmdargs::models::{CommandDef, Manifest};

/// El punto de entrada principal de la aplicación.
fn main() {
    // Para ver los logs, ejecuta con `RUST_LOG=debug cmdargs ...`
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        eprintln!("\nError: {:?}", e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let manifest_path = match cli.manifest {
        Some(path) => path,
        None => config::find_manifest_path()?,
    };
    let manifest = config::load_manifest(&manifest_path)
        .with_context(|| format!("No se pudo cargar el manifiesto '{}'", manifest_path.display()))?;

    // Los parsers se resuelven una sola vez, antes de despachar nada.
    let mut manager = ParserManager::with_builtins();

    match cli.command_or_action.as_deref() {
        None | Some("list") => handle_list(&manifest, &mut manager),
        Some("help") => {
            let name = cli
                .args
                .first()
                .ok_or_else(|| anyhow!("La acción 'help' requiere el nombre de un comando."))?;
            handle_help(&manifest, &mut manager, find_command(&manifest, name)?)
        }
        Some(name) => handle_invoke(&manifest, &mut manager, find_command(&manifest, name)?, &cli.args),
    }
}

fn find_command<'a>(manifest: &'a Manifest, name: &str) -> Result<&'a CommandDef> {
    manifest
        .command(name)
        .ok_or_else(|| anyhow!("Comando '{}' no encontrado en el manifiesto.", name))
}

/// Muestra el uso de todos los comandos del manifiesto.
fn handle_list(manifest: &Manifest, manager: &mut ParserManager) -> Result<()> {
    if manifest.commands.is_empty() {
        println!("\nNo hay comandos declarados en el manifiesto.");
        return Ok(());
    }

    println!("\nComandos disponibles:");
    for command in &manifest.commands {
        let parsers = dispatch::bind_parameters(manager, &manifest.parameters(command))
            .with_context(|| format!("El comando '{}' está mal declarado", command.name))?;
        let usage = help::render_usage(&command.name, &parsers);
        match &command.desc {
            Some(desc) => println!("  - {} : {}", usage, desc),
            None => println!("  - {}", usage),
        }
    }
    log::debug!("{} parser(s) distintos en caché", manager.cached_count());
    Ok(())
}

fn handle_help(manifest: &Manifest, manager: &mut ParserManager, command: &CommandDef) -> Result<()> {
    let parsers = dispatch::bind_parameters(manager, &manifest.parameters(command))
        .with_context(|| format!("El comando '{}' está mal declarado", command.name))?;

    println!("\nUso: {}", help::render_usage(&command.name, &parsers));
    if let Some(desc) = &command.desc {
        println!("  {}", desc);
    }
    if !parsers.is_empty() {
        println!("\nParámetros:");
        print!("{}", help::render_parameters(&parsers));
    }
    Ok(())
}

/// Parsea los tokens contra los parámetros del comando y muestra los valores obtenidos.
fn handle_invoke(
    manifest: &Manifest,
    manager: &mut ParserManager,
    command: &CommandDef,
    tokens: &[String],
) -> Result<()> {
    let parsers = dispatch::bind_parameters(manager, &manifest.parameters(command))
        .with_context(|| format!("El comando '{}' está mal declarado", command.name))?;

    let parsed = dispatch::parse_arguments(&parsers, tokens).with_context(|| {
        format!(
            "Uso: {}",
            help::render_usage(&command.name, &parsers)
        )
    })?;

    println!("\n> {}", command.name);
    for argument in parsed {
        println!("  {} = {}", argument.label, argument.value);
    }
    Ok(())
}
