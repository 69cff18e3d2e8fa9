use clap::Parser;
use colored::*;
use notas::api::NotasApi;
use notas::config::{default_config_dir, NotasConfig};
use notas::context::ContextAdvisor;
use notas::error::{NotasError, Result};
use notas::hub::{Event, EventKind, NotificationHub};
use notas::logging::{default_log_level, init_logging};
use notas::settings::{JsonSettings, SettingsStore};
use notas::store::fs_backend::FsBackend;
use notas::templates::default_title;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

mod args;
use args::{Cli, Commands, ContextArg, SettingCommand, Toggle};

/// Overrides the notes directory; config and settings then live in `$NOTAS_HOME/.notas`.
const HOME_ENV: &str = "NOTAS_HOME";
const LOG_DIR_NAME: &str = ".logs";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NotasApi<FsBackend>,
    config: NotasConfig,
    config_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Stats { file, json } => handle_stats(&mut ctx, &file, json),
        Commands::Open { file } => handle_open(&mut ctx, &file),
        Commands::Templates => handle_templates(&ctx),
        Commands::Capture {
            template,
            title,
            content,
            context,
            value,
        } => handle_capture(&ctx, template, title, content, context, value),
        Commands::Suggest { app } => handle_suggest(&mut ctx, app),
        Commands::Preview { file, short } => handle_preview(&mut ctx, &file, short),
        Commands::Settings { setting } => handle_settings(&ctx, setting),
        Commands::Run { command } => handle_run(&mut ctx, &command.join(" ")),
        Commands::Config => handle_config(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = std::env::var_os(HOME_ENV).map(PathBuf::from);

    let config_dir = home
        .as_ref()
        .map(|h| h.join(".notas"))
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".notas"));
    let config = NotasConfig::load(&config_dir).unwrap_or_default();
    let notes_dir = config.resolve_notes_dir(home);

    if !cli.no_log {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(e) = init_logging(level, &notes_dir.join(LOG_DIR_NAME)) {
            eprintln!("{}", format!("Warning: logging disabled: {}", e).yellow());
        }
    }

    let hub = Rc::new(NotificationHub::with_max_depth(config.max_dispatch_depth));
    subscribe_printers(&hub, cli.verbose);

    let advisor = ContextAdvisor::default()
        .with_refresh_interval(Duration::from_secs(config.refresh_interval_secs));
    let api = NotasApi::new(FsBackend, notes_dir, hub)
        .with_advisor(advisor)
        .with_file_ext(&config.file_ext());

    Ok(AppContext {
        api,
        config,
        config_dir,
    })
}

/// The CLI's only view of what happens inside the core is the event stream.
fn subscribe_printers(hub: &NotificationHub, verbose: bool) {
    hub.subscribe(EventKind::FileError, |event| {
        if let Event::FileError { message } = event {
            eprintln!("{}", message.red());
        }
        Ok(())
    });
    hub.subscribe(EventKind::FileSaved, |event| {
        if let Event::FileSaved { path } = event {
            println!("{}", format!("Saved {}", path.display()).green());
        }
        Ok(())
    });
    hub.subscribe(EventKind::NoteSuggested, |event| {
        if let Event::NoteSuggested { title, content } = event {
            println!("{} {}", "Suggestion:".yellow(), title.bold());
            println!("{}", content.trim_end().dimmed());
        }
        Ok(())
    });
    hub.subscribe(EventKind::CommandFinished, |event| {
        if let Event::CommandFinished {
            success, message, ..
        } = event
        {
            if *success {
                println!("{}", message.green());
            } else {
                println!("{}", message.red());
            }
        }
        Ok(())
    });
    if verbose {
        hub.subscribe(EventKind::FileLoaded, |event| {
            if let Event::FileLoaded { path, content } = event {
                println!(
                    "{}",
                    format!("Loaded {} ({} bytes)", path.display(), content.len()).dimmed()
                );
            }
            Ok(())
        });
    }
}

fn handle_stats(ctx: &mut AppContext, file: &Path, json: bool) -> Result<()> {
    ctx.api.open(file)?;
    if json {
        let stats = ctx.api.statistics();
        let out = serde_json::to_string_pretty(&stats).map_err(NotasError::Serialization)?;
        println!("{}", out);
    } else {
        print_status(&ctx.api);
    }
    Ok(())
}

fn handle_open(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let note = ctx.api.open(file)?;
    println!("{}", note.display_title().bold());
    println!("--------------------------------");
    println!("{}", note.content);
    print_status(&ctx.api);
    Ok(())
}

fn handle_templates(ctx: &AppContext) -> Result<()> {
    for template in ctx.api.catalog().iter() {
        println!(
            "{}{}",
            format!("{:<14}", template.name).yellow(),
            default_title(template.name).dimmed()
        );
    }
    Ok(())
}

fn handle_capture(
    ctx: &AppContext,
    template: Option<String>,
    title: Option<String>,
    content: Option<String>,
    context: Option<ContextArg>,
    value: Option<String>,
) -> Result<()> {
    let mut draft = match context {
        Some(ct) => ctx
            .api
            .capture_with_context(Some(ct.into()), value.as_deref()),
        None => match template.as_deref() {
            Some(name) => {
                ctx.api.catalog().get(name)?;
                ctx.api.quick_capture(Some(name))
            }
            None => ctx.api.quick_capture(None),
        },
    };

    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(content) = content {
        draft.content = content;
    }

    ctx.api.commit(&draft)?;
    Ok(())
}

fn handle_suggest(ctx: &mut AppContext, app: Option<String>) -> Result<()> {
    let suggestion = match app {
        Some(name) => ctx.api.set_active_application(&name),
        None => ctx.api.suggest_for_now(),
    };

    match suggestion {
        Some(s) => {
            if let Some(template) = s.template {
                println!("{}", format!("Template: {}", template).dimmed());
            }
        }
        None => println!("{}", "No suggestion for this context.".dimmed()),
    }
    Ok(())
}

fn handle_preview(ctx: &mut AppContext, file: &Path, short: bool) -> Result<()> {
    ctx.api.open(file)?;
    if short {
        println!("{}", ctx.api.preview_snippet());
    } else {
        println!("{}", ctx.api.preview());
    }
    Ok(())
}

fn handle_settings(ctx: &AppContext, setting: Option<SettingCommand>) -> Result<()> {
    let mut settings = JsonSettings::load(&ctx.config_dir)?;

    if let Some(SettingCommand::DarkMode { value: Some(toggle) }) = setting {
        settings.set_dark_mode(toggle == Toggle::On)?;
    }

    let state = if settings.dark_mode() { "on" } else { "off" };
    println!("dark-mode = {}", state);
    Ok(())
}

fn handle_run(ctx: &mut AppContext, command: &str) -> Result<()> {
    ctx.api.run_command(command)?;
    println!("{}", format!("Running: {}", command).dimmed());
    ctx.api.wait_for_commands();
    Ok(())
}

fn handle_config(ctx: &AppContext) -> Result<()> {
    let notes_dir = ctx.api.store().notes_directory();
    println!("notes-dir = {}", notes_dir.display());
    println!("file-ext = {}", ctx.config.file_ext());
    println!("refresh-interval-secs = {}", ctx.config.refresh_interval_secs);
    println!("max-dispatch-depth = {}", ctx.config.max_dispatch_depth);
    println!(
        "log-level = {}",
        ctx.config.log_level.as_deref().unwrap_or(default_log_level())
    );
    println!("{}", format!("config: {}", ctx.config_dir.display()).dimmed());
    Ok(())
}

fn print_status(api: &NotasApi<FsBackend>) {
    let note = api.note();
    let status = api.statistics().status_line(note.file_name().as_deref());
    println!("{}", status.dimmed());
}
