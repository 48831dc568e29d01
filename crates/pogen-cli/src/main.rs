// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod form_file;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use form_file::FormDocument;
use pogen_app::{OrderRuntime, RecordInput, RecordKind, RecordLabel};
use pogen_db::Store;
use pogen_render::{DEFAULT_TEMPLATE, NoopViewer, Renderer, load_template};
use runtime::DbRuntime;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "POGEN_LOG";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1))?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_example_template {
        print!("{DEFAULT_TEMPLATE}");
        return Ok(());
    }

    let config_path = match &options.config_path {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    if options.print_config_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if options.print_example_config {
        print!("{}", Config::example_config(&config_path));
        return Ok(());
    }

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "load config {}; run `pogen --print-example-config` to generate a v1 template",
            config_path.display()
        )
    })?;
    init_logging(config.log_level())?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or POGEN_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        store.seed_demo_records()?;
    }

    if options.check_only {
        load_template(&config.template_path())?;
        return Ok(());
    }

    let Some(command) = options.command else {
        print_help();
        return Ok(());
    };

    let mut renderer = Renderer::new(
        config.template_path(),
        config.output_dir(),
        config.image_assets(),
    );
    if options.no_open || !config.open_after_generate() {
        renderer = renderer.with_viewer(Box::new(NoopViewer));
    }
    let mut runtime = DbRuntime::new(&store, renderer);
    execute(command, &mut runtime)
}

fn init_logging(config_level: &str) -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {LOG_ENV} directives {directives:?}"))?,
        _ => EnvFilter::try_new(config_level)
            .with_context(|| format!("invalid log.level {config_level:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn execute(command: Command, runtime: &mut dyn OrderRuntime) -> Result<()> {
    debug!(?command, "running command");
    match command {
        Command::List(kind) => {
            for label in runtime.load_all(kind)? {
                println!("{label}");
            }
        }
        Command::Show { kind, label } => {
            let id = RecordLabel::parse_id(&label).ok_or_else(|| {
                anyhow!("cannot read a {} id from {label:?}; pass an id like 3", kind.label())
            })?;
            let record = runtime.load_record(kind, id)?;
            println!("id: {}", record.id);
            for key in kind.fields() {
                println!("{key}: {}", record.get(*key));
            }
        }
        Command::Save { kind, pairs } => {
            let input = RecordInput::from_pairs(kind, pairs)?;
            let id = runtime.save(&input)?;
            let name = input
                .fields
                .get(&kind.label_field())
                .cloned()
                .unwrap_or_default();
            println!("{}", RecordLabel { id, name });
        }
        Command::Generate(path) => {
            let form = FormDocument::read(&path)?.into_form(runtime)?;
            let artifact = runtime.render(&form)?;
            println!("{}", artifact.display());
        }
        Command::NewForm => {
            let json = serde_json::to_string_pretty(&FormDocument::blank())
                .context("encode blank form")?;
            println!("{json}");
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List(RecordKind),
    Show { kind: RecordKind, label: String },
    Save {
        kind: RecordKind,
        pairs: Vec<(String, String)>,
    },
    Generate(PathBuf),
    NewForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    /// Set by `--config`; otherwise resolved after help and template printing.
    config_path: Option<PathBuf>,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example_config: bool,
    print_example_template: bool,
    check_only: bool,
    show_help: bool,
    no_open: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: None,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example_config: false,
        print_example_template: false,
        check_only: false,
        show_help: false,
        no_open: false,
        command: None,
    };
    let mut positionals = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example_config = true;
            }
            "--print-example-template" => {
                options.print_example_template = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--no-open" => {
                options.no_open = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag if flag.starts_with("--") => {
                bail!("unknown argument {flag:?}; run with --help to see supported options");
            }
            positional => positionals.push(positional.to_owned()),
        }
    }

    options.command = parse_command(positionals)?;
    Ok(options)
}

fn parse_command(positionals: Vec<String>) -> Result<Option<Command>> {
    let mut words = positionals.into_iter();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<String> = words.collect();

    let command = match name.as_str() {
        "list" => match rest.as_slice() {
            [kind] => Command::List(parse_kind(kind)?),
            _ => bail!("usage: pogen list <kind>"),
        },
        "show" => match rest.as_slice() {
            [kind, label] => Command::Show {
                kind: parse_kind(kind)?,
                label: label.clone(),
            },
            _ => bail!("usage: pogen show <kind> <id>"),
        },
        "save" => {
            let Some((kind, assignments)) = rest.split_first() else {
                bail!("usage: pogen save <kind> key=value...");
            };
            let pairs = assignments
                .iter()
                .map(|assignment| {
                    assignment
                        .split_once('=')
                        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
                        .ok_or_else(|| {
                            anyhow!("expected key=value, got {assignment:?}")
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            Command::Save {
                kind: parse_kind(kind)?,
                pairs,
            }
        }
        "generate" => match rest.as_slice() {
            [path] => Command::Generate(PathBuf::from(path)),
            _ => bail!("usage: pogen generate <form.json> [--no-open]"),
        },
        "new-form" if rest.is_empty() => Command::NewForm,
        "new-form" => bail!("usage: pogen new-form"),
        unknown => {
            bail!("unknown command {unknown:?}; run with --help to see supported commands")
        }
    };
    Ok(Some(command))
}

fn parse_kind(raw: &str) -> Result<RecordKind> {
    RecordKind::parse(raw).ok_or_else(|| {
        anyhow!("unknown record kind {raw:?}; use supplier, ship-to, trade-terms, or footer-terms")
    })
}

fn print_help() {
    println!("pogen: purchase order generator");
    println!();
    println!("commands:");
    println!("  list <kind>                  Print saved records as \"id | name\"");
    println!("  show <kind> <id>             Print one saved record");
    println!("  save <kind> key=value...     Append a record and print its label");
    println!("  generate <form.json>         Render a form file to output/PO_<timestamp>.html");
    println!("  new-form                     Print a blank form file");
    println!("  kinds: supplier, ship-to, trade-terms, footer-terms");
    println!();
    println!("options:");
    println!("  --config <path>              Use a specific config path");
    println!("  --print-config-path          Print resolved config path");
    println!("  --print-path                 Print resolved database path");
    println!("  --print-example-config       Print a v1 config template");
    println!("  --print-example-template     Print the starter HTML template");
    println!("  --demo                       Use seeded demo records (in-memory)");
    println!("  --no-open                    Do not open the generated order");
    println!("  --check                      Validate config, database, and template");
    println!("  --help                       Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, Command, execute, parse_cli_args};
    use crate::runtime::DbRuntime;
    use anyhow::Result;
    use pogen_app::{OrderRuntime, RecordKind};
    use pogen_db::Store;
    use pogen_render::{ImageAssets, NoopViewer, Renderer};
    use pogen_testkit::minimal_template;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn parse_cli_args_defaults_to_unresolved_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: None,
                print_config_path: false,
                print_db_path: false,
                demo: false,
                print_example_config: false,
                print_example_template: false,
                check_only: false,
                show_help: false,
                no_open: false,
                command: None,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(vec!["--config", "/custom/config.toml"])?;
        assert_eq!(
            options.config_path,
            Some(PathBuf::from("/custom/config.toml"))
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"])
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"])
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(vec![
            "--print-config-path",
            "--print-example-config",
            "--print-example-template",
            "--check",
        ])?;
        assert!(options.print_config_path);
        assert!(!options.print_db_path);
        assert!(!options.demo);
        assert!(options.print_example_config);
        assert!(options.print_example_template);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"])?;
        assert!(long.show_help);
        assert_eq!(long.config_path, None);

        let short = parse_cli_args(vec!["-h"])?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_commands() -> Result<()> {
        let list = parse_cli_args(vec!["list", "ship-to"])?;
        assert_eq!(list.command, Some(Command::List(RecordKind::ShipTo)));

        let show = parse_cli_args(vec!["show", "footer_terms", "2 | Kai"])?;
        assert_eq!(
            show.command,
            Some(Command::Show {
                kind: RecordKind::FooterTerms,
                label: "2 | Kai".to_owned(),
            })
        );

        let generate = parse_cli_args(vec!["--demo", "generate", "order.json", "--no-open"])?;
        assert!(generate.demo);
        assert!(generate.no_open);
        assert_eq!(
            generate.command,
            Some(Command::Generate(PathBuf::from("order.json")))
        );

        let new_form = parse_cli_args(vec!["new-form"])?;
        assert_eq!(new_form.command, Some(Command::NewForm));
        Ok(())
    }

    #[test]
    fn parse_cli_args_splits_save_assignments_on_first_equals() -> Result<()> {
        let options = parse_cli_args(vec![
            "save",
            "trade-terms",
            "payment_terms=T/T a=b",
            "currency=USD",
        ])?;
        assert_eq!(
            options.command,
            Some(Command::Save {
                kind: RecordKind::TradeTerms,
                pairs: vec![
                    ("payment_terms".to_owned(), "T/T a=b".to_owned()),
                    ("currency".to_owned(), "USD".to_owned()),
                ],
            })
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_commands() {
        for args in [
            vec!["list"],
            vec!["list", "customers"],
            vec!["save", "supplier", "supplier_name"],
            vec!["frobnicate"],
            vec!["new-form", "extra"],
        ] {
            assert!(
                parse_cli_args(args.clone()).is_err(),
                "args {args:?}"
            );
        }
    }

    #[test]
    fn save_rejects_key_from_another_kind() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let mut runtime = DbRuntime::new(
            &store,
            Renderer::new(
                PathBuf::from("template.html"),
                PathBuf::from("output"),
                ImageAssets::default(),
            ),
        );

        let error = execute(
            Command::Save {
                kind: RecordKind::Supplier,
                pairs: vec![("ship_tel".to_owned(), "555".to_owned())],
            },
            &mut runtime,
        )
        .expect_err("foreign key should fail");
        assert!(error.to_string().contains("supplier_name"));
        assert_eq!(store.record_count(RecordKind::Supplier)?, 0);
        Ok(())
    }

    #[test]
    fn generate_renders_form_file_from_demo_records() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.seed_demo_records()?;

        let dir = tempfile::tempdir()?;
        let template = dir.path().join("template.html");
        fs::write(&template, minimal_template())?;
        let form_path = dir.path().join("order.json");
        fs::write(
            &form_path,
            r#"{"records": {"supplier": 1, "trade-terms": 1}, "po_date": "2024-02-22",
               "items": [{"item_no": "1", "description": "Bolt", "quantity": "1,000", "unit_price": "0.12"}]}"#,
        )?;

        let renderer = Renderer::new(template, dir.path().join("output"), ImageAssets::default())
            .with_viewer(Box::new(NoopViewer));
        let mut runtime = DbRuntime::new(&store, renderer);
        execute(Command::Generate(form_path), &mut runtime)?;

        let written: Vec<_> = fs::read_dir(dir.path().join("output"))?.collect::<Result<_, _>>()?;
        assert_eq!(written.len(), 1);
        let html = fs::read_to_string(written[0].path())?;
        assert!(html.contains("<p id=\"supplier_name\">Harbor Fasteners Ltd.</p>"));
        assert!(html.contains("<p id=\"po_date\">22nd Feb. 2024</p>"));
        assert!(html.contains("<p id=\"total\">120.00</p>"));
        assert!(html.contains("30% deposit with order<br>70% against copy of B/L"));
        assert_eq!(runtime.load_all(RecordKind::Supplier)?.len(), 1);
        Ok(())
    }
}
