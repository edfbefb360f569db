use clap::Parser;
use eqref::application::{
    init, CheckService, ConfigService, ListService, ResolveOptions, ResolveService,
};
use eqref::cli::{format_check_report, format_equation_list, Cli, Commands};
use eqref::error::EqrefError;
use eqref::infrastructure::FileSystemRepository;

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), EqrefError> {
    match cli.command {
        Commands::Init { path } => init::init(&path),
        Commands::Resolve {
            files,
            in_place,
            output_dir,
        } => {
            let repo = FileSystemRepository::discover()?;
            let service = ResolveService::new(repo);
            let written = service.execute(ResolveOptions {
                files,
                in_place,
                output_dir,
            })?;
            for path in &written {
                println!("Resolved {}", path.display());
            }
            Ok(())
        }
        Commands::Check { files } => {
            let repo = FileSystemRepository::discover()?;
            let report = CheckService::new(repo).execute(files)?;
            print!("{}", format_check_report(&report));

            if report.has_issues() {
                Err(EqrefError::ValidationFailed(report.issues.len()))
            } else {
                Ok(())
            }
        }
        Commands::List { file } => {
            let repo = FileSystemRepository::discover()?;
            let summaries = ListService::new(repo).execute(file)?;
            println!("{}", format_equation_list(&summaries).trim_end());
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                let config = service.list()?;
                println!("label-prefix = {}", config.label_prefix);
                println!("reference-word = {}", config.reference_word);
                println!("output-dir = {}", config.output_dir);
                println!("created = {}", config.created.to_rfc3339());
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                    Ok(())
                } else {
                    let val = service.get(&k)?;
                    println!("{}", val);
                    Ok(())
                }
            } else {
                println!("Usage: eqref config [--list | <key> [<value>]]");
                println!("Valid keys: label-prefix, reference-word, output-dir, created");
                Ok(())
            }
        }
    }
}
