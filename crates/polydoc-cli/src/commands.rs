use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use polydoc_codec::{Codec, Encoding};
use polydoc_library::seed_document;
use polydoc_server::{PolydocServer, ServerConfig};
use polydoc_store::{bootstrap, DocumentStore};
use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Seed(args) => cmd_seed(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

/// Config file first (or defaults), then command-line overrides.
pub fn resolve_config(args: &StoreArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(root) = &args.xml_root {
        config.xml_root = root.clone();
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.store)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} polydoc on {} ({} mode, {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.mode.to_string().cyan(),
        config.data_file.display()
    );
    let server = PolydocServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_seed(args: SeedArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.store)?;
    let store = config.open_store()?;
    let written = if args.force {
        store.save(&seed_document())?;
        true
    } else {
        bootstrap(&store, &seed_document())?
    };
    if written {
        println!("{} Wrote seed document to {}", "✓".green().bold(), store.location().bold());
    } else {
        println!("{} already exists; use {} to overwrite", store.location().bold(), "--force".yellow());
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.store)?;
    let store = config.open_store()?;
    let tree = store.load()?;
    let encoding = args.to.map(Encoding::from).unwrap_or_else(|| store.encoding());
    let bytes = Codec::new(encoding)
        .with_xml_root(config.xml_root.clone())
        .encode(&tree)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    if !bytes.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polydoc_server::Mode;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polydoc.toml");
        std::fs::write(&path, "mode = \"library\"\ndata_file = \"a.yml\"\nxml_root = \"lib\"\n").unwrap();

        let args = StoreArgs {
            config: Some(path),
            data_file: Some("b.xml".into()),
            ..StoreArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.mode, Mode::Library);
        assert_eq!(config.data_file, std::path::PathBuf::from("b.xml"));
        assert_eq!(config.xml_root, "lib");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = StoreArgs { config: Some("/nonexistent/polydoc.toml".into()), ..StoreArgs::default() };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn seed_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("db.xml");
        let store = StoreArgs { data_file: Some(data_file.clone()), mode: Some(Mode::Library), ..StoreArgs::default() };

        cmd_seed(SeedArgs { store: store.clone(), force: false }).unwrap();
        let first = std::fs::read_to_string(&data_file).unwrap();
        assert!(first.starts_with("<?xml") || first.contains("<database>"));

        std::fs::write(&data_file, "<database><library/></database>").unwrap();
        cmd_seed(SeedArgs { store: store.clone(), force: false }).unwrap();
        assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "<database><library/></database>");

        cmd_seed(SeedArgs { store, force: true }).unwrap();
        assert!(std::fs::read_to_string(&data_file).unwrap().contains("Deep Work"));
    }
}
