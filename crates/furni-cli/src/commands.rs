use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use furni_server::{FurniServer, ServerConfig};
use furni_service::{Asset, CatalogDocument, Fields, Item, ItemCollection, ItemId, StorageService};
use serde_json::Value;
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Show(args) => cmd_show(&config, args, &cli.format).await,
        Command::Update(args) => cmd_update(&config, args, &cli.format).await,
        Command::Add(args) => cmd_add(&config, args, &cli.format).await,
        Command::Upload(args) => cmd_upload(&config, args).await,
        Command::Config(args) => cmd_config(config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    debug!(
        source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
        backend = %config.storage.backend,
        "configuration loaded"
    );
    Ok(config)
}

fn open_service(config: &ServerConfig) -> anyhow::Result<StorageService> {
    StorageService::from_config(&config.storage).context("opening storage backend")
}

fn catalog_name(config: &ServerConfig, requested: Option<String>) -> String {
    requested.unwrap_or_else(|| config.default_filename.clone())
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} Furnidata server on {} ({} backend)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.storage.backend.to_string().cyan()
    );
    let server = FurniServer::new(config)?;
    server.serve().await?;
    Ok(())
}

async fn cmd_show(
    config: &ServerConfig,
    args: ShowArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let filename = catalog_name(config, args.file);
    let document = service.read_catalog(&filename).await?;

    if let Some(id) = args.item {
        let item_id = ItemId::from(id);
        let (collection, index) = document
            .find(&item_id)
            .ok_or_else(|| anyhow!("item {item_id} not found in {filename}"))?;
        let item = document
            .item_at(collection, index)
            .ok_or_else(|| anyhow!("item {item_id} in {filename} is not an object"))?;
        return print_item(&item, Some(collection), format);
    }

    match format {
        OutputFormat::Json => println!("{}", document.to_pretty_json()?),
        OutputFormat::Text => print_summary(&filename, &document),
    }
    Ok(())
}

async fn cmd_update(
    config: &ServerConfig,
    args: UpdateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let filename = catalog_name(config, args.file);
    let updates = parse_assignments(&args.set)?;
    let item = service
        .update_item(&filename, &ItemId::from(args.item_id), &updates)
        .await?;
    if matches!(format, OutputFormat::Text) {
        println!("{} Item updated in {}", "✓".green().bold(), filename.bold());
    }
    print_item(&item, None, format)
}

async fn cmd_add(config: &ServerConfig, args: AddArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let filename = catalog_name(config, args.file);
    let data = parse_assignments(&args.set)?;
    let item = service.add_item(&filename, &data).await?;
    if matches!(format, OutputFormat::Text) {
        println!("{} Item added to {}", "✓".green().bold(), filename.bold());
    }
    print_item(&item, None, format)
}

async fn cmd_upload(config: &ServerConfig, args: UploadArgs) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let filename = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", args.path.display()))?
        .to_string();
    let data = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let media_type = args
        .media_type
        .unwrap_or_else(|| guess_media_type(&filename).to_string());

    let asset = Asset::new(filename, media_type, data);
    let kind = asset.kind().map(|k| k.to_string()).unwrap_or_default();
    let stored = service.upload_asset(&asset).await?;
    println!(
        "{} Uploaded {} ({}, {} bytes)",
        "✓".green().bold(),
        stored.bold(),
        kind.cyan(),
        asset.size()
    );
    Ok(())
}

fn cmd_config(config: ServerConfig, args: ConfigArgs) -> anyhow::Result<()> {
    let mut config = if args.defaults {
        ServerConfig::default()
    } else {
        config
    };
    if let Some(store) = config.storage.object_store.as_mut() {
        if store.secret_access_key.is_some() {
            store.secret_access_key = Some("<redacted>".into());
        }
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Parse `field=value` pairs. Values that are valid JSON keep their type;
/// anything else is stored as text.
fn parse_assignments(pairs: &[String]) -> anyhow::Result<Fields> {
    let mut fields = Fields::new();
    for pair in pairs {
        let Some((field, raw)) = pair.split_once('=') else {
            bail!("expected FIELD=VALUE, got {pair:?}");
        };
        let field = field.trim();
        if field.is_empty() {
            bail!("empty field name in {pair:?}");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(field.to_string(), value);
    }
    Ok(fields)
}

fn guess_media_type(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

fn print_summary(filename: &str, document: &CatalogDocument) {
    println!("{}", filename.bold());
    for collection in ItemCollection::ALL {
        if !document.has_collection(collection) {
            println!("  {}: {}", collection.key(), "absent".dimmed());
            continue;
        }
        println!(
            "  {}: {} items",
            collection.key().cyan(),
            document.len(collection).to_string().bold()
        );
    }
}

fn print_item(
    item: &Item,
    collection: Option<ItemCollection>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => {
            let id = item.id().map(|id| id.to_string()).unwrap_or_default();
            match collection {
                Some(c) => println!("Item {} ({})", id.yellow().bold(), c.key()),
                None => println!("Item {}", id.yellow().bold()),
            }
            for (field, value) in item.fields() {
                println!("  {:<16} {}", field, value);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignments_keep_json_types() {
        let fields = parse_assignments(&[
            "xdim=2".into(),
            "bc=true".into(),
            "name=Red Chair".into(),
            "partcolors={\"color\":[\"#fff\"]}".into(),
            "classname=\"quoted\"".into(),
        ])
        .unwrap();
        assert_eq!(fields["xdim"], json!(2));
        assert_eq!(fields["bc"], json!(true));
        assert_eq!(fields["name"], json!("Red Chair"));
        assert_eq!(fields["partcolors"], json!({ "color": ["#fff"] }));
        assert_eq!(fields["classname"], json!("quoted"));
    }

    #[test]
    fn assignment_value_may_contain_equals() {
        let fields = parse_assignments(&["customparams=a=b".into()]).unwrap();
        assert_eq!(fields["customparams"], json!("a=b"));
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(parse_assignments(&["novalue".into()]).is_err());
        assert!(parse_assignments(&["=1".into()]).is_err());
    }

    #[test]
    fn media_type_guess() {
        assert_eq!(guess_media_type("chair_icon.PNG"), "image/png");
        assert_eq!(guess_media_type("chair.nitro"), "application/octet-stream");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
        assert_eq!(load_config(None).unwrap(), ServerConfig::default());
    }

    #[tokio::test]
    async fn add_then_update_through_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.storage.paths.catalog.filesystem = dir.path().to_string_lossy().into_owned();

        let service = open_service(&config).unwrap();
        service
            .write_catalog(
                &config.default_filename,
                &CatalogDocument::with_empty_collections(),
            )
            .await
            .unwrap();

        cmd_add(
            &config,
            AddArgs { set: vec!["name=Lamp".into()], file: None },
            &OutputFormat::Json,
        )
        .await
        .unwrap();

        let document = service.read_catalog(&config.default_filename).await.unwrap();
        let added = document.item_at(ItemCollection::Room, 0).unwrap();
        assert_eq!(added.get("name"), Some(&json!("Lamp")));

        let id = added.id().unwrap().to_string();
        cmd_update(
            &config,
            UpdateArgs { item_id: id, set: vec!["xdim=3".into()], file: None },
            &OutputFormat::Text,
        )
        .await
        .unwrap();

        let document = service.read_catalog(&config.default_filename).await.unwrap();
        let updated = document.item_at(ItemCollection::Room, 0).unwrap();
        assert_eq!(updated.get("xdim"), Some(&json!(3)));
        assert_eq!(updated.get("name"), Some(&json!("Lamp")));
    }
}
